pub mod relative_time;
pub mod service;
pub mod wire;

pub use service::ChatService;
pub use wire::ReceivedBatch;
