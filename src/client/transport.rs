use std::future::Future;
use std::time::Duration;

use crate::common::Cursor;
use crate::config::WireFormat;
use crate::protocol::wire::{self, ReceivedBatch, WireError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(u16),

    #[error("bad payload: {0}")]
    Wire(#[from] WireError),
}

/// One request/response exchange with the chat server.
pub trait SyncTransport: Send + Sync {
    /// `Ok(None)` is the server's no-op answer.
    fn sync(
        &self,
        cursor: Cursor,
    ) -> impl Future<Output = Result<Option<ReceivedBatch>, ClientError>> + Send;

    /// Post a message; resolves to the id the server assigned.
    fn post(&self, user: &str, msg: &str)
    -> impl Future<Output = Result<i64, ClientError>> + Send;
}

/// reqwest-backed transport speaking either wire format.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    format: WireFormat,
}

impl HttpTransport {
    pub fn new(base_url: &str, format: WireFormat) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            format,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(status.as_u16()))
    }
}

impl SyncTransport for HttpTransport {
    async fn sync(&self, cursor: Cursor) -> Result<Option<ReceivedBatch>, ClientError> {
        match self.format {
            WireFormat::Json => {
                let response = self
                    .client
                    .get(self.url("/api/chat/sync"))
                    .query(&[("cursor", cursor.to_string())])
                    .send()
                    .await?;
                let body = check_status(response)?.bytes().await?;
                Ok(Some(wire::decode_json(&body)?))
            }
            WireFormat::Text => {
                let response = self
                    .client
                    .post(self.url("/chat/get.php"))
                    .form(&[("i", cursor.to_string())])
                    .send()
                    .await?;
                let body = check_status(response)?.text().await?;
                Ok(wire::decode_text(&body)?)
            }
        }
    }

    async fn post(&self, user: &str, msg: &str) -> Result<i64, ClientError> {
        let response = self
            .client
            .post(self.url("/chat/post"))
            .form(&[("user", user), ("msg", msg)])
            .send()
            .await?;
        let body = check_status(response)?.text().await?;
        let id = body.trim();
        id.parse()
            .map_err(|_| ClientError::Wire(WireError::BadId(id.to_string())))
    }
}
