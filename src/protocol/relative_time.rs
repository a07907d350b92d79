use crate::common::LastSent;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Literal shown when the log has no message to date.
pub const NEVER: &str = "NEVER";

/// Human phrase for an age of `delta` seconds.
///
/// Negative ages (clock skew between poster and server) read as "just now".
pub fn describe(delta: i64) -> String {
    if delta < MINUTE {
        "less than a minute ago.".to_string()
    } else if delta < 2 * MINUTE {
        "about a minute ago.".to_string()
    } else if delta < 45 * MINUTE {
        format!("{} minutes ago.", delta / MINUTE)
    } else if delta < 90 * MINUTE {
        "about an hour ago.".to_string()
    } else if delta < DAY {
        format!("about {} hours ago.", delta / HOUR)
    } else if delta < 2 * DAY {
        "1 day ago.".to_string()
    } else {
        format!("{} days ago.", delta / DAY)
    }
}

pub fn phrase(last_sent: LastSent, now: i64) -> String {
    match last_sent {
        LastSent::Never => NEVER.to_string(),
        LastSent::At(time) => describe(now - time),
    }
}
