//! Request signature for the EC open platform.
//!
//! Every call carries an uppercase hex MD5 digest over the app id, the app
//! secret and the millisecond timestamp sent next to it. The digest format is
//! fixed by the platform:
//!
//! ```text
//! MD5("appId={appId}&appSecret={appSecret}&timeStamp={timestamp}")
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};

/// Compute the `X-Ec-Sign` value for `timestamp`.
///
/// The timestamp is taken as an argument rather than read from the clock so
/// that the same inputs always produce the same signature.
pub fn sign(timestamp: u64, app_id: &str, app_secret: &str) -> String {
    let payload = format!(
        "appId={}&appSecret={}&timeStamp={}",
        app_id, app_secret, timestamp
    );
    hex::encode_upper(Md5::digest(payload.as_bytes()))
}

/// Milliseconds since the Unix epoch.
pub fn current_timestamp_millis() -> u64 {
    saturating_millis(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default(),
    )
}

/// Whole milliseconds in `elapsed`, clamped to `u64::MAX` instead of wrapping.
fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
