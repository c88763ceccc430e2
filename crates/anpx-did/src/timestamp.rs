use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::Error;

/// A challenge's `timestamp` must be within 5 minutes of the gateway's
/// clock, in either direction, to tolerate modest clock skew between
/// the receiver and gateway.
pub const WINDOW_SECS: i64 = 300;

/// Parses an RFC 3339 `timestamp` field and checks it falls within
/// [`WINDOW_SECS`] of `now`.
pub fn check_window(timestamp: &str, now: OffsetDateTime) -> Result<(), Error> {
    let claimed = OffsetDateTime::parse(timestamp, &Rfc3339)
        .map_err(|_| Error::MalformedHeader)?;
    let delta = (now - claimed).whole_seconds().abs();
    if delta > WINDOW_SECS {
        return Err(Error::TimestampOutOfWindow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamp_inside_window_passes() {
        let now = datetime!(2026-07-28 00:02:00 UTC);
        check_window("2026-07-28T00:00:00Z", now).unwrap();
    }

    #[test]
    fn timestamp_outside_window_fails() {
        let now = datetime!(2026-07-28 00:10:01 UTC);
        let err = check_window("2026-07-28T00:00:00Z", now).unwrap_err();
        assert!(matches!(err, Error::TimestampOutOfWindow));
    }

    #[test]
    fn future_timestamp_within_window_passes() {
        let now = datetime!(2026-07-28 00:00:00 UTC);
        check_window("2026-07-28T00:04:59Z", now).unwrap();
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let now = datetime!(2026-07-28 00:00:00 UTC);
        let err = check_window("not-a-timestamp", now).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader));
    }
}
