//! Timestamp formatting and expiry arithmetic shared by both signing protocols.

use {
    crate::constants::*,
    chrono::{DateTime, Duration, Utc},
};

/// Formats used by the V4 protocol.
pub(crate) trait FormatGoog4 {
    /// `YYYYMMDD`, the date component of the credential scope.
    fn to_datestamp(&self) -> String;

    /// `YYYYMMDD'T'HHMMSS'Z'`, used for `X-Goog-Date` and the string to sign.
    fn to_iso8601_compact(&self) -> String;
}

impl FormatGoog4 for DateTime<Utc> {
    fn to_datestamp(&self) -> String {
        self.format(DATESTAMP_FORMAT).to_string()
    }

    fn to_iso8601_compact(&self) -> String {
        self.format(ISO8601_COMPACT_FORMAT).to_string()
    }
}

/// Resolve the absolute expiry of a URL signed at `now`.
///
/// An explicit `expires_at` wins; otherwise the URL lives for `valid_for` past `now`. Returns
/// `None` if `now + valid_for` falls outside the representable date range.
pub(crate) fn resolve_expiry(
    now: &DateTime<Utc>,
    expires_at: Option<&DateTime<Utc>>,
    valid_for: Duration,
) -> Option<DateTime<Utc>> {
    match expires_at {
        Some(expires_at) => Some(*expires_at),
        None => now.checked_add_signed(valid_for),
    }
}

/// The V4 `X-Goog-Expires` value: the lifetime relative to `now`, clamped to `[0, 604800]`.
///
/// A relative lifetime is clamped directly, so no absolute timestamp is built for it.
pub(crate) fn goog4_expires_seconds(
    now: &DateTime<Utc>,
    expires_at: Option<&DateTime<Utc>>,
    valid_for: Duration,
) -> i64 {
    let lifetime = match expires_at {
        Some(expires_at) => *expires_at - *now,
        None => valid_for,
    };
    lifetime.num_seconds().clamp(0, MAX_V4_EXPIRES_SECONDS)
}

#[cfg(test)]
mod tests {
    use {
        super::{goog4_expires_seconds, resolve_expiry, FormatGoog4},
        chrono::{DateTime, Duration, TimeZone, Utc},
    };

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test_log::test]
    fn test_formats() {
        let now = t0();
        assert_eq!(now.to_datestamp(), "20231114");
        assert_eq!(now.to_iso8601_compact(), "20231114T221320Z");
    }

    #[test_log::test]
    fn test_resolve_expiry() {
        let now = t0();
        assert_eq!(resolve_expiry(&now, None, Duration::seconds(600)).unwrap().timestamp(), 1_700_000_600);

        let explicit = Utc.timestamp_opt(1_700_100_000, 0).unwrap();
        assert_eq!(resolve_expiry(&now, Some(&explicit), Duration::seconds(600)), Some(explicit));

        assert!(resolve_expiry(&now, None, Duration::seconds(9_000_000_000_000)).is_none());
    }

    #[test_log::test]
    fn test_goog4_expires_clamping() {
        let now = t0();
        assert_eq!(goog4_expires_seconds(&now, None, Duration::seconds(300)), 300);
        assert_eq!(goog4_expires_seconds(&now, None, Duration::seconds(604_800)), 604_800);
        assert_eq!(goog4_expires_seconds(&now, None, Duration::seconds(999_999)), 604_800);
        assert_eq!(goog4_expires_seconds(&now, None, Duration::seconds(-10)), 0);
        assert_eq!(goog4_expires_seconds(&now, None, Duration::seconds(9_000_000_000_000)), 604_800);

        let later = now + Duration::seconds(3_600);
        assert_eq!(goog4_expires_seconds(&now, Some(&later), Duration::seconds(10)), 3_600);
        let earlier = now - Duration::seconds(10);
        assert_eq!(goog4_expires_seconds(&now, Some(&earlier), Duration::seconds(10)), 0);
    }
}
