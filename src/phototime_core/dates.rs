use crate::phototime_core::error::{PhototimeError, Result};
use std::sync::OnceLock;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const OFFSET_FORMAT: &[FormatItem] = format_description!(
    "[offset_hour sign:mandatory]:[offset_minute]"
);

pub const DAY_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");

pub const DISPLAY_FORMAT: &[FormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
);

static SYSTEM_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// The zone in which calendar days are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalZone {
    /// The machine's local zone, resolved per instant where the platform allows it.
    System,
    Fixed(UtcOffset),
}

impl LocalZone {
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            LocalZone::System => {
                UtcOffset::local_offset_at(instant).unwrap_or_else(|_| system_offset())
            }
            LocalZone::Fixed(offset) => *offset,
        }
    }

    pub fn localize(&self, instant: OffsetDateTime) -> OffsetDateTime {
        instant.to_offset(self.offset_at(instant))
    }
}

/// Current local offset, resolved once.
///
/// Call this before spawning threads: on some platforms the local offset can
/// only be read while the process is single-threaded.
pub fn system_offset() -> UtcOffset {
    *SYSTEM_OFFSET.get_or_init(|| {
        OffsetDateTime::now_local()
            .map(|dt| dt.offset())
            .unwrap_or_else(|_| {
                log::warn!("Failed to get local time zone, using UTC instead.");
                UtcOffset::UTC
            })
    })
}

/// Whether two instants fall on the same calendar day in `zone`.
pub fn same_local_day(a: OffsetDateTime, b: OffsetDateTime, zone: LocalZone) -> bool {
    zone.localize(a).date() == zone.localize(b).date()
}

/// Parse an offset such as "+02:00" or "-05:30".
pub fn parse_utc_offset(s: &str) -> Result<UtcOffset> {
    UtcOffset::parse(s.trim(), OFFSET_FORMAT)
        .map_err(|_| PhototimeError::InvalidOffset(s.to_string()))
}

pub fn from_epoch_seconds(seconds: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|_| PhototimeError::InvalidTimestamp(seconds))
}

pub fn from_epoch_millis(millis: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .map_err(|_| PhototimeError::InvalidTimestamp(millis))
}

pub fn epoch_millis(instant: OffsetDateTime) -> i64 {
    (instant.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Format an instant for display in `zone`, falling back to RFC 3339 debug output.
pub fn display_in(instant: OffsetDateTime, zone: LocalZone, format: &[FormatItem]) -> String {
    zone.localize(instant)
        .format(format)
        .unwrap_or_else(|_| format!("{instant}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_same_day_in_zone_across_utc_midnight() {
        let zone = LocalZone::Fixed(offset!(+2));
        let media = datetime!(2023-05-01 23:59 UTC);
        let sidecar = datetime!(2023-05-02 00:01 UTC);
        assert!(same_local_day(media, sidecar, zone));
        assert!(!same_local_day(media, sidecar, LocalZone::Fixed(UtcOffset::UTC)));
    }

    #[test]
    fn test_twenty_five_hours_apart_is_different_day() {
        let zone = LocalZone::Fixed(offset!(+2));
        let a = datetime!(2023-05-01 20:00 +2);
        let b = datetime!(2023-05-02 21:00 +2);
        assert!(!same_local_day(a, b, zone));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+02:00").unwrap(), offset!(+2));
        assert_eq!(parse_utc_offset("-05:30").unwrap(), offset!(-5:30));
        assert!(matches!(parse_utc_offset("2"), Err(PhototimeError::InvalidOffset(_))));
    }

    #[test]
    fn test_epoch_conversions() {
        let t = from_epoch_seconds(1_686_830_400).unwrap();
        assert_eq!(t, datetime!(2023-06-15 12:00 UTC));
        assert_eq!(epoch_millis(t), 1_686_830_400_000);
        assert_eq!(from_epoch_millis(1_686_830_400_500).unwrap(), datetime!(2023-06-15 12:00:00.5 UTC));
        assert!(from_epoch_seconds(i64::MAX).is_err());
    }

    #[test]
    fn test_display_in_zone() {
        let t = datetime!(2023-06-15 23:30 UTC);
        assert_eq!(display_in(t, LocalZone::Fixed(offset!(+2)), DAY_FORMAT), "2023-06-16");
    }
}
