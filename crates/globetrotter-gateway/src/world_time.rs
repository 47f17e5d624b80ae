//! World clock computed locally from the current instant.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use chrono_tz::Tz;
use globetrotter_core::ProviderError;

use crate::types::WorldTime;

/// Timezone name meaning "the host's own zone"
pub const LOCAL: &str = "local";

/// Time at `now` in the IANA zone `timezone` (or [`LOCAL`]).
pub fn world_time_at(timezone: &str, now: DateTime<Utc>) -> Result<WorldTime, ProviderError> {
    let datetime = if timezone == LOCAL {
        now.with_timezone(&Local)
            .to_rfc3339_opts(SecondsFormat::Millis, false)
    } else {
        let tz = timezone
            .parse::<Tz>()
            .map_err(|_| ProviderError::InvalidTimezone(timezone.to_string()))?;
        now.with_timezone(&tz)
            .to_rfc3339_opts(SecondsFormat::Millis, false)
    };

    Ok(WorldTime {
        datetime,
        timezone: timezone.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summer_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_london_summer_offset() {
        let time = world_time_at("Europe/London", summer_noon()).unwrap();
        assert_eq!(time.datetime, "2024-07-01T13:00:00.000+01:00");
        assert_eq!(time.timezone, "Europe/London");
    }

    #[test]
    fn test_utc_zone() {
        let time = world_time_at("UTC", summer_noon()).unwrap();
        assert_eq!(time.datetime, "2024-07-01T12:00:00.000+00:00");
    }

    #[test]
    fn test_half_hour_zone() {
        let time = world_time_at("Asia/Kolkata", summer_noon()).unwrap();
        assert_eq!(time.datetime, "2024-07-01T17:30:00.000+05:30");
    }

    #[test]
    fn test_local_is_parseable() {
        let time = world_time_at(LOCAL, summer_noon()).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&time.datetime).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), summer_noon());
    }

    #[test]
    fn test_unknown_zone() {
        for zone in ["Mars/Olympus_Mons", "", "europe/london_x"] {
            let err = world_time_at(zone, summer_noon()).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidTimezone(_)));
        }
    }
}
