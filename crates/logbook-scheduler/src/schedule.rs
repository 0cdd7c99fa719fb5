use chrono::{DateTime, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulerError};
use crate::types::Schedule;

/// Compute the next UTC execution time for `schedule` strictly *after* `from`,
/// interpreting the schedule's wall-clock time in `tz`.
///
/// Returns `None` only when no valid instant exists in the next few days
/// (a daily time that keeps falling into a DST gap).
pub fn compute_next_run(schedule: &Schedule, tz: Tz, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match schedule {
        Schedule::Daily { hour, minute } => {
            let mut date = from.with_timezone(&tz).date_naive();
            // Today's candidate first; walk forward while the local time is
            // already past or skipped by a DST transition.
            for _ in 0..4 {
                if let Some(candidate) = local_instant(tz, date, *hour, *minute) {
                    if candidate > from {
                        return Some(candidate);
                    }
                }
                date = date.succ_opt()?;
            }
            None
        }
    }
}

/// Resolve a local wall-clock time on `date` to a UTC instant.
///
/// Ambiguous times (fall-back transition) resolve to the earlier instant;
/// skipped times (spring-forward gap) resolve to `None`.
fn local_instant(tz: Tz, date: NaiveDate, hour: u8, minute: u8) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Parse an `HH:MM` wall-clock string into hour and minute.
pub fn parse_hhmm(time: &str) -> Result<(u8, u8)> {
    let invalid = || SchedulerError::InvalidTime(time.to_string());

    let (h, m) = time.split_once(':').ok_or_else(invalid)?;
    let hour: u8 = h.parse().map_err(|_| invalid())?;
    let minute: u8 = m.parse().map_err(|_| invalid())?;
    if hour >= 24 || minute >= 60 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

/// Convenience: build a [`Schedule::Daily`] straight from an `HH:MM` string.
pub fn daily_at(time: &str) -> Result<Schedule> {
    let (hour, minute) = parse_hhmm(time)?;
    Ok(Schedule::Daily { hour, minute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const MANILA: Tz = chrono_tz::Asia::Manila;

    #[test]
    fn parse_hhmm_accepts_valid_times() {
        assert_eq!(parse_hhmm("06:00").unwrap(), (6, 0));
        assert_eq!(parse_hhmm("17:58").unwrap(), (17, 58));
        assert_eq!(parse_hhmm("00:00").unwrap(), (0, 0));
        assert_eq!(parse_hhmm("23:59").unwrap(), (23, 59));
    }

    #[test]
    fn parse_hhmm_rejects_garbage() {
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("06:60").is_err());
        assert!(parse_hhmm("0600").is_err());
        assert!(parse_hhmm("six").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn daily_fires_later_today_when_time_not_passed() {
        // 2025-06-02 05:00 Manila = 2025-06-01 21:00 UTC.
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 21, 0, 0).unwrap();
        let schedule = Schedule::Daily { hour: 6, minute: 0 };

        let next = compute_next_run(&schedule, MANILA, from).unwrap();
        // 06:00 Manila on the 2nd = 22:00 UTC on the 1st.
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn daily_rolls_to_tomorrow_when_time_passed() {
        // 2025-06-02 07:00 Manila = 2025-06-01 23:00 UTC.
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 23, 0, 0).unwrap();
        let schedule = Schedule::Daily { hour: 6, minute: 0 };

        let next = compute_next_run(&schedule, MANILA, from).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 2, 22, 0, 0).unwrap());
    }

    #[test]
    fn next_run_is_strictly_after_from() {
        // Exactly at the fire instant: the *next* run is tomorrow.
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 22, 0, 0).unwrap();
        let schedule = Schedule::Daily { hour: 6, minute: 0 };

        let next = compute_next_run(&schedule, MANILA, from).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 2, 22, 0, 0).unwrap());
    }

    #[test]
    fn consecutive_runs_are_a_day_apart() {
        let schedule = Schedule::Daily { hour: 17, minute: 58 };
        let from = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();

        let first = compute_next_run(&schedule, MANILA, from).unwrap();
        let second = compute_next_run(&schedule, MANILA, first).unwrap();
        // Manila has no DST, so the gap is exactly 24h.
        assert_eq!(second - first, Duration::days(1));
    }

    #[test]
    fn daily_at_builds_from_config_string() {
        assert_eq!(
            daily_at("05:58").unwrap(),
            Schedule::Daily { hour: 5, minute: 58 }
        );
        assert!(daily_at("25:00").is_err());
    }
}
