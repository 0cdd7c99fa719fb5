use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open (in-progress) duty period. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: u64,
    pub start: DateTime<Utc>,
}

/// A closed duty period.
///
/// `duty_id` is a random 4-digit string generated at close time. It is not
/// checked for uniqueness against the user's existing records, so collisions
/// are possible; `void` removes the first match only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    pub duty_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DutyRecord {
    /// Whole minutes between start and end, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn duration_rounds_down_to_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let record = DutyRecord {
            duty_id: "1234".to_string(),
            start,
            end: start + Duration::seconds(90),
        };
        assert_eq!(record.duration_minutes(), 1);

        let record = DutyRecord {
            duty_id: "1234".to_string(),
            start,
            end: start + Duration::minutes(90),
        };
        assert_eq!(record.duration_minutes(), 90);
    }
}
