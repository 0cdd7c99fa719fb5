use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

use crate::error::{DutyError, Result};
use crate::types::{DutyRecord, Session};

/// In-memory duty ledger: one optional open session plus an ordered duty
/// history per user.
///
/// The ledger never reads the wall clock; every operation takes `now` from
/// the caller, which keeps the state machine deterministic under test. It
/// performs no authorization either: callers compose the predicates in
/// [`crate::policy`] before invoking it.
///
/// State lives only in memory and is lost on process exit.
#[derive(Debug, Default)]
pub struct DutyLedger {
    sessions: HashMap<u64, Session>,
    history: HashMap<u64, Vec<DutyRecord>>,
}

/// Trailing reporting window for weekly totals.
fn week() -> Duration {
    Duration::days(7)
}

impl DutyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `user_id` starting at `now`.
    pub fn clock_in(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<()> {
        if self.sessions.contains_key(&user_id) {
            return Err(DutyError::AlreadyClockedIn { user_id });
        }
        self.sessions.insert(user_id, Session { user_id, start: now });
        debug!(user_id, "clocked in");
        Ok(())
    }

    /// Close the open session for `user_id`, appending a duty record that
    /// ends at `now`.
    pub fn clock_out(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<DutyRecord> {
        let session = self
            .sessions
            .remove(&user_id)
            .ok_or(DutyError::NotClockedIn { user_id })?;
        let record = self.close_session(user_id, session, now);
        debug!(user_id, duty_id = %record.duty_id, "clocked out");
        Ok(record)
    }

    /// Override path: open a session at `now` regardless of current state.
    /// An existing open session is discarded, not closed.
    pub fn force_clock_in(&mut self, user_id: u64, now: DateTime<Utc>) {
        self.sessions.insert(user_id, Session { user_id, start: now });
        debug!(user_id, "force clocked in");
    }

    /// Override path: same contract as [`clock_out`](Self::clock_out).
    pub fn force_clock_out(&mut self, user_id: u64, now: DateTime<Utc>) -> Result<DutyRecord> {
        self.clock_out(user_id, now)
    }

    /// Close every open session at `now`. Returns the closed records in
    /// ascending user-id order so announcements are deterministic.
    pub fn sweep_clock_out_all(&mut self, now: DateTime<Utc>) -> Vec<(u64, DutyRecord)> {
        let mut user_ids: Vec<u64> = self.sessions.keys().copied().collect();
        user_ids.sort_unstable();

        let mut closed = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(session) = self.sessions.remove(&user_id) {
                let record = self.close_session(user_id, session, now);
                closed.push((user_id, record));
            }
        }
        debug!(count = closed.len(), "sweep closed all open sessions");
        closed
    }

    /// Sum of duty minutes for records ending within the trailing week.
    /// A record ending exactly seven days before `now` is included.
    pub fn weekly_minutes(&self, user_id: u64, now: DateTime<Utc>) -> i64 {
        let cutoff = now - week();
        self.history
            .get(&user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.end >= cutoff)
                    .map(|r| r.duration_minutes())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Per-user duty records ending within the trailing week, for every user
    /// with at least one such record. Sorted by user id.
    pub fn weekly_report(&self, now: DateTime<Utc>) -> Vec<(u64, Vec<DutyRecord>)> {
        let cutoff = now - week();
        let mut report: Vec<(u64, Vec<DutyRecord>)> = self
            .history
            .iter()
            .filter_map(|(&user_id, records)| {
                let weekly: Vec<DutyRecord> =
                    records.iter().filter(|r| r.end >= cutoff).cloned().collect();
                if weekly.is_empty() {
                    None
                } else {
                    Some((user_id, weekly))
                }
            })
            .collect();
        report.sort_unstable_by_key(|(user_id, _)| *user_id);
        report
    }

    /// Full unfiltered history for one user; empty if none.
    pub fn single_history(&self, user_id: u64) -> &[DutyRecord] {
        self.history.get(&user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove the first duty record matching `duty_id` for `user_id`.
    /// Nothing is mutated when there is no match.
    pub fn void_duty(&mut self, user_id: u64, duty_id: &str) -> Result<()> {
        let not_found = || DutyError::DutyNotFound {
            user_id,
            duty_id: duty_id.to_string(),
        };
        let records = self.history.get_mut(&user_id).ok_or_else(not_found)?;
        let pos = records
            .iter()
            .position(|r| r.duty_id == duty_id)
            .ok_or_else(not_found)?;
        records.remove(pos);
        debug!(user_id, duty_id, "duty voided");
        Ok(())
    }

    /// Drop the open session (if any) and the full history for `user_id`.
    /// Idempotent.
    pub fn delete_user(&mut self, user_id: u64) {
        self.sessions.remove(&user_id);
        self.history.remove(&user_id);
        debug!(user_id, "user deleted from ledger");
    }

    /// The open session for `user_id`, if any.
    pub fn session(&self, user_id: u64) -> Option<&Session> {
        self.sessions.get(&user_id)
    }

    fn close_session(&mut self, user_id: u64, session: Session, now: DateTime<Utc>) -> DutyRecord {
        let record = DutyRecord {
            duty_id: new_duty_id(),
            start: session.start,
            end: now,
        };
        self.history.entry(user_id).or_default().push(record.clone());
        record
    }
}

/// Random 4-digit duty id. Not checked against the user's existing records;
/// collisions are possible and accepted (see [`DutyRecord`]).
fn new_duty_id() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}
