use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SchedulerError};
use crate::schedule::compute_next_run;
use crate::types::{Job, Schedule};

/// In-process scheduler: holds the job table in memory and drives execution
/// at one-second precision.
///
/// Fired jobs are forwarded over `fired_tx` with `try_send` so the tick loop
/// is never stalled by a slow consumer; a full channel drops that invocation
/// only. There is no retry and no persistence: jobs are re-registered from
/// config on every start.
pub struct SchedulerEngine {
    tz: Tz,
    jobs: Vec<Job>,
    fired_tx: mpsc::Sender<Job>,
}

impl SchedulerEngine {
    pub fn new(timezone: &str, fired_tx: mpsc::Sender<Job>) -> Result<Self> {
        let tz = Tz::from_str(timezone)
            .map_err(|_| SchedulerError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            tz,
            jobs: Vec::new(),
            fired_tx,
        })
    }

    /// Register a job. `action` is an opaque JSON payload handed back to the
    /// consumer verbatim when the job fires.
    pub fn add_job(&mut self, name: &str, schedule: Schedule, action: &str) {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            schedule,
            action: action.to_string(),
            next_run: compute_next_run(&schedule, self.tz, now),
            run_count: 0,
        };
        info!(job_id = %job.id, name, next_run = ?job.next_run, "job added");
        self.jobs.push(job);
    }

    /// Main event loop. Polls every second until `shutdown` broadcasts `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(tz = %self.tz, jobs = self.jobs.len(), "scheduler engine started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(Utc::now());
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Fire every job whose `next_run` has arrived and advance it.
    fn tick(&mut self, now: DateTime<Utc>) {
        for job in &mut self.jobs {
            let due = matches!(job.next_run, Some(at) if at <= now);
            if !due {
                continue;
            }

            job.run_count += 1;
            job.next_run = compute_next_run(&job.schedule, self.tz, now);
            info!(job_id = %job.id, name = %job.name, run = job.run_count, "executing job");

            // try_send never blocks the tick loop.
            if self.fired_tx.try_send(job.clone()).is_err() {
                warn!(job_id = %job.id, "delivery channel full or closed, job invocation dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn engine_with_rx(cap: usize) -> (SchedulerEngine, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(cap);
        (SchedulerEngine::new("Asia/Manila", tx).unwrap(), rx)
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let (tx, _rx) = mpsc::channel(1);
        assert!(SchedulerEngine::new("Mars/Olympus_Mons", tx).is_err());
    }

    #[tokio::test]
    async fn due_job_fires_once_and_advances() {
        let (mut engine, mut rx) = engine_with_rx(4);
        engine.add_job(
            "sweep",
            Schedule::Daily { hour: 6, minute: 0 },
            r#"{"type":"sweep","channel_id":1}"#,
        );
        // Force the job due in the past, then tick.
        let past = Utc.with_ymd_and_hms(2025, 6, 1, 21, 59, 0).unwrap();
        engine.jobs[0].next_run = Some(past);
        let now = past + Duration::seconds(61);
        engine.tick(now);

        let fired = rx.try_recv().unwrap();
        assert_eq!(fired.name, "sweep");
        assert_eq!(fired.run_count, 1);
        // Advanced past `now`, so a second tick at the same instant is quiet.
        assert!(fired.next_run.unwrap() > now);
        engine.tick(now);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn job_not_due_does_not_fire() {
        let (mut engine, mut rx) = engine_with_rx(1);
        engine.add_job(
            "reminder",
            Schedule::Daily { hour: 6, minute: 0 },
            r#"{"type":"reminder","channel_id":1,"message":"hi"}"#,
        );
        let next = engine.jobs[0].next_run.unwrap();
        engine.tick(next - Duration::seconds(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_channel_drops_invocation_only() {
        let (mut engine, mut rx) = engine_with_rx(1);
        engine.add_job("a", Schedule::Daily { hour: 6, minute: 0 }, "{}");
        engine.add_job("b", Schedule::Daily { hour: 6, minute: 0 }, "{}");
        let past = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        engine.jobs[0].next_run = Some(past);
        engine.jobs[1].next_run = Some(past);

        engine.tick(past + Duration::seconds(1));

        // Capacity one: first job delivered, second dropped, both advanced.
        assert_eq!(rx.try_recv().unwrap().name, "a");
        assert!(rx.try_recv().is_err());
        assert_eq!(engine.jobs[1].run_count, 1);
        assert!(engine.jobs[1].next_run.unwrap() > past);
    }
}
