use std::sync::{Mutex, MutexGuard};

use chrono_tz::Tz;

use logbook_core::config::DiscordConfig;
use logbook_duty::DutyLedger;

/// Shared state handed to the event handler and the delivery task.
///
/// The ledger sits behind a `Mutex`; each command holds the lock for one
/// whole check-then-mutate operation and never across an `.await`, so ledger
/// operations never interleave.
pub struct AppContext {
    pub config: DiscordConfig,
    /// Timezone used for displayed clocks and dates.
    pub tz: Tz,
    ledger: Mutex<DutyLedger>,
}

impl AppContext {
    pub fn new(config: DiscordConfig, tz: Tz) -> Self {
        Self {
            config,
            tz,
            ledger: Mutex::new(DutyLedger::new()),
        }
    }

    pub fn ledger(&self) -> MutexGuard<'_, DutyLedger> {
        self.ledger.lock().unwrap()
    }
}
