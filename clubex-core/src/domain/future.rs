use super::ids::FutureId;
use serde::{Deserialize, Serialize};

/// Default acceptance window: 15 days, in seconds.
pub const DEFAULT_ACCEPTANCE_WINDOW_SECS: i64 = 15 * 24 * 60 * 60;

/// A scheduled settlement window.
///
/// `executed` transitions false→true exactly once; `execution_time` is
/// mutable only while unexecuted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureWindow {
    pub id: FutureId,
    /// Unix seconds at which the future settles.
    pub execution_time: i64,
    /// Length of the acceptance period, in seconds.
    pub acceptance_window_secs: i64,
    pub executed: bool,
}

impl FutureWindow {
    pub fn new(id: FutureId, execution_time: i64) -> Self {
        Self {
            id,
            execution_time,
            acceptance_window_secs: DEFAULT_ACCEPTANCE_WINDOW_SECS,
            executed: false,
        }
    }
}

/// The acceptance-window boundary rule.
///
/// The anchor of the window relative to `execution_time` is deliberately a
/// named predicate rather than a hardcoded comparison; both readings are
/// inclusive at their boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptanceRule {
    /// Positions may be opened only while at least one full window of lead
    /// time remains before execution: `now + window <= execution_time`.
    #[default]
    LeadTime,
    /// Positions may be opened only inside the final window before execution:
    /// `execution_time - window <= now <= execution_time`.
    Closing,
}

impl AcceptanceRule {
    /// Whether `now` falls inside this future's acceptance period.
    pub fn allows(self, future: &FutureWindow, now: i64) -> bool {
        let window = future.acceptance_window_secs;
        match self {
            AcceptanceRule::LeadTime => now.saturating_add(window) <= future.execution_time,
            AcceptanceRule::Closing => {
                future.execution_time.saturating_sub(window) <= now
                    && now <= future.execution_time
            }
        }
    }
}
