//! Future scheduler — settlement windows and their acceptance gating.

use crate::domain::{AcceptanceRule, FutureId, FutureWindow};
use crate::engine::error::EngineError;

/// Registry of settlement windows, ordered by id.
///
/// The acceptance rule is fixed at construction; time is always supplied by
/// the caller, never read from a clock.
#[derive(Debug, Clone, Default)]
pub struct FutureScheduler {
    futures: Vec<FutureWindow>,
    rule: AcceptanceRule,
}

impl FutureScheduler {
    pub fn new(rule: AcceptanceRule) -> Self {
        Self {
            futures: Vec::new(),
            rule,
        }
    }

    pub fn rule(&self) -> AcceptanceRule {
        self.rule
    }

    /// Schedule a new settlement window with the default 15-day acceptance
    /// period.
    pub fn register(&mut self, execution_time: i64) -> FutureId {
        let id = FutureId(self.futures.len() as u64);
        self.futures.push(FutureWindow::new(id, execution_time));
        id
    }

    /// Move an unexecuted future to a new execution time.
    pub fn update(&mut self, id: FutureId, execution_time: i64) -> Result<(), EngineError> {
        let future = self
            .futures
            .get_mut(id.0 as usize)
            .ok_or(EngineError::FutureNotFound(id))?;
        if future.executed {
            return Err(EngineError::FutureAlreadyExecuted(id));
        }
        future.execution_time = execution_time;
        Ok(())
    }

    /// Whether `now` falls inside the acceptance period of the future.
    pub fn is_within_acceptance_window(&self, id: FutureId, now: i64) -> Result<bool, EngineError> {
        let future = self.get(id)?;
        Ok(self.rule.allows(future, now))
    }

    /// Irreversibly mark a future as executed. The caller guarantees every
    /// position referencing it has already been folded.
    pub fn mark_executed(&mut self, id: FutureId) -> Result<(), EngineError> {
        let future = self
            .futures
            .get_mut(id.0 as usize)
            .ok_or(EngineError::FutureNotFound(id))?;
        if future.executed {
            return Err(EngineError::FutureAlreadyExecuted(id));
        }
        future.executed = true;
        Ok(())
    }

    pub fn get(&self, id: FutureId) -> Result<&FutureWindow, EngineError> {
        self.futures
            .get(id.0 as usize)
            .ok_or(EngineError::FutureNotFound(id))
    }

    /// All futures, ordered by id.
    pub fn all(&self) -> &[FutureWindow] {
        &self.futures
    }

    /// Count of registered futures (the next id to be assigned).
    pub fn index(&self) -> u64 {
        self.futures.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_ACCEPTANCE_WINDOW_SECS;

    const DAY: i64 = 86_400;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn register_assigns_sequential_ids_and_defaults() {
        let mut sched = FutureScheduler::default();
        let id = sched.register(NOW + 30 * DAY);
        assert_eq!(id, FutureId(0));
        assert_eq!(sched.index(), 1);

        let future = sched.get(id).unwrap();
        assert_eq!(future.acceptance_window_secs, DEFAULT_ACCEPTANCE_WINDOW_SECS);
        assert!(!future.executed);
    }

    #[test]
    fn update_moves_execution_time() {
        let mut sched = FutureScheduler::default();
        let id = sched.register(NOW - DAY);
        assert!(!sched.is_within_acceptance_window(id, NOW).unwrap());

        sched.update(id, NOW + 16 * DAY).unwrap();
        assert!(sched.is_within_acceptance_window(id, NOW).unwrap());
    }

    #[test]
    fn update_unknown_or_executed_future_fails() {
        let mut sched = FutureScheduler::default();
        assert_eq!(
            sched.update(FutureId(0), NOW),
            Err(EngineError::FutureNotFound(FutureId(0)))
        );

        let id = sched.register(NOW + 30 * DAY);
        sched.mark_executed(id).unwrap();
        assert_eq!(
            sched.update(id, NOW + 60 * DAY),
            Err(EngineError::FutureAlreadyExecuted(id))
        );
    }

    #[test]
    fn mark_executed_is_once_only() {
        let mut sched = FutureScheduler::default();
        let id = sched.register(NOW + 30 * DAY);
        sched.mark_executed(id).unwrap();
        assert_eq!(
            sched.mark_executed(id),
            Err(EngineError::FutureAlreadyExecuted(id))
        );
        assert!(sched.get(id).unwrap().executed);
    }
}
