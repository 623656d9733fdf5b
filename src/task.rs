//! Transition policy for resolution tasks.
//!
//! Each task attempt ends in an [`AttemptOutcome`]; [`decide_next`] maps it,
//! together with the elapsed time and poll configuration, to the next state.
//! Keeping the policy pure makes it testable without timers.

use std::time::Duration;

use crate::config::PollConfig;

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Final artifact loaded and swapped in.
    Loaded,
    /// Descriptor fetched, but the backend has not produced an artifact URL.
    NotReady,
    /// Descriptor fetch itself failed.
    FetchFailed,
    /// Artifact load failed after a URL was available.
    LoadFailed,
}

/// What a task does after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Terminal success; no further attempts.
    Done,
    /// Schedule the next attempt after this delay.
    Retry(Duration),
    /// Terminal give-up. `report_exhausted` fires the ceiling-reached error
    /// callback; give-ups whose attempt already reported its own error stay
    /// silent.
    GiveUp { report_exhausted: bool },
}

/// Decide the next state after an attempt.
///
/// The ceiling is measured from task start, not from the last attempt: when
/// the next attempt would land past the ceiling, the task gives up now
/// rather than firing one more.
pub fn decide_next(outcome: AttemptOutcome, elapsed: Duration, config: &PollConfig) -> Decision {
    match outcome {
        AttemptOutcome::Loaded => Decision::Done,
        AttemptOutcome::NotReady | AttemptOutcome::FetchFailed | AttemptOutcome::LoadFailed => {
            if !config.enabled {
                return Decision::GiveUp {
                    report_exhausted: false,
                };
            }
            if elapsed + config.interval <= config.ceiling {
                Decision::Retry(config.interval)
            } else {
                Decision::GiveUp {
                    report_exhausted: outcome != AttemptOutcome::LoadFailed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, interval_ms: u64, ceiling_ms: u64) -> PollConfig {
        PollConfig {
            enabled,
            interval: Duration::from_millis(interval_ms),
            ceiling: Duration::from_millis(ceiling_ms),
        }
    }

    #[test]
    fn loaded_is_done() {
        let cfg = config(true, 5000, 12000);
        assert_eq!(
            decide_next(AttemptOutcome::Loaded, Duration::ZERO, &cfg),
            Decision::Done
        );
    }

    #[test]
    fn retries_while_next_attempt_fits_under_ceiling() {
        // Interval 5000, ceiling 12000: attempts fire at t=0, 5000, 10000.
        let cfg = config(true, 5000, 12000);
        let retry = Decision::Retry(Duration::from_millis(5000));

        assert_eq!(
            decide_next(AttemptOutcome::NotReady, Duration::ZERO, &cfg),
            retry
        );
        assert_eq!(
            decide_next(AttemptOutcome::NotReady, Duration::from_millis(5000), &cfg),
            retry
        );
        // The attempt that would fire at t=15000 exceeds the ceiling.
        assert_eq!(
            decide_next(AttemptOutcome::NotReady, Duration::from_millis(10_000), &cfg),
            Decision::GiveUp {
                report_exhausted: true
            }
        );
    }

    #[test]
    fn slow_attempt_can_exhaust_the_budget_alone() {
        let cfg = config(true, 5000, 12000);
        assert_eq!(
            decide_next(AttemptOutcome::FetchFailed, Duration::from_millis(11_000), &cfg),
            Decision::GiveUp {
                report_exhausted: true
            }
        );
    }

    #[test]
    fn disabled_polling_gives_up_silently() {
        let cfg = config(false, 5000, 12000);
        for outcome in [
            AttemptOutcome::NotReady,
            AttemptOutcome::FetchFailed,
            AttemptOutcome::LoadFailed,
        ] {
            assert_eq!(
                decide_next(outcome, Duration::ZERO, &cfg),
                Decision::GiveUp {
                    report_exhausted: false
                }
            );
        }
    }

    #[test]
    fn load_failure_exhaustion_is_silent() {
        // The load error was already reported on the attempt itself.
        let cfg = config(true, 5000, 12000);
        assert_eq!(
            decide_next(AttemptOutcome::LoadFailed, Duration::from_millis(10_000), &cfg),
            Decision::GiveUp {
                report_exhausted: false
            }
        );
        // Under the ceiling it retries like the others.
        assert_eq!(
            decide_next(AttemptOutcome::LoadFailed, Duration::ZERO, &cfg),
            Decision::Retry(Duration::from_millis(5000))
        );
    }
}
