//! Per-move context: anytime reporting and cooperative cancellation.
//!
//! A player never returns its move directly. It reports candidates through
//! [`Turn::report`] as often as it likes, and whoever drives the game keeps
//! the most recent report received before the time budget ran out. Searches
//! call [`Turn::check`] at every node so that raising the stop flag (or
//! passing the deadline) unwinds them promptly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use crate::isolation::Action;
use crate::search::SearchError;

/// Reporting channel, stop flag and optional deadline for one move.
pub struct Turn {
    reports: Sender<Action>,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Turn {
    pub fn new(reports: Sender<Action>, stop: Arc<AtomicBool>, deadline: Option<Instant>) -> Self {
        Self {
            reports,
            stop,
            deadline,
        }
    }

    /// Create a turn together with the receiving end of its reports and the
    /// shared stop flag.
    pub fn channel(deadline: Option<Instant>) -> (Turn, Receiver<Action>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        (Turn::new(tx, Arc::clone(&stop), deadline), rx, stop)
    }

    /// Publish a candidate move. Later reports supersede earlier ones.
    pub fn report(&self, action: Action) {
        if self.reports.send(action).is_err() {
            // Nobody is listening any more; further work is wasted.
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    /// Whether the caller asked the search to stop.
    pub fn is_stopped(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.stop.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    /// Cancellation point.
    ///
    /// # Errors
    /// Returns [`SearchError::Interrupted`] once the turn has been stopped.
    #[inline]
    pub fn check(&self) -> Result<(), SearchError> {
        if self.is_stopped() {
            Err(SearchError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Most recent report waiting in `reports`, if any.
pub fn latest(reports: &Receiver<Action>) -> Option<Action> {
    reports.try_iter().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isolation::Direction;
    use std::time::Duration;

    #[test]
    fn test_latest_report_wins() {
        let (turn, rx, _stop) = Turn::channel(None);
        turn.report(Action::Place(3));
        turn.report(Action::Jump(Direction::NNE));
        assert_eq!(latest(&rx), Some(Action::Jump(Direction::NNE)));
        assert_eq!(latest(&rx), None);
    }

    #[test]
    fn test_stop_flag_interrupts() {
        let (turn, _rx, stop) = Turn::channel(None);
        assert!(turn.check().is_ok());
        stop.store(true, Ordering::Relaxed);
        assert!(matches!(turn.check(), Err(SearchError::Interrupted)));
    }

    #[test]
    fn test_deadline_interrupts() {
        let past = Instant::now() - Duration::from_millis(1);
        let (turn, _rx, stop) = Turn::channel(Some(past));
        assert!(turn.is_stopped());
        assert!(stop.load(Ordering::Relaxed));

        let future = Instant::now() + Duration::from_secs(60);
        let (turn, _rx, _stop) = Turn::channel(Some(future));
        assert!(!turn.is_stopped());
    }

    #[test]
    fn test_dropped_receiver_stops_turn() {
        let (turn, rx, _stop) = Turn::channel(None);
        drop(rx);
        turn.report(Action::Place(0));
        assert!(turn.is_stopped());
    }
}
