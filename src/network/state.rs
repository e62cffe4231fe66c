//! Connection lifecycle.

/// Lifecycle state of a connection.
///
/// ```text
/// Unopened ──open ok──▶ Open ──close / drop──▶ Closed
///     │
///     └──open error──▶ Failed
/// ```
///
/// `Closed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    #[default]
    Unopened,
    Open,
    Closed,
    Failed,
}

impl State {
    pub fn is_open(&self) -> bool {
        matches!(self, State::Open)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Closed | State::Failed)
    }

    /// The state after an open attempt. Only `Unopened` moves.
    #[cfg(feature = "std")]
    pub(crate) fn after_open(self, succeeded: bool) -> State {
        match (self, succeeded) {
            (State::Unopened, true) => State::Open,
            (State::Unopened, false) => State::Failed,
            (other, _) => other,
        }
    }

    /// The state after a close. `Failed` and `Unopened` never had a handle
    /// to release and stay where they are.
    #[cfg(feature = "std")]
    pub(crate) fn after_close(self) -> State {
        match self {
            State::Open => State::Closed,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn open_transitions() {
        assert_eq!(State::Unopened.after_open(true), State::Open);
        assert_eq!(State::Unopened.after_open(false), State::Failed);
        assert_eq!(State::Closed.after_open(true), State::Closed);
        assert_eq!(State::Failed.after_open(true), State::Failed);
    }

    #[cfg(feature = "std")]
    #[test]
    fn close_is_idempotent() {
        let once = State::Open.after_close();
        assert_eq!(once, State::Closed);
        assert_eq!(once.after_close(), State::Closed);
        assert_eq!(State::Failed.after_close(), State::Failed);
    }

    #[test]
    fn terminal_states() {
        assert!(State::Closed.is_terminal());
        assert!(State::Failed.is_terminal());
        assert!(!State::Open.is_terminal());
        assert!(!State::Unopened.is_terminal());
    }
}
