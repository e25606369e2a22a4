use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Timers are single-use; a finished one cannot open a new scope.
    #[error("timer {label} has already finished and cannot be entered again")]
    AlreadyFinished { label: String },
}
