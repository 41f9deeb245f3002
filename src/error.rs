use crate::executor::PanicInfo;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The task never produced an outcome: it was submitted after shutdown,
    /// discarded from the queue by shutdown, or the wait was interrupted by
    /// shutdown.
    #[error("task result unavailable: pool is shutting down")]
    Unavailable,

    #[error("task panicked: {0}")]
    TaskPanicked(PanicInfo),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// True for the sentinel outcome produced by shutdown.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable)
    }

    /// Panic message, if the task panicked.
    pub fn panic_message(&self) -> Option<&str> {
        match self {
            Error::TaskPanicked(info) => Some(&info.message),
            _ => None,
        }
    }
}
