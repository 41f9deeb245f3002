use super::task::TaskId;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Payload of a panic raised by a task, reduced to its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicInfo {
    pub message: String,
}

impl PanicInfo {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        Self { message }
    }
}

impl fmt::Display for PanicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Runs `f`, turning an unwind into a `PanicInfo` so it stays local to the
/// task that raised it.
pub(crate) fn capture<F, R>(id: TaskId, f: F) -> Result<R, PanicInfo>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let info = PanicInfo::from_payload(payload);
        tracing::error!(task = ?id, message = %info.message, "task panicked");
        info
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_success() {
        let result = capture(TaskId::next(), || 42);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_capture_str_panic() {
        let result: Result<(), _> = capture(TaskId::next(), || panic!("test panic"));
        assert_eq!(result.unwrap_err().message, "test panic");
    }

    #[test]
    fn test_capture_formatted_panic() {
        let n = 7;
        let result: Result<(), _> = capture(TaskId::next(), || panic!("bad value {}", n));
        assert_eq!(result.unwrap_err().to_string(), "bad value 7");
    }

    #[test]
    fn test_capture_unknown_payload() {
        let result: Result<(), _> =
            capture(TaskId::next(), || std::panic::panic_any(17u8));
        assert_eq!(result.unwrap_err().message, "Unknown panic");
    }
}
