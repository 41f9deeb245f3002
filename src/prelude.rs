pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{TaskHandle, ThreadPool};
pub use crate::scheduler::{current_depth, Priority};
