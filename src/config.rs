use crate::error::{Error, Result};
use std::time::Duration;

/// Nesting depth at which submissions start running inline.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 5;

const MAX_THREADS: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Worker count. `None` or `Some(0)` means hardware parallelism.
    pub num_threads: Option<usize>,
    pub max_recursion_depth: usize,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub pin_workers: bool,
    /// Upper bound on how long a waiting caller parks before re-polling
    /// its handle.
    pub helper_park_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            thread_name_prefix: "depth-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            pin_workers: false,
            helper_park_interval: Duration::from_millis(10),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n > MAX_THREADS {
                return Err(Error::config(format!(
                    "num_threads too large (max {})",
                    MAX_THREADS
                )));
            }
        }

        if self.helper_park_interval.is_zero() {
            return Err(Error::config("helper_park_interval must be > 0"));
        }

        if let Some(0) = self.stack_size {
            return Err(Error::config("stack_size must be > 0"));
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        match self.num_threads {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.config.max_recursion_depth = depth;
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.config.pin_workers = pin;
        self
    }

    pub fn helper_park_interval(mut self, interval: Duration) -> Self {
        self.config.helper_park_interval = interval;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
