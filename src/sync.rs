#[cfg(not(all(test, feature = "loom")))]
use std::sync::{
    Arc,
    atomic::{Ordering, AtomicU8}
};

#[cfg(all(test, feature = "loom"))]
use loom::sync::{
    Arc,
    atomic::{Ordering, AtomicU8}
};

use lazy_static::lazy_static;

use crate::levels::LogLevel;

lazy_static! {
    static ref GLOBAL_THRESHOLD: Threshold = Threshold::new(LogLevel::Trace);
}

/// Shared minimum severity below which loggers stay silent.
///
/// Cloning a `Threshold` yields another handle to the same cell, so a `set` through any
/// clone is seen by every logger holding one. Loggers built with [`Logger::new`] use
/// [`Threshold::global`].
///
/// [`Logger::new`]: crate::Logger::new
#[derive(Clone, Debug)]
pub struct Threshold {
    min: Arc<AtomicU8>,
}

impl Threshold {
    /// A private threshold context, independent of the process-wide one.
    pub fn new(level: LogLevel) -> Self {
        Self {
            min: Arc::new(AtomicU8::new(level.rank())),
        }
    }

    /// The process-wide threshold. Starts at [`LogLevel::Trace`].
    pub fn global() -> Self {
        GLOBAL_THRESHOLD.clone()
    }

    pub fn get(&self) -> LogLevel {
        // Only `set` writes this cell, so the rank is always in range.
        LogLevel::try_from(self.min.load(Ordering::Acquire)).unwrap_or(LogLevel::Trace)
    }

    pub fn set(&self, level: LogLevel) {
        self.min.store(level.rank(), Ordering::Release);
    }

    /// Whether a line at `level` passes this threshold.
    #[inline]
    pub fn allows(&self, level: LogLevel) -> bool {
        level >= self.get()
    }

    /// True when both handles point at the same cell.
    pub fn shares_with(&self, other: &Threshold) -> bool {
        Arc::ptr_eq(&self.min, &other.min)
    }
}

/// Sets the process-wide minimum level.
pub fn set_min_level(level: LogLevel) {
    Threshold::global().set(level);
}

/// Reads the process-wide minimum level.
pub fn min_level() -> LogLevel {
    Threshold::global().get()
}
