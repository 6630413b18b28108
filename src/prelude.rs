use std::io::IsTerminal;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub use crate::error::LoggerError;
pub use crate::levels::{ColorMode, LogLevel};
use crate::levels::paint;
pub use crate::sync::{min_level, set_min_level, Threshold};

/// Prefix used by [`Logger::default`].
pub const DEFAULT_PREFIX: &str = "None";

/// RFC 1123 style, always rendered in UTC.
const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A caller supplied output stream, shared between clones of a [`Logger`].
pub type SinkHandle = Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>;

/// Where a line at a given level ends up.
pub enum Target<'a> {
    Sink(&'a SinkHandle),
    Stderr,
    Stdout,
}

impl Target<'_> {
    pub fn is_sink(&self) -> bool {
        matches!(self, Target::Sink(_))
    }
}

impl core::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Target::Sink(_) => f.write_str("Sink"),
            Target::Stderr => f.write_str("Stderr"),
            Target::Stdout => f.write_str("Stdout"),
        }
    }
}

/// Writes timestamped, leveled lines tagged with a prefix.
///
/// Every line has the shape
///
/// ```text
/// <timestamp> : (<Level>@<prefix>) » <message>
/// ```
///
/// where the `Level@prefix` tag is colorized by level. A line is only written when its
/// level is at or above the logger's [`Threshold`].
///
/// Coloring is decided per line from the stream it goes to, see [`ColorMode`]. With the
/// default [`ColorMode::Auto`], sink overrides such as files never receive escape codes.
///
/// Without a sink override, `Error` and `Fatal` lines go to stderr and everything else
/// to stdout.
#[derive(Clone)]
pub struct Logger {
    level: LogLevel,
    prefix: String,
    sink: Option<SinkHandle>,
    threshold: Threshold,
    color: ColorMode,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info, DEFAULT_PREFIX)
    }
}

impl core::fmt::Debug for Logger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("prefix", &self.prefix)
            .field("sink", &self.sink.is_some())
            .field("threshold", &self.threshold.get())
            .field("color", &self.color)
            .finish()
    }
}

impl Logger {
    /// Constructs a new `Logger` bound to the process-wide threshold.
    ///
    /// # Arguments
    ///
    /// * `level` - Level used by [`log`](Logger::log) when no explicit level is given.
    /// * `prefix` - Label naming the owner of this logger.
    pub fn new(level: LogLevel, prefix: impl Into<String>) -> Self {
        Self {
            level,
            prefix: prefix.into(),
            sink: None,
            threshold: Threshold::global(),
            color: ColorMode::Auto,
        }
    }

    /// Sends every line of this logger to `sink`, whatever its level.
    pub fn with_sink<W>(mut self, sink: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        self.sink = Some(Arc::new(Mutex::new(Box::new(sink))));
        self
    }

    /// Same as [`with_sink`](Logger::with_sink), for a sink already shared with other loggers.
    pub fn with_shared_sink(mut self, sink: SinkHandle) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Binds this logger to `threshold` instead of the process-wide one.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    /// Resolves the output for a line at `level`: the sink override if set, stderr for
    /// `Error` and `Fatal`, stdout otherwise.
    pub fn target(&self, level: LogLevel) -> Target<'_> {
        if let Some(sink) = &self.sink {
            Target::Sink(sink)
        } else if level.is_error_stream() {
            Target::Stderr
        } else {
            Target::Stdout
        }
    }

    /// Whether a line headed for `target` gets a colored tag.
    pub fn colorize(&self, target: &Target<'_>) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
                    && match target {
                        Target::Sink(_) => false,
                        Target::Stderr => std::io::stderr().is_terminal(),
                        Target::Stdout => std::io::stdout().is_terminal(),
                    }
            }
        }
    }

    /// Renders one complete line, trailing newline included.
    pub fn format_line(
        &self, level: LogLevel, message: &str, at: DateTime<Utc>, colorize: bool
    ) -> String {
        let mut tag = format!("{}@{}", level.name(), self.prefix);
        if colorize {
            tag = paint(&tag, level.color());
        }
        format!("{} : ({}) » {}\n", timestamp(at), tag, message)
    }

    /// Logs `message` at `level`, or at the logger's own level when `level` is `None`.
    ///
    /// Lines below the threshold are dropped and the call returns `Ok(())` without
    /// touching any stream.
    ///
    /// # Returns
    ///
    /// A result indicating success or containing a `LoggerError` if the sink write failed.
    pub async fn log(&self, message: &str, level: Option<LogLevel>) -> Result<(), LoggerError> {
        let level = level.unwrap_or(self.level);

        if !self.threshold.allows(level) {
            #[cfg(feature = "DEBUG")]
            level.debug_suppressed(self.threshold.get(), &self.prefix);
            return Ok(());
        }

        let target = self.target(level);
        let line = self.format_line(level, message, Utc::now(), self.colorize(&target));

        match target {
            Target::Sink(sink) => {
                let mut sink = sink.lock().await;
                write_line(&mut *sink, line.as_bytes()).await
            }
            Target::Stderr => write_line(&mut tokio::io::stderr(), line.as_bytes()).await,
            Target::Stdout => write_line(&mut tokio::io::stdout(), line.as_bytes()).await,
        }
    }

    pub async fn trace(&self, message: &str) -> Result<(), LoggerError> {
        self.log(message, Some(LogLevel::Trace)).await
    }

    pub async fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(message, Some(LogLevel::Info)).await
    }

    pub async fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(message, Some(LogLevel::Warn)).await
    }

    pub async fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(message, Some(LogLevel::Error)).await
    }

    pub async fn fatal(&self, message: &str) -> Result<(), LoggerError> {
        self.log(message, Some(LogLevel::Fatal)).await
    }

    /// Logs on a separate tokio task.
    ///
    /// The handle may be awaited to learn whether the write succeeded; inside a function
    /// returning `Result<_, LoggerError>`, `handle.await??` surfaces both a failed task
    /// ([`LoggerError::Join`]) and a failed write. Dropping the handle detaches the task,
    /// and any write failure is then lost.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_log(
        &self, message: impl Into<String>, level: Option<LogLevel>
    ) -> JoinHandle<Result<(), LoggerError>> {
        let logger = self.clone();
        let message = message.into();
        tokio::spawn(async move {
            logger.log(&message, level).await
        })
    }

    /// All panics after this call will be logged at `Fatal`.
    ///
    /// The line is written before the hook returns, so it survives a panic that unwinds
    /// out of `block_on` and drops the runtime. Write failures inside the hook are ignored.
    pub fn log_panics(&self) {
        let logger = self.clone();
        std::panic::set_hook(Box::new(move |info| {
            logger.send_panic(info);
        }));
    }

    fn send_panic(&self, info: &std::panic::PanicHookInfo<'_>) {
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Panic with unknown payload".to_string()
        };

        let message = match info.location() {
            Some(location) => format!("PANIC at '{}': {}", location, payload),
            None => format!("PANIC: {}", payload),
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            // A runtime cannot be blocked on from inside itself, so write from a
            // fresh thread and wait for it.
            std::thread::scope(|s| {
                s.spawn(|| self.log_fatal_blocking(&message));
            });
        } else {
            self.log_fatal_blocking(&message);
        }
    }

    fn log_fatal_blocking(&self, message: &str) {
        if let Ok(rt) = tokio::runtime::Builder::new_current_thread().enable_all().build() {
            let _ = rt.block_on(self.log(message, Some(LogLevel::Fatal)));
        }
    }
}

/// Renders `at` the way it appears at the start of every line.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[inline]
async fn write_line<W>(writer: &mut W, bytes: &[u8]) -> Result<(), LoggerError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}
