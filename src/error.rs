use std::fmt::Formatter;
use tokio::task::JoinError;

pub enum LoggerError {
    /// The resolved sink rejected the write.
    Write(std::io::Error),
    InvalidLevel(String),
    InvalidColorMode(String),
    /// An awaited [`spawn_log`](crate::Logger::spawn_log) task panicked or was aborted.
    Join(JoinError),
}

fn format_logger_error(l: &LoggerError, fmt: &mut Formatter) -> std::fmt::Result {
    match l {
        LoggerError::Write(e) => {
            write!(fmt, "WriteError: {}", e)
        }
        LoggerError::InvalidLevel(level) => {
            write!(fmt, "Invalid Level: {:?}", level)
        }
        LoggerError::InvalidColorMode(mode) => {
            write!(fmt, "Invalid Color Mode: {:?}", mode)
        }
        LoggerError::Join(e) => {
            write!(fmt, "JoinError: {}", e)
        }
    }
}

impl LoggerError {
    /// The underlying I/O error, if this failure came from the sink.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            LoggerError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> Self {
        LoggerError::Write(e)
    }
}

impl From<JoinError> for LoggerError {
    fn from(e: JoinError) -> Self {
        LoggerError::Join(e)
    }
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        format_logger_error(self, f)
    }
}

impl std::fmt::Debug for LoggerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        format_logger_error(self, f)
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::Write(e) => Some(e),
            LoggerError::Join(e) => Some(e),
            LoggerError::InvalidLevel(_) | LoggerError::InvalidColorMode(_) => None,
        }
    }
}
