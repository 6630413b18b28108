#![cfg_attr(docsrs, feature(doc_cfg))]

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
//! <br><br>
//!
//! ## You're probably looking for:
//! * [`Logger`](Logger)
//! * [`Threshold`](Threshold)

pub mod prelude;
pub mod error;
pub mod levels;
pub(crate) mod sync;

pub use prelude::{
    ColorMode, Logger, LogLevel, LoggerError, Target, Threshold, min_level, set_min_level
};
