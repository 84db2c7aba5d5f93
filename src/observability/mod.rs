//! Observability subsystem
//!
//! Structured logging only: call sites use the `log` macros and
//! [`init`] routes them to [`JsonLogger`].

mod logger;

pub use logger::{init, JsonLogger};
