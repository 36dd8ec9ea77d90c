//! Structured logging for the exchange simulator.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("simforge", LogFormat::Pretty)?;
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
