//! Shared foundation for the NLM chat gateway.
//!
//! Provides the pieces every service-side crate needs:
//! - Unified error type (`error`)
//! - Typed configuration with file + environment loading (`config`)
//! - Structured logging initialization (`logging`)

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
