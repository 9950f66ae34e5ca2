//! # mcastmap common
//!
//! Types and helpers shared by every mcastmap crate: the fact records the
//! parsers emit, port-name normalisation, runtime configuration and the
//! logging macros the CLI formatter knows how to draw.

pub mod config;
pub mod facts;
pub mod log;
pub mod port;

#[doc(hidden)]
pub use tracing as __tracing;
