//! Test support for the mcastmap integration tests.

pub mod fixtures;
