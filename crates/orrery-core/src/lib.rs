//! Orrery Core
//!
//! Shared building blocks for the Orrery engine crates: hashed collections,
//! generational handles, logging and profiling setup, and engine configuration.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;
