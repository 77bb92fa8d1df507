//! Optimized allocation and collection types for Orrery.
//!
//! This module provides:
//! - Re-exports of hash collections using AHash
//! - SparseSet data structure for generational indices

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
