//! # arbor-base
//!
//! Core types and utilities for the arbor branch-and-bound environments.
//!
//! This crate provides the foundational building blocks used across all other
//! arbor crates, including:
//!
//! - **Types**: variable and node identifiers, solver stages
//! - **Error Types**: unified error handling across solver and environments
//! - **Utilities**: seeded PRNG and numeric helpers

pub mod error;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use types::{NodeNumber, Stage, VarId};
pub use utils::XorShift64;
