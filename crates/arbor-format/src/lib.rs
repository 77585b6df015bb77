//! # arbor-format
//!
//! Problem documents and instance generation for arbor.
//!
//! Supports:
//! - **Packing problems**: binary programs `max/min c·x` subject to
//!   `A x <= b` with non-negative `A` and `b`, stored as JSON
//! - **Generators**: seeded multiple-knapsack and independent-set instances

pub mod generator;
pub mod problem;

pub use generator::{
    IndependentSetGenerator, IndependentSetParams, InstanceGenerator, MultipleKnapsackGenerator,
    MultipleKnapsackParams,
};
pub use problem::{PackingProblem, Row, Sense, VariableDef};
