//! Exercise content
//!
//! `steps` holds the building blocks, `catalog` the course itself.

pub mod catalog;
pub mod steps;

pub use catalog::catalog;
pub use steps::{Check, Plan, Setup};
