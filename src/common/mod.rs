//! Common types, traits, and error definitions for rust_pathfinder
//!
//! This module provides the foundational building blocks shared by the
//! grid, the search engine and its driver.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
