//! Pure algorithms: LCS sequence diffing and positional matching.
//!
//! Nothing in this module depends on the diff-tree or lifecycle types;
//! both files are free functions over value inputs.

pub mod lcs;
pub mod matcher;

pub use lcs::{Edit, LcsResult, diff_sequences};
pub use matcher::pick_alternative;
