//! Prelude module for common imports.
//!
//! ```
//! use kinetext::prelude::*;
//! ```

// Frame trees
pub use crate::tree::{Block, Children, Decoration, Node, Placed, Token};

// Diffing
pub use crate::diff::{ContentEntry, DiffOp, DiffTree, diff, optimize};

// Lifecycle
pub use crate::lifecycle::{BlockLifecycle, ExtOp, Timeline};

// Render output
pub use crate::render::{Animation, FrameSnapshot, Placement, Template};

// Pipeline
pub use crate::pipeline::{PipelineStats, animate, animate_with_stats};

// Hashing
pub use crate::hash::{ContentHasher, IdGen, hash_parts};

// Error
pub use crate::error::{MotionError, MotionResult};
