//! Error types for kinetext.
//!
//! Faults abort the whole pipeline run: a corrupted timeline cannot be
//! safely rendered, and the input is deterministic so retrying is
//! pointless. Each variant carries enough context (frame index, hash,
//! position) to diagnose the upstream data problem. The matcher
//! returning no candidate and the pool releasing an unbound timeline
//! are normal outcomes, not errors.

use thiserror::Error;

/// Errors that can abort a pipeline run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// Both sides of a container diff were absent. Indicates a caller
    /// bug; there is no valid output.
    #[error("empty diff: both `from` and `to` containers are absent")]
    EmptyDiff,

    /// An add or move targeted a grid position already holding an open
    /// timeline, or a delete/move referenced a position with none.
    /// Indicates upstream frame data with overlapping entities.
    #[error(
        "position collision at frame {frame}: {kind} for hash {hash} at ({x}, {y})"
    )]
    PositionCollision {
        /// Frame index where the collision was detected
        frame: usize,
        /// What the offending operation was trying to do
        kind: CollisionKind,
        /// Content hash of the offending item
        hash: u32,
        /// Grid position of the offending item
        x: i32,
        /// Grid position of the offending item
        y: i32,
    },
}

/// Which lifecycle operation hit an invalid position key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// An add found the position already occupied
    AddOccupied,
    /// A move's target position was already occupied
    MovOccupied,
    /// A delete or move found no open timeline at the position
    MissingTimeline,
}

impl std::fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddOccupied => write!(f, "add into occupied position"),
            Self::MovOccupied => write!(f, "move into occupied position"),
            Self::MissingTimeline => write!(f, "delete/move of missing timeline"),
        }
    }
}

/// Result type alias for pipeline operations.
pub type MotionResult<T> = Result<T, MotionError>;
