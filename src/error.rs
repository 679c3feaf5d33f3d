//! Error types for the playground.
//!
//! Fallible operations return `SceneResult<T>`.

use thiserror::Error;

use crate::scene::{BlockState, NodeId};
use crate::sim::BodyId;

/// Unified error type for scene setup and contact handling.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `SceneConfig`.
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A contact or lookup referenced a body the world doesn't have.
    #[error("No physics body with id {0}")]
    MissingBody(BodyId),

    /// A contact body has no sprite node attached.
    #[error("Physics body {0} has no node attached")]
    MissingNode(BodyId),

    /// A contact body's node is not the kind the handler expects.
    #[error("{node} is a {found}, expected a {expected}")]
    UnexpectedNode {
        node: NodeId,
        found: &'static str,
        expected: &'static str,
    },

    /// A hit was applied to a block past the end of its lifecycle.
    #[error("Block at {0} was already removed")]
    BlockAlreadyRemoved(NodeId),

    /// The block lifecycle produced a step that isn't forward.
    #[error("Block at {node} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        node: NodeId,
        from: BlockState,
        to: BlockState,
    },
}

/// Convenience alias for `Result<T, SceneError>`.
pub type SceneResult<T> = Result<T, SceneError>;
