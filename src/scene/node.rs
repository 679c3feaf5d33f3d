//! Sprite nodes

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockState;
use crate::sim::BodyId;

/// Stable node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    /// One-third gray
    pub const DARK_GRAY: Color = Color([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0]);

    #[inline]
    pub fn rgba(self) -> [f32; 4] {
        self.0
    }
}

/// 1-based grid cell of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub column: u32,
    pub row: u32,
}

impl GridCell {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

/// What a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Ball,
    Block { cell: GridCell, state: BlockState },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Ball => "ball",
            NodeKind::Block { .. } => "block",
        }
    }
}

/// A colored rectangle in the scene, optionally backed by a physics body
#[derive(Debug, Clone)]
pub struct SpriteNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub color: Color,
    pub size: Vec2,
    /// Center position, synced from the body after each tick
    pub position: Vec2,
    pub body: Option<BodyId>,
}

impl SpriteNode {
    pub fn new(id: NodeId, kind: NodeKind, color: Color, size: Vec2) -> Self {
        Self {
            id,
            kind,
            color,
            size,
            position: Vec2::ZERO,
            body: None,
        }
    }

    /// Node name: "Ball", or the block's lifecycle name
    pub fn name(&self) -> &'static str {
        match self.kind {
            NodeKind::Ball => "Ball",
            NodeKind::Block { state, .. } => state.name(),
        }
    }

    pub fn block_state(&self) -> Option<BlockState> {
        match self.kind {
            NodeKind::Block { state, .. } => Some(state),
            NodeKind::Ball => None,
        }
    }

    pub fn cell(&self) -> Option<GridCell> {
        match self.kind {
            NodeKind::Block { cell, .. } => Some(cell),
            NodeKind::Ball => None,
        }
    }
}
