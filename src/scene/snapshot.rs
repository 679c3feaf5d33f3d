//! Serializable view of a scene

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockState;
use super::node::GridCell;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub cell: GridCell,
    pub state: BlockState,
    pub position: Vec2,
}

/// Point-in-time state of the scene (blocks sorted by node id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub tick: u64,
    pub ball: Option<BallSnapshot>,
    pub blocks: Vec<BlockSnapshot>,
    pub blocks_remaining: usize,
}
