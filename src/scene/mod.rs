//! Scene setup and contact handling
//!
//! The scene owns the physics world and the sprite nodes attached to its
//! bodies. It builds the arena, the ball and the block grid, drives the world
//! at a fixed timestep and acts as the world's contact delegate: a ball
//! touching a block damages it, a second touch removes it.

pub mod block;
pub mod node;
pub mod snapshot;

use std::collections::BTreeMap;

use glam::Vec2;

pub use block::BlockState;
pub use node::{Color, GridCell, NodeId, NodeKind, SpriteNode};
pub use snapshot::{BallSnapshot, BlockSnapshot, SceneSnapshot};

use crate::config::SceneConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::{SceneError, SceneResult};
use crate::sim::{
    Aabb, BodyId, CategoryMask, Contact, ContactDelegate, ContactKind, PhysicsBody, PhysicsWorld,
    classify_contact,
};

/// Things that happened in the scene, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    BlockDamaged { node: NodeId, cell: GridCell },
    BlockRemoved { node: NodeId, cell: GridCell, remaining: usize },
    ArenaCleared,
}

/// The arena, its ball and blocks, and the world they live in
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    world: PhysicsWorld,
    /// Nodes sorted by id for deterministic iteration
    nodes: BTreeMap<NodeId, SpriteNode>,
    ball: NodeId,
    boundary: BodyId,
    next_node_id: u32,
    accumulator: f32,
    events: Vec<SceneEvent>,
}

impl Scene {
    /// Validate the config and lay out the arena, ball and block grid
    pub fn new(config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;

        let mut world = PhysicsWorld::new(config.gravity);

        // Invisible barrier around the scene to keep the ball inside
        let mut bound = PhysicsBody::edge_loop(Aabb::from_frame(Vec2::ZERO, config.arena_size));
        bound.friction = config.boundary_friction;
        bound.restitution = config.boundary_restitution;
        let boundary = world.add_body(bound);

        let mut scene = Self {
            config,
            world,
            nodes: BTreeMap::new(),
            ball: NodeId(0),
            boundary,
            next_node_id: 1,
            accumulator: 0.0,
            events: Vec::new(),
        };

        scene.ball = scene.spawn_ball();
        scene.spawn_block_grid();

        log::info!(
            "Scene ready: {}x{} arena, {} blocks",
            scene.config.arena_size.x,
            scene.config.arena_size.y,
            scene.block_count()
        );

        Ok(scene)
    }

    fn next_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Insert a node and its body, linking the two
    fn add_node(&mut self, mut node: SpriteNode, mut body: PhysicsBody) -> NodeId {
        let id = node.id;
        body.node = Some(id);
        body.position = node.position;
        node.body = Some(self.world.add_body(body));
        self.nodes.insert(id, node);
        id
    }

    fn spawn_ball(&mut self) -> NodeId {
        let cfg = self.config.ball.clone();
        let id = self.next_node();

        let mut node = SpriteNode::new(id, NodeKind::Ball, Color::WHITE, cfg.size);
        node.position = self.config.arena_size * 0.5;

        let mut body = PhysicsBody::rect(cfg.size);
        body.category = CategoryMask::BALL;
        body.contact_test = CategoryMask::BLOCK;
        body.friction = cfg.friction;
        body.linear_damping = cfg.linear_damping;
        body.restitution = cfg.restitution;
        body.velocity = cfg.velocity;

        self.add_node(node, body)
    }

    /// Place copies of the block template in a grid, 1-based cells
    fn spawn_block_grid(&mut self) {
        let grid = self.config.blocks.clone();

        let mut template = PhysicsBody::rect(grid.block_size);
        template.category = CategoryMask::BLOCK;
        template.dynamic = false;
        template.friction = grid.friction;
        template.restitution = grid.restitution;

        for row in 1..=grid.rows {
            for column in 1..=grid.columns {
                let cell = GridCell::new(column, row);
                let id = self.next_node();
                let state = BlockState::Intact;
                let mut node = SpriteNode::new(
                    id,
                    NodeKind::Block { cell, state },
                    state.color(),
                    grid.block_size,
                );
                node.position = grid.cell_center(column, row);
                self.add_node(node, template.clone());
            }
        }
    }

    /// Feed a frame delta through the fixed-timestep accumulator.
    ///
    /// Returns the number of simulation ticks that ran.
    pub fn advance(&mut self, frame_dt: f32) -> SceneResult<u32> {
        if !frame_dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", frame_dt);
            return Ok(0);
        }
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick()?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        Ok(substeps)
    }

    /// Advance the world by one fixed step and deliver its contacts
    pub fn tick(&mut self) -> SceneResult<()> {
        let contacts = self.world.step(SIM_DT);

        for contact in &contacts {
            // A block removed earlier in this batch can't be hit again
            if self.world.body(contact.body_a).is_none() || self.world.body(contact.body_b).is_none() {
                log::debug!(
                    "Skipping stale contact {} / {}",
                    contact.body_a,
                    contact.body_b
                );
                continue;
            }
            self.dispatch(contact)?;
        }

        self.sync_nodes();
        Ok(())
    }

    /// Copy body positions onto their nodes
    fn sync_nodes(&mut self) {
        for node in self.nodes.values_mut() {
            if let Some(body) = node.body.and_then(|id| self.world.body(id)) {
                node.position = body.position;
            }
        }
    }

    fn node_for_body(&self, body: BodyId) -> SceneResult<NodeId> {
        self.world
            .body(body)
            .ok_or(SceneError::MissingBody(body))?
            .node
            .ok_or(SceneError::MissingNode(body))
    }

    /// Advance a block one step through its lifecycle
    fn hit_block(&mut self, body: BodyId, id: NodeId) -> SceneResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::MissingNode(body))?;
        let NodeKind::Block { cell, state } = node.kind else {
            return Err(SceneError::UnexpectedNode {
                node: id,
                found: node.kind.label(),
                expected: "block",
            });
        };

        match state.hit() {
            Some(BlockState::Damaged) => {
                node.kind = NodeKind::Block {
                    cell,
                    state: BlockState::Damaged,
                };
                node.color = BlockState::Damaged.color();
                log::debug!("Block ({}, {}) damaged", cell.column, cell.row);
                self.events.push(SceneEvent::BlockDamaged { node: id, cell });
            }
            Some(BlockState::Removed) => {
                self.nodes.remove(&id);
                self.world.remove_body(body);
                let remaining = self.block_count();
                log::debug!(
                    "Block ({}, {}) removed, {} left",
                    cell.column,
                    cell.row,
                    remaining
                );
                self.events.push(SceneEvent::BlockRemoved {
                    node: id,
                    cell,
                    remaining,
                });
                if remaining == 0 {
                    log::info!("All blocks cleared at tick {}", self.world.time_ticks);
                    self.events.push(SceneEvent::ArenaCleared);
                }
            }
            Some(to @ BlockState::Intact) => {
                return Err(SceneError::InvalidTransition {
                    node: id,
                    from: state,
                    to,
                });
            }
            None => return Err(SceneError::BlockAlreadyRemoved(id)),
        }

        Ok(())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Edge loop body around the arena
    pub fn boundary_body(&self) -> BodyId {
        self.boundary
    }

    pub fn node(&self, id: NodeId) -> Option<&SpriteNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SpriteNode> {
        self.nodes.values()
    }

    pub fn ball(&self) -> Option<&SpriteNode> {
        self.nodes.get(&self.ball)
    }

    pub fn ball_body(&self) -> Option<BodyId> {
        self.ball().and_then(|n| n.body)
    }

    /// Mutable access to the ball's body (reposition, change velocity)
    pub fn ball_body_mut(&mut self) -> Option<&mut PhysicsBody> {
        let id = self.ball_body()?;
        self.world.body_mut(id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &SpriteNode> {
        self.nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::Block { .. }))
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    pub fn block_at(&self, cell: GridCell) -> Option<&SpriteNode> {
        self.blocks().find(|n| n.cell() == Some(cell))
    }

    /// Take queued scene events
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let ball = self.ball_body().and_then(|id| self.world.body(id)).map(|b| BallSnapshot {
            position: b.position,
            velocity: b.velocity,
            speed: b.velocity.length(),
        });

        let blocks: Vec<BlockSnapshot> = self
            .blocks()
            .filter_map(|n| match n.kind {
                NodeKind::Block { cell, state } => Some(BlockSnapshot {
                    cell,
                    state,
                    position: n.position,
                }),
                NodeKind::Ball => None,
            })
            .collect();

        SceneSnapshot {
            tick: self.world.time_ticks,
            ball,
            blocks_remaining: blocks.len(),
            blocks,
        }
    }
}

impl ContactDelegate for Scene {
    fn did_begin(&mut self, contact: &Contact) -> SceneResult<()> {
        match classify_contact(contact.category_a, contact.category_b) {
            ContactKind::BallBlock => {
                let node = self.node_for_body(contact.body_b)?;
                self.hit_block(contact.body_b, node)
            }
            ContactKind::Ignored => {
                log::trace!(
                    "Ignoring contact {} / {} ({:?} / {:?})",
                    contact.body_a,
                    contact.body_b,
                    contact.category_a,
                    contact.category_b
                );
                Ok(())
            }
        }
    }
}
