//! Fixed timestep physics world
//!
//! Brute-force pair testing over a handful of bodies: integrate dynamic
//! bodies in substeps, push overlapping pairs apart, exchange impulses and
//! report begin/end contacts for pairs whose masks ask for them.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::body::{BodyId, BodyShape, PhysicsBody};
use super::collision::{
    CollisionResult, contact_impulse, mix_friction, mix_restitution, rect_edge_loop_collision,
    rect_rect_collision,
};
use super::contact::{Contact, ContactPhase};

/// Maximum collision substeps per step
pub const MAX_COLLISION_SUBSTEPS: usize = 20;
/// Extra distance added when separating overlapping bodies
pub const SEPARATION_SLOP: f32 = 0.5;

/// Where a touching pair met during a step (normal points from B toward A)
#[derive(Debug, Clone, Copy)]
struct Touch {
    point: Vec2,
    normal: Vec2,
}

/// The physics world: gravity, bodies and contact bookkeeping
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub gravity: Vec2,
    /// Bodies sorted by id for deterministic iteration
    bodies: Vec<PhysicsBody>,
    /// Canonical (A, B) pairs touching during the previous step
    touching: BTreeSet<(BodyId, BodyId)>,
    next_id: u32,
    /// Steps taken so far
    pub time_ticks: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, -9.8))
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
            time_ticks: 0,
        }
    }

    /// Add a body, assigning it a fresh id
    pub fn add_body(&mut self, mut body: PhysicsBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body and forget any contacts it was part of
    pub fn remove_body(&mut self, id: BodyId) -> Option<PhysicsBody> {
        let idx = self.index_of(id)?;
        self.touching.retain(|&(a, b)| a != id && b != id);
        Some(self.bodies.remove(idx))
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.index_of(id).map(|idx| &self.bodies[idx])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.index_of(id).map(move |idx| &mut self.bodies[idx])
    }

    pub fn bodies(&self) -> impl Iterator<Item = &PhysicsBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Whether the pair raises contact events at all
    pub fn is_contact_tested(a: &PhysicsBody, b: &PhysicsBody) -> bool {
        a.tests_contact_with(b) || b.tests_contact_with(a)
    }

    /// Canonical order for a pair: the tester first, else lower id first
    pub fn canonical_pair(a: &PhysicsBody, b: &PhysicsBody) -> (BodyId, BodyId) {
        match (a.tests_contact_with(b), b.tests_contact_with(a)) {
            (true, false) => (a.id, b.id),
            (false, true) => (b.id, a.id),
            _ if a.id <= b.id => (a.id, b.id),
            _ => (b.id, a.id),
        }
    }

    /// Number of substeps so no dynamic body moves more than 0.3 of its
    /// smallest half-extent per substep
    fn substep_count(&self, dt: f32) -> usize {
        self.bodies
            .iter()
            .filter(|b| b.dynamic)
            .map(|b| {
                let step_size = b.min_half_extent() * 0.3;
                let move_dist = b.velocity.length() * dt;
                if step_size > 0.0 && step_size.is_finite() {
                    (move_dist / step_size).ceil() as usize
                } else {
                    1
                }
            })
            .max()
            .unwrap_or(1)
            .clamp(1, MAX_COLLISION_SUBSTEPS)
    }

    /// Advance the world by `dt` and return the contacts that began or ended
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.time_ticks += 1;

        let gravity = self.gravity;
        for body in self.bodies.iter_mut().filter(|b| b.dynamic) {
            if body.affected_by_gravity {
                body.velocity += gravity * dt;
            }
            if body.linear_damping > 0.0 {
                body.velocity *= 1.0 / (1.0 + dt * body.linear_damping);
            }
        }

        let num_steps = self.substep_count(dt);
        let step_dt = dt / num_steps as f32;
        let mut touched: BTreeMap<(BodyId, BodyId), Touch> = BTreeMap::new();

        for _step in 0..num_steps {
            for body in self.bodies.iter_mut().filter(|b| b.dynamic) {
                body.position += body.velocity * step_dt;
            }

            for i in 0..self.bodies.len() {
                if !self.bodies[i].dynamic {
                    continue;
                }
                for j in 0..self.bodies.len() {
                    // Dynamic pairs are handled once, from the lower index
                    if i == j || (self.bodies[j].dynamic && j < i) {
                        continue;
                    }
                    self.collide_pair(i, j, &mut touched);
                }
            }
        }

        self.collect_events(touched)
    }

    /// Detect and resolve body `i` (dynamic) against body `j`
    fn collide_pair(
        &mut self,
        i: usize,
        j: usize,
        touched: &mut BTreeMap<(BodyId, BodyId), Touch>,
    ) {
        let a_box = self.bodies[i].aabb();
        let results: Vec<CollisionResult> = match self.bodies[j].shape {
            BodyShape::EdgeLoop { frame } => rect_edge_loop_collision(&a_box, &frame),
            BodyShape::Rect { .. } => {
                let result = rect_rect_collision(&a_box, &self.bodies[j].aabb());
                if result.hit { vec![result] } else { Vec::new() }
            }
        };
        if results.is_empty() {
            return;
        }

        let (a, b) = (&self.bodies[i], &self.bodies[j]);
        if Self::is_contact_tested(a, b) {
            let key = Self::canonical_pair(a, b);
            let flip = key.0 != a.id;
            for result in &results {
                let normal = if flip { -result.normal } else { result.normal };
                touched.insert(
                    key,
                    Touch {
                        point: result.point,
                        normal,
                    },
                );
            }
        }

        let moves_a = a.collides_with(b);
        let moves_b = b.dynamic && b.collides_with(a);
        if !moves_a && !moves_b {
            return;
        }

        let restitution = mix_restitution(a.restitution, b.restitution);
        let friction = mix_friction(a.friction, b.friction);
        let inv_a = if moves_a { a.inv_mass() } else { 0.0 };
        let inv_b = if moves_b { b.inv_mass() } else { 0.0 };
        let share_a = if moves_b && moves_a { 0.5 } else if moves_a { 1.0 } else { 0.0 };

        for result in results {
            let push = result.penetration + SEPARATION_SLOP;
            let response = contact_impulse(
                self.bodies[i].velocity,
                inv_a,
                self.bodies[j].velocity,
                inv_b,
                result.normal,
                restitution,
                friction,
            );

            let body_a = &mut self.bodies[i];
            body_a.position += result.normal * push * share_a;
            body_a.velocity += response.delta_a;

            let body_b = &mut self.bodies[j];
            if moves_b {
                body_b.position -= result.normal * push * (1.0 - share_a);
                body_b.velocity += response.delta_b;
            }
        }
    }

    /// Diff this step's touching pairs against the previous step's
    fn collect_events(&mut self, touched: BTreeMap<(BodyId, BodyId), Touch>) -> Vec<Contact> {
        let mut events = Vec::new();

        for (&(a, b), touch) in &touched {
            if self.touching.contains(&(a, b)) {
                continue;
            }
            if let (Some(body_a), Some(body_b)) = (self.body(a), self.body(b)) {
                events.push(Contact {
                    phase: ContactPhase::Begin,
                    body_a: a,
                    body_b: b,
                    category_a: body_a.category,
                    category_b: body_b.category,
                    point: touch.point,
                    normal: touch.normal,
                });
            }
        }

        for &(a, b) in &self.touching {
            if touched.contains_key(&(a, b)) {
                continue;
            }
            if let (Some(body_a), Some(body_b)) = (self.body(a), self.body(b)) {
                events.push(Contact {
                    phase: ContactPhase::End,
                    body_a: a,
                    body_b: b,
                    category_a: body_a.category,
                    category_b: body_b.category,
                    point: (body_a.position + body_b.position) * 0.5,
                    normal: Vec2::ZERO,
                });
            }
        }

        self.touching = touched.into_keys().collect();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Aabb;
    use crate::sim::category::CategoryMask;

    fn elastic_ball(position: Vec2, velocity: Vec2) -> PhysicsBody {
        let mut ball = PhysicsBody::rect(Vec2::splat(50.0));
        ball.position = position;
        ball.velocity = velocity;
        ball.category = CategoryMask::BALL;
        ball.contact_test = CategoryMask::BLOCK;
        ball.friction = 0.0;
        ball.restitution = 1.0;
        ball.linear_damping = 0.0;
        ball
    }

    fn static_block(position: Vec2) -> PhysicsBody {
        let mut block = PhysicsBody::rect(Vec2::new(150.0, 50.0));
        block.position = position;
        block.category = CategoryMask::BLOCK;
        block.dynamic = false;
        block.friction = 0.0;
        block.restitution = 1.0;
        block
    }

    fn arena() -> PhysicsBody {
        let mut edge = PhysicsBody::edge_loop(Aabb::from_frame(Vec2::ZERO, Vec2::new(1920.0, 1080.0)));
        edge.friction = 0.0;
        edge.restitution = 1.0;
        edge
    }

    #[test]
    fn test_body_ids_are_sequential() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.add_body(arena());
        let b = world.add_body(static_block(Vec2::new(100.0, 100.0)));
        assert_eq!(a, BodyId(1));
        assert_eq!(b, BodyId(2));
        assert!(world.remove_body(a).is_some());
        assert!(world.body(a).is_none());
        assert!(world.body(b).is_some());
    }

    #[test]
    fn test_gravity_accelerates_dynamic_bodies_only() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -100.0));
        let mut ball = elastic_ball(Vec2::new(500.0, 500.0), Vec2::ZERO);
        ball.affected_by_gravity = true;
        let ball = world.add_body(ball);
        let block = world.add_body(static_block(Vec2::new(100.0, 100.0)));

        world.step(0.5);
        assert!(world.body(ball).map(|b| b.velocity.y).unwrap_or(0.0) < -49.0);
        assert_eq!(world.body(block).map(|b| b.velocity), Some(Vec2::ZERO));
    }

    #[test]
    fn test_canonical_pair_puts_tester_first() {
        let mut ball = elastic_ball(Vec2::ZERO, Vec2::ZERO);
        ball.id = BodyId(9);
        let mut block = static_block(Vec2::ZERO);
        block.id = BodyId(2);

        assert_eq!(PhysicsWorld::canonical_pair(&ball, &block), (BodyId(9), BodyId(2)));
        assert_eq!(PhysicsWorld::canonical_pair(&block, &ball), (BodyId(9), BodyId(2)));
    }

    #[test]
    fn test_ball_bounces_off_block_with_begin_then_end() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.add_body(arena());
        let ball = world.add_body(elastic_ball(Vec2::new(160.0, 300.0), Vec2::new(0.0, -1000.0)));
        let block = world.add_body(static_block(Vec2::new(160.0, 180.0)));

        let mut begins = Vec::new();
        let mut ends = Vec::new();
        for _ in 0..30 {
            for contact in world.step(1.0 / 120.0) {
                match contact.phase {
                    ContactPhase::Begin => begins.push(contact),
                    ContactPhase::End => ends.push(contact),
                }
            }
        }

        assert_eq!(begins.len(), 1);
        assert_eq!(ends.len(), 1);
        assert_eq!((begins[0].body_a, begins[0].body_b), (ball, block));
        assert_eq!(begins[0].category_a, CategoryMask::BALL);
        assert_eq!(begins[0].category_b, CategoryMask::BLOCK);
        assert_eq!(begins[0].normal, Vec2::Y);

        let vel = world.body(ball).map(|b| b.velocity).unwrap_or_default();
        assert!((vel.y - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_ball_edge_contacts_reported_with_ball_first() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let edge = world.add_body(arena());
        let ball = world.add_body(elastic_ball(Vec2::new(1880.0, 540.0), Vec2::new(1000.0, 0.0)));

        let contacts = world.step(1.0 / 60.0);
        let begin = contacts
            .iter()
            .find(|c| c.phase == ContactPhase::Begin)
            .copied();
        let begin = begin.unwrap_or_else(|| panic!("expected a begin contact, got {contacts:?}"));
        assert_eq!(begin.body_a, ball);
        assert_eq!(begin.body_b, edge);
        assert_eq!(begin.category_b, CategoryMask::ALL);
    }

    #[test]
    fn test_speed_conserved_in_arena() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.add_body(arena());
        let ball = world.add_body(elastic_ball(Vec2::new(960.0, 540.0), Vec2::new(1000.0, 1000.0)));
        world.add_body(static_block(Vec2::new(160.0, 60.0)));
        world.add_body(static_block(Vec2::new(800.0, 180.0)));
        let start = 1000.0f32 * std::f32::consts::SQRT_2;

        for _ in 0..1200 {
            world.step(1.0 / 120.0);
            let b = world.body(ball).map(|b| (b.velocity, b.position));
            let (vel, pos) = b.unwrap_or_default();
            assert!((vel.length() - start).abs() < 0.5);
            assert!(pos.x >= 0.0 && pos.x <= 1920.0 && pos.y >= 0.0 && pos.y <= 1080.0);
        }
    }

    #[test]
    fn test_non_colliding_masks_pass_through() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut ball = elastic_ball(Vec2::new(160.0, 300.0), Vec2::new(0.0, -1000.0));
        ball.collision = CategoryMask::empty();
        let ball = world.add_body(ball);
        world.add_body(static_block(Vec2::new(160.0, 180.0)));

        let mut begins = 0;
        for _ in 0..30 {
            begins += world
                .step(1.0 / 120.0)
                .iter()
                .filter(|c| c.phase == ContactPhase::Begin)
                .count();
        }
        // Still reported, but the ball keeps its heading
        assert_eq!(begins, 1);
        assert!(world.body(ball).map(|b| b.velocity.y).unwrap_or(0.0) < 0.0);
    }
}
