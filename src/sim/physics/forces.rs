use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::config::PhysicsConfig;
use crate::org::Node;

const DEGENERATE_DISTANCE: f32 = 0.0001;

/// How a pair of visible nodes interacts during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairResponse {
    None,
    /// Force on the first node; the second receives the exact negation.
    Repel(Vec2),
    /// Push the first node along `direction` and the second against it until
    /// they are `overlap` further apart.
    Separate { direction: Vec2, overlap: f32 },
}

pub fn collision_threshold(a: &Node, b: &Node, config: &PhysicsConfig) -> f32 {
    (a.radius + b.radius) * config.collision_multiplier
}

/// Inverse-square repulsion felt by a node at `a` from a node at `b`.
pub fn repulsion_between(a: Vec2, b: Vec2, strength: f32) -> Vec2 {
    let delta = a - b;
    let distance_sq = delta.length_sq();
    if distance_sq <= DEGENERATE_DISTANCE * DEGENERATE_DISTANCE {
        return Vec2::ZERO;
    }
    let distance = distance_sq.sqrt();
    delta / distance * (strength / distance_sq)
}

pub fn classify_pair(
    a: &Node,
    b: &Node,
    config: &PhysicsConfig,
    rng: &mut impl Rng,
) -> PairResponse {
    let delta = a.position - b.position;
    let distance = delta.length();
    let threshold = collision_threshold(a, b, config);

    if distance < DEGENERATE_DISTANCE {
        let angle = rng.gen_range(0.0..TAU);
        return PairResponse::Separate {
            direction: vec2(angle.cos(), angle.sin()),
            overlap: threshold + config.collision_slop,
        };
    }

    if distance < threshold {
        return PairResponse::Separate {
            direction: delta / distance,
            overlap: threshold - distance + config.collision_slop,
        };
    }

    if distance >= config.repulsion_radius || a.is_project() || b.is_project() {
        return PairResponse::None;
    }

    PairResponse::Repel(repulsion_between(
        a.position,
        b.position,
        config.repulsion_strength,
    ))
}

/// Hooke spring pulling `from` toward `to` when stretched past `rest_length`.
pub fn spring_pull(from: Vec2, to: Vec2, rest_length: f32, stiffness: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= DEGENERATE_DISTANCE {
        return Vec2::ZERO;
    }
    delta / distance * ((distance - rest_length) * stiffness)
}
