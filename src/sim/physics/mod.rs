mod forces;

use eframe::egui::Vec2;
use rand::Rng;

use crate::config::PhysicsConfig;
use crate::org::{EdgeKind, Node, OrgGraph};

use super::visibility::VisibleSet;
pub use forces::{PairResponse, classify_pair, collision_threshold, repulsion_between, spring_pull};

/// Advances the layout by one step over the visible nodes and edges.
/// Returns whether anything is still moving.
pub fn step_physics(
    graph: &mut OrgGraph,
    visible: &VisibleSet,
    config: &PhysicsConfig,
    rng: &mut impl Rng,
) -> bool {
    let mut any_motion = false;

    for &index in &visible.nodes {
        let node = &mut graph.nodes[index];
        if !node.fixed {
            node.force = Vec2::ZERO;
        }
    }

    for (offset, &i) in visible.nodes.iter().enumerate() {
        for &j in &visible.nodes[offset + 1..] {
            match classify_pair(&graph.nodes[i], &graph.nodes[j], config, rng) {
                PairResponse::None => {}
                PairResponse::Repel(force) => {
                    add_force(&mut graph.nodes[i], force);
                    add_force(&mut graph.nodes[j], -force);
                }
                PairResponse::Separate { direction, overlap } => {
                    let bounds = anchored_pair_bounds(graph, i, j, config);
                    any_motion |= separate(&mut graph.nodes, i, j, direction, overlap, bounds);
                }
            }
        }
    }

    for &edge_index in &visible.edges {
        let edge = graph.edges[edge_index];
        let employee = graph.nodes[edge.source].position;
        let other = graph.nodes[edge.target].position;

        match edge.kind {
            EdgeKind::Member => {
                let pull = spring_pull(employee, other, config.member_distance, config.base_spring);
                let team_pull =
                    spring_pull(other, employee, config.member_distance, config.member_spring);
                add_force(&mut graph.nodes[edge.source], pull);
                add_force(&mut graph.nodes[edge.target], team_pull);
            }
            EdgeKind::Assignment => {
                let pull = spring_pull(
                    other,
                    employee,
                    config.assignment_distance,
                    config.assignment_spring,
                );
                add_force(&mut graph.nodes[edge.target], pull);
            }
        }
    }

    for &index in &visible.nodes {
        let node = &mut graph.nodes[index];
        if node.fixed {
            continue;
        }
        any_motion |= integrate(node, config);
    }

    if config.contain_in_departments {
        for &index in &visible.nodes {
            if graph.nodes[index].fixed {
                continue;
            }
            if let Some((min, max)) = interior_for(graph, index, config) {
                contain(&mut graph.nodes[index], min, max);
            }
        }
    }

    any_motion
}

fn add_force(node: &mut Node, force: Vec2) {
    if !node.fixed {
        node.force += force;
    }
}

fn interior_for(graph: &OrgGraph, index: usize, config: &PhysicsConfig) -> Option<(Vec2, Vec2)> {
    let node = &graph.nodes[index];
    graph
        .department(&node.department)
        .map(|department| department.interior(node.radius + config.containment_margin))
}

/// Interior of the movable node when exactly one of the pair is fixed.
fn anchored_pair_bounds(
    graph: &OrgGraph,
    i: usize,
    j: usize,
    config: &PhysicsConfig,
) -> Option<(Vec2, Vec2)> {
    if !config.contain_in_departments {
        return None;
    }
    let movable = match (graph.nodes[i].fixed, graph.nodes[j].fixed) {
        (false, true) => i,
        (true, false) => j,
        _ => return None,
    };
    interior_for(graph, movable, config)
}

/// Moves the pair apart along `direction` (pointing from `j` to `i`). Fixed
/// nodes stay put and their partner takes the whole correction.
fn separate(
    nodes: &mut [Node],
    i: usize,
    j: usize,
    direction: Vec2,
    overlap: f32,
    bounds: Option<(Vec2, Vec2)>,
) -> bool {
    match (nodes[i].fixed, nodes[j].fixed) {
        (true, true) => return false,
        (false, true) => push_off_anchor(nodes, i, j, direction * overlap, bounds),
        (true, false) => push_off_anchor(nodes, j, i, -direction * overlap, bounds),
        (false, false) => {
            nodes[i].position += direction * overlap * 0.5;
            nodes[j].position -= direction * overlap * 0.5;
        }
    }
    true
}

// Any axis on which the target leaves `bounds` is mirrored through the
// anchor, so containment cannot clamp the node back onto it.
fn push_off_anchor(
    nodes: &mut [Node],
    movable: usize,
    anchor: usize,
    step: Vec2,
    bounds: Option<(Vec2, Vec2)>,
) {
    let target = nodes[movable].position + step;
    let Some((min, max)) = bounds else {
        nodes[movable].position = target;
        return;
    };

    let anchor_at = nodes[anchor].position;
    let mut offset = target - anchor_at;
    if target.x < min.x || target.x > max.x {
        offset.x = -offset.x;
    }
    if target.y < min.y || target.y > max.y {
        offset.y = -offset.y;
    }
    nodes[movable].position = anchor_at + offset;
}

fn integrate(node: &mut Node, config: &PhysicsConfig) -> bool {
    let mut velocity = (node.velocity + node.force) * config.damping;

    let mut speed = velocity.length();
    if speed > config.max_speed {
        velocity *= config.max_speed / speed;
        speed = config.max_speed;
    }

    if speed > config.adaptive_damping_threshold {
        velocity *= (1.0 - speed * config.adaptive_damping_rate).max(config.adaptive_damping_floor);
    } else if speed < config.rest_epsilon {
        velocity = Vec2::ZERO;
    }

    node.velocity = velocity;
    node.position += velocity;
    velocity != Vec2::ZERO
}

fn contain(node: &mut Node, min: Vec2, max: Vec2) {
    if node.position.x < min.x {
        node.position.x = min.x;
        node.velocity.x = node.velocity.x.abs() * 0.5;
    } else if node.position.x > max.x {
        node.position.x = max.x;
        node.velocity.x = -node.velocity.x.abs() * 0.5;
    }

    if node.position.y < min.y {
        node.position.y = min.y;
        node.velocity.y = node.velocity.y.abs() * 0.5;
    } else if node.position.y > max.y {
        node.position.y = max.y;
        node.velocity.y = -node.velocity.y.abs() * 0.5;
    }
}
