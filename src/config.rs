use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::org::NodeType;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub layout: LayoutConfig,
    pub interaction: InteractionConfig,
    /// Base URL per node type; the node id is appended on open.
    pub links: HashMap<NodeType, String>,
}

impl SimConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid simulation config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub repulsion_strength: f32,
    pub repulsion_radius: f32,
    /// Pairs closer than `(r_a + r_b) * collision_multiplier` are separated positionally.
    pub collision_multiplier: f32,
    pub collision_slop: f32,
    pub base_spring: f32,
    pub member_spring: f32,
    pub assignment_spring: f32,
    pub member_distance: f32,
    pub assignment_distance: f32,
    pub damping: f32,
    pub max_speed: f32,
    pub adaptive_damping_threshold: f32,
    pub adaptive_damping_rate: f32,
    pub adaptive_damping_floor: f32,
    pub rest_epsilon: f32,
    pub containment_margin: f32,
    pub contain_in_departments: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 2000.0,
            repulsion_radius: 250.0,
            collision_multiplier: 1.2,
            collision_slop: 0.5,
            base_spring: 0.1,
            member_spring: 0.05,
            assignment_spring: 0.03,
            member_distance: 120.0,
            assignment_distance: 110.0,
            damping: 0.92,
            max_speed: 12.0,
            adaptive_damping_threshold: 0.1,
            adaptive_damping_rate: 0.01,
            adaptive_damping_floor: 0.8,
            rest_epsilon: 0.01,
            containment_margin: 10.0,
            contain_in_departments: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub employee_radius: f32,
    pub project_radius: f32,
    pub team_min_radius: f32,
    pub team_radius_per_member: f32,
    pub department_width: f32,
    pub department_height: f32,
    pub department_gap: f32,
    /// Seed for placement jitter and collision tie-breaking. Random when unset.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            employee_radius: 12.5,
            project_radius: 22.0,
            team_min_radius: 50.0,
            team_radius_per_member: 8.0,
            department_width: 1000.0,
            department_height: 800.0,
            department_gap: 5.0,
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn team_radius(&self, member_count: usize) -> f32 {
        (member_count as f32 * self.team_radius_per_member).max(self.team_min_radius)
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Screen distance a press must travel before it becomes a drag or pan.
    pub drag_threshold: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub wheel_zoom_factor: f32,
    pub focus_speed: f32,
    pub focus_settle_distance: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            min_zoom: 0.2,
            max_zoom: 3.0,
            wheel_zoom_factor: 1.1,
            focus_speed: 0.1,
            focus_settle_distance: 1.0,
        }
    }
}
