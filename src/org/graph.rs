use std::collections::HashMap;
use std::fmt;

use eframe::egui::{Vec2, vec2};
use serde::Deserialize;

use crate::config::LayoutConfig;
use crate::error::DataIntegrityWarning;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Employee,
    Team,
    Project,
}

impl NodeType {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Team => "team",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Employee {
        role: String,
        team: Option<String>,
        is_team_owner: bool,
    },
    Team {
        description: String,
        owner: Option<String>,
        member_count: usize,
    },
    Project {
        description: String,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Employee { .. } => NodeType::Employee,
            Self::Team { .. } => NodeType::Team,
            Self::Project { .. } => NodeType::Project,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub department: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub force: Vec2,
    pub radius: f32,
    /// Excluded from force application and integration.
    pub fixed: bool,
    /// Stays fixed after a drag is released.
    pub pinned: bool,
}

impl Node {
    pub(crate) fn new(
        id: String,
        label: String,
        kind: NodeKind,
        department: String,
        position: Vec2,
        radius: f32,
    ) -> Self {
        Self {
            id,
            label,
            kind,
            department,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            radius,
            fixed: false,
            pinned: false,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn role(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Employee { role, .. } => Some(role.as_str()),
            NodeKind::Team { .. } | NodeKind::Project { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Team { description, .. } | NodeKind::Project { description } => {
                Some(description.as_str())
            }
            NodeKind::Employee { .. } => None,
        }
    }

    pub fn team(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Employee { team, .. } => team.as_deref(),
            NodeKind::Team { .. } | NodeKind::Project { .. } => None,
        }
    }

    pub fn is_team_owner(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Employee {
                is_team_owner: true,
                ..
            }
        )
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, NodeKind::Project { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Employee to team.
    Member,
    /// Employee to project.
    Assignment,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Assignment => "assignment",
        }
    }

    pub fn endpoint_types(self) -> (NodeType, NodeType) {
        match self {
            Self::Member => (NodeType::Employee, NodeType::Team),
            Self::Assignment => (NodeType::Employee, NodeType::Project),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: String,
    pub center: Vec2,
    pub size: Vec2,
}

impl Department {
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Interior bounds shrunk by `margin` on each side, collapsing to the center when too small.
    pub fn interior(&self, margin: f32) -> (Vec2, Vec2) {
        let half = (self.size * 0.5 - vec2(margin, margin)).max(Vec2::ZERO);
        (self.center - half, self.center + half)
    }
}

#[derive(Clone, Debug, Default)]
pub struct OrgGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) departments: Vec<Department>,
    pub(crate) index_by_id: HashMap<String, usize>,
    pub(crate) department_by_id: HashMap<String, usize>,
    pub(crate) diagnostics: Vec<DataIntegrityWarning>,
}

impl OrgGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn diagnostics(&self) -> &[DataIntegrityWarning] {
        &self.diagnostics
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.department_by_id
            .get(id)
            .and_then(|&index| self.departments.get(index))
    }

    pub fn edge_endpoint_ids(&self, edge: &Edge) -> (&str, &str) {
        (
            self.nodes[edge.source].id.as_str(),
            self.nodes[edge.target].id.as_str(),
        )
    }

    pub fn count_by_type(&self, node_type: NodeType) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.node_type() == node_type)
            .count()
    }

    pub fn count_edges(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|edge| edge.kind == kind).count()
    }

    pub fn owner_of(&self, team_index: usize) -> Option<usize> {
        match &self.nodes.get(team_index)?.kind {
            NodeKind::Team {
                owner: Some(owner), ..
            } => self
                .index_of(owner)
                .filter(|&index| self.nodes[index].node_type() == NodeType::Employee),
            _ => None,
        }
    }

    pub fn teams_owned_by(&self, employee_index: usize) -> Vec<usize> {
        let Some(employee) = self.nodes.get(employee_index) else {
            return Vec::new();
        };

        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match &node.kind {
                NodeKind::Team {
                    owner: Some(owner), ..
                } if owner == &employee.id => Some(index),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn recompute_team_radii(&mut self, layout: &LayoutConfig) {
        let mut member_counts = vec![0usize; self.nodes.len()];
        for edge in &self.edges {
            if edge.kind == EdgeKind::Member {
                member_counts[edge.target] += 1;
            }
        }

        for (node, count) in self.nodes.iter_mut().zip(member_counts) {
            if let NodeKind::Team { member_count, .. } = &mut node.kind {
                *member_count = count;
                node.radius = layout.team_radius(count);
            }
        }
    }
}
