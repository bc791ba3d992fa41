use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;
use tracing::{info, warn};

use crate::config::LayoutConfig;
use crate::error::DataIntegrityWarning;

use super::dataset::{Dataset, EmployeeRecord};
use super::graph::{Department, Edge, EdgeKind, Node, NodeKind, NodeType, OrgGraph};

const PROJECT_RING_Y_OFFSET: f32 = 50.0;
const TEAM_RING_FRACTION: f32 = 0.35;
const TEAM_SCATTER: (f32, f32) = (40.0, 120.0);
const TEAMLESS_SCATTER: (f32, f32) = (50.0, 200.0);
const COINCIDENT_DISTANCE: f32 = 0.001;

struct Builder {
    graph: OrgGraph,
}

impl Builder {
    fn warn(&mut self, warning: DataIntegrityWarning) {
        warn!("{warning}");
        self.graph.diagnostics.push(warning);
    }

    fn department_center(&self, id: &str) -> Option<(Vec2, Vec2)> {
        self.graph
            .department(id)
            .map(|department| (department.center, department.size))
    }

    fn resolve_department(
        &mut self,
        kind: NodeType,
        id: &str,
        department: &str,
    ) -> Option<(Vec2, Vec2)> {
        let resolved = self.department_center(department);
        if resolved.is_none() {
            self.warn(DataIntegrityWarning::MissingDepartment {
                kind,
                id: id.to_owned(),
                department: department.to_owned(),
            });
        }
        resolved
    }

    /// Returns the new node's index, or `None` when the id is already taken.
    fn push_node(&mut self, node: Node) -> Option<usize> {
        if self.graph.index_by_id.contains_key(&node.id) {
            let kind = node.node_type();
            let id = node.id.clone();
            self.warn(DataIntegrityWarning::DuplicateId { kind, id });
            return None;
        }

        let index = self.graph.nodes.len();
        self.graph.index_by_id.insert(node.id.clone(), index);
        self.graph.nodes.push(node);
        Some(index)
    }

    fn resolve_typed(&self, id: &str, node_type: NodeType) -> Option<usize> {
        self.graph
            .index_of(id)
            .filter(|&index| self.graph.nodes[index].node_type() == node_type)
    }
}

fn ring_slot(counter: &mut HashMap<String, usize>, department: &str) -> usize {
    let slot = counter.entry(department.to_owned()).or_insert(0);
    let current = *slot;
    *slot += 1;
    current
}

fn per_department_totals<'a>(departments: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut totals = HashMap::new();
    for department in departments {
        *totals.entry(department.to_owned()).or_insert(0) += 1;
    }
    totals
}

fn scatter(rng: &mut impl Rng, around: Vec2, (min, max): (f32, f32)) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let radius = rng.gen_range(min..max);
    around + vec2(angle.cos(), angle.sin()) * radius
}

/// Builds the full graph from a dataset. Unresolvable references are recorded
/// as diagnostics and the offending entity or edge is left out.
pub fn build_graph(dataset: &Dataset, layout: &LayoutConfig, rng: &mut impl Rng) -> OrgGraph {
    let mut builder = Builder {
        graph: OrgGraph::default(),
    };

    let department_count = dataset
        .departments
        .iter()
        .map(|record| record.id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let spacing = layout.department_width + layout.department_gap;
    for record in &dataset.departments {
        if builder.graph.department_by_id.contains_key(&record.id) {
            warn!("department {} declared twice; keeping the first", record.id);
            continue;
        }

        let slot = builder.graph.departments.len();
        let offset = slot as f32 - (department_count as f32 - 1.0) / 2.0;
        builder
            .graph
            .department_by_id
            .insert(record.id.clone(), builder.graph.departments.len());
        builder.graph.departments.push(Department {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            center: vec2(offset * spacing, 0.0),
            size: vec2(layout.department_width, layout.department_height),
        });
    }

    let project_totals =
        per_department_totals(dataset.projects.iter().map(|project| project.department.as_str()));
    let mut project_slots = HashMap::new();
    for record in &dataset.projects {
        let Some((center, size)) =
            builder.resolve_department(NodeType::Project, &record.id, &record.department)
        else {
            continue;
        };

        let slot = ring_slot(&mut project_slots, &record.department);
        let total = project_totals.get(&record.department).copied().unwrap_or(1).max(1);
        let angle = (slot as f32 / total as f32) * TAU;
        let position = center
            + vec2(angle.cos(), angle.sin()) * (size.x / 4.0)
            + vec2(0.0, PROJECT_RING_Y_OFFSET);

        builder.push_node(Node::new(
            record.id.clone(),
            record.name.clone(),
            NodeKind::Project {
                description: record.description.clone(),
            },
            record.department.clone(),
            position,
            layout.project_radius,
        ));
    }

    let team_totals =
        per_department_totals(dataset.teams.iter().map(|team| team.department.as_str()));
    let mut team_slots = HashMap::new();
    for record in &dataset.teams {
        let Some((center, size)) =
            builder.resolve_department(NodeType::Team, &record.id, &record.department)
        else {
            continue;
        };

        let slot = ring_slot(&mut team_slots, &record.department);
        let total = team_totals.get(&record.department).copied().unwrap_or(1).max(1);
        let angle = ((slot as f32 + 0.5) / total as f32) * TAU;
        let ring = size.x.min(size.y) * TEAM_RING_FRACTION;
        let position = center + vec2(angle.cos(), angle.sin()) * ring;

        builder.push_node(Node::new(
            record.id.clone(),
            record.name.clone(),
            NodeKind::Team {
                description: record.description.clone(),
                owner: record.owner.clone(),
                member_count: 0,
            },
            record.department.clone(),
            position,
            layout.team_min_radius,
        ));
    }

    let owners = dataset
        .teams
        .iter()
        .filter(|team| builder.resolve_typed(&team.id, NodeType::Team).is_some())
        .filter_map(|team| team.owner.as_deref())
        .collect::<HashSet<_>>();

    let mut employee_nodes = Vec::with_capacity(dataset.employees.len());
    for record in &dataset.employees {
        let Some((center, _size)) =
            builder.resolve_department(NodeType::Employee, &record.id, &record.department)
        else {
            employee_nodes.push(None);
            continue;
        };

        let team_position = record
            .team
            .as_deref()
            .and_then(|team| builder.resolve_typed(team, NodeType::Team))
            .map(|index| builder.graph.nodes[index].position);
        let position = match team_position {
            Some(team_position) => scatter(rng, team_position, TEAM_SCATTER),
            None => scatter(rng, center, TEAMLESS_SCATTER),
        };

        let index = builder.push_node(Node::new(
            record.id.clone(),
            record.name.clone(),
            NodeKind::Employee {
                role: record.role.clone(),
                team: record.team.clone(),
                is_team_owner: owners.contains(record.id.as_str()),
            },
            record.department.clone(),
            position,
            layout.employee_radius,
        ));
        employee_nodes.push(index);
    }

    for record in &dataset.teams {
        let Some(owner) = record.owner.as_deref() else {
            continue;
        };
        if builder.resolve_typed(&record.id, NodeType::Team).is_none() {
            continue;
        }
        if builder.resolve_typed(owner, NodeType::Employee).is_none() {
            builder.warn(DataIntegrityWarning::MissingTeamOwner {
                team: record.id.clone(),
                owner: owner.to_owned(),
            });
        }
    }

    let mut seen_edges = HashSet::new();
    for (record, &employee) in dataset.employees.iter().zip(&employee_nodes) {
        let Some(source) = employee else {
            // A duplicate keeps the first record's edges; a dropped employee loses its own.
            if builder.resolve_typed(&record.id, NodeType::Employee).is_none() {
                report_orphaned_edges(&mut builder, record);
            }
            continue;
        };

        if let Some(team) = record.team.as_deref() {
            match builder.resolve_typed(team, NodeType::Team) {
                Some(target) => {
                    if seen_edges.insert((source, target)) {
                        builder.graph.edges.push(Edge {
                            source,
                            target,
                            kind: EdgeKind::Member,
                        });
                    }
                }
                None => builder.warn(DataIntegrityWarning::MissingTeam {
                    employee: record.id.clone(),
                    team: team.to_owned(),
                }),
            }
        }

        for project in &record.projects {
            match builder.resolve_typed(project, NodeType::Project) {
                Some(target) => {
                    if seen_edges.insert((source, target)) {
                        builder.graph.edges.push(Edge {
                            source,
                            target,
                            kind: EdgeKind::Assignment,
                        });
                    }
                }
                None => builder.warn(DataIntegrityWarning::MissingProject {
                    employee: record.id.clone(),
                    project: project.clone(),
                }),
            }
        }
    }

    let mut graph = builder.graph;
    graph.recompute_team_radii(layout);
    separate_coincident_starts(&mut graph.nodes);

    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        departments = graph.departments.len(),
        diagnostics = graph.diagnostics.len(),
        "organization graph built"
    );

    graph
}

fn report_orphaned_edges(builder: &mut Builder, record: &EmployeeRecord) {
    let kinds = record
        .team
        .iter()
        .map(|_| EdgeKind::Member)
        .chain(record.projects.iter().map(|_| EdgeKind::Assignment));
    for kind in kinds {
        builder.warn(DataIntegrityWarning::MissingEmployee {
            edge: kind.label(),
            employee: record.id.clone(),
        });
    }
}

/// Nudges any node that starts exactly on top of an earlier one.
fn separate_coincident_starts(nodes: &mut [Node]) {
    for j in 1..nodes.len() {
        let mut attempt = 0usize;
        loop {
            let position = nodes[j].position;
            let coincident = nodes[..j]
                .iter()
                .any(|other| (other.position - position).length() < COINCIDENT_DISTANCE);
            if !coincident {
                break;
            }

            attempt += 1;
            let angle = ((j as f32) * 0.618_034 + (attempt as f32) * 0.414_214) * TAU;
            nodes[j].position += vec2(angle.cos(), angle.sin()) * nodes[j].radius;
        }
    }
}
