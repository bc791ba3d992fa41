use crate::org::{EdgeKind, NodeKind, NodeType, OrgGraph};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(String),
}

impl DepartmentFilter {
    /// `"all"` clears the filter; anything else selects one department id.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    pub fn matches(&self, department: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == department,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityToggles {
    pub show_teams: bool,
    pub show_projects: bool,
    pub department: DepartmentFilter,
}

impl Default for VisibilityToggles {
    fn default() -> Self {
        Self {
            show_teams: true,
            show_projects: true,
            department: DepartmentFilter::All,
        }
    }
}

impl VisibilityToggles {
    fn type_enabled(&self, node_type: NodeType) -> bool {
        match node_type {
            NodeType::Employee => true,
            NodeType::Team => self.show_teams,
            NodeType::Project => self.show_projects,
        }
    }

    fn edge_enabled(&self, kind: EdgeKind) -> bool {
        match kind {
            EdgeKind::Member => self.show_teams,
            EdgeKind::Assignment => self.show_projects,
        }
    }
}

/// Node and edge indices eligible for simulation and drawing, in graph order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSet {
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
    node_mask: Vec<bool>,
}

impl VisibleSet {
    pub(crate) fn from_indices(node_count: usize, nodes: Vec<usize>, edges: Vec<usize>) -> Self {
        let mut node_mask = vec![false; node_count];
        for &index in &nodes {
            if let Some(entry) = node_mask.get_mut(index) {
                *entry = true;
            }
        }
        Self {
            nodes,
            edges,
            node_mask,
        }
    }

    pub fn contains_node(&self, index: usize) -> bool {
        self.node_mask.get(index).copied().unwrap_or(false)
    }
}

pub fn compute_visible(graph: &OrgGraph, toggles: &VisibilityToggles) -> VisibleSet {
    let nodes = graph.nodes();
    let mut mask = nodes
        .iter()
        .map(|node| {
            toggles.type_enabled(node.node_type()) && toggles.department.matches(&node.department)
        })
        .collect::<Vec<_>>();

    // Team membership as resolved by the member edges; unresolved teams do not count.
    let mut team_of = vec![None; nodes.len()];
    let mut has_visible_assignment = vec![false; nodes.len()];
    for edge in graph.edges() {
        match edge.kind {
            EdgeKind::Member => team_of[edge.source] = Some(edge.target),
            EdgeKind::Assignment => {
                if toggles.edge_enabled(EdgeKind::Assignment) && mask[edge.target] {
                    has_visible_assignment[edge.source] = true;
                }
            }
        }
    }

    for (index, node) in nodes.iter().enumerate() {
        if !mask[index] || !matches!(node.kind, NodeKind::Employee { .. }) {
            continue;
        }

        let team_hidden = team_of[index].is_some_and(|team| !mask[team]);
        if team_hidden && !has_visible_assignment[index] {
            mask[index] = false;
        }
    }

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| {
            toggles.edge_enabled(edge.kind) && mask[edge.source] && mask[edge.target]
        })
        .map(|(index, _)| index)
        .collect();

    VisibleSet {
        nodes: (0..nodes.len()).filter(|&index| mask[index]).collect(),
        edges,
        node_mask: mask,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::org::{Dataset, build_graph};

    fn sample_graph() -> OrgGraph {
        build_graph(
            &Dataset::sample(),
            &LayoutConfig::default(),
            &mut StdRng::seed_from_u64(3),
        )
    }

    fn visible_ids(graph: &OrgGraph, visible: &VisibleSet) -> Vec<String> {
        visible
            .nodes
            .iter()
            .map(|&index| graph.nodes()[index].id.clone())
            .collect()
    }

    #[test]
    fn everything_visible_by_default() {
        let graph = sample_graph();
        let visible = compute_visible(&graph, &VisibilityToggles::default());

        assert_eq!(visible.nodes.len(), graph.node_count());
        assert_eq!(visible.edges.len(), graph.edge_count());
    }

    #[test]
    fn hiding_teams_keeps_assigned_employees() {
        let graph = sample_graph();
        let toggles = VisibilityToggles {
            show_teams: false,
            ..Default::default()
        };
        let visible = compute_visible(&graph, &toggles);
        let ids = visible_ids(&graph, &visible);

        assert!(!ids.iter().any(|id| id.starts_with("team")));
        assert!(ids.contains(&"emp1".to_owned()));
        // emp9 has no projects, so nothing keeps it on screen.
        assert!(!ids.contains(&"emp9".to_owned()));
        assert!(
            visible
                .edges
                .iter()
                .all(|&index| graph.edges()[index].kind == EdgeKind::Assignment)
        );
    }

    #[test]
    fn hiding_teams_and_projects_leaves_no_team_members() {
        let graph = sample_graph();
        let toggles = VisibilityToggles {
            show_teams: false,
            show_projects: false,
            ..Default::default()
        };
        let visible = compute_visible(&graph, &toggles);

        assert!(visible.nodes.is_empty());
        assert!(visible.edges.is_empty());
    }

    #[test]
    fn department_filter_hides_cross_department_team() {
        let graph = sample_graph();
        let toggles = VisibilityToggles {
            department: DepartmentFilter::parse("dept2"),
            ..Default::default()
        };
        let visible = compute_visible(&graph, &toggles);
        let ids = visible_ids(&graph, &visible);

        assert!(ids.contains(&"team2".to_owned()));
        assert!(!ids.contains(&"team1".to_owned()));
        assert!(!ids.contains(&"proj1".to_owned()));
        // emp9 lives in dept2 but its team sits in dept1 and it has no projects.
        assert!(!ids.contains(&"emp9".to_owned()));
        for &index in &visible.nodes {
            assert_eq!(graph.nodes()[index].department, "dept2");
        }
    }

    #[test]
    fn edges_never_dangle() {
        let graph = sample_graph();
        for show_teams in [true, false] {
            for show_projects in [true, false] {
                for department in ["all", "dept1", "dept2"] {
                    let toggles = VisibilityToggles {
                        show_teams,
                        show_projects,
                        department: DepartmentFilter::parse(department),
                    };
                    let visible = compute_visible(&graph, &toggles);
                    for (index, edge) in graph.edges().iter().enumerate() {
                        let expected = toggles.edge_enabled(edge.kind)
                            && visible.contains_node(edge.source)
                            && visible.contains_node(edge.target);
                        assert_eq!(visible.edges.contains(&index), expected);
                    }
                }
            }
        }
    }
}
