use std::collections::HashSet;

use crate::org::{NodeType, OrgGraph};

/// Decorations derived from the current selection and search focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    pub selected: Option<usize>,
    pub search: Option<usize>,
    pub edges: HashSet<usize>,
    /// Owner of a selected team, or the teams owned by a selected employee.
    pub owner_nodes: HashSet<usize>,
}

impl Highlight {
    pub fn is_edge_highlighted(&self, edge_index: usize) -> bool {
        self.edges.contains(&edge_index)
    }

    pub fn is_node_emphasized(&self, index: usize) -> bool {
        self.selected == Some(index) || self.search == Some(index) || self.owner_nodes.contains(&index)
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.edges.clear();
        self.owner_nodes.clear();
    }
}

pub fn connected_edges(graph: &OrgGraph, index: usize) -> Vec<usize> {
    graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| edge.source == index || edge.target == index)
        .map(|(edge_index, _)| edge_index)
        .collect()
}

fn owner_links(graph: &OrgGraph, index: usize) -> HashSet<usize> {
    let Some(node) = graph.node(index) else {
        return HashSet::new();
    };

    match node.node_type() {
        NodeType::Team => graph.owner_of(index).into_iter().collect(),
        NodeType::Employee if node.is_team_owner() => {
            graph.teams_owned_by(index).into_iter().collect()
        }
        NodeType::Employee | NodeType::Project => HashSet::new(),
    }
}

/// Highlight for `index` being selected; the search highlight is carried over.
pub(crate) fn build_highlight(graph: &OrgGraph, index: usize, search: Option<usize>) -> Highlight {
    Highlight {
        selected: Some(index),
        search,
        edges: connected_edges(graph, index).into_iter().collect(),
        owner_nodes: owner_links(graph, index),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::LayoutConfig;
    use crate::org::{Dataset, EdgeKind, build_graph};

    fn sample_graph() -> OrgGraph {
        build_graph(
            &Dataset::sample(),
            &LayoutConfig::default(),
            &mut StdRng::seed_from_u64(2),
        )
    }

    #[test]
    fn employee_edges_are_its_membership_and_assignments() {
        let graph = sample_graph();
        let emp1 = graph.index_of("emp1").unwrap();
        let edges = connected_edges(&graph, emp1);

        assert_eq!(edges.len(), 3);
        assert_eq!(
            edges
                .iter()
                .filter(|&&edge| graph.edges()[edge].kind == EdgeKind::Member)
                .count(),
            1
        );
        for edge in edges {
            assert_eq!(graph.edges()[edge].source, emp1);
        }
    }

    #[test]
    fn team_selection_marks_owner() {
        let graph = sample_graph();
        let team1 = graph.index_of("team1").unwrap();
        let emp1 = graph.index_of("emp1").unwrap();
        let highlight = build_highlight(&graph, team1, None);

        assert_eq!(highlight.owner_nodes, HashSet::from([emp1]));
        assert!(highlight.is_node_emphasized(emp1));
        for &edge in &highlight.edges {
            assert_eq!(graph.edges()[edge].target, team1);
        }
    }

    #[test]
    fn owner_selection_marks_owned_teams() {
        let graph = sample_graph();
        let emp6 = graph.index_of("emp6").unwrap();
        let team2 = graph.index_of("team2").unwrap();

        let highlight = build_highlight(&graph, emp6, None);

        assert_eq!(highlight.owner_nodes, HashSet::from([team2]));
    }

    #[test]
    fn ownerless_team_has_no_owner_highlight() {
        let graph = sample_graph();
        let team3 = graph.index_of("team3").unwrap();

        assert!(build_highlight(&graph, team3, None).owner_nodes.is_empty());
    }
}
