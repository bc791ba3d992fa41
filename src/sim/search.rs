use tracing::debug;

use crate::org::{Node, OrgGraph};

use super::OrgSimulation;
use super::visibility::DepartmentFilter;

fn node_matches(node: &Node, needle: &str) -> bool {
    let fields = [
        Some(node.label.as_str()),
        Some(node.node_type().tag()),
        node.role(),
        node.description(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring search in graph order. Blank queries match
/// nothing; otherwise surrounding whitespace is part of the needle.
pub fn search_nodes(graph: &OrgGraph, filter: &DepartmentFilter, query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| filter.matches(&node.department) && node_matches(node, &needle))
        .map(|(index, _)| index)
        .collect()
}

impl OrgSimulation {
    /// Runs a search under the current department filter. A blank query clears
    /// the results and the search highlight.
    pub fn search(&mut self, query: &str) -> &[usize] {
        self.search_results = search_nodes(&self.graph, &self.toggles.department, query);
        if query.trim().is_empty() {
            self.highlight.search = None;
        }
        debug!(query, matches = self.search_results.len(), "searched nodes");
        &self.search_results
    }

    pub fn search_results(&self) -> &[usize] {
        &self.search_results
    }

    pub fn clear_search(&mut self) {
        self.search_results.clear();
        self.highlight.search = None;
    }

    pub fn highlight_search_result(&mut self, index: usize) {
        if self.graph.node(index).is_none() {
            return;
        }
        self.highlight.search = Some(index);
        self.focus(index);
    }

    /// Starts animating the camera toward `index`, replacing any focus in flight.
    pub fn focus(&mut self, index: usize) {
        let Some(node) = self.graph.node(index) else {
            return;
        };
        debug!(node = %node.id, "focusing camera");
        self.focus = Some(self.camera.offset_centering(node.position, self.viewport));
    }

    pub fn is_focusing(&self) -> bool {
        self.focus.is_some()
    }
}
