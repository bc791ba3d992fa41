use crate::org::NodeKind;

use super::OrgSimulation;

impl OrgSimulation {
    pub fn tooltip(&self, index: usize) -> Vec<String> {
        let Some(node) = self.graph.node(index) else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        match &node.kind {
            NodeKind::Employee {
                role,
                is_team_owner,
                ..
            } => {
                if !role.is_empty() {
                    lines.push(role.clone());
                }
                if *is_team_owner {
                    lines.extend(
                        self.graph
                            .teams_owned_by(index)
                            .into_iter()
                            .map(|team| format!("Owner of {}", self.graph.nodes()[team].label)),
                    );
                }
            }
            NodeKind::Team { description, .. } | NodeKind::Project { description } => {
                if !description.is_empty() {
                    lines.push(description.clone());
                }
            }
        }
        lines
    }
}
