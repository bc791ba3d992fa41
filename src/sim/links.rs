use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::ConfigurationGap;
use crate::org::{Node, NodeType};

use super::OrgSimulation;

/// Host capability for opening a URL, e.g. in a browser tab.
pub trait UrlOpener {
    fn open_url(&mut self, url: &str);
}

/// The configured base URL for the node's type with the node id appended.
pub fn external_url(
    links: &HashMap<NodeType, String>,
    node: &Node,
) -> Result<String, ConfigurationGap> {
    let node_type = node.node_type();
    links
        .get(&node_type)
        .map(|base| format!("{base}{}", node.id))
        .ok_or(ConfigurationGap(node_type))
}

impl OrgSimulation {
    pub fn external_url(&self, node: &Node) -> Result<String, ConfigurationGap> {
        external_url(&self.config.links, node)
    }

    /// Opens the node's external page. Unconfigured node types are logged and ignored.
    pub fn open(&self, index: usize, opener: &mut impl UrlOpener) {
        let Some(node) = self.graph.node(index) else {
            return;
        };
        match self.external_url(node) {
            Ok(url) => {
                info!(node = %node.id, %url, "opening external link");
                opener.open_url(&url);
            }
            Err(gap) => warn!(node = %node.id, "{gap}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::org::Dataset;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl UrlOpener for Recorder {
        fn open_url(&mut self, url: &str) {
            self.0.push(url.to_owned());
        }
    }

    fn simulation(links: &[(NodeType, &str)]) -> OrgSimulation {
        let mut config = SimConfig::default();
        config.layout.seed = Some(1);
        config.links = links
            .iter()
            .map(|&(node_type, base)| (node_type, base.to_owned()))
            .collect();
        let mut sim = OrgSimulation::new(config);
        sim.load(&Dataset::sample());
        sim
    }

    #[test]
    fn opens_base_plus_id() {
        let sim = simulation(&[(NodeType::Employee, "https://people.example/")]);
        let emp3 = sim.graph().index_of("emp3").unwrap();
        let mut recorder = Recorder::default();

        sim.open(emp3, &mut recorder);

        assert_eq!(recorder.0, ["https://people.example/emp3"]);
    }

    #[test]
    fn missing_base_is_a_no_op() {
        let sim = simulation(&[(NodeType::Employee, "https://people.example/")]);
        let team1 = sim.graph().index_of("team1").unwrap();
        let mut recorder = Recorder::default();

        sim.open(team1, &mut recorder);

        assert!(recorder.0.is_empty());
        assert_eq!(
            sim.external_url(&sim.graph().nodes()[team1]),
            Err(ConfigurationGap(NodeType::Team))
        );
    }
}
