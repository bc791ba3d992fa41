use thiserror::Error;

use crate::org::NodeType;

/// A dataset reference that could not be resolved while building the graph.
///
/// These never abort a load: the offending entity or edge is skipped and the
/// warning is kept on the graph for the host to inspect.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataIntegrityWarning {
    #[error("{kind} {id} references unknown department {department}")]
    MissingDepartment {
        kind: NodeType,
        id: String,
        department: String,
    },
    #[error("employee {employee} references unknown team {team}")]
    MissingTeam { employee: String, team: String },
    #[error("employee {employee} references unknown project {project}")]
    MissingProject { employee: String, project: String },
    #[error("{edge} edge references unknown employee {employee}")]
    MissingEmployee { edge: &'static str, employee: String },
    #[error("team {team} names unknown owner {owner}")]
    MissingTeamOwner { team: String, owner: String },
    #[error("{kind} {id} reuses an id that is already taken")]
    DuplicateId { kind: NodeType, id: String },
}

/// No external link base URL is registered for a node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no external link base URL configured for {0} nodes")]
pub struct ConfigurationGap(pub NodeType);
