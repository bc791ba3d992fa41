mod build;
mod dataset;
mod graph;

pub use build::build_graph;
pub use dataset::{Dataset, DepartmentRecord, EmployeeRecord, ProjectRecord, TeamRecord};
pub use graph::{Department, Edge, EdgeKind, Node, NodeKind, NodeType, OrgGraph};
