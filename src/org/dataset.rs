use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub departments: Vec<DepartmentRecord>,
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DepartmentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department: String,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub department: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department: String,
}

impl Dataset {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid organization dataset JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Two departments, three teams, ten employees and four projects.
    pub fn sample() -> Self {
        fn department(id: &str, name: &str, description: &str) -> DepartmentRecord {
            DepartmentRecord {
                id: id.to_owned(),
                name: name.to_owned(),
                description: description.to_owned(),
            }
        }

        fn team(
            id: &str,
            name: &str,
            description: &str,
            department: &str,
            owner: Option<&str>,
        ) -> TeamRecord {
            TeamRecord {
                id: id.to_owned(),
                name: name.to_owned(),
                description: description.to_owned(),
                department: department.to_owned(),
                owner: owner.map(str::to_owned),
            }
        }

        fn employee(
            id: &str,
            name: &str,
            role: &str,
            team: &str,
            department: &str,
            projects: &[&str],
        ) -> EmployeeRecord {
            EmployeeRecord {
                id: id.to_owned(),
                name: name.to_owned(),
                role: role.to_owned(),
                department: department.to_owned(),
                team: Some(team.to_owned()),
                projects: projects.iter().map(|&id| id.to_owned()).collect(),
            }
        }

        fn project(id: &str, name: &str, description: &str, department: &str) -> ProjectRecord {
            ProjectRecord {
                id: id.to_owned(),
                name: name.to_owned(),
                description: description.to_owned(),
                department: department.to_owned(),
            }
        }

        Self {
            departments: vec![
                department("dept1", "Bespoke", "Custom development solutions"),
                department("dept2", "OrderEazi", "Order management platform"),
            ],
            projects: vec![
                project("proj1", "Phoenix Initiative", "Next-gen platform", "dept1"),
                project("proj2", "Orion Integration", "Third-party API link", "dept1"),
                project("proj3", "Vega Analytics", "Data dashboard", "dept2"),
                project("proj4", "Sirius Mobile", "Mobile app development", "dept2"),
            ],
            employees: vec![
                employee("emp1", "Alice Johnson", "Senior Developer", "team1", "dept1", &["proj1", "proj2"]),
                employee("emp2", "Bob Smith", "Product Manager", "team1", "dept1", &["proj1"]),
                employee("emp3", "Carol Davis", "Designer", "team2", "dept2", &["proj3", "proj4"]),
                employee("emp4", "David Wilson", "Developer", "team1", "dept1", &["proj2"]),
                employee("emp5", "Eve Brown", "Developer", "team2", "dept2", &["proj3"]),
                employee("emp6", "Frank Miller", "Team Lead", "team2", "dept2", &["proj4", "proj3"]),
                employee("emp7", "Grace Lee", "Junior Developer", "team2", "dept2", &["proj4"]),
                employee("emp8", "Henry Taylor", "QA Engineer", "team3", "dept1", &["proj1"]),
                employee("emp9", "Ivy Chen", "DevOps Engineer", "team3", "dept2", &[]),
                employee("emp10", "Jack Anderson", "Intern", "team1", "dept1", &["proj2"]),
            ],
            teams: vec![
                team(
                    "team1",
                    "Frontend Team",
                    "Responsible for user interface development",
                    "dept1",
                    Some("emp1"),
                ),
                team(
                    "team2",
                    "Backend Team",
                    "Handles server-side development",
                    "dept2",
                    Some("emp6"),
                ),
                team(
                    "team3",
                    "Infrastructure Team",
                    "Manages deployment and infrastructure",
                    "dept1",
                    None,
                ),
            ],
        }
    }
}
