//! Force-directed org chart: departments, teams, employees and projects on a
//! pannable canvas.

pub mod app;
pub mod config;
pub mod error;
pub mod org;
pub mod sim;
