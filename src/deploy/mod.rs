//! Deployment registry: stations, deployment windows and their loading.

mod reader;
mod registry;
mod types;

pub use reader::{DeploymentTable, read_deployments};
pub use registry::DeploymentRegistry;
pub use types::{DeploymentWindow, Station};
