//! Upstream clients for deploynotes
//!
//! This crate provides the two collaborator contracts the release notes
//! pipeline consumes, plus their concrete implementations.
//!
//! ## Deployment sources
//! - **Octopus Deploy**: spaces, projects, environments, deployments, releases
//!   and build information over the REST API
//!
//! ## Commit sources
//! - **GitHub**: commit detail and change statistics over the REST API
//! - **Local git**: commit detail read from a local checkout with `git2`
//!
//! ## Usage
//!
//! ```ignore
//! use deploynotes_sources::{DeploymentSource, octopus::OctopusClient};
//!
//! let octopus = OctopusClient::new(&config.octopus)?;
//! let spaces = octopus.list_spaces().await?;
//! ```

pub mod error;
pub mod github;
pub mod local;
pub mod octopus;
pub mod traits;

pub use error::{Result, SourceError};
pub use github::{parse_commit_link, GitHubClient};
pub use local::LocalGitSource;
pub use octopus::OctopusClient;
pub use traits::{CommitSource, DeploymentSource};
