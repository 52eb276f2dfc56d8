//! deploynotes Core - configuration and data model for release notes generation
//!
//! This crate provides the configuration layer, the configuration error type and
//! the entities that flow through the release notes pipeline: named and resolved
//! scopes, releases, build information and commits.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use types::{
    is_path_segment, parse_timestamp, BuildInfoRecord, BuildInfoRef, Classification,
    CommitDetail, CommitStats, Deployment, EnrichedCommit, EntityKind, FileChange, NamedEntity,
    NamedScope, PackageSummary, RawCommit, Release, RepoRef, ResolvedScope, UNKNOWN_AUTHOR,
};
