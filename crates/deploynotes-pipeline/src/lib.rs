//! deploynotes Pipeline - from deployment names to release notes
//!
//! Stages run in order, each consuming the previous stage's output:
//!
//! 1. [`NameResolver`] maps space, project and environment names to ids
//! 2. [`ReleaseLocator`] finds the release of the latest deployment
//! 3. [`BuildInfoAggregator`] collects the release's commits
//! 4. [`CommitEnricher`] adds detail from the commit source
//! 5. classification and rendering from `deploynotes-notes`
//!
//! [`ReleaseNotesPipeline`] wires them together.

pub mod aggregator;
pub mod enricher;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod resolver;

#[cfg(test)]
mod fakes;

pub use aggregator::{AggregatedBuildInfo, BuildInfoAggregator};
pub use enricher::CommitEnricher;
pub use error::{PipelineError, Result};
pub use locator::ReleaseLocator;
pub use pipeline::ReleaseNotesPipeline;
pub use resolver::NameResolver;
