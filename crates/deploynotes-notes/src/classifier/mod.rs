//! Commit classification

mod policy;

pub use policy::PolicyClassifier;

use deploynotes_core::{Classification, EnrichedCommit};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of evaluating one commit title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Kept and placed in a category
    Included(Classification),
    /// Dropped from the notes because a pattern matched
    Excluded {
        /// The exclusion pattern that matched
        pattern: String,
    },
}

/// A commit together with its classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    /// The commit
    pub commit: EnrichedCommit,
    /// Category (excluded commits are `Other`)
    pub classification: Classification,
    /// Whether the commit appears in the rendered sections
    pub included: bool,
}

/// Trait for commit classifiers
pub trait CommitClassifier: Send + Sync {
    /// Evaluate a single commit
    fn evaluate(&self, commit: &EnrichedCommit) -> Verdict;

    /// Classify commits one-to-one, preserving order
    fn classify(&self, commits: Vec<EnrichedCommit>) -> Vec<ClassifiedCommit> {
        let classified: Vec<ClassifiedCommit> = commits
            .into_iter()
            .map(|commit| {
                let (classification, included) = match self.evaluate(&commit) {
                    Verdict::Included(category) => (category, true),
                    Verdict::Excluded { .. } => (Classification::Other, false),
                };
                ClassifiedCommit {
                    commit,
                    classification,
                    included,
                }
            })
            .collect();

        debug!(
            included = classified.iter().filter(|c| c.included).count(),
            skipped = classified.iter().filter(|c| !c.included).count(),
            "commits classified"
        );
        classified
    }
}
