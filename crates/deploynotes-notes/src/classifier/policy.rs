//! Policy-table classifier

use tracing::debug;

use deploynotes_core::config::ClassificationConfig;
use deploynotes_core::{Classification, EnrichedCommit};

use super::{CommitClassifier, Verdict};

struct Rule {
    category: Classification,
    prefixes: Vec<String>,
    keywords: Vec<String>,
}

/// Classifier driven by a [`ClassificationConfig`] table.
///
/// Titles are compared case-insensitively. Exclusion is checked first; the
/// first categorization rule that matches wins and anything left over is
/// [`Classification::Other`].
pub struct PolicyClassifier {
    exclude_prefixes: Vec<String>,
    exclude_keywords: Vec<String>,
    rules: Vec<Rule>,
}

impl PolicyClassifier {
    /// Create a classifier from a policy table
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            exclude_prefixes: lowercase_all(&config.exclude_prefixes),
            exclude_keywords: lowercase_all(&config.exclude_keywords),
            rules: config
                .rules
                .iter()
                .map(|rule| Rule {
                    category: rule.category,
                    prefixes: lowercase_all(&rule.prefixes),
                    keywords: lowercase_all(&rule.keywords),
                })
                .collect(),
        }
    }

    /// Evaluate a bare title
    pub fn evaluate_title(&self, title: &str) -> Verdict {
        let title = title.trim().to_lowercase();

        if let Some(pattern) = self
            .exclude_prefixes
            .iter()
            .find(|p| title.starts_with(p.as_str()))
            .or_else(|| {
                self.exclude_keywords
                    .iter()
                    .find(|k| title.contains(k.as_str()))
            })
        {
            return Verdict::Excluded {
                pattern: pattern.clone(),
            };
        }

        let category = self
            .rules
            .iter()
            .find(|rule| {
                rule.prefixes.iter().any(|p| title.starts_with(p.as_str()))
                    || rule.keywords.iter().any(|k| title.contains(k.as_str()))
            })
            .map(|rule| rule.category)
            .unwrap_or(Classification::Other);

        Verdict::Included(category)
    }
}

impl Default for PolicyClassifier {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}

impl CommitClassifier for PolicyClassifier {
    fn evaluate(&self, commit: &EnrichedCommit) -> Verdict {
        let verdict = self.evaluate_title(commit.title());
        if let Verdict::Excluded { pattern } = &verdict {
            debug!(commit = %commit.short_id(), pattern = %pattern, "commit excluded");
        }
        verdict
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}
