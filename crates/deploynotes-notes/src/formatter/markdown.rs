//! Markdown release notes renderer

use chrono::{DateTime, Utc};
use deploynotes_core::config::RenderConfig;
use deploynotes_core::{EnrichedCommit, PackageSummary};
use tracing::{debug, instrument};

use super::NotesRenderer;
use crate::document::{NotesMetadata, ReleaseNotesDocument};

const DATE_FORMAT: &str = "%B %d, %Y at %H:%M UTC";
const RULE: &str = "---\n\n";
const UNKNOWN: &str = "Unknown";

/// Markdown release notes renderer
///
/// [`NotesRenderer::render`] never reads the clock; the "generated on"
/// footer is produced separately by [`MarkdownRenderer::render_footer`].
pub struct MarkdownRenderer {
    config: RenderConfig,
}

impl MarkdownRenderer {
    /// Create a renderer with the given options
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Rendering options
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Footer stamped with the generation time
    pub fn render_footer(&self, generated_at: DateTime<Utc>) -> String {
        format!("{}*Generated on {}*\n", RULE, generated_at.format(DATE_FORMAT))
    }

    /// Render the document followed by the footer, if enabled
    pub fn render_with_footer(
        &self,
        document: &ReleaseNotesDocument,
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut output = self.render(document);
        if self.config.include_footer {
            output.push('\n');
            output.push_str(&self.render_footer(generated_at));
        }
        output
    }

    fn write_header(&self, output: &mut String, metadata: &NotesMetadata) {
        output.push_str(&format!("# Release Notes: {}\n\n", metadata.title));
        output.push_str(&format!("## Version {}\n\n", metadata.version));

        let lines = [
            format!("**Released:** {}", release_date(metadata)),
            format!("**Project:** {}", metadata.project),
            format!("**Environment:** {}", metadata.environment),
            format!("**Space:** {}", metadata.space),
        ];
        // Two trailing spaces force a markdown line break
        output.push_str(&lines.join("  \n"));
        output.push_str("\n\n");
    }

    fn write_summary(&self, output: &mut String, document: &ReleaseNotesDocument) {
        output.push_str(RULE);
        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "This release contains {} commit(s).\n\n",
            document.total_commits
        ));

        if !document.sections.is_empty() {
            for section in &document.sections {
                let (singular, plural) = section.classification.noun();
                let count = section.commits.len();
                let noun = if count == 1 { singular } else { plural };
                output.push_str(&format!("- {} {}\n", count, noun));
            }
            output.push('\n');
        }

        if document.skipped_commits > 0 {
            output.push_str(&format!(
                "{} commit(s) were filtered out as maintenance changes.\n\n",
                document.skipped_commits
            ));
        }

        if !document.packages.is_empty() {
            output.push_str("### Packages\n\n");
            for package in &document.packages {
                output.push_str(&package_line(package));
            }
            output.push('\n');
        }
    }

    fn write_changes(&self, output: &mut String, document: &ReleaseNotesDocument) {
        output.push_str(RULE);
        output.push_str("## Changes\n\n");

        if document.is_empty() {
            output.push_str("*No commit information available for this release.*\n\n");
            return;
        }
        if document.sections.is_empty() {
            output.push_str(&format!(
                "*All {} commit(s) in this release were filtered out.*\n\n",
                document.total_commits
            ));
            return;
        }

        for section in &document.sections {
            output.push_str(&format!("### {}\n\n", section.title));
            for commit in &section.commits {
                output.push_str(&commit_line(commit));
            }
            output.push('\n');
        }
    }

    fn write_details(&self, output: &mut String, commits: &[EnrichedCommit]) {
        output.push_str(RULE);
        output.push_str("## Detailed Commit Information\n\n");

        for commit in commits {
            output.push_str(&format!("### Commit {}\n\n", commit.short_id()));

            let mut lines = vec![format!("**Author:** {}", commit.author)];
            if let Some(at) = commit.committed_at {
                lines.push(format!("**Date:** {}", at.format(DATE_FORMAT)));
            }
            if let Some(url) = web_link(commit) {
                lines.push(format!("**Link:** <{}>", url));
            }
            output.push_str(&lines.join("  \n"));
            output.push_str("\n\n");

            let message = commit.full_message.trim();
            if !message.is_empty() {
                let fence = fence_for(message);
                output.push_str(&format!(
                    "**Message:**\n\n{}\n{}\n{}\n\n",
                    fence, message, fence
                ));
            }

            if let Some(stats) = &commit.stats {
                output.push_str(&format!(
                    "**Changes:** {} file(s) changed, +{} / -{}\n\n",
                    stats.files_changed, stats.additions, stats.deletions
                ));

                if !stats.files.is_empty() {
                    for file in stats.files.iter().take(self.config.max_files) {
                        output.push_str(&format!(
                            "- `{}` (+{} / -{})\n",
                            file.filename, file.additions, file.deletions
                        ));
                    }
                    let hidden = stats.files.len().saturating_sub(self.config.max_files);
                    if hidden > 0 {
                        output.push_str(&format!("- ... ({} more files)\n", hidden));
                    }
                    output.push('\n');
                }
            }
        }
    }

    fn write_contributors(&self, output: &mut String, contributors: &[String]) {
        output.push_str(RULE);
        output.push_str("## Contributors\n\n");
        output.push_str(&format!(
            "This release includes contributions from {} contributor(s):\n\n",
            contributors.len()
        ));
        for contributor in contributors {
            output.push_str(&format!("- {}\n", contributor));
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl NotesRenderer for MarkdownRenderer {
    #[instrument(skip(self, document), fields(version = %document.metadata.version, section_count = document.sections.len()))]
    fn render(&self, document: &ReleaseNotesDocument) -> String {
        let mut output = String::new();

        self.write_header(&mut output, &document.metadata);
        self.write_summary(&mut output, document);
        self.write_changes(&mut output, document);

        if self.config.include_details && !document.details.is_empty() {
            self.write_details(&mut output, &document.details);
        }
        if self.config.include_contributors && !document.contributors.is_empty() {
            self.write_contributors(&mut output, &document.contributors);
        }

        // Sections end with a blank line; keep exactly one trailing newline
        let trimmed = output.trim_end().len();
        output.truncate(trimmed);
        output.push('\n');

        debug!(output_len = output.len(), "markdown release notes rendered");
        output
    }
}

fn release_date(metadata: &NotesMetadata) -> String {
    match (&metadata.released_at, &metadata.released_raw) {
        (Some(at), _) => at.format(DATE_FORMAT).to_string(),
        (None, Some(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn commit_line(commit: &EnrichedCommit) -> String {
    let short_id = commit.short_id();
    let reference = match web_link(commit) {
        Some(url) => format!("[`{}`]({})", short_id, url),
        None => format!("`{}`", short_id),
    };

    let title = commit.title();
    if title.is_empty() {
        format!("- {} - {}\n", reference, commit.author)
    } else {
        format!("- **{}** ({}) - {}\n", title, reference, commit.author)
    }
}

fn package_line(package: &PackageSummary) -> String {
    let mut line = format!(
        "- `{}`",
        package.package_id.as_deref().unwrap_or("unknown package")
    );
    if let Some(version) = &package.version {
        line.push_str(&format!(" {}", version));
    }

    let mut extras = Vec::new();
    if let Some(build) = &package.build_number {
        extras.push(format!("build {}", build));
    }
    if let Some(branch) = &package.branch {
        extras.push(format!("branch `{}`", branch));
    }
    if let Some(url) = package.build_url.as_deref().filter(|u| is_web_url(u)) {
        extras.push(format!("[build log]({})", url));
    }
    if !extras.is_empty() {
        line.push_str(&format!(" ({})", extras.join(", ")));
    }

    line.push('\n');
    line
}

fn web_link(commit: &EnrichedCommit) -> Option<&str> {
    commit.link_url.as_deref().filter(|url| is_web_url(url))
}

fn is_web_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://"))
        && !url.chars().any(|c| c.is_whitespace() || c == ')' || c == '>')
}

/// A code fence longer than any backtick run in `text`
fn fence_for(text: &str) -> String {
    let mut fence = "```".to_string();
    while text.contains(fence.as_str()) {
        fence.push('`');
    }
    fence
}
