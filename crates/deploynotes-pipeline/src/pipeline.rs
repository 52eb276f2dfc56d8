//! Pipeline entry point

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use deploynotes_core::{Config, NamedScope};
use deploynotes_notes::{
    CommitClassifier, MarkdownRenderer, NotesRenderer, PolicyClassifier, ReleaseNotesDocument,
};
use deploynotes_sources::{CommitSource, DeploymentSource};

use crate::aggregator::BuildInfoAggregator;
use crate::enricher::CommitEnricher;
use crate::error::Result;
use crate::locator::ReleaseLocator;
use crate::resolver::NameResolver;

/// Runs every stage from name resolution to rendering.
///
/// Holds no state between runs; each call starts from the names again.
pub struct ReleaseNotesPipeline {
    config: Config,
    resolver: NameResolver,
    locator: ReleaseLocator,
    aggregator: BuildInfoAggregator,
    enricher: CommitEnricher,
    classifier: Box<dyn CommitClassifier>,
    renderer: MarkdownRenderer,
}

impl ReleaseNotesPipeline {
    /// Wire the stages to the given sources.
    ///
    /// Without a commit source every commit keeps its build information fields.
    pub fn new(
        config: Config,
        deployments: Arc<dyn DeploymentSource>,
        commits: Option<Arc<dyn CommitSource>>,
    ) -> Self {
        Self {
            resolver: NameResolver::new(deployments.clone())
                .concurrent(config.pipeline.concurrent_lookups),
            locator: ReleaseLocator::new(deployments.clone()),
            aggregator: BuildInfoAggregator::new(deployments),
            enricher: CommitEnricher::from_config(commits, &config),
            classifier: Box::new(PolicyClassifier::new(&config.classification)),
            renderer: MarkdownRenderer::new(config.render.clone()),
            config,
        }
    }

    /// Replace the policy classifier
    pub fn with_classifier(mut self, classifier: Box<dyn CommitClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the markdown renderer
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Build the document for the release last deployed to `scope`
    #[instrument(skip(self, scope), fields(space = %scope.space, project = %scope.project, environment = %scope.environment))]
    pub async fn run_document(&self, scope: &NamedScope) -> Result<ReleaseNotesDocument> {
        let resolved = self.resolver.resolve(scope).await?;
        let release = self.locator.locate(&resolved).await?;

        let aggregated = self
            .aggregator
            .aggregate_with_packages(&resolved.space_id, &release)
            .await;
        let enriched = self.enricher.enrich(aggregated.commits).await;
        let classified = self.classifier.classify(enriched);

        let document = ReleaseNotesDocument::build(
            &release,
            scope,
            aggregated.packages,
            classified,
            self.config.render.title.as_deref(),
        );
        info!(
            version = %document.metadata.version,
            commits = document.total_commits,
            skipped = document.skipped_commits,
            "release notes ready"
        );
        Ok(document)
    }

    /// Build and render the notes as markdown, footer included when enabled
    pub async fn run(&self, scope: &NamedScope) -> Result<String> {
        let document = self.run_document(scope).await?;
        Ok(self.renderer.render_with_footer(&document, Utc::now()))
    }

    /// Render a document without the footer
    pub fn render(&self, document: &ReleaseNotesDocument) -> String {
        self.renderer.render(document)
    }
}
