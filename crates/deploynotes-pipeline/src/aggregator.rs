//! Build information aggregation

use std::collections::HashSet;
use std::sync::Arc;

use deploynotes_core::{PackageSummary, RawCommit, Release};
use deploynotes_sources::DeploymentSource;
use tracing::{debug, info, instrument, warn};

/// Commits and packages gathered from a release's build information
#[derive(Debug, Clone, Default)]
pub struct AggregatedBuildInfo {
    /// One entry per record fetched, in release order
    pub packages: Vec<PackageSummary>,
    /// Commits deduplicated by id, first occurrence kept
    pub commits: Vec<RawCommit>,
    /// Ids of records that could not be fetched
    pub failed: Vec<String>,
}

/// Flattens the commits of every build information record of a release
pub struct BuildInfoAggregator {
    source: Arc<dyn DeploymentSource>,
}

impl BuildInfoAggregator {
    /// Create a new aggregator
    pub fn new(source: Arc<dyn DeploymentSource>) -> Self {
        Self { source }
    }

    /// Ordered, deduplicated commits of the release
    pub async fn aggregate(&self, space_id: &str, release: &Release) -> Vec<RawCommit> {
        self.aggregate_with_packages(space_id, release).await.commits
    }

    /// Commits plus the package metadata of each record.
    ///
    /// A record that fails to load is skipped; the rest still count.
    #[instrument(skip(self, release), fields(release = %release.id, ref_count = release.build_information.len()))]
    pub async fn aggregate_with_packages(
        &self,
        space_id: &str,
        release: &Release,
    ) -> AggregatedBuildInfo {
        let mut result = AggregatedBuildInfo::default();
        let mut seen = HashSet::new();

        for build_ref in &release.build_information {
            let record = match self
                .source
                .get_build_information(space_id, &build_ref.id)
                .await
            {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        build_info = %build_ref.id,
                        error = %e,
                        "failed to fetch build information, skipping"
                    );
                    result.failed.push(build_ref.id.clone());
                    continue;
                }
            };

            let mut package = record.package;
            if package.package_id.is_none() {
                package.package_id = build_ref.package_id.clone();
            }
            if package.version.is_none() {
                package.version = build_ref.version.clone();
            }
            result.packages.push(package);

            let listed = record.commits.len();
            for commit in record.commits {
                if seen.insert(commit.id.clone()) {
                    result.commits.push(commit);
                }
            }
            debug!(build_info = %record.id, listed, "read build information");
        }

        info!(
            commits = result.commits.len(),
            packages = result.packages.len(),
            failed = result.failed.len(),
            "aggregated build information"
        );
        result
    }
}
