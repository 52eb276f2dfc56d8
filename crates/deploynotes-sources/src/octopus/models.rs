//! Octopus Deploy REST resources

use serde::Deserialize;
use tracing::warn;

use deploynotes_core::{
    BuildInfoRecord, BuildInfoRef, Deployment, NamedEntity, PackageSummary, RawCommit, Release,
};

/// Any named resource (space, project, environment)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NamedResource {
    pub id: String,
    pub name: String,
}

impl From<NamedResource> for NamedEntity {
    fn from(resource: NamedResource) -> Self {
        NamedEntity::new(resource.id, resource.name)
    }
}

/// Paged collection wrapper
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceCollection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeploymentResource {
    pub id: String,
    pub release_id: String,
}

impl From<DeploymentResource> for Deployment {
    fn from(resource: DeploymentResource) -> Self {
        Deployment {
            id: resource.id,
            release_id: resource.release_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ReleaseResource {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub assembled: Option<String>,
    #[serde(default)]
    pub build_information: Vec<ReleaseBuildInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ReleaseBuildInformation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl From<ReleaseResource> for Release {
    fn from(resource: ReleaseResource) -> Self {
        let mut release = Release::new(
            resource.id,
            resource.version.unwrap_or_else(|| "Unknown".to_string()),
        );
        if let Some(assembled) = resource.assembled {
            release = release.with_assembled(assembled);
        }

        for entry in resource.build_information {
            match entry.id {
                Some(id) => release.build_information.push(BuildInfoRef {
                    id,
                    package_id: entry.package_id,
                    version: entry.version,
                }),
                None => warn!(
                    release = %release.id,
                    package = ?entry.package_id,
                    "build information entry has no id, skipping"
                ),
            }
        }

        release
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct BuildInformationResource {
    pub id: String,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build_number: Option<String>,
    #[serde(default)]
    pub build_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub vcs_root: Option<String>,
    #[serde(default)]
    pub commits: Option<Vec<CommitResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CommitResource {
    pub id: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
}

impl From<BuildInformationResource> for BuildInfoRecord {
    fn from(resource: BuildInformationResource) -> Self {
        let commits = resource
            .commits
            .unwrap_or_default()
            .into_iter()
            .map(|c| RawCommit {
                id: c.id,
                comment: c.comment.unwrap_or_default(),
                link_url: c.link_url.filter(|url| !url.is_empty()),
            })
            .collect();

        BuildInfoRecord {
            id: resource.id,
            package: PackageSummary {
                package_id: resource.package_id,
                version: resource.version,
                build_number: resource.build_number,
                build_url: resource.build_url,
                branch: resource.branch,
                vcs_root: resource.vcs_root,
            },
            commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_conversion() {
        let json = r#"{
            "Id": "Releases-961805",
            "Version": "0.1.2942+7bc3c67.3022.1",
            "Assembled": "2025-10-19T20:38:50.111+00:00",
            "BuildInformation": [
                {"Id": "BuildInformation-1", "PackageId": "OctopusCopilot", "Version": "0.1.2942"},
                {"PackageId": "NoId"},
                {"Id": "BuildInformation-2"}
            ]
        }"#;

        let resource: ReleaseResource = serde_json::from_str(json).unwrap();
        let release: Release = resource.into();

        assert_eq!(release.version, "0.1.2942+7bc3c67.3022.1");
        assert!(release.assembled_at.is_some());
        let ids: Vec<&str> = release.build_information.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BuildInformation-1", "BuildInformation-2"]);
        assert_eq!(
            release.build_information[0].package_id.as_deref(),
            Some("OctopusCopilot")
        );
    }

    #[test]
    fn test_build_information_conversion() {
        let json = r#"{
            "Id": "BuildInformation-1",
            "PackageId": "OctopusCopilot",
            "Version": "0.1.2942",
            "BuildNumber": "3022",
            "Branch": "main",
            "Commits": [
                {
                    "Id": "7bc3c67b83d8124fbaf4c5adfae805592fb0385b",
                    "LinkUrl": "https://github.com/Org/Repo/commit/7bc3c67b83d8124fbaf4c5adfae805592fb0385b",
                    "Comment": "Updated context"
                },
                {"Id": "abc1234", "Comment": null, "LinkUrl": ""}
            ]
        }"#;

        let resource: BuildInformationResource = serde_json::from_str(json).unwrap();
        let record: BuildInfoRecord = resource.into();

        assert_eq!(record.package.build_number.as_deref(), Some("3022"));
        assert_eq!(record.commits.len(), 2);
        assert_eq!(record.commits[0].comment, "Updated context");
        assert!(record.commits[1].link_url.is_none());
        assert_eq!(record.commits[1].comment, "");
    }

    #[test]
    fn test_build_information_without_commits() {
        let resource: BuildInformationResource =
            serde_json::from_str(r#"{"Id": "BuildInformation-9", "Commits": null}"#).unwrap();
        let record: BuildInfoRecord = resource.into();
        assert!(record.commits.is_empty());
    }

    #[test]
    fn test_deployment_collection() {
        let json = r#"{"Items": [{"Id": "Deployments-1", "ReleaseId": "Releases-1", "Created": "2025-10-23T10:00:00Z"}]}"#;
        let collection: ResourceCollection<DeploymentResource> = serde_json::from_str(json).unwrap();
        let deployment: Deployment = collection.items.into_iter().next().unwrap().into();
        assert_eq!(deployment.release_id, "Releases-1");
    }
}
