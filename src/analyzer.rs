use crate::classify::{classify, Classification, FeatureFlags, ProjectType};
use crate::config::{Config, StructureErrorPolicy};
use crate::error::Result;
use crate::github::{GitHubClient, RepoId, RepositoryMetadata};
use crate::tree::RepositoryTree;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Sentinel structure text used when the tree fetch is degraded away
pub const STRUCTURE_UNAVAILABLE: &str = "Unable to analyze repository structure";

/// Everything the README assembler needs for one repository
///
/// Request-scoped and immutable; nothing here is cached across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoAnalysis {
    /// Repository metadata as reported by the hosting API
    pub metadata: RepositoryMetadata,
    /// Flattened tree, or `None` when the structure fetch was degraded
    /// under [`StructureErrorPolicy::Placeholder`]
    pub tree: Option<RepositoryTree>,
    /// Evaluated feature flags
    pub flags: FeatureFlags,
    /// Collapsed project-type label
    pub project_type: ProjectType,
    /// Decoded README, when the repository has one
    pub readme: Option<String>,
    /// Parsed `package.json`, when the repository has one
    pub package_manifest: Option<serde_json::Value>,
}

impl RepoAnalysis {
    /// Rendered structure block for prompt embedding; the sentinel string
    /// when the tree was unavailable
    pub fn structure_text(&self) -> String {
        match &self.tree {
            Some(tree) => tree.render(),
            None => STRUCTURE_UNAVAILABLE.to_string(),
        }
    }

    /// One line per flag plus the collapsed type, for prompt embedding
    pub fn summary(&self) -> String {
        let mut out = format!("Project Type: {}\n", self.project_type);
        for (name, value) in self.flags.iter() {
            out.push_str(&format!(
                "{}: {}\n",
                name,
                if value { "Yes" } else { "No" }
            ));
        }
        out.pop();
        out
    }
}

/// Fetch-and-classify pipeline over a [`GitHubClient`]
///
/// One call to [`Analyzer::analyze`] runs one repository to completion;
/// concurrent calls are independent and share no mutable state.
pub struct Analyzer {
    client: GitHubClient,
    config: Config,
}

impl Analyzer {
    /// Creates an analyzer from the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = GitHubClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// Fetches metadata, README, manifest, and tree, then classifies
    ///
    /// A missing repository fails under either policy; only the structure
    /// fetch honors [`StructureErrorPolicy::Placeholder`], degrading to the
    /// sentinel structure and an empty classification.
    pub async fn analyze(&self, id: &RepoId) -> Result<RepoAnalysis> {
        let metadata = self.client.get_repository(id).await?;
        let readme = self.client.get_readme(id).await?;
        let package_manifest = self.client.get_package_manifest(id).await?;

        let tree = match self.client.fetch_tree(id, self.config.max_tree_depth).await {
            Ok(tree) => Some(tree),
            Err(e) if self.config.on_structure_error == StructureErrorPolicy::Placeholder => {
                warn!("Degrading structure for {}: {}", id.slug(), e);
                None
            }
            Err(e) => return Err(e),
        };

        let Classification {
            flags,
            project_type,
        } = match &tree {
            Some(tree) => classify(tree),
            None => Classification {
                flags: FeatureFlags::default(),
                project_type: ProjectType::Unknown,
            },
        };

        info!("Classified {} as {}", id.slug(), project_type);
        Ok(RepoAnalysis {
            metadata,
            tree,
            flags,
            project_type,
            readme,
            package_manifest,
        })
    }
}
