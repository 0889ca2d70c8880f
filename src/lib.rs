#![warn(missing_docs)]
#![warn(clippy::all)]

//! repolens - repository structure analysis for README generation
//!
//! This library fetches a GitHub repository's recursive file listing (plus
//! metadata, README, and package manifest), evaluates a fixed table of
//! boolean feature flags over the flattened structure, and collapses the
//! flags into a single project-type label via an explicit precedence list.
//! A downstream README assembler embeds the returned tree text, flags, and
//! type into a prompt for a text-generation model; that layer is not part
//! of this crate.
//!
//! ## Usage
//! ```rust,ignore
//! use repolens::{Analyzer, Config, RepoId};
//!
//! async fn example() -> repolens::Result<()> {
//!     let analyzer = Analyzer::new(Config::load()?)?;
//!     let analysis = analyzer.analyze(&RepoId::parse("rust-lang/cargo")?).await?;
//!     println!("{}", analysis.project_type);
//!     println!("{}", analysis.structure_text());
//!     Ok(())
//! }
//! ```

/// Configuration for tokens, endpoints, and fetch policy
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// GitHub REST API client and tree fetcher
pub mod github;
/// Flattened repository tree representation
pub mod tree;
/// Feature-flag evaluation and project-type classification
pub mod classify;
/// Fetch-and-classify pipeline entry point
pub mod analyzer;

// Re-export common types
pub use analyzer::{Analyzer, RepoAnalysis, STRUCTURE_UNAVAILABLE};
pub use classify::{classify, Classification, FeatureFlags, ProjectType};
pub use config::{Config, StructureErrorPolicy};
pub use error::{AnalyzerError, Result};
pub use github::{GitHubClient, License, RepoId, RepositoryMetadata};
pub use tree::{EntryKind, RepositoryTree, TreeEntry};
