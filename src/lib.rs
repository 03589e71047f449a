pub mod config;
pub mod curation;
pub mod error;
pub mod github;
pub mod models;
pub mod snapshot;
pub mod taxonomy;

pub use config::{Config, PipelineConfig};
pub use curation::{CurationPipeline, CurationReport, RunSummary};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepoSource};
pub use taxonomy::Classifier;
