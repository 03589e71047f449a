pub mod enricher;
pub mod featured;
pub mod filter;
pub mod pipeline;
pub mod quality;
pub mod summary;

pub use enricher::{EnrichConfig, EnrichmentOutcome, MetricsEnricher};
pub use featured::{FeaturedRules, FeaturedSelector};
pub use filter::{BasicFilter, Exclusion};
pub use pipeline::{CurationPipeline, CurationReport};
pub use quality::QualityGate;
pub use summary::RunSummary;
