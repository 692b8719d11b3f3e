pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{engine::VitalsEngine, pipeline::VitalsPipeline};
pub use crate::core::query::build_request;
pub use crate::core::scoring::score_response;
pub use crate::domain::model::{
    Band, DomainResult, FormFactor, MetricName, QueryConfig, QueryTarget, QueryType,
    RequestPayload, ResultSet, ScoredMetric,
};
pub use crate::utils::error::{Result, VitalsError};
