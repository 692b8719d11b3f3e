pub mod client;
pub mod engine;
pub mod format;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod scoring;

pub use crate::domain::model::{DomainResult, RawRecord, ResultSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
