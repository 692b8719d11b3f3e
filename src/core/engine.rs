use crate::core::{Pipeline, ResultSet};
use crate::utils::error::Result;

/// Outcome of one submission.
#[derive(Debug)]
pub struct RunOutcome {
    pub results: ResultSet,
    pub written: Vec<String>,
}

pub struct VitalsEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> VitalsEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting Core Web Vitals check...");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Fetched {} record(s)", raw_data.len());

        // Transform
        let results = self.pipeline.transform(raw_data).await?;
        tracing::info!("Scored {} domain(s)", results.len());

        // Load
        let written = self.pipeline.load(&results).await?;
        for path in &written {
            tracing::info!("📁 Output saved to: {}", path);
        }

        Ok(RunOutcome { results, written })
    }
}
