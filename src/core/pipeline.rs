use crate::core::client::CruxClient;
use crate::core::query::build_request;
use crate::core::report::{self, ReportDocument};
use crate::core::scoring::score_response;
use crate::core::{ConfigProvider, Pipeline, RawRecord, ResultSet, Storage};
use crate::utils::error::Result;
use crate::utils::validation::{validate_domain_entries, validate_target};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const JSON_FILENAME: &str = "vitals.json";
pub const CSV_FILENAME: &str = "vitals.csv";
pub const ARCHIVE_FILENAME: &str = "vitals_report.zip";

/// 依序查詢每個網域、計分並輸出報告
pub struct VitalsPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: CruxClient,
}

impl<S: Storage, C: ConfigProvider> VitalsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let client = CruxClient::new(
            config.api_endpoint(),
            config.api_key().map(str::to_string),
        )
        .with_timeout(config.request_timeout());

        Self {
            storage,
            config,
            client,
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for VitalsPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        let domains = self.config.domains();
        let query = self.config.query_config();

        validate_domain_entries(domains)?;

        // 先建立並驗證所有請求，再進行任何網路呼叫
        let mut requests = Vec::new();
        for domain in domains {
            let trimmed = domain.trim();
            if trimmed.is_empty() {
                continue;
            }

            let payload = build_request(trimmed, query.query_type, query.form_factor);
            validate_target(domain, payload.target.value())?;
            requests.push((domain, payload));
        }

        tracing::info!(
            "🚀 Querying {} target(s) from {} ({}, {})",
            requests.len(),
            self.client.endpoint(),
            query.query_type,
            query.form_factor
        );

        // 任何一個網域失敗即中止整批，不保留部分結果
        let mut records = Vec::with_capacity(requests.len());
        for (domain, payload) in requests {
            let response = self.client.query_record(domain, &payload).await?;
            tracing::info!("✅ Received record for {}", domain);
            records.push(RawRecord {
                domain: domain.clone(),
                response,
            });
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<ResultSet> {
        let mut results = ResultSet::new();

        for record in data {
            let scored = score_response(record.response);
            tracing::debug!(
                "{}: {} metric(s) with data",
                record.domain,
                scored.metrics.len()
            );
            results.insert(record.domain, scored);
        }

        Ok(results)
    }

    async fn load(&self, results: &ResultSet) -> Result<Vec<String>> {
        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();

        if self.wants("json") {
            let query = self.config.query_config();
            let document = ReportDocument {
                generated_at: chrono::Utc::now(),
                query_type: query.query_type.as_str(),
                form_factor: query.form_factor.as_str(),
                results,
            };
            files.push((JSON_FILENAME, report::to_json(&document)?.into_bytes()));
        }

        if self.wants("csv") {
            files.push((CSV_FILENAME, report::to_csv(results)?.into_bytes()));
        }

        if files.is_empty() {
            tracing::debug!("No file outputs requested");
            return Ok(Vec::new());
        }

        if self.config.archive() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            self.storage.write_file(ARCHIVE_FILENAME, &zip_data).await?;
            return Ok(vec![self.storage.location(ARCHIVE_FILENAME)]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in files {
            self.storage.write_file(name, &data).await?;
            written.push(self.storage.location(name));
        }

        Ok(written)
    }
}
