use crate::domain::model::{QueryConfig, RawRecord, ResultSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// 儲存位置的顯示路徑
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn domains(&self) -> &[String];
    fn query_config(&self) -> QueryConfig;
    fn output_formats(&self) -> &[String];
    fn archive(&self) -> bool;
    fn request_timeout(&self) -> Option<Duration>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<ResultSet>;
    async fn load(&self, results: &ResultSet) -> Result<Vec<String>>;
}
