use crate::domain::model::TransformResult;
use crate::domain::value::Fields;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Writes `data` and returns the location it was written to.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Where raw records come from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Fields>>;

    /// Releases the underlying connection. Called once per run.
    async fn release(&self);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Fields>>;
    async fn transform(&self, data: Vec<Fields>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<Vec<String>>;
    async fn release(&self);
}
