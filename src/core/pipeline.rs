use crate::config::OutputConfig;
use crate::core::normalize::{generation_timestamp, normalize_record};
use crate::core::views::build_views;
use crate::core::{Fields, Pipeline, RecordSource, Storage, TransformResult};
use crate::domain::model::Record;
use crate::utils::error::Result;
use chrono::Utc;

/// Reads every record from `source`, builds the configured views and writes
/// one JSON file per view to `storage`.
pub struct SnapshotPipeline<R: RecordSource, S: Storage> {
    source: R,
    storage: S,
    output: OutputConfig,
}

impl<R: RecordSource, S: Storage> SnapshotPipeline<R, S> {
    pub fn new(source: R, storage: S, output: OutputConfig) -> Self {
        Self {
            source,
            storage,
            output,
        }
    }
}

#[async_trait::async_trait]
impl<R: RecordSource, S: Storage> Pipeline for SnapshotPipeline<R, S> {
    async fn extract(&self) -> Result<Vec<Fields>> {
        self.source.fetch_all().await
    }

    async fn transform(&self, data: Vec<Fields>) -> Result<TransformResult> {
        let records: Vec<Record> = data.iter().map(normalize_record).collect();
        let generated_at = generation_timestamp(Utc::now());

        let views = build_views(&records, &self.output.views, &generated_at);

        Ok(TransformResult {
            generated_at,
            total_records: records.len(),
            views,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let mut written = Vec::with_capacity(result.views.len());

        // 任一檔案寫入失敗即中止，不做部分成功的補救
        for view in &result.views {
            let file_name = self.output.file_name(view.kind);
            let json = serde_json::to_string_pretty(&view.snapshot)?;

            tracing::debug!(
                "Writing view '{}' ({} records, {} bytes) to {}",
                view.kind,
                view.snapshot.count(),
                json.len(),
                file_name
            );
            let location = self.storage.write_file(file_name, json.as_bytes()).await?;
            tracing::info!("Data successfully saved to {}", location);
            written.push(location);
        }

        Ok(written)
    }

    async fn release(&self) {
        self.source.release().await;
    }
}
