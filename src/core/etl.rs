use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs all stages, then releases the pipeline's source whether or not a
    /// stage failed. Returns the locations of the written files.
    pub async fn run(&self) -> Result<Vec<String>> {
        let outcome = self.run_stages().await;
        self.pipeline.release().await;
        outcome
    }

    async fn run_stages(&self) -> Result<Vec<String>> {
        tracing::info!("Starting snapshot export...");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Found {} hackathons", raw_data.len());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        for view in &transformed.views {
            tracing::info!("View '{}': {} records", view.kind, view.snapshot.count());
        }

        // Load
        let total = transformed.total_records;
        let written = self.pipeline.load(transformed).await?;
        tracing::info!(
            "Wrote {} files, total hackathons: {}",
            written.len(),
            total
        );

        Ok(written)
    }
}
