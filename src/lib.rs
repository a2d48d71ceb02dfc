pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{local_storage::LocalStorage, mongo::MongoSource};
pub use config::{ExporterConfig, Overrides};
pub use core::{etl::EtlEngine, pipeline::SnapshotPipeline};
pub use utils::error::{EtlError, Result};
