use crate::config::Overrides;
use crate::domain::model::ViewKind;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "hackathon-snapshot")]
#[command(about = "Export the hackathon collection from MongoDB into JSON snapshot files")]
pub struct CliArgs {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the JSON files are written to
    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub collection: Option<String>,

    /// Fall back to another existing collection when the configured one is missing
    #[arg(long)]
    pub discover: bool,

    /// Views to export (all, online, offline, featured, by_prize)
    #[arg(long, value_delimiter = ',')]
    pub views: Option<Vec<ViewKind>>,

    /// Show what would be exported without connecting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
            discover: self.discover.then_some(true),
            views: self.views.clone(),
        }
    }
}
