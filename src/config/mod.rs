#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use crate::domain::model::ViewKind;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_connection_uri, validate_file_name, validate_non_empty_string, validate_path,
    Validate,
};
use file::FileConfig;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const MONGODB_URI_ENV: &str = "MONGODB_URI";
pub const DEFAULT_DATABASE: &str = "dumpy";
pub const DEFAULT_COLLECTION: &str = "hackathons";
pub const DEFAULT_CANDIDATES: [&str; 3] = ["hackathons", "hackathon", "events"];
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Clone)]
pub struct SourceConfig {
    pub uri: String,
    pub database: String,
    pub collection: CollectionConfig,
}

// URI 可能含有帳密，不輸出到日誌
impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConfig {
    pub name: String,
    /// Probe `candidates` and then any existing collection when `name` is absent.
    pub discover: bool,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub dir: String,
    pub views: Vec<ViewKind>,
    pub file_names: BTreeMap<ViewKind, String>,
}

impl OutputConfig {
    pub fn file_name(&self, kind: ViewKind) -> &str {
        self.file_names
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_file_name())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            views: ViewKind::ALL_KINDS.to_vec(),
            file_names: BTreeMap::new(),
        }
    }
}

/// Values given on the command line. They take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub discover: Option<bool>,
    pub views: Option<Vec<ViewKind>>,
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl ExporterConfig {
    /// Merges defaults, the optional config file and command line overrides.
    /// The connection string is read through `env`, so callers decide whether
    /// that is the process environment.
    pub fn resolve<F>(file: Option<FileConfig>, overrides: &Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();

        let uri = env(MONGODB_URI_ENV)
            .or(file.source.uri)
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| EtlError::MissingConfigError {
                field: MONGODB_URI_ENV.to_string(),
            })?;

        let database = overrides
            .database
            .clone()
            .or(file.source.database)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let collection = CollectionConfig {
            name: overrides
                .collection
                .clone()
                .or(file.collection.name)
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            discover: overrides
                .discover
                .or(file.collection.discover)
                .unwrap_or(false),
            candidates: file
                .collection
                .candidates
                .unwrap_or_else(|| DEFAULT_CANDIDATES.map(String::from).to_vec()),
        };

        let views = match (&overrides.views, file.output.views) {
            (Some(views), _) => views.clone(),
            (None, Some(names)) => names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<Vec<ViewKind>>>()?,
            (None, None) => ViewKind::ALL_KINDS.to_vec(),
        };

        let file_names = file
            .output
            .file_names
            .unwrap_or_default()
            .into_iter()
            .map(|(view, name)| Ok((view.parse::<ViewKind>()?, name)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let output = OutputConfig {
            dir: overrides
                .output_dir
                .clone()
                .or(file.output.dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            views,
            file_names,
        };

        Ok(Self {
            source: SourceConfig {
                uri,
                database,
                collection,
            },
            output,
        })
    }
}

impl Validate for ExporterConfig {
    fn validate(&self) -> Result<()> {
        validate_connection_uri(MONGODB_URI_ENV, &self.source.uri)?;
        validate_non_empty_string("source.database", &self.source.database)?;
        validate_non_empty_string("collection.name", &self.source.collection.name)?;
        validate_path("output.dir", &self.output.dir)?;

        if self.output.views.is_empty() {
            return Err(EtlError::InvalidConfigValueError {
                field: "output.views".to_string(),
                value: String::new(),
                reason: "At least one view must be enabled".to_string(),
            });
        }

        // 兩個 view 寫到同一個檔案會互相覆蓋
        let mut claimed: HashMap<&str, ViewKind> = HashMap::new();
        for kind in &self.output.views {
            let file_name = self.output.file_name(*kind);
            validate_file_name(&format!("output.file_names.{}", kind), file_name)?;

            if let Some(previous) = claimed.insert(file_name, *kind) {
                return Err(EtlError::InvalidConfigValueError {
                    field: format!("output.file_names.{}", kind),
                    value: file_name.to_string(),
                    reason: format!("File name is already used by view '{}'", previous),
                });
            }
        }

        Ok(())
    }
}
