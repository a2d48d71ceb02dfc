use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Optional TOML configuration file. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub source: SourceSection,
    pub collection: CollectionSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub uri: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSection {
    pub name: Option<String>,
    pub discover: Option<bool>,
    pub candidates: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: Option<String>,
    pub views: Option<Vec<String>>,
    /// 以 view 名稱為 key 覆寫輸出檔名
    pub file_names: Option<BTreeMap<String, String>>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 以行程環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = substitute_env_vars(content, lookup);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${MONGODB_URI})，找不到的保持原樣
fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
uri = "mongodb://localhost:27017"
database = "events"

[collection]
name = "listings"
discover = true
candidates = ["listings", "hackathons"]

[output]
dir = "./public"
views = ["all", "featured"]

[output.file_names]
all = "hackathons.json"
"#;

        let config = FileConfig::from_toml_str_with(toml_content, |_| None).unwrap();

        assert_eq!(config.source.database.as_deref(), Some("events"));
        assert_eq!(config.collection.discover, Some(true));
        assert_eq!(config.output.views.unwrap(), vec!["all", "featured"]);
        assert_eq!(
            config.output.file_names.unwrap().get("all").map(String::as_str),
            Some("hackathons.json")
        );
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = FileConfig::from_toml_str_with("", |_| None).unwrap();
        assert!(config.source.uri.is_none());
        assert!(config.output.views.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        let toml_content = r#"
[source]
uri = "${SNAPSHOT_TEST_URI}"
database = "${UNSET_VAR}"
"#;

        let config = FileConfig::from_toml_str_with(toml_content, |name| {
            (name == "SNAPSHOT_TEST_URI").then(|| "mongodb://db:27017".to_string())
        })
        .unwrap();

        assert_eq!(config.source.uri.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(config.source.database.as_deref(), Some("${UNSET_VAR}"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = FileConfig::from_toml_str_with("[source\nuri = 1", |_| None).unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[collection]\nname = \"hackathons\"\n")
            .unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.collection.name.as_deref(), Some("hackathons"));
    }
}
