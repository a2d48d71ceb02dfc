use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DISPLAYED_LOCATION: &str = "displayed_location";
pub const FEATURED: &str = "featured";
pub const PRIZE_TEXT: &str = "prizeText";

/// A normalized hackathon record. Only a few fields are interpreted; the rest
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Trimmed, lowercased `displayed_location`; empty when absent or not text.
    pub fn location(&self) -> String {
        self.text(DISPLAYED_LOCATION)
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default()
    }

    /// Only a JSON `true` counts, not `"true"` or `1`.
    pub fn is_featured(&self) -> bool {
        matches!(self.data.get(FEATURED), Some(Value::Bool(true)))
    }

    pub fn prize_text(&self) -> Option<&str> {
        self.text(PRIZE_TEXT).filter(|s| !s.is_empty())
    }
}

/// The document written to each output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    last_updated: String,
    count: usize,
    hackathons: Vec<Record>,
}

impl Snapshot {
    pub fn new(last_updated: impl Into<String>, hackathons: Vec<Record>) -> Self {
        Self {
            last_updated: last_updated.into(),
            count: hackathons.len(),
            hackathons,
        }
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn records(&self) -> &[Record] {
        &self.hackathons
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    All,
    Online,
    Offline,
    Featured,
    ByPrize,
}

impl ViewKind {
    pub const ALL_KINDS: [ViewKind; 5] = [
        ViewKind::All,
        ViewKind::Online,
        ViewKind::Offline,
        ViewKind::Featured,
        ViewKind::ByPrize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::All => "all",
            ViewKind::Online => "online",
            ViewKind::Offline => "offline",
            ViewKind::Featured => "featured",
            ViewKind::ByPrize => "by_prize",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ViewKind::All => "data.json",
            ViewKind::Online => "data_online.json",
            ViewKind::Offline => "data_offline.json",
            ViewKind::Featured => "data_featured.json",
            ViewKind::ByPrize => "data_by_prize.json",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ViewKind::ALL_KINDS
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "views".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown view. Valid views: {}",
                    ViewKind::ALL_KINDS.map(|k| k.as_str()).join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub kind: ViewKind,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub generated_at: String,
    pub total_records: usize,
    pub views: Vec<View>,
}
