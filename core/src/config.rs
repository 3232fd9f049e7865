use crate::layout::SheetLayout;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// CSV export or workbook file.
    pub path: String,
    /// Worksheet tab; required for workbooks, ignored for CSV.
    #[serde(default)]
    pub worksheet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub database: String,
    #[serde(default)]
    pub create_database: bool,
    #[serde(default)]
    pub layout: SheetLayout,
}

impl SyncConfig {
    /// Load from a JSON file.
    /// In tests, use SyncConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SyncConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            source: SourceConfig {
                path: "sales.csv".into(),
                worksheet: Some("ZU".into()),
            },
            database: ":memory:".into(),
            create_database: true,
            layout: SheetLayout::default(),
        }
    }
}
