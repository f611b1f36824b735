/// Configuration module for compliance-rag.
///
/// Handles loading, validating, and providing default configuration values.
/// Every tunable of the pipeline lives here so tests can vary them per case.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RagError;
use crate::indexer::normalize::Boilerplate;

// ── Default value functions ──────────────────────────────────────────

fn default_pdf_path() -> String {
    "data/regulation.pdf".to_string()
}

fn default_db_path() -> String {
    "./compliance.db".to_string()
}

fn default_collection() -> String {
    "ai_risk_compliance".to_string()
}

fn default_chunk_size() -> usize {
    1200
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_search_top_k() -> usize {
    6
}

fn default_max_lines_per_theme() -> usize {
    3
}

fn default_min_sentence_chars() -> usize {
    50
}

fn default_max_sentence_chars() -> usize {
    240
}

fn default_merge_hits() -> usize {
    3
}

fn default_boilerplate_phrases() -> Vec<String> {
    [
        "final report",
        "guidelines on loan origination",
        "eba/gl/",
        "may 2020",
        "european banking authority",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_header_patterns() -> Vec<String> {
    vec![
        r"(FINAL REPORT\s*[-\x{2013}]\s*GUIDELINES ON LOAN ORIGINATION AND MONITORING)+".to_string(),
        r"(GUIDELINES\s+EBA/GL/\d{4}/\d{2})+".to_string(),
    ]
}

fn default_catch_all_theme() -> String {
    "Other / General".to_string()
}

fn theme(name: &str, keywords: &[&str]) -> ThemeConfig {
    ThemeConfig {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn default_themes() -> Vec<ThemeConfig> {
    vec![
        theme(
            "Governance & Risk Management",
            &[
                "governance",
                "management body",
                "internal control",
                "risk appetite",
                "three lines of defense",
                "policy",
                "framework",
                "culture",
                "model governance",
            ],
        ),
        theme(
            "Loan Origination Process",
            &[
                "origination",
                "credit granting",
                "loan origination",
                "decision-making",
                "approval",
                "delegation",
                "process",
                "application",
                "underwriting",
            ],
        ),
        theme(
            "Creditworthiness & Affordability",
            &[
                "creditworthiness",
                "affordability",
                "income",
                "expenses",
                "debt service",
                "dscr",
                "verification",
                "repayment capacity",
                "stress test",
            ],
        ),
        theme(
            "Collateral & Valuation",
            &[
                "collateral",
                "valuation",
                "appraisal",
                "immovable",
                "movable",
                "revaluation",
                "property",
                "haircut",
                "ltv",
            ],
        ),
        theme(
            "Monitoring & Early Warning",
            &[
                "monitoring",
                "early warning",
                "watchlist",
                "deterioration",
                "forbearance",
                "past due",
                "arrears",
                "npl",
                "lifecycle",
            ],
        ),
        theme(
            "Data, IT & Record-Keeping",
            &[
                "data",
                "infrastructure",
                "it",
                "systems",
                "capabilities",
                "record",
                "documentation",
                "audit trail",
                "templates",
            ],
        ),
        theme(
            "Consumer Protection",
            &[
                "consumer",
                "mcd",
                "ccd",
                "directive",
                "transparency",
                "information",
                "conduct",
                "protection",
            ],
        ),
        theme(
            "ESG Considerations",
            &[
                "esg",
                "environmental",
                "social",
                "sustainable",
                "climate",
                "transition risk",
                "physical risk",
            ],
        ),
        theme(
            "Other / General",
            &[
                "scope",
                "definitions",
                "implementation",
                "timeline",
                "transitional",
                "competent authority",
            ],
        ),
    ]
}

fn default_theme_order() -> Vec<String> {
    default_themes().into_iter().map(|t| t.name).collect()
}

fn default_backend() -> EmbedderBackend {
    EmbedderBackend::Onnx
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_model_dir() -> String {
    "models/all-MiniLM-L6-v2".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_true() -> bool {
    true
}

// ── Config structs ───────────────────────────────────────────────────

/// How theme keywords are matched against lower-cased chunk text.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatch {
    /// Plain substring containment: `"it"` matches inside `"credit"`.
    #[default]
    Substring,
    /// Keyword must sit on word boundaries.
    Word,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderBackend {
    Onnx,
    Mock,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ThemeConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_pdf_path")]
    pub pdf_path: String,

    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    #[serde(default = "default_max_lines_per_theme")]
    pub max_lines_per_theme: usize,

    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,

    #[serde(default = "default_max_sentence_chars")]
    pub max_sentence_chars: usize,

    /// Number of top hits per theme merged before summarizing.
    #[serde(default = "default_merge_hits")]
    pub merge_hits: usize,

    /// Lower-cased phrases that disqualify a sentence from a summary.
    #[serde(default = "default_boilerplate_phrases")]
    pub boilerplate_phrases: Vec<String>,

    /// Case-insensitive regexes for repeated page banners.
    #[serde(default = "default_header_patterns")]
    pub header_patterns: Vec<String>,

    /// Keyword taxonomy; declaration order is the tie-break order.
    #[serde(default = "default_themes")]
    pub themes: Vec<ThemeConfig>,

    /// Business reading order for rendered themes.
    #[serde(default = "default_theme_order")]
    pub theme_order: Vec<String>,

    #[serde(default = "default_catch_all_theme")]
    pub catch_all_theme: String,

    #[serde(default)]
    pub keyword_match: KeywordMatch,

    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_backend")]
    pub backend: EmbedderBackend,

    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_model_dir")]
    pub dir: String,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_true")]
    pub auto_download: bool,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            pdf_path: default_pdf_path(),
            db_path: default_db_path(),
            collection: default_collection(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            search_top_k: default_search_top_k(),
            max_lines_per_theme: default_max_lines_per_theme(),
            min_sentence_chars: default_min_sentence_chars(),
            max_sentence_chars: default_max_sentence_chars(),
            merge_hits: default_merge_hits(),
            boilerplate_phrases: default_boilerplate_phrases(),
            header_patterns: default_header_patterns(),
            themes: default_themes(),
            theme_order: default_theme_order(),
            catch_all_theme: default_catch_all_theme(),
            keyword_match: KeywordMatch::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            name: default_model_name(),
            dir: default_model_dir(),
            dimensions: default_dimensions(),
            auto_download: default_true(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and, for the
    /// default path only, writes a template next to the binary.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == "config.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), RagError> {
        fn ensure(cond: bool, msg: &str) -> Result<(), RagError> {
            if cond {
                Ok(())
            } else {
                Err(RagError::Configuration(msg.to_string()))
            }
        }

        ensure(self.chunk_size > 0, "chunk_size must be positive")?;
        ensure(
            self.chunk_overlap < self.chunk_size,
            "chunk_overlap must be smaller than chunk_size",
        )?;
        ensure(self.search_top_k > 0, "search_top_k must be positive")?;
        ensure(
            self.max_lines_per_theme > 0,
            "max_lines_per_theme must be positive",
        )?;
        ensure(
            self.max_sentence_chars > 3,
            "max_sentence_chars must leave room for an ellipsis",
        )?;
        ensure(
            self.min_sentence_chars <= self.max_sentence_chars,
            "min_sentence_chars must not exceed max_sentence_chars",
        )?;
        ensure(self.merge_hits > 0, "merge_hits must be positive")?;
        ensure(!self.themes.is_empty(), "at least one theme must be defined")?;
        ensure(
            !self.catch_all_theme.is_empty(),
            "catch_all_theme must not be empty",
        )?;
        ensure(
            self.model.dimensions > 0,
            "model.dimensions must be positive",
        )?;

        // Surfaces bad regexes at setup instead of on the first question.
        Boilerplate::new(&self.header_patterns)?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunk_size, 1200);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.search_top_k, 6);
        assert_eq!(config.max_lines_per_theme, 3);
        assert_eq!(config.min_sentence_chars, 50);
        assert_eq!(config.max_sentence_chars, 240);
        assert_eq!(config.collection, "ai_risk_compliance");
        assert_eq!(config.model.dimensions, 384);
        assert_eq!(config.model.backend, EmbedderBackend::Onnx);
        assert_eq!(config.keyword_match, KeywordMatch::Substring);
        assert_eq!(config.themes.len(), 9);
        assert_eq!(config.theme_order[0], "Governance & Risk Management");
        assert_eq!(config.theme_order.last().unwrap(), "Other / General");
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"chunk_size": 800, "db_path": "./test.db", "keyword_match": "word"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.chunk_size, 800);
        assert_eq!(config.db_path, "./test.db");
        assert_eq!(config.keyword_match, KeywordMatch::Word);
        // Other fields should have defaults
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.search_top_k, 6);
        assert_eq!(config.themes.len(), 9);
    }

    #[test]
    fn test_themes_keep_declared_order() {
        let json = r#"{"themes": [
            {"name": "B", "keywords": ["b"]},
            {"name": "A", "keywords": ["a"]}
        ]}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = config.themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_validate_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overlap_not_smaller_than_size() {
        let mut config = Config::default();
        config.chunk_overlap = config.chunk_size;
        assert!(matches!(
            config.validate(),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_bad_chunk_size() {
        let mut config = Config::default();
        config.chunk_size = 0;
        config.chunk_overlap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_header_pattern() {
        let mut config = Config::default();
        config.header_patterns = vec!["(unclosed".to_string()];
        assert!(matches!(
            config.validate(),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_empty_themes() {
        let mut config = Config::default();
        config.themes.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_custom_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.chunk_size, 1200);
        // Templates are only generated for the default path
        assert!(!path.exists());
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.search_top_k, 6);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.search_top_k = 4;
        config.save(path.to_str().unwrap()).unwrap();

        let parsed = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(parsed.search_top_k, 4);
        assert_eq!(parsed.themes, config.themes);
        assert_eq!(parsed.model.name, config.model.name);
    }
}
