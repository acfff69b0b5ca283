//! Rule tables for organizing passes.
//!
//! The built-in tables are plain data returned by [`RulesConfig::default`].
//! Embedders can supply their own tables as TOML instead:
//!
//! ```toml
//! [[rules]]
//! patterns = ["*.txt", "*.md"]
//! destination = "./documents"
//!
//! [[subfolders]]
//! name = "images"
//! recursive = false
//!
//! [[subfolders.rules]]
//! patterns = ["*screenshot*"]
//! destination = "./screenshots"
//! ```

use crate::rules::{Rule, Ruleset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading rule tables.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One rule as written in a table: glob patterns and where matches go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub patterns: Vec<String>,
    pub destination: PathBuf,
}

/// A follow-up pass over a named subfolder of the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubfolderSpec {
    pub name: String,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// The complete set of rule tables: a root ruleset and ordered subfolder
/// passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub subfolders: Vec<SubfolderSpec>,
}

/// A compiled subfolder pass.
#[derive(Debug, Clone)]
pub struct SubfolderPass {
    pub name: String,
    pub recursive: bool,
    pub rules: Ruleset,
}

/// Compiled rule tables, ready to hand to the organizer.
#[derive(Debug, Clone)]
pub struct OrganizePlan {
    pub root_rules: Ruleset,
    pub subfolders: Vec<SubfolderPass>,
}

impl RulesConfig {
    /// Parses rule tables from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Loads rule tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Compiles every table's patterns into rulesets.
    pub fn compile(&self) -> OrganizePlan {
        OrganizePlan {
            root_rules: compile_rules(&self.rules),
            subfolders: self
                .subfolders
                .iter()
                .map(|sub| SubfolderPass {
                    name: sub.name.clone(),
                    recursive: sub.recursive,
                    rules: compile_rules(&sub.rules),
                })
                .collect(),
        }
    }
}

fn compile_rules(specs: &[RuleSpec]) -> Ruleset {
    specs
        .iter()
        .map(|spec| Rule::new(spec.patterns.iter().cloned(), spec.destination.clone()))
        .collect()
}

fn rule(patterns: &[&str], destination: &str) -> RuleSpec {
    RuleSpec {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        destination: PathBuf::from(destination),
    }
}

fn subfolder(name: &str, rules: Vec<RuleSpec>) -> SubfolderSpec {
    SubfolderSpec {
        name: name.to_string(),
        recursive: false,
        rules,
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                rule(&["*.txt", "*.md", "*.doc", "*.docx"], "./documents"),
                rule(&["*.jpg", "*.png", "*.gif", "*.jpeg", "*.HEIC"], "./images"),
                rule(&["*.mp3", "*.wav", "*.flac", "*.aac"], "./audio"),
                rule(&["*.mp4", "*.mkv", "*.avi", "*.mov"], "./videos"),
                rule(&["*.zip", "*.rar", "*.7z"], "./archives"),
                rule(&["*.pdf"], "./pdfs"),
                rule(&["*.dmg", "*.exe", "*.msi", "*.pkg"], "./installers"),
                rule(&["*.py", "*.js", "*.html", "*.css"], "./code"),
                rule(&["*.csv", "*.xlsx", "*.xls"], "./spreadsheets"),
                rule(&["*.ppt", "*.pptx"], "./presentations"),
                rule(&["*.log"], "./logs"),
                rule(&["*.apk", "*.ipa"], "./apps"),
                rule(&["*.p12", "*.p8", "*.pfx"], "./certificates"),
            ],
            subfolders: vec![
                subfolder(
                    "images",
                    vec![
                        rule(&["*screenshot*", "*screen_shot*"], "./screenshots"),
                        rule(&["IMG_*", "IMG-*.jpg"], "./camera"),
                        rule(&["WhatsApp Image*"], "./whatsapp-images"),
                    ],
                ),
                subfolder(
                    "videos",
                    vec![
                        rule(&["*-Meeting Recording*"], "./lectures"),
                        rule(&["Screen Recording*"], "./screen-recordings"),
                        rule(&["WhatsApp Video*"], "./whatsapp-videos"),
                        rule(&["Simulator Screen Recording*"], "./simulator-recordings"),
                    ],
                ),
                subfolder(
                    "apps",
                    vec![rule(&["*.apk"], "./android"), rule(&["*.ipa"], "./ios")],
                ),
                subfolder(
                    "pdfs",
                    vec![
                        rule(&["invoice-*"], "./invoices"),
                        rule(&["Payslip*"], "./payslips"),
                        rule(&["Tax Report*"], "./tax-reports"),
                    ],
                ),
            ],
        }
    }
}
