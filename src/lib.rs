//! dirsort - sort files into folders by filename pattern
//!
//! This library provides case-insensitive glob rules, an organizer that moves
//! matching files into rule destinations without overwriting anything, and the
//! built-in rule tables used by the `dirsort` binary.

pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod rules;

pub use config::{ConfigError, OrganizePlan, RulesConfig};
pub use organizer::{MoveOutcome, OrganizeError, Organizer, Summary};
pub use rules::{Rule, Ruleset};

pub use cli::{run_cli, run_cli_with_rules};
