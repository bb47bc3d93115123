//! Rule directory configuration.
//!
//! This module handles:
//! - Reading extra rule directories from `DTWEAKS_PATH`
//! - The fixed system rule directories
//! - Locating the rule file for a target

pub mod search;

pub use search::{DEFAULT_RULE_DIRS, PATH_ENV_VAR, find_rule_file, rule_dirs, rule_dirs_from};
