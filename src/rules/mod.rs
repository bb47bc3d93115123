//! The rule engine.
//!
//! This module handles:
//! - Loading rule files into ordered group rules
//! - Glob matching of group rules against target groups
//! - Rendering value templates with regex captures

pub mod loader;
pub mod matcher;
pub mod template;
pub mod types;

pub use loader::{LoadedRules, load_rules, load_rules_str, read_rule_file};
pub use matcher::{find_matching_group, glob_match};
pub use template::{TemplateEngine, Token, Var, resolve_var};
pub use types::{Extraction, GroupRule, KeyRule, REGEX_SUFFIX, RuleSet};
