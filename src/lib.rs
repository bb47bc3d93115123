//! dtweaks - apply distro-supplied override rules to XDG desktop entries.
//!
//! This library provides the core functionality for dtweaks, including:
//! - A line-preserving desktop entry (key file) document
//! - Rule file loading into glob-matched group rules
//! - The value template language with regex captures
//! - Rule directory search and target discovery
//!
//! A rule file is itself a key file. Each group header is a glob matched
//! against the target's group names; each key holds a template for the
//! new value, and a key ending in `$` holds a regex whose captures the
//! template can use:
//!
//! ```ini
//! [Desktop Entry]
//! Exec$ = ^(\S+) (.*)$
//! Exec = $1 --ozone-platform=wayland $2
//!
//! [Desktop Action *]
//! Exec = env GDK_BACKEND=x11 ${*}
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dtweaks::config::rule_dirs;
//! use dtweaks::rules::TemplateEngine;
//! use dtweaks::tweak::{OutputMode, process_target};
//! use std::path::Path;
//!
//! let engine = TemplateEngine::new();
//! let dirs = rule_dirs();
//! let ok = process_target(
//!     Path::new("/usr/share/applications/gedit.desktop"),
//!     &dirs,
//!     OutputMode::Preview,
//!     &engine,
//!     &mut std::io::stdout(),
//! )
//! .unwrap();
//!
//! if !ok {
//!     eprintln!("rule file had errors");
//! }
//! ```

pub mod config;
pub mod error;
pub mod keyfile;
pub mod rules;
pub mod targets;
pub mod tweak;

pub use error::{DtweaksError, Result, RuleError};
