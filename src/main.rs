use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use dtweaks::config::rule_dirs;
use dtweaks::rules::TemplateEngine;
use dtweaks::targets::{read_targets, resolve_target, system_data_dirs};
use dtweaks::tweak::{OutputMode, process_target};

#[derive(Parser)]
#[command(name = "dtweaks")]
#[command(
	author,
	version,
	about = "Automatically modify XDG application files manually or after package installation"
)]
struct Cli {
	/// Read the list of target XDG application files from stdin, not the command line
	#[arg(short = 'i', long)]
	stdin: bool,

	/// Assume non-paths are application names and automatically locate them
	#[arg(short, long)]
	resolve_paths: bool,

	/// Print the transformed desktop files instead of writing them
	#[arg(short = 'n', long)]
	dry_run: bool,

	/// Show verbose information while processing files
	#[arg(short, long)]
	verbose: bool,

	/// Desktop files to modify
	#[arg(value_name = "DESKTOP_FILES")]
	targets: Vec<String>,
}

/// Everything needed to process targets, built once per run.
struct RunContext {
	rule_dirs: Vec<PathBuf>,
	data_dirs: Vec<PathBuf>,
	engine: TemplateEngine,
	mode: OutputMode,
	resolve_paths: bool,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	let mut success = true;
	let mut targets = Vec::new();

	if cli.stdin {
		debug!("Reading from stdin.");
		if let Err(e) = read_targets(std::io::stdin().lock(), &mut targets) {
			error!("{:#}", anyhow::Error::from(e));
			success = false;
		}
	}

	if !cli.targets.is_empty() {
		debug!("Adding command-line paths.");
		targets.extend(cli.targets);
	}

	let ctx = RunContext {
		rule_dirs: rule_dirs(),
		data_dirs: system_data_dirs(),
		engine: TemplateEngine::new(),
		mode: if cli.dry_run {
			OutputMode::Preview
		} else {
			OutputMode::Persist
		},
		resolve_paths: cli.resolve_paths,
	};

	let mut stdout = std::io::stdout().lock();
	for target in &targets {
		debug!("Current path: {}", target);
		match handle_target(&ctx, target, &mut stdout) {
			Ok(true) => {}
			Ok(false) => success = false,
			Err(e) => {
				error!("{e:#}");
				success = false;
			}
		}
	}

	Ok(if success {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

fn handle_target(ctx: &RunContext, target: &str, out: &mut impl std::io::Write) -> Result<bool> {
	let path = resolve_target(target, ctx.resolve_paths, &ctx.data_dirs)
		.with_context(|| format!("Failed to resolve {target}"))?;

	process_target(&path, &ctx.rule_dirs, ctx.mode, &ctx.engine, out)
		.with_context(|| format!("Failed to process {}", path.display()))
}
