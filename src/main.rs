use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use simgen_cli::assemble::{GenerateOptions, generate_build_file};
use simgen_cli::config::{CONFIG_FILE_NAME, LoadedConfig, init_template, load_config};
use simgen_cli::discover::{DiscoveredLog, discover_logs};

#[derive(Parser)]
#[command(name = "simgen")]
#[command(
	author,
	version,
	about = "CLI tool for generating build configuration files from simulator run logs"
)]
struct Cli {
	/// Project base directory (defaults to the current directory)
	#[arg(long, global = true, value_name = "DIR")]
	dir: Option<PathBuf>,

	/// Enable debug logging
	#[arg(long, global = true)]
	debug: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List run logs discovered from the configured search locations
	List {
		/// Show the full path of each discovered log
		#[arg(long)]
		paths: bool,
	},
	/// Generate a .build configuration file from a run log
	Generate {
		/// Run log to use, bypassing discovery
		#[arg(long, value_name = "FILE")]
		log: Option<PathBuf>,

		/// Name of the generated configuration file
		#[arg(long, default_value = "default")]
		name: String,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Create a template .simgen.toml in the base directory
	Init {
		/// Overwrite an existing .simgen.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration and its source
	Show,
	/// Check the configuration for errors without generating anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	initialize_logging(cli.debug);

	let base_dir = match cli.dir {
		Some(dir) => dir,
		None => std::env::current_dir().context("Failed to get current directory")?,
	};

	match cli.command {
		Commands::List { paths } => handle_list(&base_dir, paths),
		Commands::Generate { log, name } => handle_generate(&base_dir, log, &name),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(&base_dir),
			ConfigAction::Validate => handle_config_validate(&base_dir),
		},
		Commands::Init { force } => handle_init(&base_dir, force),
	}
}

fn initialize_logging(debug: bool) {
	let level = if debug { "debug" } else { "warn" };

	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
		)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn handle_list(base_dir: &Path, paths: bool) -> Result<ExitCode> {
	let loaded = load_config(base_dir).context("Failed to load configuration")?;
	let logs = discovered(base_dir, &loaded)?;

	if logs.is_empty() {
		println!("No run logs found.");
		return Ok(ExitCode::SUCCESS);
	}

	for log in &logs {
		if paths {
			println!("{}\t{}", log.display_name, log.path.display());
		} else {
			println!("{}", log.display_name);
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_generate(
	base_dir: &Path,
	log: Option<PathBuf>,
	name: &str,
) -> Result<ExitCode> {
	let loaded = load_config(base_dir).context("Failed to load configuration")?;

	let log_path = match log {
		Some(path) => path,
		None => select_log(base_dir, &loaded)?,
	};

	let options = GenerateOptions {
		base_dir,
		log_path: &log_path,
		build_name: name,
		config: &loaded.config,
		generated_at: Local::now(),
	};

	let written = generate_build_file(&options)
		.with_context(|| format!("Failed to generate from {}", log_path.display()))?;

	println!("Generated {}", written.display());
	Ok(ExitCode::SUCCESS)
}

/// Pick the log to use when `--log` was not given: a single discovered log
/// is used directly, anything else needs the flag.
fn select_log(base_dir: &Path, loaded: &LoadedConfig) -> Result<PathBuf> {
	let logs = discovered(base_dir, loaded)?;

	match logs.len() {
		0 => anyhow::bail!("No run logs found. Pass one explicitly with --log."),
		1 => Ok(logs[0].path.clone()),
		_ => {
			eprintln!("Several run logs found:");
			for log in &logs {
				eprintln!("  {}\t{}", log.display_name, log.path.display());
			}
			anyhow::bail!("Select one with --log.")
		}
	}
}

fn discovered(base_dir: &Path, loaded: &LoadedConfig) -> Result<Vec<DiscoveredLog>> {
	discover_logs(
		base_dir,
		&loaded.config.search_locations,
		&loaded.config.exclude_locations,
	)
	.context("Failed to discover run logs")
}

fn handle_config_show(base_dir: &Path) -> Result<ExitCode> {
	let loaded = load_config(base_dir).context("Failed to load configuration")?;

	match &loaded.path {
		Some(path) => println!("# Source: {}", path.display()),
		None => println!("# Source: built-in defaults"),
	}

	let config = &loaded.config;
	println!("# search-locations: {}", config.search_locations.len());
	for location in &config.search_locations {
		println!("    {location}");
	}
	if !config.exclude_locations.is_empty() {
		println!("# exclude-locations: {}", config.exclude_locations.len());
		for location in &config.exclude_locations {
			println!("    {location}");
		}
	}
	println!("# rewrites: {}", config.rewrites.len());
	for rule in &config.rewrites {
		println!("    {} -> {:?}", rule.from, rule.to);
	}
	if !config.skip_directives.is_empty() {
		println!("# skip-directives: {:?}", config.skip_directives);
		println!(
			"# delete-skipped-directives: {}",
			config.delete_skipped_directives
		);
		println!(
			"# note-deleted-directives: {}",
			config.note_deleted_directives
		);
	}
	if !config.env_vars.is_empty() {
		println!("# env-vars: {:?}", config.env_vars);
	}
	println!("# directive-prefixes: {:?}", config.directive_prefixes);
	println!("# tops: {:?}", config.tops);
	println!(
		"# semantic-checks-timeout: {}",
		config.semantic_checks_timeout
	);

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(base_dir: &Path) -> Result<ExitCode> {
	match load_config(base_dir) {
		Ok(loaded) => {
			match &loaded.path {
				Some(path) => println!("Configuration is valid: {}", path.display()),
				None => println!("No configuration file found; built-in defaults are valid."),
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_init(base_dir: &Path, force: bool) -> Result<ExitCode> {
	let config_path = base_dir.join(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}
