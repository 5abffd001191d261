//! Batch runner: composes scenes on the in-memory host and writes their
//! ground-truth records.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use flowgen_engine::config::{Config, GeneratorConfig};
use flowgen_engine::foundation::logging;
use flowgen_engine::ground_truth::prepare_output_dir;
use flowgen_engine::host::{AssetManifest, InMemoryHost};
use flowgen_engine::pipeline::{BatchReport, SceneGenerator};
use std::path::PathBuf;

const DEFAULT_MANIFEST: &str = "assets/manifest.ron";

#[derive(Debug, Default)]
struct RunOptions {
    config: Option<PathBuf>,
    manifest: PathBuf,
    iterations: Option<u32>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    log_level: Option<String>,
    write_config: Option<PathBuf>,
    keep_output: bool,
}

fn cli() -> Command {
    Command::new("flowgen")
        .about("Generates two-frame synthetic scenes with optical-flow ground truth")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Generator configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("manifest")
                .short('m')
                .long("manifest")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Asset manifest the in-memory host imports from")
                .default_value(DEFAULT_MANIFEST),
        )
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(u32))
                .help("Number of scenes to generate"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .value_parser(clap::value_parser!(u64))
                .help("Random seed for a reproducible batch"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output directory"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Default log level (RUST_LOG still takes precedence)"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the effective configuration to FILE and exit"),
        )
        .arg(
            Arg::new("keep-output")
                .long("keep-output")
                .action(ArgAction::SetTrue)
                .help("Keep files already in the output directory"),
        )
}

fn options_from(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        config: matches.get_one::<PathBuf>("config").cloned(),
        manifest: matches
            .get_one::<PathBuf>("manifest")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
        iterations: matches.get_one::<u32>("iterations").copied(),
        seed: matches.get_one::<u64>("seed").copied(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        log_level: matches.get_one::<String>("log-level").cloned(),
        write_config: matches.get_one::<PathBuf>("write-config").cloned(),
        keep_output: matches.get_flag("keep-output"),
    }
}

fn effective_config(options: &RunOptions) -> Result<GeneratorConfig> {
    let mut config = match &options.config {
        Some(path) => GeneratorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(iterations) = options.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }
    if let Some(output) = &options.output {
        config = config.with_output(output);
    }
    if options.keep_output {
        config.run.clean_output = false;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(options: &RunOptions, config: GeneratorConfig) -> Result<Option<BatchReport>> {
    if let Some(path) = &options.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration {}", path.display()))?;
        log::info!("Configuration written to {}", path.display());
        return Ok(None);
    }

    let output = config.output_dir();
    if config.run.clean_output {
        prepare_output_dir(&output)
            .with_context(|| format!("Failed to clean output directory {}", output.display()))?;
    } else {
        std::fs::create_dir_all(&output)
            .with_context(|| format!("Failed to create output directory {}", output.display()))?;
    }

    let manifest = AssetManifest::load_from_file(&options.manifest)
        .with_context(|| format!("Failed to load asset manifest {}", options.manifest.display()))?;
    log::info!("Loaded {} asset(s) from {}", manifest.entries.len(), options.manifest.display());

    let mut generator = SceneGenerator::new(InMemoryHost::from_manifest(&manifest), config)?;
    let report = generator.run_batch()?;

    for (iteration, error) in &report.failures {
        log::warn!("Scene {iteration} failed: {error}");
    }
    if report.completed.is_empty() && !report.failures.is_empty() {
        bail!("All {} scene(s) failed", report.failures.len());
    }
    Ok(Some(report))
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let options = options_from(&matches);

    let config = effective_config(&options)?;

    let default_level = options.log_level.as_deref().unwrap_or(&config.run.log_level);
    logging::init_with_level(default_level);

    if let Some(report) = run(&options, config)? {
        println!(
            "Generated {} scene(s), {} failed, {} target(s) placed",
            report.completed.len(),
            report.failures.len(),
            report.placed_targets()
        );
    }
    Ok(())
}
