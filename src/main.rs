use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use theme_seed::config::{self, Config};
use theme_seed::seed;

#[derive(Parser)]
#[command(
    name = "theme-seed",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("THEME_SEED_BUILD_GIT_HASH"), ")"),
    about = "Generate the theme_presets seed migration from theme.json files"
)]
struct Cli {
    /// Directory holding one `<slug>/theme.json` per theme
    #[arg(long)]
    themes_dir: Option<PathBuf>,

    /// Migration file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: ./theme-seed.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the SQL to stdout instead of writing the migration file
    #[arg(long)]
    dry_run: bool,

    /// Log output file path (logs go to stderr otherwise)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logger(log_path: Option<&Path>) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = log_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.log.as_deref()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    let result = load(&cli).and_then(|config| {
        if cli.dry_run {
            cmd_dry_run(&config)
        } else {
            seed::generate(&config).map(|_| ())
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load(cli: &Cli) -> Result<Config> {
    let mut cfg = config::load_config(cli.config.as_deref())?;
    cfg.merge_cli(cli.themes_dir.clone(), cli.output.clone());
    cfg.resolve()
}

fn cmd_dry_run(config: &Config) -> Result<()> {
    let report = seed::render(config)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.sql.as_bytes())
        .context("failed to write stdout")?;
    info!(
        "dry run: {} theme(s) rendered, {} skipped, {} not written",
        report.rows.len(),
        report.skipped.len(),
        config.output.display()
    );
    Ok(())
}
