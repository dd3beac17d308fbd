//! Seed migration generator.
//!
//! One linear pass over the configured slugs: load each `theme.json`, turn it
//! into a [`SeedRow`], render the upsert statement, and write it atomically.
//! A missing theme file is skipped with a warning; anything else that goes
//! wrong aborts the run before the output file is touched.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};

use crate::config::Config;
use crate::sql::{SeedRow, render_statement};
use crate::theme::{self, ThemeDefinition};

/// Outcome of one generation pass.
#[derive(Debug)]
pub struct GenerateReport {
    /// Rows in output order.
    pub rows: Vec<SeedRow>,
    /// Slugs whose `theme.json` was not found.
    pub skipped: Vec<String>,
    /// Rendered migration text.
    pub sql: String,
}

fn seed_row(def: &ThemeDefinition, sort_order: u32) -> Result<SeedRow> {
    let meta = def.meta()?;
    Ok(SeedRow {
        name: meta.name,
        slug: def.slug.clone(),
        category: meta.category,
        description: meta.description,
        preset_data: def.to_json()?,
        sort_order,
    })
}

/// Load every configured theme and render the migration without writing it.
///
/// Missing files are skipped, except that a run where every file is missing
/// fails: a `VALUES` list with no rows is not valid SQL.
pub fn render(config: &Config) -> Result<GenerateReport> {
    info!("Reading themes from: {}", config.themes_dir.display());

    let mut rows = Vec::with_capacity(config.themes.len());
    let mut skipped = Vec::new();

    for (idx, slug) in config.themes.iter().enumerate() {
        let Some(def) = theme::load(&config.themes_dir, slug)? else {
            warn!(
                "Theme {slug} not found at {}",
                theme::theme_path(&config.themes_dir, slug).display()
            );
            skipped.push(slug.clone());
            continue;
        };

        for issue in def.lint() {
            warn!("{slug}: {issue}");
        }

        let position = u32::try_from(idx).context("too many themes")?;
        let sort_order = config
            .sort_offset
            .checked_add(position)
            .context("sort_order overflows u32")?;
        rows.push(seed_row(&def, sort_order)?);
    }

    if rows.is_empty() {
        bail!(
            "no themes found in {} ({} skipped)",
            config.themes_dir.display(),
            skipped.len()
        );
    }

    let sql = render_statement(&rows);
    Ok(GenerateReport { rows, skipped, sql })
}

/// Replace `path` with `contents`.
///
/// The text goes to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write never leaves a truncated file.
/// An existing target keeps its permissions; a new one gets 0666 minus the
/// umask, as a plain `File::create` would.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

    if let Ok(existing) = fs::metadata(path) {
        debug!("seed: keeping permissions of {}", path.display());
        tmp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("failed to set permissions on {}", tmp.path().display()))?;
    }

    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Render the migration and write it to `config.output`.
pub fn generate(config: &Config) -> Result<GenerateReport> {
    let report = render(config)?;
    write_output(&config.output, &report.sql)?;

    info!(
        "Wrote {} theme(s), skipped {}{}",
        report.rows.len(),
        report.skipped.len(),
        if report.skipped.is_empty() {
            String::new()
        } else {
            format!(" ({})", report.skipped.join(", "))
        }
    );
    info!(
        "Successfully generated migration file at: {}",
        config.output.display()
    );
    Ok(report)
}
