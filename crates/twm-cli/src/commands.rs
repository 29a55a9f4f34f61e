use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use twm_core::{inspect_document, migrate_xml};
use twm_model::{ConfigFile, MigrationConfig};
use twm_package::{
    InputKind, PackageError, classify, read_descriptor, repack, save_descriptor, suffixed_path,
    unpack,
};
use twm_xml::parse_document;

use crate::cli::{InspectArgs, MigrateArgs, TargetArgs};
use crate::types::{InspectResult, MigrateResult, RenameEntry};

pub fn run_migrate(args: &MigrateArgs) -> Result<MigrateResult> {
    let input = &args.input;
    let span = info_span!("workbook", path = %input.display());
    let _guard = span.enter();

    let config = resolve_config(&args.target)?;
    debug!(host = %config.host(), schema = %config.schema, "resolved target");
    let kind = classify(input)?;

    let (report, renames, output) = match kind {
        InputKind::Packaged { .. } => {
            // Nothing is extracted until the descriptor has migrated.
            let text = read_descriptor(input)?;
            let outcome = migrate_xml(&text, &config)
                .with_context(|| format!("migrate {}", input.display()))?;
            let output = if args.dry_run {
                None
            } else {
                let package = unpack(input)?;
                save_descriptor(&package, &outcome.text)?;
                Some(repack(&package, &args.suffix)?)
            };
            (
                outcome.report,
                RenameEntry::from_mapping(&outcome.mapping),
                output,
            )
        }
        InputKind::Descriptor => {
            let text = read_text(input)?;
            let outcome = migrate_xml(&text, &config)
                .with_context(|| format!("migrate {}", input.display()))?;
            let output = if args.dry_run {
                None
            } else {
                let output = suffixed_path(input, &args.suffix);
                fs::write(&output, &outcome.text)
                    .with_context(|| format!("write {}", output.display()))?;
                Some(output)
            };
            (
                outcome.report,
                RenameEntry::from_mapping(&outcome.mapping),
                output,
            )
        }
    };

    let result = MigrateResult {
        input: input.clone(),
        output,
        dry_run: args.dry_run,
        report,
        renames,
    };
    if let Some(path) = &args.report_json {
        write_report_json(path, &result)?;
    }
    match &result.output {
        Some(path) => info!(output = %path.display(), "migration written"),
        None => info!("dry run, nothing written"),
    }
    Ok(result)
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let input = &args.input;
    let span = info_span!("workbook", path = %input.display());
    let _guard = span.enter();

    let text = match classify(input)? {
        InputKind::Packaged { .. } => read_descriptor(input)?,
        InputKind::Descriptor => read_text(input)?,
    };
    let document = parse_document(&text).with_context(|| format!("parse {}", input.display()))?;
    let datasources = inspect_document(&document);
    info!(datasources = datasources.len(), "inspected");
    Ok(InspectResult {
        input: input.clone(),
        datasources,
    })
}

/// Merge `--config` with the individual flags; flags win.
pub fn resolve_config(target: &TargetArgs) -> Result<MigrationConfig> {
    let base = match &target.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = base
        .merge(target.overrides())
        .resolve()
        .context("incomplete Snowflake settings (use --config or the matching flag)")?;
    Ok(config)
}

fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PackageError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn write_report_json(path: &Path, result: &MigrateResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "report written");
    Ok(())
}
