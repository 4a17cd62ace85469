use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use intake_batch::{BatchError, IntakeConfig, UploadBatch, UploadSource};
use intake_storage::{InMemoryStorage, StorageBackend, StorageConfig};
use intake_types::{human_readable_to_bytes, FileDescriptor, HashAlgorithm, SizeLimit, StagedUploads};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Inspect(args) => cmd_inspect(args, cli.format),
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Store(args) => cmd_store(args, cli.format),
        Command::Size(args) => cmd_size(args, cli.format),
    }
}

/// Merge `--config` with the rule flags; flags win.
fn load_config(rules: &RuleArgs) -> anyhow::Result<IntakeConfig> {
    let mut config = match &rules.config {
        Some(path) => IntakeConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => IntakeConfig::default(),
    };
    if !rules.extensions.is_empty() {
        config.validation.extensions = rules.extensions.clone();
    }
    if !rules.mimetypes.is_empty() {
        config.validation.mimetypes = rules.mimetypes.clone();
    }
    if let Some(max) = &rules.max_size {
        config.validation.max_size = Some(SizeLimit::from(max.as_str()));
    }
    if let Some(min) = &rules.min_size {
        config.validation.min_size = Some(SizeLimit::from(min.as_str()));
    }
    Ok(config)
}

fn local_batch(
    paths: &[PathBuf],
    config: &IntakeConfig,
    storage: Arc<dyn StorageBackend>,
) -> anyhow::Result<UploadBatch> {
    let sources = paths.iter().cloned().map(UploadSource::Path);
    let mut batch = UploadBatch::from_sources(sources, Arc::new(StagedUploads::new()), storage)?;
    batch.add_validations(config.validators()?);
    Ok(batch)
}

fn print_errors(upload_errors: &[String], validation_errors: &[String]) {
    for message in upload_errors.iter().chain(validation_errors) {
        println!("  {} {}", "✗".red(), message);
    }
}

fn cmd_inspect(args: InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    if !args.path.is_file() {
        bail!("{}: Is not a regular file", args.path.display());
    }
    let algorithm = if args.blake3 { HashAlgorithm::Blake3 } else { HashAlgorithm::Sha256 };
    let file = FileDescriptor::local(&args.path);
    let size = file.size()?;
    let mimetype = file.mimetype()?.to_string();
    let hash = file.hash(algorithm)?.to_string();
    let dimensions = if mimetype.starts_with("image/") { file.dimensions().ok() } else { None };
    let algorithm_name = if args.blake3 { "blake3" } else { "sha256" };

    match format {
        OutputFormat::Json => {
            let value = json!({
                "path": args.path,
                "name": file.name(),
                "extension": file.extension(),
                "safe_name": file.name_with_extension(),
                "size": size,
                "mimetype": mimetype,
                (algorithm_name): hash,
                "dimensions": dimensions,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", args.path.display().to_string().bold());
            println!("  Safe name: {}", file.name_with_extension().cyan());
            println!("  Extension: {}", display_or_none(file.extension()));
            println!("  Size: {} bytes", size.to_string().bold());
            println!("  Mimetype: {}", mimetype.yellow());
            println!("  {}: {}", algorithm_name.to_uppercase(), hash.dimmed());
            if let Some(d) = dimensions {
                println!("  Dimensions: {}x{}", d.width, d.height);
            }
        }
    }
    Ok(())
}

fn display_or_none(value: &str) -> String {
    if value.is_empty() { "(none)".dimmed().to_string() } else { value.to_string() }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.rules)?;
    let mut batch = local_batch(&args.paths, &config, Arc::new(InMemoryStorage::new()))?;
    let valid = batch.is_valid();

    match format {
        OutputFormat::Json => {
            let files: Vec<String> = batch.files().iter().map(|f| f.name_with_extension()).collect();
            let value = json!({
                "valid": valid,
                "files": files,
                "upload_errors": batch.upload_errors(),
                "validation_errors": batch.validation_errors(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if valid {
                println!("{} {} file(s) passed validation", "✓".green().bold(), batch.len());
            } else {
                println!("{} Validation failed", "✗".red().bold());
                print_errors(batch.upload_errors(), batch.validation_errors());
            }
        }
    }

    if !valid {
        bail!(
            "{} error(s)",
            batch.upload_errors().len() + batch.validation_errors().len()
        );
    }
    Ok(())
}

fn storage_for(args: &StoreArgs, config: &IntakeConfig) -> anyhow::Result<Arc<dyn StorageBackend>> {
    if args.dry_run {
        return Ok(Arc::new(InMemoryStorage::new().with_overwrite(args.overwrite)));
    }
    let mut storage = match (&args.dest, &config.storage) {
        (Some(dest), _) => StorageConfig::new(dest),
        (None, Some(configured)) => configured.clone(),
        (None, None) => bail!("no destination: pass --dest or set [storage] in --config"),
    };
    storage.overwrite |= args.overwrite;
    Ok(Arc::new(storage.build()?))
}

fn cmd_store(args: StoreArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.rules)?;
    let storage = storage_for(&args, &config)?;
    let mut batch = local_batch(&args.paths, &config, storage)?;

    match batch.store() {
        Ok(stored) => {
            match format {
                OutputFormat::Json => {
                    let files: Vec<_> = stored
                        .iter()
                        .map(|s| json!({ "name": s.name, "location": s.location }))
                        .collect();
                    let value = json!({ "dry_run": args.dry_run, "stored": files });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Text => {
                    let verb = if args.dry_run { "would store" } else { "stored" };
                    for s in &stored {
                        println!("  {} {} → {}", format!("{verb}:").green(), s.name.bold(), s.location.display());
                    }
                    println!("{} {} file(s) committed", "✓".green().bold(), stored.len());
                }
            }
            Ok(())
        }
        Err(BatchError::Rejected { upload_errors, validation_errors }) => {
            match format {
                OutputFormat::Json => {
                    let value = json!({
                        "upload_errors": upload_errors,
                        "validation_errors": validation_errors,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                OutputFormat::Text => {
                    println!("{} Batch rejected, nothing stored", "✗".red().bold());
                    print_errors(&upload_errors, &validation_errors);
                }
            }
            bail!("{} error(s)", upload_errors.len() + validation_errors.len())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_size(args: SizeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let bytes = human_readable_to_bytes(&args.value);
    match format {
        OutputFormat::Json => println!("{}", json!({ "input": args.value, "bytes": bytes })),
        OutputFormat::Text => println!("{} = {} bytes", args.value.bold(), bytes),
    }
    Ok(())
}
