use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "intake",
    about = "Intake: validate uploaded files and commit them to storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the safe name, size, mimetype and hash of a file
    Inspect(InspectArgs),
    /// Validate files without storing them
    Check(CheckArgs),
    /// Validate files and move them into a directory
    Store(StoreArgs),
    /// Convert a human-readable size such as 3M to bytes
    Size(SizeArgs),
}

/// Validation rules. Flags override the matching keys of `--config`.
#[derive(Args, Clone, Debug, Default)]
pub struct RuleArgs {
    /// Allowed extensions, comma separated
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,
    /// Allowed mimetypes, comma separated
    #[arg(long = "mime", value_delimiter = ',')]
    pub mimetypes: Vec<String>,
    #[arg(long)]
    pub max_size: Option<String>,
    #[arg(long)]
    pub min_size: Option<String>,
    /// TOML file with [validation] and [storage] tables
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub path: PathBuf,
    /// Hash with BLAKE3 instead of SHA-256
    #[arg(long)]
    pub blake3: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    #[command(flatten)]
    pub rules: RuleArgs,
}

#[derive(Args)]
pub struct StoreArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Destination directory; falls back to [storage] in --config
    #[arg(long)]
    pub dest: Option<PathBuf>,
    #[arg(long)]
    pub overwrite: bool,
    /// Validate and stage in memory without touching the destination
    #[arg(long)]
    pub dry_run: bool,
    #[command(flatten)]
    pub rules: RuleArgs,
}

#[derive(Args)]
pub struct SizeArgs {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inspect() {
        let cli = Cli::try_parse_from(["intake", "inspect", "a.png"]).unwrap();
        if let Command::Inspect(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("a.png"));
            assert!(!args.blake3);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_check_rules() {
        let cli = Cli::try_parse_from([
            "intake", "check", "a.png", "b.gif", "--ext", "png,gif", "--max-size", "3M",
        ])
        .unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.paths.len(), 2);
            assert_eq!(args.rules.extensions, vec!["png", "gif"]);
            assert_eq!(args.rules.max_size, Some("3M".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_check_requires_paths() {
        assert!(Cli::try_parse_from(["intake", "check"]).is_err());
    }

    #[test]
    fn parse_store() {
        let cli = Cli::try_parse_from([
            "intake", "store", "a.png", "--dest", "/srv", "--overwrite", "--dry-run",
        ])
        .unwrap();
        if let Command::Store(args) = cli.command {
            assert_eq!(args.dest, Some(PathBuf::from("/srv")));
            assert!(args.overwrite);
            assert!(args.dry_run);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_store_with_config() {
        let cli = Cli::try_parse_from(["intake", "store", "a.png", "--config", "intake.toml"]).unwrap();
        if let Command::Store(args) = cli.command {
            assert_eq!(args.rules.config, Some(PathBuf::from("intake.toml")));
            assert!(args.dest.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_size() {
        let cli = Cli::try_parse_from(["intake", "size", "10K"]).unwrap();
        if let Command::Size(args) = cli.command {
            assert_eq!(args.value, "10K");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["intake", "--verbose", "size", "1"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["intake", "--format", "json", "size", "1"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
