//! CLI command definitions and execution
//!
//! Three commands: `backup` pushes a local tree to a bucket prefix,
//! `restore` pulls a prefix back down, and `check` validates settings
//! and bucket reachability without transferring anything.

use clap::{Args, Parser, Subcommand};

use sk_core::StorageSettings;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod backup;
mod check;
mod restore;

/// s3keep - backup and restore directories to S3-compatible storage
#[derive(Parser, Debug)]
#[command(name = "s3keep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indication
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up a local path to the bucket
    Backup(backup::BackupArgs),

    /// Restore a bucket prefix to a local path
    Restore(restore::RestoreArgs),

    /// Validate configuration and bucket reachability
    Check(check::CheckArgs),
}

/// Connection settings shared by every command.
///
/// Each flag falls back to an `AWS_*` environment variable, so
/// containerized invocations need no flags at all.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// S3 endpoint URL or host; defaults to AWS S3 when omitted
    #[arg(long, env = "AWS_ENDPOINT", default_value = "")]
    pub endpoint: String,

    /// Region name
    #[arg(long, env = "AWS_REGION", default_value = "")]
    pub region: String,

    /// Bucket to operate on
    #[arg(long, env = "AWS_BUCKET", default_value = "")]
    pub bucket: String,

    /// Access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "", hide_env_values = true)]
    pub access_key: String,

    /// Secret access key
    #[arg(long, env = "AWS_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub secret_key: String,

    /// Use path-style addressing (MinIO and most self-hosted backends)
    #[arg(long, env = "AWS_FORCE_PATH")]
    pub path_style: bool,

    /// Use plain HTTP for endpoints given without a scheme
    #[arg(long, env = "AWS_DISABLE_SSL")]
    pub no_tls: bool,
}

impl ConnectionArgs {
    pub fn to_settings(&self) -> StorageSettings {
        StorageSettings {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            path_style: self.path_style,
            no_tls: self.no_tls,
        }
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Backup(args) => backup::execute(args, output_config).await,
        Commands::Restore(args) => restore::execute(args, output_config).await,
        Commands::Check(args) => check::execute(args, output_config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_backup_args() {
        let cli = Cli::parse_from([
            "s3keep", "backup", "--path", "/data", "--dest", "backups", "--recursive",
            "--bucket", "b", "--region", "r", "--access-key", "ak", "--secret-key", "sk",
        ]);
        match cli.command {
            Commands::Backup(args) => {
                assert_eq!(args.path, "/data");
                assert_eq!(args.dest, "backups");
                assert!(args.recursive);
                assert_eq!(args.connection.bucket, "b");
            }
            _ => panic!("expected backup command"),
        }
    }

    #[test]
    fn test_restore_args_exclude_list() {
        let cli = Cli::parse_from([
            "s3keep", "restore", "--path", "backups", "--dest", "/restore", "--exclude",
            "tmp,.git",
        ]);
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.exclude, vec!["tmp", ".git"]);
            }
            _ => panic!("expected restore command"),
        }
    }
}
