//! backup command - push a local tree to a bucket prefix

use clap::Args;
use sk_core::{ensure_bucket, Backup, TransferConfig};
use sk_s3::S3Client;

use super::ConnectionArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressSpinner};

/// Back up data
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Local path to back up
    #[arg(short, long)]
    pub path: String,

    /// Destination prefix in the bucket
    #[arg(short, long)]
    pub dest: String,

    /// Back up a single file instead of the whole path
    #[arg(short, long)]
    pub file: Option<String>,

    /// Bundle the tree into one tar.gz archive before upload
    #[arg(short, long)]
    pub compress: bool,

    /// Embed a timestamp in the archive name (with --compress)
    #[arg(short, long)]
    pub timestamp: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Base names to skip, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Execute the backup command
pub async fn execute(args: BackupArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());
    let settings = args.connection.to_settings();

    if let Err(e) = settings.validate() {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }

    let client = match S3Client::connect(&settings).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if let Err(e) = ensure_bucket(&client, &settings.bucket).await {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }

    let config = TransferConfig {
        path: args.path.clone(),
        dest: args.dest.clone(),
        file: args.file,
        compress: args.compress,
        timestamp: args.timestamp,
        recursive: args.recursive,
        exclude: args.exclude,
        ..Default::default()
    };

    let spinner = ProgressSpinner::start(&output_config, &format!("Backing up {}", args.path));
    let result = Backup::new(&client, config).run().await;
    spinner.finish();

    match result {
        Ok(()) => {
            formatter.success(&format!("Backed up {} to {}", args.path, args.dest));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Backup failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
