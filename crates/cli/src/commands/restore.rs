//! restore command - pull a bucket prefix back to a local path

use clap::Args;
use sk_core::{ensure_bucket, Restore, TransferConfig};
use sk_s3::S3Client;

use super::ConnectionArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressSpinner};

/// Restore data
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Source prefix in the bucket
    #[arg(short, long)]
    pub path: String,

    /// Local destination directory; created if missing
    #[arg(short, long)]
    pub dest: String,

    /// Restore a single file instead of the whole prefix
    #[arg(short, long)]
    pub file: Option<String>,

    /// Unpack downloaded files detected as tar.gz archives
    #[arg(long)]
    pub decompress: bool,

    /// Keep going when a single download or decompression fails
    #[arg(long)]
    pub ignore_errors: bool,

    /// Descend into nested prefixes
    #[arg(short, long)]
    pub recursive: bool,

    /// Overwrite local files that already exist
    #[arg(long)]
    pub force: bool,

    /// Base names to skip, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Execute the restore command
pub async fn execute(args: RestoreArgs, output_config: OutputConfig) -> ExitCode {
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
        decompress: args.decompress,
        ignore_errors: args.ignore_errors,
        recursive: args.recursive,
        force: args.force,
        exclude: args.exclude,
        ..Default::default()
    };

    let spinner = ProgressSpinner::start(&output_config, &format!("Restoring {}", args.path));
    let result = Restore::new(&client, config).run().await;
    spinner.finish();

    match result {
        Ok(()) => {
            formatter.success(&format!("Restored {} to {}", args.path, args.dest));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Restore failed: {e}"));
            ExitCode::from_error(&e)
        }
    }
}
