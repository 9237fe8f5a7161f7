//! check command - validate settings and bucket reachability

use clap::Args;
use serde::Serialize;
use sk_core::ensure_bucket;
use sk_s3::S3Client;

use super::ConnectionArgs;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Validate configuration
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    status: &'static str,
    endpoint: String,
    bucket: String,
}

/// Execute the check command
pub async fn execute(args: CheckArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
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

    if formatter.is_json() {
        formatter.json(&CheckOutput {
            status: "ok",
            endpoint: settings.endpoint_url(),
            bucket: settings.bucket.clone(),
        });
    } else {
        formatter.success(&format!(
            "Configuration valid, bucket '{}' is reachable",
            settings.bucket
        ));
    }

    ExitCode::Success
}
