use anyhow::Result;
use clap::Parser;
use postmark_client::cli::{self, Cli, Commands};
use postmark_client::config::ClientConfig;
use postmark_client::PostmarkClient;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        eprintln!("\nFor help, run: postmark --help");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install default crypto provider for rustls
    // On non-Windows platforms, use aws-lc-rs; on Windows, use ring
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("postmark_client=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("postmark_client=info,warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Send(args) => {
            let config = cli::resolve_config(&cli).await?;
            let client = PostmarkClient::from_config(config)?;
            cli::run_send(&client, args).await?;
            Ok(())
        }

        Commands::SendBatch { file } => {
            let config = cli::resolve_config(&cli).await?;
            let client = PostmarkClient::from_config(config)?;
            let batch = cli::run_send_batch(&client, file).await?;

            if !batch.is_success() {
                anyhow::bail!(
                    "{} of {} messages failed: {}",
                    batch.failures().count(),
                    batch.responses.len(),
                    batch.message
                );
            }
            Ok(())
        }

        Commands::ErrorCode { code } => {
            println!("{}", cli::describe_error_code(*code));
            Ok(())
        }

        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Config file {:?} already exists. Use --force to overwrite.",
                    output
                );
            }

            ClientConfig::create_example(output).await?;
            println!("Created example configuration at {:?}", output);
            println!("Replace server_token with your server's API token before sending.");
            Ok(())
        }
    }
}
