//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::batch::BatchResponse;
use crate::client::PostmarkClient;
use crate::config::ClientConfig;
use crate::error::{PostmarkError, Result};
use crate::error_codes;
use crate::message::{Attachment, Header, Message};
use crate::transport::Transport;

#[derive(Parser, Debug)]
#[command(name = "postmark")]
#[command(version)]
#[command(about = "Send transactional email through the Postmark API", long_about = None)]
pub struct Cli {
    /// Path to configuration file (used when no token is given)
    #[arg(short, long, default_value = "postmark.toml")]
    pub config: PathBuf,

    /// Server token
    #[arg(long, env = "POSTMARK_SERVER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the API base URL
    #[arg(long, env = "POSTMARK_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single message
    Send(SendArgs),

    /// Send a JSON array of messages as one batch
    SendBatch {
        /// Path to a JSON file containing an array of messages
        file: PathBuf,
    },

    /// Describe a provider error code
    ErrorCode {
        /// Numeric ErrorCode from a response body
        code: u32,
    },

    /// Generate example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "postmark.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// Sender address
    #[arg(long)]
    pub from: String,

    /// Recipient addresses, comma separated
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub body: Option<String>,

    /// Send the body as HTML
    #[arg(long)]
    pub html: bool,

    #[arg(long)]
    pub cc: Option<String>,

    #[arg(long)]
    pub bcc: Option<String>,

    #[arg(long)]
    pub reply_to: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// Extra header as "Name: Value" (repeatable)
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// File to attach (repeatable)
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,
}

/// Work out the client configuration from flags, environment and config file
///
/// A token from the command line or environment wins over the config file.
pub async fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.token {
        Some(token) => ClientConfig::new(token.clone()),
        None => ClientConfig::load(&cli.config).await?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api_base_url = base_url.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Parse a "Name: Value" header argument
pub fn parse_header(raw: &str) -> Result<Header> {
    let (name, value) = raw.split_once(':').ok_or_else(|| {
        PostmarkError::Validation(format!("Header '{}' must look like 'Name: Value'", raw))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PostmarkError::Validation(format!(
            "Header '{}' has an empty name",
            raw
        )));
    }

    Ok(Header::new(name, value.trim()))
}

/// Guess a MIME type from a file extension
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Build a message from `send` arguments, reading attachments from disk
pub async fn build_message(args: &SendArgs) -> Result<Message> {
    let mut message = Message {
        from: args.from.clone(),
        to: args.to.clone(),
        reply_to: args.reply_to.clone(),
        cc: args.cc.clone(),
        bcc: args.bcc.clone(),
        subject: args.subject.clone(),
        body: args.body.clone(),
        is_html: args.html,
        tag: args.tag.clone(),
        ..Default::default()
    };

    for raw in &args.headers {
        message.headers.push(parse_header(raw)?);
    }

    for path in &args.attachments {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string();
        message
            .attachments
            .push(Attachment::from_bytes(name, content_type_for(path), &bytes));
    }

    Ok(message)
}

/// Load a JSON array of messages
pub async fn load_batch_file(path: &Path) -> Result<Vec<Message>> {
    let content = tokio::fs::read_to_string(path).await?;
    let messages: Vec<Message> = serde_json::from_str(&content)?;
    info!("Loaded {} messages from {:?}", messages.len(), path);
    Ok(messages)
}

/// Send one message and print the outcome
pub async fn run_send<T: Transport>(client: &PostmarkClient<T>, args: &SendArgs) -> Result<()> {
    let message = build_message(args).await?;
    let response = client.send_message(&message).await?;

    println!("Status:     {}", response.status());
    println!("Message:    {}", response.message);
    if let Some(id) = &response.message_id {
        println!("Message ID: {}", id);
    }
    if let Some(submitted_at) = &response.submitted_at {
        println!("Submitted:  {}", submitted_at.to_rfc3339());
    }

    Ok(())
}

/// Send a batch file and print a per-message report
pub async fn run_send_batch<T: Transport>(
    client: &PostmarkClient<T>,
    path: &Path,
) -> Result<BatchResponse> {
    let messages = load_batch_file(path).await?;
    let batch = client.send_batch(&messages).await?;

    print!("{}", format_batch_report(&batch));
    Ok(batch)
}

/// Render a batch outcome, one line per member
pub fn format_batch_report(batch: &BatchResponse) -> String {
    let mut report = format!(
        "Batch status: {} ({} messages, {} failed)\n",
        batch.status,
        batch.responses.len(),
        batch.failures().count()
    );

    for (index, response) in batch.responses.iter().enumerate() {
        let id = response.message_id.as_deref().unwrap_or("-");
        report.push_str(&format!(
            "  [{}] {} {} {}\n",
            index,
            response.status(),
            id,
            response.message
        ));
    }

    report
}

/// Describe a provider error code
pub fn describe_error_code(code: u32) -> String {
    match error_codes::lookup(code) {
        Some(info) => format!("{}: {}\n{}", code, info.label, info.description),
        None => format!("{}: unknown error code", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use tempfile::NamedTempFile;

    fn cli_with(token: Option<&str>, config: PathBuf) -> Cli {
        Cli {
            config,
            token: token.map(str::to_string),
            base_url: None,
            verbose: false,
            command: Commands::ErrorCode { code: 0 },
        }
    }

    #[test]
    fn test_parse_header() {
        let header = parse_header("X-Campaign:  spring ").unwrap();
        assert_eq!(header, Header::new("X-Campaign", "spring"));

        let header = parse_header("X-Url: https://example.com/a").unwrap();
        assert_eq!(header.value, "https://example.com/a");

        assert!(parse_header("no separator").is_err());
        assert!(parse_header(" : value").is_err());
    }

    #[test]
    fn test_cli_parses_send() {
        let cli = Cli::try_parse_from([
            "postmark",
            "--token",
            "abc",
            "send",
            "--from",
            "a@example.com",
            "--to",
            "b@example.com",
            "--subject",
            "Hi",
            "--header",
            "X-A: 1",
            "--header",
            "X-B: 2",
            "--html",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("abc"));
        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.from, "a@example.com");
                assert!(args.html);
                assert_eq!(args.headers, vec!["X-A: 1", "X-B: 2"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("report.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_build_message_with_attachment() {
        let file = NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), b"hello").await.unwrap();

        let args = SendArgs {
            from: "a@example.com".to_string(),
            to: "b@example.com".to_string(),
            subject: Some("Hi".to_string()),
            headers: vec!["X-A: 1".to_string()],
            attachments: vec![file.path().to_path_buf()],
            ..Default::default()
        };

        let message = build_message(&args).await.unwrap();
        assert_eq!(message.headers, vec![Header::new("X-A", "1")]);
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].content, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_resolve_config_prefers_token() {
        let cli = cli_with(Some("flag-token"), PathBuf::from("/nonexistent/postmark.toml"));
        let config = resolve_config(&cli).await.unwrap();
        assert_eq!(config.server_token, "flag-token");
    }

    #[tokio::test]
    async fn test_resolve_config_from_file_with_base_url() {
        let file = NamedTempFile::new().unwrap();
        ClientConfig::new("file-token").save(file.path()).await.unwrap();

        let mut cli = cli_with(None, file.path().to_path_buf());
        cli.base_url = Some("http://localhost:8080".to_string());

        let config = resolve_config(&cli).await.unwrap();
        assert_eq!(config.server_token, "file-token");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_load_batch_file() {
        let file = NamedTempFile::new().unwrap();
        tokio::fs::write(
            file.path(),
            r#"[
                {"from": "a@example.com", "to": "b@example.com", "subject": "One"},
                {"from": "a@example.com", "to": "c@example.com", "body": "Two"}
            ]"#,
        )
        .await
        .unwrap();

        let messages = load_batch_file(file.path()).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].body.as_deref(), Some("Two"));
    }

    #[test]
    fn test_load_batch_file_rejects_bad_input() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"from": "a@example.com"}"#).unwrap();

        let result = tokio_test::block_on(load_batch_file(file.path()));
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(PostmarkError::Serialization(_))));

        let missing = tokio_test::block_on(load_batch_file(Path::new("/nonexistent/batch.json")));
        assert!(matches!(missing, Err(PostmarkError::Io(_))));
    }

    #[test]
    fn test_format_batch_report() {
        let responses: Vec<Response> = serde_json::from_str(
            r#"[
                {"ErrorCode": 0, "Message": "OK", "MessageID": "id-1"},
                {"ErrorCode": 406, "Message": "Inactive recipient"}
            ]"#,
        )
        .unwrap();
        let batch = BatchResponse::from_responses(responses);

        let report = format_batch_report(&batch);
        assert!(report.starts_with("Batch status: partial failure (2 messages, 1 failed)"));
        assert!(report.contains("[0] success id-1 OK"));
        assert!(report.contains("[1] user error - Inactive recipient"));
    }

    #[test]
    fn test_describe_error_code() {
        assert!(describe_error_code(406).starts_with("406: Inactive recipient"));
        assert_eq!(describe_error_code(1), "1: unknown error code");
    }
}
