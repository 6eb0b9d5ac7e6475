//! CLI argument definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use trustpilot::header::{HeaderValue, CONTENT_TYPE};
use trustpilot::{Method, PendingRequest};

use crate::output::OutputFormat;

/// Trustpilot API client: send authenticated requests from the shell.
#[derive(Parser, Debug)]
#[command(name = "trustpilot_api_client")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true, arg_required_else_help = true)]
pub struct Cli {
    /// Host name
    #[arg(long, env = "TRUSTPILOT_API_HOST")]
    pub host: Option<String>,

    /// Api version
    #[arg(long = "version", env = "TRUSTPILOT_API_VERSION")]
    pub api_version: Option<String>,

    /// Api key
    #[arg(long, env = "TRUSTPILOT_API_KEY")]
    pub key: Option<String>,

    /// Api secret
    #[arg(long, env = "TRUSTPILOT_API_SECRET")]
    pub secret: Option<String>,

    /// Token issuer host name
    #[arg(long, alias = "token_issuer_host", env = "TRUSTPILOT_API_TOKEN_ISSUER_HOST")]
    pub token_issuer_host: Option<String>,

    /// Trustpilot username
    #[arg(long, env = "TRUSTPILOT_USERNAME")]
    pub username: Option<String>,

    /// Trustpilot password
    #[arg(long, env = "TRUSTPILOT_PASSWORD")]
    pub password: Option<String>,

    /// Json config file name
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dot env file
    #[arg(short, long)]
    pub env: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, ignore_case = true, default_value_t = OutputFormat::Json)]
    pub outputformat: OutputFormat,

    /// Verbosity level (-v headers, -vv info logs, -vvv debug logs)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get an access token
    CreateAccessToken,
    /// Send a GET request
    Get { path: String },
    /// Send a DELETE request
    Delete { path: String },
    /// Send a POST request with specified data
    Post(BodyArgs),
    /// Send a PUT request with specified data
    Put(BodyArgs),
    /// Send a PATCH request with specified data
    Patch(BodyArgs),
}

#[derive(Args, Debug)]
pub struct BodyArgs {
    pub path: String,

    /// Data to send
    #[arg(long)]
    pub data: Option<String>,

    /// Content type of the data
    #[arg(long, alias = "content_type", default_value = "application/json")]
    pub content_type: String,
}

impl BodyArgs {
    pub fn request(&self, method: Method) -> Result<PendingRequest> {
        let mut request = PendingRequest::new(method, self.path.as_str())
            .with_header(CONTENT_TYPE, HeaderValue::from_str(&self.content_type)?);
        if let Some(data) = &self.data {
            request = request.with_body(data.as_str());
        }
        Ok(request)
    }
}
