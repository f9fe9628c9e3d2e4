use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use futures_util::StreamExt;
use tracing::info;

mod cli;

use gembridge_client::{EndpointGate, EnterpriseClient, HttpTransport, TransportOptions};
use gembridge_core::{ContentGenerator, CountRequest, EmbedRequest, GatewayConfig, GenerateRequest};
use gembridge_protocol::gemini::types::Content;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("gembridge failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = GatewayConfig::from_env()?;
    info!(
        base_url = %config.base_url,
        project = %config.project,
        location = %config.location,
        model = %config.model,
        sso = config.sso.is_some(),
        "config loaded"
    );

    let transport = Arc::new(HttpTransport::new(TransportOptions::from(&config))?);
    let availability = config.availability;
    let client = Arc::new(EnterpriseClient::from_config(config, transport));
    let gate = EndpointGate::new(client, availability);

    match cli.command {
        Command::Generate { prompt, system } => {
            let mut request = GenerateRequest::new(vec![Content::user(prompt)]);
            request.system_instruction = system;
            let response = gate.generate_content(request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Stream { prompt } => {
            let request = GenerateRequest::new(vec![Content::user(prompt)]);
            let mut stream = gate.generate_content_stream(request).await?;
            while let Some(chunk) = stream.next().await {
                println!("{}", serde_json::to_string_pretty(&chunk?)?);
            }
        }
        Command::Count { prompt, model } => {
            let mut request = CountRequest::new(vec![Content::user(prompt)]);
            request.model = model;
            let response = gate.count_tokens(request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Embed { text } => {
            let request = EmbedRequest::new(Content::user(text));
            let response = gate.embed_content(request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gembridge=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
