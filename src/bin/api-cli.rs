use clap::{Parser, Subcommand};
use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};

use product_api::security::{TokenCodec, BEARER_PREFIX};

#[derive(Parser)]
#[command(name = "api-cli")]
#[command(about = "Command line client for the Product API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange username and password for a token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// List products, or fetch one with --id
    Products {
        #[arg(short, long, env = "API_TOKEN")]
        token: String,
        #[arg(long)]
        id: Option<u64>,
    },
    /// Decode a token's claims without verifying its signature
    Inspect { token: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{}/login", cli.url))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Products { token, id } => {
            let url = match id {
                Some(id) => format!("{}/products/{}", cli.url, id),
                None => format!("{}/products", cli.url),
            };
            let res = client
                .get(url)
                .header(AUTHORIZATION, format!("{}{}", BEARER_PREFIX, token))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Inspect { token } => {
            let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(&token);
            let parsed = TokenCodec::parse(token)?;
            println!("{}", serde_json::to_string_pretty(parsed.claims())?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
