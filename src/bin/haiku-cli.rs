use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "haiku-cli")]
#[command(about = "Client for the haiku timeline service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "HAIKU_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the haikus found in a user's timeline
    Lookup { screen_name: String },
    /// Check service status (admin)
    Status,
    /// Show when a user's result was cached (admin)
    Cache { screen_name: String },
    /// Drop a user's cached result (admin)
    Invalidate { screen_name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Lookup { screen_name } => {
            let res = client.get(format!("{}/{}", base, screen_name))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/admin/status", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Cache { screen_name } => {
            let res = client.get(format!("{}/admin/cache/{}", base, screen_name))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Invalidate { screen_name } => {
            let res = client.delete(format!("{}/admin/cache/{}", base, screen_name))
                .headers(headers)
                .send()
                .await?;
            match res.status() {
                StatusCode::NO_CONTENT => println!("Invalidated cache entry for '{}'", screen_name),
                StatusCode::NOT_FOUND => println!("No cache entry for '{}'", screen_name),
                status => eprintln!("Error: Admin API returned status {}", status),
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
