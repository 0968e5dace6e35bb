use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use service_broker::http::middleware::identity::HEADER_REQUEST_IDENTITY;
use service_broker::http::middleware::version::{HEADER_API_VERSION, SUPPORTED_API_VERSION};

#[derive(Parser)]
#[command(name = "broker-cli")]
#[command(about = "Query a running service broker", long_about = None)]
struct Cli {
    #[arg(short, long, env = "BROKER_URL", default_value = "http://localhost:5000")]
    url: String,

    #[arg(long, env = "BROKER_USERNAME", default_value = "username")]
    username: String,

    #[arg(long, env = "BROKER_PASSWORD", default_value = "password")]
    password: String,

    /// Value sent as X-Broker-API-Version.
    #[arg(long, default_value = SUPPORTED_API_VERSION)]
    api_version: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the service catalog
    Catalog,
    /// Check broker liveness
    Health,
    /// Show broker build information
    Version,
    /// Send a provision request for an instance
    Provision {
        instance_id: String,
        #[arg(long, default_value = "cf")]
        service_id: String,
        #[arg(long)]
        plan_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(HEADER_API_VERSION, HeaderValue::from_str(&cli.api_version)?);
    headers.insert(
        HEADER_REQUEST_IDENTITY,
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())?,
    );

    let res = match cli.command {
        Commands::Catalog => {
            client
                .get(format!("{}/v2/catalog/", base))
                .basic_auth(&cli.username, Some(&cli.password))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health/", base)).send().await?,
        Commands::Version => client.get(format!("{}/version/", base)).send().await?,
        Commands::Provision {
            instance_id,
            service_id,
            plan_id,
        } => {
            client
                .put(format!("{}/v2/service_instances/{}/", base, instance_id))
                .basic_auth(&cli.username, Some(&cli.password))
                .headers(headers)
                .json(&json!({ "service_id": service_id, "plan_id": plan_id }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: broker returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Body: {}", text);
        }
        std::process::exit(1);
    }

    let body: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
