use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "pa-cli")]
#[command(about = "Operator CLI for the provisioning API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9100")]
    url: String,

    #[arg(short, long, env = "PROVISION_API_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// List all PAs
    List,
    /// Show one PA's status
    Status { name: String },
    /// Create a PA
    Create {
        name: String,
        #[arg(long)]
        member: Option<String>,
        #[arg(long)]
        team: Option<String>,
    },
    /// Configure a PA
    Config {
        name: String,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        gateway_token: Option<String>,
    },
    /// Start a PA
    Start { name: String },
    /// Stop a PA
    Stop { name: String },
    /// Restart a PA
    Restart { name: String },
    /// Write a reverse-proxy route for a PA and reload the proxy
    AddRoute {
        name: String,
        domain: String,
        gateway_port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
    );

    let request = match cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::List => client.get(format!("{base}/pa/list")),
        Commands::Status { name } => client.get(format!("{base}/pa/status/{name}")),
        Commands::Create { name, member, team } => client
            .post(format!("{base}/pa/create"))
            .json(&json!({ "name": name, "member": member, "team": team })),
        Commands::Config {
            name,
            template,
            gateway_token,
        } => client.post(format!("{base}/pa/config")).json(&json!({
            "name": name,
            "template": template,
            "gateway_token": gateway_token,
        })),
        Commands::Start { name } => client
            .post(format!("{base}/pa/start"))
            .json(&json!({ "name": name })),
        Commands::Stop { name } => client
            .post(format!("{base}/pa/stop"))
            .json(&json!({ "name": name })),
        Commands::Restart { name } => client
            .post(format!("{base}/pa/restart"))
            .json(&json!({ "name": name })),
        Commands::AddRoute {
            name,
            domain,
            gateway_port,
        } => client.post(format!("{base}/caddy/add-route")).json(&json!({
            "name": name,
            "domain": domain,
            "gateway_port": gateway_port,
        })),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
