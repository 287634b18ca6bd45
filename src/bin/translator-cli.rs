use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use translator_service::pipeline::SupportedLanguages;
use translator_service::provider::pair::group_by_source;

#[derive(Parser)]
#[command(name = "translator-cli")]
#[command(about = "Client for the translation service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "TRANSLATOR_URL", default_value = "http://localhost:8000")]
    url: String,

    /// Admin API key, only needed for admin commands.
    #[arg(short, long, env = "TRANSLATOR_ADMIN_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// Readiness probe (fails while a model cannot be loaded)
    Ready,
    /// List supported languages, grouped by source
    Languages,
    /// Translate a piece of text
    Translate {
        text: String,
        #[arg(short, long, default_value = "en")]
        source: String,
        #[arg(short, long)]
        target: String,
        /// Optional id logged by the service alongside its own request id
        #[arg(long)]
        request_id: Option<String>,
    },
    /// Show admin status
    Status,
    /// Clear remembered model load failures
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{url}/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Ready => {
            let res = client.get(format!("{url}/ready")).send().await?;
            print_response(res).await?;
        }
        Commands::Languages => {
            let res = client
                .get(format!("{url}/supported-languages"))
                .send()
                .await?;
            if !res.status().is_success() {
                return print_response(res).await;
            }
            let languages: SupportedLanguages = res.json().await?;
            for (source, targets) in group_by_source(&languages.pairs) {
                println!("{source} -> {}", targets.join(", "));
            }
        }
        Commands::Translate {
            text,
            source,
            target,
            request_id,
        } => {
            let mut body = json!({
                "text": text,
                "source_lang": source,
                "target_lang": target,
            });
            if let Some(id) = request_id {
                body["request_id"] = Value::String(id);
            }
            let res = client
                .post(format!("{url}/translate"))
                .json(&body)
                .send()
                .await?;
            if let Some(id) = res.headers().get("x-request-id") {
                eprintln!("request id: {}", id.to_str().unwrap_or("<invalid>"));
            }
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client
                .get(format!("{url}/admin/status"))
                .headers(admin_headers(cli.key.as_deref())?)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Reset => {
            let res = client
                .post(format!("{url}/admin/models/reset"))
                .headers(admin_headers(cli.key.as_deref())?)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn admin_headers(key: Option<&str>) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let key = key.ok_or("admin commands need --key or TRANSLATOR_ADMIN_KEY")?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
