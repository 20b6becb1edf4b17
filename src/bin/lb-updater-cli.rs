use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use lb_updater::config::loader::{apply_env_overrides, read_config_file};
use lb_updater::config::UpdaterConfig;
use lb_updater::reconcile::{reconcile, PortRuleTemplate};

#[derive(Parser)]
#[command(name = "lb-updater-cli")]
#[command(about = "Offline reconciliation and manual triggering for lb-updater", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a rule into a saved load balancer definition and print the result
    Reconcile {
        /// JSON file holding the load balancer definition as fetched
        #[arg(short, long)]
        existing: PathBuf,

        /// Target service of the new rule
        #[arg(short, long)]
        service_id: String,

        /// Optional TOML config file; environment variables override it
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Ask a running updater to add a rule
    Trigger {
        #[arg(short, long, default_value = "http://localhost:80")]
        url: String,

        /// Target service of the new rule
        service_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile { existing, service_id, config } => {
            let mut settings = match config {
                Some(path) => read_config_file(&path)?,
                None => UpdaterConfig::default(),
            };
            apply_env_overrides(&mut settings, |var| std::env::var(var).ok())?;

            let existing: Value = serde_json::from_str(&std::fs::read_to_string(existing)?)?;
            let template = PortRuleTemplate::from_config(&settings.rule);
            let rule = template.for_service(service_id);

            let reconciled = reconcile(existing, &rule)?;
            eprintln!("Dropped {} existing port rule(s)", reconciled.dropped_rules);
            eprintln!("Endpoint: {}", template.endpoint());
            println!("{}", serde_json::to_string_pretty(&reconciled.config)?);
        }
        Commands::Trigger { url, service_id } => {
            let client = reqwest::Client::new();
            let res = client
                .get(format!("{}/{}", url.trim_end_matches('/'), service_id))
                .send()
                .await?;

            let status = res.status();
            let text = res.text().await?;
            if !status.is_success() {
                eprintln!("Error: updater returned status {}", status);
                eprintln!("Response: {}", text);
                std::process::exit(1);
            }
            println!("{}", text);
        }
    }

    Ok(())
}
