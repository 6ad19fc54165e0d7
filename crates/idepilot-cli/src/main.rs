// IdePilot CLI entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use idepilot::bootstrap;
use idepilot::{AppConfig, AppResult, AutomationService};
use idepilot_di::{BootstrapReport, ResolvedOrder};

#[derive(Parser)]
#[command(name = "idepilot", version, about = "IDE automation backend")]
struct Cli {
    /// Directory of the project under automation
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// Port of the IDE's remote-debugging endpoint
    #[arg(long, global = true)]
    ide_port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the registration plan without constructing services
    Plan {
        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Construct and register every declared service
    Bootstrap,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.project_dir, cli.ide_port) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli.command, config).await {
        error!(error = %err, "idepilot failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("IDEPILOT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(command: Commands, config: AppConfig) -> AppResult<()> {
    match command {
        Commands::Plan { json } => {
            let registry = bootstrap::build_registry(&config)?;
            let plan = registry.plan()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        Commands::Bootstrap => {
            let registry = bootstrap::build_registry(&config)?;
            let report = registry.register_all().await?;
            print_report(&report);
            if let Ok(automation) = registry.get::<AutomationService>("automation_service") {
                let status = automation.status().await;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
        }
    }
    Ok(())
}

fn print_plan(plan: &ResolvedOrder) {
    println!(
        "registration plan: {} services in {} groups",
        plan.ordered_services.len(),
        plan.registration_plan.len()
    );
    for group in &plan.registration_plan {
        println!("  [{}]", group.category);
        for service in &group.services {
            println!("    {service}");
        }
    }
}

fn print_report(report: &BootstrapReport) {
    println!(
        "bootstrap complete: {} registered, {} failed",
        report.registered.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        println!(
            "  failed [{}] {}: {}",
            failure.category, failure.name, failure.error
        );
    }
}
