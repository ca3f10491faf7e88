//! `run` and `targets` subcommand handlers.

use tracing::{error, info};

use extbridge_cdp::discovery;
use extbridge_config::Config;
use extbridge_orchestrator::{Harness, Scenario};

use crate::cli::RunArgs;
use crate::EXIT_SETUP_ERROR;

/// Run one scenario and return the process exit code.
pub(crate) async fn run_scenario(config: &Config, args: &RunArgs) -> i32 {
    let scenario = if args.keys.is_empty() {
        Scenario::tab_switch()
    } else {
        Scenario::new("custom keys", args.keys.clone())
    }
    .with_timings(&config.scenario);

    let harness = match Harness::setup(config).await {
        Ok(harness) => harness,
        Err(e) => {
            error!(phase = %e.phase(), "{}", e);
            return EXIT_SETUP_ERROR;
        }
    };
    info!(
        "Bridge ready at {}; waiting for the extension to poll",
        harness.bridge_url()
    );

    let report = harness.run(&scenario).await;
    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
    report.exit_code()
}

/// Print the pages the DevTools endpoint exposes.
pub(crate) async fn list_targets(http_endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let targets = discovery::list_targets(http_endpoint).await?;
    let pages: Vec<_> = targets.iter().filter(|t| t.target_type == "page").collect();

    if pages.is_empty() {
        println!("No pages at {http_endpoint}");
        return Ok(());
    }

    println!("{:<34} {:<40} URL", "ID", "TITLE");
    println!("{}", "-".repeat(100));
    for page in pages {
        let title: String = page.title.chars().take(38).collect();
        println!("{:<34} {:<40} {}", page.id, title, page.url);
        if let Some(ws) = &page.web_socket_debugger_url {
            println!("{:<34} {}", "", ws);
        }
    }
    Ok(())
}
