//! Agent binary (spec §6.1 CLI flags `-c`/`--once`). Loads `AgentConfig`
//! from the YAML file the `-c` flag points at and drives
//! `rackwatch_agent_runtime::AgentRuntime` either once or on its
//! collection-interval loop until ctrl-c.
//!
//! Exit codes (spec §6.1): 0 clean shutdown, 1 startup/config error,
//! 2 unrecoverable runtime error.

use clap::Parser;
use rackwatch_core::config::AgentConfig;

#[derive(Parser, Debug)]
#[command(name = "rackwatch-agent", about = "Rackwatch telemetry agent")]
struct Cli {
    /// Path to the agent's YAML config file.
    #[arg(short = 'c', long = "config", default_value = "agent.yaml")]
    config: String,

    /// Run one collection cycle and exit instead of looping forever.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AgentConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load agent config from {}: {err}", cli.config);
            std::process::exit(1);
        }
    };

    rackwatch_core::telemetry::init_tracing(&config.log_level);

    let mut runtime = match rackwatch_agent_runtime::AgentRuntime::new(config) {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "agent runtime failed to initialize");
            std::process::exit(1);
        }
    };

    if cli.once {
        let now = chrono::Utc::now().timestamp();
        match runtime.run_once(now).await {
            Ok(()) => std::process::exit(0),
            Err(err) => {
                tracing::error!(error = %err, "single collection cycle failed");
                std::process::exit(2);
            }
        }
    }

    match runtime.run_forever().await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            tracing::error!(error = %err, "agent runtime exited with an error");
            std::process::exit(2);
        }
    }
}
