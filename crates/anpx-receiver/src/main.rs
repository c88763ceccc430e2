use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anpx_receiver::config::Config;
use anpx_receiver::dispatcher::run_tunnel_session;
use anpx_receiver::local_app::HttpForwardApplication;
use anpx_receiver::reconnect::Backoff;
use anpx_receiver::tunnel::{dial, DialConnector};
use clap::Parser;
use log::{error, info, warn};
use trillium_client::Client;
use trillium_rustls::RustlsConfig;

const EXIT_CONFIG_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "anpx-receiver", about = "ANPX tunnel receiver")]
struct Args {
    /// Path to the receiver's TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start async runtime: {err}");
            return ExitCode::from(3);
        }
    };

    runtime.block_on(run(config));
    ExitCode::SUCCESS
}

fn load_config(path: &std::path::Path) -> Result<Config, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let config = Config::from_toml_str(&contents).map_err(|e| format!("invalid config file: {e}"))?;
    Ok(apply_env_overrides(config))
}

fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(v) = std::env::var("ANPX_TUNNEL_URL") {
        config.tunnel_url = v;
    }
    if let Ok(v) = std::env::var("ANPX_LOCAL_APP_URL") {
        config.local_app_url = v;
    }
    if let Ok(v) = std::env::var("ANPX_MAX_PENDING") {
        if let Ok(n) = v.parse() {
            config.max_pending = n;
        }
    }
    config
}

/// Dials the tunnel, runs the session to completion, and repeats with
/// exponential backoff on loss. This loop does not exit on its own; it
/// is expected to run until the process is killed.
async fn run(config: Config) {
    let client = Client::<DialConnector>::new(RustlsConfig::default());
    let app = Arc::new(HttpForwardApplication::new(client, config.local_app_url.clone()));
    let mut backoff = Backoff::new(&config.reconnect);

    loop {
        match dial(&config.tunnel_url, &config.authorization).await {
            Ok(socket) => {
                info!("tunnel established to {}", config.tunnel_url);
                backoff.reset();
                run_tunnel_session(
                    socket,
                    app.clone(),
                    config.max_pending,
                    config.queue_bound,
                    config.chunk_size,
                    Duration::from_secs(300),
                )
                .await;
                warn!("tunnel to {} lost; reconnecting", config.tunnel_url);
            }
            Err(err) => {
                warn!("tunnel dial to {} failed: {err}", config.tunnel_url);
            }
        }

        let delay = backoff.next_delay();
        tokio::time::sleep(delay).await;
    }
}
