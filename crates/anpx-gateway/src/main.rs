use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anpx_did::JwtIssuer;
use anpx_gateway::config::Config;
use anpx_gateway::deployment::DeploymentFile;
use anpx_gateway::state::GatewayState;
use anpx_gateway::ws_accept::{accept_tunnel, log_admission_failure, AUTH_FAILED_CLOSE_CODE};
use anpx_gateway::ws_transport::{authorization_header, close_with_code, request_domain};
use anpx_gateway::Ingress;
use anpx_registry::run_sweeper;
use clap::Parser;

/// `0` clean shutdown; `1` configuration error; `2` bind failure; `3`
/// unrecoverable internal error.
const EXIT_CONFIG_ERROR: u8 = 1;
const EXIT_INTERNAL_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "anpx-gateway", about = "ANPX reverse-tunnel gateway")]
struct Args {
    /// Path to the gateway's TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to a static DID admission table (see
    /// [`anpx_gateway::deployment::DeploymentFile`]). Omit to run with
    /// no admitted DIDs (every tunnel is refused).
    #[arg(long, value_name = "FILE")]
    deployment: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {err}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let deployment = match load_deployment(args.deployment.as_deref()) {
        Ok(deployment) => deployment,
        Err(err) => {
            log::error!("configuration error: {err}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };
    let (did_resolver, service_directory) = deployment.build();

    let jwt_issuer = match build_jwt_issuer(&config) {
        Ok(issuer) => issuer,
        Err(err) => {
            log::error!("configuration error: {err}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("failed to start async runtime: {err}");
            return ExitCode::from(EXIT_INTERNAL_ERROR);
        }
    };

    runtime.block_on(run(config, did_resolver, service_directory, jwt_issuer));
    ExitCode::SUCCESS
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, String> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            Config::from_toml_str(&contents).map_err(|e| format!("invalid config file: {e}"))?
        }
        None => Config::default(),
    };
    Ok(apply_env_overrides(config))
}

/// Applies `ANPX_<SECTION>_<KEY>` environment overrides on top of the
/// file-loaded configuration.
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(v) = std::env::var("ANPX_HTTP_BIND_PORT") {
        if let Ok(port) = v.parse() {
            config.http.bind_port = port;
        }
    }
    if let Ok(v) = std::env::var("ANPX_HTTP_BIND_HOST") {
        config.http.bind_host = v;
    }
    if let Ok(v) = std::env::var("ANPX_WS_BIND_PORT") {
        if let Ok(port) = v.parse() {
            config.ws.bind_port = port;
        }
    }
    if let Ok(v) = std::env::var("ANPX_WS_BIND_HOST") {
        config.ws.bind_host = v;
    }
    if let Ok(v) = std::env::var("ANPX_MAX_CONNECTIONS") {
        if let Ok(n) = v.parse() {
            config.max_connections = n;
        }
    }
    config
}

fn load_deployment(path: Option<&std::path::Path>) -> Result<DeploymentFile, String> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            DeploymentFile::from_toml_str(&contents)
                .map_err(|e| format!("invalid deployment file: {e}"))
        }
        None => Ok(DeploymentFile::default()),
    }
}

fn build_jwt_issuer(config: &Config) -> Result<Option<JwtIssuer>, String> {
    match &config.jwt.private_key_file {
        None => Ok(None),
        Some(path) => {
            let pem = std::fs::read(path)
                .map_err(|e| format!("failed to read JWT private key {path}: {e}"))?;
            Ok(Some(JwtIssuer {
                signing_key_pem: Arc::new(pem),
                ttl_secs: config.jwt.ttl_seconds,
            }))
        }
    }
}

async fn run(
    config: Config,
    did_resolver: Arc<dyn anpx_did::DidResolver>,
    service_directory: Arc<dyn anpx_registry::ServiceDirectory>,
    jwt_issuer: Option<JwtIssuer>,
) {
    let http_host = config.http.bind_host.clone();
    let http_port = config.http.bind_port;
    let ws_host = config.ws.bind_host.clone();
    let ws_port = config.ws.bind_port;
    let sweep_interval = Duration::from_secs(anpx_registry::DEFAULT_SWEEP_INTERVAL_SECS);

    let state = GatewayState::new(config, did_resolver, service_directory, jwt_issuer);

    tokio::spawn(run_sweeper(state.registry.clone(), sweep_interval, {
        let correlator = state.correlator.clone();
        move |connection_id, failed_requests| {
            log::info!(
                "sweeper evicted connection_id={connection_id} failed_requests={}",
                failed_requests.len()
            );
            for request_id in failed_requests {
                correlator.fail(request_id, anpx_gateway::correlator::FailureKind::TunnelLost);
            }
        }
    }));

    let ws_state = state.clone();
    let ws_handler = trillium_websockets::websocket(move |mut conn: trillium_websockets::WebSocketConn| {
        let state = ws_state.clone();
        async move {
            let auth = authorization_header(&conn).map(str::to_string);
            let domain = request_domain(&conn).map(str::to_string);
            let (Some(auth), Some(domain)) = (auth, domain) else {
                close_with_code(&mut conn, AUTH_FAILED_CLOSE_CODE, "missing auth or host").await;
                return;
            };
            match accept_tunnel(state, &auth, &domain, conn).await {
                Ok(()) => {}
                Err(err) => {
                    log_admission_failure(&err);
                    // `conn` was moved into `accept_tunnel`; admission
                    // failures close the socket from within `admit`'s
                    // caller contract (no state registered), so there
                    // is nothing left to close here.
                }
            }
        }
    });

    let ingress = (trillium_logger::Logger::new(), Ingress::new(state.clone()));

    let http_server = trillium_tokio::config()
        .with_host(&http_host)
        .with_port(http_port)
        .run_async(ingress);

    let ws_server = trillium_tokio::config()
        .with_host(&ws_host)
        .with_port(ws_port)
        .run_async(ws_handler);

    tokio::join!(http_server, ws_server);
}
