//! Server binary (spec §6.1 HTTP API; §4.7 startup/shutdown sequencing).
//!
//! Startup order: load config, open the datastore, load or create the
//! admin token and TLS material, install the Prometheus recorder, start
//! the retention/command-TTL sweep ticker, bind the listener, accept.
//! Shutdown runs the same steps in reverse: stop accepting, drain
//! in-flight requests for a bounded window, cancel the sweep ticker,
//! checkpoint the datastore, exit.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};

use rackwatch_auth::{AuthService, Identity};
use rackwatch_commands::CommandService;
use rackwatch_core::audit_logging::AuditLogger;
use rackwatch_core::config::{ServerConfig, ServerConfigOverrides};
use rackwatch_core::error::{ApiError, ErrorKind};
use rackwatch_core::labels::LabelFilter;
use rackwatch_core::rate_limiting::{RateLimitConfig, RateLimitRule, RateLimiter};
use rackwatch_core::telemetry::{init_tracing, install_prometheus_recorder};
use rackwatch_core::wire::{
    CommandResultRequest, EnqueueCommandRequest, EnqueueCommandResponse, IngestResult, LogBatch,
    MetricBatch, PendingCommand, RegisterRequest, RegisterResponse, VerifyResponse,
};
use rackwatch_ingestion::IngestionService;
use rackwatch_lifecycle::{RetentionPolicy, ShutdownCoordinator, Sweeper};
use rackwatch_logs::LogIngestionService;
use rackwatch_query::{Aggregation, QueryService};
use rackwatch_storage::{Store, StorageHandle, StorageStats};

#[derive(Parser, Debug)]
#[command(name = "rackwatch-server", about = "Rackwatch telemetry and command-plane server")]
struct Cli {
    #[arg(short = 'c', long = "config", default_value = "server.yaml")]
    config: String,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    db_path: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long)]
    use_tls: Option<bool>,
    #[arg(long)]
    test_mode: Option<bool>,
}

#[derive(Clone)]
struct AppState {
    auth: Arc<AuthService>,
    ingestion: Arc<IngestionService>,
    logs: Arc<LogIngestionService>,
    commands: Arc<CommandService>,
    query: Arc<QueryService>,
    store: StorageHandle,
    audit: AuditLogger,
    rate_limiter: Arc<RateLimiter>,
    prometheus: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let overrides = ServerConfigOverrides {
        host: cli.host,
        port: cli.port,
        db_path: cli.db_path,
        log_level: cli.log_level,
        use_tls: cli.use_tls,
        test_mode: cli.test_mode,
    };

    let config = match ServerConfig::load(&cli.config, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(2);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.auth_dir)?;

    let store = Store::open(&config.db_path)?;
    let audit = AuditLogger::new(&config.audit_log_path)?;
    let admin_token = load_or_create_admin_token(&config.auth_dir)?;
    let prometheus = install_prometheus_recorder()?;

    let auth = AuthService::new(store.clone(), audit.clone(), admin_token, config.test_mode);
    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        default: RateLimitRule::default(),
        endpoints: HashMap::new(),
    }));

    let state = AppState {
        auth: Arc::new(auth),
        ingestion: Arc::new(IngestionService::new(store.clone())),
        logs: Arc::new(LogIngestionService::new(store.clone())),
        commands: Arc::new(CommandService::new(store.clone())),
        query: Arc::new(QueryService::new(store.clone())),
        store: store.clone(),
        audit,
        rate_limiter,
        prometheus,
    };

    let shutdown = ShutdownCoordinator::new(Duration::from_secs(30));
    let sweeper = Sweeper::new(
        store.clone(),
        RetentionPolicy {
            metrics_retention_days: config.metrics_retention_days,
            logs_retention_days: config.logs_retention_days,
        },
        format!("{}:{}", config.host, config.port),
    );
    let sweep_token = shutdown.task_token();
    let sweep_interval = Duration::from_secs(config.cleanup_interval_sec.max(1));
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run(sweep_interval, sweep_token).await;
    });

    let app = build_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let handle = axum_server::Handle::new();
    let signal_coordinator = shutdown.clone();
    let signal_handle = handle.clone();
    let drain_timeout = shutdown.drain_timeout();
    tokio::spawn(async move {
        signal_coordinator.wait_for_signal().await;
        signal_handle.graceful_shutdown(Some(drain_timeout));
    });

    tracing::info!(%addr, use_tls = config.use_tls, "starting rackwatch-server");

    if config.use_tls {
        let tls_config = load_or_create_tls_config(&config.auth_dir).await?;
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await?;
    } else {
        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await?;
    }

    sweeper_handle.await.ok();
    store.checkpoint_and_vacuum().await.ok();
    tracing::info!("shutdown complete");
    Ok(())
}

/// Self-issued once, on first boot; printed so the operator can pull it
/// out of the log for the agent's `admin_token` config field (mirrors the
/// agent's own keystore, which persists generated key material under the
/// same kind of directory).
fn load_or_create_admin_token(auth_dir: &str) -> anyhow::Result<String> {
    let path = format!("{auth_dir}/admin_token");
    if let Ok(existing) = std::fs::read_to_string(&path) {
        let trimmed = existing.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    let token = rackwatch_auth::generate_bearer_token();
    std::fs::write(&path, &token)?;
    tracing::warn!(path = %path, "generated a new admin token on first boot");
    Ok(token)
}

async fn load_or_create_tls_config(auth_dir: &str) -> anyhow::Result<axum_server::tls_rustls::RustlsConfig> {
    let cert_path = format!("{auth_dir}/server_cert.pem");
    let key_path = format!("{auth_dir}/server_key.pem");

    if !std::path::Path::new(&cert_path).exists() {
        let certified_key = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])?;
        std::fs::write(&cert_path, certified_key.cert.pem())?;
        std::fs::write(&key_path, certified_key.key_pair.serialize_pem())?;
        tracing::info!(cert_path = %cert_path, "generated a self-signed TLS certificate");
    }

    Ok(axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path).await?)
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/clients/register", post(register))
        .route("/api/client/verify", get(verify))
        .route("/api/metrics", post(ingest_metrics))
        .route("/api/logs", post(ingest_logs))
        .route("/api/commands/{agent_id}", get(poll_commands))
        .route("/api/command-results", post(submit_command_result))
        .route("/api/commands", post(enqueue_command))
        .route("/api/clients", get(list_clients))
        .route("/api/timeseries/{metric_name}", get(timeseries))
        .route("/api/timeseries/{metric_name}/rate", get(timeseries_rate))
        .route("/api/stats", get(stats))
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// --- auth helpers -----------------------------------------------------

async fn authenticate(state: &AppState, headers: &HeaderMap, remote_addr: Option<String>) -> Result<Identity, ApiError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthenticated("missing bearer token"))?;

    state.auth.verify_bearer(token, remote_addr).await.map_err(auth_err)
}

fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("admin only"))
    }
}

fn require_self_or_admin(identity: &Identity, agent_id: &str) -> Result<(), ApiError> {
    if identity.may_act_as(agent_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("not authorized for this agent"))
    }
}

fn require_agent(identity: &Identity) -> Result<String, ApiError> {
    match identity {
        Identity::Agent(agent_id) => Ok(agent_id.clone()),
        Identity::Admin => Err(ApiError::forbidden("this endpoint requires an agent identity, not admin")),
    }
}

fn check_rate_limit(state: &AppState, ip: std::net::IpAddr, endpoint: &str) -> Result<(), ApiError> {
    state.rate_limiter.check(ip, endpoint).map_err(ApiError::try_again_later)
}

fn audit_access(state: &AppState, agent_id: Option<String>, endpoint: &str, method: &str, status: u16, remote: Option<String>) {
    let _ = state.audit.log_api_access(agent_id, endpoint, method, status, remote);
}

// --- error mapping ------------------------------------------------------

fn storage_err(e: rackwatch_storage::StorageError) -> ApiError {
    use rackwatch_storage::StorageError::*;
    match e {
        NotFound(what) => ApiError::not_found(what),
        KindMismatch { series_id, expected, actual } => {
            ApiError::new(ErrorKind::KindMismatch, format!("series {series_id}: expected {expected}, got {actual}"))
        }
        Conflict(msg) => ApiError::new(ErrorKind::Conflict, msg),
        InvalidTransition { from, to } => ApiError::new(ErrorKind::Conflict, format!("cannot transition {from} -> {to}")),
        Sqlite(e) => ApiError::internal(e.to_string()),
        Pool(msg) => ApiError::internal(msg),
    }
}

fn auth_err(e: rackwatch_auth::AuthError) -> ApiError {
    use rackwatch_auth::AuthError::*;
    match e {
        Unauthenticated => ApiError::unauthenticated("invalid credentials"),
        Forbidden => ApiError::forbidden("forbidden"),
        BadSignature => ApiError::bad_request("signature verification failed"),
        AlreadyRegistered => ApiError::new(ErrorKind::AlreadyRegistered, "agent already registered with a different public key"),
        Storage(e) => storage_err(e),
        InvalidKey(msg) => ApiError::bad_request(format!("invalid key material: {msg}")),
    }
}

fn ingestion_err(e: rackwatch_ingestion::IngestionError) -> ApiError {
    use rackwatch_ingestion::IngestionError::*;
    match e {
        Forbidden => ApiError::forbidden("batch agent_id does not match the authenticated identity"),
        Malformed(msg) => ApiError::bad_request(msg),
        Storage(e) => storage_err(e),
    }
}

fn log_ingestion_err(e: rackwatch_logs::LogIngestionError) -> ApiError {
    use rackwatch_logs::LogIngestionError::*;
    match e {
        Forbidden => ApiError::forbidden("batch agent_id does not match the authenticated identity"),
        Storage(e) => storage_err(e),
    }
}

fn command_err(e: rackwatch_commands::CommandError) -> ApiError {
    use rackwatch_commands::CommandError::*;
    match e {
        Forbidden => ApiError::forbidden("command does not belong to this agent"),
        Malformed(msg) => ApiError::new(ErrorKind::UnknownCommand, msg),
        Storage(e) => storage_err(e),
    }
}

fn query_err(e: rackwatch_query::QueryError) -> ApiError {
    match e {
        rackwatch_query::QueryError::Storage(e) => storage_err(e),
    }
}

// --- handlers -------------------------------------------------------------

async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let remote = Some(addr.ip().to_string());
    check_rate_limit(&state, addr.ip(), "/api/clients/register")?;

    let agent_id = req.agent_id.clone();
    let domain_req = rackwatch_auth::registration::RegisterRequest {
        agent_id: req.agent_id,
        hostname: req.hostname,
        public_key_pem: req.public_key,
        nonce: req.nonce,
        timestamp: req.timestamp,
        signature_b64: req.signature,
        admin_token: req.admin_token,
    };

    let now = chrono::Utc::now().timestamp();
    let bearer_token = state.auth.register(domain_req, now, remote.clone()).await.map_err(auth_err)?;

    audit_access(&state, Some(agent_id.clone()), "/api/clients/register", "POST", 200, remote);
    Ok(Json(RegisterResponse { agent_id, bearer_token }))
}

async fn verify(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    let agent_id = require_agent(&identity)?;

    let agent = state
        .store
        .get_agent(&agent_id)
        .await
        .map_err(storage_err)?
        .ok_or_else(|| ApiError::not_found("agent not found"))?;

    audit_access(&state, Some(agent_id), "/api/client/verify", "GET", 200, remote);
    Ok(Json(VerifyResponse { agent_id: agent.agent_id, hostname: agent.hostname, last_seen: agent.last_seen }))
}

async fn ingest_metrics(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(batch): Json<MetricBatch>,
) -> Result<Json<IngestResult>, ApiError> {
    let remote = Some(addr.ip().to_string());
    check_rate_limit(&state, addr.ip(), "/api/metrics")?;
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    let agent_id = require_agent(&identity)?;

    let now = chrono::Utc::now().timestamp();
    let result = state.ingestion.ingest_batch(&agent_id, batch, now).await.map_err(ingestion_err)?;

    audit_access(&state, Some(agent_id), "/api/metrics", "POST", 200, remote);
    Ok(Json(result))
}

async fn ingest_logs(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(batch): Json<LogBatch>,
) -> Result<Json<u64>, ApiError> {
    let remote = Some(addr.ip().to_string());
    check_rate_limit(&state, addr.ip(), "/api/logs")?;
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    let agent_id = require_agent(&identity)?;

    let inserted = state.logs.ingest_batch(&agent_id, batch).await.map_err(log_ingestion_err)?;

    audit_access(&state, Some(agent_id), "/api/logs", "POST", 200, remote);
    Ok(Json(inserted))
}

#[derive(Debug, Deserialize)]
struct PollQuery {
    #[serde(default)]
    wait_sec: u64,
}

/// Long-polls: blocks up to `wait_sec` (capped at 30) for a pending
/// command to appear, returning early the moment one does.
async fn poll_commands(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(agent_id): Path<String>,
    Query(q): Query<PollQuery>,
) -> Result<Json<Vec<PendingCommand>>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_self_or_admin(&identity, &agent_id)?;

    let wait = Duration::from_secs(q.wait_sec.min(30));
    let deadline = tokio::time::Instant::now() + wait;

    loop {
        let now = chrono::Utc::now().timestamp();
        let pending = state.commands.poll_pending(&agent_id, now).await.map_err(command_err)?;
        if !pending.is_empty() || tokio::time::Instant::now() >= deadline {
            audit_access(&state, Some(agent_id.clone()), "/api/commands", "GET", 200, remote);
            return Ok(Json(pending));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn submit_command_result(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(result): Json<CommandResultRequest>,
) -> Result<StatusCode, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    let agent_id = require_agent(&identity)?;

    state.commands.submit_result(&agent_id, result).await.map_err(command_err)?;

    audit_access(&state, Some(agent_id), "/api/command-results", "POST", 204, remote);
    Ok(StatusCode::NO_CONTENT)
}

async fn enqueue_command(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<EnqueueCommandRequest>,
) -> Result<Json<EnqueueCommandResponse>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    let now = chrono::Utc::now().timestamp();
    let command_id = state.commands.enqueue(&req.agent_id, req.command, now).await.map_err(command_err)?;
    let _ = state.audit.log_admin_action("enqueue_command", &req.agent_id, remote.clone());

    audit_access(&state, None, "/api/commands", "POST", 200, remote);
    Ok(Json(EnqueueCommandResponse { command_id, status: "pending".to_string() }))
}

/// Agent summary exposed over the admin listing endpoint — deliberately
/// omits `bearer_token`/`public_key_pem` (spec §7 "never log or expose
/// full secrets").
#[derive(Debug, Serialize)]
struct AgentSummary {
    agent_id: String,
    hostname: String,
    registered_at: i64,
    last_seen: i64,
    revoked: bool,
}

impl From<rackwatch_storage::Agent> for AgentSummary {
    fn from(a: rackwatch_storage::Agent) -> Self {
        Self { agent_id: a.agent_id, hostname: a.hostname, registered_at: a.registered_at, last_seen: a.last_seen, revoked: a.revoked }
    }
}

async fn list_clients(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<Vec<AgentSummary>>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    let agents = state.store.list_agents().await.map_err(storage_err)?;

    audit_access(&state, None, "/api/clients", "GET", 200, remote);
    Ok(Json(agents.into_iter().map(AgentSummary::from).collect()))
}

fn parse_aggregation(raw: Option<&str>) -> Result<Aggregation, ApiError> {
    match raw {
        None | Some("none") => Ok(Aggregation::None),
        Some("max") => Ok(Aggregation::Max),
        Some("min") => Ok(Aggregation::Min),
        Some("avg") => Ok(Aggregation::Avg),
        Some("sum") => Ok(Aggregation::Sum),
        Some(other) => Err(ApiError::bad_request(format!("unknown aggregation: {other}"))),
    }
}

fn parse_label_filter(raw: Option<&str>) -> Result<LabelFilter, ApiError> {
    match raw {
        None => Ok(LabelFilter::default()),
        Some(s) => serde_json::from_str(s).map_err(|e| ApiError::bad_request(format!("invalid labels filter: {e}"))),
    }
}

/// `active_only=true` restricts a query to non-revoked agents; combined
/// with an explicit `agent_id` it's the intersection of the two.
async fn resolve_agent_ids(state: &AppState, agent_id: &Option<String>, active_only: bool) -> Result<Option<Vec<String>>, ApiError> {
    if !active_only {
        return Ok(agent_id.clone().map(|id| vec![id]));
    }

    let active: Vec<String> = state.store.list_agents().await.map_err(storage_err)?.into_iter().map(|a| a.agent_id).collect();
    match agent_id {
        Some(id) if active.contains(id) => Ok(Some(vec![id.clone()])),
        Some(_) => Ok(Some(Vec::new())),
        None => Ok(Some(active)),
    }
}

#[derive(Debug, Deserialize)]
struct TimeseriesQuery {
    since_timestamp: i64,
    until_timestamp: i64,
    #[serde(default)]
    step_sec: Option<i64>,
    #[serde(default)]
    aggregation: Option<String>,
    #[serde(default)]
    labels: Option<String>,
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    active_only: bool,
}

async fn timeseries(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(metric_name): Path<String>,
    Query(q): Query<TimeseriesQuery>,
) -> Result<Json<BTreeMap<String, Vec<(i64, f64)>>>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    let aggregation = parse_aggregation(q.aggregation.as_deref())?;
    let label_filter = parse_label_filter(q.labels.as_deref())?;
    let agent_ids = resolve_agent_ids(&state, &q.agent_id, q.active_only).await?;

    let result = state
        .query
        .timeseries(&metric_name, q.since_timestamp, q.until_timestamp, agent_ids.as_deref(), &label_filter, aggregation, q.step_sec)
        .await
        .map_err(query_err)?;

    audit_access(&state, None, "/api/timeseries", "GET", 200, remote);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct RateQuery {
    since_timestamp: i64,
    until_timestamp: i64,
    rate_window_sec: i64,
    #[serde(default)]
    aggregation: Option<String>,
    #[serde(default)]
    labels: Option<String>,
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    active_only: bool,
}

async fn timeseries_rate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(metric_name): Path<String>,
    Query(q): Query<RateQuery>,
) -> Result<Json<BTreeMap<String, Vec<(i64, f64)>>>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    let aggregation = parse_aggregation(q.aggregation.as_deref())?;
    let label_filter = parse_label_filter(q.labels.as_deref())?;
    let agent_ids = resolve_agent_ids(&state, &q.agent_id, q.active_only).await?;

    let result = state
        .query
        .rate(&metric_name, q.since_timestamp, q.until_timestamp, agent_ids.as_deref(), &label_filter, q.rate_window_sec, aggregation)
        .await
        .map_err(query_err)?;

    audit_access(&state, None, "/api/timeseries", "GET", 200, remote);
    Ok(Json(result))
}

async fn stats(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<StorageStats>, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    let stats = state.store.stats().await.map_err(storage_err)?;

    audit_access(&state, None, "/api/stats", "GET", 200, remote);
    Ok(Json(stats))
}

async fn health(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let remote = Some(addr.ip().to_string());
    let identity = authenticate(&state, &headers, remote.clone()).await?;
    require_admin(&identity)?;

    state.store.health_check().await.map_err(storage_err)?;
    Ok(StatusCode::OK)
}

/// Prometheus exposition endpoint, unauthenticated like every `/metrics`
/// scrape target in this workspace's other binaries.
async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus.render()
}
