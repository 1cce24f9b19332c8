use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use axum::body::Body;
use axum::extract::{Host, OriginalUri, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::classify;
use crate::config::SiteConfig;
use crate::enrich;
use crate::page;
use crate::stream::StreamDescriptor;

pub const ALLOWED_METHODS: &str = "OPTIONS, GET, HEAD";

/// Set by clients that have the companion extension installed. Presence is
/// the capability signal; the value is ignored.
pub const CAPABILITY_HEADER: &str = "x-has-extension";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: SiteConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build outbound http client")?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

pub async fn run(args: crate::cli::ServeArgs) -> anyhow::Result<()> {
    let config = SiteConfig::from_env().context("load site config")?;
    let state = AppState::new(config)?;
    let app = build_router(state, &args.web_dir);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "install ctrl-c handler");
    }
}

pub fn build_router(state: AppState, web_dir: &Path) -> Router {
    let mut app = Router::new();
    if web_dir.is_dir() {
        app = app
            .nest_service("/assets", ServeDir::new(web_dir))
            .route_service("/favicon.ico", ServeFile::new(web_dir.join("favicon.ico")));
    }

    app.fallback(viewer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn viewer(
    State(state): State<AppState>,
    method: Method,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    if method == Method::OPTIONS {
        return allow_response(StatusCode::NO_CONTENT, Body::empty());
    }
    if method != Method::GET && method != Method::HEAD {
        return allow_response(
            StatusCode::METHOD_NOT_ALLOWED,
            Body::from("method not allowed"),
        );
    }

    let has_capability = headers.contains_key(CAPABILITY_HEADER);
    let host = hostname(&host);

    let descriptors = classify::build_descriptors(
        &state.config,
        &state.client,
        uri.path(),
        host,
        has_capability,
    )
    .await;
    tracing::debug!(path = uri.path(), count = descriptors.len(), "classified path");

    let nonce = page::nonce();
    let csp = content_security_policy(&descriptors, &nonce);
    let streaming = method == Method::GET && enrich::needs_streaming(&descriptors);

    let body = if method == Method::HEAD {
        // Same headers as GET, no body, no enrichment I/O.
        Body::empty()
    } else {
        let shell = page::render_shell(&descriptors, has_capability, &nonce);
        if streaming {
            let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(8);
            // The shell goes into the channel before the response is
            // returned, so the first byte never waits on enrichment.
            let _ = tx.try_send(Ok(Bytes::from(shell)));
            let state = state.clone();
            tokio::spawn(emit_fragments(state, descriptors, nonce, tx));
            Body::from_stream(ReceiverStream::new(rx))
        } else {
            Body::from(format!("{shell}{}", page::HTML_END))
        }
    };

    let mut response = Response::new(body);
    let response_headers = response.headers_mut();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    match HeaderValue::from_str(&csp) {
        Ok(value) => {
            response_headers.insert(header::CONTENT_SECURITY_POLICY, value);
        }
        Err(err) => tracing::warn!(?err, "content-security-policy value rejected"),
    }
    response_headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    response_headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if streaming {
        // Intermediaries must not buffer the shell while fragments trickle.
        response_headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    }

    response
}

/// Walk descriptors in list order, awaiting each name lookup before moving to
/// the next so fragments reach the stream in ascending index order, then
/// write the closing tail and let the channel close.
///
/// The receiver side going away is the cancellation signal: it is observed
/// before every lookup and at every write, and the walk stops there.
async fn emit_fragments(
    state: AppState,
    descriptors: Vec<StreamDescriptor>,
    nonce: String,
    tx: mpsc::Sender<Result<Bytes, Infallible>>,
) {
    for (index, descriptor) in descriptors.iter().enumerate() {
        if tx.is_closed() {
            tracing::debug!(index, "response cancelled before name lookup");
            return;
        }
        let Some(name) = enrich::fetch_name(&state.config, &state.client, descriptor).await else {
            continue;
        };
        let fragment = page::render_fragment(index, &name, &nonce);
        if tx.send(Ok(Bytes::from(fragment))).await.is_err() {
            tracing::debug!(index, "response cancelled mid-enrichment");
            return;
        }
    }

    let _ = tx.send(Ok(Bytes::from(page::HTML_END))).await;
}

fn allow_response(status: StatusCode, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// frame-src is pinned to exactly the origins of the platforms present in
/// this response; script/style execution is pinned to the response nonce.
fn content_security_policy(descriptors: &[StreamDescriptor], nonce: &str) -> String {
    let mut frame_sources = vec!["'self'".to_string()];
    for descriptor in descriptors {
        for origin in descriptor.platform.frame_origins() {
            if !frame_sources.iter().any(|o| o == origin) {
                frame_sources.push((*origin).to_string());
            }
        }
    }

    format!(
        "base-uri 'self'; default-src 'self'; script-src 'nonce-{nonce}'; style-src 'nonce-{nonce}'; frame-src {}; object-src 'none'",
        frame_sources.join(" ")
    )
}

fn hostname(host: &str) -> &str {
    let host = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };
    // IPv6 authorities keep their brackets in the Host header; the bare
    // address is what belongs in embed parent parameters.
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}
