//! HTTP front-end: locale-routing middleware, localized pages, and a small
//! health endpoint.
//!
//! The middleware runs the locale resolver on every request. Requests whose
//! path lacks a locale prefix are redirected; localized requests carry a
//! [`RequestContext`] extension into the handlers, which bind a fresh
//! translator for that locale.

mod pages;


use axum::{
    extract::{Path, Request, State},
    http::{header::ACCEPT_LANGUAGE, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use parlance_core::config::Config;
use parlance_core::locale::{LocaleResolver, RequestContext, Resolution};
use parlance_core::translation::{Catalog, Translator};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use pages::{LanguageLink, PageContext};

/// Shared state for handlers. Everything behind it is read-only.
#[derive(Clone)]
pub struct SiteState {
    resolver: Arc<LocaleResolver>,
    catalog: Arc<Catalog>,
    site_name: Arc<str>,
    uptime: Instant,
}

impl SiteState {
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        Self {
            resolver: Arc::new(LocaleResolver::new(&config.i18n, &config.server)),
            catalog: Arc::new(catalog),
            site_name: Arc::from(config.site.name.as_str()),
            uptime: Instant::now(),
        }
    }

    /// Everything a page needs to render in `locale` at `path`.
    fn page(&self, locale: &str, path: &str) -> (Translator, Vec<LanguageLink>) {
        let t = self.catalog.translator(locale, None);
        let links = self
            .resolver
            .locales()
            .iter()
            .map(|code| LanguageLink {
                label: self
                    .catalog
                    .translator(code, None)
                    .t("language.name")
                    .to_string(),
                href: self.resolver.switch_path(path, code),
                active: code == t.locale(),
                code: code.clone(),
            })
            .collect();
        (t, links)
    }

    fn is_supported(&self, locale: &str) -> bool {
        self.resolver.locales().iter().any(|l| l == locale)
    }
}

/// Runs the locale resolver ahead of every route.
async fn locale_routing(State(state): State<SiteState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    match state
        .resolver
        .resolve(&path, req.uri().query(), accept_language)
    {
        Resolution::Bypass => next.run(req).await,
        Resolution::Localized(locale) => {
            if let Some(location) = without_trailing_slash(&path, req.uri().query()) {
                debug!("trailing slash {path} -> {location}");
                return Redirect::permanent(&location).into_response();
            }
            let ctx = RequestContext {
                path,
                locale: locale.to_string(),
            };
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Resolution::Redirect { locale, location } => {
            debug!("locale redirect {path} -> {location} ({locale})");
            Redirect::temporary(&location).into_response()
        }
    }
}

/// `/fr/about/` becomes `/fr/about`, keeping the query. `None` when `path`
/// has no trailing slash.
fn without_trailing_slash(path: &str, query: Option<&str>) -> Option<String> {
    if path.len() < 2 || !path.ends_with('/') {
        return None;
    }
    let mut location = path.trim_end_matches('/').to_string();
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    Some(location)
}

/// `GET /{lang}`: home page.
async fn home(State(state): State<SiteState>, Path(lang): Path<String>) -> Response {
    if !state.is_supported(&lang) {
        return not_found_page(&state, None);
    }
    let path = format!("/{lang}");
    let (t, links) = state.page(&lang, &path);
    let ctx = PageContext {
        t: &t,
        site_name: &state.site_name,
        languages: &links,
    };
    Html(pages::home(&ctx)).into_response()
}

/// `GET /{lang}/about`: about page.
async fn about(State(state): State<SiteState>, Path(lang): Path<String>) -> Response {
    if !state.is_supported(&lang) {
        return not_found_page(&state, None);
    }
    let path = format!("/{lang}/about");
    let (t, links) = state.page(&lang, &path);
    let ctx = PageContext {
        t: &t,
        site_name: &state.site_name,
        languages: &links,
    };
    Html(pages::about(&ctx)).into_response()
}

/// `GET {api_prefix}/health`: liveness plus the active locale setup.
async fn health(State(state): State<SiteState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "default_locale": state.resolver.default_locale(),
        "locales": state.resolver.locales(),
    }))
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<SiteState>, req: Request) -> Response {
    not_found_page(&state, req.extensions().get::<RequestContext>())
}

/// Localized 404. Uses the request's locale when it was resolved, else the
/// default locale.
fn not_found_page(state: &SiteState, ctx: Option<&RequestContext>) -> Response {
    let (locale, path) = match ctx {
        Some(ctx) => (ctx.locale.as_str(), ctx.path.as_str()),
        None => (state.resolver.default_locale(), "/"),
    };
    let (t, links) = state.page(locale, path);
    let page = PageContext {
        t: &t,
        site_name: &state.site_name,
        languages: &links,
    };
    (StatusCode::NOT_FOUND, Html(pages::not_found(&page))).into_response()
}

/// Build the axum router with shared state.
pub fn build_router(config: &Config, state: SiteState) -> Router {
    let health_path = format!("{}/health", config.server.api_prefix);
    Router::new()
        .route("/{lang}", get(home))
        .route("/{lang}/about", get(about))
        .route(&health_path, get(health))
        .route(&config.server.favicon_path, get(favicon))
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), locale_routing))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config, catalog: Catalog) -> anyhow::Result<()> {
    let state = SiteState::new(config, catalog);
    let app = build_router(config, state);
    let addr = config.server.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!(
        "{} listening on http://{addr} (locales: {})",
        config.site.name,
        config.i18n.locales.join(", ")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
