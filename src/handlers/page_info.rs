use std::net::IpAddr;

use axum::extract::{Query, State};
use axum::Json;
use reqwest::header::LOCATION;
use reqwest::Response;
use tracing::info;
use url::Url;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extractor::{extract_page_record, snapshot_from_html};
use crate::models::{ExtractHtmlRequest, PageInfoDto, PageInfoQuery, PageRecord};
use crate::state::AppState;

pub const MAX_REDIRECTS: usize = 10;

// ── Public helpers ─────────────────────────────────────────────────────────

/// Returns `true` if `ip` is a private, loopback, or link-local address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}

/// Parse `raw` and require an http(s) URL with a host.
pub fn parse_page_url(raw: &str) -> AppResult<Url> {
    let parsed = Url::parse(raw).map_err(|_| AppError::Validation("Invalid URL".into()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(AppError::Validation(
                "Only http/https URLs are supported".into(),
            ))
        }
    }

    if parsed.host_str().is_none() {
        return Err(AppError::Validation("URL has no host".into()));
    }

    Ok(parsed)
}

/// Resolve the URL's host and reject it if any address is private.
async fn ensure_public_host(url: &Url) -> AppResult<()> {
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Validation("URL has no host".into()))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let addrs = tokio::net::lookup_host((host.trim_matches(|c| c == '[' || c == ']'), port))
        .await
        .map_err(|_| AppError::Validation("Could not resolve URL host".into()))?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(AppError::Validation(
                "URL resolves to a private or reserved address".into(),
            ));
        }
    }

    Ok(())
}

/// Fetch `start`, following at most [`MAX_REDIRECTS`] redirects. Every hop
/// after the first is re-validated and its host re-checked, so a public page
/// cannot bounce the fetch onto a private address.
async fn fetch_page(state: &AppState, start: Url) -> AppResult<PageRecord> {
    let mut url = start;
    let mut redirects = 0;

    let response = loop {
        let response = state.http_client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %url, "Failed to fetch page");
            AppError::Fetch("Failed to fetch URL".into())
        })?;

        if !response.status().is_redirection() {
            break response;
        }

        redirects += 1;
        if redirects > MAX_REDIRECTS {
            return Err(AppError::Fetch("Too many redirects".into()));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Fetch("Redirect without a Location header".into()))?;
        let next = url
            .join(location)
            .map_err(|_| AppError::Fetch("Invalid redirect location".into()))?;
        let next = parse_page_url(next.as_str())?;
        ensure_public_host(&next).await?;

        tracing::debug!(from = %url, to = %next, "Following redirect");
        url = next;
    };

    if !response.status().is_success() {
        tracing::warn!(status = %response.status(), url = %url, "Page returned error status");
        return Err(AppError::Fetch(format!(
            "Page returned status {}",
            response.status().as_u16()
        )));
    }

    let html = read_body(response, state.max_page_bytes).await?;

    // The record reports where the page actually lives, after redirects.
    Ok(extract_page_record(&snapshot_from_html(&html, url.as_str())))
}

/// Read at most `limit` bytes of body, failing as soon as the limit is
/// exceeded rather than buffering the rest.
async fn read_body(mut response: Response, limit: usize) -> AppResult<String> {
    let too_large = || AppError::Fetch(format!("Page is larger than {limit} bytes"));

    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| {
        tracing::warn!(error = ?e, "Failed to read page body");
        AppError::Fetch("Failed to read page body".into())
    })? {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /page-info?url=<encoded-url>
///
/// Fetches the page and returns its extracted metadata, cached per URL for
/// the configured TTL. Rejects private/loopback hosts (SSRF protection).
pub async fn get_page_info(
    State(state): State<AppState>,
    Query(params): Query<PageInfoQuery>,
) -> AppResult<Json<PageInfoDto>> {
    let url = parse_page_url(&params.url)?;
    ensure_public_host(&url).await?;

    let key = url.to_string();
    if let Some(record) = state.cached_page(&key) {
        return Ok(Json(record.into()));
    }

    let record = fetch_page(&state, url).await?;
    info!(url = %key, og = record.og.len(), meta = record.meta.len(), "Extracted page info");
    state.cache_page(key, record.clone());

    Ok(Json(record.into()))
}

/// POST /page-info
///
/// Extracts metadata from caller-supplied HTML. Nothing is fetched.
pub async fn extract_page_info(
    Json(req): Json<ExtractHtmlRequest>,
) -> AppResult<Json<PageInfoDto>> {
    req.validate()?;

    let record = extract_page_record(&snapshot_from_html(&req.html, &req.url));
    info!(url = %req.url, og = record.og.len(), meta = record.meta.len(), "Extracted page info from HTML");

    Ok(Json(record.into()))
}

// ── Unit tests ─────────────────────────────────────────────────────────────
