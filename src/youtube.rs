use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;

use crate::config::SiteConfig;

static CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[A-Za-z0-9_-]{22}$").expect("channel id pattern"));
static HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z0-9_.%-]{3,270}$").expect("handle pattern"));
static CUSTOM_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,100}$").expect("custom slug pattern"));

static CANONICAL_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="canonical" href="[^"]*[?&]v=([A-Za-z0-9_-]{11})""#)
        .expect("canonical link pattern")
});
static AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""author":"([^"]+)""#).expect("author pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub video_id: String,
    /// Channel display name, when the live page happened to carry one.
    pub name: Option<String>,
}

/// Map a channel reference onto its live-page path, or reject it. Accepted
/// forms: internal channel id (`UC...`), `@handle`, or a short custom slug.
fn live_page_path(raw: &str) -> Option<String> {
    if CHANNEL_ID.is_match(raw) {
        Some(format!("channel/{raw}/live"))
    } else if HANDLE.is_match(raw) {
        Some(format!("{raw}/live"))
    } else if CUSTOM_SLUG.is_match(raw) {
        Some(format!("c/{raw}/live"))
    } else {
        None
    }
}

/// Resolve a channel reference to the canonical id of its current live video
/// by scraping the channel's live page. Every failure mode — bad reference,
/// transport error, non-success status, missing canonical marker — collapses
/// to `None`; the caller drops the segment either way.
pub async fn resolve_channel(
    config: &SiteConfig,
    client: &Client,
    raw: &str,
) -> Option<ResolvedChannel> {
    let path = live_page_path(raw)?;
    let url = config.youtube_base.join(&path).ok()?;

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(%url, ?err, "live page fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        // Dropped unread so the connection is reclaimed promptly.
        return None;
    }

    let html = match response.text().await {
        Ok(html) => html,
        Err(err) => {
            tracing::debug!(%url, ?err, "live page body read failed");
            return None;
        }
    };

    let video_id = CANONICAL_VIDEO.captures(&html)?.get(1)?.as_str().to_string();
    // The name marker is independent of the id marker; missing is fine.
    let name = AUTHOR
        .captures(&html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string());

    Some(ResolvedChannel { video_id, name })
}
