use reqwest::Client;
use serde::Deserialize;

use crate::config::SiteConfig;
use crate::stream::{Platform, StreamDescriptor};

#[derive(Debug, Deserialize)]
struct ChzzkChannelResponse {
    code: i64,
    content: Option<ChzzkChannelContent>,
}

#[derive(Debug, Deserialize)]
struct ChzzkChannelContent {
    #[serde(rename = "channelName")]
    channel_name: Option<String>,
}

/// Best-effort display-name lookup for one descriptor.
///
/// A name carried since classification (the indirect resolver fills it in) is
/// returned without any I/O. Otherwise a single metadata request is issued
/// for platforms that have one. Every failure mode collapses to `None`;
/// enrichment never fails the request it runs under.
pub async fn fetch_name(
    config: &SiteConfig,
    client: &Client,
    descriptor: &StreamDescriptor,
) -> Option<String> {
    if let Some(name) = &descriptor.name {
        return Some(name.clone());
    }

    match descriptor.platform {
        Platform::Chzzk => fetch_chzzk_name(config, client, &descriptor.id).await,
        Platform::Twitch | Platform::Soop | Platform::YouTube => None,
    }
}

async fn fetch_chzzk_name(config: &SiteConfig, client: &Client, id: &str) -> Option<String> {
    let url = config
        .chzzk_api_base
        .join(&format!("service/v1/channels/{id}"))
        .ok()?;

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(%url, ?err, "channel metadata fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        // Dropped unread so the connection is reclaimed promptly.
        return None;
    }

    let payload: ChzzkChannelResponse = match response.json().await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(%url, ?err, "channel metadata parse failed");
            return None;
        }
    };
    if payload.code != 200 {
        return None;
    }
    payload.content.and_then(|content| content.channel_name)
}

/// True when any descriptor can still gain a name after the shell is sent;
/// governs whether the response takes the streaming path at all.
pub fn needs_streaming(descriptors: &[StreamDescriptor]) -> bool {
    descriptors.iter().any(|d| d.platform.enrichable())
}
