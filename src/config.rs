use anyhow::Context as _;
use url::Url;

const DEFAULT_YOUTUBE_BASE: &str = "https://www.youtube.com";
const DEFAULT_CHZZK_API_BASE: &str = "https://api.chzzk.naver.com";

/// Outbound endpoint table, fixed at startup. One deployment uses one table;
/// tests construct their own pointing at stub servers.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL for YouTube live-page scraping (indirect channel resolution).
    pub youtube_base: Url,
    /// Base URL for the chzzk channel metadata API (name enrichment).
    pub chzzk_api_base: Url,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            youtube_base: Url::parse(DEFAULT_YOUTUBE_BASE).expect("default youtube base url"),
            chzzk_api_base: Url::parse(DEFAULT_CHZZK_API_BASE).expect("default chzzk api base url"),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(base) = env_url("MULTIVIEW_YOUTUBE_BASE")? {
            config.youtube_base = base;
        }
        if let Some(base) = env_url("MULTIVIEW_CHZZK_API_BASE")? {
            config.chzzk_api_base = base;
        }
        Ok(config)
    }
}

fn env_url(key: &str) -> anyhow::Result<Option<Url>> {
    let Some(raw) = std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    let url = Url::parse(&raw).with_context(|| format!("parse {key}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{key} must be http/https: {url}");
    }
    Ok(Some(url))
}
