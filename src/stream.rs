/// The closed set of supported platforms, in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Chzzk,
    Twitch,
    Soop,
    YouTube,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::Chzzk => "chzzk",
            Platform::Twitch => "twitch",
            Platform::Soop => "soop",
            Platform::YouTube => "youtube",
        }
    }

    /// Origins the platform's player and chat embeds load from, as listed in
    /// the frame-src CSP directive.
    pub fn frame_origins(self) -> &'static [&'static str] {
        match self {
            Platform::Chzzk => &["chzzk.naver.com", "*.chzzk.naver.com"],
            Platform::Twitch => &["*.twitch.tv"],
            Platform::Soop => &["*.sooplive.co.kr"],
            Platform::YouTube => &["www.youtube.com"],
        }
    }

    /// Whether a display-name fragment may still be produced for this
    /// platform after the shell has been sent.
    pub fn enrichable(self) -> bool {
        matches!(self, Platform::Chzzk | Platform::YouTube)
    }
}

/// One recognized stream: the normalized result of classifying a path
/// segment. Created once per request and never mutated afterwards; late
/// display names are emitted as body fragments instead of written back.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub platform: Platform,
    /// Canonical identifier on the platform (lower-cased where the platform
    /// is case-insensitive, routing prefixes stripped).
    pub id: String,
    /// Display name when already known. Not safe for raw HTML embedding.
    pub name: Option<String>,
    pub player: String,
    pub chat: String,
    /// True when chat (and some player features) only work with the
    /// companion extension installed on the client.
    pub requires_capability: bool,
}

impl StreamDescriptor {
    pub fn chzzk(id: String) -> Self {
        let player = format!("https://chzzk.naver.com/live/{id}");
        let chat = format!("https://chzzk.naver.com/live/{id}/chat");
        Self {
            platform: Platform::Chzzk,
            id,
            name: None,
            player,
            chat,
            requires_capability: false,
        }
    }

    pub fn twitch(id: String, host: &str) -> Self {
        let player = format!("https://player.twitch.tv/?channel={id}&parent={host}");
        let chat = format!("https://www.twitch.tv/embed/{id}/chat?darkpopout&parent={host}");
        Self {
            platform: Platform::Twitch,
            id,
            name: None,
            player,
            chat,
            requires_capability: false,
        }
    }

    pub fn soop(id: String, has_capability: bool) -> Self {
        let show_chat = if has_capability { "?showChat=true" } else { "" };
        let player = format!("https://play.sooplive.co.kr/{id}/direct{show_chat}");
        let chat = format!("https://play.sooplive.co.kr/{id}?vtype=chat");
        Self {
            platform: Platform::Soop,
            id,
            name: None,
            player,
            chat,
            requires_capability: true,
        }
    }

    pub fn youtube(id: String, name: Option<String>, host: &str) -> Self {
        let player = format!("https://www.youtube.com/embed/{id}?autoplay=1");
        let chat = format!("https://www.youtube.com/live_chat?v={id}&embed_domain={host}&dark_theme=1");
        Self {
            platform: Platform::YouTube,
            id,
            name,
            player,
            chat,
            requires_capability: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chzzk_urls_derive_from_id_only() {
        let s = StreamDescriptor::chzzk("abcdef1234567890abcdef1234567890".to_string());
        assert_eq!(
            s.player,
            "https://chzzk.naver.com/live/abcdef1234567890abcdef1234567890"
        );
        assert_eq!(
            s.chat,
            "https://chzzk.naver.com/live/abcdef1234567890abcdef1234567890/chat"
        );
        assert!(!s.requires_capability);
    }

    #[test]
    fn twitch_urls_embed_the_request_host_as_parent() {
        let s = StreamDescriptor::twitch("someone".to_string(), "multi.example");
        assert_eq!(
            s.player,
            "https://player.twitch.tv/?channel=someone&parent=multi.example"
        );
        assert!(s.chat.contains("parent=multi.example"));
    }

    #[test]
    fn soop_player_gains_chat_param_only_with_capability() {
        let plain = StreamDescriptor::soop("abc123".to_string(), false);
        assert_eq!(plain.player, "https://play.sooplive.co.kr/abc123/direct");
        assert!(plain.requires_capability);

        let with = StreamDescriptor::soop("abc123".to_string(), true);
        assert_eq!(
            with.player,
            "https://play.sooplive.co.kr/abc123/direct?showChat=true"
        );
    }
}
