use std::{fs, path::Path};

use serde::Deserialize;
use shared::domain::FeedSource;

pub const CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub session_cookie: Option<String>,
    pub extended_form: bool,
    pub feed_source: FeedSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            session_cookie: None,
            extended_form: true,
            feed_source: FeedSource::Receiver,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    session_cookie: Option<String>,
    extended_form: Option<bool>,
    feed_source: Option<String>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the config file, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => tracing::warn!(path = %path.display(), "ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SESSION_COOKIE") {
        settings.session_cookie = Some(v);
    }
    if let Some(v) = env("APP__EXTENDED_FORM") {
        if let Some(parsed) = parse_flag(&v) {
            settings.extended_form = parsed;
        }
    }
    if let Some(v) = env("APP__FEED_SOURCE") {
        if let Some(parsed) = parse_feed_source(&v) {
            settings.feed_source = parsed;
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.session_cookie {
        settings.session_cookie = Some(v);
    }
    if let Some(v) = file_cfg.extended_form {
        settings.extended_form = v;
    }
    if let Some(source) = file_cfg.feed_source.as_deref().and_then(parse_feed_source) {
        settings.feed_source = source;
    }
}

pub fn parse_feed_source(raw: &str) -> Option<FeedSource> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "receiver" => Some(FeedSource::Receiver),
        "provider" => Some(FeedSource::Provider { history: false }),
        "provider-history" | "provider_history" => Some(FeedSource::Provider { history: true }),
        _ => None,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
