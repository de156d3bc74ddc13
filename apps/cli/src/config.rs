use std::{collections::HashMap, fs, time::Duration};

use client_core::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

pub const SETTINGS_FILE: &str = "contacts.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub search_snapshot_ttl_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            search_snapshot_ttl_ms: 1000,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_snapshot_ttl(&self) -> Duration {
        Duration::from_millis(self.search_snapshot_ttl_ms)
    }
}

/// Defaults, then `contacts.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Flat `key = value` pairs. Numbers may be written bare or quoted; a value
/// that does not parse leaves that key at its previous setting.
fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };
    let get = |key: &str| {
        file_cfg.get(key).map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };

    if let Some(v) = get("api_base_url") {
        settings.api_base_url = v;
    }
    if let Some(v) = get("request_timeout_secs") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = get("search_snapshot_ttl_ms") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.search_snapshot_ttl_ms = parsed;
        }
    }
    if let Some(v) = get("log_filter") {
        settings.log_filter = v;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CONTACTS_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = var("APP__SEARCH_SNAPSHOT_TTL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.search_snapshot_ttl_ms = parsed;
        }
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            r#"
                api_base_url = "http://contacts.internal:8080"
                request_timeout_secs = 3
                log_filter = "debug"
            "#,
        );
        assert_eq!(settings.api_base_url, "http://contacts.internal:8080");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.search_snapshot_ttl_ms, 1000);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn bad_number_is_skipped_and_other_keys_still_apply() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            r#"
                api_base_url = "http://contacts.internal:8080"
                request_timeout_secs = "soon"
                search_snapshot_ttl_ms = "250"
            "#,
        );
        assert_eq!(settings.api_base_url, "http://contacts.internal:8080");
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.search_snapshot_ttl(), Duration::from_millis(250));
    }

    #[test]
    fn unparsable_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "api_base_url = ");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn prefixed_env_wins_and_bad_numbers_are_skipped() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONTACTS_API_URL", "http://a.example"),
            ("APP__API_BASE_URL", "http://b.example"),
            ("APP__REQUEST_TIMEOUT_SECS", "never"),
            ("APP__SEARCH_SNAPSHOT_TTL_MS", "0"),
        ]);
        let mut settings = Settings::default();
        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_base_url, "http://b.example");
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.search_snapshot_ttl(), Duration::ZERO);
    }
}
