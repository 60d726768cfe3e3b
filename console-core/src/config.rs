//! Runtime settings for the console.
//!
//! Values come from a key lookup so the browser build can feed them from
//! `option_env!` while tests pass a closure over a map.

pub const ENV_BACKEND_URL: &str = "CONSOLE_BACKEND_URL";
pub const ENV_LOG_LIMIT: &str = "CONSOLE_LOG_LIMIT";
pub const ENV_SPEECH_LANG: &str = "CONSOLE_SPEECH_LANG";
pub const ENV_LOG_LEVEL: &str = "CONSOLE_LOG_LEVEL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_LIMIT: u32 = 100;
pub const LOG_LIMIT_CHOICES: [u32; 3] = [50, 100, 200];
pub const DEFAULT_SPEECH_LANG: &str = "en-US";
pub const DEFAULT_PROGRESS_TICK_MS: u32 = 450;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub log_limit: u32,
    pub speech_lang: String,
    pub progress_tick_ms: u32,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.into(),
            log_limit: DEFAULT_LOG_LIMIT,
            speech_lang: DEFAULT_SPEECH_LANG.into(),
            progress_tick_ms: DEFAULT_PROGRESS_TICK_MS,
            log_level: "info".into(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            base_url: non_empty(ENV_BACKEND_URL)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            log_limit: non_empty(ENV_LOG_LIMIT)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| (1..=500).contains(v))
                .unwrap_or(defaults.log_limit),
            speech_lang: non_empty(ENV_SPEECH_LANG).unwrap_or(defaults.speech_lang),
            progress_tick_ms: defaults.progress_tick_ms,
            log_level: non_empty(ENV_LOG_LEVEL)
                .map(|v| v.to_ascii_lowercase())
                .filter(|v| matches!(v.as_str(), "trace" | "debug" | "info" | "warn" | "error"))
                .unwrap_or(defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn falls_back_to_defaults() {
        let cfg = ConsoleConfig::from_lookup(|_| None);
        assert_eq!(cfg, ConsoleConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND_URL, "https://engine.example/ "),
            (ENV_LOG_LIMIT, "9000"),
            (ENV_SPEECH_LANG, "de-DE"),
            (ENV_LOG_LEVEL, "DEBUG"),
        ]);
        let cfg = ConsoleConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.base_url, "https://engine.example");
        assert_eq!(cfg.log_limit, DEFAULT_LOG_LIMIT);
        assert_eq!(cfg.speech_lang, "de-DE");
        assert_eq!(cfg.log_level, "debug");
    }
}
