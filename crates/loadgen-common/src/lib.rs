pub type Result<T> = core::result::Result<T, LoadgenError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadgenError {
    #[error("input out of range (0 <= input <= 100): {0}")]
    InputOutOfRange(i64),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub mod config {
    use serde::Deserialize;
    use std::env;

    /// Defaults for every facet parameter plus the outbound-call knobs.
    /// Loaded once at startup and read-only afterwards.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct LoadTestConfig {
        pub show_config_on_startup: bool,
        pub default_sleep_ms: u64,
        pub default_fib_input: i64,
        pub default_return_size: usize,
        pub default_kilobyte_blocks: usize,
        pub default_remote_url: String,
        pub default_memory_factor: usize,
        pub url_replacement_base: Option<String>,
        pub force_ssl: bool,
        pub forwarded_headers: bool,
        pub propagated_headers: String,
    }

    impl Default for LoadTestConfig {
        fn default() -> Self {
            Self {
                show_config_on_startup: false,
                default_sleep_ms: 10,
                default_fib_input: 35,
                default_return_size: 102_400,
                default_kilobyte_blocks: 1024,
                default_remote_url: "$PROTOCOL$://$HOST$:$PORT$/api/test/fib?input=1".into(),
                default_memory_factor: 16,
                url_replacement_base: None,
                force_ssl: false,
                forwarded_headers: false,
                propagated_headers: "Authorization".into(),
            }
        }
    }

    impl LoadTestConfig {
        pub fn load() -> Self {
            if let Ok(path) = env::var("LOADGEN_CONFIG") {
                let Ok(text) = std::fs::read_to_string(path) else { return Self::default() };
                let Ok(cfg) = serde_yaml::from_str::<LoadTestConfig>(&text) else { return Self::default() };
                return cfg;
            }
            let mut cfg = Self::default();
            if let Some(v) = env_parse("LOADGEN_SHOW_CONFIG") { cfg.show_config_on_startup = v; }
            if let Some(v) = env_parse("LOADGEN_SLEEP_MS") { cfg.default_sleep_ms = v; }
            if let Some(v) = env_parse("LOADGEN_FIB_INPUT") { cfg.default_fib_input = v; }
            if let Some(v) = env_parse("LOADGEN_RETURN_SIZE") { cfg.default_return_size = v; }
            if let Some(v) = env_parse("LOADGEN_KILOBYTE_BLOCKS") { cfg.default_kilobyte_blocks = v; }
            if let Ok(v) = env::var("LOADGEN_REMOTE_URL") { cfg.default_remote_url = v; }
            if let Some(v) = env_parse("LOADGEN_MEMORY_FACTOR") { cfg.default_memory_factor = v; }
            if let Ok(v) = env::var("LOADGEN_URL_REPLACEMENT_BASE") { cfg.url_replacement_base = Some(v); }
            if let Some(v) = env_parse("LOADGEN_FORCE_SSL") { cfg.force_ssl = v; }
            if let Some(v) = env_parse("LOADGEN_FORWARDED_HEADERS") { cfg.forwarded_headers = v; }
            if let Ok(v) = env::var("LOADGEN_PROPAGATED_HEADERS") { cfg.propagated_headers = v; }
            cfg
        }

        /// The comma-separated propagated-header allowlist, trimmed, empties dropped.
        pub fn propagated_header_list(&self) -> Vec<String> {
            self.propagated_headers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
    }

    fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
        env::var(key).ok().and_then(|v| v.parse().ok())
    }

    #[cfg(test)]
    mod tests {
        use super::LoadTestConfig;

        #[test]
        fn defaults_match_the_documented_values() {
            let cfg = LoadTestConfig::default();
            assert_eq!(cfg.default_sleep_ms, 10);
            assert_eq!(cfg.default_fib_input, 35);
            assert_eq!(cfg.default_return_size, 102_400);
            assert_eq!(cfg.default_kilobyte_blocks, 1024);
            assert_eq!(cfg.default_memory_factor, 16);
            assert!(!cfg.force_ssl);
            assert!(cfg.url_replacement_base.is_none());
        }

        #[test]
        fn yaml_overrides_defaults_and_rejects_unknown_keys() {
            let cfg: LoadTestConfig =
                serde_yaml::from_str("default_sleep_ms: 250\nforce_ssl: true\n").unwrap();
            assert_eq!(cfg.default_sleep_ms, 250);
            assert!(cfg.force_ssl);
            assert_eq!(cfg.default_fib_input, 35);

            let err = serde_yaml::from_str::<LoadTestConfig>("no_such_knob: 1\n");
            assert!(err.is_err());
        }

        #[test]
        fn propagated_header_list_is_trimmed_and_filtered() {
            let mut cfg = LoadTestConfig::default();
            assert_eq!(cfg.propagated_header_list(), vec!["Authorization"]);

            cfg.propagated_headers = " Authorization , X-Trace-Id,, ".into();
            assert_eq!(cfg.propagated_header_list(), vec!["Authorization", "X-Trace-Id"]);

            cfg.propagated_headers = "  ".into();
            assert!(cfg.propagated_header_list().is_empty());
        }
    }
}
