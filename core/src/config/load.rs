use std::path::Path;

use crate::error::ConfigError;

use super::types::AppConfig;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_API_BASE: &str = "TELEGRAM_API_BASE";
pub const ENV_SKIP: &str = "APPROVAL_GATE_SKIP";

pub fn load_default() -> anyhow::Result<AppConfig> {
    let cfg = load_from(Path::new("config.toml"), |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// Reads `path` when it exists, then layers env overrides from `lookup` on top.
/// Blank env values are ignored.
pub fn load_from<F>(path: &Path, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg: AppConfig = if path.exists() {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str::<AppConfig>(&s).map_err(ConfigError::Parse)?
    } else {
        AppConfig::default()
    };

    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_blank(ENV_BOT_TOKEN) {
        cfg.telegram.bot_token = v.trim().to_string();
    }
    if let Some(v) = non_blank(ENV_CHAT_ID) {
        cfg.telegram.chat_id = v.trim().to_string();
    }
    if let Some(v) = non_blank(ENV_API_BASE) {
        cfg.telegram.api_base = v.trim().to_string();
    }
    if let Some(v) = non_blank(ENV_SKIP) {
        if is_truthy(&v) {
            cfg.gate.skip = true;
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_and_env_yields_unconfigured_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("config.toml"), env(&[])).unwrap();

        assert!(!cfg.telegram.is_configured());
        assert!(!cfg.gate.skip);
        assert_eq!(cfg.gate.default_timeout_secs, 1800);
        assert_eq!(cfg.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn env_credentials_configure_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(
            &dir.path().join("config.toml"),
            env(&[(ENV_BOT_TOKEN, " 123:abc "), (ENV_CHAT_ID, "-10042")]),
        )
        .unwrap();

        assert!(cfg.telegram.is_configured());
        assert_eq!(cfg.telegram.bot_token, "123:abc");
        assert_eq!(cfg.telegram.chat_id, "-10042");
    }

    #[test]
    fn blank_credentials_are_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(
            &dir.path().join("config.toml"),
            env(&[(ENV_BOT_TOKEN, "   "), (ENV_CHAT_ID, "-10042")]),
        )
        .unwrap();
        assert!(!cfg.telegram.is_configured());

        let mut cfg = cfg;
        cfg.telegram.bot_token = "tok".to_string();
        cfg.telegram.chat_id = " \t".to_string();
        assert!(!cfg.telegram.is_configured());
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[telegram]
bot_token = "from-file"
chat_id = "1"

[gate]
poll_timeout_secs = 2
max_backoff_secs = 4
"#
        )
        .unwrap();

        let cfg = load_from(&path, env(&[(ENV_CHAT_ID, "2")])).unwrap();
        assert_eq!(cfg.telegram.bot_token, "from-file");
        assert_eq!(cfg.telegram.chat_id, "2");
        assert_eq!(cfg.gate.poll_timeout_secs, 2);
        assert_eq!(cfg.gate.max_backoff_secs, 4);
        assert_eq!(cfg.gate.default_timeout_secs, 1800);
    }

    #[test]
    fn skip_flag_accepts_truthy_values_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        for v in ["1", "true", "YES", " on "] {
            let cfg = load_from(&path, env(&[(ENV_SKIP, v)])).unwrap();
            assert!(cfg.gate.skip, "{v:?} should enable skip");
        }
        for v in ["0", "false", "nope", ""] {
            let cfg = load_from(&path, env(&[(ENV_SKIP, v)])).unwrap();
            assert!(!cfg.gate.skip, "{v:?} should not enable skip");
        }
    }

    #[test]
    fn zero_poll_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gate]\npoll_timeout_secs = 0\n").unwrap();

        let err = load_from(&path, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gate\n").unwrap();

        let err = load_from(&path, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let mut cfg = AppConfig::default();
        cfg.telegram.bot_token = "123:secret".to_string();
        let dbg = format!("{:?}", cfg.telegram);
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
