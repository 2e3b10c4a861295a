//! Config subcommand handling

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::args::ConfigAction;
use super::presenter::Presenter;

/// Keys accepted by `config get` / `config set`
const KEYS: &[&str] = &[
    "api_key",
    "endpoint",
    "chunk_interval_ms",
    "grace_delay_ms",
    "probe_timeout_ms",
    "notify",
    "cues",
];

/// Handle a config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => {
            store.init().await?;
            presenter.success(&format!("Created {}", store.path().display()));
            Ok(())
        }
        ConfigAction::Path => {
            presenter.output(&store.path().display().to_string());
            Ok(())
        }
        ConfigAction::List => {
            let config = store.load().await?;
            for key in KEYS {
                presenter.key_value(key, &get_value(&config, key).unwrap_or_else(|| "-".into()));
            }
            Ok(())
        }
        ConfigAction::Get { key } => {
            let config = store.load().await?;
            match get_value(&config, &key) {
                Some(value) => {
                    presenter.output(&value);
                    Ok(())
                }
                None if KEYS.contains(&key.as_str()) => {
                    presenter.output("-");
                    Ok(())
                }
                None => Err(unknown_key(&key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = store.load().await?;
            set_value(&mut config, &key, &value)?;
            store.save(&config).await?;
            presenter.success(&format!("Set {}", key));
            Ok(())
        }
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("unknown key (expected one of: {})", KEYS.join(", ")),
    }
}

fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.clone(),
        "endpoint" => config.endpoint.clone(),
        "chunk_interval_ms" => config.chunk_interval_ms.map(|v| v.to_string()),
        "grace_delay_ms" => config.grace_delay_ms.map(|v| v.to_string()),
        "probe_timeout_ms" => config.probe_timeout_ms.map(|v| v.to_string()),
        "notify" => config.notify.map(|v| v.to_string()),
        "cues" => config.cues.map(|v| v.to_string()),
        _ => None,
    }
}

fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let parse_u64 = |value: &str| {
        value.parse::<u64>().map_err(|_| ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("expected a number, got \"{}\"", value),
        })
    };
    let parse_bool = |value: &str| {
        value.parse::<bool>().map_err(|_| ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("expected true or false, got \"{}\"", value),
        })
    };

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "endpoint" => config.endpoint = Some(value.to_string()),
        "chunk_interval_ms" => config.chunk_interval_ms = Some(parse_u64(value)?),
        "grace_delay_ms" => config.grace_delay_ms = Some(parse_u64(value)?),
        "probe_timeout_ms" => config.probe_timeout_ms = Some(parse_u64(value)?),
        "notify" => config.notify = Some(parse_bool(value)?),
        "cues" => config.cues = Some(parse_bool(value)?),
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "api_key", "secret").unwrap();
        set_value(&mut config, "chunk_interval_ms", "100").unwrap();
        set_value(&mut config, "notify", "true").unwrap();

        assert_eq!(get_value(&config, "api_key").as_deref(), Some("secret"));
        assert_eq!(
            get_value(&config, "chunk_interval_ms").as_deref(),
            Some("100")
        );
        assert_eq!(get_value(&config, "notify").as_deref(), Some("true"));
    }

    #[test]
    fn set_rejects_bad_number() {
        let mut config = AppConfig::empty();
        let err = set_value(&mut config, "grace_delay_ms", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn set_rejects_bad_bool() {
        let mut config = AppConfig::empty();
        let err = set_value(&mut config, "cues", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut config = AppConfig::empty();
        let err = set_value(&mut config, "volume", "11").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn get_unknown_key_is_none() {
        let config = AppConfig::empty();
        assert!(get_value(&config, "volume").is_none());
    }
}
