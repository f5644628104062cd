//! Application configuration.
//!
//! The browser build has no environment to read from, so the defaults are
//! compiled in. A deployment can override them by serving a JSON document
//! in a `<script id="seisweb-config" type="application/json">` tag.

use seisweb::ClientConfig;

/// Application name shown in the page title.
pub const APP_NAME: &str = "Seismic Detector";

/// Id of the optional inline configuration block.
pub const CONFIG_ELEMENT_ID: &str = "seisweb-config";

/// Load the client configuration, falling back to the defaults.
pub fn load_config() -> ClientConfig {
    let inline = gloo_utils::document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());

    match inline {
        Some(json) => parse_config(&json),
        None => ClientConfig::default(),
    }
}

fn parse_config(json: &str) -> ClientConfig {
    match ClientConfig::from_json(json) {
        Ok(config) => {
            log::info!("Using backend at {}", config.backend_url);
            config
        }
        Err(e) => {
            log::warn!("Ignoring invalid configuration block: {}", e);
            ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_config_overrides() {
        let config = parse_config(r#"{"backendUrl": "https://detector.example.org", "pollIntervalMs": 500}"#);
        assert_eq!(config.backend_url, "https://detector.example.org");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_parse_config_invalid_falls_back() {
        assert_eq!(parse_config("{not json"), ClientConfig::default());
    }
}
