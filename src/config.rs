//! Extension configuration

use serde::{Deserialize, Serialize};

/// Configuration for the asset delivery extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDeliveryConfig {
    /// Global name the scripting module is registered under.
    pub module_name: String,
    /// Log every raw event record before dispatch (noisy, debugging aid).
    pub log_events: bool,
    /// Upper bound on events dispatched per update tick; `None` drains the
    /// whole queue every tick.
    pub max_events_per_tick: Option<usize>,
}

impl Default for AssetDeliveryConfig {
    fn default() -> Self {
        Self {
            module_name: "pad".to_string(),
            log_events: false,
            max_events_per_tick: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AssetDeliveryConfig::default();
        assert_eq!(config.module_name, "pad");
        assert!(!config.log_events);
        assert_eq!(config.max_events_per_tick, None);
    }

    #[test]
    fn partial_config_deserializes_over_defaults() {
        let config: AssetDeliveryConfig =
            serde_json::from_str(r#"{"max_events_per_tick": 8}"#).unwrap();
        assert_eq!(config.module_name, "pad");
        assert_eq!(config.max_events_per_tick, Some(8));
    }
}
