use serde::{Deserialize, Serialize};

use crate::navigation::NavigationConfig;
use crate::pointer::PointerConfig;

/// Input tuning, read from the `"input"` section of the app config file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub navigation: NavigationConfig,
    pub pointer: PointerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_gives_defaults() {
        let cfg: InputConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, InputConfig::default());
        assert_eq!(cfg.navigation.forward_step, 0.5);
        assert_eq!(cfg.pointer.sensitivity, 0.002);
    }

    #[test]
    fn overrides_single_field() {
        let cfg: InputConfig =
            serde_json::from_str(r#"{"navigation": {"strafe_step": 0.3}}"#).unwrap();
        assert_eq!(cfg.navigation.strafe_step, 0.3);
        assert_eq!(cfg.navigation.back_step, 0.1);
    }
}
