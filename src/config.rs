/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Session configuration.
#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use cbmhost_core::MachineModel;
use cbmhost_peripherals::console::ConsoleConfig;

/// The configuration of a [Session][crate::session::Session].
///
/// With the `snapshot` feature enabled the configuration can be loaded from any serde format.
/// Missing fields assume their default values:
///
/// ```text
/// { "model": "C128", "console": { "suppressFirstClear": false } }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(default, rename_all = "camelCase"))]
pub struct SessionConfig {
    /// The emulated machine, which determines the keyboard matrix codes.
    pub model: MachineModel,
    pub console: ConsoleConfig,
}

impl SessionConfig {
    pub fn new(model: MachineModel) -> Self {
        SessionConfig { model, ..SessionConfig::default() }
    }
}

impl From<MachineModel> for SessionConfig {
    fn from(model: MachineModel) -> Self {
        SessionConfig::new(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.model, MachineModel::C64);
        assert!(config.console.suppress_first_clear);
        assert_eq!(config.console.end_of_line, 0x0D);
        assert_eq!(SessionConfig::from(MachineModel::Vic20).model, MachineModel::Vic20);
    }

    #[cfg(feature = "snapshot")]
    #[test]
    fn config_from_json() {
        let config: SessionConfig = serde_json::from_str(
            r#"{ "model": "C128", "console": { "suppressFirstClear": false } }"#).unwrap();
        assert_eq!(config.model, MachineModel::C128);
        assert!(!config.console.suppress_first_clear);
        assert_eq!(config.console.end_of_line, 0x0D);
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
