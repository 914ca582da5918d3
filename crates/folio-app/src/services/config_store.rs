// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `config.json` persistence for `ConversionConfig`.

use std::path::Path;

use folio_core::ConversionConfig;
use folio_core::error::Result;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "config.json";

/// Load the persisted config, or `None` if it is missing or unparseable.
pub fn load_config(data_dir: &Path) -> Option<ConversionConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => {
            debug!(path = %path.display(), "config loaded");
            Some(config)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid config");
            None
        }
    }
}

/// Load the persisted config, falling back to defaults.
pub fn load_or_default(data_dir: &Path) -> ConversionConfig {
    load_config(data_dir).unwrap_or_default()
}

pub fn persist_config(data_dir: &Path, config: &ConversionConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
