// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host configuration: where to find the BIOS blob and how loud to log.
//!
//! `spec.md` §1/§6 treats BIOS acquisition as an external concern; this
//! module is the ambient plumbing around that boundary, not part of the
//! machine core itself. Precedence, low to high: built-in defaults, an
//! optional `r3000a.toml` next to the process, then `R3000A_BIOS_PATH` /
//! `RUST_LOG` environment variables (loaded via `dotenvy` first, so a
//! `.env` file can supply them too).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Host-side settings the binary driver needs before it can build a
/// [`crate::core::system::Machine`]. Not read or referenced by the core
/// library itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the 512 KiB BIOS image.
    pub bios_path: PathBuf,
    /// `env_logger` filter string, e.g. `"info"` or `"r3000a_core=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Errors loading or parsing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no BIOS path given: set `bios_path` in {0} or R3000A_BIOS_PATH")]
    MissingBiosPath(PathBuf),
}

impl Config {
    /// Load `path` (an `r3000a.toml`-shaped file) if it exists, then apply
    /// `R3000A_BIOS_PATH`/`RUST_LOG` environment overrides. Missing config
    /// files are not an error — only a missing BIOS path (file absent *and*
    /// no env override) is.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?
        } else {
            log::debug!("no config file at {}, using defaults + environment", path.display());
            PartialConfig::default()
        };

        if let Ok(bios) = std::env::var("R3000A_BIOS_PATH") {
            config.bios_path = Some(PathBuf::from(bios));
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        Ok(Config {
            bios_path: config.bios_path.ok_or_else(|| ConfigError::MissingBiosPath(path.to_path_buf()))?,
            log_level: config.log_level.unwrap_or_else(default_log_level),
        })
    }
}

/// Mirror of [`Config`] with every field optional, used while folding in the
/// file-then-environment layers before the final `bios_path` presence check.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    bios_path: Option<PathBuf>,
    log_level: Option<String>,
}
