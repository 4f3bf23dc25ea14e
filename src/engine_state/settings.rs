//! # World Settings
//!
//! Startup configuration for the placement grid. On native builds the
//! settings are read from `assets/config/settings.json` when present;
//! otherwise (and always on web builds) the defaults are used. The settings
//! are fixed at startup and never mutated afterwards.

use serde::Deserialize;

use super::grid::GridConfig;

/// Grid configuration loaded at startup.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// World units per grid cell
    pub cell_size: f32,
    /// Cells per horizontal side of the grid
    pub grid_dimensions: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            cell_size: 4.0,
            grid_dimensions: 32,
        }
    }
}

/// Path of the optional native settings file, relative to the working directory.
#[cfg(not(target_family = "wasm"))]
const SETTINGS_PATH: &str = "assets/config/settings.json";

impl WorldSettings {
    /// Loads the settings from disk on native, falling back to defaults when
    /// the file is missing or malformed. Web builds always use defaults.
    pub fn load() -> Self {
        #[cfg(not(target_family = "wasm"))]
        {
            match std::fs::read_to_string(SETTINGS_PATH) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(settings) => return settings,
                    Err(err) => {
                        log::warn!("Ignoring malformed {}: {}", SETTINGS_PATH, err);
                    }
                },
                Err(err) => {
                    log::info!("No {} ({}), using default settings", SETTINGS_PATH, err);
                }
            }
        }

        Self::default()
    }

    /// The grid configuration described by these settings.
    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.cell_size, self.grid_dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_describe_the_reference_grid() {
        let settings = WorldSettings::default();
        let grid = settings.grid();
        assert_relative_eq!(grid.cell_size, 4.0);
        assert_eq!(grid.grid_dimensions, 32);
    }

    #[test]
    fn partial_json_falls_back_per_field() {
        let settings: WorldSettings = serde_json::from_str(r#"{"cell_size": 2.0}"#).unwrap();
        assert_relative_eq!(settings.cell_size, 2.0);
        assert_eq!(settings.grid_dimensions, 32);
    }
}
