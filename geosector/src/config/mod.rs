//! INI configuration file (`~/.geosector/config.ini`).
//!
//! ```text
//! [geodesy]      earth radius, reference center
//! [grid]         cell size
//! [sector]       azimuths, angle, radius
//! [persistence]  error policy
//! [analysis]     scope
//! [logging]      log file
//! ```
//!
//! A missing file means defaults. Individual values can be read and written
//! by name through [`ConfigKey`].
//!
//! # Example
//!
//! ```
//! use geosector::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::default();
//! ConfigKey::GridSizeKm.set(&mut config, "25").unwrap();
//!
//! assert_eq!(config.grid.size_km, 25.0);
//! assert_eq!(ConfigKey::SectorAzimuths.get(&config), "0,120,240");
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_GRID_SIZE_KM,
    DEFAULT_LOG_FILE_NAME,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    AnalysisSettings, ConfigFile, GeodesySettings, GridSettings, LoggingSettings,
    PersistenceSettings, SectorSettings,
};
