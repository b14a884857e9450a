//! Configuration for formpress.
//!
//! Settings are assembled from layered [`sources`]: built-in defaults, an
//! optional TOML file and `FORMPRESS_`-prefixed environment variables, with
//! later layers overriding earlier ones key by key.
//!
//! ```no_run
//! use formpress_conf::Settings;
//!
//! let settings = Settings::load().expect("invalid configuration");
//! println!("listening on {}", settings.server.bind_address());
//! ```

pub mod builder;
pub mod manager;
pub mod settings;
pub mod sources;

pub use builder::{ConfigError, MergedSettings, SettingsBuilder};
pub use manager::SettingsManager;
pub use settings::{
	BaseSettings, CaptchaSettings, CorsSettings, LoggingSettings, RemoteSettings, ServerSettings,
	Settings,
};
