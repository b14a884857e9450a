//! Typed application settings.

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::builder::{ConfigError, SettingsBuilder};
use crate::sources::{DefaultSource, EnvSource, TomlFileSource};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FORMPRESS_";

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "FORMPRESS_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/formpress.toml";

/// Root settings object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub base: BaseSettings,
	pub remote: RemoteSettings,
	pub captcha: CaptchaSettings,
	pub cors: CorsSettings,
	pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	#[serde(deserialize_with = "number_like")]
	pub port: u16,
	#[serde(deserialize_with = "number_like")]
	pub read_timeout_secs: u64,
	#[serde(deserialize_with = "number_like")]
	pub write_timeout_secs: u64,
	#[serde(deserialize_with = "number_like")]
	pub shutdown_timeout_secs: u64,
	#[serde(deserialize_with = "number_like")]
	pub max_body_bytes: usize,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 9200,
			read_timeout_secs: 10,
			write_timeout_secs: 60,
			shutdown_timeout_secs: 10,
			max_body_bytes: 10 * 1024 * 1024,
		}
	}
}

impl ServerSettings {
	/// `host:port` suitable for binding.
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub fn read_timeout(&self) -> Duration {
		Duration::from_secs(self.read_timeout_secs)
	}

	pub fn write_timeout(&self) -> Duration {
		Duration::from_secs(self.write_timeout_secs)
	}

	pub fn shutdown_timeout(&self) -> Duration {
		Duration::from_secs(self.shutdown_timeout_secs)
	}
}

/// Public URLs of this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSettings {
	/// Base URL that browsers use to reach the API, without trailing slash.
	pub url: String,
}

impl Default for BaseSettings {
	fn default() -> Self {
		Self {
			url: "http://localhost:9200".to_string(),
		}
	}
}

impl BaseSettings {
	/// The base URL with any trailing slashes removed.
	pub fn trimmed_url(&self) -> &str {
		self.url.trim_end_matches('/')
	}
}

/// Upstream form service.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
	pub form_service_url: String,
	pub api_key: String,
	#[serde(deserialize_with = "number_like")]
	pub timeout_secs: u64,
}

impl Default for RemoteSettings {
	fn default() -> Self {
		Self {
			form_service_url: "http://localhost:8080".to_string(),
			api_key: String::new(),
			timeout_secs: 30,
		}
	}
}

impl RemoteSettings {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl std::fmt::Debug for RemoteSettings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RemoteSettings")
			.field("form_service_url", &self.form_service_url)
			.field("api_key", &"[REDACTED]")
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaSettings {
	pub site_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
	/// Origin patterns. `http://*` and `https://*` allow any origin of that
	/// scheme.
	pub allowed_origins: Vec<String>,
	#[serde(deserialize_with = "number_like")]
	pub max_age_secs: u64,
}

impl Default for CorsSettings {
	fn default() -> Self {
		Self {
			allowed_origins: vec!["http://*".to_string(), "https://*".to_string()],
			max_age_secs: 300,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive used when `RUST_LOG` is unset.
	pub level: String,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

impl Settings {
	/// Loads settings from defaults, the config file and the environment.
	///
	/// The file path is taken from `FORMPRESS_CONFIG`, falling back to
	/// `config/formpress.toml`.
	pub fn load() -> Result<Self, ConfigError> {
		let path = std::env::var(CONFIG_PATH_ENV)
			.map(PathBuf::from)
			.unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
		Self::load_from(&path, EnvSource::new().with_prefix(ENV_PREFIX))
	}

	/// Loads settings from an explicit file and environment source.
	pub fn load_from(path: &Path, env: EnvSource) -> Result<Self, ConfigError> {
		let defaults = DefaultSource::from_serializable(&Settings::default()).map_err(|error| {
			ConfigError::Source {
				source_name: "Default values".to_string(),
				error,
			}
		})?;

		let settings: Settings = SettingsBuilder::new()
			.add_source(defaults)
			.add_source(TomlFileSource::new(path))
			.add_source(env)
			.build()?
			.into_typed()?;
		settings.validate()?;
		Ok(settings)
	}

	/// Rejects settings the server cannot run with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.server.max_body_bytes == 0 {
			return Err(ConfigError::Invalid(
				"server.max_body_bytes must be greater than zero".to_string(),
			));
		}
		if self.base.url.is_empty() {
			return Err(ConfigError::Invalid("base.url must not be empty".to_string()));
		}
		if !(self.remote.form_service_url.starts_with("http://")
			|| self.remote.form_service_url.starts_with("https://"))
		{
			return Err(ConfigError::Invalid(format!(
				"remote.form_service_url must be an http(s) URL, got {:?}",
				self.remote.form_service_url
			)));
		}
		Ok(())
	}
}

/// Accepts a number or a string holding one. Environment values always
/// arrive as strings.
fn number_like<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + FromStr,
	T::Err: fmt::Display,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw<T> {
		Native(T),
		Text(String),
	}

	match Raw::<T>::deserialize(deserializer)? {
		Raw::Native(value) => Ok(value),
		Raw::Text(text) => text.trim().parse().map_err(|e| {
			de::Error::custom(format!("invalid number {text:?}: {e}"))
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	fn empty_env() -> EnvSource {
		EnvSource::new()
			.with_prefix(ENV_PREFIX)
			.with_vars(Vec::<(String, String)>::new())
	}

	#[rstest]
	fn test_defaults() {
		// Act
		let settings =
			Settings::load_from(Path::new("/nonexistent.toml"), empty_env()).unwrap();

		// Assert
		assert_eq!(settings, Settings::default());
		assert_eq!(settings.server.port, 9200);
		assert_eq!(settings.server.bind_address(), "0.0.0.0:9200");
		assert_eq!(settings.remote.timeout(), Duration::from_secs(30));
		assert_eq!(settings.cors.max_age_secs, 300);
		assert_eq!(settings.server.max_body_bytes, 10 * 1024 * 1024);
	}

	#[rstest]
	fn test_file_then_env_layering() {
		// Arrange
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[server]
port = 9300

[remote]
form_service_url = "https://forms.internal"
api_key = "from-file"
"#
		)
		.unwrap();
		let env = EnvSource::new().with_prefix(ENV_PREFIX).with_vars([
			("FORMPRESS_REMOTE__API_KEY", "12345"),
			("FORMPRESS_CAPTCHA__SITE_KEY", "site-key"),
		]);

		// Act
		let settings = Settings::load_from(file.path(), env).unwrap();

		// Assert
		assert_eq!(settings.server.port, 9300);
		assert_eq!(settings.server.host, "0.0.0.0");
		assert_eq!(settings.remote.form_service_url, "https://forms.internal");
		assert_eq!(settings.remote.api_key, "12345");
		assert_eq!(settings.captcha.site_key, "site-key");
	}

	#[rstest]
	fn test_env_strings_are_kept_verbatim() {
		// Arrange
		let env = EnvSource::new().with_prefix(ENV_PREFIX).with_vars([
			("FORMPRESS_REMOTE__API_KEY", "007"),
			("FORMPRESS_CAPTCHA__SITE_KEY", "Yes"),
			("FORMPRESS_LOGGING__LEVEL", "off"),
			("FORMPRESS_SERVER__PORT", " 9300 "),
			("FORMPRESS_REMOTE__TIMEOUT_SECS", "5"),
		]);

		// Act
		let settings = Settings::load_from(Path::new("/nonexistent.toml"), env).unwrap();

		// Assert
		assert_eq!(settings.remote.api_key, "007");
		assert_eq!(settings.captcha.site_key, "Yes");
		assert_eq!(settings.logging.level, "off");
		assert_eq!(settings.server.port, 9300);
		assert_eq!(settings.remote.timeout(), Duration::from_secs(5));
	}

	#[rstest]
	fn test_non_numeric_port_is_rejected() {
		// Arrange
		let env = EnvSource::new()
			.with_prefix(ENV_PREFIX)
			.with_vars([("FORMPRESS_SERVER__PORT", "http")]);

		// Act
		let result = Settings::load_from(Path::new("/nonexistent.toml"), env);

		// Assert
		assert!(matches!(result, Err(ConfigError::Invalid(_))));
	}

	#[rstest]
	fn test_debug_redacts_api_key() {
		// Arrange
		let remote = RemoteSettings {
			api_key: "top-secret".to_string(),
			..RemoteSettings::default()
		};

		// Act
		let rendered = format!("{:?}", remote);

		// Assert
		assert!(!rendered.contains("top-secret"));
		assert!(rendered.contains("[REDACTED]"));
	}

	#[rstest]
	#[case("FORMPRESS_SERVER__MAX_BODY_BYTES", "0")]
	#[case("FORMPRESS_REMOTE__FORM_SERVICE_URL", "ftp://forms")]
	fn test_validation_failures(#[case] key: &str, #[case] value: &str) {
		// Arrange
		let env = EnvSource::new().with_prefix(ENV_PREFIX).with_vars([(key, value)]);

		// Act
		let result = Settings::load_from(Path::new("/nonexistent.toml"), env);

		// Assert
		assert!(matches!(result, Err(ConfigError::Invalid(_))));
	}

	#[rstest]
	fn test_trimmed_base_url() {
		// Arrange
		let base = BaseSettings {
			url: "https://forms.example.com//".to_string(),
		};

		// Act & Assert
		assert_eq!(base.trimmed_url(), "https://forms.example.com");
	}
}
