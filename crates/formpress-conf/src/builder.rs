//! Merging of configuration sources.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::sources::ConfigSource;

/// Errors raised while building or reading settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: crate::sources::SourceError,
	},

	#[error("setting not found: {0}")]
	NotFound(String),

	#[error("invalid settings: {0}")]
	Invalid(String),
}

/// Collects sources and merges them by priority.
///
/// Higher priority sources override lower ones. Tables are merged key by
/// key, so an environment variable can override a single field of a
/// section defined in the TOML file. Sources with equal priority apply in
/// the order they were added.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Loads every source and merges the results.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_conf::{SettingsBuilder, sources::{DefaultSource, EnvSource}};
	/// use serde_json::json;
	///
	/// let env = EnvSource::new()
	///     .with_prefix("APP_")
	///     .with_vars([("APP_SERVER__PORT", "8080")]);
	/// let defaults =
	///     DefaultSource::new().with_value("server", json!({"host": "0.0.0.0", "port": 9200}));
	///
	/// let merged = SettingsBuilder::new()
	///     .add_source(env)
	///     .add_source(defaults)
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(merged.get::<String>("server.port").unwrap(), "8080");
	/// assert_eq!(merged.get::<String>("server.host").unwrap(), "0.0.0.0");
	/// ```
	pub fn build(mut self) -> Result<MergedSettings, ConfigError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Map::new();
		for source in &self.sources {
			let values = source.load().map_err(|error| ConfigError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded configuration source"
			);
			for (key, value) in values {
				merge_value(&mut merged, key, value);
			}
		}

		Ok(MergedSettings {
			values: merged.into_iter().collect(),
		})
	}
}

fn merge_value(target: &mut Map<String, Value>, key: String, value: Value) {
	let Value::Object(incoming) = value else {
		target.insert(key, value);
		return;
	};

	if let Some(Value::Object(existing)) = target.get_mut(&key) {
		for (k, v) in incoming {
			merge_value(existing, k, v);
		}
		return;
	}

	target.insert(key, Value::Object(incoming));
}

/// Result of merging all sources.
#[derive(Debug, Clone, Default)]
pub struct MergedSettings {
	values: IndexMap<String, Value>,
}

impl MergedSettings {
	/// Reads a value by dotted path, such as `server.port`.
	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
		let value = self
			.lookup(key)
			.ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
		serde_json::from_value(value.clone())
			.map_err(|e| ConfigError::Invalid(format!("{}: {}", key, e)))
	}

	pub fn contains(&self, key: &str) -> bool {
		self.lookup(key).is_some()
	}

	fn lookup(&self, key: &str) -> Option<&Value> {
		let mut segments = key.split('.');
		let first = segments.next()?;
		let mut current = self.values.get(first)?;
		for segment in segments {
			current = current.as_object()?.get(segment)?;
		}
		Some(current)
	}

	/// Deserializes the whole merged tree into `T`.
	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
		let object: Map<String, Value> = self.values.into_iter().collect();
		serde_json::from_value(Value::Object(object))
			.map_err(|e| ConfigError::Invalid(e.to_string()))
	}
}
