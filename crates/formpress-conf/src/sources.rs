//! Configuration sources for the layered settings system
//!
//! Sources are merged in priority order: environment variables (100) beat
//! the TOML file (50), which beats built-in defaults (0).

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Keys whose environment values are split on commas into a list.
const LIST_KEYS: &[&str] = &["allowed_origins"];

/// Environment variable configuration source
///
/// With prefix `FORMPRESS_`, the variable `FORMPRESS_SERVER__PORT=8080`
/// becomes `{"server": {"port": 8080}}`. A double underscore separates
/// nesting levels and keys are lowercased.
pub struct EnvSource {
	prefix: Option<String>,
	separator: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Create a new environment variable configuration source
	pub fn new() -> Self {
		Self {
			prefix: None,
			separator: "__".to_string(),
			vars: None,
		}
	}

	/// Set a prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use formpress_conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::new()
	///     .with_prefix("FORMPRESS_")
	///     .with_vars([("FORMPRESS_SERVER__PORT", "8080"), ("HOME", "/root")]);
	///
	/// let values = source.load().unwrap();
	/// assert_eq!(values["server"]["port"], "8080");
	/// assert!(!values.contains_key("home"));
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Set the nesting separator (default `__`).
	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	/// Read from the given pairs instead of the process environment.
	pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		);
		self
	}

	/// Values stay strings; typed fields parse them on deserialization.
	fn parse_value(key: &str, value: String) -> Value {
		if !LIST_KEYS.contains(&key) {
			return Value::String(value);
		}
		let list = value
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| Value::String(s.to_string()))
			.collect();
		Value::Array(list)
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut root = Map::new();

		for (key, value) in vars {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(rest) => rest,
					None => continue,
				},
				None => key.as_str(),
			};

			let path: Vec<String> = clean_key
				.split(self.separator.as_str())
				.filter(|segment| !segment.is_empty())
				.map(str::to_lowercase)
				.collect();
			let Some(leaf) = path.last() else {
				continue;
			};

			let parsed = Self::parse_value(leaf, value);
			insert_nested(&mut root, &path, parsed);
		}

		Ok(root.into_iter().collect())
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

fn insert_nested(target: &mut Map<String, Value>, path: &[String], value: Value) {
	match path {
		[] => {}
		[leaf] => {
			target.insert(leaf.clone(), value);
		}
		[head, rest @ ..] => {
			let child = target
				.entry(head.clone())
				.or_insert_with(|| Value::Object(Map::new()));
			if !child.is_object() {
				*child = Value::Object(Map::new());
			}
			if let Value::Object(child_map) = child {
				insert_nested(child_map, rest, value);
			}
		}
	}
}

/// TOML file configuration source. A missing file yields no values.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let table: toml::Table = toml::from_str(&content)?;
		let json_value = serde_json::to_value(table)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create a new default values configuration source
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value for a configuration key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}

	/// Use every top-level field of a serializable value as a default.
	///
	/// # Errors
	///
	/// Fails if `value` does not serialize to a JSON object.
	pub fn from_serializable<T: serde::Serialize>(value: &T) -> Result<Self, SourceError> {
		match serde_json::to_value(value)? {
			Value::Object(map) => Ok(Self {
				values: map.into_iter().collect(),
			}),
			_ => Err(SourceError::Parse(
				"defaults must serialize to an object".to_string(),
			)),
		}
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
