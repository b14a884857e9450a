//! Settings loaded from the real process environment.

use formpress_conf::Settings;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::io::Write;

#[rstest]
#[serial(formpress_env)]
fn test_load_reads_config_path_and_env() {
	// Arrange
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[base]\nurl = \"https://forms.example.com\"\n\n[server]\nport = 9400").unwrap();
	unsafe {
		env::set_var("FORMPRESS_CONFIG", file.path());
		env::set_var("FORMPRESS_SERVER__PORT", "9500");
		env::set_var("FORMPRESS_CORS__ALLOWED_ORIGINS", "https://a.test,https://b.test");
	}

	// Act
	let settings = Settings::load();

	// Assert
	unsafe {
		env::remove_var("FORMPRESS_CONFIG");
		env::remove_var("FORMPRESS_SERVER__PORT");
		env::remove_var("FORMPRESS_CORS__ALLOWED_ORIGINS");
	}
	let settings = settings.unwrap();
	assert_eq!(settings.base.url, "https://forms.example.com");
	assert_eq!(settings.server.port, 9500);
	assert_eq!(
		settings.cors.allowed_origins,
		vec!["https://a.test".to_string(), "https://b.test".to_string()]
	);
}

#[rstest]
#[serial(formpress_env)]
fn test_load_without_file_uses_defaults() {
	// Arrange
	unsafe {
		env::set_var("FORMPRESS_CONFIG", "/definitely/not/here.toml");
	}

	// Act
	let settings = Settings::load();

	// Assert
	unsafe {
		env::remove_var("FORMPRESS_CONFIG");
	}
	assert_eq!(settings.unwrap().server.port, 9200);
}
