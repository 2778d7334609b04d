use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataConfig, ReportConfig, SampleConfig};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. The file is
/// optional: when it is absent the built-in defaults apply, so a bare
/// checkout runs without any setup. Whatever the source, the result is
/// validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Look for an optional `config.toml` next to the binary's working directory.
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct.
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
