use anyhow::Context;
use serde::de::DeserializeOwned;

/// Reads `configuration/base.yaml` (or `test.yaml` under `cfg(test)`) and
/// lets `APP_`-prefixed environment variables override individual values,
/// e.g. `APP_MAPSERVER__AUTH_TOKEN`. The file is optional so a fully
/// env-driven deployment needs no configuration directory at all.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir().context("Failed to determine the current directory")?;
    let configuration_directory = base_path.join("configuration");
    let file = if cfg!(test) { "test.yaml" } else { "base.yaml" };
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join(file)).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Failed to build configuration")?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
