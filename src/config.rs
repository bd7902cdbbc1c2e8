use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Filter settings
    pub name: String,
    pub enabled: bool,
    pub database_path: Option<String>,
    pub allowed_countries: Vec<String>,
    pub disallowed_countries: Vec<String>,
    pub allow_private: bool,

    // Host settings
    pub listen_addr: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "geoblock".to_string(),
            enabled: false,
            database_path: None,
            allowed_countries: Vec::new(),
            disallowed_countries: Vec::new(),
            allow_private: false,
            listen_addr: "0.0.0.0:8080".to_string(),
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build the configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(var: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let flag = |key: &str| {
        var(key)
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    };
    let list = |key: &str| -> Vec<String> {
        var(key)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    };

    let name = var("GEOBLOCK_NAME").unwrap_or_else(|| "geoblock".to_string());

    let enabled = flag("GEOBLOCK_ENABLED");

    let database_path = var("GEOBLOCK_DATABASE_PATH");

    let allowed_countries = list("GEOBLOCK_ALLOWED_COUNTRIES");
    let disallowed_countries = list("GEOBLOCK_DISALLOWED_COUNTRIES");

    let allow_private = flag("GEOBLOCK_ALLOW_PRIVATE");

    let listen_addr =
        var("GEOBLOCK_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let debug = var("DEBUG").is_some();

    Ok(Config {
        name,
        enabled,
        database_path,
        allowed_countries,
        disallowed_countries,
        allow_private,
        listen_addr,
        debug,
    })
}
