use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatasourceConfig {
    pub datasource: DatasourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasourceSettings {
    pub url: String,
    pub id: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

pub fn load_datasource_config() -> anyhow::Result<DatasourceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/datasource"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
