use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub form_webhook_url: Option<String>,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default)]
    pub booking_url: Option<String>,

    #[serde(default)]
    pub site_url: Option<String>,
}

fn default_server_port() -> u16 {
    3000
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid environmental variable: {}", e))?;
        Ok(config)
    }

    /// Upstream webhook that receives every submission. Blank values count as unset.
    pub fn webhook_url(&self) -> Option<&str> {
        non_blank(self.form_webhook_url.as_deref())
    }

    pub fn booking_url(&self) -> Option<&str> {
        non_blank(self.booking_url.as_deref())
    }

    pub fn site_url(&self) -> String {
        non_blank(self.site_url.as_deref())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.server_port))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
