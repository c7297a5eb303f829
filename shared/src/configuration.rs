use crate::core::DEFAULT_KEY_ATTRIBUTE;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configuration {
    pub table_name: String,
    pub key_attribute: String,
    pub consistent_read: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            key_attribute: DEFAULT_KEY_ATTRIBUTE.to_string(),
            consistent_read: false,
        }
    }
}

impl Configuration {
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            // .merge fills in any missing values from the environment
            .merge(Env::raw().only(&["TABLE_NAME", "KEY_ATTRIBUTE", "CONSISTENT_READ"]))
            .merge(Env::prefixed("APP_"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let config: Configuration = figment.extract()?;

        if config.table_name.is_empty() {
            return Err(figment::Error::from(
                "table_name must be set (TABLE_NAME or APP_TABLE_NAME)".to_string(),
            ));
        }
        if config.key_attribute.is_empty() {
            return Err(figment::Error::from(
                "key_attribute must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration {{ table_name: {}, key_attribute: {}, consistent_read: {} }}",
            self.table_name, self.key_attribute, self.consistent_read
        )
    }
}
