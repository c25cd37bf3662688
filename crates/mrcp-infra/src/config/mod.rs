pub mod dynamic;

use crate::errors::types::Result;
use serde::de::DeserializeOwned;
use std::any::Any;

/// Where a configuration value was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConfigSource {
    File,
    Environment,
    Default,
    Override,
}

/// A named source of configuration values, queryable by key.
pub trait ConfigProvider: Send + Sync {
    fn name(&self) -> &str;
    fn source(&self) -> ConfigSource;
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T>;
    fn get_raw(&self, key: &str) -> Result<Box<dyn Any>>;
    fn has(&self, key: &str) -> bool;
    fn keys(&self) -> Vec<String>;
    fn reload(&self) -> Result<()>;
}

pub use dynamic::DynamicConfig;
