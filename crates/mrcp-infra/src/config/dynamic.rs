use crate::config::{ConfigProvider, ConfigSource};
use crate::errors::types::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Configuration value that can be swapped at runtime without restarting
/// whatever holds a clone of it.
pub struct DynamicConfig<T: 'static> {
    name: String,
    source: ConfigSource,
    config: Arc<RwLock<T>>,
}

impl<T: DeserializeOwned + Send + Sync + Clone + Debug + 'static> DynamicConfig<T> {
    pub fn new<S: Into<String>>(name: S, source: ConfigSource, initial_config: T) -> Self {
        DynamicConfig {
            name: name.into(),
            source,
            config: Arc::new(RwLock::new(initial_config)),
        }
    }

    pub fn get_config(&self) -> T {
        self.config.read().unwrap().clone()
    }

    pub fn update(&self, new_config: T) {
        *self.config.write().unwrap() = new_config;
    }

    /// Spawn a task that reloads the config on a fixed interval, stopping
    /// once the returned sender is dropped.
    pub fn auto_refresh<F>(&self, refresh_interval: Duration, loader: F) -> mpsc::Sender<()>
    where
        F: Fn() -> Result<T> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let config = self.clone();

        tokio::spawn(async move {
            let mut tick = interval(refresh_interval);
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if let Ok(new_config) = loader() {
                            config.update(new_config);
                        }
                    }
                    _ = rx.recv() => break,
                }
            }
        });

        tx
    }
}

impl<T: 'static> Clone for DynamicConfig<T> {
    fn clone(&self) -> Self {
        DynamicConfig {
            name: self.name.clone(),
            source: self.source,
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: DeserializeOwned + Send + Sync + Clone + Debug + Serialize + 'static> ConfigProvider for DynamicConfig<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> ConfigSource {
        self.source
    }

    fn get<U: DeserializeOwned>(&self, _key: &str) -> Result<U> {
        let config = self.config.read().unwrap();
        let value = serde_json::to_value(&*config)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;

        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("failed to deserialize config: {}", e)))
    }

    fn get_raw(&self, _key: &str) -> Result<Box<dyn Any>> {
        Ok(Box::new(self.config.read().unwrap().clone()))
    }

    fn has(&self, _key: &str) -> bool {
        true
    }

    fn keys(&self) -> Vec<String> {
        vec![]
    }

    fn reload(&self) -> Result<()> {
        Err(Error::Config("reload not supported without a loader".to_string()))
    }
}

impl<T: Debug + 'static> Debug for DynamicConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicConfig")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct ServerLimits {
        max_sessions: usize,
    }

    #[tokio::test]
    async fn update_is_visible_to_clones() {
        let cfg = DynamicConfig::new("server-limits", ConfigSource::Default, ServerLimits { max_sessions: 8 });
        let clone = cfg.clone();
        cfg.update(ServerLimits { max_sessions: 32 });
        assert_eq!(clone.get_config().max_sessions, 32);
    }
}
