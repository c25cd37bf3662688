use super::component::{Component, ComponentState};
use super::dependency::DependencyGraph;
use super::health::{HealthCheck, HealthStatus};
use crate::errors::types::{Error, Result};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("component not registered: {0}")]
    NotRegistered(String),

    #[error("component {0} failed during {1}: {2}")]
    TransitionFailed(String, &'static str, String),
}

impl From<LifecycleError> for Error {
    fn from(err: LifecycleError) -> Self {
        Error::Lifecycle(err.to_string())
    }
}

/// Orchestrates init/start/stop/shutdown across a set of named components,
/// honoring the order produced by the dependency graph.
pub struct LifecycleManager {
    components: HashMap<String, Box<dyn Component>>,
    graph: DependencyGraph,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self { components: HashMap::new(), graph: DependencyGraph::new() }
    }

    pub fn register(&mut self, component: Box<dyn Component>) {
        let name = component.name().to_string();
        self.graph.add_node(&name);
        for dep in component.dependencies() {
            let _ = self.graph.add_dependency(&name, dep);
        }
        self.components.insert(name, component);
    }

    /// Initialize then start every registered component in dependency order.
    pub async fn start_all(&mut self) -> Result<()> {
        let order = self.graph.resolve_order()?;
        for name in order {
            let Some(component) = self.components.get_mut(&name) else {
                continue;
            };
            info!(component = %name, "initializing component");
            component
                .init()
                .await
                .map_err(|e| LifecycleError::TransitionFailed(name.clone(), "init", e.to_string()))?;
            component
                .start()
                .await
                .map_err(|e| LifecycleError::TransitionFailed(name.clone(), "start", e.to_string()))?;
        }
        Ok(())
    }

    /// Stop then shut down every registered component in reverse dependency order.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        let mut order = self.graph.resolve_order()?;
        order.reverse();
        for name in order {
            let Some(component) = self.components.get_mut(&name) else {
                continue;
            };
            if let Err(e) = component.stop().await {
                warn!(component = %name, error = %e, "component failed to stop cleanly");
            }
            component
                .shutdown()
                .await
                .map_err(|e| LifecycleError::TransitionFailed(name.clone(), "shutdown", e.to_string()))?;
        }
        Ok(())
    }

    pub fn state_of(&self, name: &str) -> Option<ComponentState> {
        self.components.get(name).map(|c| c.state())
    }

    pub async fn health(&self) -> HealthCheck {
        let mut report = HealthCheck::new();
        for (name, component) in &self.components {
            let status = match component.health_check().await {
                Ok(()) => HealthStatus::Healthy,
                Err(_) => HealthStatus::Unhealthy,
            };
            report.record(name, status);
        }
        report
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
