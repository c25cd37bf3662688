/*!
Lifecycle Management

Standardized component lifecycle for the agent's ambient runtime:

- Component trait for standard lifecycle methods
- Lifecycle manager for orchestrating component start/stop order
- Dependency resolution for startup/shutdown ordering
- Aggregated health reporting across components
*/

pub mod component;
pub mod manager;
pub mod dependency;
pub mod health;

pub use component::{Component, ComponentState};
pub use manager::{LifecycleManager, LifecycleError};
pub use dependency::{DependencyGraph, DependencyError};
pub use health::{HealthCheck, HealthStatus}; 