/*!
# mrcp-infra

Ambient runtime shared by every other crate in the stack:

- [`task`]: tracked, cancellable task spawning (the substrate every
  connection reader, poller and session worker runs on)
- [`lifecycle`]: component start/stop ordering and health reporting
- [`logging`]: `tracing` setup, contextual spans, and a metrics collector
- [`config`]: runtime-swappable configuration values
- [`errors`]: the shared error type and context-attaching helpers
*/

pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod task;

pub use errors::types::{Error, Result};
pub use lifecycle::component::Component;
pub use logging::setup::setup_logging;
pub use task::{LayerTaskManager, TaskHandle, TaskPriority};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn version_is_set() {
        assert!(!super::VERSION.is_empty());
    }
}
