use std::sync::Arc;
use std::time::Duration;

use mrcp_infra::task::{LayerTaskManager, TaskPriority};
use tracing::debug;

use crate::registry::SessionRegistry;

/// Periodically sweeps terminated, channel-less sessions out of a
/// registry, the same background-task role the reference session
/// manager's cleanup manager plays alongside its registry and event
/// processor.
pub struct CleanupManager {
    tasks: LayerTaskManager,
}

impl CleanupManager {
    pub fn new() -> Self {
        CleanupManager { tasks: LayerTaskManager::new("mrcp-session-cleanup") }
    }

    /// Spawns the sweep as a tracked, low-priority task: it is safe to
    /// cancel mid-sweep on shutdown since it only removes sessions that
    /// are already fully torn down.
    pub async fn start(&self, registry: Arc<SessionRegistry>, interval: Duration) -> anyhow::Result<usize> {
        self.tasks
            .spawn_tracked("sweep", TaskPriority::Low, async move {
                let mut ticker = tokio::time::interval(interval);
                loop {
                    ticker.tick().await;
                    let removed = sweep_once(&registry).await;
                    if removed > 0 {
                        debug!(removed, "cleanup sweep removed terminated sessions");
                    }
                }
            })
            .await
    }
}

impl Default for CleanupManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn sweep_once(registry: &Arc<SessionRegistry>) -> usize {
    let stale: Vec<String> = registry.terminated_session_ids().await;
    for id in &stale {
        registry.remove(id);
    }
    stale.len()
}
