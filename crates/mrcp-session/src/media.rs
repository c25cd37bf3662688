use async_trait::async_trait;

use crate::descriptor::MediaDescriptor;
use crate::error::Result;

/// The session layer's view of whatever actually carries RTP audio/video
/// for a session (a media server, an RTP termination, or a test double).
///
/// Mirrors the reference server's termination add/modify/subtract
/// request/response cycle: add and modify both resolve to a local media
/// descriptor once the remote engine has allocated or reconfigured a
/// port, and subtract just tears the termination down.
#[async_trait]
pub trait MediaPipeline: Send + Sync {
    /// Adds a new audio (or video) termination for `remote`'s offer,
    /// returning the local descriptor the answer should carry.
    async fn add_termination(&self, session_id: &str, remote: &MediaDescriptor) -> Result<MediaDescriptor>;

    /// Reconfigures an existing termination for a new remote descriptor.
    async fn modify_termination(&self, session_id: &str, index: usize, remote: &MediaDescriptor) -> Result<MediaDescriptor>;

    /// Tears a termination down; called once per termination on session
    /// termination.
    async fn remove_termination(&self, session_id: &str, index: usize) -> Result<()>;
}
