use async_trait::async_trait;

use crate::descriptor::SessionDescriptor;
use crate::error::Result;

/// The session layer's view of whatever protocol actually carries offers
/// and answers between client and server (SIP, RTSP, or a test double).
/// This crate only negotiates over the resulting descriptors; it never
/// speaks the signaling protocol itself.
#[async_trait]
pub trait SignalingAgent: Send + Sync {
    /// Sends an answer for a session that previously received an offer.
    async fn send_answer(&self, session_id: &str, answer: &SessionDescriptor) -> Result<()>;

    /// Sends a new offer on behalf of a client session.
    async fn send_offer(&self, session_id: &str, offer: &SessionDescriptor) -> Result<()>;

    /// Notifies the remote party that a session has fully terminated.
    async fn send_terminate_response(&self, session_id: &str) -> Result<()>;
}
