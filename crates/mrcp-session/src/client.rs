use std::collections::VecDeque;
use std::sync::Arc;

use mrcp_core::message::ChannelId;
use mrcp_core::MrcpMessage;
use mrcp_transport::ConnectionMux;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::channel::MrcpChannel;
use crate::descriptor::{ControlDescriptor, SessionDescriptor};
use crate::error::{Error, Result};
use crate::media::MediaPipeline;
use crate::registry::SessionRegistry;
use crate::session::{MrcpSession, SessionRole};
use crate::signaling::SignalingAgent;

/// Client-side orchestrator: an application adds control channels one at
/// a time, each addition growing the session's pending offer; once the
/// offer is sent, incoming requests issued on its channels are dispatched
/// one at a time, queued behind whichever is still awaiting a response.
///
/// Mirrors the reference client session's channel-add-builds-offer and
/// single-active-request-with-a-FIFO-queue pattern.
pub struct ClientSession {
    registry: Arc<SessionRegistry>,
    signaling: Arc<dyn SignalingAgent>,
    media: Arc<dyn MediaPipeline>,
    transport: Option<Arc<ConnectionMux>>,
    request_queues: dashmap::DashMap<String, Mutex<RequestQueue>>,
    /// The offer an application is building up via [`add_channel`] calls,
    /// kept separately from `MrcpSession`'s own offer/answer slots, which
    /// model the *server's* view of a negotiation in progress rather than
    /// a client's own outbound draft.
    ///
    /// [`add_channel`]: ClientSession::add_channel
    pending_offers: dashmap::DashMap<String, Mutex<SessionDescriptor>>,
}

#[derive(Default)]
struct RequestQueue {
    active: Option<MrcpMessage>,
    pending: VecDeque<MrcpMessage>,
}

impl ClientSession {
    pub fn new(signaling: Arc<dyn SignalingAgent>, media: Arc<dyn MediaPipeline>) -> Self {
        ClientSession {
            registry: Arc::new(SessionRegistry::new()),
            signaling,
            media,
            transport: None,
            request_queues: dashmap::DashMap::new(),
            pending_offers: dashmap::DashMap::new(),
        }
    }

    pub fn with_transport(mut self, transport: Arc<ConnectionMux>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Adds a control channel for `resource_name` to a session's pending
    /// offer, creating the session on first use. Does not send anything;
    /// call [`ClientSession::send_offer`] once all channels for this
    /// round have been added.
    pub async fn add_channel(&self, session_id: Option<&str>, resource_name: &str) -> Result<(String, usize)> {
        let (session_id, session) = match session_id {
            Some(id) => {
                let session = self.registry.get(id).ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
                (id.to_string(), session)
            }
            None => {
                let hex = uuid::Uuid::new_v4().simple().to_string();
                let id = hex[..16].to_string();
                (id.clone(), self.registry.create(id, SessionRole::Client))
            }
        };

        let channel_id = ChannelId::new(&session_id, resource_name);
        if let Some(transport) = &self.transport {
            transport.register_pending(channel_id.to_string());
        }
        let channel = MrcpChannel::new(channel_id)?;

        let mut guard = session.lock().await;
        let index = guard.add_channel(channel);
        drop(guard);

        let pending = self
            .pending_offers
            .entry(session_id.clone())
            .or_insert_with(|| Mutex::new(SessionDescriptor::new()));
        let mut offer = pending.lock().await;
        let mut control = ControlDescriptor::new(resource_name);
        control.session_id = session_id.clone();
        control.cmid = offer.control_media.len() + 1;
        offer.add_control_media(control);
        drop(offer);

        self.request_queues.entry(session_id.clone()).or_insert_with(|| Mutex::new(RequestQueue::default()));

        Ok((session_id, index))
    }

    /// Sends whichever offer has been built up by prior [`add_channel`]
    /// calls, leaving it in place so a retransmitted offer is still
    /// available until an answer actually arrives.
    pub async fn send_offer(&self, session_id: &str) -> Result<()> {
        let pending = self
            .pending_offers
            .get(session_id)
            .ok_or_else(|| Error::NoOfferInProgress(session_id.to_string()))?;
        let offer = pending.lock().await.clone();
        info!(session = %session_id, offer = %offer, "sending session offer");
        self.signaling.send_offer(session_id, &offer).await
    }

    /// Applies an answer to a session's in-flight offer: clears the
    /// pending draft and records the channels' assigned session id.
    pub async fn handle_answer(&self, session_id: &str, answer: &SessionDescriptor) -> Result<()> {
        let session = self.registry.get(session_id).ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        self.pending_offers.remove(session_id);
        let mut guard = session.lock().await;
        guard.begin_offer(answer.clone());
        guard.complete_offer();
        Ok(())
    }

    /// Submits an application request on one of a session's channels.
    /// Dispatched immediately if no request on that session is awaiting
    /// a response, otherwise queued.
    pub async fn submit_request(&self, session_id: &str, message: MrcpMessage) -> Result<()> {
        let entry = self
            .request_queues
            .get(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let mut queue = entry.lock().await;
        if queue.active.is_some() {
            debug!(session = %session_id, "queuing application request behind an active one");
            queue.pending.push_back(message);
        } else {
            queue.active = Some(message.clone());
            drop(queue);
            self.dispatch(session_id, &message).await?;
        }
        Ok(())
    }

    /// Called once a response to the active request arrives; clears it
    /// and dispatches the next queued request, if any.
    pub async fn complete_active_request(&self, session_id: &str) -> Result<()> {
        let entry = self
            .request_queues
            .get(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let next = {
            let mut queue = entry.lock().await;
            queue.active = queue.pending.pop_front();
            queue.active.clone()
        };
        if let Some(message) = next {
            self.dispatch(session_id, &message).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, session_id: &str, message: &MrcpMessage) -> Result<()> {
        if let Some(transport) = &self.transport {
            transport.send(message).await?;
        }
        debug!(session = %session_id, request_id = %message.request_id(), "dispatched application request");
        Ok(())
    }

    /// Tears a session down: removes its channels, frees its media
    /// terminations, and drops it from the registry.
    pub async fn terminate(&self, session_id: &str) -> Result<()> {
        let session = self.registry.get(session_id).ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        self.free_terminations(session_id, &session).await?;
        {
            let mut guard = session.lock().await;
            guard.mark_terminated();
        }
        self.registry.remove(session_id);
        self.request_queues.remove(session_id);
        self.pending_offers.remove(session_id);
        Ok(())
    }

    async fn free_terminations(&self, session_id: &str, session: &Arc<Mutex<MrcpSession>>) -> Result<()> {
        let count = {
            let guard = session.lock().await;
            guard.channel_count()
        };
        for index in 0..count {
            self.media.remove_termination(session_id, index).await?;
        }
        Ok(())
    }
}
