use std::sync::Arc;

use mrcp_transport::ConnectionMux;
use tracing::{info, warn};
use uuid::Uuid;

use crate::channel::MrcpChannel;
use crate::descriptor::{ControlDescriptor, MediaDescriptor, SessionDescriptor};
use crate::error::{Error, Result};
use crate::media::MediaPipeline;
use crate::registry::SessionRegistry;
use crate::session::{MrcpSession, SessionRole};
use crate::signaling::SignalingAgent;

const SESSION_ID_LEN: usize = 16;

fn generate_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..SESSION_ID_LEN].to_string()
}

/// Server-side orchestrator: accepts offers, negotiates control channels
/// and AV media against a `MediaPipeline`, and sends answers back through
/// a `SignalingAgent` once every media entry in the offer has a matching
/// answer entry.
///
/// Mirrors the reference server session's offer/channel-modify/
/// termination-modify callbacks, which all converge on the same
/// "is the answer complete yet" check before actually sending it.
pub struct ServerSession {
    registry: Arc<SessionRegistry>,
    signaling: Arc<dyn SignalingAgent>,
    media: Arc<dyn MediaPipeline>,
    transport: Option<Arc<ConnectionMux>>,
}

impl ServerSession {
    pub fn new(signaling: Arc<dyn SignalingAgent>, media: Arc<dyn MediaPipeline>) -> Self {
        ServerSession {
            registry: Arc::new(SessionRegistry::new()),
            signaling,
            media,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: Arc<ConnectionMux>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Processes an incoming offer: on a session's first offer, allocates
    /// its id and registers it; on every offer, reconciles control
    /// channels and AV media against what's already live, then sends an
    /// answer as soon as every entry the offer named has a matching
    /// answer entry.
    ///
    /// Exactly one offer may be in flight per session at a time — a
    /// second offer arriving before the first's answer has gone out is
    /// rejected, mirroring the reference session's single in-flight-offer
    /// invariant.
    pub async fn process_offer(&self, session_id: Option<&str>, offer: SessionDescriptor) -> Result<String> {
        let (session_id, session) = match session_id {
            Some(id) => {
                let session = self.registry.get(id).ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
                (id.to_string(), session)
            }
            None => {
                let id = generate_session_id();
                let session = self.registry.create(id.clone(), SessionRole::Server);
                (id, session)
            }
        };

        {
            let guard = session.lock().await;
            if guard.has_offer_in_progress() {
                warn!(session = %session_id, "rejecting offer, one already in progress");
                return Err(Error::OfferInProgress(session_id));
            }
        }

        info!(session = %session_id, offer = %offer, "processing session offer");

        {
            let mut guard = session.lock().await;
            guard.begin_offer(offer.clone());
        }

        self.process_control_media_offer(&session_id, &session, &offer).await?;
        self.process_av_media_offer(&session_id, &session, &offer).await?;

        self.maybe_send_answer(&session_id, &session).await?;
        Ok(session_id)
    }

    async fn process_control_media_offer(
        &self,
        session_id: &str,
        session: &Arc<tokio::sync::Mutex<MrcpSession>>,
        offer: &SessionDescriptor,
    ) -> Result<()> {
        let existing_count = {
            let guard = session.lock().await;
            guard.channel_count()
        };
        let mut count = existing_count;
        if count > offer.control_media.len() {
            warn!(
                session = %session_id,
                existing = count,
                offered = offer.control_media.len(),
                "more control channels than control media in offer"
            );
            count = offer.control_media.len();
        }

        // modify existing channels in place
        for control in offer.control_media.iter().take(count) {
            let answer_entry = self.modify_control_channel(session_id, control).await?;
            let mut guard = session.lock().await;
            if let Some(answer) = guard.answer_mut() {
                answer.add_control_media(answer_entry);
            }
        }

        // append new channels for the remainder
        for control in offer.control_media.iter().skip(count) {
            let channel_id = mrcp_core::message::ChannelId::new(session_id, control.resource_name.clone());
            if let Some(transport) = &self.transport {
                transport.register_pending(channel_id.to_string());
            }
            let channel = MrcpChannel::new(channel_id)?;
            let mut guard = session.lock().await;
            guard.add_channel(channel);
            drop(guard);

            let mut answer_entry = ControlDescriptor::new(control.resource_name.clone());
            answer_entry.session_id = session_id.to_string();
            answer_entry.proto = control.proto;
            answer_entry.connection_type = control.connection_type;
            let mut guard = session.lock().await;
            if let Some(answer) = guard.answer_mut() {
                answer.add_control_media(answer_entry);
            }
        }
        Ok(())
    }

    async fn modify_control_channel(&self, session_id: &str, control: &ControlDescriptor) -> Result<ControlDescriptor> {
        let mut answer = ControlDescriptor::new(control.resource_name.clone());
        answer.session_id = session_id.to_string();
        answer.proto = control.proto;
        answer.connection_type = control.connection_type;
        Ok(answer)
    }

    async fn process_av_media_offer(
        &self,
        session_id: &str,
        session: &Arc<tokio::sync::Mutex<MrcpSession>>,
        offer: &SessionDescriptor,
    ) -> Result<()> {
        for (index, remote) in offer.audio_media.iter().enumerate() {
            let local = if index < self.existing_audio_count(session).await {
                self.media.modify_termination(session_id, index, remote).await?
            } else {
                self.media.add_termination(session_id, remote).await?
            };
            let mut guard = session.lock().await;
            if let Some(answer) = guard.answer_mut() {
                answer.add_audio_media(local);
            }
        }
        Ok(())
    }

    async fn existing_audio_count(&self, session: &Arc<tokio::sync::Mutex<MrcpSession>>) -> usize {
        session.lock().await.audio_termination_count()
    }

    async fn maybe_send_answer(&self, session_id: &str, session: &Arc<tokio::sync::Mutex<MrcpSession>>) -> Result<()> {
        let ready = {
            let guard = session.lock().await;
            guard.answer_is_ready()
        };
        if !ready {
            return Ok(());
        }
        let answer = {
            let mut guard = session.lock().await;
            guard.complete_offer()
        };
        if let Some(answer) = answer {
            self.signaling.send_answer(session_id, &answer).await?;
        }
        Ok(())
    }

    /// Processes a termination request: removes every channel and media
    /// termination, then reports back once the session is fully empty.
    pub async fn process_terminate(&self, session_id: &str) -> Result<()> {
        let session = self.registry.get(session_id).ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        info!(session = %session_id, "processing session terminate");

        let channel_ids: Vec<String> = {
            let guard = session.lock().await;
            guard.channels().map(|c| c.id.to_string()).collect()
        };
        for channel_id in &channel_ids {
            if let Some(transport) = &self.transport {
                transport.unbind_channel(channel_id);
            }
            let mut guard = session.lock().await;
            guard.remove_channel(channel_id);
        }

        {
            let mut guard = session.lock().await;
            guard.mark_terminated();
        }

        self.registry.remove(session_id);
        self.signaling.send_terminate_response(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct NullSignaling {
        answers: StdMutex<Vec<SessionDescriptor>>,
    }

    #[async_trait]
    impl SignalingAgent for NullSignaling {
        async fn send_answer(&self, _session_id: &str, answer: &SessionDescriptor) -> Result<()> {
            self.answers.lock().unwrap().push(answer.clone());
            Ok(())
        }
        async fn send_offer(&self, _session_id: &str, _offer: &SessionDescriptor) -> Result<()> {
            Ok(())
        }
        async fn send_terminate_response(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }
    }

    struct NullMedia;

    #[async_trait]
    impl MediaPipeline for NullMedia {
        async fn add_termination(&self, _session_id: &str, remote: &MediaDescriptor) -> Result<MediaDescriptor> {
            Ok(MediaDescriptor { ip: "127.0.0.1".to_string(), port: 9000, ..remote.clone() })
        }
        async fn modify_termination(&self, _session_id: &str, _index: usize, remote: &MediaDescriptor) -> Result<MediaDescriptor> {
            Ok(remote.clone())
        }
        async fn remove_termination(&self, _session_id: &str, _index: usize) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn offer_with_only_control_media_answers_immediately() {
        let signaling = Arc::new(NullSignaling { answers: StdMutex::new(Vec::new()) });
        let server = ServerSession::new(signaling.clone(), Arc::new(NullMedia));

        let mut offer = SessionDescriptor::new();
        offer.add_control_media(ControlDescriptor::new("speechsynth"));

        let session_id = server.process_offer(None, offer).await.unwrap();
        assert_eq!(signaling.answers.lock().unwrap().len(), 1);

        let session = server.registry().get(&session_id).unwrap();
        assert_eq!(session.lock().await.channel_count(), 1);
    }

    struct CountingMedia {
        adds: std::sync::atomic::AtomicUsize,
        modifies: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl MediaPipeline for CountingMedia {
        async fn add_termination(&self, _session_id: &str, remote: &MediaDescriptor) -> Result<MediaDescriptor> {
            self.adds.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(MediaDescriptor { ip: "127.0.0.1".to_string(), port: 9000, ..remote.clone() })
        }
        async fn modify_termination(&self, _session_id: &str, _index: usize, remote: &MediaDescriptor) -> Result<MediaDescriptor> {
            self.modifies.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(remote.clone())
        }
        async fn remove_termination(&self, _session_id: &str, _index: usize) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn modify_offer_reconfigures_existing_audio_termination_instead_of_adding() {
        let signaling = Arc::new(NullSignaling { answers: StdMutex::new(Vec::new()) });
        let media = Arc::new(CountingMedia {
            adds: std::sync::atomic::AtomicUsize::new(0),
            modifies: std::sync::atomic::AtomicUsize::new(0),
        });
        let server = ServerSession::new(signaling, media.clone());

        let mut first_offer = SessionDescriptor::new();
        first_offer.add_audio_media(MediaDescriptor { ip: "10.0.0.1".to_string(), port: 4000, ..Default::default() });
        let session_id = server.process_offer(None, first_offer).await.unwrap();
        assert_eq!(media.adds.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(media.modifies.load(std::sync::atomic::Ordering::SeqCst), 0);

        let mut second_offer = SessionDescriptor::new();
        second_offer.add_audio_media(MediaDescriptor { ip: "10.0.0.2".to_string(), port: 4002, ..Default::default() });
        server.process_offer(Some(&session_id), second_offer).await.unwrap();
        assert_eq!(media.adds.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(media.modifies.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_offer_before_answer_is_rejected() {
        let signaling = Arc::new(NullSignaling { answers: StdMutex::new(Vec::new()) });
        let server = ServerSession::new(signaling, Arc::new(NullMedia));

        let registry = server.registry();
        let session_id = "preexisting".to_string();
        let session = registry.create(session_id.clone(), SessionRole::Server);
        session.lock().await.begin_offer(SessionDescriptor::new());

        let mut offer = SessionDescriptor::new();
        offer.add_control_media(ControlDescriptor::new("speechsynth"));
        let result = server.process_offer(Some(&session_id), offer).await;
        assert!(result.is_err());
    }
}
