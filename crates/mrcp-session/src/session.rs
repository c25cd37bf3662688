use std::time::{Duration, Instant};

use tracing::debug;

use crate::channel::MrcpChannel;
use crate::descriptor::SessionDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    Server,
    Client,
}

/// An MRCP session: an id, a role, the control channels negotiated onto
/// it, and whichever offer/answer round is currently in flight.
///
/// Channel slots are never removed mid-vector, only cleared to `None` —
/// mirroring the reference session's channel array, which nulls a slot on
/// removal rather than shifting later entries, so an already-assigned
/// channel id never gets reused for a different channel.
pub struct MrcpSession {
    pub id: String,
    pub role: SessionRole,
    channels: Vec<Option<MrcpChannel>>,
    offer: Option<SessionDescriptor>,
    answer: Option<SessionDescriptor>,
    audio_terminations: usize,
    video_terminations: usize,
    terminated: bool,
    created_at: Instant,
    updated_at: Instant,
}

impl MrcpSession {
    pub fn new(id: impl Into<String>, role: SessionRole) -> Self {
        let now = Instant::now();
        MrcpSession {
            id: id.into(),
            role,
            channels: Vec::new(),
            offer: None,
            answer: None,
            audio_terminations: 0,
            video_terminations: 0,
            terminated: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn duration(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn mark_terminated(&mut self) {
        debug!(session = %self.id, "session terminated");
        self.terminated = true;
        self.touch();
    }

    pub fn channels(&self) -> impl Iterator<Item = &MrcpChannel> {
        self.channels.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut MrcpChannel> {
        self.channels.iter_mut().filter_map(|slot| slot.as_mut())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.channel_count() == 0
    }

    /// Appends a channel, returning its slot index.
    pub fn add_channel(&mut self, channel: MrcpChannel) -> usize {
        let index = self.channels.len();
        debug!(session = %self.id, channel = %channel.id, index, "channel added");
        self.channels.push(Some(channel));
        self.touch();
        index
    }

    pub fn channel_at(&self, index: usize) -> Option<&MrcpChannel> {
        self.channels.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn channel_at_mut(&mut self, index: usize) -> Option<&mut MrcpChannel> {
        self.channels.get_mut(index).and_then(|slot| slot.as_mut())
    }

    pub fn find_channel_mut(&mut self, channel_id: &str) -> Option<&mut MrcpChannel> {
        self.channels
            .iter_mut()
            .filter_map(|slot| slot.as_mut())
            .find(|c| c.id.to_string() == channel_id)
    }

    /// Clears a channel's slot without shifting the others.
    pub fn remove_channel(&mut self, channel_id: &str) -> bool {
        for slot in self.channels.iter_mut() {
            if slot.as_ref().map(|c| c.id.to_string() == channel_id).unwrap_or(false) {
                debug!(session = %self.id, channel = %channel_id, "channel removed");
                *slot = None;
                self.touch();
                return true;
            }
        }
        false
    }

    pub fn offer(&self) -> Option<&SessionDescriptor> {
        self.offer.as_ref()
    }

    pub fn has_offer_in_progress(&self) -> bool {
        self.offer.is_some()
    }

    pub fn begin_offer(&mut self, descriptor: SessionDescriptor) {
        debug!(session = %self.id, descriptor = %descriptor, "offer received");
        self.offer = Some(descriptor);
        self.answer = Some(SessionDescriptor::new());
        self.touch();
    }

    pub fn answer_mut(&mut self) -> Option<&mut SessionDescriptor> {
        self.answer.as_mut()
    }

    pub fn answer(&self) -> Option<&SessionDescriptor> {
        self.answer.as_ref()
    }

    /// Offer/answer round is ready to be sent once every media entry the
    /// offer named has a matching answer entry.
    pub fn answer_is_ready(&self) -> bool {
        match (&self.offer, &self.answer) {
            (Some(offer), Some(answer)) => {
                offer.control_media.len() == answer.control_media.len()
                    && offer.audio_media.len() == answer.audio_media.len()
                    && offer.video_media.len() == answer.video_media.len()
            }
            _ => false,
        }
    }

    /// Clears the in-flight offer/answer once the answer has been sent,
    /// recording how many audio/video terminations now actually exist so
    /// the next offer round knows which entries are modifies rather than
    /// adds.
    pub fn complete_offer(&mut self) -> Option<SessionDescriptor> {
        self.offer = None;
        if let Some(answer) = &self.answer {
            self.audio_terminations = answer.audio_media.len();
            self.video_terminations = answer.video_media.len();
        }
        self.touch();
        self.answer.take()
    }

    /// Number of audio terminations negotiated in prior offer/answer
    /// rounds; offer entries past this count are new, not modifies.
    pub fn audio_termination_count(&self) -> usize {
        self.audio_terminations
    }

    /// Number of video terminations negotiated in prior offer/answer
    /// rounds; offer entries past this count are new, not modifies.
    pub fn video_termination_count(&self) -> usize {
        self.video_terminations
    }

    fn touch(&mut self) {
        self.updated_at = Instant::now();
    }

    pub fn updated_at(&self) -> Instant {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ControlDescriptor;
    use mrcp_core::message::ChannelId;

    #[test]
    fn answer_is_ready_only_once_counts_match() {
        let mut session = MrcpSession::new("sess1", SessionRole::Server);
        let mut offer = SessionDescriptor::new();
        offer.add_control_media(ControlDescriptor::new("speechsynth"));
        session.begin_offer(offer);
        assert!(!session.answer_is_ready());

        session.answer_mut().unwrap().add_control_media(ControlDescriptor::new("speechsynth"));
        assert!(session.answer_is_ready());
    }

    #[test]
    fn removed_channel_slot_is_not_reused() {
        let mut session = MrcpSession::new("sess1", SessionRole::Server);
        let channel = MrcpChannel::new(ChannelId::new("sess1", "speechsynth")).unwrap();
        let index = session.add_channel(channel);
        session.remove_channel(&ChannelId::new("sess1", "speechsynth").to_string());
        assert!(session.channel_at(index).is_none());
        assert_eq!(session.channel_count(), 0);
    }
}
