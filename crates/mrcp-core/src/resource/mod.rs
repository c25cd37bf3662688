pub mod recognizer;
pub mod registry;
pub mod synthesizer;

pub use recognizer::recognizer_resource;
pub use registry::{EventTable, MethodTable, ResourceRecord, ResourceRegistry};
pub use synthesizer::synthesizer_resource;

use crate::error::{Error, Result};
use crate::message::message::MrcpMessage;
use crate::message::start_line::StartLine;

/// Resolves a parsed message's method/event id against the resource named
/// by its channel identifier, mutating the start-line in place. Mirrors
/// associating a resource with a message once its factory has looked it
/// up by name.
pub fn resolve_message(registry: &ResourceRegistry, message: &mut MrcpMessage) -> Result<()> {
    let resource_name = message
        .channel_id
        .as_ref()
        .map(|id| id.resource_name.clone())
        .ok_or_else(|| Error::Invalid("message has no channel identifier to resolve a resource from".to_string()))?;

    let resource = registry
        .get(&resource_name)
        .ok_or_else(|| Error::UnknownResource(resource_name))?;

    match &message.start_line {
        StartLine::Request { method_name, .. } => {
            let id = resource
                .methods
                .method_id(method_name)
                .ok_or_else(|| Error::UnknownMethod(method_name.clone()))?;
            message.start_line.resolve_id(id);
        }
        StartLine::Event { event_name, .. } => {
            let id = resource
                .events
                .event_id(event_name)
                .ok_or_else(|| Error::UnknownEvent(event_name.clone()))?;
            message.start_line.resolve_id(id);
        }
        StartLine::Response { .. } => {}
    }
    Ok(())
}

pub fn default_registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    registry.register(synthesizer_resource());
    registry.register(recognizer_resource());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ChannelId, RequestId};
    use crate::version::MessageVersion;

    #[test]
    fn resolves_method_id_from_registered_resource() {
        let registry = default_registry();
        let mut message = MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V2,
            request_id: RequestId::new(1).unwrap(),
            method_id: None,
            method_name: "SPEAK".to_string(),
        })
        .with_channel_id(ChannelId::new("session1", "speechsynth"));

        resolve_message(&registry, &mut message).unwrap();
        match message.start_line {
            StartLine::Request { method_id, .. } => assert_eq!(method_id, Some(2)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn unknown_resource_name_is_an_error() {
        let registry = default_registry();
        let mut message = MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V2,
            request_id: RequestId::new(1).unwrap(),
            method_id: None,
            method_name: "SPEAK".to_string(),
        })
        .with_channel_id(ChannelId::new("session1", "unknownresource"));

        assert!(resolve_message(&registry, &mut message).is_err());
    }
}
