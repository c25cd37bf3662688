use std::collections::HashMap;

/// A resource's method and event name tables, resolved once per message
/// rather than baked into the wire grammar — mirrors the factory pattern
/// of associating a resource with a message only after the channel
/// identifier names it.
pub trait MethodTable: Send + Sync {
    fn method_id(&self, name: &str) -> Option<u16>;
    fn method_name(&self, id: u16) -> Option<&str>;
}

pub trait EventTable: Send + Sync {
    fn event_id(&self, name: &str) -> Option<u16>;
    fn event_name(&self, id: u16) -> Option<&str>;
}

pub struct ResourceRecord {
    pub name: String,
    pub methods: Box<dyn MethodTable>,
    pub events: Box<dyn EventTable>,
}

/// Process-wide table of known resources, keyed by the lower-cased name
/// carried in a channel identifier's resource part.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, ResourceRecord>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: ResourceRecord) {
        self.resources.insert(record.name.to_ascii_lowercase(), record);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceRecord> {
        self.resources.get(&name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::synthesizer::synthesizer_resource;

    #[test]
    fn registers_and_looks_up_case_insensitively() {
        let mut registry = ResourceRegistry::new();
        registry.register(synthesizer_resource());
        assert!(registry.get("SpeechSynth").is_some());
        assert!(registry.get("speechrecog").is_none());
    }
}
