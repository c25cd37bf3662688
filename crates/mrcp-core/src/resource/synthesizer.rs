use super::registry::{EventTable, MethodTable, ResourceRecord};

/// Synthesizer method ids, in the fixed order a request's method-id
/// indexes into.
const METHODS: &[&str] = &[
    "SET-PARAMS",
    "GET-PARAMS",
    "SPEAK",
    "STOP",
    "PAUSE",
    "RESUME",
    "BARGE-IN-OCCURRED",
    "CONTROL",
    "DEFINE-LEXICON",
];

const EVENTS: &[&str] = &["SPEECH-MARKER", "SPEAK-COMPLETE"];

struct SynthMethods;
struct SynthEvents;

impl MethodTable for SynthMethods {
    fn method_id(&self, name: &str) -> Option<u16> {
        METHODS.iter().position(|m| m.eq_ignore_ascii_case(name)).map(|i| i as u16)
    }

    fn method_name(&self, id: u16) -> Option<&str> {
        METHODS.get(id as usize).copied()
    }
}

impl EventTable for SynthEvents {
    fn event_id(&self, name: &str) -> Option<u16> {
        EVENTS.iter().position(|e| e.eq_ignore_ascii_case(name)).map(|i| i as u16)
    }

    fn event_name(&self, id: u16) -> Option<&str> {
        EVENTS.get(id as usize).copied()
    }
}

pub fn synthesizer_resource() -> ResourceRecord {
    ResourceRecord {
        name: "speechsynth".to_string(),
        methods: Box::new(SynthMethods),
        events: Box::new(SynthEvents),
    }
}

/// Synthesizer completion-cause codes, carried in a SPEAK-COMPLETE event's
/// Completion-Cause header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthCompletionCause {
    Normal,
    BargeIn,
    ParseFailure,
    UriFailure,
    Error,
    LanguageUnsupported,
    LexiconLoadFailure,
    Cancelled,
}

impl SynthCompletionCause {
    pub fn code(self) -> u16 {
        match self {
            SynthCompletionCause::Normal => 0,
            SynthCompletionCause::BargeIn => 1,
            SynthCompletionCause::ParseFailure => 2,
            SynthCompletionCause::UriFailure => 3,
            SynthCompletionCause::Error => 4,
            SynthCompletionCause::LanguageUnsupported => 5,
            SynthCompletionCause::LexiconLoadFailure => 6,
            SynthCompletionCause::Cancelled => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_method_names_case_insensitively() {
        let resource = synthesizer_resource();
        assert_eq!(resource.methods.method_id("speak"), Some(2));
        assert_eq!(resource.methods.method_id("STOP"), Some(3));
        assert_eq!(resource.methods.method_name(2), Some("SPEAK"));
    }

    #[test]
    fn unknown_method_resolves_to_none() {
        let resource = synthesizer_resource();
        assert_eq!(resource.methods.method_id("RECOGNIZE"), None);
    }

    #[test]
    fn resolves_events() {
        let resource = synthesizer_resource();
        assert_eq!(resource.events.event_id("speak-complete"), Some(1));
    }
}
