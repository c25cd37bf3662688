use super::registry::{EventTable, MethodTable, ResourceRecord};

const METHODS: &[&str] = &[
    "SET-PARAMS",
    "GET-PARAMS",
    "DEFINE-GRAMMAR",
    "RECOGNIZE",
    "GET-RESULT",
    "START-INPUT-TIMERS",
    "STOP",
];

const EVENTS: &[&str] = &["START-OF-SPEECH", "RECOGNITION-COMPLETE"];

struct RecogMethods;
struct RecogEvents;

impl MethodTable for RecogMethods {
    fn method_id(&self, name: &str) -> Option<u16> {
        METHODS.iter().position(|m| m.eq_ignore_ascii_case(name)).map(|i| i as u16)
    }

    fn method_name(&self, id: u16) -> Option<&str> {
        METHODS.get(id as usize).copied()
    }
}

impl EventTable for RecogEvents {
    fn event_id(&self, name: &str) -> Option<u16> {
        EVENTS.iter().position(|e| e.eq_ignore_ascii_case(name)).map(|i| i as u16)
    }

    fn event_name(&self, id: u16) -> Option<&str> {
        EVENTS.get(id as usize).copied()
    }
}

pub fn recognizer_resource() -> ResourceRecord {
    ResourceRecord {
        name: "speechrecog".to_string(),
        methods: Box::new(RecogMethods),
        events: Box::new(RecogEvents),
    }
}

/// Recognizer completion-cause codes, carried in a RECOGNITION-COMPLETE
/// event's Completion-Cause header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecogCompletionCause {
    Success,
    NoMatch,
    NoInputTimeout,
    RecognitionTimeout,
    GrammarLoadFailure,
    GrammarCompileFailure,
    Error,
    SpeechTooEarly,
    TooMuchSpeechTimeout,
    UriFailure,
    LanguageUnsupported,
    Cancelled,
    SemanticsFailure,
}

impl RecogCompletionCause {
    pub fn code(self) -> u16 {
        match self {
            RecogCompletionCause::Success => 0,
            RecogCompletionCause::NoMatch => 1,
            RecogCompletionCause::NoInputTimeout => 2,
            RecogCompletionCause::RecognitionTimeout => 3,
            RecogCompletionCause::GrammarLoadFailure => 4,
            RecogCompletionCause::GrammarCompileFailure => 5,
            RecogCompletionCause::Error => 6,
            RecogCompletionCause::SpeechTooEarly => 7,
            RecogCompletionCause::TooMuchSpeechTimeout => 8,
            RecogCompletionCause::UriFailure => 9,
            RecogCompletionCause::LanguageUnsupported => 10,
            RecogCompletionCause::Cancelled => 11,
            RecogCompletionCause::SemanticsFailure => 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_method_names() {
        let resource = recognizer_resource();
        assert_eq!(resource.methods.method_id("RECOGNIZE"), Some(3));
        assert_eq!(resource.methods.method_name(3), Some("RECOGNIZE"));
    }

    #[test]
    fn resolves_events() {
        let resource = recognizer_resource();
        assert_eq!(resource.events.event_id("RECOGNITION-COMPLETE"), Some(1));
    }
}
