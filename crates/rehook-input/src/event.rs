/// Discriminant of the one event kind the prebuilt hooks act on.
pub const SUBMIT: &str = "submit";

/// Immutable event record: a kind discriminant plus an optional payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    kind: String,
    value: Option<String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }

    pub fn with_value(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
        }
    }

    pub fn submit(value: impl Into<String>) -> Self {
        Self::with_value(SUBMIT, value)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_submit(&self) -> bool {
        self.kind == SUBMIT
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Missing payloads read as empty, for every event kind.
    pub fn value_or_default(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_payload_reads_as_empty() {
        assert_eq!(Event::new(SUBMIT).value(), None);
        assert_eq!(Event::new(SUBMIT).value_or_default(), "");
        assert_eq!(Event::new("keydown").value_or_default(), "");
        assert_eq!(Event::submit("hello").value_or_default(), "hello");
    }

    #[test]
    fn submit_constructor_sets_the_kind() {
        let event = Event::submit("a");
        assert!(event.is_submit());
        assert_eq!(event.kind(), SUBMIT);
        assert!(!Event::with_value("keydown", "x").is_submit());
    }
}
