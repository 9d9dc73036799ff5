/// Kind of activation event a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EventKind {
    /// Mouse click (or keyboard activation).
    #[default]
    Click,
    /// Touch start on touch devices.
    Touch,
}

/// High-level event with element targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// ID of the element the event was fired on.
    pub target: String,
}

impl Event {
    pub fn new(kind: EventKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn touch(target: impl Into<String>) -> Self {
        Self::new(EventKind::Touch, target)
    }
}
