//! Per-side decision table.

use std::fmt;

/// What to do with one sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideAction {
    Noop,
    Create,
    Update,
    Delete,
}

impl SideAction {
    /// Decide from the caller's desired flag and the probed existence.
    ///
    /// | desired | exists | action |
    /// |---|---|---|
    /// | `None` | any | noop |
    /// | `false` | `false` | noop |
    /// | `false` | `true` | delete |
    /// | `true` | `false` | create, or noop without a payload |
    /// | `true` | `true` | update, or noop without a payload |
    #[must_use]
    pub fn decide(desired: Option<bool>, exists: bool, has_payload: bool) -> Self {
        match (desired, exists) {
            (None, _) | (Some(false), false) => Self::Noop,
            (Some(false), true) => Self::Delete,
            (Some(true), false) if has_payload => Self::Create,
            (Some(true), true) if has_payload => Self::Update,
            (Some(true), _) => Self::Noop,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SideAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
