use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SetInfo — One entry of the set catalog (pricing-provider ids)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInfo {
    pub id: String,
    pub name: String,
}

impl SetInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SetSelection — Outcome of matching a set against a candidate list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "id", rename_all = "kebab-case")]
pub enum SetSelection {
    /// The source id is itself a candidate id.
    Exact(String),
    /// The source id maps through the cross-vocabulary table onto a candidate.
    Mapped(String),
    /// A candidate's display name contains, or is contained in, the source name.
    NameMatch(String),
    /// No tier matched; the caller must ask the user.
    Unresolved,
}

impl SetSelection {
    pub fn id(&self) -> Option<&str> {
        match self {
            SetSelection::Exact(id) | SetSelection::Mapped(id) | SetSelection::NameMatch(id) => {
                Some(id)
            }
            SetSelection::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SetSelection::Unresolved)
    }
}
