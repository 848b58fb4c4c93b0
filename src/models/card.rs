use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SetVocabulary — Which identifier scheme a set id is written in
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetVocabulary {
    /// Human-facing names and slugs ("Sword & Shield", "sword-shield").
    Display,
    /// Pricing-provider ids ("swsh1", "sv6pt5").
    Pricing,
    /// Artwork-provider ids ("sv06.5", "swsh12.5").
    Artwork,
}

impl fmt::Display for SetVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetVocabulary::Display => "display",
            SetVocabulary::Pricing => "pricing",
            SetVocabulary::Artwork => "artwork",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// SetRef / CardIdentity — What a caller asks about
// ---------------------------------------------------------------------------

/// A set id tagged with the vocabulary it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetRef {
    pub id: String,
    pub vocabulary: SetVocabulary,
}

impl SetRef {
    pub fn new(id: impl Into<String>, vocabulary: SetVocabulary) -> Self {
        Self {
            id: id.into(),
            vocabulary,
        }
    }

    pub fn pricing(id: impl Into<String>) -> Self {
        Self::new(id, SetVocabulary::Pricing)
    }

    pub fn artwork(id: impl Into<String>) -> Self {
        Self::new(id, SetVocabulary::Artwork)
    }

    pub fn display(id: impl Into<String>) -> Self {
        Self::new(id, SetVocabulary::Display)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIdentity {
    pub name: String,
    pub set: SetRef,
    /// Free-form collector number ("25", "25/102", "TG20", "SV001/SV198").
    pub number: String,
}

impl CardIdentity {
    pub fn new(name: impl Into<String>, set: SetRef, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            set,
            number: number.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Card — A portfolio entry as persisted by the portfolio store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    /// Pricing-vocabulary set id.
    pub set: String,
    /// Parsed collector number used for lookups.
    pub number: String,
    /// Number as the user typed it (e.g. "25/102").
    pub display_number: String,
    pub quantity: u32,
    /// `None` renders as "price not available", never as zero.
    pub current_price: Option<f64>,
    pub image_url: Option<String>,
    pub date_added: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Card {
    pub fn identity(&self) -> CardIdentity {
        CardIdentity::new(&self.name, SetRef::pricing(&self.set), &self.number)
    }

    /// Portfolio duplicate rule: same normalized name, same set, and any pairing
    /// of the parsed and display number forms equal.
    pub fn is_same_printing(&self, other: &Card) -> bool {
        let name_match =
            self.name.trim().to_lowercase() == other.name.trim().to_lowercase();
        let set_match = self.set == other.set;
        let number_match = self.number == other.number
            || self.display_number == other.display_number
            || self.number == other.display_number
            || self.display_number == other.number;
        name_match && set_match && number_match
    }
}

// ---------------------------------------------------------------------------
// NewCard — Input for adding a card to a portfolio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub name: String,
    /// Pricing-vocabulary set id (the dropdown value).
    pub set: String,
    pub number: String,
    pub quantity: u32,
    pub display_number: Option<String>,
    /// Artwork-vocabulary set id carried over from search, if known.
    pub original_set_id: Option<String>,
}
