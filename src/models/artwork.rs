use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArtworkCard — Artwork provider card payload (`GET /cards/{id}`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkCard {
    pub id: String,
    #[serde(default)]
    pub local_id: Option<String>,
    pub name: String,
    /// Base asset path without quality/format suffix.
    #[serde(default)]
    pub image: Option<String>,
}

impl ArtworkCard {
    /// The set id half of the composite `setId-number` card id.
    pub fn set_id(&self) -> &str {
        match self.id.rsplit_once('-') {
            Some((set, _)) => set,
            None => &self.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    Low,
    High,
}

impl ImageQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageQuality::Low => "low",
            ImageQuality::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Webp,
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

// ---------------------------------------------------------------------------
// CardSuggestion — One card search result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSuggestion {
    pub id: String,
    pub name: String,
    /// Artwork-vocabulary set id.
    pub set: String,
    pub set_name: String,
    pub number: String,
    pub image_url: Option<String>,
    pub display_text: String,
}
