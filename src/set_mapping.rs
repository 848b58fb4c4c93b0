//! Static translation tables between the three set-id vocabularies.
//!
//! The pricing vocabulary is the hub: display names and artwork ids are mapped
//! onto pricing ids, and pricing ids onto artwork ids. Every lookup is a hash
//! map probe; a missing key is reported as `None` / [`TrackerError::UnmappedSet`]
//! and is never replaced by the input or a near match.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::error::{Result, TrackerError};
use crate::models::{SetInfo, SetRef, SetSelection, SetVocabulary};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Artwork-provider id (every written variant) -> pricing-provider id.
const ARTWORK_TO_PRICING: &[(&str, &str)] = &[
    // Base era
    ("base1", "base1"), ("base2", "base2"), ("base4", "base4"),
    ("jungle", "base2"), ("fossil", "base3"), ("tr", "base5"),
    ("gym1", "gym1"), ("gym2", "gym2"), ("lc", "base6"),
    // Neo
    ("neo1", "neo1"), ("neo2", "neo2"), ("neo3", "neo3"), ("neo4", "neo4"),
    // e-Card
    ("ecard1", "ecard1"), ("ecard2", "ecard2"), ("ecard3", "ecard3"),
    // Ruby & Sapphire
    ("ex1", "ex1"), ("ex2", "ex2"), ("ex3", "ex3"), ("ex4", "ex4"),
    ("ex5", "ex5"), ("ex6", "ex6"), ("ex7", "ex7"), ("ex8", "ex8"),
    ("ex9", "ex9"), ("ex10", "ex10"), ("ex11", "ex11"), ("ex12", "ex12"),
    ("ex13", "ex13"), ("ex14", "ex14"), ("ex15", "ex15"), ("ex16", "ex16"),
    // Diamond & Pearl
    ("dp1", "dp1"), ("dp2", "dp2"), ("dp3", "dp3"), ("dp4", "dp4"),
    ("dp5", "dp5"), ("dp6", "dp6"), ("dp7", "dp7"),
    // Platinum
    ("pl1", "pl1"), ("pl2", "pl2"), ("pl3", "pl3"), ("pl4", "pl4"),
    // HeartGold & SoulSilver
    ("hgss1", "hgss1"), ("hgss2", "hgss2"), ("hgss3", "hgss3"), ("hgss4", "hgss4"),
    // Black & White
    ("bw1", "bw1"), ("bw2", "bw2"), ("bw3", "bw3"), ("bw4", "bw4"), ("bw5", "bw5"),
    ("bw6", "bw6"), ("bw7", "bw7"), ("bw8", "bw8"), ("bw9", "bw9"), ("bw10", "bw10"),
    ("bw11", "bw11"),
    // XY
    ("xy1", "xy1"), ("xy2", "xy2"), ("xy3", "xy3"), ("xy4", "xy4"), ("xy5", "xy5"),
    ("xy6", "xy6"), ("xy7", "xy7"), ("xy8", "xy8"), ("xy9", "xy9"), ("xy10", "xy10"),
    ("xy11", "xy11"), ("xy12", "xy12"),
    // Sun & Moon
    ("sm1", "sm1"), ("sm2", "sm2"), ("sm3", "sm3"),
    ("sm35", "sm35"), ("sm3.5", "sm35"), ("sm3pt5", "sm35"),
    ("sm4", "sm4"), ("sm5", "sm5"), ("sm6", "sm6"), ("sm7", "sm7"),
    ("sm75", "sm75"), ("sm7.5", "sm75"), ("sm7pt5", "sm75"),
    ("sm8", "sm8"), ("sm9", "sm9"), ("det1", "det1"), ("sm10", "sm10"), ("sm11", "sm11"),
    ("sm115", "sm115"), ("sm11.5", "sm115"), ("sm11pt5", "sm115"),
    ("sm12", "sm12"),
    // Sword & Shield
    ("swsh1", "swsh1"), ("swsh2", "swsh2"), ("swsh3", "swsh3"),
    ("swsh35", "swsh35"), ("swsh3.5", "swsh35"), ("swsh3pt5", "swsh35"),
    ("swsh4", "swsh4"),
    ("swsh45", "swsh45"), ("swsh4.5", "swsh45"), ("swsh4pt5", "swsh45"),
    ("swsh5", "swsh5"), ("swsh6", "swsh6"), ("swsh7", "swsh7"), ("swsh8", "swsh8"),
    ("swsh9", "swsh9"), ("swsh10", "swsh10"), ("swsh10.5", "swsh10"),
    ("swsh11", "swsh11"), ("swsh12", "swsh12"),
    ("swsh12pt5", "swsh12pt5"), ("swsh12.5", "swsh12pt5"),
    // Scarlet & Violet
    ("sv1", "sv1"), ("sv01", "sv1"), ("sv2", "sv2"), ("sv02", "sv2"),
    ("sv3", "sv3"), ("sv03", "sv3"),
    ("sv3pt5", "sv3pt5"), ("sv3.5", "sv3pt5"), ("sv03.5", "sv3pt5"), ("sv03pt5", "sv3pt5"),
    ("sv4", "sv4"), ("sv04", "sv4"),
    ("sv4pt5", "sv4pt5"), ("sv4.5", "sv4pt5"), ("sv04.5", "sv4pt5"), ("sv04pt5", "sv4pt5"),
    ("sv5", "sv5"), ("sv05", "sv5"), ("sv6", "sv6"), ("sv06", "sv6"),
    ("sv6pt5", "sv6pt5"), ("sv6.5", "sv6pt5"), ("sv06.5", "sv6pt5"), ("sv06pt5", "sv6pt5"),
    ("sv7", "sv7"), ("sv07", "sv7"), ("sv8", "sv8"), ("sv08", "sv8"),
    ("sv8pt5", "sv8pt5"), ("sv8.5", "sv8pt5"), ("sv08.5", "sv8pt5"), ("sv08pt5", "sv8pt5"),
    ("sv9", "sv9"), ("sv09", "sv9"),
];

/// Pricing-provider id -> artwork-provider id, where the artwork provider
/// spells the set differently. Other known pricing ids are shared verbatim.
const PRICING_TO_ARTWORK_OVERRIDES: &[(&str, &str)] = &[
    ("sm35", "sm3.5"),
    ("sm75", "sm7.5"),
    ("sm115", "sm11.5"),
    ("swsh35", "swsh3.5"),
    ("swsh45", "swsh4.5"),
    ("swsh12pt5", "swsh12.5"),
    ("sv1", "sv01"),
    ("sv2", "sv02"),
    ("sv3", "sv03"),
    ("sv3pt5", "sv03.5"),
    ("sv4", "sv04"),
    ("sv4pt5", "sv04.5"),
    ("sv5", "sv05"),
    ("sv6", "sv06"),
    ("sv6pt5", "sv06.5"),
    ("sv7", "sv07"),
    ("sv8", "sv08"),
    ("sv8pt5", "sv08.5"),
    ("sv9", "sv09"),
];

/// Display slugs -> pricing-provider id.
const DISPLAY_TO_PRICING: &[(&str, &str)] = &[
    ("base-set", "base1"),
    ("jungle", "base2"),
    ("fossil", "base3"),
    ("base-set-2", "base4"),
    ("team-rocket", "base5"),
    ("sword-shield", "swsh1"),
    ("rebel-clash", "swsh2"),
    ("darkness-ablaze", "swsh3"),
    ("vivid-voltage", "swsh4"),
    ("battle-styles", "swsh5"),
    ("chilling-reign", "swsh6"),
    ("evolving-skies", "swsh7"),
    ("fusion-strike", "swsh8"),
    ("brilliant-stars", "swsh9"),
    ("astral-radiance", "swsh10"),
    ("lost-origin", "swsh11"),
    ("silver-tempest", "swsh12"),
    ("scarlet-violet", "sv1"),
    ("paldea-evolved", "sv2"),
    ("obsidian-flames", "sv3"),
    ("paradox-rift", "sv4"),
    ("temporal-forces", "sv5"),
];

/// Built-in set catalog (pricing ids), used when the provider's set list is
/// unreachable.
pub const FALLBACK_SETS: &[(&str, &str)] = &[
    // Base era (1999-2000)
    ("base1", "Base Set"),
    ("base2", "Jungle"),
    ("base3", "Fossil"),
    ("base4", "Base Set 2"),
    ("base5", "Team Rocket"),
    ("gym1", "Gym Heroes"),
    ("gym2", "Gym Challenge"),
    // Neo era
    ("neo1", "Neo Genesis"),
    ("neo2", "Neo Discovery"),
    ("neo3", "Neo Revelation"),
    ("neo4", "Neo Destiny"),
    ("base6", "Legendary Collection"),
    // e-Card era
    ("ecard1", "Expedition Base Set"),
    ("ecard2", "Aquapolis"),
    ("ecard3", "Skyridge"),
    // EX era
    ("ex1", "Ruby & Sapphire"),
    ("ex2", "Sandstorm"),
    ("ex3", "Dragon"),
    ("ex4", "Team Magma vs Team Aqua"),
    ("ex5", "Hidden Legends"),
    ("ex6", "FireRed & LeafGreen"),
    ("ex7", "Team Rocket Returns"),
    ("ex8", "Deoxys"),
    ("ex9", "Emerald"),
    ("ex10", "Unseen Forces"),
    ("ex11", "Delta Species"),
    ("ex12", "Legend Maker"),
    ("ex13", "Holon Phantoms"),
    ("ex14", "Crystal Guardians"),
    ("ex15", "Dragon Frontiers"),
    ("ex16", "Power Keepers"),
    // Diamond & Pearl era
    ("dp1", "Diamond & Pearl"),
    ("dp2", "Mysterious Treasures"),
    ("dp3", "Secret Wonders"),
    ("dp4", "Great Encounters"),
    ("dp5", "Majestic Dawn"),
    ("dp6", "Legends Awakened"),
    ("dp7", "Stormfront"),
    // Platinum era
    ("pl1", "Platinum"),
    ("pl2", "Rising Rivals"),
    ("pl3", "Supreme Victors"),
    ("pl4", "Arceus"),
    // HeartGold & SoulSilver era
    ("hgss1", "HeartGold & SoulSilver"),
    ("hgss2", "Unleashed"),
    ("hgss3", "Undaunted"),
    ("hgss4", "Triumphant"),
    // Black & White era
    ("bw1", "Black & White"),
    ("bw2", "Emerging Powers"),
    ("bw3", "Noble Victories"),
    ("bw4", "Next Destinies"),
    ("bw5", "Dark Explorers"),
    ("bw6", "Dragons Exalted"),
    ("bw7", "Boundaries Crossed"),
    ("bw8", "Plasma Storm"),
    ("bw9", "Plasma Freeze"),
    ("bw10", "Plasma Blast"),
    ("bw11", "Legendary Treasures"),
    // XY era
    ("xy1", "XY"),
    ("xy2", "Flashfire"),
    ("xy3", "Furious Fists"),
    ("xy4", "Phantom Forces"),
    ("xy5", "Primal Clash"),
    ("xy6", "Roaring Skies"),
    ("xy7", "Ancient Origins"),
    ("xy8", "BREAKthrough"),
    ("xy9", "BREAKpoint"),
    ("xy10", "Fates Collide"),
    ("xy11", "Steam Siege"),
    ("xy12", "Evolutions"),
    // Sun & Moon era
    ("sm1", "Sun & Moon"),
    ("sm2", "Guardians Rising"),
    ("sm3", "Burning Shadows"),
    ("sm35", "Shining Legends"),
    ("sm4", "Crimson Invasion"),
    ("sm5", "Ultra Prism"),
    ("sm6", "Forbidden Light"),
    ("sm7", "Celestial Storm"),
    ("sm75", "Dragon Majesty"),
    ("sm8", "Lost Thunder"),
    ("sm9", "Team Up"),
    ("det1", "Detective Pikachu"),
    ("sm10", "Unbroken Bonds"),
    ("sm11", "Unified Minds"),
    ("sm115", "Hidden Fates"),
    ("sm12", "Cosmic Eclipse"),
    // Sword & Shield era
    ("swsh1", "Sword & Shield"),
    ("swsh2", "Rebel Clash"),
    ("swsh3", "Darkness Ablaze"),
    ("swsh35", "Champion's Path"),
    ("swsh4", "Vivid Voltage"),
    ("swsh45", "Shining Fates"),
    ("swsh5", "Battle Styles"),
    ("swsh6", "Chilling Reign"),
    ("swsh7", "Evolving Skies"),
    ("swsh8", "Fusion Strike"),
    ("swsh9", "Brilliant Stars"),
    ("swsh10", "Astral Radiance"),
    ("swsh11", "Lost Origin"),
    ("swsh12", "Silver Tempest"),
    ("swsh12pt5", "Crown Zenith"),
    // Scarlet & Violet era
    ("sv1", "Scarlet & Violet Base Set"),
    ("sv2", "Paldea Evolved"),
    ("sv3", "Obsidian Flames"),
    ("sv3pt5", "151"),
    ("sv4", "Paradox Rift"),
    ("sv4pt5", "Paldean Fates"),
    ("sv5", "Temporal Forces"),
    ("sv6", "Twilight Masquerade"),
    ("sv6pt5", "Shrouded Fable"),
    ("sv7", "Stellar Crown"),
    ("sv8", "Surging Sparks"),
    ("sv8pt5", "Prismatic Evolutions"),
    ("sv9", "Journey Together"),
];

lazy_static! {
    static ref ARTWORK_TO_PRICING_MAP: HashMap<&'static str, &'static str> =
        ARTWORK_TO_PRICING.iter().copied().collect();
    static ref PRICING_TO_ARTWORK_MAP: HashMap<&'static str, &'static str> =
        PRICING_TO_ARTWORK_OVERRIDES.iter().copied().collect();
    static ref DISPLAY_TO_PRICING_MAP: HashMap<&'static str, &'static str> =
        DISPLAY_TO_PRICING.iter().copied().collect();
    static ref PRICING_NAMES: HashMap<&'static str, &'static str> =
        FALLBACK_SETS.iter().copied().collect();
    static ref NAME_TO_PRICING: HashMap<String, &'static str> = FALLBACK_SETS
        .iter()
        .map(|(id, name)| (name.to_lowercase(), *id))
        .collect();
    static ref KNOWN_PRICING_IDS: HashSet<&'static str> = ARTWORK_TO_PRICING
        .iter()
        .map(|(_, pricing)| *pricing)
        .chain(FALLBACK_SETS.iter().map(|(id, _)| *id))
        .collect();
}

/// The built-in catalog as owned [`SetInfo`] values.
pub fn fallback_sets() -> Vec<SetInfo> {
    FALLBACK_SETS
        .iter()
        .map(|(id, name)| SetInfo::new(*id, *name))
        .collect()
}

// ---------------------------------------------------------------------------
// SetIdMapper
// ---------------------------------------------------------------------------

/// Translates set ids between vocabularies and matches sets against a
/// candidate list.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetIdMapper;

impl SetIdMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map `source_id` written in `from` into the `to` vocabulary.
    ///
    /// Returns `None` when no table carries the id. Identity mappings only
    /// apply when the id is known to exist in the target vocabulary.
    pub fn map_set_id(&self, source_id: &str, from: SetVocabulary, to: SetVocabulary) -> Option<String> {
        let pricing = self.pricing_id(source_id, from)?;
        match to {
            SetVocabulary::Pricing => Some(pricing.to_string()),
            SetVocabulary::Artwork => self.artwork_for_pricing(pricing).map(str::to_string),
            SetVocabulary::Display => PRICING_NAMES.get(pricing).map(|name| name.to_string()),
        }
    }

    /// Hub step: resolve any vocabulary to a pricing id.
    fn pricing_id(&self, source_id: &str, from: SetVocabulary) -> Option<&'static str> {
        let id = source_id.trim();
        match from {
            SetVocabulary::Pricing => KNOWN_PRICING_IDS
                .get(id)
                .copied()
                .or_else(|| ARTWORK_TO_PRICING_MAP.get(id).copied()),
            SetVocabulary::Artwork => ARTWORK_TO_PRICING_MAP.get(id).copied(),
            SetVocabulary::Display => {
                let lowered = id.to_lowercase();
                DISPLAY_TO_PRICING_MAP
                    .get(lowered.as_str())
                    .copied()
                    .or_else(|| NAME_TO_PRICING.get(&lowered).copied())
            }
        }
    }

    fn artwork_for_pricing(&self, pricing: &str) -> Option<&'static str> {
        PRICING_TO_ARTWORK_MAP
            .get(pricing)
            .copied()
            .or_else(|| KNOWN_PRICING_IDS.get(pricing).copied())
    }

    /// Resolve a set reference into the pricing vocabulary.
    ///
    /// Pricing ids written in a decimal variant (`sv6.5`, `sv06.5`) are
    /// normalized. Unknown pricing ids pass through, since the live catalog
    /// may carry sets newer than this build.
    pub fn to_pricing(&self, set: &SetRef) -> Result<String> {
        if set.vocabulary == SetVocabulary::Pricing {
            let id = set.id.trim();
            return Ok(self
                .pricing_id(id, SetVocabulary::Pricing)
                .unwrap_or(id)
                .to_string());
        }
        self.map_set_id(&set.id, set.vocabulary, SetVocabulary::Pricing)
            .ok_or_else(|| unmapped(&set.id, SetVocabulary::Pricing))
    }

    /// Resolve a set reference into the artwork vocabulary.
    pub fn to_artwork(&self, set: &SetRef) -> Result<String> {
        if set.vocabulary == SetVocabulary::Artwork {
            return Ok(set.id.trim().to_string());
        }
        self.map_set_id(&set.id, set.vocabulary, SetVocabulary::Artwork)
            .ok_or_else(|| unmapped(&set.id, SetVocabulary::Artwork))
    }

    /// Match an artwork-vocabulary set against pricing-vocabulary candidates.
    ///
    /// Tiers are tried in order and the first hit wins:
    /// 1. `source_id` equals a candidate id.
    /// 2. `source_id` maps through the artwork table onto a candidate id.
    /// 3. A candidate's name contains `source_name`, or the reverse
    ///    (case-insensitive); candidates are scanned in list order and the
    ///    first containment stops the scan.
    pub fn select_set(&self, source_id: &str, source_name: Option<&str>, candidates: &[SetInfo]) -> SetSelection {
        if let Some(c) = candidates.iter().find(|c| c.id == source_id) {
            return SetSelection::Exact(c.id.clone());
        }

        if let Some(mapped) = ARTWORK_TO_PRICING_MAP.get(source_id) {
            if let Some(c) = candidates.iter().find(|c| c.id == *mapped) {
                return SetSelection::Mapped(c.id.clone());
            }
        }

        let search = match source_name.map(|n| n.trim().to_lowercase()) {
            Some(s) if !s.is_empty() => s,
            _ => return SetSelection::Unresolved,
        };
        for c in candidates {
            let option = c.name.trim().to_lowercase();
            if option.is_empty() {
                continue;
            }
            if option.contains(&search) || search.contains(&option) {
                return SetSelection::NameMatch(c.id.clone());
            }
        }

        SetSelection::Unresolved
    }
}

fn unmapped(set_id: &str, vocabulary: SetVocabulary) -> TrackerError {
    TrackerError::UnmappedSet {
        set_id: set_id.to_string(),
        vocabulary: vocabulary.to_string(),
    }
}
