//! Set-id translation and three-tier set selection tests.

use pokevault::models::{SetInfo, SetRef, SetSelection, SetVocabulary};
use pokevault::set_mapping::fallback_sets;
use pokevault::{SetIdMapper, TrackerError};

fn candidates() -> Vec<SetInfo> {
    vec![
        SetInfo::new("base1", "Base Set"),
        SetInfo::new("sv6pt5", "Shrouded Fable"),
        SetInfo::new("swsh12pt5", "Crown Zenith"),
        SetInfo::new("sv3pt5", "151"),
    ]
}

// ---------------------------------------------------------------------------
// map_set_id
// ---------------------------------------------------------------------------

#[test]
fn decimal_variants_share_one_canonical_id() {
    let mapper = SetIdMapper::new();
    for variant in ["sv6.5", "sv06.5", "sv06pt5", "sv6pt5"] {
        assert_eq!(
            mapper.map_set_id(variant, SetVocabulary::Artwork, SetVocabulary::Pricing),
            Some("sv6pt5".to_string()),
            "variant {}",
            variant
        );
    }
}

#[test]
fn zero_padded_artwork_ids_map_to_pricing() {
    let mapper = SetIdMapper::new();
    assert_eq!(
        mapper.map_set_id("sv01", SetVocabulary::Artwork, SetVocabulary::Pricing),
        Some("sv1".to_string())
    );
    assert_eq!(
        mapper.map_set_id("jungle", SetVocabulary::Artwork, SetVocabulary::Pricing),
        Some("base2".to_string())
    );
}

#[test]
fn pricing_maps_to_artwork_spelling() {
    let mapper = SetIdMapper::new();
    assert_eq!(
        mapper.map_set_id("sv6pt5", SetVocabulary::Pricing, SetVocabulary::Artwork),
        Some("sv06.5".to_string())
    );
    assert_eq!(
        mapper.map_set_id("base1", SetVocabulary::Pricing, SetVocabulary::Artwork),
        Some("base1".to_string())
    );
}

#[test]
fn display_slugs_and_names_map_to_pricing() {
    let mapper = SetIdMapper::new();
    assert_eq!(
        mapper.map_set_id("sword-shield", SetVocabulary::Display, SetVocabulary::Pricing),
        Some("swsh1".to_string())
    );
    assert_eq!(
        mapper.map_set_id("Base Set", SetVocabulary::Display, SetVocabulary::Pricing),
        Some("base1".to_string())
    );
}

#[test]
fn unknown_ids_are_not_guessed() {
    let mapper = SetIdMapper::new();
    assert_eq!(
        mapper.map_set_id("sv99.5", SetVocabulary::Artwork, SetVocabulary::Pricing),
        None
    );
    assert_eq!(
        mapper.map_set_id("not-a-set", SetVocabulary::Display, SetVocabulary::Artwork),
        None
    );
}

// ---------------------------------------------------------------------------
// to_pricing / to_artwork
// ---------------------------------------------------------------------------

#[test]
fn to_pricing_passes_pricing_ids_through() {
    let mapper = SetIdMapper::new();
    assert_eq!(mapper.to_pricing(&SetRef::pricing("sv10")).unwrap(), "sv10");
    assert_eq!(mapper.to_pricing(&SetRef::artwork("sv06.5")).unwrap(), "sv6pt5");
}

#[test]
fn to_pricing_normalizes_decimal_pricing_ids() {
    let mapper = SetIdMapper::new();
    for variant in ["sv6.5", "sv06.5", "sv06pt5"] {
        assert_eq!(
            mapper.to_pricing(&SetRef::pricing(variant)).unwrap(),
            "sv6pt5",
            "variant {}",
            variant
        );
    }
    assert_eq!(
        mapper.map_set_id("sv6.5", SetVocabulary::Pricing, SetVocabulary::Artwork),
        Some("sv06.5".to_string())
    );
    assert_eq!(mapper.to_pricing(&SetRef::pricing("swsh45")).unwrap(), "swsh45");
}

#[test]
fn to_pricing_reports_unmapped_set() {
    let mapper = SetIdMapper::new();
    let err = mapper.to_pricing(&SetRef::artwork("mystery")).unwrap_err();
    match err {
        TrackerError::UnmappedSet { set_id, vocabulary } => {
            assert_eq!(set_id, "mystery");
            assert_eq!(vocabulary, "pricing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn to_artwork_from_pricing() {
    let mapper = SetIdMapper::new();
    assert_eq!(mapper.to_artwork(&SetRef::pricing("swsh12pt5")).unwrap(), "swsh12.5");
    assert!(mapper.to_artwork(&SetRef::pricing("unknown")).is_err());
}

// ---------------------------------------------------------------------------
// select_set
// ---------------------------------------------------------------------------

#[test]
fn exact_match_wins_first() {
    let mapper = SetIdMapper::new();
    let selection = mapper.select_set("base1", Some("Crown Zenith"), &candidates());
    assert_eq!(selection, SetSelection::Exact("base1".to_string()));
}

#[test]
fn table_match_before_name_match() {
    let mapper = SetIdMapper::new();
    let selection = mapper.select_set("sv06.5", Some("Base Set"), &candidates());
    assert_eq!(selection, SetSelection::Mapped("sv6pt5".to_string()));
}

#[test]
fn name_match_is_first_hit_in_list_order() {
    let mapper = SetIdMapper::new();
    let sets = vec![
        SetInfo::new("a", "Crown Zenith Galarian Gallery"),
        SetInfo::new("b", "Crown Zenith"),
    ];
    let selection = mapper.select_set("unknown", Some("crown zenith"), &sets);
    assert_eq!(selection, SetSelection::NameMatch("a".to_string()));
}

#[test]
fn name_match_works_in_either_direction() {
    let mapper = SetIdMapper::new();
    let selection = mapper.select_set("unknown", Some("Scarlet & Violet: 151"), &candidates());
    assert_eq!(selection, SetSelection::NameMatch("sv3pt5".to_string()));
}

#[test]
fn no_tier_matching_is_unresolved() {
    let mapper = SetIdMapper::new();
    assert_eq!(
        mapper.select_set("unknown", Some("Nonexistent"), &candidates()),
        SetSelection::Unresolved
    );
    assert_eq!(mapper.select_set("unknown", None, &candidates()), SetSelection::Unresolved);
    assert_eq!(mapper.select_set("unknown", Some("  "), &candidates()), SetSelection::Unresolved);
    assert!(!SetSelection::Unresolved.is_resolved());
}

#[test]
fn empty_candidate_names_are_skipped() {
    let mapper = SetIdMapper::new();
    let sets = vec![SetInfo::new("blank", ""), SetInfo::new("base1", "Base Set")];
    let selection = mapper.select_set("unknown", Some("Base Set"), &sets);
    assert_eq!(selection.id(), Some("base1"));
}

// ---------------------------------------------------------------------------
// Fallback catalog
// ---------------------------------------------------------------------------

#[test]
fn fallback_catalog_covers_every_era() {
    let sets = fallback_sets();
    let ids: Vec<&str> = sets.iter().map(|s| s.id.as_str()).collect();
    for id in ["base1", "neo1", "ex1", "dp1", "bw1", "xy1", "sm1", "swsh1", "sv1", "sv6pt5"] {
        assert!(ids.contains(&id), "missing {}", id);
    }
    assert!(sets.iter().all(|s| !s.name.is_empty()));
}
