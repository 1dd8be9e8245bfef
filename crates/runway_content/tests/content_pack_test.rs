//! # Content Pack Test
//!
//! The shipped content pack must load cleanly and respect the sync quantum.

use runway_content::{ContentError, ContentIssue, ContentLibrary, SideAffinity, CELL_SYNC_SIZE};

const CITY: &str = include_str!("../../../data/content/city.toml");

#[test]
fn test_city_pack_loads_and_validates() {
    let library = ContentLibrary::load_toml_str(CITY).expect("city pack must be valid");

    assert_eq!(library.lane_count, 3);
    assert_eq!(library.themes.len(), 2);
    assert_eq!(library.themes[0].name, "downtown");
    assert_eq!(library.override_roads.len(), 1);
}

#[test]
fn test_every_body_is_whole_quanta() {
    let library = ContentLibrary::load_toml_str(CITY).unwrap();
    let mut checked = 0;
    for variant in library.body_variants() {
        assert_eq!(
            variant.cells % CELL_SYNC_SIZE,
            0,
            "body '{}' is {} cells",
            variant.handle,
            variant.cells
        );
        checked += 1;
    }
    assert!(checked > 10);
}

#[test]
fn test_canonical_fillers_present() {
    let library = ContentLibrary::load_toml_str(CITY).unwrap();
    for theme in &library.themes {
        assert_eq!(theme.side_sets.items()[0].affinity, SideAffinity::Both);
        assert_eq!(theme.side_filler().map(|v| v.cells), Some(CELL_SYNC_SIZE));
        assert_eq!(theme.road_filler().map(|v| v.cells), Some(CELL_SYNC_SIZE));
    }
}

#[test]
fn test_boxes_padded_to_lane_count() {
    let library = ContentLibrary::load_toml_str(CITY).unwrap();
    for pattern_box in &library.boxes {
        assert_eq!(pattern_box.lanes.len(), library.lane_count);
        assert!(pattern_box.lanes.iter().all(|lane| !lane.is_empty()));
    }
    // "single_barrier" authored lane 2 empty: padded with one empty element.
    assert_eq!(library.boxes[0].lanes[2].len(), 1);
    assert!(library.boxes[0].lanes[2][0].content_group().is_none());
}

#[test]
fn test_broken_pack_reports_every_issue() {
    let broken = CITY
        .replace("override_road = 0", "override_road = 4")
        .replace(
            "{ handle = \"side/sidewalk_5\", cells = 5 }",
            "{ handle = \"side/sidewalk_5\", cells = 6 }",
        );

    let Err(ContentError::Invalid(issues)) = ContentLibrary::load_toml_str(&broken) else {
        panic!("broken pack must fail validation");
    };

    assert!(issues.iter().any(|issue| matches!(
        issue,
        ContentIssue::DanglingIndex { what: "override road", index: 4, .. }
    )));
    assert!(issues
        .iter()
        .any(|issue| matches!(issue, ContentIssue::NotQuantum { cells: 6, .. })));
    assert!(issues
        .iter()
        .any(|issue| matches!(issue, ContentIssue::BadFiller { channel: "side", .. })));

    // Lenient loading still succeeds.
    assert!(ContentLibrary::from_toml_str(&broken).is_ok());
}
