use super::*;

fn t(id: &str, title: &str, artist: Option<&str>) -> Track {
    let mut track = Track::new(id, title, Some(format!("/music/{id}.mp3")));
    track.artist = artist.map(str::to_string);
    track
}

#[test]
fn playable_needs_title_and_preview() {
    assert!(Track::new("1", "Song", Some("/a.mp3".into())).is_playable());
    assert!(!Track::new("2", "", Some("/a.mp3".into())).is_playable());
    assert!(!Track::new("3", "   ", Some("/a.mp3".into())).is_playable());
    assert!(!Track::new("4", "Song", None).is_playable());
    assert!(!Track::new("5", "Song", Some(String::new())).is_playable());
}

#[test]
fn fuzzy_match_simple() {
    let name = "Boards of Canada";
    assert!(fuzzy_match_positions(name, "boc").is_some());
    assert!(fuzzy_match_positions(name, "canada").is_some());
    assert!(fuzzy_match_positions(name, "xyz").is_none());
    assert_eq!(fuzzy_match_positions("Abba", "ab"), Some(vec![0, 1]));
}

#[test]
fn local_catalog_groups_by_performer_case_insensitively() {
    let catalog = LocalCatalog::from_tracks(vec![
        t("1", "Teardrop", Some("Massive Attack")),
        t("2", "Angel", Some("massive attack ")),
        t("3", "Roads", Some("Portishead")),
        t("4", "Orphan", None),
    ]);

    assert_eq!(catalog.performers().len(), 2);
    let massive = &catalog.performers()[0];
    assert_eq!(massive.id, "massive attack");
    assert_eq!(massive.name, "Massive Attack");
    assert_eq!(massive.track_count, 2);

    let tracks = catalog.top_tracks("massive attack").unwrap();
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Teardrop", "Angel"]);
}

#[test]
fn unknown_performer_has_no_tracks() {
    let catalog = LocalCatalog::from_tracks(vec![t("1", "Roads", Some("Portishead"))]);
    assert!(catalog.top_tracks("nobody").unwrap().is_empty());
}

#[test]
fn search_performers_is_fuzzy() {
    let catalog = LocalCatalog::from_tracks(vec![
        t("1", "Teardrop", Some("Massive Attack")),
        t("2", "Roads", Some("Portishead")),
        t("3", "Glory Box", Some("Portishead")),
    ]);

    let hits = catalog.search_performers("phd").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Portishead");

    assert_eq!(catalog.search_performers("  ").unwrap().len(), 2);
    assert!(catalog.search_performers("zz").unwrap().is_empty());
}

#[test]
fn trending_orders_by_track_count_then_name() {
    let catalog = LocalCatalog::from_tracks(vec![
        t("1", "A", Some("Beta")),
        t("2", "B", Some("Alpha")),
        t("3", "C", Some("Gamma")),
        t("4", "D", Some("Gamma")),
    ]);

    let names: Vec<String> = catalog
        .trending_performers()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
}
