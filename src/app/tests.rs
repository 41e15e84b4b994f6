use super::*;
use crate::library::Track;

fn t(title: &str) -> Track {
    Track {
        path: std::path::PathBuf::from(format!("/tmp/{title}.mp3")),
        title: title.into(),
        artist: None,
        album: None,
        duration: None,
        display: title.into(),
    }
}

#[test]
fn selection_wraps_both_directions() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);

    assert_eq!(app.selected, 0);
    app.select_next();
    app.select_next();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);

    app.select_prev();
    assert_eq!(app.selected, 2);
}

#[test]
fn selection_is_safe_on_empty_playlist() {
    let mut app = App::new(Vec::new());
    app.select_next();
    app.select_prev();
    app.set_selected(5);
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
}

#[test]
fn set_selected_clamps_into_range() {
    let mut app = App::new(vec![t("A"), t("B")]);
    app.set_selected(99);
    assert_eq!(app.selected, 1);
}

#[test]
fn append_and_clear_mutate_the_playlist() {
    let mut app = App::new(vec![t("A")]);
    app.append_tracks(&[t("B"), t("C")]);
    assert_eq!(app.tracks.len(), 3);

    app.set_selected(2);
    app.clear_tracks();
    assert!(!app.has_tracks());
    assert_eq!(app.selected, 0);
}

#[test]
fn adjust_volume_clamps_to_unit_range() {
    let mut app = App::new(Vec::new());
    app.volume = 0.95;
    assert_eq!(app.adjust_volume(0.1), 1.0);
    app.volume = 0.03;
    assert_eq!(app.adjust_volume(-0.05), 0.0);
}

#[test]
fn toggle_shuffle_flips_the_flag() {
    let mut app = App::new(Vec::new());
    assert!(!app.shuffle);
    app.toggle_shuffle();
    assert!(app.shuffle);
    app.toggle_shuffle();
    assert!(!app.shuffle);
}
