use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

type Log = Rc<RefCell<Vec<String>>>;

fn schema() -> SchemaStore {
    let def: ConfigurationSchema = serde_json::from_value(json!({
        "categories": [
            {
                "id": "body_colors", "target": "Mt_Body", "kind": "color",
                "options": [
                    { "name": "Red", "value": "#ff0000" },
                    { "name": "Blue", "value": "#0000ff" }
                ]
            },
            {
                "id": "mirror_colors", "target": "Mt_MirrorCover", "kind": "color",
                "options": [
                    { "name": "Black", "value": "#000000" },
                    { "name": "Silver", "value": "silver" }
                ]
            },
            {
                "id": "wheel_designs", "kind": "design",
                "options": [
                    { "name": "Dione", "value": "Obj_Rim_T0A" },
                    { "name": "Ares", "value": "Obj_Rim_T0B", "thumb": "ares" }
                ]
            },
            {
                "id": "caliper_colors", "target": "Mt_Caliper", "kind": "color",
                "options": [
                    { "name": "Yellow", "value": "#ffd400" },
                    { "name": "Green", "value": "#0a7d2c" }
                ],
                "default": 1
            }
        ]
    }))
    .unwrap();
    SchemaStore::new(def).unwrap()
}

fn recording(palette: &mut ConfiguratorPalette) -> Log {
    let log: Log = Rc::default();
    let colors = Rc::clone(&log);
    palette.on_entity_color_change(move |target, color| {
        colors.borrow_mut().push(format!("color {target} {color}"));
    });
    let shows = Rc::clone(&log);
    palette.on_entity_visibility_change(move |entity| {
        shows.borrow_mut().push(format!("show {entity}"));
    });
    log
}

fn ready() -> (ConfiguratorPalette, Log) {
    let mut palette = ConfiguratorPalette::new();
    let log = recording(&mut palette);
    palette.initialize(schema()).unwrap();
    (palette, log)
}

fn assert_exclusive(palette: &ConfiguratorPalette) {
    let active = palette.tabs().iter().filter(|t| t.active).count();
    let visible = palette.tabs().iter().filter(|t| t.panel.visible).count();
    assert!(active <= 1, "{active} active tabs");
    assert!(visible <= 1, "{visible} visible panels");
    assert_eq!(active, visible);
    if let Some(id) = palette.state().active_tab() {
        assert!(palette.tab(id).unwrap().active);
    }
}

#[test]
fn initialize_seeds_defaults_and_builds_one_tab_per_category() {
    let (palette, log) = ready();
    let ids: Vec<_> = palette.tabs().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        ids,
        ["body_colors", "mirror_colors", "wheel_designs", "caliper_colors"]
    );
    assert!(palette.tabs().iter().all(|t| !t.active && !t.panel.visible));

    let state = palette.state();
    assert_eq!(state.current_color("body_colors").unwrap().as_str(), "#ff0000");
    assert_eq!(state.current_color("caliper_colors").unwrap().as_str(), "#0a7d2c");
    // The follower starts out tracking the source.
    assert_eq!(state.current_color("mirror_colors").unwrap().as_str(), "#ff0000");
    assert!(state.current_color("wheel_designs").is_none());
    assert!(log.borrow().is_empty());
}

#[test]
fn tab_clicks_keep_at_most_one_tab_open() {
    let (mut palette, _) = ready();
    let clicks = [
        "body_colors",
        "mirror_colors",
        "mirror_colors",
        "wheel_designs",
        "body_colors",
        "caliper_colors",
        "caliper_colors",
        "caliper_colors",
    ];
    for id in clicks {
        palette.click_tab(id).unwrap();
        assert_exclusive(&palette);
    }
    assert_eq!(palette.state().active_tab(), Some("caliper_colors"));
}

#[test]
fn clicking_the_open_tab_closes_it_and_clears_its_options() {
    let (mut palette, _) = ready();
    palette.click_tab("body_colors").unwrap();
    assert_eq!(palette.tab("body_colors").unwrap().panel.swatches.len(), 2);

    palette.click_tab("body_colors").unwrap();
    let tab = palette.tab("body_colors").unwrap();
    assert!(!tab.active);
    assert!(!tab.panel.visible);
    assert!(tab.panel.swatches.is_empty());
    assert_eq!(palette.state().active_tab(), None);
}

#[test]
fn design_panel_shows_previews_and_emits_visibility() {
    let (mut palette, log) = ready();
    palette.click_tab("wheel_designs").unwrap();

    let swatches = &palette.tab("wheel_designs").unwrap().panel.swatches;
    assert_eq!(swatches[0].label, "Dione");
    assert_eq!(
        swatches[1].face,
        SwatchFace::Preview {
            image: "assets/aventador/ares.png".to_owned()
        }
    );

    palette.click_swatch("wheel_designs", 1).unwrap();
    assert_eq!(*log.borrow(), ["show Obj_Rim_T0B"]);
    assert_eq!(palette.state().current_colors().len(), 3);
}

#[test]
fn follower_panel_leads_with_live_source_color() {
    let (mut palette, _) = ready();
    palette.choose("body_colors", 1).unwrap();
    palette.click_tab("mirror_colors").unwrap();

    let swatches = &palette.tab("mirror_colors").unwrap().panel.swatches;
    let labels: Vec<_> = swatches.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, [CURRENT_SWATCH_LABEL, "Black", "Silver"]);
    assert_eq!(
        swatches[0].action,
        SwatchAction::Paint {
            category: "mirror_colors".to_owned(),
            target: "Mt_MirrorCover".to_owned(),
            color: ColorToken::new("#0000ff").unwrap(),
        }
    );
    assert!(matches!(
        swatches[0].face,
        SwatchFace::Color { rgba: Some(_), .. }
    ));
    assert!(matches!(
        swatches[2].face,
        SwatchFace::Color { rgba: None, .. }
    ));
}

#[test]
fn non_follower_color_panels_have_no_current_swatch() {
    let (mut palette, _) = ready();
    palette.click_tab("caliper_colors").unwrap();
    let swatches = &palette.tab("caliper_colors").unwrap().panel.swatches;
    assert_eq!(swatches.len(), 2);
    assert!(swatches.iter().all(|s| s.label != CURRENT_SWATCH_LABEL));
}

#[test]
fn painting_a_plain_category_records_and_emits_once() {
    let (mut palette, log) = ready();
    palette.choose("caliper_colors", 0).unwrap();
    assert_eq!(*log.borrow(), ["color Mt_Caliper #ffd400"]);
    assert_eq!(
        palette.state().current_color("caliper_colors").unwrap().as_str(),
        "#ffd400"
    );
}

#[test]
fn cascade_does_not_touch_follower_tab_state() {
    let (mut palette, log) = ready();
    palette.choose("body_colors", 1).unwrap();

    assert_eq!(
        *log.borrow(),
        ["color Mt_Body #0000ff", "color Mt_MirrorCover #0000ff"]
    );
    let mirror = palette.tab("mirror_colors").unwrap();
    assert!(!mirror.active);
    assert!(!mirror.panel.visible);
    assert!(mirror.panel.swatches.is_empty());
    assert_eq!(palette.state().active_tab(), Some("body_colors"));
}

#[test]
fn selecting_current_while_tracking_keeps_tracking() {
    let (mut palette, log) = ready();
    palette.choose("mirror_colors", 0).unwrap();
    palette.choose("body_colors", 1).unwrap();

    let log = log.borrow();
    assert_eq!(log[0], "color Mt_MirrorCover #ff0000");
    assert_eq!(&log[1..], ["color Mt_Body #0000ff", "color Mt_MirrorCover #0000ff"]);
}

#[test]
fn current_swatch_equal_to_a_native_mirror_option_counts_as_override() {
    // Literal membership semantics: if the live body color happens to be one of the mirror's
    // own catalog values, choosing "Current" pins the mirror instead of re-linking it.
    let (mut palette, log) = ready();
    palette.choose("mirror_colors", 2).unwrap(); // "silver", a native override
    palette.choose("body_colors", 0).unwrap();
    assert_eq!(log.borrow().last().unwrap(), "color Mt_Body #ff0000");

    let def: ConfigurationSchema = serde_json::from_value(json!({
        "categories": [
            { "id": "body_colors", "target": "Mt_Body", "kind": "color",
              "options": [ { "name": "Black", "value": "#000000" }, { "name": "Red", "value": "#ff0000" } ] },
            { "id": "mirror_colors", "target": "Mt_MirrorCover", "kind": "color",
              "options": [ { "name": "Black", "value": "#000000" } ] }
        ]
    }))
    .unwrap();
    let mut palette = ConfiguratorPalette::new();
    let log = recording(&mut palette);
    palette.initialize(SchemaStore::new(def).unwrap()).unwrap();

    palette.choose("mirror_colors", 0).unwrap(); // "Current" is #000000, also a native value
    palette.choose("body_colors", 1).unwrap();
    assert_eq!(log.borrow().last().unwrap(), "color Mt_Body #ff0000");
}

#[test]
fn missing_callbacks_are_ignored() {
    let mut palette = ConfiguratorPalette::new();
    palette.initialize(schema()).unwrap();
    palette.choose("body_colors", 1).unwrap();
    palette.choose("wheel_designs", 0).unwrap();
    assert_eq!(
        palette.state().current_color("body_colors").unwrap().as_str(),
        "#0000ff"
    );
}

#[test]
fn layout_naming_unknown_category_is_a_schema_violation() {
    let mut palette = ConfiguratorPalette::with_layout(PaletteLayout::automobile());
    assert!(palette.check_layout(&schema()).is_err());
    let err = palette.initialize(schema()).unwrap_err();
    assert!(matches!(err, ShowroomError::SchemaViolation(_)), "{err}");
    assert!(err.to_string().contains("wheel_colors"));
    assert!(!palette.is_initialized());
}

#[test]
fn explicit_layout_controls_tab_order_and_labels() {
    let layout = PaletteLayout {
        tabs: vec![
            TabDef {
                id: "wheel_designs".to_owned(),
                label: "WHEELS".to_owned(),
            },
            TabDef {
                id: "body_colors".to_owned(),
                label: "BODY COLOR".to_owned(),
            },
        ],
    };
    let mut palette = ConfiguratorPalette::with_layout(layout);
    palette.initialize(schema()).unwrap();
    let labels: Vec<_> = palette.tabs().iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["WHEELS", "BODY COLOR"]);

    let err = palette.click_tab("caliper_colors").unwrap_err();
    assert!(matches!(err, ShowroomError::SchemaViolation(_)));
}

#[test]
fn use_before_initialization_is_an_invariant_error() {
    let mut palette = ConfiguratorPalette::new();
    assert!(matches!(
        palette.click_tab("body_colors"),
        Err(ShowroomError::Invariant(_))
    ));
    assert!(matches!(
        palette.click_swatch("body_colors", 0),
        Err(ShowroomError::Invariant(_))
    ));
}

#[test]
fn swatch_on_closed_tab_or_out_of_range_is_rejected() {
    let (mut palette, log) = ready();
    assert!(matches!(
        palette.click_swatch("body_colors", 0),
        Err(ShowroomError::Invariant(_))
    ));
    palette.click_tab("body_colors").unwrap();
    assert!(matches!(
        palette.click_swatch("body_colors", 9),
        Err(ShowroomError::Invariant(_))
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn second_initialization_is_rejected() {
    let (mut palette, _) = ready();
    assert!(matches!(
        palette.initialize(schema()),
        Err(ShowroomError::Invariant(_))
    ));
}
