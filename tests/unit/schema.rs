use super::*;
use serde_json::json;

fn automobile() -> serde_json::Value {
    json!({
        "categories": [
            {
                "id": "body_colors",
                "target": "Mt_Body",
                "kind": "color",
                "label": "BODY COLOR",
                "options": [
                    { "name": "Rosso", "value": "#b1160f" },
                    { "name": "Blu", "value": "#1b3a8c" }
                ],
                "default": 1
            },
            {
                "id": "mirror_colors",
                "target": "Mt_MirrorCover",
                "kind": "color",
                "options": [
                    { "name": "Nero", "value": "#000000" },
                    { "name": "Argento", "value": "#c0c0c0" }
                ]
            },
            {
                "id": "wheel_designs",
                "kind": "design",
                "options": [
                    { "name": "Dione", "value": "Obj_Rim_T0A", "thumb": "thumb_t0a" },
                    { "name": "Ares", "value": "Obj_Rim_T0B" }
                ]
            }
        ],
        "preview_root": "assets/aventador/"
    })
}

fn parse(v: serde_json::Value) -> ConfigurationSchema {
    serde_json::from_value(v).unwrap()
}

#[test]
fn parses_with_defaults() {
    let schema = parse(automobile());
    schema.validate().unwrap();

    assert_eq!(schema.categories.len(), 3);
    assert_eq!(schema.cascade, CascadeLink::default());
    assert_eq!(schema.categories[1].default_index, 0);
    assert_eq!(schema.categories[1].label(), "mirror_colors");
    assert_eq!(schema.categories[0].label(), "BODY COLOR");
    assert_eq!(
        schema.categories[0].default_option().map(|o| o.name.as_str()),
        Some("Blu")
    );
}

#[test]
fn preview_path_prefers_thumb_and_trims_root() {
    let schema = parse(automobile());
    let designs = schema.category("wheel_designs").unwrap();
    assert_eq!(
        schema.preview_path(&designs.options[0]),
        "assets/aventador/thumb_t0a.png"
    );
    assert_eq!(
        schema.preview_path(&designs.options[1]),
        "assets/aventador/Obj_Rim_T0B.png"
    );
}

#[test]
fn cascade_pair_resolves_both_ends() {
    let schema = parse(automobile());
    let (source, follower) = schema.cascade_pair().unwrap();
    assert_eq!(source.target, "Mt_Body");
    assert_eq!(follower.target, "Mt_MirrorCover");

    let mut no_mirror = schema.clone();
    no_mirror.categories.retain(|c| c.id != "mirror_colors");
    assert!(no_mirror.cascade_pair().is_none());
    no_mirror.validate().unwrap();
}

#[test]
fn require_category_reports_schema_violation() {
    let schema = parse(automobile());
    let err = schema.require_category("caliper_colors").unwrap_err();
    assert!(matches!(err, ShowroomError::SchemaViolation(_)));
}

#[test]
fn validate_rejects_duplicate_ids() {
    let mut schema = parse(automobile());
    schema.categories[1].id = "body_colors".to_owned();
    assert!(schema.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_default() {
    let mut schema = parse(automobile());
    schema.categories[0].default_index = 2;
    assert!(schema.validate().is_err());
}

#[test]
fn validate_rejects_empty_catalog_and_missing_target() {
    let mut schema = parse(automobile());
    schema.categories[2].options.clear();
    assert!(schema.validate().is_err());

    let mut schema = parse(automobile());
    schema.categories[0].target.clear();
    assert!(schema.validate().is_err());
}

#[test]
fn validate_rejects_cascade_onto_design_category() {
    let mut schema = parse(automobile());
    schema.cascade.follower = "wheel_designs".to_owned();
    assert!(schema.validate().is_err());
}

#[test]
fn store_validates_and_shares() {
    let store = SchemaStore::new(parse(automobile())).unwrap();
    let other = store.clone();
    assert_eq!(other.categories.len(), store.categories.len());

    let mut bad = parse(automobile());
    bad.categories.clear();
    assert!(SchemaStore::new(bad).is_err());
}

#[test]
fn offers_color_is_an_exact_membership_test() {
    let schema = parse(automobile());
    let mirror = schema.category("mirror_colors").unwrap();
    assert!(mirror.offers_color(&ColorToken::new("#000000").unwrap()));
    assert!(!mirror.offers_color(&ColorToken::new("#b1160f").unwrap()));
}
