use eventscore_game::{
    Catalog, CatalogError, DragonBreakdown, DragonConfig, DragonInput, EventDay, HuntingConfigError,
    Tier, TierInput, evaluate_dragons,
};
use serde_json::{Value, json};

const CATALOG_JSON: &str = include_str!("../data/catalog.json");

#[test]
fn bundled_catalog_matches_builtin_tables() {
    let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
    assert_eq!(catalog, Catalog::default());
}

#[test]
fn bundled_catalog_lists_every_event_day() {
    let value: Value = serde_json::from_str(CATALOG_JSON).unwrap();
    let days = value["days"].as_object().unwrap();
    for day in EventDay::ALL {
        assert!(days.contains_key(day.key()), "missing {day}");
    }
}

#[test]
fn dragon_tiers_serialize_with_kind_tags() {
    let value = serde_json::to_value(DragonConfig::default()).unwrap();
    assert_eq!(value["legendary"]["progression"], json!({ "kind": "flat_rate" }));
    assert_eq!(value["silver"]["progression"]["kind"], "leveled");
    assert_eq!(
        value["gold"]["progression"]["prerequisite"],
        json!({ "lower_tier": "silver", "level_multiplier": 100 })
    );
}

#[test]
fn breakdown_reports_blocked_reasons_as_tagged_objects() {
    let breakdown = evaluate_dragons(&DragonConfig::default(), &DragonInput {
        silver: TierInput::new(1, 10),
        ..DragonInput::default()
    });
    let value = serde_json::to_value(&breakdown).unwrap();
    let tiers = value["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 4);
    assert_eq!(tiers[0]["result"]["blocked_reason"]["kind"], "level_not_set");
    assert_eq!(
        tiers[1]["result"]["blocked_reason"],
        json!({ "kind": "prerequisite_unmet", "lower_tier": "bronze", "required_level": 10 })
    );
    // Legendary never reports a reason.
    assert!(tiers[3]["result"].get("blocked_reason").is_none());

    let parsed: DragonBreakdown = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.get(Tier::Silver), breakdown.get(Tier::Silver));
}

#[test]
fn misconfigured_tiers_are_rejected() {
    let mut value: Value = serde_json::from_str(CATALOG_JSON).unwrap();
    value["dragon"]["gold"]["progression"]["costs"]["costs"][3] = json!(0);
    let err = Catalog::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, CatalogError::Tier(_)), "{err}");

    let mut value: Value = serde_json::from_str(CATALOG_JSON).unwrap();
    value["hunting"]["vip_bands"][1]["min_level"] = json!(3);
    let err = Catalog::from_json(&value.to_string()).unwrap_err();
    assert!(
        matches!(
            err,
            CatalogError::Hunting(HuntingConfigError::OverlappingBands {
                first: 1,
                second: 3
            })
        ),
        "{err}"
    );
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        Catalog::from_json("{ not json"),
        Err(CatalogError::Parse(_))
    ));
}
