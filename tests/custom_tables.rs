use indoc::indoc;
use portion_engine::{
    tables::TablesFile, EngineBuilderError, FoodCategory, NutritionPer100, PortionEngine,
};

fn engine(toml: &str) -> PortionEngine {
    let file = TablesFile::from_toml_str(toml).unwrap();
    PortionEngine::builder()
        .with_bundled_tables()
        .with_tables_file(file)
        .finish()
        .unwrap()
}

#[test]
fn local_units_override_bundled() {
    let engine = engine(indoc! {r#"
        [units]
        glass = 200
        "steel tumbler" = 180
    "#});
    assert_eq!(engine.resolve_base_grams("glass"), 200.0);
    assert_eq!(engine.resolve_base_grams("Steel Tumbler"), 180.0);
    assert_eq!(engine.resolve_base_grams("cup"), 240.0);
}

#[test]
fn local_rules_go_first() {
    let engine = engine(indoc! {r#"
        [[portion]]
        patterns = ["beer"]
        unit = "pint (568ml)"
        grams = 568
        note = "Pub pint"
    "#});
    assert_eq!(engine.recommend_portion("beer").unit_size_grams, 568.0);
    // even ahead of more specific bundled rules
    assert_eq!(
        engine.recommend_portion("Kingfisher beer").canonical_unit_label,
        "pint (568ml)"
    );
    assert_eq!(engine.recommend_portion("red wine").unit_size_grams, 150.0);
}

#[test]
fn lower_precedence_rules_go_last() {
    let engine = engine(indoc! {r#"
        precedence = "after"

        [[portion]]
        patterns = ["beer", "kombucha"]
        unit = "pint (568ml)"
        grams = 568
        note = "Pub pint"
    "#});
    assert_eq!(engine.recommend_portion("beer").unit_size_grams, 330.0);
    assert_eq!(engine.recommend_portion("kombucha").unit_size_grams, 568.0);
}

#[test]
fn local_multiplier() {
    let engine = engine(indoc! {r#"
        [[multiplier]]
        foods = ["momo", "dumpling"]
        units = ["piece"]
        multiplier = 0.5
    "#});
    let base = NutritionPer100::new(200.0, 8.0, 25.0, 7.0);
    let r = engine.calculate("veg momos", "pieces", 6.0, &base, None);
    assert_eq!(r.total_grams, 150.0);
    assert_eq!(r.calories, 300.0);
}

#[test]
fn replace_fallback_and_default_category() {
    let engine = engine(indoc! {r#"
        [fallback]
        unit = "katori (150g)"
        grams = 150
        note = "Home serving"

        [plausibility]
        default = "vegetable"
    "#});
    let rec = engine.recommend_portion("unknown-xyz-food");
    assert_eq!(rec.canonical_unit_label, "katori (150g)");
    let v = engine.validate("unknown-xyz-food", 300.0, 100.0);
    assert_eq!(v.category, FoodCategory::Vegetable);
    assert!(!v.is_valid);
}

#[test]
fn only_local_tables() {
    let file = TablesFile::from_toml_str(indoc! {r#"
        [units]
        cup = 200

        [[plausibility.category]]
        category = "beverage"
        patterns = ["tea"]
        min = 0
        max = 1
    "#})
    .unwrap();
    let engine = PortionEngine::builder()
        .with_tables_file(file)
        .finish()
        .unwrap();
    assert_eq!(engine.resolve_base_grams("cup"), 200.0);
    assert_eq!(engine.resolve_base_grams("bowl"), 100.0);
    assert_eq!(engine.validate("tea", 30.0, 150.0).category, FoodCategory::Beverage);
    assert_eq!(
        engine.recommend_portion("tea").canonical_unit_label,
        "serving (100g)"
    );
}

#[test]
fn invalid_tables() {
    let file = TablesFile::from_toml_str(indoc! {r#"
        [[multiplier]]
        foods = ["almond"]
        units = ["piece"]
        multiplier = -1
    "#})
    .unwrap();
    let err = PortionEngine::builder()
        .with_tables_file(file)
        .finish()
        .unwrap_err();
    assert!(matches!(err, EngineBuilderError::NotPositive { .. }));

    assert!(TablesFile::from_toml_str(indoc! {r#"
        [plausibility]
        default = "dessert"
    "#})
    .is_err());
}

#[test]
fn empty_engine() {
    let engine = PortionEngine::empty();
    let base = NutritionPer100::new(100.0, 0.0, 0.0, 0.0);
    assert_eq!(engine.calculate("almonds", "piece", 1.0, &base, None).total_grams, 100.0);
    assert_eq!(engine.recommend_portion("beer").unit_size_grams, 100.0);
    assert!(engine.unit_table().is_empty());
}
