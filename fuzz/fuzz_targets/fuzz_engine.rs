#![no_main]

use libfuzzer_sys::fuzz_target;

use portion_engine::{NutritionPer100, SmartPortion};

fuzz_target!(|input: (&str, &str, f64, f64)| {
    let (food, unit, quantity, grams) = input;
    let base = NutritionPer100::new(100.0, 5.0, 10.0, 2.0);
    let smart = SmartPortion::new(grams, 120.0);
    let result = portion_engine::calculate(food, unit, quantity, &base, Some(&smart));
    let _ = portion_engine::default_engine().validate_result(food, &result);
    let _ = portion_engine::recommend_portion(food);
    let _ = portion_engine::extract_grams_or_ml(unit);
});
