use ologstyle::core::olog::{self, AttributeAxis, Category, StructuredAttributeSet, StyleParams};
use ologstyle::{TransformError, UnknownCategoryError};

use crate::olog_fixture::{attrs, bundled};

fn energy_after_mascot(text: &str) -> (String, String) {
    let model = bundled();
    let attributes = olog::extract_attributes(text, &model);
    let before = attributes.get(AttributeAxis::Energy).unwrap().to_string();
    let result =
        olog::transform(&attributes, "mascot_theater", &StyleParams::new(), &model).unwrap();
    let after = result.attributes().get(AttributeAxis::Energy).unwrap().to_string();
    (before, after)
}

#[test]
fn calm_scene_stays_low_under_mascot_theater() {
    assert_eq!(
        energy_after_mascot("a calm quiet scene"),
        ("low".to_string(), "low".to_string())
    );
}

#[test]
fn wild_chase_stays_high_under_mascot_theater() {
    assert_eq!(
        energy_after_mascot("a wild energetic chase"),
        ("high".to_string(), "high".to_string())
    );
}

#[test]
fn medium_energy_is_lifted_by_mascot_theater() {
    assert_eq!(
        energy_after_mascot("a bear dancing in the kitchen"),
        ("medium".to_string(), "high".to_string())
    );
}

#[test]
fn kid_chaos_violation_is_reported_not_raised() {
    let model = bundled();
    let attributes = attrs(&[
        (AttributeAxis::Subject, "animal"),
        (AttributeAxis::Palette, "muted"),
    ]);
    let outcomes = olog::check(&attributes, "kid_chaos", &model).unwrap();
    let outcome = outcomes
        .iter()
        .find(|o| o.constraint == "animals_are_bright")
        .expect("constraint evaluated");
    assert!(!outcome.satisfied);
    assert!(outcome.detail.contains("muted"));
    assert!(outcome.detail.contains("bright"));
}

#[test]
fn kid_chaos_transform_repairs_the_palette() {
    let model = bundled();
    let attributes = olog::extract_attributes("a grey cat sitting", &model);
    assert_eq!(attributes.get(AttributeAxis::Palette).unwrap(), "muted");

    let result = olog::transform(&attributes, "kid_chaos", &StyleParams::new(), &model).unwrap();
    assert_eq!(result.attributes().get(AttributeAxis::Subject).unwrap(), "animal");
    assert_eq!(result.attributes().get(AttributeAxis::Palette).unwrap(), "bright");
    assert!(result.is_coherent());
    assert!(result.applied().iter().any(|a| a.rule == "chaos_palette"));
    // input set is untouched
    assert_eq!(attributes.get(AttributeAxis::Palette).unwrap(), "muted");
}

#[test]
fn unknown_category_is_a_typed_error() {
    let model = bundled();
    let attributes = olog::extract_attributes("a dog", &model);

    let err = olog::transform(&attributes, "nonexistent_category", &StyleParams::new(), &model)
        .unwrap_err();
    match err {
        TransformError::UnknownCategory(UnknownCategoryError { requested, available }) => {
            assert_eq!(requested, "nonexistent_category");
            assert_eq!(available.len(), 7);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(olog::check(&attributes, "nonexistent_category", &model).is_err());
    assert!(olog::explain("nonexistent_category", &model).is_err());
}

#[test]
fn out_of_range_parameter_is_rejected() {
    let model = bundled();
    let attributes = olog::extract_attributes("a dog", &model);
    let params = StyleParams::from([("energy_level".to_string(), 1.5)]);
    let err = olog::transform(&attributes, "kid_chaos", &params, &model).unwrap_err();
    match err {
        TransformError::ParameterRange(e) => {
            assert_eq!(e.rule, "chaos_surge");
            assert_eq!(e.param, "energy_level");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parameter_ignored_by_category_is_not_validated() {
    let model = bundled();
    let attributes = olog::extract_attributes("a dog", &model);
    let params = StyleParams::from([("energy_level".to_string(), 1.5)]);
    assert!(olog::transform(&attributes, "health_halo", &params, &model).is_ok());
}

#[test]
fn empty_text_yields_every_default() {
    let model = bundled();
    let attributes = olog::extract_attributes("", &model);
    for axis in model.axes() {
        let domain = model.domain(axis).unwrap();
        assert_eq!(attributes.get(axis), Some(&domain.default), "{axis}");
    }
}

#[test]
fn check_is_idempotent() {
    let model = bundled();
    let attributes = attrs(&[
        (AttributeAxis::Subject, "animal"),
        (AttributeAxis::Palette, "muted"),
        (AttributeAxis::Energy, "low"),
        (AttributeAxis::Action, "explosive_burst"),
    ]);
    let first = olog::check(&attributes, "kid_chaos", &model).unwrap();
    let second = olog::check(&attributes, "kid_chaos", &model).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|o| !o.satisfied).count(), 2);
}

#[test]
fn variant_count_is_bounded() {
    let model = bundled();
    let attributes = olog::extract_attributes("a dog", &model);
    for count in [0, 6] {
        let err = olog::generate_variants(&attributes, "kid_chaos", count, &model).unwrap_err();
        assert_eq!(
            err,
            TransformError::VariantCount {
                requested: count,
                max: 5
            }
        );
    }
}

#[test]
fn unknown_values_are_rejected_not_coerced() {
    let model = bundled();
    // chaos_energy and chaos_palette match anything, so nothing downstream
    // would notice a bad input value
    let bogus = attrs(&[
        (AttributeAxis::Energy, "bogus"),
        (AttributeAxis::Palette, "not_a_palette"),
    ]);
    let err = olog::transform(&bogus, "kid_chaos", &StyleParams::new(), &model).unwrap_err();
    assert!(matches!(err, TransformError::InvalidAttribute { axis: AttributeAxis::Energy, .. }));
    assert!(olog::check(&bogus, "kid_chaos", &model).is_err());

    let deserialized: StructuredAttributeSet =
        serde_json::from_str(r#"{"energy": "nonsense"}"#).unwrap();
    let err = olog::transform(&deserialized, "mascot_theater", &StyleParams::new(), &model)
        .unwrap_err();
    assert!(err.to_string().contains("`nonsense` is not an instance of `energy`"));
}

#[test]
fn category_rules_keep_declaration_order() {
    let model = bundled();
    let rules = olog::category_rules("kid_chaos", &model).unwrap();
    assert_eq!(rules.profile.category, Category::KidChaos);
    let names: Vec<&str> = rules.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "chaos_human",
            "chaos_surge",
            "chaos_energy",
            "chaos_action",
            "chaos_setting",
            "chaos_palette",
            "chaos_mood",
        ]
    );
    let constraints: Vec<&str> = rules.constraints.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(constraints, vec!["animals_are_bright", "chaos_never_still"]);

    let err = olog::category_rules("nonexistent_category", &model).unwrap_err();
    assert_eq!(err.available.len(), 7);
}

#[test]
fn refine_rechecks_without_rerunning_rules() {
    let model = bundled();
    let attributes = olog::extract_attributes("a grey cat sitting", &model);
    let result = olog::transform(&attributes, "kid_chaos", &StyleParams::new(), &model).unwrap();
    assert!(result.is_coherent());

    let muted = olog::refine(&result, AttributeAxis::Palette, "muted", &model).unwrap();
    assert_eq!(muted.attributes().get(AttributeAxis::Palette).unwrap(), "muted");
    let violated: Vec<&str> = muted.violations().map(|o| o.constraint.as_str()).collect();
    assert_eq!(violated, vec!["animals_are_bright"]);
    assert_eq!(muted.applied(), result.applied());

    let back = olog::refine(&muted, AttributeAxis::Palette, "bright", &model).unwrap();
    assert!(back.is_coherent());
    assert_eq!(back.refined(), &[AttributeAxis::Palette]);

    let err = olog::refine(&result, AttributeAxis::Palette, "plaid", &model).unwrap_err();
    assert!(matches!(
        err,
        TransformError::InvalidAttribute { ref allowed, .. } if !allowed.is_empty()
    ));
}
