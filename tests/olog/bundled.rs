use ologstyle::core::olog::{self, AttributeAxis, Category, StyleParams};
use strum::IntoEnumIterator;

use crate::olog_fixture::bundled;

#[test]
fn declares_all_seven_categories_in_order() {
    let model = bundled();
    assert_eq!(
        olog::list_categories(&model),
        vec![
            Category::MascotTheater,
            Category::HealthHalo,
            Category::NostalgiaRevival,
            Category::PremiumDisruptor,
            Category::KidChaos,
            Category::TransparentHonest,
            Category::AdventureFantasy,
        ]
    );
}

#[test]
fn loads_cleanly_with_intentionality() {
    let model = bundled();
    assert!(model.warnings().is_empty(), "{:?}", model.warnings());
    assert_eq!(model.axes().collect::<Vec<_>>(), AttributeAxis::iter().collect::<Vec<_>>());

    let report = olog::metadata(&model);
    assert_eq!(report.metadata.name.as_deref(), Some("cereal_box_styles"));
    assert_eq!(report.metadata.version.as_deref(), Some("2.0"));
    assert!(report.intentionality);
    assert!(report.rules > 0);
}

#[test]
fn every_rule_and_constraint_resolves_against_its_domain() {
    let model = bundled();
    for category in model.categories() {
        let profile = model.profile(category).unwrap();
        for rule in model.registry().rules_in(category) {
            assert_eq!(rule.category, category);
            assert!(profile.axes.contains(&rule.axis), "{}", rule.name);
            let domain = model.domain(rule.axis).unwrap();
            assert!(domain.contains(rule.output.as_str()), "{}", rule.name);
            for value in rule.pattern.exact_values() {
                assert!(domain.contains(value.as_str()), "{}", rule.name);
            }
        }
        for constraint in model.constraints_for(category) {
            for clause in constraint.kind.clauses() {
                let domain = model.domain(clause.axis).unwrap();
                for value in &clause.values {
                    assert!(domain.contains(value.as_str()), "{}", constraint.name);
                }
            }
        }
    }
}

#[test]
fn default_attributes_are_coherent_in_every_category() {
    let model = bundled();
    let attributes = olog::extract_attributes("", &model);
    for category in model.categories() {
        let result =
            olog::transform(&attributes, category.as_ref(), &StyleParams::new(), &model).unwrap();
        assert!(
            result.is_coherent(),
            "{category}: {:?}",
            result.violations().collect::<Vec<_>>()
        );
    }
}

#[test]
fn explain_includes_rationale() {
    let model = bundled();
    let explanation = olog::explain("health_halo", &model).unwrap();
    let intent = explanation.intent.expect("intentionality entry");
    assert!(intent.core_intention.unwrap().contains("ingredients"));
    assert!(intent.commercial_promise.is_some());
    assert!(explanation.markers.contains(&"natural palette".to_string()));
}

#[test]
fn suggests_mascot_theater_for_playful_cartoon_text() {
    let model = bundled();
    let text = "a playful cartoon mascot dancing";
    let attributes = olog::extract_attributes(text, &model);
    let suggestion = olog::suggest_category(text, &attributes, &model);
    assert_eq!(suggestion.primary, Some(Category::MascotTheater));
    assert_eq!(suggestion.alternatives.len(), 2);
    assert!(!suggestion.alternatives.contains(&Category::MascotTheater));
    assert_eq!(suggestion.scores.len(), 7);
}

#[test]
fn suggests_kid_chaos_for_wild_animal_text() {
    let model = bundled();
    let text = "a wild crazy explosion of a dog";
    let attributes = olog::extract_attributes(text, &model);
    let suggestion = olog::suggest_category(text, &attributes, &model);
    assert_eq!(suggestion.primary, Some(Category::KidChaos));
    assert!(suggestion.reasoning.contains("wild"));
}

#[test]
fn renders_emphasis_first_with_negatives() {
    let model = bundled();
    let attributes = olog::extract_attributes("a happy dog running in the park", &model);
    let result =
        olog::transform(&attributes, "mascot_theater", &StyleParams::new(), &model).unwrap();
    let rendered = olog::render(&result, &model).unwrap();

    let axes: Vec<_> = rendered.sections.iter().map(|s| s.axis).collect();
    assert_eq!(
        &axes[..4],
        &[
            AttributeAxis::Subject,
            AttributeAxis::Action,
            AttributeAxis::Setting,
            AttributeAxis::Palette
        ]
    );
    assert!(rendered.text.starts_with("anthropomorphized animal"));
    assert!(rendered.text.contains("blue sky"));
    assert!(rendered.text.ends_with("bright primary colors"));
    assert!(rendered.negative.contains(&"blurry".to_string()));
    assert!(rendered.negative.contains(&"gritty".to_string()));
}

#[test]
fn kid_chaos_variants_follow_presets() {
    let model = bundled();
    let attributes = olog::extract_attributes("a dog running", &model);
    let variants = olog::generate_variants(&attributes, "kid_chaos", 5, &model).unwrap();

    let energies: Vec<_> = variants
        .iter()
        .map(|v| {
            (
                v.preset,
                v.result.attributes().get(AttributeAxis::Energy).unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        energies,
        vec![
            ("Subtle", "high".to_string()),
            ("Balanced", "high".to_string()),
            ("Intense", "extreme".to_string()),
            ("Vintage", "high".to_string()),
            ("Dramatic", "extreme".to_string()),
        ]
    );
    assert!(variants.iter().all(|v| v.result.is_coherent()));
}

#[test]
fn nostalgia_pace_only_applies_to_gentle_presets() {
    let model = bundled();
    let attributes = olog::extract_attributes("a family sitting in the kitchen", &model);
    let variants = olog::generate_variants(&attributes, "nostalgia_revival", 3, &model).unwrap();
    let energy = |idx: usize| {
        variants[idx]
            .result
            .attributes()
            .get(AttributeAxis::Energy)
            .unwrap()
            .to_string()
    };
    assert_eq!(energy(0), "medium");
    assert_eq!(energy(1), "low");
    assert_eq!(energy(2), "low");
}
