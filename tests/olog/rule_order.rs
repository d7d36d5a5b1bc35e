use ologstyle::SpecFormatError;
use ologstyle::core::olog::{self, AttributeAxis, StyleParams, parse_spec};

use crate::olog_fixture::{CATCH_ALL_RULE, EXACT_RULE, MASCOT_RULE, attrs, small_olog};

fn energy_after(rules: &[&str], energy: &str) -> String {
    let model = parse_spec(&small_olog(rules)).unwrap();
    let input = attrs(&[(AttributeAxis::Energy, energy)]);
    let result = olog::transform(&input, "kid_chaos", &StyleParams::new(), &model).unwrap();
    result.attributes().get(AttributeAxis::Energy).unwrap().to_string()
}

#[test]
fn first_declared_rule_wins() {
    assert_eq!(energy_after(&[CATCH_ALL_RULE, EXACT_RULE], "high"), "low");
    assert_eq!(energy_after(&[EXACT_RULE, CATCH_ALL_RULE], "high"), "extreme");
}

#[test]
fn repeated_application_is_deterministic() {
    let model = parse_spec(&small_olog(&[EXACT_RULE, CATCH_ALL_RULE])).unwrap();
    let input = attrs(&[(AttributeAxis::Energy, "medium")]);
    let first = olog::transform(&input, "kid_chaos", &StyleParams::new(), &model).unwrap();
    for _ in 0..10 {
        let again = olog::transform(&input, "kid_chaos", &StyleParams::new(), &model).unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first.applied().len(), 1);
    assert_eq!(first.applied()[0].rule, "settle_down");
}

#[test]
fn rules_of_other_categories_never_fire() {
    let model = parse_spec(&small_olog(&[MASCOT_RULE])).unwrap();
    let input = attrs(&[(AttributeAxis::Energy, "medium")]);
    let result = olog::transform(&input, "kid_chaos", &StyleParams::new(), &model).unwrap();
    assert_eq!(result.attributes().get(AttributeAxis::Energy).unwrap(), "medium");
    assert!(result.applied().is_empty());
}

#[test]
fn rule_output_is_not_fed_to_later_rules() {
    let chain = r"    - name: lift
      category: mascot_theater
      source: energy
      target: energy
      when: low
      output: medium
    - name: lift_again
      category: mascot_theater
      source: energy
      target: energy
      when: medium
      output: high
";
    let model = parse_spec(&small_olog(&[chain])).unwrap();
    let input = attrs(&[(AttributeAxis::Energy, "low")]);
    let result = olog::transform(&input, "mascot_theater", &StyleParams::new(), &model).unwrap();
    assert_eq!(result.attributes().get(AttributeAxis::Energy).unwrap(), "medium");
}

#[test]
fn overlapping_exact_rules_fail_to_load() {
    let doubled = EXACT_RULE.replace("crank_it", "crank_it_again");
    match parse_spec(&small_olog(&[EXACT_RULE, &doubled])) {
        Err(SpecFormatError::ConflictingRules { first, second, .. }) => {
            assert_eq!(first, "crank_it");
            assert_eq!(second, "crank_it_again");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("overlapping rules must not load"),
    }
}

#[test]
fn olog_without_rules_still_checks() {
    let model = parse_spec(&small_olog(&[])).unwrap();
    assert_eq!(model.warnings().len(), 1);
    let input = attrs(&[
        (AttributeAxis::Subject, "animal"),
        (AttributeAxis::Palette, "muted"),
    ]);
    let result = olog::transform(&input, "kid_chaos", &StyleParams::new(), &model).unwrap();
    assert_eq!(result.attributes(), &input);
    assert!(!result.is_coherent());
}
