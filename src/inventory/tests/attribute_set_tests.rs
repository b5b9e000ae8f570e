//! Tests for attribute set cycle detection and evaluation order.

use crate::inventory::domain::{
    Attribute, AttributeFilter, AttributeSet, evaluation_order, find_cycle,
};
use crate::validation::ValidationError;
use rstest::rstest;
use std::collections::BTreeSet;

fn named_set(name: &str) -> (AttributeSet, Attribute) {
    let representative = Attribute::for_attribute_set(name).expect("valid set attribute");
    let set = AttributeSet::new(name, &representative).expect("valid set");
    (set, representative)
}

#[rstest]
fn independent_sets_have_no_cycle() {
    let (alpha, alpha_attribute) = named_set("alpha");
    let (beta, _) = named_set("beta");
    let candidate = beta.with_filter(&AttributeFilter::new().including([alpha_attribute.id()]));

    assert_eq!(find_cycle(&candidate, &[alpha]), None);
}

#[rstest]
fn mutual_reference_is_a_cycle() {
    let (alpha, alpha_attribute) = named_set("alpha");
    let (beta, beta_attribute) = named_set("beta");
    let stored_alpha = alpha.with_filter(&AttributeFilter::new().including([beta_attribute.id()]));
    let candidate = beta.with_filter(&AttributeFilter::new().excluding([alpha_attribute.id()]));

    let path = find_cycle(&candidate, &[stored_alpha]).expect("cycle detected");

    assert_eq!(path, vec!["beta".to_owned(), "alpha".to_owned(), "beta".to_owned()]);
}

#[rstest]
fn self_reference_is_a_cycle() {
    let (alpha, alpha_attribute) = named_set("alpha");
    let candidate = alpha.with_filter(&AttributeFilter::new().including([alpha_attribute.id()]));

    assert_eq!(
        find_cycle(&candidate, &[]),
        Some(vec!["alpha".to_owned(), "alpha".to_owned()])
    );
}

#[rstest]
fn dependencies_are_evaluated_first() {
    let (base, base_attribute) = named_set("base");
    let (derived, _) = named_set("derived");
    let dependent = derived.with_filter(&AttributeFilter::new().including([base_attribute.id()]));
    let sets = vec![dependent, base];

    let ordered = evaluation_order(&sets).expect("acyclic sets");
    let names: Vec<&str> = ordered.iter().map(|set| set.name()).collect();

    assert_eq!(names, vec!["base", "derived"]);
}

#[rstest]
fn stored_cycle_blocks_evaluation() {
    let (alpha, alpha_attribute) = named_set("alpha");
    let (beta, beta_attribute) = named_set("beta");
    let sets = vec![
        alpha.with_filter(&AttributeFilter::new().including([beta_attribute.id()])),
        beta.with_filter(&AttributeFilter::new().including([alpha_attribute.id()])),
    ];

    let result = evaluation_order(&sets);

    assert!(matches!(result, Err(ValidationError::CircularAttributeSet { .. })));
}

#[rstest]
fn disabled_set_admits_nothing() {
    let (set, _) = named_set("everything");
    let disabled = set.enabled(false);
    assert!(!disabled.admits(&BTreeSet::new()));
}
