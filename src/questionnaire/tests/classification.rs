use super::common::*;

use crate::questionnaire::classifier::{classify, ProfileLabel};
use crate::questionnaire::error::ValidationError;
use crate::questionnaire::scoring::score_raw;
use crate::questionnaire::DimensionId;

use ProfileLabel::{DoubleExceptionality, Hpi, Neurotypical, Nuanced, Tdah, Tsa};

#[test]
fn all_never_responses_are_neurotypical() {
    let sheet = score_raw(&raw_uniform(0)).expect("valid responses");
    assert!(sheet.iter().all(|score| score.score == 0));
    assert_eq!(classify(&sheet).labels(), vec![Neurotypical]);
}

#[test]
fn all_always_responses_trigger_every_threshold_rule_in_order() {
    let sheet = score_raw(&raw_uniform(4)).expect("valid responses");
    assert!(sheet.iter().all(|score| score.score == 40));
    assert_eq!(
        classify(&sheet).labels(),
        vec![Hpi, Tdah, Tsa, DoubleExceptionality]
    );
}

#[test]
fn attention_alone_suggests_tdah() {
    let sheet = score_raw(&raw_with_totals([0, 0, 24, 0, 0, 0, 0, 0])).expect("valid responses");
    assert_eq!(sheet.score(DimensionId::D3), 24);
    assert_eq!(classify(&sheet).labels(), vec![Tdah]);
}

#[test]
fn hpi_thresholds_are_inclusive() {
    let sheet = score_raw(&raw_with_totals([20, 0, 0, 20, 24, 28, 0, 0])).expect("valid responses");
    let classification = classify(&sheet);
    assert_eq!(classification.labels(), vec![Hpi]);
    assert_eq!(
        classification.findings()[0].criterion.as_deref(),
        Some("D1 ≥ 20 ET D6 ≥ 28 ET D5 ≥ 24 ET D4 ≥ 20")
    );
}

#[test]
fn nine_answers_for_a_dimension_produce_no_scores() {
    let mut raw = raw_uniform(2);
    raw.insert("D6".to_string(), answers_for_total(18).into_iter().take(9).collect());

    assert_eq!(
        score_raw(&raw),
        Err(ValidationError::ItemCount {
            dimension: DimensionId::D6,
            expected: 10,
            actual: 9,
        })
    );
}

#[test]
fn one_point_below_a_threshold_falls_back_to_nuanced() {
    let classification = classify(&sheet([0, 0, 23, 0, 0, 0, 0, 0]));
    assert!(classification.is_fallback());
    assert_eq!(classification.labels(), vec![Nuanced]);
    assert!(classification.findings()[0].criterion.is_none());
}

#[test]
fn neurotypical_ceiling_is_fifteen_everywhere() {
    assert_eq!(classify(&sheet([15; 8])).labels(), vec![Neurotypical]);
    assert_eq!(classify(&sheet([15, 15, 15, 15, 15, 15, 15, 16])).labels(), vec![Nuanced]);
}

#[test]
fn double_exceptionality_accepts_any_strength() {
    for strong in [DimensionId::D1, DimensionId::D6, DimensionId::D5] {
        let mut totals = [0; 8];
        totals[DimensionId::D7.index()] = 24;
        totals[strong.index()] = 28;
        assert_eq!(
            classify(&sheet(totals)).labels(),
            vec![DoubleExceptionality],
            "strength on {strong}"
        );
    }

    assert_eq!(classify(&sheet([28, 0, 0, 0, 0, 0, 23, 0])).labels(), vec![Nuanced]);
}

#[test]
fn tsa_requires_both_social_and_sensory_scores() {
    assert_eq!(classify(&sheet([0, 24, 0, 24, 0, 0, 0, 0])).labels(), vec![Tsa]);
    assert_eq!(classify(&sheet([0, 24, 0, 23, 0, 0, 0, 0])).labels(), vec![Nuanced]);
}

#[test]
fn classification_is_idempotent_and_never_empty() {
    let samples = [
        [0; 8],
        [40; 8],
        [12, 30, 24, 8, 16, 20, 4, 36],
        [20, 25, 26, 27, 28, 29, 30, 31],
        [16; 8],
    ];

    for totals in samples {
        let sheet = sheet(totals);
        let first = classify(&sheet);
        assert!(!first.labels().is_empty());
        assert_eq!(first, classify(&sheet));

        let labels = first.labels();
        let mut ordered = labels.clone();
        ordered.sort_by_key(|label| {
            [Hpi, Tdah, Tsa, DoubleExceptionality, Neurotypical, Nuanced]
                .iter()
                .position(|candidate| candidate == label)
        });
        assert_eq!(labels, ordered, "labels follow rule order for {totals:?}");
    }
}
