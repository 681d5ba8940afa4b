use neuroprofile::questionnaire::{
    catalog, classify, parse_score_table, project, score_raw, write_score_table, DimensionId,
    ProfileLabel, RawResponses, ValidationError, MAX_DIMENSION_SCORE,
};
use serde_json::{json, Value};

fn alternating_responses() -> RawResponses {
    catalog()
        .iter()
        .map(|dimension| {
            let answers: Vec<Value> = (0..dimension.item_count())
                .map(|index| json!((index + dimension.id.index()) % 5))
                .collect();
            (dimension.label.to_string(), answers)
        })
        .collect()
}

#[test]
fn catalog_holds_eighty_items_across_eight_dimensions() {
    let dimensions = catalog();
    assert_eq!(dimensions.len(), 8);
    assert!(dimensions.iter().all(|dimension| dimension.item_count() == 10));
    assert_eq!(
        dimensions.iter().map(|dimension| dimension.id).collect::<Vec<_>>(),
        DimensionId::ordered().to_vec()
    );
    assert_eq!(dimensions[0].label, "D1 - Traitement de l’information");
}

#[test]
fn label_keyed_responses_score_within_bounds() {
    let sheet = score_raw(&alternating_responses()).expect("valid responses");

    for score in &sheet {
        assert_eq!(score.max, MAX_DIMENSION_SCORE);
        assert!(score.score <= MAX_DIMENSION_SCORE);
    }
    // Ten consecutive values mod 5 always sum to twice 0+1+2+3+4.
    assert!(sheet.iter().all(|score| score.score == 20));
}

#[test]
fn pipeline_from_responses_to_table_and_back() {
    let mut raw = alternating_responses();
    raw.insert(
        DimensionId::D3.label().to_string(),
        vec![json!(4); 10],
    );

    let sheet = score_raw(&raw).expect("valid responses");
    let classification = classify(&sheet);
    assert!(classification.contains(ProfileLabel::Tdah));

    let radar = project(&sheet);
    assert_eq!(radar.points.len(), 9);
    assert_eq!(radar.points.first(), radar.points.last());
    assert!((radar.points[2].ratio - 1.0).abs() < f64::EPSILON);

    let table = write_score_table(&sheet).expect("table writes");
    let parsed = parse_score_table(table.as_bytes()).expect("table parses");
    assert_eq!(parsed, sheet);
    assert_eq!(classify(&parsed), classification);
}

#[test]
fn malformed_responses_are_rejected_without_scores() {
    let mut raw = alternating_responses();
    raw.insert("D9".to_string(), vec![json!(0); 10]);
    assert_eq!(
        score_raw(&raw),
        Err(ValidationError::UnknownDimension {
            key: "D9".to_string()
        })
    );

    let mut raw = alternating_responses();
    raw.insert(DimensionId::D1.label().to_string(), {
        let mut answers = vec![json!(1); 10];
        answers[0] = json!(2.5);
        answers
    });
    assert!(matches!(
        score_raw(&raw),
        Err(ValidationError::NonIntegerResponse {
            dimension: DimensionId::D1,
            item: 1,
            ..
        })
    ));
}
