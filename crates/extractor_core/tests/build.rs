use extractor_core::{build_results, AttributeSelector, FetchMode, MatchedElement, RawValue};
use pretty_assertions::assert_eq;

#[test]
fn indices_follow_document_order_without_gaps() {
    let elements: Vec<_> = (0..5)
        .map(|i| MatchedElement::new().with_text(format!("item {i}")))
        .collect();

    let results = build_results(&elements, &AttributeSelector::text_content(), FetchMode::Static);

    assert_eq!(results.len(), elements.len());
    let indices: Vec<_> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    assert_eq!(results[0].value, "item 0");
    assert_eq!(results[4].value, "item 4");
}

#[test]
fn placeholders_and_faults_keep_their_slot() {
    let attribute = AttributeSelector::parse("href");
    let elements = vec![
        MatchedElement::new().with_attribute("href", RawValue::Text("/a".to_string())),
        MatchedElement::new(),
        MatchedElement::faulted("stale element"),
        MatchedElement::new().with_attribute("href", RawValue::Text(" ".to_string())),
        MatchedElement::new().with_attribute("href", RawValue::Text("/e".to_string())),
    ];

    let results = build_results(&elements, &attribute, FetchMode::Static);

    let values: Vec<_> = results.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(
        values,
        vec![
            "/a",
            "[No href attribute]",
            "[Error extracting href]",
            "[Empty href]",
            "/e",
        ]
    );
    assert_eq!(results.last().map(|r| r.index), Some(5));
    assert!(results.iter().all(|r| !r.value.is_empty()));
}

#[test]
fn no_elements_no_results() {
    let results = build_results(&[], &AttributeSelector::text_content(), FetchMode::Rendered);
    assert!(results.is_empty());
}
