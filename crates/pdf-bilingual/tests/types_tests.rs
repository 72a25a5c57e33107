use pdf_bilingual::*;

#[test]
fn test_paper_size_dimensions() {
    assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
    assert_eq!(PaperSize::A3.dimensions_mm(), (297.0, 420.0));
    assert_eq!(PaperSize::Letter.dimensions_mm(), (215.9, 279.4));
    assert_eq!(
        PaperSize::A4.dimensions_with_orientation(Orientation::Landscape),
        (297.0, 210.0)
    );
}

#[test]
fn test_language_labels() {
    assert_eq!(Language::En.other(), Language::Ja);
    assert_eq!(Language::Ja.other(), Language::En);
    assert_eq!(Language::Ja.native_label(), "日本語");
    assert!(Language::Ja.latin_label().is_ascii());
    assert_eq!(Section::Body(Language::Ja).to_string(), "ja");
    assert_eq!(Section::Toc.to_string(), "toc");
}

#[test]
fn test_language_accepts_upper_case() {
    let language: Language = serde_json::from_str("\"JA\"").unwrap();
    assert_eq!(language, Language::Ja);
    assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
}

#[test]
fn test_page_range_bounds() {
    let range = PageRange {
        section: Section::Body(Language::En),
        start_page: 5,
        page_count: 3,
    };
    assert_eq!(range.end_page(), 7);
    assert_eq!(range.first_index(), 4);
    assert_eq!(range.indices(), 4..7);
    assert!(range.contains(5) && range.contains(7));
    assert!(!range.contains(4) && !range.contains(8));
}

#[test]
fn test_error_kinds() {
    let cases = [
        (BilingualError::Validation("x".into()), ErrorKind::Validation),
        (
            BilingualError::EmptySection(Section::Toc),
            ErrorKind::Validation,
        ),
        (
            BilingualError::PayloadTooLarge {
                field: "htmlFirst",
                size: 2,
                limit: 1,
            },
            ErrorKind::PayloadTooLarge,
        ),
        (
            BilingualError::Timeout {
                section: Section::Toc,
                after: std::time::Duration::from_secs(1),
            },
            ErrorKind::Render,
        ),
        (BilingualError::Assembly("x".into()), ErrorKind::Assembly),
    ];
    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{}", error);
    }
    assert_eq!(ErrorKind::PayloadTooLarge.as_str(), "payload_too_large");
}

#[test]
fn test_toc_spec_validation() {
    let toc = TocSpec {
        title: "Report".to_string(),
        date: "2026-10-01".to_string(),
        ..Default::default()
    };
    assert!(toc.validate(64).is_ok());

    let missing_date = TocSpec {
        date: " ".to_string(),
        ..toc.clone()
    };
    assert!(matches!(
        missing_date.validate(64),
        Err(BilingualError::Validation(_))
    ));

    let long_client = TocSpec {
        client_name: Some("x".repeat(65)),
        ..toc
    };
    match long_client.validate(64) {
        Err(BilingualError::PayloadTooLarge { field, .. }) => assert_eq!(field, "toc.clientName"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_annotation_warning_message() {
    let warning = AnnotationWarning {
        section: Section::Body(Language::Ja),
        reason: "target page 12 is outside the document".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "link to ja skipped: target page 12 is outside the document"
    );
}
