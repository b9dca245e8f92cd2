use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SketchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SketchError::render("x").to_string().contains("render error:"));
    assert!(
        SketchError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn load_errors_name_the_model() {
    let err = SketchError::model_not_ready("owl");
    assert!(err.to_string().contains("'owl'"));

    let err = SketchError::LoadTimeout {
        model_id: "cat".to_owned(),
        waited: Duration::from_millis(250),
    };
    let s = err.to_string();
    assert!(s.contains("'cat'"));
    assert!(s.contains("250ms"));

    let err = SketchError::load_failed("dog", "missing file");
    assert!(err.to_string().contains("missing file"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SketchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
