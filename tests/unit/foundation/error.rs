use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EpicycleError::empty_path("x")
            .to_string()
            .contains("empty path:")
    );
    assert!(
        EpicycleError::degenerate_path("x")
            .to_string()
            .contains("degenerate path:")
    );
    assert!(
        EpicycleError::invalid_needle("x")
            .to_string()
            .contains("invalid needle config:")
    );
    assert!(
        EpicycleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        EpicycleError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        EpicycleError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        EpicycleError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EpicycleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: EpicycleError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, EpicycleError::Serde(_)));
}
