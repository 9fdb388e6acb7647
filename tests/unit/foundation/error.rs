use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GlitchwaveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GlitchwaveError::scene("x").to_string().contains("scene error:"));
    assert!(
        GlitchwaveError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        GlitchwaveError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        GlitchwaveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlitchwaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
