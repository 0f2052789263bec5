use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SwarmError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SwarmError::config("x").to_string().contains("config error:"));
    assert!(SwarmError::font("x").to_string().contains("font error:"));
    assert!(
        SwarmError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SwarmError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
