use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GenieError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GenieError::capture("x").to_string().contains("capture error:"));
    assert!(GenieError::gpu("x").to_string().contains("gpu error:"));
    assert!(GenieError::usage("x").to_string().contains("usage error:"));
    assert!(
        GenieError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GenieError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn usage_errors_are_not_recoverable() {
    assert!(!GenieError::usage("two children").is_recoverable());
    assert!(GenieError::capture("tainted canvas").is_recoverable());
    assert!(GenieError::gpu("link failed").is_recoverable());
}

#[test]
fn json_errors_map_to_serde() {
    let err: GenieError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, GenieError::Serde(_)));
}
