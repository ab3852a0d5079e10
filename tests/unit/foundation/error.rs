use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RibbonError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RibbonError::asset("x").to_string().contains("asset error:"));
    assert!(
        RibbonError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn index_error_names_the_list() {
    let msg = RibbonError::index("stripe", 3, 2).to_string();
    assert!(msg.contains("stripe"));
    assert!(msg.contains('3'));
    assert!(msg.contains("len 2"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RibbonError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
