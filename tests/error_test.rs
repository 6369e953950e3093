use std::io;

use project_forge::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forge_err: Error = io_err.into();

    match forge_err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::PathTraversal { path: "../x".to_string(), root: "/out".to_string() };
    assert_eq!(err.to_string(), "Refusing path traversal: '../x' escapes '/out'.");

    let err = Error::DestinationExists { path: "/out/README.md".to_string() };
    assert_eq!(err.to_string(), "File exists: '/out/README.md' (use --force).");

    let err = Error::TemplateNotFound { name: "nope".to_string() };
    assert_eq!(err.to_string(), "Template 'nope' not found. Try: forge list.");

    let err = Error::FeatureNotApplicable {
        name: "python-quality".to_string(),
        reason: "expected pyproject.toml in the project root".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Feature 'python-quality' cannot be applied: expected pyproject.toml in the project root."
    );
}
