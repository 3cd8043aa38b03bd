use nextmap_lib::SnapError;

#[test]
fn config_error_display_includes_message() {
    let err = SnapError::Config("missing output file name".to_string());

    assert_eq!(
        format!("{}", err),
        "Configuration error: missing output file name"
    );
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: SnapError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn invalid_url_converts_from_parse_error() {
    let parse_err = url::Url::parse("not a url").unwrap_err();
    let err: SnapError = parse_err.into();

    assert!(format!("{}", err).starts_with("Invalid URL: "));
    assert!(err.remediation().unwrap().contains("https://"));
}

#[test]
fn browser_error_display_includes_message() {
    let err = SnapError::browser("zoom-in control not found in the website-map shadow root");

    assert_eq!(
        format!("{}", err),
        "Browser error: zoom-in control not found in the website-map shadow root"
    );
}

#[test]
fn timeout_display_and_hint() {
    let err = SnapError::Timeout("capture did not finish within 120s".to_string());

    assert_eq!(
        format!("{}", err),
        "Timed out: capture did not finish within 120s"
    );
    assert!(err.remediation().unwrap().contains("--process-timeout"));
}

#[test]
fn annotate_error_display_includes_command_detail() {
    let err = SnapError::annotate("'convert' exited with status exit status: 1: no decode");

    assert!(format!("{}", err).starts_with("Annotation error: "));
    assert!(format!("{}", err).contains("convert"));
}
