use std::io;
use std::path::PathBuf;

use wpscaffold::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config");

    let err = Error::DestinationConflictError { output_dir: "out".to_string() };
    assert_eq!(err.to_string(), "Output directory 'out' already exists and is not empty");

    let err = Error::NotUtf8Error { path: PathBuf::from("main.php") };
    assert_eq!(err.to_string(), "Template file 'main.php' is not valid UTF-8 text");

    assert_eq!(Error::Cancelled.to_string(), "Generation cancelled by user");
}
