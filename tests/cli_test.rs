use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use wpscaffold::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("wpscaffold")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./my-plugin"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.output_dir, PathBuf::from("./my-plugin"));
    assert_eq!(parsed.template, PathBuf::from("."));
    assert_eq!(parsed.config, None);
    assert!(!parsed.stdin);
    assert!(!parsed.defaults);
    assert!(!parsed.dry_run);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--template",
        "./accessly",
        "--config",
        "./custom.yml",
        "--stdin",
        "--defaults",
        "--dry-run",
        "--verbose",
        "./my-plugin",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, PathBuf::from("./accessly"));
    assert_eq!(parsed.config, Some(PathBuf::from("./custom.yml")));
    assert!(parsed.stdin);
    assert!(parsed.defaults);
    assert!(parsed.dry_run);
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-t", "./accessly", "-s", "-y", "-v", "./my-plugin"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, PathBuf::from("./accessly"));
    assert!(parsed.stdin);
    assert!(parsed.defaults);
    assert!(parsed.verbose);
}

#[test]
fn test_missing_args() {
    let args = make_args(&[]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./my-plugin", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
