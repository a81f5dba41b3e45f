use clap::Parser;

use super::args::{CliArgs, ColorChoice, LogFormat, OutputFormat};

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["ttcn"]).expect("default args should parse");

    assert!(args.paths.is_empty());
    assert!(args.project.is_none());
    assert_eq!(args.format, OutputFormat::Text);
    assert_eq!(args.color, ColorChoice::Auto);
    assert!(!args.list_files);
    assert!(!args.symbols);
    assert_eq!(args.verbose, 0);
    assert_eq!(args.log_format, LogFormat::Text);
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "ttcn",
        "--project",
        "configs/ttcn.json",
        "--format",
        "json",
        "--color",
        "never",
        "--list-files",
        "--symbols",
        "src",
        "lib/Types.ttcn",
    ])
    .expect("flagged args should parse");

    assert_eq!(
        args.project.as_deref(),
        Some(std::path::Path::new("configs/ttcn.json"))
    );
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.color, ColorChoice::Never);
    assert!(args.list_files);
    assert!(args.symbols);
    assert_eq!(
        args.paths,
        vec![
            std::path::PathBuf::from("src"),
            std::path::PathBuf::from("lib/Types.ttcn")
        ]
    );
}

#[test]
fn rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["ttcn", "--format", "xml"]).is_err());
}

#[test]
fn explicit_color_choices() {
    assert!(ColorChoice::Always.enabled());
    assert!(!ColorChoice::Never.enabled());
}
