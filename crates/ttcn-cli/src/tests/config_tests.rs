use super::config::{
    DEFAULT_EXTENSIONS, Project, ProjectConfig, discover_paths, discover_project, load_project,
    parse_config,
};
use std::path::{Path, PathBuf};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test directory");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .expect("file outside the root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn parses_project_file() {
    let config = parse_config(
        r#"{
          "include": ["src/**/*.ttcn"],
          "exclude": ["src/generated/**"],
          "extensions": ["ttcn", ".ttcn3"]
        }"#,
    )
    .expect("should parse ttcn.json");

    assert_eq!(config.include, Some(vec!["src/**/*.ttcn".to_string()]));
    assert_eq!(config.exclude, Some(vec!["src/generated/**".to_string()]));
    assert_eq!(config.extensions(), ["ttcn", "ttcn3"]);
}

#[test]
fn empty_project_uses_defaults() {
    let config = parse_config("{}").expect("should parse empty object");
    assert_eq!(config, ProjectConfig::default());
    assert_eq!(config.extensions(), DEFAULT_EXTENSIONS);
}

#[test]
fn rejects_unknown_keys() {
    assert!(parse_config(r#"{ "includes": [] }"#).is_err());
    assert!(parse_config("not json").is_err());
}

#[test]
fn load_project_from_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "ttcn.json", r#"{ "include": ["**/*.ttcn"] }"#);

    let project = load_project(dir.path()).expect("should load project");
    assert_eq!(project.root, dir.path());
    assert_eq!(project.config.include, Some(vec!["**/*.ttcn".to_string()]));
}

#[test]
fn load_project_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_project(&dir.path().join("absent.json")).expect_err("should fail");
    assert!(
        format!("{err:#}").contains("failed to read project file"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn discover_project_applies_globs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write_file(root, "src/a.ttcn", "module A {}");
    write_file(root, "src/b.ttcn3", "module B {}");
    write_file(root, "src/generated/c.ttcn", "module C {}");
    write_file(root, "src/notes.txt", "");
    write_file(root, "other/d.ttcn", "module D {}");

    let project = Project {
        root: root.to_path_buf(),
        config: ProjectConfig {
            include: Some(vec!["src/**".to_string()]),
            exclude: Some(vec!["src/generated/**".to_string()]),
            extensions: None,
        },
    };
    let files = discover_project(&project).expect("discovery should succeed");
    assert_eq!(relative(root, &files), ["src/a.ttcn", "src/b.ttcn3"]);
}

#[test]
fn discover_project_without_include_takes_all_sources() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    write_file(root, "b.ttcnpp", "module B {}");
    write_file(root, "nested/a.ttcn", "module A {}");
    write_file(root, "readme.md", "");

    let project = Project {
        root: root.to_path_buf(),
        config: ProjectConfig::default(),
    };
    let files = discover_project(&project).expect("discovery should succeed");
    assert_eq!(relative(root, &files), ["b.ttcnpp", "nested/a.ttcn"]);
}

#[test]
fn discover_paths_keeps_files_and_walks_directories() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();
    let explicit = write_file(root, "single.txt", "module S {}");
    write_file(root, "lib/x.ttcn", "module X {}");
    write_file(root, "lib/y.ttcn", "module Y {}");
    write_file(root, "lib/z.asn", "");

    let extensions = vec!["ttcn".to_string()];
    let files = discover_paths(
        &[explicit.clone(), root.join("lib"), root.join("lib/x.ttcn")],
        &extensions,
    )
    .expect("discovery should succeed");
    assert_eq!(relative(root, &files), ["single.txt", "lib/x.ttcn", "lib/y.ttcn"]);

    assert!(discover_paths(&[root.join("missing")], &extensions).is_err());
}
