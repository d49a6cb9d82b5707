use std::fs;
use tempfile::TempDir;
use windgen::{build, run, BuildArgs, Config, Error, RunOptions};

fn build_args(temp_dir: &TempDir) -> BuildArgs {
    BuildArgs {
        config: None,
        input: vec!["*.html".to_string()],
        output: temp_dir.path().join("output.css"),
        report: None,
        root: temp_dir.path().to_path_buf(),
        minify: false,
        jobs: None,
        timeout_ms: 5000,
        max_file_size: 10 * 1024 * 1024,
        dry_run: false,
        verbose: true,
    }
}

#[test]
fn test_missing_config_file_names_the_path() {
    let temp_dir = TempDir::new().unwrap();

    let mut args = build_args(&temp_dir);
    args.config = Some(temp_dir.path().join("nope.json"));

    let err = build(&args).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    let error_msg = format!("{}", err);
    assert!(
        error_msg.contains("nope.json"),
        "Error message should contain the config path: {}",
        error_msg
    );
}

#[test]
fn test_malformed_config_json_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("windgen.json");
    fs::write(&config_path, "{ content: oops").unwrap();

    let mut args = build_args(&temp_dir);
    args.config = Some(config_path);

    let err = build(&args).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(format!("{}", err).contains("windgen.json"));
}

#[test]
fn test_invalid_glob_pattern_mentions_the_pattern() {
    let config = Config::from_json_str(r#"{ "content": { "files": ["[invalid glob"] } }"#).unwrap();

    let err = run(&config, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    let error_msg = format!("{}", err);
    assert!(
        error_msg.contains("[invalid glob"),
        "Error should mention the offending pattern: {}",
        error_msg
    );
}

#[test]
fn test_malformed_animation_shorthand_names_the_alias() {
    let config = Config::from_json_str(
        r#"{
            "content": { "files": ["*.html"] },
            "theme": { "extend": { "animation": { "wobble": "too short" } } }
        }"#,
    )
    .unwrap();

    let err = run(&config, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    let error_msg = format!("{}", err);
    assert!(
        error_msg.contains("wobble"),
        "Error should name the bad alias: {}",
        error_msg
    );
}

#[test]
fn test_non_mapping_theme_category_is_rejected() {
    let config = Config::from_json_str(
        r#"{
            "content": { "files": ["*.html"] },
            "theme": { "extend": { "colors": ["not", "a", "mapping"] } }
        }"#,
    )
    .unwrap();

    let err = run(&config, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(format!("{}", err).contains("theme.extend.colors"));
}

#[test]
fn test_config_errors_fire_before_any_scanning() {
    let temp_dir = TempDir::new().unwrap();
    // A matching file exists, but the theme is broken; no partial output
    // should appear anywhere.
    fs::write(temp_dir.path().join("page.html"), r#"class="flex""#).unwrap();

    let config = Config::from_json_str(
        r#"{
            "content": { "files": ["*.html"] },
            "theme": { "extend": { "animation": { "bad": "spin" } } }
        }"#,
    )
    .unwrap();
    let options = RunOptions {
        root: temp_dir.path().to_path_buf(),
        ..Default::default()
    };

    let err = run(&config, &options).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[cfg(unix)]
#[test]
fn test_error_message_for_write_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("page.html"),
        r#"<div class="flex">Test</div>"#,
    )
    .unwrap();

    // Output directory with no write permission
    let output_dir = temp_dir.path().join("no_write");
    fs::create_dir(&output_dir).unwrap();
    let mut perms = fs::metadata(&output_dir).unwrap().permissions();
    perms.set_mode(0o555);
    fs::set_permissions(&output_dir, perms.clone()).unwrap();

    let mut args = build_args(&temp_dir);
    args.output = output_dir.join("output.css");

    let result = build(&args);

    // Restore permissions for cleanup
    perms.set_mode(0o755);
    fs::set_permissions(&output_dir, perms).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
    let error_msg = format!("{}", err);
    assert!(
        error_msg.contains("output.css"),
        "Error should name the output path: {}",
        error_msg
    );
}

#[test]
fn test_scan_problems_are_warnings_not_errors() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("good.html"), r#"class="flex""#).unwrap();
    fs::write(temp_dir.path().join("huge.html"), "x".repeat(4096)).unwrap();

    let config = Config::from_json_str(r#"{ "content": { "files": ["*.html"] } }"#).unwrap();
    let mut options = RunOptions {
        root: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    options.limits.max_file_size = 1024;

    // The oversized file becomes a warning; the run itself succeeds.
    let output = run(&config, &options).unwrap();
    assert!(output.css.contains(".flex"));
    assert_eq!(output.warnings.len(), 1);
}
