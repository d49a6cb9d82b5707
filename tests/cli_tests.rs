use clap::Parser;
use windgen::{BuildArgs, Cli, Commands};

#[test]
fn test_cli_parse_basic() {
    let args = vec!["windgen", "build", "-i", "*.html", "-o", "output.css"];

    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Build(args) => {
            assert_eq!(args.input, vec!["*.html"]);
            assert_eq!(args.output.to_str().unwrap(), "output.css");
            assert!(args.config.is_none());
            assert!(args.report.is_none());
            assert_eq!(args.root.to_str().unwrap(), ".");
            assert!(!args.minify);
            assert!(!args.verbose);
            assert!(!args.dry_run);
            assert_eq!(args.timeout_ms, 5000);
            assert_eq!(args.max_file_size, 10 * 1024 * 1024);
        }
        Commands::Pipe(_) => panic!("Unexpected Pipe command"),
    }
}

#[test]
fn test_cli_parse_with_flags() {
    let args = vec![
        "windgen",
        "build",
        "-i",
        "**/*.html",
        "-i",
        "src/**/*.rs",
        "-o",
        "dist/styles.css",
        "--report",
        "dist/report.json",
        "--root",
        "site",
        "--minify",
        "--verbose",
        "--dry-run",
        "-j",
        "4",
        "--timeout",
        "1000",
        "--max-file-size",
        "1048576",
    ];

    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Build(args) => {
            assert_eq!(args.input, vec!["**/*.html", "src/**/*.rs"]);
            assert_eq!(args.output.to_str().unwrap(), "dist/styles.css");
            assert_eq!(args.report.unwrap().to_str().unwrap(), "dist/report.json");
            assert_eq!(args.root.to_str().unwrap(), "site");
            assert!(args.minify);
            assert!(args.verbose);
            assert!(args.dry_run);
            assert_eq!(args.jobs, Some(4));
            assert_eq!(args.timeout_ms, 1000);
            assert_eq!(args.max_file_size, 1048576);
        }
        Commands::Pipe(_) => panic!("Unexpected Pipe command"),
    }
}

#[test]
fn test_cli_parse_with_config() {
    let args = vec!["windgen", "build", "-c", "windgen.json", "-o", "output.css"];

    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Build(args) => {
            assert_eq!(args.config.unwrap().to_str().unwrap(), "windgen.json");
            // Content patterns may come entirely from the config file
            assert!(args.input.is_empty());
        }
        Commands::Pipe(_) => panic!("Unexpected Pipe command"),
    }
}

#[test]
fn test_build_args_validate() {
    let mut args = BuildArgs {
        config: None,
        input: vec!["*.html".to_string()],
        output: "output.css".into(),
        report: None,
        root: ".".into(),
        minify: false,
        jobs: None,
        timeout_ms: 5000,
        max_file_size: 10 * 1024 * 1024,
        dry_run: false,
        verbose: false,
    };

    // Valid args should pass
    assert!(args.validate().is_ok());

    // No patterns and no config should fail
    args.input.clear();
    assert!(args.validate().is_err());

    // A config file alone is enough
    args.config = Some("windgen.json".into());
    assert!(args.validate().is_ok());
    args.input.push("*.html".to_string());

    // CSS and report paths must differ
    args.report = Some(args.output.clone());
    assert!(args.validate().is_err());
    args.report = Some("report.json".into());
    assert!(args.validate().is_ok());

    // Zero jobs should fail
    args.jobs = Some(0);
    assert!(args.validate().is_err());

    // Positive jobs should pass
    args.jobs = Some(4);
    assert!(args.validate().is_ok());
}

#[test]
fn test_cli_parse_pipe_command() {
    // Basic pipe command
    let cli = Cli::parse_from(vec!["windgen", "pipe"]);

    match cli.command {
        Commands::Pipe(args) => {
            assert!(!args.minify);
            assert!(args.config.is_none());
        }
        _ => panic!("Expected Pipe command"),
    }

    // Pipe with minify and a theme config
    let cli = Cli::parse_from(vec!["windgen", "pipe", "--minify", "-c", "windgen.json"]);

    match cli.command {
        Commands::Pipe(args) => {
            assert!(args.minify);
            assert_eq!(args.config.unwrap().to_str().unwrap(), "windgen.json");
        }
        _ => panic!("Expected Pipe command"),
    }
}

#[test]
fn test_cli_requires_output_for_build() {
    let result = Cli::try_parse_from(vec!["windgen", "build", "-i", "*.html"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    let result = Cli::try_parse_from(vec!["windgen", "watch"]);
    assert!(result.is_err());
}
