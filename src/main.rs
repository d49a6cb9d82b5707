use clap::Parser;
use windgen::{build, handle_pipe, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Handle commands
    match cli.command {
        Commands::Build(args) => {
            // In quiet mode the progress bar carries status, so only
            // warnings reach stderr; verbose switches to full logging.
            let default_level = if args.verbose { "debug" } else { "warn" };
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(default_level),
            )
            .init();

            match build(&args) {
                Ok(output) => {
                    println!("Build successful!");
                    println!("  - Scanned {} files", output.stats.files_scanned);
                    println!(
                        "  - Generated {} classes ({} bytes)",
                        output.stats.classes_matched, output.stats.css_size_bytes
                    );
                    if !output.warnings.is_empty() {
                        println!("  - Skipped {} files with warnings", output.warnings.len());
                    }
                    if args.dry_run {
                        println!("  - Dry run, nothing written");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Pipe(args) => {
            // CSS goes to stdout; keep stderr quiet unless RUST_LOG says otherwise
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .init();
            handle_pipe(&args).await?;
            Ok(())
        }
    }
}
