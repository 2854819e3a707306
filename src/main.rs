use clap::Parser;
use ui_coverage::cli::commands::{cmd_run, cmd_scan};
use ui_coverage::cli::config::{Cli, Commands, load_config, parse_identifier_mode};
use ui_coverage::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let mut config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    match cli.command {
        Commands::Run {
            spec,
            report,
            identifiers,
            headed,
        } => {
            if let Some(path) = report {
                config.coverage.report_path = path;
            }
            if let Some(value) = identifiers {
                config.coverage.identifiers = parse_identifier_mode(&value)
                    .ok_or_else(|| format!("unknown identifier mode '{}' (expected unified or legacy)", value))?;
            }
            if headed {
                config.browser.headless = false;
            }

            let all_passed = cmd_run(&spec, &config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Scan { url, headed } => {
            if headed {
                config.browser.headless = false;
            }
            cmd_scan(&url, &config)?;
        }
    }

    Ok(())
}
