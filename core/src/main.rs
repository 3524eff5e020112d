use clap::Parser;
use log::{error, info};
use radprep_core::cli::{Cli, Command, LogObserver, ReportFormat};
use radprep_core::{PrepConfig, RadiomicsPipeline, RunReport, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let result = match &cli.command {
        Command::Build(search) => {
            let config = search.to_config();
            info!("Processing directory: {}", config.root.display());
            let pipeline = RadiomicsPipeline::new(config, Default::default());
            pipeline
                .prepare_manifest(&mut LogObserver)
                .map(|build| RunReport {
                    manifest_rows: build.records_written,
                    build: Some(build),
                    extraction: None,
                })
        }
        Command::Extract(args) => {
            let request = args.tool.to_request(&args.manifest);
            let config = PrepConfig::default().with_manifest_path(&args.manifest);
            RadiomicsPipeline::new(config, request).extract_existing()
        }
        Command::Run { search, tool } => {
            let config = search.to_config();
            info!("Processing directory: {}", config.root.display());
            let request = tool.to_request(&config.manifest_path);
            RadiomicsPipeline::new(config, request).run(&mut LogObserver)
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_report(&report, &cli.report);

    // Tool failures are reported, not fatal, but still reflected in the exit status
    if !report.is_success() {
        process::exit(2);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_report(report: &RunReport, format: &ReportFormat) {
    match format {
        ReportFormat::Text => {
            println!("{}", TextReport::new(report));
        }
        ReportFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                let _ = report;
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
