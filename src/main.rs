use clap::Parser;
use netcmp::cli::Cli;
use netcmp::engine::Netcmp;
use netcmp::logger::{Event, Logger};
use netcmp::report;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command-line arguments. Usage errors exit with status 2 here.
    let cli = Cli::parse();
    let settings = cli.settings();

    let logger = match Logger::new(cli.json, settings.debug, cli.log_file.as_deref()) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("netcmp: cannot open log file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // ── Ingest ───────────────────────────────────────────────────────────────
    // Every file is folded in completely before the next is opened. The first
    // bad file aborts the run; no partial report is printed.
    let mut netcmp = Netcmp::new();
    for path in &cli.files {
        if let Err(e) = netcmp.ingest_file(path, &logger) {
            logger.log(&Event::Error { message: &e.to_string() });
            return ExitCode::FAILURE;
        }
    }

    for source in netcmp.sources().iter() {
        logger.debug(&Event::KnownSource {
            ip:    &source.ip,
            label: &source.label,
        });
    }

    // ── Classify and report ──────────────────────────────────────────────────
    let result = netcmp.classify(settings.max_examples, &logger);

    if let Err(e) = report::write_overflow_warning(&mut io::stderr().lock(), &result) {
        logger.log(&Event::Error { message: &e.to_string() });
        return ExitCode::FAILURE;
    }

    let mut stdout = io::stdout().lock();
    let written = report::write_report(&mut stdout, &result, &settings)
        .and_then(|()| stdout.flush());
    if let Err(e) = written {
        logger.log(&Event::Error { message: &e.to_string() });
        return ExitCode::FAILURE;
    }

    logger.log(&Event::RunSummary {
        files:       netcmp.files(),
        sources:     netcmp.sources().len(),
        connections: netcmp.connections().len(),
        counts:      result.counts,
    });

    ExitCode::SUCCESS
}
