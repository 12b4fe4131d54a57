use clap::{value_parser, Arg, ArgMatches, Command};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pdf_name_lookup::config::{LookupConfig, DEFAULT_MAX_PDF_MB, DEFAULT_UPLOAD_DIR, MAX_MARKER_WIDTH};
use pdf_name_lookup::mcp::server::McpServer;
use pdf_name_lookup::roster::{find_name, EntryExtractor, DEFAULT_MARKER_WIDTH};
use pdf_name_lookup::tools::load_local_text;

#[cfg(test)]
mod test_support;

/// Prints a framed banner to stderr. Empty strings become blank lines.
fn print_box(lines: &[&str]) {
    const BOX_WIDTH: usize = 60;
    const CONTENT_WIDTH: usize = BOX_WIDTH - 4;

    eprintln!("\n\x1b[36m╔{}╗", "═".repeat(BOX_WIDTH - 2));
    for line in lines {
        let visible_len = line.chars().count();
        if visible_len < CONTENT_WIDTH {
            let left = (CONTENT_WIDTH - visible_len) / 2;
            let right = CONTENT_WIDTH - visible_len - left;
            eprintln!("║  {}{}{}  ║", " ".repeat(left), line, " ".repeat(right));
        } else {
            eprintln!("║  {}  ║", line);
        }
    }
    eprintln!("╚{}╝\x1b[0m\n", "═".repeat(BOX_WIDTH - 2));
}

fn build_cli() -> Command {
    Command::new("pdf-name-lookup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Look up Arabic names in numbered PDF rosters")
        .long_about(
            "Runs a Model Context Protocol server on stdio with these tools:\n\
            - search-name: check whether a name appears in an uploaded PDF roster\n\
            - list-entries: list the numbered entries extracted from an uploaded PDF\n\n\
            With --pdf and --name it instead performs a single lookup against a local file,\n\
            prints the result as JSON and exits with 0 (found), 1 (not found) or 2 (error).",
        )
        .arg(
            Arg::new("upload-dir")
                .long("upload-dir")
                .value_name("DIR")
                .help("Directory where uploads are staged [env: PDF_LOOKUP_UPLOAD_DIR] [default: uploads]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("marker-width")
                .long("marker-width")
                .value_name("DIGITS")
                .help("Digits in the identifiers that delimit entries [env: PDF_LOOKUP_MARKER_WIDTH] [default: 4]")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-pdf-mb")
                .long("max-pdf-mb")
                .value_name("MB")
                .help("Largest PDF accepted, in MiB")
                .default_value("50")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("pdf")
                .long("pdf")
                .value_name("PATH")
                .help("Run a single lookup against this PDF (the file is left in place)")
                .requires("name")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Name to look up in --pdf")
                .requires("pdf"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Suppress the banner and log only errors")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(quiet: bool) {
    // stdout carries JSON-RPC or the lookup result, so logs go to stderr only
    let default_level = if quiet { "error" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<LookupConfig, String> {
    let upload_dir = matches
        .get_one::<PathBuf>("upload-dir")
        .cloned()
        .or_else(|| env::var("PDF_LOOKUP_UPLOAD_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

    let marker_width = match matches.get_one::<usize>("marker-width") {
        Some(width) => *width,
        None => match env::var("PDF_LOOKUP_MARKER_WIDTH") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("PDF_LOOKUP_MARKER_WIDTH is not a number: {}", e))?,
            Err(_) => DEFAULT_MARKER_WIDTH,
        },
    };
    if !(1..=MAX_MARKER_WIDTH).contains(&marker_width) {
        return Err(format!(
            "marker width must be between 1 and {}, got {}",
            MAX_MARKER_WIDTH, marker_width
        ));
    }

    let max_pdf_mb = matches
        .get_one::<u64>("max-pdf-mb")
        .copied()
        .unwrap_or(DEFAULT_MAX_PDF_MB);

    Ok(LookupConfig {
        upload_dir,
        marker_width,
        max_pdf_bytes: max_pdf_mb * 1024 * 1024,
    })
}

async fn run_single_lookup(config: &LookupConfig, pdf: &Path, name: &str) -> i32 {
    let extractor = match EntryExtractor::new(config.marker_width) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Invalid marker width: {}", e);
            return 2;
        }
    };

    match load_local_text(pdf, config.max_pdf_bytes).await {
        Ok(text) => {
            let result = find_name(&extractor, &text, name);
            println!("{}", result.to_json());
            if result.is_found() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            error!(code = e.code(), "Lookup could not run: {}", e);
            println!("{}", e.to_payload(serde_json::json!({ "file": pdf.display().to_string() })));
            2
        }
    }
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();
    let quiet = matches.get_flag("quiet");

    init_logging(quiet);

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    if let (Some(pdf), Some(name)) = (
        matches.get_one::<PathBuf>("pdf"),
        matches.get_one::<String>("name"),
    ) {
        let code = run_single_lookup(&config, pdf, name).await;
        process::exit(code);
    }

    if !config.upload_dir.is_dir() {
        warn!(
            "Upload directory {} does not exist yet; lookups will fail until it is created",
            config.upload_dir.display()
        );
    }

    if !quiet {
        print_box(&[
            "",
            "PDF Name Lookup",
            "",
            "Model Context Protocol server for PDF rosters",
            "",
        ]);
    }

    info!("Starting MCP server...");

    let server = match McpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure server: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = server.start().await {
        error!("Failed to start server: {}", e);
        process::exit(1);
    }
}
