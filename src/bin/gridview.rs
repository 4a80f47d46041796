//! gridview - Print one page of a JSON record list through a screen schema.
//!
//! Usage:
//!   gridview leave.json --schema leave-schema.json
//!   gridview leave.json --schema s.json -f status=Active -s annual
//!   gridview leave.json --schema s.json --sort name:asc --per-page 20 --page 2
//!   gridview leave.json --schema s.json --select 42

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use gridview::json::{load_records, load_schema};
use gridview::query::parse_sort_arg;
use gridview::view::{build_detail_view, build_table_view, render_detail, render_table};
use gridview::{RecordId, TableController};

/// Filter, search, sort and page a JSON record list.
#[derive(Parser)]
#[command(name = "gridview", about = "Tabular record list viewer")]
struct Args {
    /// JSON file with a bare array of records or a `{ data, meta }` envelope.
    #[arg(value_name = "RECORDS")]
    records: PathBuf,

    /// JSON screen schema declaring field roles and options.
    #[arg(long, value_name = "SCHEMA")]
    schema: PathBuf,

    /// Filter as FIELD=VALUE. Repeatable. VALUE `ALL` clears the field.
    #[arg(short = 'f', long = "filter", value_name = "FIELD=VALUE")]
    filters: Vec<String>,

    /// Case-insensitive substring search over searchable fields.
    #[arg(short = 's', long, value_name = "TEXT")]
    search: Option<String>,

    /// Sort as FIELD[:asc|desc]. Repeating the same field toggles direction.
    #[arg(long = "sort", value_name = "FIELD[:DIR]")]
    sorts: Vec<String>,

    /// Page to show (1-based, clamped).
    #[arg(long, value_name = "N")]
    page: Option<usize>,

    /// Rows per page. Overrides the schema's page size.
    #[arg(long, value_name = "N")]
    per_page: Option<usize>,

    /// Open the detail panel for this record id.
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let schema = match load_schema(&args.schema) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (records, meta) = match load_records(&args.records, &schema) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(meta) = meta {
        tracing::info!(
            "payload is page {}/{} of {} records on the server",
            meta.page,
            meta.total_pages.max(1),
            meta.total
        );
    }

    let mut controller = TableController::new(schema, records);

    for filter in &args.filters {
        let Some((field, value)) = filter.split_once('=') else {
            eprintln!("Error: filter '{}' is not FIELD=VALUE", filter);
            std::process::exit(1);
        };
        if let Err(e) = controller.set_filter(field.trim(), value.trim()) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(ref text) = args.search {
        controller.set_search_query(text);
    }

    for sort in &args.sorts {
        let Some((field, direction)) = parse_sort_arg(sort) else {
            eprintln!("Error: sort '{}' is not FIELD[:asc|desc]", sort);
            std::process::exit(1);
        };
        if let Err(e) = controller.set_sort(&field, direction) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    if args.per_page.is_some() {
        controller.set_page_size(args.per_page);
    }
    if let Some(page) = args.page {
        controller.set_page(page);
    }

    if let Some(ref id) = args.select {
        // Numeric-looking ids may still be stored as JSON strings.
        let parsed = RecordId::parse(id);
        let mut selected = controller.select(parsed.clone());
        if selected.is_err() && matches!(parsed, RecordId::Int(_)) {
            selected = controller.select(RecordId::Text(id.trim().to_string()));
        }
        if let Err(e) = selected {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let title = args
        .records
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    print!("{}", render_table(&build_table_view(&title, &controller)));

    if let Some(detail) = build_detail_view(&controller) {
        println!();
        print!("{}", render_detail(&detail));
    }
}

/// Initializes logging to stderr based on verbosity flags and `RUST_LOG`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("gridview={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
