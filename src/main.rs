//! evsolve CLI
//!
//! Usage:
//!   evsolve --solve shutter --base 1/125,f/8,100 --aperture f/2.8 --iso 100
//!   evsolve --query "solve=iso base=1/125,f/8,100 shutter=1/500 aperture=f/8 ev=1"
//!   evsolve --list aperture --increment half
//!   evsolve --interactive                    # One query per line
//!   evsolve --serve                          # HTTP API server
//!   evsolve ... --json                       # JSON output

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evsolve::core::api::ErrorResponse;
use evsolve::core::{parse_query_line, run_server, BaseExposure, EngineConfig, ExposureEngine, ExposureQuery};
use evsolve::types::{FormatError, IncrementStep, ParameterKind, SolveError, SolveReport};
use evsolve::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "evsolve",
    version = VERSION,
    about = "Exposure equivalence engine - solve shutter, aperture or ISO",
    long_about = "evsolve keeps a shot equivalently exposed when two of its three\n\
                  settings change, solving for the third and snapping it to a\n\
                  full, half or third stop scale.\n\n\
                  Modes:\n  \
                  --solve        Single solve from flags\n  \
                  --query        Single solve from a one-line query\n  \
                  --list         Print the marked values of a stop table\n  \
                  --interactive  One query per line from stdin\n  \
                  --serve        HTTP API server mode\n\n\
                  Notation:\n  \
                  shutter   1/125, 2.5\", 30\"\n  \
                  aperture  f/2.8, 2.8\n  \
                  ISO       100 .. 102400"
)]
struct Args {
    /// Parameter to solve for (shutter, aperture, iso)
    #[arg(long, value_name = "KIND")]
    solve: Option<ParameterKind>,

    /// Correctly exposed base triple: <shutter>,<aperture>,<iso>
    #[arg(short, long, value_name = "TRIPLE")]
    base: Option<String>,

    /// Target shutter speed
    #[arg(long)]
    shutter: Option<String>,

    /// Target aperture
    #[arg(long)]
    aperture: Option<String>,

    /// Target ISO
    #[arg(long)]
    iso: Option<String>,

    /// Stop increment (full, half, third); defaults to the config value
    #[arg(long)]
    increment: Option<IncrementStep>,

    /// EV compensation in stops, positive brightens
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ev: f64,

    /// One-line query, e.g. "solve=iso base=1/125,f/8,100 shutter=1/500 aperture=f/8"
    #[arg(short, long)]
    query: Option<String>,

    /// Print the marked values for a parameter
    #[arg(long, value_name = "KIND")]
    list: Option<ParameterKind>,

    /// Interactive mode - read queries from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address, overrides the config value
    #[arg(long)]
    addr: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show raw value and rounding detail
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args);

    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        }),
        None => EngineConfig::default(),
    };
    if let Some(addr) = &args.addr {
        config.addr = addr.clone();
    }

    if args.serve {
        run_serve(config).await;
        return;
    }

    let engine = ExposureEngine::with_config(config);

    if let Some(kind) = args.list {
        run_list(&engine, kind, &args);
    } else if let Some(ref line) = args.query {
        match parse_query_line(line)
            .map_err(SolveError::from)
            .and_then(|query| solve_query(&engine, &query))
        {
            Ok(report) => print_report(&report, &args),
            Err(err) => {
                print_error(&err, &args);
                process::exit(1);
            }
        }
    } else if let Some(kind) = args.solve {
        if let Err(err) = run_single(&engine, kind, &args) {
            print_error(&err, &args);
            process::exit(1);
        }
    } else {
        // Default to interactive if no mode specified
        run_interactive(&engine, &args);
    }
}

/// Logs go to stderr so stdout stays parseable; RUST_LOG overrides the level
fn init_tracing(args: &Args) {
    let default_level = if args.serve {
        "info"
    } else if args.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_ansi(!args.no_color))
        .init();
}

/// Build the query from flags and solve it
fn run_single(engine: &ExposureEngine, solve_for: ParameterKind, args: &Args) -> Result<(), SolveError> {
    let base = args
        .base
        .as_deref()
        .ok_or_else(|| FormatError::InvalidQuery("--base <shutter>,<aperture>,<iso> is required".to_string()))?;

    let query = ExposureQuery {
        base: BaseExposure::from_list(base)?,
        solve_for,
        shutter: args.shutter.clone(),
        aperture: args.aperture.clone(),
        iso: args.iso.clone(),
        increment: args.increment,
        ev_compensation: args.ev,
    };

    let report = solve_query(engine, &query)?;
    print_report(&report, args);
    Ok(())
}

fn solve_query(engine: &ExposureEngine, query: &ExposureQuery) -> Result<SolveReport, SolveError> {
    let request = query.to_request(engine.config().default_increment)?;
    let resolution = engine.solve(&request)?;
    Ok(SolveReport::new(
        &resolution,
        request.target_triple(),
        request.solve_for,
        request.increment,
        request.ev_compensation,
    ))
}

/// Print a stop table
fn run_list(engine: &ExposureEngine, kind: ParameterKind, args: &Args) {
    let increment = args.increment.unwrap_or(engine.config().default_increment);
    let values = engine.available_values(kind, increment);

    if args.json {
        #[derive(Serialize)]
        struct Listing<'a> {
            kind: ParameterKind,
            increment: IncrementStep,
            values: &'a [String],
        }
        print_json(&Listing { kind, increment, values: &values }, true);
    } else {
        println!("{} ({} stops, {} values)", kind.display_name().bold(), increment, values.len());
        println!("{}", values.join("  "));
    }
}

/// Run interactive mode
fn run_interactive(engine: &ExposureEngine, args: &Args) {
    print_header("Interactive", args.no_color);
    println!("One query per line, e.g.:");
    println!("  solve=shutter base=1/125,f/8,100 aperture=f/2.8 iso=100 step=full");
    println!("  list aperture half");
    println!("Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut solved = 0usize;

    loop {
        print!("{} ", "evsolve>".cyan());
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Solved: {}", solved);
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("list ") {
            match parse_list_command(rest, engine.config().default_increment) {
                Ok((kind, increment)) => {
                    println!("{}", engine.available_values(kind, increment).join("  "));
                }
                Err(err) => print_error(&err.into(), args),
            }
            continue;
        }

        match parse_query_line(line)
            .map_err(SolveError::from)
            .and_then(|query| solve_query(engine, &query))
        {
            Ok(report) => {
                solved += 1;
                print_report(&report, args);
            }
            Err(err) => print_error(&err, args),
        }
    }
}

/// "<kind> [increment]"
fn parse_list_command(rest: &str, default_increment: IncrementStep) -> Result<(ParameterKind, IncrementStep), FormatError> {
    let mut words = rest.split_whitespace();
    let kind = words
        .next()
        .ok_or_else(|| FormatError::InvalidQuery("list needs a parameter".to_string()))?
        .parse::<ParameterKind>()?;
    let increment = match words.next() {
        Some(word) => word.parse::<IncrementStep>()?,
        None => default_increment,
    };
    Ok((kind, increment))
}

/// Print header
fn print_header(mode: &str, no_color: bool) {
    let title = format!("evsolve v{} - {}", VERSION, mode);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "════════════════════════════════════════".bold());
        println!("  {}", title.bold());
        println!("{}", "════════════════════════════════════════".bold());
    }
    println!();
}

fn print_report(report: &SolveReport, args: &Args) {
    if args.json {
        print_json(report, !args.interactive);
    } else if args.verbose {
        print_verbose(report);
    } else if args.no_color {
        println!("{}", report.to_parseable_string());
    } else {
        println!("{}", report.to_terminal_string());
    }
}

fn print_verbose(report: &SolveReport) {
    println!("┌─────────────────────────────────────");
    println!("│ {} = {}", report.solve_for.display_name(), report.value.bold());
    println!("├─────────────────────────────────────");
    println!("│ raw value:     {:.6}", report.raw_value);
    println!("│ shift:         {:+.3} stops", report.stops_applied);
    println!("│ compensation:  {:+.2} EV", report.ev_compensation);
    println!("│ increment:     {}", report.increment);
    println!("├─────────────────────────────────────");
    println!("│ {} @ {} ISO {}", report.shutter, report.aperture, report.iso);
    println!("│ EV100:         {:.2}", report.ev100);
    println!("└─────────────────────────────────────");
}

fn print_error(err: &SolveError, args: &Args) {
    if args.json {
        print_json(&ErrorResponse::from(err.clone()), !args.interactive);
        return;
    }
    let label = if err.is_format() { "invalid input" } else { "no exposure" };
    eprintln!("{} [{}] {}", format!("✗ {}", label).red(), err.code(), err);
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Run HTTP API server
async fn run_serve(config: EngineConfig) {
    println!();
    println!("════════════════════════════════════════");
    println!("  evsolve API Server");
    println!("  Version: {}", VERSION);
    println!("════════════════════════════════════════");
    println!();

    if let Err(e) = run_server(config).await {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
