use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rustyline::{error::ReadlineError, DefaultEditor};
use tf_idf_affinity::{
    analysis::analyze,
    render::{render_cbor, render_json, render_report},
    session::{Command, HELP},
    AffinityError, AppConfig, Session,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tf-idf-affinity", version, about = "Find the fragment closest to a query with TF-IDF")]
struct Cli {
    /// Config file (TOML); defaults to ./affinity.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute once and print the result
    Run(RunArgs),
    /// Interactive mode; fragments and query are kept between runs
    Session,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// File with one fragment per line ("-" reads stdin)
    #[arg(long, short = 'f', conflicts_with = "fragment")]
    fragments_file: Option<PathBuf>,

    /// One fragment; repeat for more
    #[arg(long)]
    fragment: Vec<String>,

    /// Query text; defaults to the configured query
    #[arg(long, short = 'q')]
    query: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the result here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Cbor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match real_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AffinityError>() {
                Some(e) if e.is_input_error() => eprintln!("⚠ {e}"),
                _ => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tf_idf_affinity={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn real_main(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.command.unwrap_or(Commands::Session) {
        Commands::Run(args) => run_once(&config, args),
        Commands::Session => run_session(config),
    }
}

fn run_once(config: &AppConfig, args: RunArgs) -> Result<()> {
    let fragments_text = match (&args.fragments_file, args.fragment.is_empty()) {
        (Some(path), _) => read_fragments(path)?,
        (None, false) => args.fragment.join("\n"),
        (None, true) => config.default_fragments_text(),
    };
    let query = args.query.unwrap_or_else(|| config.default_query.clone());

    let report = analyze(&fragments_text, &query, &config.analysis())?;
    let bytes = match args.format {
        OutputFormat::Text => render_report(&report, config.precision).into_bytes(),
        OutputFormat::Json => {
            let mut json = render_json(&report, config.precision)?;
            json.push('\n');
            json.into_bytes()
        }
        OutputFormat::Cbor => render_cbor(&report, config.precision)?,
    };

    match &args.output {
        Some(path) => fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(&bytes)
            .context("failed to write to stdout")?,
    }
    Ok(())
}

fn read_fragments(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read fragments from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_session(config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new().context("failed to start line editor")?;
    let mut session = Session::new(config);

    println!("TF-IDF affinity. Type a question, or :help for commands.");
    print_inputs(&session);

    loop {
        let line = match rl.readline("query> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        };
        let _ = rl.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Show => print_inputs(&session),
            Command::Reset => {
                session.reset();
                print_inputs(&session);
            }
            Command::Add(text) => session.add_fragment(&text),
            Command::Query(text) => session.set_query(text),
            Command::Fragments => {
                if let Some(text) = read_fragment_block(&mut rl)? {
                    session.set_fragments(text);
                }
            }
            Command::Run => submit(&mut session),
            Command::Ask(text) => {
                session.set_query(text);
                submit(&mut session);
            }
            Command::Unknown(name) => println!("unknown command :{name} (try :help)"),
        }
    }
    Ok(())
}

/// Lines until a single "."; `None` when entry is aborted
fn read_fragment_block(rl: &mut DefaultEditor) -> Result<Option<String>> {
    println!("Enter one fragment per line; finish with a single '.'");
    let mut lines = Vec::new();
    loop {
        match rl.readline("fragment> ") {
            Ok(line) if line.trim() == "." => return Ok(Some(lines.join("\n"))),
            Ok(line) => lines.push(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("fragment entry aborted, keeping the previous fragments");
                return Ok(None);
            }
            Err(err) => return Err(err).context("failed to read input"),
        }
    }
}

fn submit(session: &mut Session) {
    let precision = session.config().precision;
    match session.submit() {
        Ok(report) => println!("\n{}", render_report(report, precision)),
        Err(err) => println!("⚠ {err}"),
    }
}

fn print_inputs(session: &Session) {
    println!("Fragments:");
    for (i, line) in tf_idf_affinity::analysis::parse_fragments(session.fragments_text())
        .iter()
        .enumerate()
    {
        println!("  {}. {}", i + 1, line);
    }
    println!("Query: {}", session.query());
}
