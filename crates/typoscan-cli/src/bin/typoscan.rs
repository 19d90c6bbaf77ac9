// typoscan: find misspellings in text files and report them grouped.
//
// Usage: typoscan [OPTIONS] [FILE]...
//
// With no files, or with `-`, standard input is read.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use typoscan_check::speller::{HunspellSpeller, hunspell};
use typoscan_check::tokenizer::Tokenizer;
use typoscan_check::{CachedSpeller, Detector, Misspellings, NullSpeller, Speller};
use typoscan_cli::config::{self, DEFAULT_LANGUAGE, NO_DICTIONARY};
use typoscan_cli::input::{self, InputEncoding, STDIN};
use typoscan_cli::pager::Output;
use typoscan_cli::render::{DEFAULT_CONTEXT_WIDTH, RenderOptions, Renderer};
use typoscan_cli::{ScanError, scan_input};
use typoscan_dict::{BlacklistDictionary, PatternDictionary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Color,
}

/// Find misspellings and show them grouped by word or by line.
#[derive(Parser, Debug)]
#[command(name = "typoscan", version, about, long_about = None)]
struct Args {
    /// Files to check (`-` for standard input)
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Language of the input
    #[arg(short, long, value_name = "LANG", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// List languages with an installed spell checker dictionary
    #[arg(long)]
    list_languages: bool,

    /// Directory with per-language rule files
    #[arg(long, value_name = "DIR", env = config::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Directories with Hunspell dictionaries (colon-separated in the environment)
    #[arg(long, value_name = "DIR", env = config::DICPATH_ENV, value_delimiter = ':')]
    hunspell_dir: Vec<PathBuf>,

    /// File of known misspellings (may be repeated)
    #[arg(long, value_name = "FILE")]
    blacklist: Vec<PathBuf>,

    /// Split words at camel-case humps
    #[arg(long)]
    camel_case: bool,

    /// Input encoding label and error policy, e.g. `latin1:strict`
    #[arg(long, value_name = "ENC", default_value = "utf-8:replace")]
    input_encoding: InputEncoding,

    /// Output format [default: color on a terminal, plain otherwise]
    #[arg(short = 'f', long, value_enum)]
    output_format: Option<OutputFormat>,

    /// Reverse the ranking
    #[arg(short, long)]
    reverse: bool,

    /// Skip words or lines with more than N occurrences
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Characters of context shown around each finding
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONTEXT_WIDTH)]
    max_context_width: usize,

    /// Show up to N spelling suggestions per word
    #[arg(long, value_name = "N", default_value_t = 0)]
    suggest: usize,

    /// Spell checker threads
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    jobs: usize,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("typoscan: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `-v` flags override `RUST_LOG`; the default is `warn`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let home = config::home_dir();
    let hunspell_dirs = config::hunspell_search_paths(&args.hunspell_dir, home.as_deref());

    if args.list_languages {
        for language in hunspell::list_languages(&hunspell_dirs) {
            println!("{language}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let patterns = match config::resolve_data_dir(args.data_dir.as_deref(), home.as_deref())? {
        Some(dir) => PatternDictionary::load(&dir, &args.language)
            .with_context(|| format!("cannot load rules for {:?}", args.language))?,
        None => PatternDictionary::empty(),
    };
    let blacklist = BlacklistDictionary::load(&args.blacklist).context("cannot load blacklist")?;

    let backend: Box<dyn Speller> = if args.language == NO_DICTIONARY {
        info!("no spell checker dictionary");
        Box::new(NullSpeller)
    } else {
        let speller = HunspellSpeller::for_language(&hunspell_dirs, &args.language)
            .context("cannot load spell checker dictionary")?;
        info!(
            requested = %args.language,
            dictionary = speller.language(),
            "spell checker ready"
        );
        Box::new(speller)
    };
    let speller = CachedSpeller::with_jobs(backend, args.jobs)?;
    let tokenizer = Tokenizer::new(args.camel_case);
    let detector = Detector::new(&patterns, &blacklist, &speller, &tokenizer);

    let files = if args.files.is_empty() {
        vec![STDIN.to_string()]
    } else {
        args.files.clone()
    };
    let mut store = Misspellings::new();
    let mut failed = false;
    for path in &files {
        let name = input::display_name(path);
        let scanned = input::open(path)
            .map_err(ScanError::from)
            .and_then(|reader| scan_input(&detector, name, reader, args.input_encoding, &mut store));
        match scanned {
            Ok(_) => {}
            Err(ScanError::Input(err)) => {
                error!("{err}");
                failed = true;
            }
            Err(ScanError::Check(err)) => return Err(err).context(format!("while scanning {name}")),
        }
    }
    info!(
        words = store.len(),
        checked = speller.backend_calls(),
        "finished scanning"
    );

    if !store.is_empty() {
        let format = args.output_format.unwrap_or(if io::stdout().is_terminal() {
            OutputFormat::Color
        } else {
            OutputFormat::Plain
        });
        let options = RenderOptions {
            color: format == OutputFormat::Color,
            reverse: args.reverse,
            limit: args.limit,
            max_context_width: args.max_context_width,
            suggest: if args.language == NO_DICTIONARY { 0 } else { args.suggest },
        };
        let suggest = |word: &str| speller.suggest(word);
        let renderer = Renderer::new(&options, &suggest);
        let mut out = Output::auto(options.color);
        match renderer.render(&mut out, &store) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            result => result.context("cannot write report")?,
        }
        out.finish().context("cannot write report")?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
