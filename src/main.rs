//! The `dtc` command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::*;
use log::LevelFilter;

use dtc::bridge::{build_library_files, pack_file, unpack_file};
use dtc::{DictionaryFormat, DtcConfig, DtcError};

#[derive(Parser)]
#[command(name = "dtc")]
#[command(about = "Reversible word-substitution text codec")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Pack a file into doc.dtc + doc.dtl
    dtc pack doc.txt

    # Restore it
    dtc unpack doc.dtc -d doc.dtl -o doc.restored.txt

    # Build a shared library from a corpus, then pack against it
    dtc library a.txt b.txt c.txt -o corpus.dtl
    dtc pack d.txt --library corpus.dtl
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file and write its dictionary
    Pack {
        input: PathBuf,
        /// Encoded output (default: <input>.dtc)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Dictionary output (default: <input>.dtl)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
        /// Shared library whose codes are reused
        #[arg(long)]
        library: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(long)]
        max_code_len: Option<usize>,
        /// Treat input as opaque bytes: no encoding detection, no trailer
        #[arg(long)]
        raw: bool,
    },
    /// Restore a file from its encoded stream and dictionary
    Unpack {
        input: PathBuf,
        #[arg(short, long)]
        dictionary: PathBuf,
        /// Restored output (default: <input>.out)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(long)]
        raw: bool,
    },
    /// Build one shared dictionary from several files
    Library {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(long)]
        max_code_len: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Binary,
    Text,
}

impl From<FormatArg> for DictionaryFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Binary => DictionaryFormat::Binary,
            FormatArg::Text => DictionaryFormat::Text,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG still wins when set.
    builder.parse_default_env();

    // Custom formatter: just print the level and message
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    let _ = builder.try_init();
}

fn load_config(path: Option<&Path>) -> Result<DtcConfig, DtcError> {
    match path {
        Some(path) => DtcConfig::from_json_file(path),
        None => Ok(DtcConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), DtcError> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Pack {
            input,
            output,
            dictionary,
            library,
            format,
            max_code_len,
            raw,
        } => {
            apply_overrides(&mut config, format, max_code_len, raw)?;
            let report = pack_file(
                &input,
                output.as_deref(),
                dictionary.as_deref(),
                library.as_deref(),
                &config,
            )?;
            let stats = &report.stats;
            println!(
                "{} {} -> {} ({} -> {} bytes, {}), dictionary {} ({} words)",
                "packed".green().bold(),
                input.display(),
                report.encoded_path.display(),
                stats.input_bytes,
                stats.encoded_bytes,
                format!("{:.1}%", stats.ratio() * 100.0).cyan(),
                report.dictionary_path.display(),
                stats.dictionary_entries
            );
            if stats.escaped_words > 0 {
                println!(
                    "{} {} word(s) were not in the dictionary and were stored verbatim",
                    "note:".yellow().bold(),
                    stats.escaped_words
                );
            }
        }
        Commands::Unpack {
            input,
            dictionary,
            output,
            format,
            raw,
        } => {
            apply_overrides(&mut config, format, None, raw)?;
            let report = unpack_file(&input, &dictionary, output.as_deref(), &config)?;
            println!(
                "{} {} -> {} ({} bytes)",
                "unpacked".green().bold(),
                input.display(),
                report.output_path.display(),
                report.bytes_written
            );
        }
        Commands::Library {
            inputs,
            output,
            format,
            max_code_len,
        } => {
            apply_overrides(&mut config, format, max_code_len, false)?;
            let library = build_library_files(&inputs, &output, &config)?;
            println!(
                "{} {} from {} file(s) ({} words, codes up to {} byte(s))",
                "library".green().bold(),
                output.display(),
                inputs.len(),
                library.len(),
                library.max_code_len()
            );
        }
    }
    Ok(())
}

fn apply_overrides(
    config: &mut DtcConfig,
    format: Option<FormatArg>,
    max_code_len: Option<usize>,
    raw: bool,
) -> Result<(), DtcError> {
    if let Some(format) = format {
        config.dictionary_format = format.into();
    }
    if let Some(max_code_len) = max_code_len {
        config.max_code_len = max_code_len;
    }
    if raw {
        config.transcode = false;
    }
    config.validate()
}
