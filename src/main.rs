use std::fmt::{Debug, Display};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;

use toktool::lines::{parse_ids, read_line_range};
use toktool::registry::{DEFAULT_MODELS_DIR, DEFAULT_VOCAB_PATH};
use toktool::{RegistryConfig, Token, Tokenizer, TokenizerRegistry};

const DEFAULT_DATA_DIR: &str = "./data/original_text";

/// Tokenize text using different tokenizers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// Vocabulary file of the local `B` tokenizer
    #[arg(long, global = true, env = "TOKTOOL_VOCAB_PATH", default_value = DEFAULT_VOCAB_PATH)]
    vocab_path: PathBuf,

    /// Directory holding pretrained tokenizer models
    #[arg(long, global = true, env = "TOKTOOL_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a string or decode a list of token ids
    Tokenize(TokenizeArgs),
    /// Encode or decode a range of lines from a text file
    Lines(LinesArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["encode", "decode"])))]
struct TokenizeArgs {
    /// Tokenizer type (B, TIKTOKEN, BPE, WP, SP, ULM, BL-BPE, CHAR, T5)
    #[arg(short = 'T', long)]
    tokenizer: String,

    /// Encode the input text
    #[arg(short, long, requires = "text")]
    encode: bool,

    /// Decode the input token ids
    #[arg(short, long, requires = "token_ids")]
    decode: bool,

    /// Input text to encode
    #[arg(short = 's', long)]
    text: Option<String>,

    /// Token ids to decode
    #[arg(short = 't', long, num_args = 1..)]
    token_ids: Vec<Token>,
}

#[derive(Args, Debug)]
struct LinesArgs {
    /// Name of the text file inside the data directory
    #[arg(short = 'f', long)]
    data_file: String,

    /// Directory holding the text files
    #[arg(long, env = "TOKTOOL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Start line (0-based)
    #[arg(long, allow_negative_numbers = true)]
    start_line: i64,

    /// End line (0-based, exclusive; -1 reads to the end)
    #[arg(long, allow_negative_numbers = true)]
    end_line: i64,

    /// Tokenizer type
    #[arg(short = 'T', long)]
    tokenizer: Option<String>,

    /// Encode the lines (with --decode, decode the result again)
    #[arg(short, long)]
    encode: bool,

    /// Decode lines of whitespace-separated token ids
    #[arg(short, long)]
    decode: bool,

    /// Prefix every entry with its line number
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let registry = TokenizerRegistry::new(
        RegistryConfig::new()
            .with_vocab_path(&cli.vocab_path)
            .with_models_dir(&cli.models_dir),
    );

    match cli.command {
        Commands::Tokenize(args) => run_tokenize(&registry, args),
        Commands::Lines(args) => run_lines(&registry, args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    if let Some(level) = level_override(verbose, quiet) {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}

/// Level forced by `-v`/`-q`; `None` leaves `RUST_LOG` (or `info`) in charge.
fn level_override(verbose: u8, quiet: u8) -> Option<LevelFilter> {
    match (verbose, quiet) {
        (0, 0) => None,
        (_, 1) => Some(LevelFilter::Warn),
        (_, q) if q > 1 => Some(LevelFilter::Error),
        (1, _) => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

fn resolve(registry: &TokenizerRegistry, name: &str) -> Result<Box<dyn Tokenizer>> {
    registry
        .resolve(name)
        .with_context(|| format!("unable to load tokenizer {name}"))
}

fn run_tokenize(registry: &TokenizerRegistry, args: TokenizeArgs) -> Result<()> {
    let mut tokenizer = resolve(registry, &args.tokenizer)?;

    println!("Tokenizer: {}", args.tokenizer);
    if args.encode {
        let text = args.text.as_deref().unwrap_or_default();
        let ids = tokenizer.encode(text)?;
        println!("Token IDs: {:?}", ids);
    } else {
        let text = tokenizer.decode(&args.token_ids)?;
        println!("Decoded Text: {}", text);
    }
    Ok(())
}

fn run_lines(registry: &TokenizerRegistry, args: LinesArgs) -> Result<()> {
    let path = args.data_dir.join(&args.data_file);
    if !path.exists() {
        bail!("File '{}' does not exist.", path.display());
    }

    let lines = read_line_range(&path, args.start_line, args.end_line)?;
    println!("Read {} lines from the file.", lines.len());

    if args.tokenizer.is_none() && !args.encode && !args.decode {
        display_text(&lines, "Lines read", args.start_line, args.pretty);
        return Ok(());
    }

    let name = args
        .tokenizer
        .as_deref()
        .ok_or_else(|| anyhow!("a tokenizer (-T) is required to encode or decode"))?;
    let mut tokenizer = resolve(registry, name)?;

    if args.encode {
        let encoded = lines
            .iter()
            .map(|line| tokenizer.encode(line))
            .collect::<toktool::Result<Vec<_>>>()?;
        display(&encoded, "Encoded Data", args.start_line, args.pretty, |ids| {
            format!("{ids:?}")
        });

        if args.decode {
            let decoded = encoded
                .iter()
                .map(|ids| tokenizer.decode(ids))
                .collect::<toktool::Result<Vec<_>>>()?;
            display_text(&decoded, "Decoded Data", args.start_line, args.pretty);
        }
    } else if args.decode {
        let mut decoded = Vec::with_capacity(lines.len());
        for line in &lines {
            let ids =
                parse_ids(line).with_context(|| format!("{line:?} is not a list of token ids"))?;
            decoded.push(tokenizer.decode(&ids)?);
        }
        display_text(&decoded, "Decoded Data", args.start_line, args.pretty);
    } else {
        log::warn!("Tokenizer {name} given without --encode or --decode; nothing to do");
    }
    Ok(())
}

fn display<T: Debug>(
    data: &[T],
    label: &str,
    start_line: i64,
    pretty: bool,
    item: impl Fn(&T) -> String,
) {
    if pretty {
        println!("{label}:");
        for line in pretty_lines(data, start_line, item) {
            println!("{line}");
        }
    } else {
        println!("{label}: {:?}", data);
    }
}

fn display_text<T: Debug + Display>(data: &[T], label: &str, start_line: i64, pretty: bool) {
    display(data, label, start_line, pretty, |text| text.to_string());
}

fn pretty_lines<T>(data: &[T], start_line: i64, item: impl Fn(&T) -> String) -> Vec<String> {
    data.iter()
        .enumerate()
        .map(|(i, value)| format!("Line {}: {}", i as i64 + start_line, item(value)))
        .collect()
}
