// Command-line front end for retrolz.
//
// Subcommands:
//   decode   unpack one file with a named codec
//   codecs   list the codecs and what they need
//   inspect  print the footer of a CineUnpack file

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::{debug, info};

use crate::cine;
use crate::engine::{Codec, DecodeOptions};
use crate::io::{self as fileio, FileError};

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024usize),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1usize),
    };
    let num: usize = match num_part.trim() {
        hex if hex.starts_with("0x") || hex.starts_with("0X") => {
            usize::from_str_radix(&hex[2..], 16).map_err(|e| format!("invalid size '{s}': {e}"))?
        }
        dec => dec.parse().map_err(|e| format!("invalid size '{s}': {e}"))?,
    };
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))
}

fn parse_codec(s: &str) -> Result<Codec, String> {
    s.parse::<Codec>().map_err(|e| {
        let names: Vec<&str> = Codec::ALL.iter().map(|c| c.name()).collect();
        format!("{e} (expected one of: {})", names.join(", "))
    })
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Decompressors for classic game and archive formats.
#[derive(Parser, Debug)]
#[command(
    name = "retrolz",
    version,
    about = "Decompressors for classic game and archive formats",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (errors only).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a packed file.
    Decode(DecodeArgs),
    /// List the supported codecs.
    Codecs,
    /// Print the footer of a CineUnpack file.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Codec to decode with (see `retrolz codecs`).
    #[arg(long, short = 'c', value_parser = parse_codec)]
    codec: Codec,

    /// Declared unpacked size (supports K/M suffix and 0x prefix).
    #[arg(long, short = 's', value_parser = parse_byte_size)]
    size: Option<usize>,

    /// Declared packed size; reads past it count as truncation.
    #[arg(long = "packed-size", value_parser = parse_byte_size)]
    packed_size: Option<usize>,

    /// Write whatever was decoded even if the stream is damaged.
    #[arg(long = "keep-partial")]
    keep_partial: bool,

    /// Decode only, do not write output.
    #[arg(long = "check-only")]
    no_output: bool,

    /// Packed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file (default: input with `.out` appended).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// CineUnpack-packed file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Decode,
    Codecs,
    Inspect,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    no_output: bool,
    codec: Option<Codec>,
    decode: DecodeOptions,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Codecs,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        no_output: false,
        codec: None,
        decode: DecodeOptions::default(),
        input_file: None,
        output_file: None,
    };

    match cli.command {
        Cmd::Decode(args) => {
            let output = args.output.unwrap_or_else(|| {
                let mut name = args.input.clone().into_os_string();
                name.push(".out");
                PathBuf::from(name)
            });
            opts.command = Command::Decode;
            opts.no_output = args.no_output;
            opts.codec = Some(args.codec);
            opts.decode = DecodeOptions {
                expected_size: args.size,
                packed_size: args.packed_size,
                keep_partial: args.keep_partial,
            };
            opts.input_file = Some(args.input);
            opts.output_file = Some(output);
        }
        Cmd::Codecs => {}
        Cmd::Inspect(args) => {
            opts.command = Command::Inspect;
            opts.input_file = Some(args.input);
        }
    }
    opts
}

fn log_level(opts: &Options) -> log::LevelFilter {
    match (opts.quiet, opts.verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, _) => log::LevelFilter::Debug,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("retrolz".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

fn hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("retrolz: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let (Some(codec), Some(input)) = (opts.codec, opts.input_file.as_ref()) else {
        eprintln!("retrolz: decode: missing codec or input");
        return 1;
    };

    if opts.decode.expected_size.is_none() && codec.requires_size() {
        eprintln!("retrolz: codec '{codec}' needs the unpacked size, pass --size");
        return 1;
    }

    let output = if opts.no_output {
        None
    } else {
        opts.output_file.as_deref()
    };
    if let Some(path) = output
        && path.exists()
        && !opts.force
    {
        eprintln!(
            "retrolz: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return 1;
    }

    debug!("decoding {} with {codec}", input.display());
    match fileio::decode_file(input, output, codec, &opts.decode) {
        Ok(stats) => {
            if stats.truncated && !opts.quiet {
                eprintln!(
                    "retrolz: warning: input ended early, wrote {} bytes",
                    stats.output_size
                );
            }
            info!(
                "{codec}: {} -> {} bytes",
                stats.input_size, stats.output_size
            );
            if opts.json_output {
                print_json(&serde_json::json!({
                    "command": "decode",
                    "codec": codec.name(),
                    "input_size": stats.input_size,
                    "output_size": stats.output_size,
                    "truncated": stats.truncated,
                    "sha256": stats.output_sha256.map(|d| hex(&d)),
                }));
            }
            0
        }
        Err(FileError::Decode { failure, written }) => {
            eprintln!("retrolz: decode error: {failure}");
            if let Some(n) = written
                && !opts.quiet
            {
                eprintln!("retrolz: wrote {n} bytes of partial output");
            }
            if opts.json_output {
                print_json(&serde_json::json!({
                    "command": "decode",
                    "codec": codec.name(),
                    "error": failure.source.to_string(),
                    "partial_size": written,
                }));
            }
            1
        }
        Err(FileError::Io(e)) => {
            eprintln!("retrolz: {}: {e}", input.display());
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Codecs command
// ---------------------------------------------------------------------------

fn cmd_codecs(opts: &Options) -> i32 {
    if opts.json_output {
        let list: Vec<_> = Codec::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name(),
                    "requires_size": c.requires_size(),
                    "description": c.description(),
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(list));
        return 0;
    }
    for codec in Codec::ALL {
        let size = if codec.requires_size() { "size" } else { "    " };
        println!("{:<12} {size}  {}", codec.name(), codec.description());
    }
    0
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn cmd_inspect(opts: &Options) -> i32 {
    let Some(path) = opts.input_file.as_ref() else {
        eprintln!("retrolz: inspect: missing input");
        return 1;
    };
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("retrolz: {}: {e}", path.display());
            return 1;
        }
    };
    let footer = match cine::read_footer(&data) {
        Ok(footer) => footer,
        Err(e) => {
            eprintln!("retrolz: {}: {e}", path.display());
            return 1;
        }
    };

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "inspect",
            "packed_size": data.len(),
            "unpacked_size": footer.unpacked_len,
            "crc": footer.crc,
            "first_chunk": footer.first_chunk,
        }));
    } else {
        println!("packed size:   {}", data.len());
        println!("unpacked size: {}", footer.unpacked_len);
        println!("crc seed:      {:#010X}", footer.crc);
        println!("first chunk:   {:#010X}", footer.first_chunk);
    }
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if opts.quiet || opts.verbose > 0 {
        logger.filter_level(log_level(&opts));
    }
    logger.format_timestamp(None).format_target(false).init();

    let exit_code = match opts.command {
        Command::Decode => cmd_decode(&opts),
        Command::Codecs => cmd_codecs(&opts),
        Command::Inspect => cmd_inspect(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
