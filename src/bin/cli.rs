//! This is the command line tool that loads an input file and either compresses
//! or decompresses it.

extern crate clap;
extern crate env_logger;
extern crate log;

use blockrle::utils::{derive_output_path, has_extension, Statistics};
use blockrle::{compress, decompress, BlockStream, Context, Error};
use clap::{value_parser, Arg, ArgAction, Command};

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::fs;
use std::time::{Duration, Instant};

/// A utility struct for measuring time.
struct Timer {
    start: Instant,
}

impl Timer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        Instant::now()
            .checked_duration_since(self.start)
            .unwrap_or_default()
    }
}

/// Run one pass over the files and return the number of bytes read and
/// written.
fn handle_files(
    is_compress: bool,
    input: &Path,
    output: &Path,
    ctx: Context,
) -> Result<(u64, u64), Error> {
    let mut stream =
        BlockStream::open_with_capacity(input, output, ctx.buffer_blocks())?;
    if is_compress {
        log::info!("Compressing {}", input.display());
        compress(&mut stream, ctx)?;
    } else {
        log::info!("Decompressing {}", input.display());
        decompress(&mut stream, ctx)?;
    }
    let from = stream.bytes_read();
    let flushed = stream.bytes_written();
    // The last block is written on close, so measure the file itself.
    let file = stream.close()?;
    let to = file.metadata().map(|m| m.len()).unwrap_or(flushed);
    Ok((from, to))
}

/// Decompress 'compressed' in memory and compare it with the original file.
fn check_round_trip(
    original: &Path,
    compressed: &Path,
    ctx: Context,
) -> Result<bool, Error> {
    let read = |path: &Path| {
        fs::read(path).map_err(|source| blockrle::IoError::Open {
            path: path.to_path_buf(),
            source,
        })
    };
    let expected = read(original)?;
    let input = read(compressed)?;

    let mut stream =
        BlockStream::new(Cursor::new(input), Vec::new(), ctx.buffer_blocks());
    decompress(&mut stream, ctx)?;
    let decoded = stream.close()?;
    Ok(decoded == expected)
}

fn main() -> ExitCode {
    let matches = Command::new("CLI")
        .version("1.x")
        .arg(
            Arg::new("checked")
                .long("check")
                .help("Decompress the result and compare it with the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("decompress")
                .short('d')
                .long("decompress")
                .help("Decompress the input")
                .action(ArgAction::SetTrue)
                .conflicts_with("compress"),
        )
        .arg(
            Arg::new("compress")
                .short('c')
                .long("compress")
                .help("Compress the input")
                .conflicts_with("decompress")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("statistics")
                .short('s')
                .long("statistics")
                .help("Report the file sizes and the running time")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            Arg::new("rep-bits")
                .long("rep-bits")
                .value_name("BITS")
                .help("Width of the repetition count (2 to 7)")
                .value_parser(value_parser!(u8).range(2..=7))
                .default_value("3")
                .num_args(1),
        )
        .arg(
            Arg::new("buffer-blocks")
                .long("buffer-blocks")
                .value_name("BLOCKS")
                .help("Number of blocks in each I/O buffer")
                .value_parser(value_parser!(usize))
                .default_value("2048")
                .num_args(1),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let mut cli_compress = matches.get_flag("compress");
    let cli_decompress = matches.get_flag("decompress");
    let cli_checked_mode = matches.get_flag("checked");
    let cli_statistics = matches.get_flag("statistics");
    let cli_output_path = matches.get_one::<PathBuf>("output").cloned();
    let rep_bits = *matches.get_one::<u8>("rep-bits").unwrap();
    let buffer_blocks = *matches.get_one::<usize>("buffer-blocks").unwrap();
    let input_path = matches.get_one::<PathBuf>("INPUT").unwrap();

    if buffer_blocks == 0 {
        log::error!("The buffers must hold at least one block");
        return ExitCode::FAILURE;
    }
    let ctx = Context::new(rep_bits, buffer_blocks);

    // The user did not specify if this is compress of decompress. Try to figure
    // out using the extension.
    if !cli_compress && !cli_decompress && !has_extension(input_path) {
        cli_compress = true;
    }

    // Come up with a file name.
    let out = cli_output_path
        .unwrap_or_else(|| derive_output_path(input_path, cli_compress));
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(dir) {
            log::error!("Unable to create {}: {}", dir.display(), err);
            return ExitCode::FAILURE;
        }
    }

    let timer = Timer::new();
    let (from, to) = match handle_files(cli_compress, input_path, &out, ctx) {
        Ok(sizes) => sizes,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let stats = Statistics {
        input: input_path.clone(),
        output: out.clone(),
        bytes_in: from,
        bytes_out: to,
        elapsed: timer.elapsed(),
    };
    log::info!("Wrote {} ({} bytes).", out.display(), to);
    if cli_statistics {
        println!("{}", stats);
    }

    if cli_compress && cli_checked_mode {
        match check_round_trip(input_path, &out, ctx) {
            Ok(true) => log::info!("Correct!"),
            Ok(false) => {
                log::info!("Incorrect!");
                return ExitCode::FAILURE;
            }
            Err(err) => {
                log::info!("Could not decompress the file: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
