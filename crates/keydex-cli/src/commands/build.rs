//! `keydex build`: frame records, build the index, write it out

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use keydex_format::{
    build, BuildOptions, DelimitedRecords, FixedRecords, Index, KeyFunction, DEFAULT_KEY_LENGTH,
};
use tracing::info;

#[derive(Args)]
pub struct BuildArgs {
    /// Record stream to index, `-` for stdin
    input: PathBuf,

    /// Index destination, `-` for stdout
    output: PathBuf,

    /// Key function applied to each record
    #[arg(long, value_enum, default_value = "xxh64")]
    key_function: KeyFunctionArg,

    /// Key length in bytes (defaults to the key function's digest width)
    #[arg(long)]
    key_length: Option<usize>,

    /// Store an XXH3-64 checksum of each record in its entry
    #[arg(long)]
    checksum: bool,

    /// Cut fixed-size records instead of delimited ones
    #[arg(long, value_name = "BYTES", conflicts_with = "delimiter")]
    record_size: Option<NonZeroUsize>,

    /// Record delimiter byte value (newline by default)
    #[arg(long, value_name = "BYTE", default_value_t = b'\n')]
    delimiter: u8,
}

/// Key function choices, mirroring [`KeyFunction`].
#[derive(ValueEnum, Clone, Copy, Debug)]
enum KeyFunctionArg {
    /// 4-byte XXH32 digest
    Xxh32,
    /// 8-byte XXH64 digest
    Xxh64,
    /// 8-byte XXH3 digest
    Xxh3,
    /// 16-byte XXH3-128 digest
    Xxh128,
    /// Leading record bytes, zero-padded
    Prefix,
}

impl From<KeyFunctionArg> for KeyFunction {
    fn from(arg: KeyFunctionArg) -> Self {
        match arg {
            KeyFunctionArg::Xxh32 => Self::Xxh32,
            KeyFunctionArg::Xxh64 => Self::Xxh64,
            KeyFunctionArg::Xxh3 => Self::Xxh3,
            KeyFunctionArg::Xxh128 => Self::Xxh128,
            KeyFunctionArg::Prefix => Self::Prefix,
        }
    }
}

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let key_function = KeyFunction::from(args.key_function);
    let options = BuildOptions {
        key_length: args
            .key_length
            .unwrap_or_else(|| key_function.digest_width().unwrap_or(DEFAULT_KEY_LENGTH)),
        key_function,
        with_checksum: args.checksum,
    };

    let reader: Box<dyn Read> = if args.input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            File::open(&args.input)
                .with_context(|| format!("opening {}", args.input.display()))?,
        )
    };
    let reader = BufReader::new(reader);

    let index = match args.record_size {
        Some(size) => build(options, &mut FixedRecords::new(reader, size)),
        None => build(
            options,
            &mut DelimitedRecords::with_delimiter(reader, args.delimiter),
        ),
    }
    .with_context(|| format!("indexing {}", args.input.display()))?;

    write_output(&index, &args.output)?;
    info!(
        entries = index.len(),
        output = %args.output.display(),
        "index written"
    );
    Ok(())
}

fn write_output(index: &Index, output: &Path) -> anyhow::Result<()> {
    let sink: Box<dyn Write> = if output == Path::new("-") {
        Box::new(io::stdout().lock())
    } else {
        Box::new(File::create(output).with_context(|| format!("creating {}", output.display()))?)
    };
    index
        .write(&mut BufWriter::new(sink))
        .with_context(|| format!("writing index to {}", output.display()))
}
