//! `keydex lookup`: binary-search an index by hex key

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use super::read_index;

#[derive(Args)]
pub struct LookupArgs {
    /// Index file, `-` for stdin
    index: PathBuf,

    /// Key to look up, hex-encoded
    key: String,
}

pub fn run(args: LookupArgs) -> anyhow::Result<()> {
    let index = read_index(&args.index)?;
    let key = hex::decode(&args.key).context("key must be hex-encoded")?;
    if key.len() != index.layout().key_length {
        bail!(
            "key is {} bytes, index keys are {} bytes",
            key.len(),
            index.layout().key_length
        );
    }

    let mut matches = 0usize;
    for entry in index.find_all(&key) {
        print!("offset={} length={}", entry.offset, entry.length);
        if let Some(checksum) = entry.checksum {
            print!(" checksum={checksum:016x}");
        }
        println!();
        matches += 1;
    }

    if matches == 0 {
        bail!("key {} not found", args.key);
    }
    Ok(())
}
