//! `keydex inspect`: print header geometry and optionally dump entries

use std::path::PathBuf;

use clap::Args;
use keydex_format::INDEX_MAGIC;

use super::read_index;

#[derive(Args)]
pub struct InspectArgs {
    /// Index file, `-` for stdin
    index: PathBuf,

    /// Also dump the first N entries
    #[arg(long, value_name = "N")]
    entries: Option<usize>,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let index = read_index(&args.index)?;
    let header = index.header();
    let layout = index.layout();

    println!("magic:       {INDEX_MAGIC:#010x}");
    println!("entry size:  {} bytes", header.entry_size);
    println!("entry count: {}", header.entry_count);
    println!("key length:  {} bytes", layout.key_length);
    println!(
        "checksums:   {}",
        if layout.with_checksum {
            "present"
        } else {
            "absent"
        }
    );

    if let Some(count) = args.entries {
        for (position, entry) in index.entries().take(count).enumerate() {
            print!(
                "[{position}] key={} offset={} length={}",
                hex::encode(entry.key),
                entry.offset,
                entry.length
            );
            if let Some(checksum) = entry.checksum {
                print!(" checksum={checksum:016x}");
            }
            println!();
        }
    }

    Ok(())
}
