//! Subcommand implementations

pub mod build;
pub mod inspect;
pub mod lookup;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::Context;
use keydex_format::Index;

/// Reads an index from a file path, or from stdin for `-`.
fn read_index(path: &Path) -> anyhow::Result<Index> {
    if path == Path::new("-") {
        Index::read(&mut io::stdin().lock()).context("reading index from stdin")
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Index::read(&mut BufReader::new(file))
            .with_context(|| format!("reading index {}", path.display()))
    }
}
