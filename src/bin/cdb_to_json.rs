//! Read a CDB database and write its model as JSON next to it
//!
//! Usage: `cdb-to-json <database.cdb> [library]`. Without a library
//! argument the access library is taken from `CDB_LIBRARY`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cdb_reader::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(database) = args.next().map(PathBuf::from) else {
        bail!("usage: cdb-to-json <database.cdb> [library]");
    };
    let mut options = ReadOptions::from_env();
    if let Some(library) = args.next() {
        options = options.with_library(library);
    }

    let model = CdbModel::from_library(&database, &options)
        .with_context(|| format!("failed to read {}", database.display()))?;

    let report = model.principal_stresses(&options);
    log::info!(
        "Principal stresses: {} solved, {} failed",
        report.len(),
        report.failures.len()
    );

    let output = database.with_extension(cdb_reader::export::JSON_EXTENSION);
    write_json(&model, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}
