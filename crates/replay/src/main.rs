mod render;
mod scenario;

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use flexi_logger::Logger;

use crate::scenario::Scenario;

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let mut json = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    let Some(path) = path else {
        eprintln!("Usage: folio-replay [--json] <scenario.json>");
        std::process::exit(1);
    };

    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let emitted = Scenario::from_json(&data)?.run()?;
    log::info!("{} commands from {}", emitted.len(), path.display());

    let mut out = BufWriter::new(std::io::stdout().lock());
    for item in &emitted {
        if json {
            serde_json::to_writer(&mut out, item)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", render::text_line(item))?;
        }
    }
    out.flush()?;
    Ok(())
}
