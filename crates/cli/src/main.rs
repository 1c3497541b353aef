use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pseudobt::render::{self, Palette};
use pseudobt_core::model::ScanRequest;
use pseudobt_core::services::backends::GdbBackend;
use pseudobt_core::services::scan::{ScannedWord, Scanner};
use serde::Serialize;

/// Heuristic pseudo-backtrace scanner for raw embedded stack dumps.
///
/// Scans a region of stack memory word-by-word and prints each word that
/// looks like a return address or a remote-call marker. Useful after a
/// MemManage fault has already destroyed the real frame chain: take the
/// address from `reg psp` and a generous word count, and read the result
/// as a best-effort, false-positive-tolerant call history.
///
/// This CLI is a thin wrapper around `pseudobt-core` (exposed in code as
/// `pseudobt_core`). All substantive logic lives in the library so it can
/// be tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "pseudobt",
    version,
    about = "Heuristic pseudo-backtrace from a raw stack region",
    long_about = None
)]
struct Cli {
    /// Start address of the stack region to scan (hexadecimal, e.g. 0x20001000).
    address: String,

    /// Number of 32-bit words to inspect.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    words: u32,

    /// Firmware ELF to load for symbol resolution.
    #[arg(long)]
    elf: Option<PathBuf>,

    /// Core dump to read memory from.
    #[arg(long = "core")]
    core_dump: Option<PathBuf>,

    /// Live remote target to read memory from (host:port).
    #[arg(long)]
    remote: Option<String>,

    /// Explicit gdb binary. Defaults to $PSEUDOBT_GDB, then `gdb` on PATH.
    #[arg(long)]
    gdb: Option<PathBuf>,

    /// Emit the full scan (every word with its classification) as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Suppress ANSI color escapes.
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

/// Machine-readable form of one scan, for `--json`.
#[derive(Serialize)]
struct ScanReport<'a> {
    core_version: &'a str,
    request: &'a ScanRequest,
    words: &'a [ScannedWord],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let start_address = pseudobt::parse_hex_address(&cli.address)?;
    let request = ScanRequest::new(start_address, cli.words as usize);

    let backend = GdbBackend::new(cli.gdb, cli.elf, cli.core_dump, cli.remote);
    let scanner = Scanner { memory: &backend, symbols: &backend };
    let entries = scanner.scan(&request)?;

    if cli.json {
        let report = ScanReport {
            core_version: pseudobt_core::version(),
            request: &request,
            words: &entries,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let palette = if cli.no_color { Palette::plain() } else { Palette::ansi() };
    println!("{}", render::header(&request, &palette));
    for entry in &entries {
        if let Some(line) = render::line(entry, &palette) {
            println!("{line}");
        }
    }

    Ok(())
}
