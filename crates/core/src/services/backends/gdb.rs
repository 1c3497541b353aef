use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use crate::services::scan::{MemoryReader, ScanError, SymbolResolver};

/// GDB-backed debugger adapter that shells out to gdb in batch mode for
/// memory dumps (`x/Nxw`) and symbol lookups (`info symbol`).
///
/// Memory comes from either a core dump or a live remote session; symbols
/// come from the firmware ELF loaded into the same session.
pub struct GdbBackend {
    gdb_path: PathBuf,
    elf: Option<PathBuf>,
    core_dump: Option<PathBuf>,
    remote: Option<String>,
    // Parsed PSEUDOBT_FAKE_SYMBOLS table; loaded at most once per backend.
    fake_symbols: OnceLock<HashMap<String, String>>,
}

impl GdbBackend {
    pub fn new(
        gdb_path: Option<PathBuf>,
        elf: Option<PathBuf>,
        core_dump: Option<PathBuf>,
        remote: Option<String>,
    ) -> Self {
        Self {
            gdb_path: gdb_path.unwrap_or_else(resolve_gdb_path),
            elf,
            core_dump,
            remote,
            fake_symbols: OnceLock::new(),
        }
    }

    /// Fake symbol table named by `PSEUDOBT_FAKE_SYMBOLS`, if the hook is
    /// active. Read and parsed on first use, then served from the cache for
    /// every later lookup in the scan.
    fn fake_symbol_table(&self) -> Result<Option<&HashMap<String, String>>, ScanError> {
        let Some(path) = std::env::var_os("PSEUDOBT_FAKE_SYMBOLS") else {
            return Ok(None);
        };
        if let Some(table) = self.fake_symbols.get() {
            return Ok(Some(table));
        }
        let body = fs::read_to_string(&path).map_err(|e| {
            ScanError::Backend(format!("failed to read PSEUDOBT_FAKE_SYMBOLS: {e}"))
        })?;
        let table: HashMap<String, String> = serde_json::from_str(&body).map_err(|e| {
            ScanError::Backend(format!("failed to parse PSEUDOBT_FAKE_SYMBOLS: {e}"))
        })?;
        Ok(Some(self.fake_symbols.get_or_init(|| table)))
    }

    fn run_batch(&self, command: &str) -> Result<String, ScanError> {
        let mut cmd = Command::new(&self.gdb_path);
        cmd.args(["-nx", "-batch"]);
        if let Some(elf) = &self.elf {
            cmd.arg(elf);
        }
        if let Some(core_dump) = &self.core_dump {
            cmd.arg("-c").arg(core_dump);
        }
        if let Some(remote) = &self.remote {
            cmd.arg("-ex").arg(format!("target remote {remote}"));
        }
        cmd.arg("-ex").arg(command);

        let output = cmd.output().map_err(|e| {
            ScanError::Backend(format!("failed to spawn {}: {e}", self.gdb_path.display()))
        })?;
        if !output.status.success() {
            return Err(ScanError::Backend(format!("gdb exited with {}", output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn resolve_gdb_path() -> PathBuf {
    std::env::var_os("PSEUDOBT_GDB").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("gdb"))
}

impl MemoryReader for GdbBackend {
    fn read_words(&self, start: u32, count: usize) -> Result<Vec<u32>, ScanError> {
        // Allow tests to feed a canned dump via env to avoid needing gdb installed.
        let dump = if let Some(fake) = std::env::var_os("PSEUDOBT_FAKE_DUMP") {
            fs::read_to_string(&fake).map_err(|e| {
                ScanError::Backend(format!("failed to read PSEUDOBT_FAKE_DUMP: {e}"))
            })?
        } else {
            self.run_batch(&format!("x/{count}xw {start:#x}"))?
        };
        parse_memdump(&dump)
    }
}

impl SymbolResolver for GdbBackend {
    fn resolve(&self, address: u32) -> Result<String, ScanError> {
        // Same escape hatch for symbols: a JSON map of address -> resolution.
        if let Some(table) = self.fake_symbol_table()? {
            return Ok(table
                .get(&format!("{address:#010x}"))
                .cloned()
                .unwrap_or_else(|| format!("No symbol matches {address:#010x}.")));
        }

        let output = self.run_batch(&format!("info symbol {address:#010x}"))?;
        first_output_line(&output)
    }
}

/// Parse `x/Nxw` dump text: one or more lines, tab-separated, first field
/// the line's base address (discarded), remaining fields `0x`-prefixed
/// hexadecimal words for consecutive addresses.
pub fn parse_memdump(dump: &str) -> Result<Vec<u32>, ScanError> {
    let mut words = Vec::new();
    for line in dump.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let _base = fields.next();
        let rest: Vec<&str> = fields.collect();
        if rest.is_empty() {
            return Err(ScanError::DumpFormat(format!(
                "memory dump line missing tab separation: {line:?}"
            )));
        }
        for field in rest {
            words.push(parse_hex_word(field.trim())?);
        }
    }
    Ok(words)
}

fn parse_hex_word(field: &str) -> Result<u32, ScanError> {
    let digits = field.strip_prefix("0x").ok_or_else(|| {
        ScanError::DumpFormat(format!("memory word without 0x prefix: {field:?}"))
    })?;
    u32::from_str_radix(digits, 16)
        .map_err(|e| ScanError::DumpFormat(format!("unparsable memory word {field:?}: {e}")))
}

/// First non-empty line of a gdb batch invocation's stdout.
pub fn first_output_line(output: &str) -> Result<String, ScanError> {
    output
        .lines()
        .map(str::trim_end)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ScanError::SymbolFormat("gdb produced no symbol resolution output".to_string())
        })
}
