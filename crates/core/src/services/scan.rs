//! The stack scanner: per-word classification over a raw memory dump.
//!
//! The scanner consumes two host capabilities through traits so it carries
//! no debugger dependency of its own: a bulk memory read and a per-address
//! symbol lookup. Classification of a word is a pure function of its raw
//! value plus one stateless lookup; there is no cross-word state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Classification, MemoryWord, ScanRequest, CODE_RANGE, FILTERED_SYMBOL_PREFIXES,
    NO_SYMBOL_PREFIX, REMOTE_CALL_SENTINEL, SECTION_DELIMITER,
};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Debugger backend error: {0}")]
    Backend(String),
    #[error("Malformed memory dump: {0}")]
    DumpFormat(String),
    #[error("Malformed symbol resolution: {0}")]
    SymbolFormat(String),
}

/// Bulk memory read from the target: `count` consecutive 32-bit words
/// starting at `start`.
pub trait MemoryReader: Send + Sync {
    fn read_words(&self, start: u32, count: usize) -> Result<Vec<u32>, ScanError>;
}

/// Address-to-symbol lookup. Returns the host's resolution text verbatim,
/// including the `No symbol matches ...` form and any `" in section <name>"`
/// suffix; the filtering rules live in [`classify`].
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, address: u32) -> Result<String, ScanError>;
}

/// Classify one memory word.
///
/// The sentinel check short-circuits; words outside the code range never
/// reach the resolver.
pub fn classify(
    word: &MemoryWord,
    symbols: &dyn SymbolResolver,
) -> Result<Classification, ScanError> {
    if word.raw_value == REMOTE_CALL_SENTINEL {
        return Ok(Classification::RemoteCallMarker);
    }
    if !CODE_RANGE.contains(&word.raw_value) {
        return Ok(Classification::Irrelevant);
    }

    let resolution = symbols.resolve(word.raw_value)?;
    let resolution = resolution.trim_end();
    if resolution.is_empty() {
        return Err(ScanError::SymbolFormat(format!(
            "empty resolution for {:#010x}",
            word.raw_value
        )));
    }
    if resolution.starts_with(NO_SYMBOL_PREFIX) {
        return Ok(Classification::Filtered);
    }

    let symbol = match resolution.find(SECTION_DELIMITER) {
        Some(idx) => &resolution[..idx],
        None => resolution,
    };
    if FILTERED_SYMBOL_PREFIXES.iter().any(|prefix| symbol.starts_with(prefix)) {
        return Ok(Classification::Filtered);
    }

    Ok(Classification::CodeCandidate { symbol: symbol.to_string() })
}

/// One word of the scanned region together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedWord {
    pub word: MemoryWord,
    pub classification: Classification,
}

/// Walks a stack region word-by-word and classifies each word.
///
/// Each `scan` call re-reads memory fresh; two calls against an unchanged
/// memory image yield identical results.
pub struct Scanner<'a> {
    pub memory: &'a dyn MemoryReader,
    pub symbols: &'a dyn SymbolResolver,
}

impl Scanner<'_> {
    /// Scan `request.word_count` words starting at `request.start_address`,
    /// in address-ascending order. Returns one entry per word; presentation
    /// layers skip the non-reportable ones.
    pub fn scan(&self, request: &ScanRequest) -> Result<Vec<ScannedWord>, ScanError> {
        let raw = self.memory.read_words(request.start_address, request.word_count)?;
        if raw.len() != request.word_count {
            return Err(ScanError::DumpFormat(format!(
                "requested {} words, debugger returned {}",
                request.word_count,
                raw.len()
            )));
        }

        raw.into_iter()
            .enumerate()
            .map(|(index, raw_value)| {
                let word = MemoryWord { address: request.word_address(index), raw_value };
                let classification = classify(&word, self.symbols)?;
                Ok(ScannedWord { word, classification })
            })
            .collect()
    }
}
