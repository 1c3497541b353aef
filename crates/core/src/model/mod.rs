//! Core data model for a single stack scan.
//!
//! Everything here lives for exactly one scan invocation; nothing persists
//! across invocations.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Sentinel placed in otherwise-unused registers/stack slots to mark a call
/// that crossed a privilege or execution-domain boundary ("remote call").
pub const REMOTE_CALL_SENTINEL: u32 = 0x6612_0712;

/// Flash/code address range on the target. Words whose value falls in this
/// range are treated as candidate return addresses.
pub const CODE_RANGE: Range<u32> = 0x0800_0000..0x0900_0000;

/// Symbol prefixes naming anonymous literal-table entries rather than code.
pub const FILTERED_SYMBOL_PREFIXES: [&str; 2] = ["ref.", "str."];

/// Prefix of the resolver's reply when no symbol covers an address.
pub const NO_SYMBOL_PREFIX: &str = "No symbol matches";

/// Delimiter before the section name in a symbol resolution; the delimiter
/// and everything after it are stripped from the reported symbol.
pub const SECTION_DELIMITER: &str = " in section";

/// One scan invocation: a start address and a word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub start_address: u32,
    /// Number of 32-bit words to inspect; validated positive by the caller.
    pub word_count: usize,
}

impl ScanRequest {
    pub fn new(start_address: u32, word_count: usize) -> Self {
        Self { start_address, word_count }
    }

    /// Address of the word at `index` within the scanned region.
    pub fn word_address(&self, index: usize) -> u32 {
        self.start_address.wrapping_add(4 * index as u32)
    }
}

/// A single 32-bit word read from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWord {
    pub address: u32,
    pub raw_value: u32,
}

/// What the scanner decided about one memory word.
///
/// Exactly one classification is produced per word; only `RemoteCallMarker`
/// and `CodeCandidate` words are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The word holds the remote-call sentinel.
    RemoteCallMarker,
    /// The word looks like a code address and resolves to a real symbol.
    CodeCandidate { symbol: String },
    /// Looks like code but resolves to no symbol or an anonymous table entry.
    Filtered,
    /// Not in the code address range at all.
    Irrelevant,
}

impl Classification {
    /// Whether this word earns a line in the rendered backtrace.
    pub fn is_reportable(&self) -> bool {
        matches!(self, Classification::RemoteCallMarker | Classification::CodeCandidate { .. })
    }
}
