//! Text rendering for scan results.
//!
//! Three color roles, matching the original console convention: blue for
//! addresses and the header, red for raw code values, yellow for symbol
//! names and the remote-call marker.

use pseudobt_core::model::{Classification, ScanRequest};
use pseudobt_core::services::scan::ScannedWord;

const BLUE: &str = "\x1b[94m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

/// Escape sequences wrapped around each rendered field.
pub struct Palette {
    boundary: &'static str,
    value: &'static str,
    symbol: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn ansi() -> Self {
        Self { boundary: BLUE, value: RED, symbol: YELLOW, reset: RESET }
    }

    /// No escapes at all; content is unchanged.
    pub fn plain() -> Self {
        Self { boundary: "", value: "", symbol: "", reset: "" }
    }
}

/// Header line printed before the scan output.
pub fn header(request: &ScanRequest, palette: &Palette) -> String {
    format!(
        "{}Backtrace for {} words from {:#x}{}",
        palette.boundary, request.word_count, request.start_address, palette.reset
    )
}

/// Annotated line for one scanned word, or `None` for words that are not
/// reportable.
pub fn line(entry: &ScannedWord, palette: &Palette) -> Option<String> {
    match &entry.classification {
        Classification::RemoteCallMarker => Some(format!(
            "{}@{:#x}{}: {}*** REMOTE CALL ***{}",
            palette.boundary, entry.word.address, palette.reset, palette.symbol, palette.reset
        )),
        Classification::CodeCandidate { symbol } => Some(format!(
            "{}@{:#x}{}: {}({:#010x}){} {}{}{}",
            palette.boundary,
            entry.word.address,
            palette.reset,
            palette.value,
            entry.word.raw_value,
            palette.reset,
            palette.symbol,
            symbol,
            palette.reset
        )),
        Classification::Filtered | Classification::Irrelevant => None,
    }
}
