use pseudobt::parse_hex_address;
use pseudobt::render::{self, Palette};
use pseudobt_core::model::{Classification, MemoryWord, ScanRequest};
use pseudobt_core::services::scan::ScannedWord;

#[test]
fn parse_hex_address_accepts_prefixed_form() {
    assert_eq!(parse_hex_address("0x20001000").unwrap(), 0x2000_1000);
    assert_eq!(parse_hex_address("0X08001234").unwrap(), 0x0800_1234);
}

#[test]
fn parse_hex_address_accepts_bare_form() {
    assert_eq!(parse_hex_address("20001000").unwrap(), 0x2000_1000);
}

#[test]
fn parse_hex_address_rejects_garbage() {
    assert!(parse_hex_address("stack").is_err());
    assert!(parse_hex_address("0x").is_err());
    assert!(parse_hex_address("").is_err());
    // Out of u32 range.
    assert!(parse_hex_address("0x100000000").is_err());
}

#[test]
fn header_names_count_and_start_address() {
    let request = ScanRequest::new(0x2000_2000, 3);
    assert_eq!(
        render::header(&request, &Palette::plain()),
        "Backtrace for 3 words from 0x20002000"
    );
}

#[test]
fn remote_call_line_renders_marker() {
    let entry = ScannedWord {
        word: MemoryWord { address: 0x2000_2000, raw_value: 0x6612_0712 },
        classification: Classification::RemoteCallMarker,
    };
    assert_eq!(
        render::line(&entry, &Palette::plain()).unwrap(),
        "@0x20002000: *** REMOTE CALL ***"
    );
}

#[test]
fn candidate_line_renders_value_and_symbol() {
    let entry = ScannedWord {
        word: MemoryWord { address: 0x2000_2004, raw_value: 0x0800_1234 },
        classification: Classification::CodeCandidate { symbol: "main".to_string() },
    };
    assert_eq!(
        render::line(&entry, &Palette::plain()).unwrap(),
        "@0x20002004: (0x08001234) main"
    );
}

#[test]
fn filtered_and_irrelevant_words_render_nothing() {
    let filtered = ScannedWord {
        word: MemoryWord { address: 0x2000_2008, raw_value: 0x0800_9999 },
        classification: Classification::Filtered,
    };
    let irrelevant = ScannedWord {
        word: MemoryWord { address: 0x2000_200c, raw_value: 0xdead_beef },
        classification: Classification::Irrelevant,
    };
    assert!(render::line(&filtered, &Palette::plain()).is_none());
    assert!(render::line(&irrelevant, &Palette::plain()).is_none());
}

#[test]
fn ansi_palette_wraps_fields_in_escapes() {
    let request = ScanRequest::new(0x2000_2000, 1);
    let header = render::header(&request, &Palette::ansi());
    assert!(header.starts_with("\x1b[94m"));
    assert!(header.ends_with("\x1b[0m"));
}
