use anyhow::{bail, Context, Result};

pub mod render;

/// Parse a caller-supplied hexadecimal address (`0x`-prefixed or bare).
pub fn parse_hex_address(text: &str) -> Result<u32> {
    let digits =
        text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    if digits.is_empty() {
        bail!("Empty address");
    }
    u32::from_str_radix(digits, 16)
        .with_context(|| format!("Invalid hexadecimal address: {text}"))
}
