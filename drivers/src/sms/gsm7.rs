//! GSM 03.38 7-bit default alphabet.
//!
//! Conversion stops at unpacked 7-bit units: the device's wire framing
//! expands each unit on its own (see the parent module), so standard septet
//! packing never happens here.

use super::CodecError;

const ESC: u8 = 0x1b;

/// Basic character table, indexed by 7-bit unit value. Index 0x1B is the
/// escape to [`EXTENSION`] and never maps to a character.
const BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', // 0x00
    'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', // 0x08
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', // 0x10
    'Σ', 'Θ', 'Ξ', '\u{1b}', 'Æ', 'æ', 'ß', 'É', // 0x18
    ' ', '!', '"', '#', '¤', '%', '&', '\'', // 0x20
    '(', ')', '*', '+', ',', '-', '.', '/', // 0x28
    '0', '1', '2', '3', '4', '5', '6', '7', // 0x30
    '8', '9', ':', ';', '<', '=', '>', '?', // 0x38
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', // 0x40
    'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', // 0x48
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', // 0x50
    'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', // 0x58
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', // 0x60
    'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', // 0x68
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', // 0x70
    'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à', // 0x78
];

/// Extension table, reached through the 0x1B escape.
const EXTENSION: &[(u8, char)] = &[
    (0x0a, '\u{0c}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2f, '\\'),
    (0x3c, '['),
    (0x3d, '~'),
    (0x3e, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

fn basic_unit(ch: char) -> Option<u8> {
    BASIC
        .iter()
        .position(|&c| c == ch)
        .filter(|&unit| unit != usize::from(ESC))
        .map(|unit| unit as u8)
}

fn extension_unit(ch: char) -> Option<u8> {
    EXTENSION
        .iter()
        .find(|&&(_, c)| c == ch)
        .map(|&(unit, _)| unit)
}

fn extension_char(unit: u8) -> Option<char> {
    EXTENSION
        .iter()
        .find(|&&(u, _)| u == unit)
        .map(|&(_, c)| c)
}

/// Converts text into unpacked 7-bit units, one per character (two for
/// extension-table characters). Characters outside the alphabet fail before
/// anything is produced.
pub fn encode(text: &str) -> Result<Vec<u8>, CodecError> {
    let mut units = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(unit) = basic_unit(ch) {
            units.push(unit);
        } else if let Some(unit) = extension_unit(ch) {
            units.push(ESC);
            units.push(unit);
        } else {
            return Err(CodecError::NotGsm7(ch));
        }
    }
    Ok(units)
}

/// Inverse of [`encode`].
pub fn decode(units: &[u8]) -> Result<String, CodecError> {
    let mut text = String::with_capacity(units.len());
    let mut iter = units.iter().copied();
    while let Some(unit) = iter.next() {
        if unit > 0x7f {
            return Err(CodecError::Unit(unit));
        }
        if unit == ESC {
            let follow = iter.next().ok_or(CodecError::TruncatedEscape)?;
            text.push(extension_char(follow).ok_or(CodecError::Unit(follow))?);
        } else {
            text.push(BASIC[usize::from(unit)]);
        }
    }
    Ok(text)
}
