// Copyright (c) 2026 rezky_nightky

use std::char;

use unicode_width::UnicodeWidthChar;

use crate::error::RainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const NONE: Charset = Charset(0);
    pub const ENGLISH_LETTERS: Charset = Charset(0x1);
    pub const ENGLISH_DIGITS: Charset = Charset(0x2);
    pub const ENGLISH_PUNCTUATION: Charset = Charset(0x4);
    pub const HALFWIDTH_KATAKANA: Charset = Charset(0x8);
    pub const HIRAGANA: Charset = Charset(0x10);
    pub const KATAKANA: Charset = Charset(0x20);
    pub const KANJI: Charset = Charset(0x40);
    pub const GREEK: Charset = Charset(0x80);
    pub const CYRILLIC: Charset = Charset(0x100);
    pub const BINARY: Charset = Charset(0x200);
    pub const HEX: Charset = Charset(0x400);
    pub const SYMBOLS: Charset = Charset(0x800);
    pub const BLOCKS: Charset = Charset(0x1000);

    pub const ASCII_SAFE: Charset = Charset(0x3);
    pub const KANA: Charset = Charset(0x70);
    pub const MATRIX: Charset = Charset(0xB);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn union(self, other: Charset) -> Charset {
        Charset(self.0 | other.0)
    }
}

/// The gojūon rows, no small kana or voiced marks.
const HIRAGANA_ROWS: &str =
    "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをん";
const KATAKANA_ROWS: &str =
    "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";
const KANJI_SET: &str = "一二三四五六七八九十百千万円日本語文字数学";

pub fn parse_user_hex_chars(s: &str) -> Result<Vec<char>, RainError> {
    let mut out = Vec::new();
    for (i, part) in s.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let v = u32::from_str_radix(part, 16)
            .map_err(|_| RainError::Chars(format!("invalid hex char at index {}", i + 1)))?;
        let ch = char::from_u32(v).ok_or_else(|| {
            RainError::Chars(format!("invalid unicode scalar at index {}", i + 1))
        })?;
        out.push(ch);
    }
    Ok(out)
}

/// Pairs up `--chars` codepoints into inclusive ranges.
pub fn user_ranges(spec: &str) -> Result<Vec<(char, char)>, RainError> {
    let list = parse_user_hex_chars(spec)?;
    if list.len() % 2 != 0 {
        return Err(RainError::Chars(
            "odd number of unicode chars given (must be even)".to_string(),
        ));
    }
    Ok(list.chunks(2).map(|p| (p[0], p[1])).collect())
}

pub fn charset_from_str(spec: &str, default_to_ascii: bool) -> Result<Charset, RainError> {
    let spec = spec.trim().to_ascii_lowercase();
    match spec.as_str() {
        "auto" => Ok(if default_to_ascii {
            Charset::ASCII_SAFE
        } else {
            Charset::KANA
        }),
        "kana" | "nihongo" => Ok(Charset::KANA),
        "hiragana" => Ok(Charset::HIRAGANA),
        "katakana" => Ok(Charset::KATAKANA),
        "kanji" => Ok(Charset::KANJI),
        "matrix" => Ok(Charset::MATRIX),
        "halfwidth" => Ok(Charset::HALFWIDTH_KATAKANA),
        "ascii" => Ok(Charset::ASCII_SAFE.union(Charset::ENGLISH_PUNCTUATION)),
        "english" => Ok(Charset::ENGLISH_LETTERS),
        "digits" | "dec" | "decimal" => Ok(Charset::ENGLISH_DIGITS),
        "bin" | "binary" | "01" => Ok(Charset::BINARY),
        "hex" | "hexadecimal" => Ok(Charset::HEX),
        "greek" => Ok(Charset::GREEK),
        "cyrillic" => Ok(Charset::CYRILLIC),
        "symbols" => Ok(Charset::SYMBOLS),
        "blocks" => Ok(Charset::BLOCKS),
        _ => Err(RainError::Charset(spec)),
    }
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

pub fn build_chars(
    mut charset: Charset,
    user_ranges: &[(char, char)],
    default_to_ascii: bool,
) -> Vec<char> {
    if charset == Charset::NONE && user_ranges.is_empty() {
        charset = if default_to_ascii {
            Charset::ASCII_SAFE
        } else {
            Charset::KANA
        };
    }

    let mut out: Vec<char> = Vec::new();

    if charset.contains(Charset::HIRAGANA) {
        out.extend(HIRAGANA_ROWS.chars());
    }
    if charset.contains(Charset::KATAKANA) {
        out.extend(KATAKANA_ROWS.chars());
    }
    if charset.contains(Charset::KANJI) {
        out.extend(KANJI_SET.chars());
    }
    if charset.contains(Charset::HALFWIDTH_KATAKANA) {
        push_range(&mut out, 0xFF66, 0xFF9D);
    }
    if charset.contains(Charset::BINARY) {
        push_range(&mut out, 0x30, 0x31);
    }
    if charset.contains(Charset::HEX) {
        push_range(&mut out, 0x30, 0x39);
        push_range(&mut out, 0x41, 0x46);
    }
    if charset.contains(Charset::ENGLISH_LETTERS) {
        push_range(&mut out, 0x41, 0x5A);
        push_range(&mut out, 0x61, 0x7A);
    }
    if charset.contains(Charset::ENGLISH_DIGITS) {
        push_range(&mut out, 0x30, 0x39);
    }
    if charset.contains(Charset::ENGLISH_PUNCTUATION) {
        push_range(&mut out, 0x21, 0x2F);
        push_range(&mut out, 0x3A, 0x40);
        push_range(&mut out, 0x5B, 0x60);
        push_range(&mut out, 0x7B, 0x7E);
    }
    if charset.contains(Charset::GREEK) {
        push_range(&mut out, 0x0391, 0x03A9);
        push_range(&mut out, 0x03B1, 0x03C9);
    }
    if charset.contains(Charset::CYRILLIC) {
        push_range(&mut out, 0x0410, 0x044F);
    }
    if charset.contains(Charset::SYMBOLS) {
        out.extend("∞∑∫√π∆Ωµλ≈≠≤≥×÷±∂∇∈∉∩∪⊂⊃⊆⊇⊕⊗".chars());
    }
    if charset.contains(Charset::BLOCKS) {
        push_range(&mut out, 0x2580, 0x259F);
    }

    for &(a, b) in user_ranges {
        push_range(&mut out, a as u32, b as u32);
    }

    if out.is_empty() {
        out.push('0');
        out.push('1');
    }

    out
}

/// Terminal columns the widest glyph needs.
pub fn glyph_span(chars: &[char]) -> u16 {
    if chars.iter().any(|c| c.width() == Some(2)) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_hex_chars_parses_hex_codepoints() {
        let v = parse_user_hex_chars("30,31").unwrap();
        assert_eq!(v, vec!['0', '1']);
    }

    #[test]
    fn user_ranges_rejects_odd_lists() {
        assert!(user_ranges("30,31,32").is_err());
        assert_eq!(user_ranges("41,43").unwrap(), vec![('A', 'C')]);
    }

    #[test]
    fn charset_auto_selects_ascii_safe_when_non_utf() {
        assert_eq!(charset_from_str("auto", true).unwrap(), Charset::ASCII_SAFE);
        assert_eq!(charset_from_str("auto", false).unwrap(), Charset::KANA);
    }

    #[test]
    fn kana_mixes_both_syllabaries_and_kanji() {
        let out = build_chars(Charset::KANA, &[], false);
        let expected = HIRAGANA_ROWS.chars().count()
            + KATAKANA_ROWS.chars().count()
            + KANJI_SET.chars().count();
        assert_eq!(expected, 46 + 46 + 21);
        assert_eq!(out.len(), expected);
        assert!(out.contains(&'あ'));
        assert!(out.contains(&'ヲ'));
        assert!(out.contains(&'語'));
    }

    #[test]
    fn build_chars_binary_has_only_0_and_1() {
        assert_eq!(build_chars(Charset::BINARY, &[], true), vec!['0', '1']);
    }

    #[test]
    fn user_ranges_extend_the_palette() {
        let out = build_chars(Charset::NONE, &[('a', 'c')], true);
        assert_eq!(out, vec!['a', 'b', 'c']);
    }

    #[test]
    fn span_detects_double_width_glyphs() {
        assert_eq!(glyph_span(&build_chars(Charset::KANA, &[], false)), 2);
        assert_eq!(glyph_span(&build_chars(Charset::MATRIX, &[], false)), 1);
        assert_eq!(glyph_span(&['0', '1']), 1);
    }
}
