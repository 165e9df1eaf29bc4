//! Kana utilities for reading resolution
//!
//! This module provides the character-class predicates used to decide
//! whether a surface string can be read verbatim, and the hiragana to
//! katakana code-point remap used for verbatim kana readings.
//!
//! All tests are explicit ranges over `char` values so behavior does not
//! depend on a regex engine's Unicode tables.

/// Offset between a hiragana code point and its katakana counterpart
pub const KATAKANA_OFFSET: u32 = 0x60;

// Hiragana block as admitted by the verbatim alphabet
const HIRAGANA_FIRST: u32 = 0x3041;
const HIRAGANA_LAST: u32 = 0x309F;

// A surface "begins with hiragana" only within the letter range
const HIRAGANA_LEADING_LAST: u32 = 0x3096;

// Code points shifted by `to_katakana` (ぁ through ゔ)
const CONVERTIBLE_FIRST: u32 = 0x3041;
const CONVERTIBLE_LAST: u32 = 0x3094;

const KATAKANA_FIRST: u32 = 0x30A1;
const KATAKANA_LAST: u32 = 0x30FC;

/// Check whether a character is in the hiragana block U+3041..=U+309F
pub fn is_hiragana(c: char) -> bool {
    (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&(c as u32))
}

/// Check whether a character is in the katakana range U+30A1..=U+30FC
///
/// The range includes the middle dot and the prolonged sound mark.
pub fn is_katakana(c: char) -> bool {
    (KATAKANA_FIRST..=KATAKANA_LAST).contains(&(c as u32))
}

/// Check whether a character is a kana character admitted by the verbatim alphabet
///
/// The middle dot (・) and prolonged sound mark (ー) come in through the
/// katakana range.
pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

/// Check whether a character is an ASCII or full-width Latin letter
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}')
}

/// Check whether a character is an ASCII or full-width decimal digit
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '\u{FF10}'..='\u{FF19}')
}

/// Check whether a character is whitespace or a non-word character
///
/// A word character is alphanumeric or an underscore; everything else
/// (punctuation, symbols, brackets) counts as non-word.
pub fn is_non_word_or_whitespace(c: char) -> bool {
    c.is_whitespace() || !(c.is_alphanumeric() || c == '_')
}

/// Check whether a character belongs to the verbatim alphabet
pub fn is_verbatim_char(c: char) -> bool {
    is_kana(c) || is_latin_letter(c) || is_digit(c) || is_non_word_or_whitespace(c)
}

/// Check whether a whole surface string can be read verbatim
///
/// The match is anchored at both ends and needs at least one character,
/// so an empty string is never verbatim.
pub fn is_verbatim_surface(surface: &str) -> bool {
    !surface.is_empty() && surface.chars().all(is_verbatim_char)
}

/// Check whether a string starts with a hiragana letter (U+3041..=U+3096)
pub fn starts_with_hiragana(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| (HIRAGANA_FIRST..=HIRAGANA_LEADING_LAST).contains(&(c as u32)))
}

/// Remap a single character from hiragana to katakana
///
/// Only code points in U+3041..=U+3094 move; everything else is returned
/// unchanged.
pub fn hiragana_to_katakana(c: char) -> char {
    let code = c as u32;
    if (CONVERTIBLE_FIRST..=CONVERTIBLE_LAST).contains(&code) {
        char::from_u32(code + KATAKANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Convert every hiragana character of a string to katakana
pub fn to_katakana(text: &str) -> String {
    text.chars().map(hiragana_to_katakana).collect()
}
