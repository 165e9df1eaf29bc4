/*!
 * Tests for token classification and reading resolution
 */

use yomi::analyzer::Morpheme;
use yomi::token::{Token, TokenKind, UNRESOLVED_MARKER};

#[test]
fn test_from_morpheme_withHiraganaSurface_shouldReadAsKatakana() {
    let token = Token::from_morpheme(&Morpheme::unknown("ねこ", "名詞", ""));
    assert_eq!(token.kind(), TokenKind::Verbatim);
    assert_eq!(token.reading(), "ネコ");
    assert_eq!(token.detail(), "ねこ");
}

#[test]
fn test_from_morpheme_withKatakanaSurface_shouldReadAsWritten() {
    let token = Token::from_morpheme(&Morpheme::new("テレビ", "名詞", "テレビ"));
    assert!(token.is_verbatim());
    assert_eq!(token.reading(), "テレビ");
    assert_eq!(token.detail(), "テレビ");
}

#[test]
fn test_from_morpheme_withParticle_shouldIgnoreDictionaryReading() {
    // は is read ワ as a particle, but kana surfaces are always verbatim
    let token = Token::from_morpheme(&Morpheme::new("は", "助詞", "ワ"));
    assert_eq!(token.reading(), "ハ");
    assert_eq!(token.detail(), "は");
}

#[test]
fn test_from_morpheme_withKatakanaLeadingMixedKana_shouldNotConvert() {
    // conversion only happens when the first character is hiragana
    let token = Token::from_morpheme(&Morpheme::new("アいう", "名詞", ""));
    assert_eq!(token.reading(), "アいう");
}

#[test]
fn test_from_morpheme_withSymbolCategory_shouldBeVerbatim() {
    let token = Token::from_morpheme(&Morpheme::new("〒", "補助記号", "ユウビン"));
    assert_eq!(token.kind(), TokenKind::Verbatim);
    assert_eq!(token.reading(), "〒");
    assert_eq!(token.detail(), "〒");
}

#[test]
fn test_from_morpheme_withLatinWord_shouldBeVerbatim() {
    let token = Token::from_morpheme(&Morpheme::unknown("Rust", "名詞", ""));
    assert_eq!(token.kind(), TokenKind::Verbatim);
    assert_eq!(token.reading(), "Rust");
    assert_eq!(token.detail(), "Rust");
}

#[test]
fn test_from_morpheme_withDictionaryWord_shouldUseReading() {
    let token = Token::from_morpheme(&Morpheme::new("東京", "名詞", "トウキョウ"));
    assert_eq!(token.kind(), TokenKind::Dictionary);
    assert_eq!(token.reading(), "トウキョウ");
    assert_eq!(token.detail(), "東京(トウキョウ)");
}

#[test]
fn test_from_morpheme_withOutOfVocabularyWord_shouldMarkUnresolved() {
    let token = Token::from_morpheme(&Morpheme::unknown("鰯", "名詞", "イワシ"));
    assert_eq!(token.kind(), TokenKind::Unresolved);
    assert_eq!(token.reading(), "鰯");
    assert_eq!(token.detail(), format!("鰯{}", UNRESOLVED_MARKER));
}

#[test]
fn test_from_morpheme_withEmptyReading_shouldMarkUnresolved() {
    let token = Token::from_morpheme(&Morpheme::new("蕎麦", "名詞", ""));
    assert_eq!(token.kind(), TokenKind::Unresolved);
    assert_eq!(token.reading(), "蕎麦");
    assert_eq!(token.detail(), "蕎麦(?)");
}

#[test]
fn test_display_shouldPrintDetail() {
    let token: Token = (&Morpheme::new("猫", "名詞", "ネコ")).into();
    assert_eq!(token.to_string(), "猫(ネコ)");
    assert_eq!(token.surface(), "猫");
}
