// src/char_class.rs

use unicode_general_category::{get_general_category, GeneralCategory};

/// Character classes that drive identifier splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    pub upper: bool,
    pub digit: bool,
    /// Neither a letter nor a number.
    pub special: bool,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        let category = get_general_category(c);
        Self {
            upper: c.is_uppercase(),
            digit: is_digit(c, category),
            special: !is_alphanumeric(category),
        }
    }
}

/// `OtherNumber` code points whose Numeric_Type is Digit: superscripts,
/// subscripts, circled and parenthesized digits and a few script digits.
const OTHER_NUMBER_DIGITS: &[(char, char)] = &[
    ('\u{00B2}', '\u{00B3}'),
    ('\u{00B9}', '\u{00B9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247C}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24EA}', '\u{24EA}'),
    ('\u{24F5}', '\u{24FD}'),
    ('\u{24FF}', '\u{24FF}'),
    ('\u{2776}', '\u{277E}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278A}', '\u{2792}'),
    ('\u{10A40}', '\u{10A43}'),
    ('\u{10E60}', '\u{10E68}'),
    ('\u{11052}', '\u{1105A}'),
    ('\u{1F100}', '\u{1F10A}'),
];

/// Decimal digits plus the `OtherNumber` characters that carry a digit value.
fn is_digit(c: char, category: GeneralCategory) -> bool {
    match category {
        GeneralCategory::DecimalNumber => true,
        GeneralCategory::OtherNumber => OTHER_NUMBER_DIGITS
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&c)),
        _ => false,
    }
}

fn is_alphanumeric(category: GeneralCategory) -> bool {
    matches!(
        category,
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}
