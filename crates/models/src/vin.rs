//! Normalization and validation of Vehicle Identification Numbers read by OCR.
//!
//! OCR engines routinely confuse `I`, `O` and `Q` with digits, and those three
//! letters never appear in a VIN, so they are folded into `1` and `0` before
//! any validation happens.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Shortest partial VIN we still report (pre-1981 vehicles use shorter numbers)
pub const MIN_LENGTH: usize = 11;
/// Length of a modern VIN
pub const FULL_LENGTH: usize = 17;

/// Index of the check digit in a full VIN
const CHECK_DIGIT_INDEX: usize = 8;
/// Positional weights used for the check digit
const WEIGHTS: [u32; FULL_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

lazy_static! {
    static ref VIN_FORMAT: Regex =
        Regex::new(&format!(r"^[A-HJ-NPR-Z0-9]{{{MIN_LENGTH},{FULL_LENGTH}}}$")).unwrap();
}

/// Uppercases `text`, maps `I`/`O`/`Q` to `1`/`0`/`0` and removes whitespace
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_uppercase() {
            'I' => '1',
            'O' | 'Q' => '0',
            other => other,
        })
        .collect()
}

/// Whether `vin` is 11 to 17 characters of the VIN alphabet
pub fn is_valid_format(vin: &str) -> bool {
    VIN_FORMAT.is_match(vin)
}

/// Transliteration value of a VIN character, `None` outside the alphabet
fn char_value(c: char) -> Option<u32> {
    let value = match c {
        '0'..='9' => c.to_digit(10)?,
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        _ => return None,
    };
    Some(value)
}

/// Verifies the weighted check digit at position 9.
///
/// Only full 17-character VINs carry a check digit; anything else is rejected.
pub fn has_valid_check_digit(vin: &str) -> bool {
    let chars: Vec<char> = vin.chars().collect();
    if chars.len() != FULL_LENGTH {
        return false;
    }

    let mut total = 0;
    for (c, weight) in chars.iter().zip(WEIGHTS) {
        match char_value(*c) {
            Some(value) => total += value * weight,
            None => return false,
        }
    }

    let expected = match total % 11 {
        10 => 'X',
        // Always a single digit here
        digit => char::from_digit(digit, 10).unwrap_or('?'),
    };

    chars[CHECK_DIGIT_INDEX] == expected
}

/// Turns raw OCR lines into VIN candidates.
///
/// Each text is cleaned, then kept only if it has a valid format and, for full
/// length VINs, a valid check digit. Duplicates are dropped (first occurrence
/// wins) and the survivors are ordered longest first, keeping OCR order among
/// equal lengths.
pub fn filter_candidates<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut vins: Vec<String> = texts
        .into_iter()
        .map(|text| clean(text.as_ref()))
        .filter(|vin| is_valid_format(vin))
        .filter(|vin| vin.len() < FULL_LENGTH || has_valid_check_digit(vin))
        .filter(|vin| seen.insert(vin.clone()))
        .collect();

    // Stable sort, so OCR order survives among equal lengths
    vins.sort_by(|a, b| b.len().cmp(&a.len()));
    vins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("1hgbh41jxmn1o9186"), "1HGBH41JXMN109186");
        assert_eq!(clean("WBA 1234 IOQ"), "WBA1234100");
        assert_eq!(clean(" \t"), "");
    }

    #[test]
    fn test_is_valid_format() {
        assert!(is_valid_format("1HGBH41JXMN109186"));
        assert!(is_valid_format("WBA12345678"));

        // Too short and too long
        assert!(!is_valid_format("WBA1234567"));
        assert!(!is_valid_format("1HGBH41JXMN1091861"));

        // Letters that never occur in a VIN
        assert!(!is_valid_format("1HGBH41JXMN1O9186"));
        assert!(!is_valid_format("1hgbh41jxmn109186"));
    }

    #[test]
    fn test_has_valid_check_digit() {
        assert!(has_valid_check_digit("1HGBH41JXMN109186"));
        assert!(has_valid_check_digit("11111111111111111"));

        assert!(!has_valid_check_digit("1HGBH41J1MN109186"));
        assert!(!has_valid_check_digit("WBAFR9C50CC123456"));
        assert!(!has_valid_check_digit("WBA12345678"));
    }

    #[test]
    fn test_filter_candidates() {
        let texts = [
            "VIN:",
            "WBA12345678",
            "1hgbh41jxmn1o9186",
            "1HGBH41J1MN109186",
            "1HGBH41JXMN109186",
            "UU1XYZ98765",
        ];

        assert_eq!(
            filter_candidates(texts),
            vec![
                "1HGBH41JXMN109186".to_string(),
                "WBA12345678".to_string(),
                "UU1XYZ98765".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_candidates_empty() {
        assert!(filter_candidates(Vec::<String>::new()).is_empty());
        assert!(filter_candidates(["", "hello"]).is_empty());
    }
}
