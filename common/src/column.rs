//! 列記号（A, Z, AA, ...）と列番号（1始まり）の相互変換

use crate::error::{Error, Result};

/// 列記号を1始まりの列番号に変換
///
/// `A` = 1, `Z` = 26, `AA` = 27。小文字も受け付ける。
pub fn column_index(letters: &str) -> Result<u32> {
    let trimmed = letters.trim();
    if trimmed.is_empty() || trimmed.len() > 3 {
        return Err(Error::InvalidColumn(letters.to_string()));
    }

    let mut index: u32 = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(Error::InvalidColumn(letters.to_string()));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        index = index * 26 + digit;
    }

    Ok(index)
}

/// 1始まりの列番号を列記号に変換（0は空文字）
pub fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = ((index - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}
