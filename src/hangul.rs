//! Hangul syllable arithmetic needed by the engine's morphophonemic rules.

use crate::constants::{HANGUL_SYLLABLE_BASE, HANGUL_SYLLABLE_LAST, JONGSEONG_COUNT};
use crate::error::{MecabError, Result};

/// Returns `true` if `ch` lies in the modern Hangul syllable block.
pub fn is_hangul_syllable(ch: char) -> bool {
    (HANGUL_SYLLABLE_BASE..=HANGUL_SYLLABLE_LAST).contains(&(ch as u32))
}

/// Trailing consonant index of a syllable block (0 = none, 1..=27 = ㄱ..ㅎ).
///
/// Returns `None` for anything outside the syllable block.
pub fn jongseong_index(ch: char) -> Option<u32> {
    if !is_hangul_syllable(ch) {
        return None;
    }
    Some((ch as u32 - HANGUL_SYLLABLE_BASE) % JONGSEONG_COUNT)
}

/// Returns whether the last syllable of `text` has a trailing consonant.
///
/// `"문"` ends in ㄴ and yields `true`; `"다"` yields `false`.
///
/// # Errors
/// [`MecabError::InvalidCharacter`] when `text` is empty or its last
/// character is not a Hangul syllable block.
pub fn has_jongseong(text: &str) -> Result<bool> {
    let last = text.chars().next_back();
    match last.and_then(jongseong_index) {
        Some(index) => Ok(index != 0),
        None => Err(MecabError::InvalidCharacter {
            text: text.to_string(),
            ch: last,
        }),
    }
}
