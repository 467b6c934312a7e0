//! Output views over the tokens of one sentence.
//!
//! With `flatten = true` every token stays whole (`합니다/XSA+EF`); with
//! `flatten = false` compound and inflected tokens are split into their
//! atomic morphemes (`하/XSA`, `ᄇ니다/EF`).

use crate::error::Result;
use crate::types::{Morpheme, Token};

/// `(surface, tag)` pairs for `tokens`.
pub fn pos(tokens: &[Token], flatten: bool) -> Result<Vec<Morpheme>> {
    if flatten {
        return Ok(tokens.iter().map(Token::as_morpheme).collect());
    }

    let mut morphemes = Vec::with_capacity(tokens.len());
    for token in tokens {
        morphemes.extend(token.expand()?);
    }
    Ok(morphemes)
}

/// Same as [`pos`], rendered as `surface/tag` strings.
pub fn pos_joined(tokens: &[Token], flatten: bool) -> Result<Vec<String>> {
    Ok(pos(tokens, flatten)?
        .iter()
        .map(Morpheme::joined)
        .collect())
}

/// Surface texts of [`pos`].
pub fn morphs(tokens: &[Token], flatten: bool) -> Result<Vec<String>> {
    Ok(pos(tokens, flatten)?
        .into_iter()
        .map(|morpheme| morpheme.surface)
        .collect())
}

/// Noun-family entries of [`pos`], order preserved.
pub fn noun_morphemes(tokens: &[Token], flatten: bool) -> Result<Vec<Morpheme>> {
    Ok(pos(tokens, flatten)?
        .into_iter()
        .filter(Morpheme::is_noun)
        .collect())
}

/// Surface texts of [`noun_morphemes`].
pub fn nouns(tokens: &[Token], flatten: bool) -> Result<Vec<String>> {
    Ok(noun_morphemes(tokens, flatten)?
        .into_iter()
        .map(|morpheme| morpheme.surface)
        .collect())
}
