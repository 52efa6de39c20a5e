#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Sentence tokenizer aligned with GloVe-style vocabularies.
//!
//! Text is cut into words (alphanumeric runs), the contraction suffix `'s`
//! and punctuation clusters such as `...` or `?!`. Whitespace never becomes a
//! token.
//!
//! Contract: identical input -> identical token sequence. No I/O, no state.

use std::fmt;

use serde::Serialize;

/// Apostrophe + lowercase `s`. Has its own row in the embedding vocabulary.
pub const CONTRACTION_SUFFIX: &str = "'s";

/// Error type for tokenization
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// Input bytes are not UTF-8 text
    #[error("invalid input: not UTF-8 text (valid up to byte {valid_up_to})")]
    InvalidInput {
        /// length of the longest valid UTF-8 prefix
        valid_up_to: usize,
    },
}

/// What a token is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// maximal run of alphanumeric characters
    Word,
    /// the literal `'s`
    Contraction,
    /// maximal run of other non-whitespace characters
    Punctuation,
}

/// A single token of a sentence. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    fn word(text: String) -> Self {
        Self {
            kind: TokenKind::Word,
            text,
        }
    }

    fn punctuation(c: char) -> Self {
        Self {
            kind: TokenKind::Punctuation,
            text: c.to_string(),
        }
    }

    fn contraction() -> Self {
        Self {
            kind: TokenKind::Contraction,
            text: CONTRACTION_SUFFIX.to_string(),
        }
    }

    /// Token kind
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Token text as it appeared in the input
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the token, keeping only its text
    pub fn into_string(self) -> String {
        self.text
    }

    /// True for alphanumeric runs
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// True for `'s`
    pub fn is_contraction(&self) -> bool {
        self.kind == TokenKind::Contraction
    }

    /// True for punctuation clusters
    pub fn is_punctuation(&self) -> bool {
        self.kind == TokenKind::Punctuation
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Tokenize readable text.
///
/// Runs three passes over the input:
/// 1. segmentation: every alphanumeric run is one piece, every other
///    non-whitespace character is a piece of its own;
/// 2. contraction fusion: `'` followed by a lone `s` piece becomes `'s`;
/// 3. punctuation fusion: adjacent punctuation pieces are concatenated.
///
/// `'s` is never absorbed by a neighbouring punctuation cluster.
///
/// ```
/// let tokens = tokenize::tokenize_to_strings("wait... it's really?!");
/// assert_eq!(tokens, ["wait", "...", "it", "'s", "really", "?!"]);
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    merge_punctuation(fuse_contractions(segment(text)))
}

/// Tokenize and return only the token texts.
pub fn tokenize_to_strings(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(Token::into_string).collect()
}

/// Tokenize raw bytes. Fails with [`TokenizeError::InvalidInput`] unless the
/// bytes are UTF-8; no partial result is produced.
pub fn tokenize_bytes(bytes: &[u8]) -> Result<Vec<Token>, TokenizeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| TokenizeError::InvalidInput {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(tokenize(text))
}

// Same result as padding every non-alphanumeric char with spaces and
// splitting on whitespace.
fn segment(text: &str) -> Vec<Token> {
    let mut pieces = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            pieces.push(Token::word(std::mem::take(&mut word)));
        }
        if !c.is_whitespace() {
            pieces.push(Token::punctuation(c));
        }
    }
    if !word.is_empty() {
        pieces.push(Token::word(word));
    }
    pieces
}

fn fuse_contractions(pieces: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(pieces.len());
    let mut iter = pieces.into_iter().peekable();
    while let Some(piece) = iter.next() {
        let fuses = piece.text == "'" && iter.peek().is_some_and(|next| next.text == "s");
        if fuses {
            iter.next();
            out.push(Token::contraction());
        } else {
            out.push(piece);
        }
    }
    out
}

fn merge_punctuation(pieces: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match out.last_mut() {
            Some(last) if last.is_punctuation() && piece.is_punctuation() => {
                last.text.push_str(&piece.text);
            }
            _ => out.push(piece),
        }
    }
    out
}
