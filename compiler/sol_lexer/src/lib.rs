//! Tokenizer for Solidity source.
//!
//! Standalone except for `sol_ast` — tools that only need tokens (the
//! formatter, highlighters) can depend on this crate without pulling in the
//! parser.
//!
//! Tokenization is total: every byte of input is covered by exactly one
//! token (`Invalid` for unrecognized sequences), the token stream always
//! ends with `Eof`, and tokens carry only their start offset — text is
//! recovered by re-scanning with [`token_slice`].

mod cursor;
mod scanner;

pub use cursor::Cursor;
pub use scanner::Tokenizer;

use sol_ast::{TokenList, TokenTag};

/// Tokenize a whole source buffer into a columnar token table.
///
/// The final entry is always `Eof`.
pub fn tokenize(source: &str) -> TokenList {
    let mut tokens = TokenList::with_capacity(source.len() / 4 + 1);
    let mut tokenizer = Tokenizer::new(source);
    loop {
        let token = tokenizer.next_token();
        let done = token.tag == TokenTag::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Recover a token's text by re-scanning from its start offset.
///
/// The tokenizer is deterministic, so one `next_token` call from `start`
/// reproduces the token and its end position. `start` must be a token start
/// previously produced for this source.
pub fn token_slice(source: &str, start: u32) -> &str {
    let begin = start as usize;
    let mut tokenizer = Tokenizer::new(&source[begin..]);
    let token = tokenizer.next_token();
    debug_assert_eq!(token.start, 0, "token start must point at a token");
    &source[begin..begin + tokenizer.pos() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn stream_ends_with_eof() {
        let tokens = tokenize("contract A {}");
        assert_eq!(tokens.tag(tokens.len() as u32 - 1), TokenTag::Eof);
    }

    #[test]
    fn token_slice_round_trips_text() {
        let source = "contract Vault { uint256 total = 10000 gwei; }";
        let tokens = tokenize(source);
        let mut reconstructed = Vec::new();
        for i in 0..tokens.len() as u32 {
            if tokens.tag(i) == TokenTag::Eof {
                break;
            }
            reconstructed.push(token_slice(source, tokens.start(i)));
        }
        assert_eq!(
            reconstructed,
            vec![
                "contract", "Vault", "{", "uint256", "total", "=", "10000", "gwei", ";", "}"
            ]
        );
    }

    #[test]
    fn token_slice_for_literals() {
        let source = "x = \"a b\";";
        let tokens = tokenize(source);
        assert_eq!(tokens.tag(2), TokenTag::StringLiteral);
        assert_eq!(token_slice(source, tokens.start(2)), "\"a b\"");
    }

    proptest! {
        /// Tokenization terminates on arbitrary input and always ends with Eof.
        #[test]
        fn tokenize_is_total(source in ".*") {
            let tokens = tokenize(&source);
            prop_assert!(!tokens.is_empty());
            prop_assert_eq!(tokens.tag(tokens.len() as u32 - 1), TokenTag::Eof);
        }

        /// Every non-Eof token starts strictly after its predecessor —
        /// monotone coverage of the input with no overlap.
        #[test]
        fn token_starts_are_monotone(source in ".*") {
            let tokens = tokenize(&source);
            for i in 1..tokens.len() as u32 {
                if tokens.tag(i) == TokenTag::Eof {
                    break;
                }
                prop_assert!(tokens.start(i) > tokens.start(i - 1));
            }
        }
    }
}
