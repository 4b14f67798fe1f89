//! Hand-written scanner producing [`Token`] values.
//!
//! Single-pass character-class state machine over a [`Cursor`]. Whitespace
//! and both comment styles are skipped between tokens; every remaining byte
//! of input is covered by exactly one token, with `Invalid` standing in for
//! unrecognized sequences. The scanner never fails and never backtracks;
//! calling [`Tokenizer::next_token`] past the end yields `Eof` forever.
//!
//! Keywords are resolved after the identifier scan (longest match, case
//! sensitive), followed by the sized-elementary-type check. Unit
//! denominations (`wei`, `gwei`, `ether`, time units) stay plain
//! identifiers — the parser interprets them contextually.

use sol_ast::{Token, TokenTag};

use crate::cursor::Cursor;

/// Pure, allocation-free scanner. One token per [`next_token`](Self::next_token) call.
///
/// Error conditions are encoded as `TokenTag::Invalid`, not as `Result`.
pub struct Tokenizer<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source.as_bytes()),
        }
    }

    /// Byte position of the cursor — the end of the last returned token.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.cursor.pos();

        let tag = match self.cursor.current() {
            0 if self.cursor.is_eof() => TokenTag::Eof,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => return self.identifier_like(start),
            b'0'..=b'9' => self.number(),
            b'"' | b'\'' => self.string(self.cursor.current()),

            b'+' => self.plus(),
            b'-' => self.minus(),
            b'*' => self.star(),
            b'/' => self.slash(),
            b'%' => self.percent(),
            b'=' => self.equal(),
            b'!' => self.bang(),
            b'<' => self.less(),
            b'>' => self.greater(),
            b'&' => self.ampersand(),
            b'|' => self.pipe(),
            b'^' => self.caret(),
            b'~' => self.single(TokenTag::Tilde),

            b'(' => self.single(TokenTag::LParen),
            b')' => self.single(TokenTag::RParen),
            b'[' => self.single(TokenTag::LBracket),
            b']' => self.single(TokenTag::RBracket),
            b'{' => self.single(TokenTag::LBrace),
            b'}' => self.single(TokenTag::RBrace),
            b';' => self.single(TokenTag::Semicolon),
            b',' => self.single(TokenTag::Comma),
            b'.' => self.single(TokenTag::Dot),
            b'?' => self.single(TokenTag::Question),
            b':' => self.single(TokenTag::Colon),

            _ => self.single(TokenTag::Invalid),
        };

        Token { tag, start }
    }

    /// Skip whitespace and both comment styles.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_whitespace();
            if self.cursor.current() != b'/' {
                return;
            }
            match self.cursor.peek() {
                b'/' => self.cursor.eat_until_newline_or_eof(),
                b'*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        if self.cursor.is_eof() {
                            // Unterminated block comment swallows the rest
                            // of the input; the next token is Eof.
                            return;
                        }
                        if self.cursor.current() == b'*' && self.cursor.peek() == b'/' {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // ─── Identifiers and keywords ────────────────────────────────────────

    fn identifier_like(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_identifier_continue);
        let text = &self.source[start as usize..self.cursor.pos() as usize];

        // `hex"..."` is a single hex-string token.
        if text == "hex" && matches!(self.cursor.current(), b'"' | b'\'') {
            let tag = match self.string(self.cursor.current()) {
                TokenTag::StringLiteral => TokenTag::HexStringLiteral,
                other => other,
            };
            return Token { tag, start };
        }

        let tag = TokenTag::keyword(text)
            .or_else(|| TokenTag::sized_type(text))
            .unwrap_or(TokenTag::Identifier);
        Token { tag, start }
    }

    // ─── Numbers ─────────────────────────────────────────────────────────

    fn number(&mut self) -> TokenTag {
        if self.cursor.current() == b'0' && matches!(self.cursor.peek(), b'x' | b'X') {
            return self.hex_number();
        }

        self.cursor.eat_while(is_digit_continue);
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(is_digit_continue);
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            let after_exp = self.cursor.peek();
            if after_exp.is_ascii_digit() {
                self.cursor.advance();
                self.cursor.eat_while(is_digit_continue);
            } else if matches!(after_exp, b'+' | b'-') {
                // Need a digit after the sign for this to be an exponent.
                let mut probe = self.cursor;
                probe.advance();
                probe.advance();
                if probe.current().is_ascii_digit() {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.eat_while(is_digit_continue);
                }
            }
        }
        TokenTag::NumberLiteral
    }

    fn hex_number(&mut self) -> TokenTag {
        self.cursor.advance(); // 0
        self.cursor.advance(); // x
        let digits_start = self.cursor.pos();
        self.cursor
            .eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
        if self.cursor.pos() - digits_start == 40 {
            TokenTag::AddressLiteral
        } else {
            TokenTag::NumberLiteral
        }
    }

    // ─── Strings ─────────────────────────────────────────────────────────

    /// Scan a quoted literal with backslash escapes.
    ///
    /// An unterminated literal (newline or end of input before the closing
    /// quote) is an `Invalid` token covering the scanned bytes.
    fn string(&mut self, quote: u8) -> TokenTag {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => return TokenTag::Invalid,
                b'\n' => return TokenTag::Invalid,
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                b if b == quote => {
                    self.cursor.advance();
                    return TokenTag::StringLiteral;
                }
                _ => self.cursor.advance(),
            }
        }
    }

    // ─── Operators ───────────────────────────────────────────────────────

    /// Single-byte token: advance one byte and emit the given tag.
    fn single(&mut self, tag: TokenTag) -> TokenTag {
        self.cursor.advance();
        tag
    }

    /// Two-byte operator: consume the already-matched second byte.
    fn double(&mut self, tag: TokenTag) -> TokenTag {
        self.cursor.advance();
        self.cursor.advance();
        tag
    }

    fn plus(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'+' => self.double(TokenTag::PlusPlus),
            b'=' => self.double(TokenTag::PlusEq),
            _ => self.single(TokenTag::Plus),
        }
    }

    fn minus(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'-' => self.double(TokenTag::MinusMinus),
            b'=' => self.double(TokenTag::MinusEq),
            _ => self.single(TokenTag::Minus),
        }
    }

    fn star(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'*' => self.double(TokenTag::StarStar),
            b'=' => self.double(TokenTag::StarEq),
            _ => self.single(TokenTag::Star),
        }
    }

    fn slash(&mut self) -> TokenTag {
        // Comments were consumed by skip_trivia; a '/' here is an operator.
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::SlashEq),
            _ => self.single(TokenTag::Slash),
        }
    }

    fn percent(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::PercentEq),
            _ => self.single(TokenTag::Percent),
        }
    }

    fn equal(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::EqEq),
            b'>' => self.double(TokenTag::FatArrow),
            _ => self.single(TokenTag::Eq),
        }
    }

    fn bang(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::NotEq),
            _ => self.single(TokenTag::Bang),
        }
    }

    fn less(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::LtEq),
            b'<' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    b'=' => self.double(TokenTag::ShlEq),
                    _ => self.single(TokenTag::Shl),
                }
            }
            _ => self.single(TokenTag::Lt),
        }
    }

    fn greater(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::GtEq),
            b'>' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    b'=' => self.double(TokenTag::ShrEq),
                    _ => self.single(TokenTag::Shr),
                }
            }
            _ => self.single(TokenTag::Gt),
        }
    }

    fn ampersand(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'&' => self.double(TokenTag::AmpAmp),
            b'=' => self.double(TokenTag::AmpEq),
            _ => self.single(TokenTag::Amp),
        }
    }

    fn pipe(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'|' => self.double(TokenTag::PipePipe),
            b'=' => self.double(TokenTag::PipeEq),
            _ => self.single(TokenTag::Pipe),
        }
    }

    fn caret(&mut self) -> TokenTag {
        match self.cursor.peek() {
            b'=' => self.double(TokenTag::CaretEq),
            _ => self.single(TokenTag::Caret),
        }
    }
}

#[inline]
fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[inline]
fn is_digit_continue(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(source: &str) -> Vec<TokenTag> {
        let mut tokenizer = Tokenizer::new(source);
        let mut out = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let done = token.tag == TokenTag::Eof;
            out.push(token.tag);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn empty_and_whitespace_only() {
        assert_eq!(tags(""), vec![TokenTag::Eof]);
        assert_eq!(tags("  \t\n\r\n "), vec![TokenTag::Eof]);
        assert_eq!(tags("// only a comment"), vec![TokenTag::Eof]);
        assert_eq!(tags("/* block */"), vec![TokenTag::Eof]);
        assert_eq!(tags("/* unterminated"), vec![TokenTag::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            tags("contract Foo"),
            vec![TokenTag::Contract, TokenTag::Identifier, TokenTag::Eof]
        );
        // Unit denominations are plain identifiers.
        assert_eq!(
            tags("10000 gwei"),
            vec![TokenTag::NumberLiteral, TokenTag::Identifier, TokenTag::Eof]
        );
        assert_eq!(
            tags("uint256 $x _y"),
            vec![
                TokenTag::UintSized,
                TokenTag::Identifier,
                TokenTag::Identifier,
                TokenTag::Eof
            ]
        );
    }

    #[test]
    fn operators_longest_match() {
        assert_eq!(
            tags(">>= >> >= >"),
            vec![
                TokenTag::ShrEq,
                TokenTag::Shr,
                TokenTag::GtEq,
                TokenTag::Gt,
                TokenTag::Eof
            ]
        );
        assert_eq!(
            tags("** *= *"),
            vec![TokenTag::StarStar, TokenTag::StarEq, TokenTag::Star, TokenTag::Eof]
        );
        assert_eq!(
            tags("=> == ="),
            vec![TokenTag::FatArrow, TokenTag::EqEq, TokenTag::Eq, TokenTag::Eof]
        );
        assert_eq!(
            tags("++x"),
            vec![TokenTag::PlusPlus, TokenTag::Identifier, TokenTag::Eof]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(tags("42"), vec![TokenTag::NumberLiteral, TokenTag::Eof]);
        assert_eq!(tags("1_000"), vec![TokenTag::NumberLiteral, TokenTag::Eof]);
        assert_eq!(tags("2.5e-8"), vec![TokenTag::NumberLiteral, TokenTag::Eof]);
        assert_eq!(tags("1e18"), vec![TokenTag::NumberLiteral, TokenTag::Eof]);
        assert_eq!(tags("0xff"), vec![TokenTag::NumberLiteral, TokenTag::Eof]);
    }

    #[test]
    fn address_literal_is_forty_hex_digits() {
        let address = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
        assert_eq!(tags(address), vec![TokenTag::AddressLiteral, TokenTag::Eof]);
        // 39 digits is a plain number.
        assert_eq!(
            tags("0xdAC17F958D2ee523a2206206994597C13D831ec"),
            vec![TokenTag::NumberLiteral, TokenTag::Eof]
        );
    }

    #[test]
    fn strings() {
        assert_eq!(tags("\"hello\""), vec![TokenTag::StringLiteral, TokenTag::Eof]);
        assert_eq!(
            tags("'esc\\'aped'"),
            vec![TokenTag::StringLiteral, TokenTag::Eof]
        );
        assert_eq!(
            tags("hex\"deadbeef\""),
            vec![TokenTag::HexStringLiteral, TokenTag::Eof]
        );
        assert_eq!(tags("\"unterminated"), vec![TokenTag::Invalid, TokenTag::Eof]);
    }

    #[test]
    fn invalid_bytes_do_not_abort() {
        assert_eq!(
            tags("a # b"),
            vec![
                TokenTag::Identifier,
                TokenTag::Invalid,
                TokenTag::Identifier,
                TokenTag::Eof
            ]
        );
    }

    #[test]
    fn eof_forever() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.next_token().tag, TokenTag::Identifier);
        for _ in 0..4 {
            assert_eq!(tokenizer.next_token().tag, TokenTag::Eof);
        }
    }

    #[test]
    fn comment_styles_are_trivia() {
        assert_eq!(
            tags("a // line\n/* block\nmore */ b"),
            vec![TokenTag::Identifier, TokenTag::Identifier, TokenTag::Eof]
        );
    }
}
