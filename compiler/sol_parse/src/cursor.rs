//! Token cursor for navigating the token table.
//!
//! Low-level token access, lookahead, and consumption. The cursor advances
//! monotonically; the table always ends with `Eof`, so `current_tag` is
//! total.

use sol_ast::{TokenIndex, TokenList, TokenTag};

/// Cursor over a shared, read-only token table.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: TokenIndex,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(!tokens.is_empty(), "token table must at least hold Eof");
        Self { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    #[inline]
    pub fn pos(&self) -> TokenIndex {
        self.pos
    }

    #[inline]
    pub fn tokens(&self) -> &'a TokenList {
        self.tokens
    }

    /// Tag at the current position. Yields `Eof` at and past the end.
    #[inline]
    pub fn current_tag(&self) -> TokenTag {
        self.tag_at(self.pos)
    }

    /// Tag at an arbitrary position, clamped to `Eof` past the end.
    #[inline]
    pub fn tag_at(&self, index: TokenIndex) -> TokenTag {
        if (index as usize) < self.tokens.len() {
            self.tokens.tag(index)
        } else {
            TokenTag::Eof
        }
    }

    /// Tag one past the current position.
    #[inline]
    pub fn peek_tag(&self) -> TokenTag {
        self.tag_at(self.pos + 1)
    }

    /// Tag `n` past the current position.
    #[inline]
    pub fn peek_tag_n(&self, n: u32) -> TokenTag {
        self.tag_at(self.pos + n)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_tag() == TokenTag::Eof
    }

    /// Consume the current token and return its index.
    ///
    /// Does not advance past the final `Eof`.
    #[inline]
    pub fn advance(&mut self) -> TokenIndex {
        let index = self.pos;
        if (self.pos as usize) < self.tokens.len() - 1 {
            self.pos += 1;
        }
        index
    }

    #[inline]
    pub fn check(&self, tag: TokenTag) -> bool {
        self.current_tag() == tag
    }

    /// Consume the current token if it has the given tag.
    #[inline]
    pub fn eat(&mut self, tag: TokenTag) -> Option<TokenIndex> {
        if self.check(tag) {
            Some(self.advance())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sol_ast::Token;

    #[allow(clippy::cast_possible_truncation)]
    fn token_list(tags: &[TokenTag]) -> TokenList {
        let mut list = TokenList::new();
        for (i, &tag) in tags.iter().enumerate() {
            list.push(Token {
                tag,
                start: i as u32,
            });
        }
        list
    }

    #[test]
    fn advance_stops_at_eof() {
        let tokens = token_list(&[TokenTag::Contract, TokenTag::Identifier, TokenTag::Eof]);
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        // Stuck at Eof.
        assert_eq!(cursor.advance(), 2);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn eat_only_on_match() {
        let tokens = token_list(&[TokenTag::LParen, TokenTag::RParen, TokenTag::Eof]);
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.eat(TokenTag::RParen), None);
        assert_eq!(cursor.eat(TokenTag::LParen), Some(0));
        assert_eq!(cursor.eat(TokenTag::RParen), Some(1));
    }

    #[test]
    fn peek_past_end_is_eof() {
        let tokens = token_list(&[TokenTag::Eof]);
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.peek_tag(), TokenTag::Eof);
        assert_eq!(cursor.peek_tag_n(10), TokenTag::Eof);
    }
}
