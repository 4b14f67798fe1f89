//! Recursive descent parser for Solidity source.
//!
//! Produces the flat node table defined in `sol_ast`. Parsing is
//! error-tolerant: a malformed construct records a [`ParseError`] and the
//! parser resynchronizes at the nearest boundary token set for its context,
//! so sibling declarations still parse and one call can surface many
//! diagnostics.
//!
//! Expression parsing uses precedence climbing; type expressions have a
//! dedicated path because Solidity's grammar is ambiguous between type and
//! value positions without it.

mod cursor;
mod grammar;
mod recovery;
mod scratch;

pub use cursor::Cursor;
pub use recovery::{TokenSet, DECL_BOUNDARY, LIST_BOUNDARY, MEMBER_BOUNDARY, STMT_BOUNDARY};

use sol_ast::{
    Ast, ExtraData, ExtraIndex, Node, NodeData, NodeIndex, NodeList, NodeTag, ParseError,
    ParseErrorTag, ParsingError, TokenIndex, TokenList, TokenTag,
};

use crate::scratch::ScratchBuffer;

/// Parse a whole source unit.
///
/// Always returns an [`Ast`]; check [`Ast::errors`] for accumulated
/// diagnostics. The tree is best-effort under errors — well-formed sibling
/// declarations are present even when neighbors failed.
pub fn parse(source: &str) -> Ast {
    let tokens = sol_lexer::tokenize(source);
    let mut parser = Parser::new(source, &tokens);
    parser.parse_source_unit();
    let (nodes, extra_data, errors) = parser.finish();
    Ast::new(source.to_string(), tokens, nodes, extra_data, errors)
}

/// Parser state for one parse call.
///
/// Owns the node table, extra-data array, error list and scratch buffer;
/// reads tokens through a shared cursor. All grammar productions live in
/// `impl Parser` blocks under `grammar/`.
pub struct Parser<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
    nodes: NodeList,
    extra_data: Vec<u32>,
    errors: Vec<ParseError>,
    scratch: ScratchBuffer,
}

impl<'a> Parser<'a> {
    /// Create a parser over a tokenized source buffer.
    pub fn new(source: &'a str, tokens: &'a TokenList) -> Self {
        let mut nodes = NodeList::new();
        // Node 0 is the null sentinel; seed it so every real node gets a
        // nonzero index.
        nodes.push(Node {
            tag: NodeTag::Root,
            main_token: 0,
            data: NodeData::default(),
        });
        Self {
            source,
            cursor: Cursor::new(tokens),
            nodes,
            // Extra index 0 is never handed out for a record, so 0 stays
            // usable as "none" in record-bearing node slots.
            extra_data: vec![0],
            errors: Vec::new(),
            scratch: ScratchBuffer::new(),
        }
    }

    /// Tear down into the tables an [`Ast`] is assembled from.
    pub fn finish(self) -> (NodeList, Vec<u32>, Vec<ParseError>) {
        (self.nodes, self.extra_data, self.errors)
    }

    // ─── Cursor delegation ───────────────────────────────────────────────

    #[inline]
    pub(crate) fn current_tag(&self) -> TokenTag {
        self.cursor.current_tag()
    }

    #[inline]
    pub(crate) fn peek_tag(&self) -> TokenTag {
        self.cursor.peek_tag()
    }

    #[inline]
    pub(crate) fn tag_at(&self, index: TokenIndex) -> TokenTag {
        self.cursor.tag_at(index)
    }

    #[inline]
    pub(crate) fn token_index(&self) -> TokenIndex {
        self.cursor.pos()
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> TokenIndex {
        self.cursor.advance()
    }

    #[inline]
    pub(crate) fn check(&self, tag: TokenTag) -> bool {
        self.cursor.check(tag)
    }

    #[inline]
    pub(crate) fn eat(&mut self, tag: TokenTag) -> Option<TokenIndex> {
        self.cursor.eat(tag)
    }

    /// Text of a token, recovered by re-scanning the source.
    pub(crate) fn token_text(&self, index: TokenIndex) -> &'a str {
        sol_lexer::token_slice(self.source, self.cursor.tokens().start(index))
    }

    // ─── Node table access ───────────────────────────────────────────────

    #[inline]
    pub(crate) fn node_tag(&self, index: NodeIndex) -> NodeTag {
        self.nodes.tag(index)
    }

    #[inline]
    pub(crate) fn node_main_token(&self, index: NodeIndex) -> TokenIndex {
        self.nodes.main_token(index)
    }

    #[inline]
    pub(crate) fn extra_at(&self, index: ExtraIndex) -> u32 {
        self.extra_data[index as usize]
    }

    // ─── Error bookkeeping ───────────────────────────────────────────────

    /// Record a diagnostic at a token without failing the production.
    pub(crate) fn error_at(&mut self, tag: ParseErrorTag, token: TokenIndex) {
        tracing::debug!(?tag, token, "parse error");
        self.errors.push(ParseError { tag, token });
    }

    /// Record a diagnostic at the current token and fail the production.
    pub(crate) fn fail(&mut self, tag: ParseErrorTag) -> ParsingError {
        self.error_at(tag, self.token_index());
        ParsingError
    }

    /// Consume a token of the given tag or record an error and fail.
    pub(crate) fn expect(&mut self, tag: TokenTag) -> Result<TokenIndex, ParsingError> {
        if self.check(tag) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(self.fail(ParseErrorTag::UnexpectedEof))
        } else {
            Err(self.fail(ParseErrorTag::ExpectedToken(tag)))
        }
    }

    /// Consume a contextual keyword that lexes as a plain identifier
    /// (`from` in import directives).
    pub(crate) fn expect_contextual(&mut self, text: &str) -> Result<TokenIndex, ParsingError> {
        if self.check(TokenTag::Identifier) && self.token_text(self.token_index()) == text {
            Ok(self.advance())
        } else {
            Err(self.fail(ParseErrorTag::ExpectedIdentifier))
        }
    }

    /// Consume a `;` or record the dedicated missing-semicolon error.
    pub(crate) fn expect_semicolon(&mut self) -> Result<TokenIndex, ParsingError> {
        if self.check(TokenTag::Semicolon) {
            Ok(self.advance())
        } else {
            Err(self.fail(ParseErrorTag::ExpectedSemicolon))
        }
    }

    /// Advance to the next token in `set` (or `Eof`).
    ///
    /// Returns `true` if a boundary other than `Eof` was found. Guarantees
    /// progress: if already standing on a non-`Eof` boundary token the
    /// cursor does not move, which is the caller's signal to consume it.
    pub(crate) fn synchronize(&mut self, set: TokenSet) -> bool {
        loop {
            let tag = self.current_tag();
            if tag == TokenTag::Eof {
                return false;
            }
            if set.contains(tag) {
                return true;
            }
            self.advance();
        }
    }

    // ─── Table building ──────────────────────────────────────────────────

    #[inline]
    pub(crate) fn add_node(&mut self, node: Node) -> NodeIndex {
        self.nodes.push(node)
    }

    /// Append a typed record to extra data, returning its index.
    pub(crate) fn add_extra<T: ExtraData>(&mut self, record: &T) -> ExtraIndex {
        let index = u32::try_from(self.extra_data.len()).unwrap_or(u32::MAX);
        record.encode(&mut self.extra_data);
        index
    }

    /// Copy the scratch items since `mark` into extra data and truncate the
    /// scratch back. Returns the `[start, end)` extra-data range.
    pub(crate) fn commit_scratch(&mut self, mark: scratch::ScratchMark) -> (u32, u32) {
        let start = u32::try_from(self.extra_data.len()).unwrap_or(u32::MAX);
        self.extra_data.extend_from_slice(self.scratch.since(mark));
        let end = u32::try_from(self.extra_data.len()).unwrap_or(u32::MAX);
        self.scratch.truncate_to(mark);
        (start, end)
    }

    #[inline]
    pub(crate) fn scratch_mark(&self) -> scratch::ScratchMark {
        self.scratch.mark()
    }

    #[inline]
    pub(crate) fn scratch_push(&mut self, node: NodeIndex) {
        self.scratch.push(node);
    }

    #[inline]
    pub(crate) fn scratch_len(&self, mark: scratch::ScratchMark) -> usize {
        self.scratch.len_since(mark)
    }

    #[inline]
    pub(crate) fn scratch_since(&self, mark: scratch::ScratchMark) -> &[NodeIndex] {
        self.scratch.since(mark)
    }

    #[inline]
    pub(crate) fn scratch_truncate(&mut self, mark: scratch::ScratchMark) {
        self.scratch.truncate_to(mark);
    }
}

#[cfg(test)]
mod tests;
