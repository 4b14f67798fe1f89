//! Statements and blocks.
//!
//! Expression statements are not wrapped: an expression node in statement
//! position is the statement, and the formatter appends the terminating
//! `;` when it renders one there.

use sol_ast::{
    ForHeader, IfBranches, Node, NodeData, NodeIndex, NodeTag, ParseErrorTag, ParsingError,
    SubRange, TokenTag, TryHeader,
};

use crate::recovery::STMT_BOUNDARY;
use crate::Parser;

impl Parser<'_> {
    /// `{ statement* }` with per-statement recovery.
    pub fn parse_block(&mut self) -> Result<NodeIndex, ParsingError> {
        let lbrace = self.expect(TokenTag::LBrace)?;
        let mark = self.scratch_mark();

        while !self.check(TokenTag::RBrace) && !self.is_at_end() {
            let before = self.token_index();
            let checkpoint = self.scratch_mark();
            match self.parse_statement() {
                Ok(stmt) => self.scratch_push(stmt),
                Err(ParsingError) => {
                    self.scratch_truncate(checkpoint);
                    self.synchronize(STMT_BOUNDARY);
                    self.eat(TokenTag::Semicolon);
                }
            }
            if self.token_index() == before && !self.check(TokenTag::RBrace) && !self.is_at_end()
            {
                self.advance();
            }
        }
        if self.eat(TokenTag::RBrace).is_none() {
            self.error_at(ParseErrorTag::UnbalancedDelimiter, lbrace);
        }

        let node = match self.scratch_len(mark) {
            0 => Node {
                tag: NodeTag::BlockTwo,
                main_token: lbrace,
                data: NodeData::default(),
            },
            1 => {
                let stmt = self.scratch_since(mark)[0];
                Node {
                    tag: NodeTag::BlockTwo,
                    main_token: lbrace,
                    data: NodeData { lhs: stmt, rhs: 0 },
                }
            }
            2 => {
                let stmts = [self.scratch_since(mark)[0], self.scratch_since(mark)[1]];
                Node {
                    tag: NodeTag::BlockTwo,
                    main_token: lbrace,
                    data: NodeData {
                        lhs: stmts[0],
                        rhs: stmts[1],
                    },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::Block,
                    main_token: lbrace,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        self.scratch_truncate(mark);
        Ok(self.add_node(node))
    }

    /// One statement, dispatched on the leading token.
    pub fn parse_statement(&mut self) -> Result<NodeIndex, ParsingError> {
        match self.current_tag() {
            TokenTag::LBrace => self.parse_block(),
            TokenTag::Unchecked => {
                let main_token = self.advance();
                let block = self.parse_block()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::UncheckedBlock,
                    main_token,
                    data: NodeData { lhs: block, rhs: 0 },
                }))
            }
            TokenTag::If => self.parse_if(),
            TokenTag::For => self.parse_for(),
            TokenTag::While => self.parse_while(),
            TokenTag::Do => self.parse_do_while(),
            TokenTag::Return => {
                let main_token = self.advance();
                let value = if self.check(TokenTag::Semicolon) {
                    0
                } else {
                    self.parse_expression()?
                };
                self.expect_semicolon()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::Return,
                    main_token,
                    data: NodeData { lhs: value, rhs: 0 },
                }))
            }
            TokenTag::Break => {
                let main_token = self.advance();
                self.expect_semicolon()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::Break,
                    main_token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::Continue => {
                let main_token = self.advance();
                self.expect_semicolon()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::Continue,
                    main_token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::Emit => {
                let main_token = self.advance();
                let call = self.parse_expression()?;
                self.expect_semicolon()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::Emit,
                    main_token,
                    data: NodeData { lhs: call, rhs: 0 },
                }))
            }
            TokenTag::Revert => {
                let main_token = self.advance();
                let call = if self.check(TokenTag::Semicolon) {
                    0
                } else {
                    self.parse_expression()?
                };
                self.expect_semicolon()?;
                Ok(self.add_node(Node {
                    tag: NodeTag::Revert,
                    main_token,
                    data: NodeData { lhs: call, rhs: 0 },
                }))
            }
            TokenTag::Try => self.parse_try(),
            TokenTag::Assembly => self.parse_assembly(),
            TokenTag::Invalid => Err(self.fail(ParseErrorTag::InvalidToken)),
            TokenTag::Eof => Err(self.fail(ParseErrorTag::UnexpectedEof)),

            tag if tag.is_elementary_type() || tag == TokenTag::Mapping => {
                self.parse_variable_decl_statement()
            }
            TokenTag::Function if self.peek_tag() == TokenTag::LParen => {
                self.parse_variable_decl_statement()
            }
            TokenTag::Identifier if self.looks_like_variable_decl() => {
                self.parse_variable_decl_statement()
            }
            TokenTag::LParen if self.looks_like_tuple_decl() => self.parse_tuple_decl_statement(),

            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon()?;
                Ok(expr)
            }
        }
    }

    /// Lookahead: `Ident (.Ident)* ([...])*` followed by an identifier or
    /// a storage location means a local declaration, not an expression.
    fn looks_like_variable_decl(&self) -> bool {
        let mut i = self.token_index();
        debug_assert_eq!(self.tag_at(i), TokenTag::Identifier);
        i += 1;
        while self.tag_at(i) == TokenTag::Dot && self.tag_at(i + 1) == TokenTag::Identifier {
            i += 2;
        }
        while self.tag_at(i) == TokenTag::LBracket {
            let mut depth = 1u32;
            i += 1;
            while depth > 0 {
                match self.tag_at(i) {
                    TokenTag::LBracket => depth += 1,
                    TokenTag::RBracket => depth -= 1,
                    TokenTag::Eof => return false,
                    _ => {}
                }
                i += 1;
            }
        }
        let next = self.tag_at(i);
        next == TokenTag::Identifier || next.is_storage_location()
    }

    /// Lookahead for `(uint a, uint b) = ...` destructuring declarations.
    fn looks_like_tuple_decl(&self) -> bool {
        let next = self.peek_tag();
        next.is_elementary_type() || next == TokenTag::Mapping || next == TokenTag::Comma
    }

    /// `Type [location] name [= init] ;`
    pub fn parse_variable_decl_statement(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.token_index();
        let decl = self.parse_local_variable_decl()?;
        let init = if self.eat(TokenTag::Eq).is_some() {
            self.parse_expression()?
        } else {
            0
        };
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::VariableDeclStatement,
            main_token,
            data: NodeData {
                lhs: decl,
                rhs: init,
            },
        }))
    }

    /// Local declarations require a name, unlike parameters.
    fn parse_local_variable_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let decl = self.parse_variable_decl()?;
        if self.node_main_token(decl) == 0 {
            return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
        }
        Ok(decl)
    }

    /// `(uint a, , address c) = expr ;`
    fn parse_tuple_decl_statement(&mut self) -> Result<NodeIndex, ParsingError> {
        let lparen = self.expect(TokenTag::LParen)?;
        let mark = self.scratch_mark();

        loop {
            if self.check(TokenTag::RParen) {
                break;
            }
            if self.check(TokenTag::Comma) {
                // Elided slot.
                self.scratch_push(0);
                self.advance();
                continue;
            }
            let decl = self.parse_local_variable_decl().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(decl);
            if self.eat(TokenTag::Comma).is_none() {
                break;
            }
            if self.check(TokenTag::RParen) {
                // `(uint a,)` keeps a trailing elided slot.
                self.scratch_push(0);
            }
        }
        if let Err(e) = self.expect(TokenTag::RParen) {
            self.scratch_truncate(mark);
            return Err(e);
        }
        let (start, end) = self.commit_scratch(mark);
        let tuple = self.add_node(Node {
            tag: NodeTag::TupleInit,
            main_token: lparen,
            data: NodeData {
                lhs: start,
                rhs: end,
            },
        });

        self.expect(TokenTag::Eq)?;
        let init = self.parse_expression()?;
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::VariableDeclStatement,
            main_token: lparen,
            data: NodeData {
                lhs: tuple,
                rhs: init,
            },
        }))
    }

    /// `if (cond) body [else body]`
    pub fn parse_if(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::If)?;
        self.expect(TokenTag::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        let then_body = self.parse_statement()?;

        if self.eat(TokenTag::Else).is_none() {
            return Ok(self.add_node(Node {
                tag: NodeTag::IfSimple,
                main_token,
                data: NodeData {
                    lhs: cond,
                    rhs: then_body,
                },
            }));
        }
        let else_body = self.parse_statement()?;
        let branches = self.add_extra(&IfBranches {
            then_body,
            else_body,
        });
        Ok(self.add_node(Node {
            tag: NodeTag::If,
            main_token,
            data: NodeData {
                lhs: cond,
                rhs: branches,
            },
        }))
    }

    /// `for (init; cond; step) body` — each header slot may be empty.
    pub fn parse_for(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::For)?;
        self.expect(TokenTag::LParen)?;

        let init = if self.eat(TokenTag::Semicolon).is_some() {
            0
        } else {
            // The init statement consumes its own semicolon.
            self.parse_for_init()?
        };
        let cond = if self.check(TokenTag::Semicolon) {
            self.advance();
            0
        } else {
            let cond = self.parse_expression()?;
            self.expect_semicolon()?;
            cond
        };
        let step = if self.check(TokenTag::RParen) {
            0
        } else {
            self.parse_expression()?
        };
        self.expect(TokenTag::RParen)?;
        let body = self.parse_statement()?;

        let header = self.add_extra(&ForHeader { init, cond, step });
        Ok(self.add_node(Node {
            tag: NodeTag::For,
            main_token,
            data: NodeData {
                lhs: header,
                rhs: body,
            },
        }))
    }

    fn parse_for_init(&mut self) -> Result<NodeIndex, ParsingError> {
        match self.current_tag() {
            tag if tag.is_elementary_type() || tag == TokenTag::Mapping => {
                self.parse_variable_decl_statement()
            }
            TokenTag::Identifier if self.looks_like_variable_decl() => {
                self.parse_variable_decl_statement()
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon()?;
                Ok(expr)
            }
        }
    }

    /// `while (cond) body`
    pub fn parse_while(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::While)?;
        self.expect(TokenTag::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        let body = self.parse_statement()?;
        Ok(self.add_node(Node {
            tag: NodeTag::While,
            main_token,
            data: NodeData {
                lhs: cond,
                rhs: body,
            },
        }))
    }

    /// `do body while (cond) ;`
    pub fn parse_do_while(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Do)?;
        let body = self.parse_statement()?;
        self.expect(TokenTag::While)?;
        self.expect(TokenTag::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenTag::RParen)?;
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::DoWhile,
            main_token,
            data: NodeData {
                lhs: body,
                rhs: cond,
            },
        }))
    }

    /// `try expr [returns (params)] block catch-clause+`
    pub fn parse_try(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Try)?;
        let expr = self.parse_expression()?;

        let (returns_start, returns_end) = if self.eat(TokenTag::Returns).is_some() {
            self.expect(TokenTag::LParen)?;
            let mark = self.scratch_mark();
            let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
            if let Err(e) = result {
                self.scratch_truncate(mark);
                return Err(e);
            }
            if let Err(e) = self.expect(TokenTag::RParen) {
                self.scratch_truncate(mark);
                return Err(e);
            }
            self.commit_scratch(mark)
        } else {
            (0, 0)
        };

        let block = self.parse_block()?;

        let mark = self.scratch_mark();
        while self.check(TokenTag::Catch) {
            let clause = self.parse_catch_clause().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(clause);
        }
        if self.scratch_len(mark) == 0 {
            self.scratch_truncate(mark);
            return Err(self.fail(ParseErrorTag::ExpectedToken(TokenTag::Catch)));
        }
        let (catches_start, catches_end) = self.commit_scratch(mark);

        let header = self.add_extra(&TryHeader {
            expr,
            returns_start,
            returns_end,
            block,
        });
        let clauses = self.add_extra(&SubRange {
            start: catches_start,
            end: catches_end,
        });
        Ok(self.add_node(Node {
            tag: NodeTag::TryStatement,
            main_token,
            data: NodeData {
                lhs: header,
                rhs: clauses,
            },
        }))
    }

    /// `catch [Error|Panic|ident] [( params )] block`
    fn parse_catch_clause(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Catch)?;
        // Optional clause identifier; it is `main_token + 1` when present.
        self.eat(TokenTag::Identifier);

        let params = if self.eat(TokenTag::LParen).is_some() {
            let mark = self.scratch_mark();
            let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
            if let Err(e) = result {
                self.scratch_truncate(mark);
                return Err(e);
            }
            if let Err(e) = self.expect(TokenTag::RParen) {
                self.scratch_truncate(mark);
                return Err(e);
            }
            let (start, end) = self.commit_scratch(mark);
            self.add_extra(&SubRange { start, end })
        } else {
            0
        };

        let block = self.parse_block()?;
        Ok(self.add_node(Node {
            tag: NodeTag::CatchClause,
            main_token,
            data: NodeData {
                lhs: params,
                rhs: block,
            },
        }))
    }

    /// `assembly { ... }` — the body is opaque. The node stores the brace
    /// token indices and the formatter re-emits the raw source slice.
    pub fn parse_assembly(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Assembly)?;
        // Optional dialect string, e.g. `assembly "evmasm"`.
        self.eat(TokenTag::StringLiteral);
        let lbrace = self.expect(TokenTag::LBrace)?;

        let mut depth = 1u32;
        let mut rbrace = lbrace;
        while depth > 0 {
            if self.is_at_end() {
                self.error_at(ParseErrorTag::UnbalancedDelimiter, lbrace);
                return Err(ParsingError);
            }
            let token = self.advance();
            match self.tag_at(token) {
                TokenTag::LBrace => depth += 1,
                TokenTag::RBrace => {
                    depth -= 1;
                    rbrace = token;
                }
                _ => {}
            }
        }

        Ok(self.add_node(Node {
            tag: NodeTag::AssemblyDecl,
            main_token,
            data: NodeData {
                lhs: lbrace,
                rhs: rbrace,
            },
        }))
    }
}
