//! Expression parsing.
//!
//! Binary operators use precedence climbing over a fixed precedence table;
//! ternary and assignment are lowest-precedence trailing productions; call,
//! call options, indexing, member access and postfix `++`/`--` are a
//! postfix loop over the primary expression.

use sol_ast::{
    Node, NodeData, NodeIndex, NodeTag, ParseErrorTag, ParsingError, SubRange, TernaryBranches,
    TokenTag,
};

use crate::Parser;

/// Binding power and associativity of a binary operator.
///
/// Exponentiation is the only right-associative binary operator.
fn binary_precedence(tag: TokenTag) -> Option<(u8, bool)> {
    let (prec, right_assoc) = match tag {
        TokenTag::StarStar => (11, true),
        TokenTag::Star | TokenTag::Slash | TokenTag::Percent => (10, false),
        TokenTag::Plus | TokenTag::Minus => (9, false),
        TokenTag::Shl | TokenTag::Shr => (8, false),
        TokenTag::Amp => (7, false),
        TokenTag::Caret => (6, false),
        TokenTag::Pipe => (5, false),
        TokenTag::Lt | TokenTag::Gt | TokenTag::LtEq | TokenTag::GtEq => (4, false),
        TokenTag::EqEq | TokenTag::NotEq => (3, false),
        TokenTag::AmpAmp => (2, false),
        TokenTag::PipePipe => (1, false),
        _ => return None,
    };
    Some((prec, right_assoc))
}

fn binary_node_tag(tag: TokenTag) -> NodeTag {
    match tag {
        TokenTag::StarStar => NodeTag::Exponent,
        TokenTag::Star => NodeTag::Mul,
        TokenTag::Slash => NodeTag::Div,
        TokenTag::Percent => NodeTag::Mod,
        TokenTag::Plus => NodeTag::Add,
        TokenTag::Minus => NodeTag::Sub,
        TokenTag::Shl => NodeTag::Shl,
        TokenTag::Shr => NodeTag::Shr,
        TokenTag::Amp => NodeTag::BitAnd,
        TokenTag::Caret => NodeTag::BitXor,
        TokenTag::Pipe => NodeTag::BitOr,
        TokenTag::Lt => NodeTag::LessThan,
        TokenTag::Gt => NodeTag::GreaterThan,
        TokenTag::LtEq => NodeTag::LessOrEqual,
        TokenTag::GtEq => NodeTag::GreaterOrEqual,
        TokenTag::EqEq => NodeTag::EqualEqual,
        TokenTag::NotEq => NodeTag::BangEqual,
        TokenTag::AmpAmp => NodeTag::LogicalAnd,
        TokenTag::PipePipe => NodeTag::LogicalOr,
        _ => unreachable!("not a binary operator: {tag:?}"),
    }
}

fn assignment_node_tag(tag: TokenTag) -> Option<NodeTag> {
    Some(match tag {
        TokenTag::Eq => NodeTag::Assign,
        TokenTag::PlusEq => NodeTag::AssignAdd,
        TokenTag::MinusEq => NodeTag::AssignSub,
        TokenTag::StarEq => NodeTag::AssignMul,
        TokenTag::SlashEq => NodeTag::AssignDiv,
        TokenTag::PercentEq => NodeTag::AssignMod,
        TokenTag::AmpEq => NodeTag::AssignBitAnd,
        TokenTag::PipeEq => NodeTag::AssignBitOr,
        TokenTag::CaretEq => NodeTag::AssignBitXor,
        TokenTag::ShlEq => NodeTag::AssignShl,
        TokenTag::ShrEq => NodeTag::AssignShr,
        _ => return None,
    })
}

/// Unit denominations recognized after a number literal. Lexically these
/// are ordinary identifiers; the pairing happens here.
fn is_denomination(text: &str) -> bool {
    matches!(
        text,
        "wei" | "gwei" | "ether" | "seconds" | "minutes" | "hours" | "days" | "weeks" | "years"
    )
}

impl Parser<'_> {
    /// Full expression: ternary/binary core plus right-associative
    /// assignment.
    pub fn parse_expression(&mut self) -> Result<NodeIndex, ParsingError> {
        let expr = self.parse_ternary()?;
        if let Some(tag) = assignment_node_tag(self.current_tag()) {
            let op = self.advance();
            let value = self.parse_expression()?;
            return Ok(self.add_node(Node {
                tag,
                main_token: op,
                data: NodeData {
                    lhs: expr,
                    rhs: value,
                },
            }));
        }
        Ok(expr)
    }

    fn parse_ternary(&mut self) -> Result<NodeIndex, ParsingError> {
        let cond = self.parse_binary_expression(0)?;
        let Some(question) = self.eat(TokenTag::Question) else {
            return Ok(cond);
        };
        let then_expr = self.parse_expression()?;
        self.expect(TokenTag::Colon)?;
        let else_expr = self.parse_expression()?;
        let branches = self.add_extra(&TernaryBranches {
            then_expr,
            else_expr,
        });
        Ok(self.add_node(Node {
            tag: NodeTag::Conditional,
            main_token: question,
            data: NodeData {
                lhs: cond,
                rhs: branches,
            },
        }))
    }

    /// Precedence climbing: consume operators binding at least as tightly
    /// as `min_prec`, recursing with a raised minimum for left-associative
    /// operators.
    pub(crate) fn parse_binary_expression(
        &mut self,
        min_prec: u8,
    ) -> Result<NodeIndex, ParsingError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some((prec, right_assoc)) = binary_precedence(self.current_tag()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let op = self.advance();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let rhs = self.parse_binary_expression(next_min)?;
            lhs = self.add_node(Node {
                tag: binary_node_tag(self.tag_at(op)),
                main_token: op,
                data: NodeData { lhs, rhs },
            });
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<NodeIndex, ParsingError> {
        let tag = match self.current_tag() {
            TokenTag::Minus => NodeTag::Negation,
            TokenTag::Bang => NodeTag::LogicalNot,
            TokenTag::Tilde => NodeTag::BitNot,
            TokenTag::PlusPlus => NodeTag::Increment,
            TokenTag::MinusMinus => NodeTag::Decrement,
            TokenTag::Delete => NodeTag::Delete,
            TokenTag::New => {
                let main_token = self.advance();
                let ty = self.parse_type_expression()?;
                let new = self.add_node(Node {
                    tag: NodeTag::New,
                    main_token,
                    data: NodeData { lhs: ty, rhs: 0 },
                });
                // The allocation call attaches as a postfix.
                return self.parse_postfix_operators(new);
            }
            _ => return self.parse_postfix(),
        };
        let main_token = self.advance();
        let operand = self.parse_unary()?;
        Ok(self.add_node(Node {
            tag,
            main_token,
            data: NodeData {
                lhs: operand,
                rhs: 0,
            },
        }))
    }

    fn parse_postfix(&mut self) -> Result<NodeIndex, ParsingError> {
        let primary = self.parse_primary()?;
        self.parse_postfix_operators(primary)
    }

    fn parse_postfix_operators(&mut self, primary: NodeIndex) -> Result<NodeIndex, ParsingError> {
        let mut expr = primary;
        loop {
            expr = match self.current_tag() {
                TokenTag::LParen => self.parse_call_arguments(expr)?,
                TokenTag::LBracket => {
                    let lbracket = self.advance();
                    let index = if self.check(TokenTag::RBracket) {
                        0
                    } else {
                        self.parse_expression()?
                    };
                    self.expect(TokenTag::RBracket)?;
                    self.add_node(Node {
                        tag: NodeTag::ArrayAccess,
                        main_token: lbracket,
                        data: NodeData {
                            lhs: expr,
                            rhs: index,
                        },
                    })
                }
                TokenTag::Dot => {
                    let dot = self.advance();
                    let member = self.expect(TokenTag::Identifier)?;
                    self.add_node(Node {
                        tag: NodeTag::FieldAccess,
                        main_token: dot,
                        data: NodeData {
                            lhs: expr,
                            rhs: member,
                        },
                    })
                }
                // `f{value: v}` call options. Guarded so a block following
                // an expression statement is never swallowed.
                TokenTag::LBrace
                    if self.peek_tag() == TokenTag::Identifier
                        && self.cursor_peek2() == TokenTag::Colon =>
                {
                    let lbrace = self.advance();
                    let (start, end) = self.parse_field_init_list()?;
                    let fields = self.add_extra(&SubRange { start, end });
                    self.add_node(Node {
                        tag: NodeTag::CallOptions,
                        main_token: lbrace,
                        data: NodeData {
                            lhs: expr,
                            rhs: fields,
                        },
                    })
                }
                TokenTag::PlusPlus => {
                    let op = self.advance();
                    self.add_node(Node {
                        tag: NodeTag::IncrementPostfix,
                        main_token: op,
                        data: NodeData { lhs: expr, rhs: 0 },
                    })
                }
                TokenTag::MinusMinus => {
                    let op = self.advance();
                    self.add_node(Node {
                        tag: NodeTag::DecrementPostfix,
                        main_token: op,
                        data: NodeData { lhs: expr, rhs: 0 },
                    })
                }
                _ => return Ok(expr),
            };
        }
    }

    /// `( args )` attached to a callee. 0/1 arguments stay inline in the
    /// node; more go through extra data.
    pub(crate) fn parse_call_arguments(
        &mut self,
        callee: NodeIndex,
    ) -> Result<NodeIndex, ParsingError> {
        let lparen = self.expect(TokenTag::LParen)?;
        let mark = self.scratch_mark();
        loop {
            if self.check(TokenTag::RParen) || self.is_at_end() {
                break;
            }
            let arg = self.parse_expression().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(arg);
            let Some(comma) = self.eat(TokenTag::Comma) else {
                break;
            };
            if self.check(TokenTag::RParen) {
                self.scratch_truncate(mark);
                self.error_at(ParseErrorTag::TrailingComma, comma);
                return Err(ParsingError);
            }
        }
        if let Err(e) = self.expect(TokenTag::RParen) {
            self.scratch_truncate(mark);
            return Err(e);
        }

        let node = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::CallOne,
                    main_token: lparen,
                    data: NodeData {
                        lhs: callee,
                        rhs: 0,
                    },
                }
            }
            1 => {
                let arg = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::CallOne,
                    main_token: lparen,
                    data: NodeData {
                        lhs: callee,
                        rhs: arg,
                    },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                let args = self.add_extra(&SubRange { start, end });
                Node {
                    tag: NodeTag::Call,
                    main_token: lparen,
                    data: NodeData {
                        lhs: callee,
                        rhs: args,
                    },
                }
            }
        };
        Ok(self.add_node(node))
    }

    /// `name: expr, ...` up to the closing `}` (consumed).
    fn parse_field_init_list(&mut self) -> Result<(u32, u32), ParsingError> {
        let mark = self.scratch_mark();
        loop {
            if self.check(TokenTag::RBrace) || self.is_at_end() {
                break;
            }
            let name = match self.expect(TokenTag::Identifier) {
                Ok(name) => name,
                Err(e) => {
                    self.scratch_truncate(mark);
                    return Err(e);
                }
            };
            if let Err(e) = self.expect(TokenTag::Colon) {
                self.scratch_truncate(mark);
                return Err(e);
            }
            let value = self.parse_expression().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            let field = self.add_node(Node {
                tag: NodeTag::FieldInit,
                main_token: name,
                data: NodeData {
                    lhs: value,
                    rhs: 0,
                },
            });
            self.scratch_push(field);
            if self.eat(TokenTag::Comma).is_none() {
                break;
            }
        }
        if let Err(e) = self.expect(TokenTag::RBrace) {
            self.scratch_truncate(mark);
            return Err(e);
        }
        Ok(self.commit_scratch(mark))
    }

    fn parse_primary(&mut self) -> Result<NodeIndex, ParsingError> {
        match self.current_tag() {
            TokenTag::Identifier => {
                let token = self.advance();
                Ok(self.add_node(Node {
                    tag: NodeTag::Identifier,
                    main_token: token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::NumberLiteral | TokenTag::AddressLiteral => {
                let token = self.advance();
                // `10000 gwei` — keep the two-token shape as one node.
                if self.check(TokenTag::Identifier) {
                    let unit = self.token_index();
                    if is_denomination(self.token_text(unit)) {
                        self.advance();
                        return Ok(self.add_node(Node {
                            tag: NodeTag::NumberLiteralSubDenomination,
                            main_token: token,
                            data: NodeData { lhs: 0, rhs: unit },
                        }));
                    }
                }
                Ok(self.add_node(Node {
                    tag: NodeTag::NumberLiteral,
                    main_token: token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::StringLiteral | TokenTag::HexStringLiteral => {
                let token = self.advance();
                Ok(self.add_node(Node {
                    tag: NodeTag::StringLiteral,
                    main_token: token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::True | TokenTag::False => {
                let token = self.advance();
                Ok(self.add_node(Node {
                    tag: NodeTag::BoolLiteral,
                    main_token: token,
                    data: NodeData::default(),
                }))
            }
            // Elementary types appear in expressions as cast callees:
            // `uint256(x)`, `address(0)`, `payable(a)`.
            tag if tag.is_elementary_type() || tag == TokenTag::Payable => {
                let token = self.advance();
                Ok(self.add_node(Node {
                    tag: NodeTag::ElementaryType,
                    main_token: token,
                    data: NodeData::default(),
                }))
            }
            TokenTag::LParen => self.parse_tuple_or_group(),
            TokenTag::LBracket => self.parse_array_literal(),
            TokenTag::LBrace => self.parse_struct_literal(),
            TokenTag::Eof => Err(self.fail(ParseErrorTag::UnexpectedEof)),
            _ => Err(self.fail(ParseErrorTag::ExpectedExpression)),
        }
    }

    /// `(expr)` grouping or `(a, b)` / `(, a)` tuple.
    fn parse_tuple_or_group(&mut self) -> Result<NodeIndex, ParsingError> {
        let lparen = self.expect(TokenTag::LParen)?;
        let mark = self.scratch_mark();
        let mut elided = false;

        loop {
            if self.check(TokenTag::RParen) {
                break;
            }
            if self.check(TokenTag::Comma) {
                self.scratch_push(0);
                elided = true;
                self.advance();
                continue;
            }
            let item = self.parse_expression().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(item);
            if self.eat(TokenTag::Comma).is_none() {
                break;
            }
            if self.check(TokenTag::RParen) {
                self.scratch_push(0);
                elided = true;
            }
        }
        let rparen = match self.expect(TokenTag::RParen) {
            Ok(rparen) => rparen,
            Err(e) => {
                self.scratch_truncate(mark);
                return Err(e);
            }
        };

        if self.scratch_len(mark) == 1 && !elided {
            let inner = self.scratch_since(mark)[0];
            self.scratch_truncate(mark);
            return Ok(self.add_node(Node {
                tag: NodeTag::GroupedExpression,
                main_token: lparen,
                data: NodeData {
                    lhs: inner,
                    rhs: rparen,
                },
            }));
        }
        let (start, end) = self.commit_scratch(mark);
        Ok(self.add_node(Node {
            tag: NodeTag::TupleInit,
            main_token: lparen,
            data: NodeData {
                lhs: start,
                rhs: end,
            },
        }))
    }

    /// `[a, b]` array literal.
    fn parse_array_literal(&mut self) -> Result<NodeIndex, ParsingError> {
        let lbracket = self.expect(TokenTag::LBracket)?;
        let mark = self.scratch_mark();
        loop {
            if self.check(TokenTag::RBracket) || self.is_at_end() {
                break;
            }
            let item = self.parse_expression().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(item);
            if self.eat(TokenTag::Comma).is_none() {
                break;
            }
        }
        if let Err(e) = self.expect(TokenTag::RBracket) {
            self.scratch_truncate(mark);
            return Err(e);
        }

        let node = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ArrayInitOne,
                    main_token: lbracket,
                    data: NodeData::default(),
                }
            }
            1 => {
                let item = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ArrayInitOne,
                    main_token: lbracket,
                    data: NodeData { lhs: 0, rhs: item },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::ArrayInit,
                    main_token: lbracket,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        Ok(self.add_node(node))
    }

    /// `{a: 1, b: 2}` struct literal (named call arguments).
    fn parse_struct_literal(&mut self) -> Result<NodeIndex, ParsingError> {
        let lbrace = self.expect(TokenTag::LBrace)?;
        let (start, end) = self.parse_field_init_list()?;

        let node = match end - start {
            0 => Node {
                tag: NodeTag::StructInitOne,
                main_token: lbrace,
                data: NodeData::default(),
            },
            1 => {
                let field = self.extra_at(start);
                Node {
                    tag: NodeTag::StructInitOne,
                    main_token: lbrace,
                    data: NodeData { lhs: 0, rhs: field },
                }
            }
            _ => Node {
                tag: NodeTag::StructInit,
                main_token: lbrace,
                data: NodeData {
                    lhs: start,
                    rhs: end,
                },
            },
        };
        Ok(self.add_node(node))
    }

    /// Token two past the cursor, for the call-options guard.
    fn cursor_peek2(&self) -> TokenTag {
        self.tag_at(self.token_index() + 2)
    }
}
