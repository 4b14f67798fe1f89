//! Function-ish prototypes and declarations.
//!
//! The `_simple`/`_one`/`_multi` shapes classify the parameter list; any
//! prototype with a `returns (...)` clause takes the full `FunctionProto`
//! record instead. Specifiers (visibility, mutability, `virtual`,
//! `override(...)`, modifier invocations, base-constructor calls) are
//! parsed as nodes and referenced from the prototype's extra-data record —
//! a modifier invocation can be a full call expression, so a token scan
//! could not re-emit them.

use sol_ast::{
    FnProto, FnProtoAttrs, FnProtoMulti, Node, NodeData, NodeIndex, NodeTag, ParseErrorTag,
    ParsingError, TokenTag,
};

use crate::Parser;

impl Parser<'_> {
    /// `function name(...)`, `constructor(...)`, `fallback()`, `receive()`
    /// — prototype followed by either a body block or `;`.
    pub fn parse_function(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.token_index();
        match self.current_tag() {
            TokenTag::Function => {
                self.advance();
                // The name is always `main_token + 1`; it is not stored.
                self.expect(TokenTag::Identifier)?;
            }
            TokenTag::Constructor | TokenTag::Fallback | TokenTag::Receive => {
                self.advance();
            }
            _ => return Err(self.fail(ParseErrorTag::ExpectedDeclaration)),
        }

        let proto = self.parse_function_proto_tail(main_token)?;

        if self.check(TokenTag::LBrace) {
            let body = self.parse_block()?;
            Ok(self.add_node(Node {
                tag: NodeTag::FunctionDecl,
                main_token,
                data: NodeData {
                    lhs: proto,
                    rhs: body,
                },
            }))
        } else {
            self.expect_semicolon()?;
            Ok(proto)
        }
    }

    /// Everything after the name: `( params ) specifiers [returns (...)]`.
    fn parse_function_proto_tail(
        &mut self,
        main_token: sol_ast::TokenIndex,
    ) -> Result<NodeIndex, ParsingError> {
        self.expect(TokenTag::LParen)?;
        let params_mark = self.scratch_mark();
        let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
        if let Err(e) = result {
            self.scratch_truncate(params_mark);
            return Err(e);
        }
        if let Err(e) = self.expect(TokenTag::RParen) {
            self.scratch_truncate(params_mark);
            return Err(e);
        }

        // Specifier nodes collect above the still-open params mark; the
        // nested commit leaves the params untouched.
        let specs_mark = self.scratch_mark();
        loop {
            let spec = match self.current_tag() {
                tag if tag.is_visibility() || tag.is_mutability() || tag == TokenTag::Virtual => {
                    let token = self.advance();
                    self.add_node(Node {
                        tag: NodeTag::Specifier,
                        main_token: token,
                        data: NodeData::default(),
                    })
                }
                TokenTag::Override => self.parse_override_specifier()?,
                TokenTag::Identifier => {
                    // Modifier invocation or base-constructor call.
                    let path = self.parse_identifier_path()?;
                    if self.check(TokenTag::LParen) {
                        self.parse_call_arguments(path)?
                    } else {
                        path
                    }
                }
                _ => break,
            };
            self.scratch_push(spec);
        }
        let (specifiers_start, specifiers_end) = self.commit_scratch(specs_mark);

        let mut has_returns = false;
        let (returns_start, returns_end) = if self.eat(TokenTag::Returns).is_some() {
            has_returns = true;
            if let Err(e) = self.expect(TokenTag::LParen) {
                self.scratch_truncate(params_mark);
                return Err(e);
            }
            let returns_mark = self.scratch_mark();
            let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
            if let Err(e) = result {
                self.scratch_truncate(returns_mark);
                self.scratch_truncate(params_mark);
                return Err(e);
            }
            if let Err(e) = self.expect(TokenTag::RParen) {
                self.scratch_truncate(returns_mark);
                self.scratch_truncate(params_mark);
                return Err(e);
            }
            self.commit_scratch(returns_mark)
        } else {
            (0, 0)
        };

        let node = if has_returns {
            let (params_start, params_end) = self.commit_scratch(params_mark);
            let proto = self.add_extra(&FnProto {
                specifiers_start,
                specifiers_end,
                params_start,
                params_end,
                returns_start,
                returns_end,
            });
            Node {
                tag: NodeTag::FunctionProto,
                main_token,
                data: NodeData { lhs: proto, rhs: 0 },
            }
        } else {
            let attrs = if specifiers_start == specifiers_end {
                0
            } else {
                self.add_extra(&FnProtoAttrs {
                    specifiers_start,
                    specifiers_end,
                })
            };
            match self.scratch_len(params_mark) {
                0 => {
                    self.scratch_truncate(params_mark);
                    Node {
                        tag: NodeTag::FunctionProtoSimple,
                        main_token,
                        data: NodeData { lhs: attrs, rhs: 0 },
                    }
                }
                1 => {
                    let param = self.scratch_since(params_mark)[0];
                    self.scratch_truncate(params_mark);
                    Node {
                        tag: NodeTag::FunctionProtoOne,
                        main_token,
                        data: NodeData {
                            lhs: attrs,
                            rhs: param,
                        },
                    }
                }
                _ => {
                    let (params_start, params_end) = self.commit_scratch(params_mark);
                    let record = self.add_extra(&FnProtoMulti {
                        specifiers_start,
                        specifiers_end,
                        params_start,
                        params_end,
                    });
                    Node {
                        tag: NodeTag::FunctionProtoMulti,
                        main_token,
                        data: NodeData {
                            lhs: record,
                            rhs: 0,
                        },
                    }
                }
            }
        };
        Ok(self.add_node(node))
    }

    /// `override` or `override(A, B.C)`.
    fn parse_override_specifier(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Override)?;
        if self.eat(TokenTag::LParen).is_none() {
            return Ok(self.add_node(Node {
                tag: NodeTag::OverrideSpecifier,
                main_token,
                data: NodeData::default(),
            }));
        }

        let mark = self.scratch_mark();
        while !self.check(TokenTag::RParen) && !self.is_at_end() {
            let path = self.parse_identifier_path().map_err(|e| {
                self.scratch_truncate(mark);
                e
            })?;
            self.scratch_push(path);
            if self.eat(TokenTag::Comma).is_none() {
                break;
            }
        }
        if let Err(e) = self.expect(TokenTag::RParen) {
            self.scratch_truncate(mark);
            return Err(e);
        }
        let (start, end) = self.commit_scratch(mark);
        Ok(self.add_node(Node {
            tag: NodeTag::OverrideSpecifier,
            main_token,
            data: NodeData {
                lhs: start,
                rhs: end,
            },
        }))
    }

    /// One parameter or local declaration: `Type [location] [name]`.
    pub(crate) fn parse_variable_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let ty = self.parse_type_expression()?;
        let storage = match self.current_tag() {
            tag if tag.is_storage_location() => self.advance(),
            _ => 0,
        };
        let name = self.eat(TokenTag::Identifier).unwrap_or(0);
        Ok(self.add_node(Node {
            tag: NodeTag::VariableDecl,
            main_token: name,
            data: NodeData {
                lhs: ty,
                rhs: storage,
            },
        }))
    }

    /// `modifier m [( params )] [virtual|override] (block | ;)`
    pub fn parse_modifier(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Modifier)?;
        self.expect(TokenTag::Identifier)?;

        let mark = self.scratch_mark();
        if self.eat(TokenTag::LParen).is_some() {
            let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
            if let Err(e) = result {
                self.scratch_truncate(mark);
                return Err(e);
            }
            if let Err(e) = self.expect(TokenTag::RParen) {
                self.scratch_truncate(mark);
                return Err(e);
            }
        }

        // `virtual` / bare `override` are re-read from the token stream.
        while matches!(self.current_tag(), TokenTag::Virtual | TokenTag::Override) {
            self.advance();
        }

        let proto = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ModifierProtoSimple,
                    main_token,
                    data: NodeData::default(),
                }
            }
            1 => {
                let param = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ModifierProtoOne,
                    main_token,
                    data: NodeData { lhs: 0, rhs: param },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::ModifierProtoMulti,
                    main_token,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        let proto = self.add_node(proto);

        if self.check(TokenTag::LBrace) {
            let body = self.parse_block()?;
            Ok(self.add_node(Node {
                tag: NodeTag::ModifierDecl,
                main_token,
                data: NodeData {
                    lhs: proto,
                    rhs: body,
                },
            }))
        } else {
            self.expect_semicolon()?;
            Ok(proto)
        }
    }
}
