//! Type expressions.
//!
//! Types get their own parsing path, separate from value expressions:
//! `T[]`, `T[N]` and `mapping(K => V)` are ambiguous with indexing and
//! calls without it.

use sol_ast::{
    FnProto, MappingTypes, Node, NodeData, NodeIndex, NodeTag, ParseErrorTag, ParsingError,
    TokenTag,
};

use crate::Parser;

impl Parser<'_> {
    /// A type: elementary, identifier path, mapping, or function type,
    /// with any number of array suffixes.
    pub fn parse_type_expression(&mut self) -> Result<NodeIndex, ParsingError> {
        let base = match self.current_tag() {
            tag if tag.is_elementary_type() => {
                let token = self.advance();
                self.add_node(Node {
                    tag: NodeTag::ElementaryType,
                    main_token: token,
                    data: NodeData::default(),
                })
            }
            // `payable` acts as an elementary type in type positions
            // (`address payable` is handled below).
            TokenTag::Payable => {
                let token = self.advance();
                self.add_node(Node {
                    tag: NodeTag::ElementaryType,
                    main_token: token,
                    data: NodeData::default(),
                })
            }
            // In type position the trailing name belongs to the enclosing
            // declaration, not the mapping.
            TokenTag::Mapping => self.parse_mapping_impl(false)?,
            TokenTag::Function => self.parse_function_type()?,
            TokenTag::Identifier => self.parse_identifier_path()?,
            _ => return Err(self.fail(ParseErrorTag::ExpectedTypeExpression)),
        };

        // `address payable` — the qualifier is re-read from the token
        // stream by the formatter, so only the cursor moves.
        if self.node_tag(base) == NodeTag::ElementaryType
            && self.tag_at(self.node_main_token(base)) == TokenTag::AddressType
        {
            self.eat(TokenTag::Payable);
        }

        self.parse_array_type_suffix(base)
    }

    /// Zero or more `[ ]` / `[ expr ]` suffixes.
    pub(crate) fn parse_array_type_suffix(
        &mut self,
        base: NodeIndex,
    ) -> Result<NodeIndex, ParsingError> {
        let mut ty = base;
        while self.check(TokenTag::LBracket) {
            let lbracket = self.advance();
            let size = if self.check(TokenTag::RBracket) {
                0
            } else {
                self.parse_expression()?
            };
            self.expect(TokenTag::RBracket)?;
            ty = self.add_node(Node {
                tag: NodeTag::ArrayType,
                main_token: lbracket,
                data: NodeData { lhs: ty, rhs: size },
            });
        }
        Ok(ty)
    }

    /// `a` or `a.b.c` as a chain of `FieldAccess` nodes.
    pub(crate) fn parse_identifier_path(&mut self) -> Result<NodeIndex, ParsingError> {
        let name = self.expect(TokenTag::Identifier)?;
        let mut path = self.add_node(Node {
            tag: NodeTag::Identifier,
            main_token: name,
            data: NodeData::default(),
        });
        while self.check(TokenTag::Dot) {
            let dot = self.advance();
            let member = self.expect(TokenTag::Identifier)?;
            path = self.add_node(Node {
                tag: NodeTag::FieldAccess,
                main_token: dot,
                data: NodeData {
                    lhs: path,
                    rhs: member,
                },
            });
        }
        Ok(path)
    }

    /// `mapping ( KeyType => ValueType ) [name]` as a standalone
    /// declaration.
    ///
    /// The value type may itself be a named mapping — that is how nested
    /// declarations like `mapping(uint => mapping(uint => int)foo)bar`
    /// attach `foo` to the inner node and `bar` to the outer one.
    pub fn parse_mapping(&mut self) -> Result<NodeIndex, ParsingError> {
        self.parse_mapping_impl(true)
    }

    /// `allow_name` controls trailing-name absorption: a mapping used as
    /// the type of a state variable or parameter must leave the following
    /// identifier for the enclosing declaration.
    pub(crate) fn parse_mapping_impl(
        &mut self,
        allow_name: bool,
    ) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Mapping)?;
        self.expect(TokenTag::LParen)?;

        let key = match self.current_tag() {
            tag if tag.is_elementary_type() => {
                let token = self.advance();
                self.add_node(Node {
                    tag: NodeTag::ElementaryType,
                    main_token: token,
                    data: NodeData::default(),
                })
            }
            TokenTag::Identifier => self.parse_identifier_path()?,
            _ => return Err(self.fail(ParseErrorTag::ExpectedTypeExpression)),
        };

        self.expect(TokenTag::FatArrow)?;

        if self.check(TokenTag::RParen) {
            return Err(self.fail(ParseErrorTag::ExpectedTypeExpression));
        }
        // A nested mapping value may carry its own trailing name inside
        // the parentheses.
        let value = if self.check(TokenTag::Mapping) {
            self.parse_mapping_impl(true)?
        } else {
            self.parse_type_expression()?
        };

        self.expect(TokenTag::RParen)?;
        let name = if allow_name {
            self.eat(TokenTag::Identifier).unwrap_or(0)
        } else {
            0
        };

        let types = self.add_extra(&MappingTypes { key, value });
        Ok(self.add_node(Node {
            tag: NodeTag::MappingDecl,
            main_token,
            data: NodeData {
                lhs: types,
                rhs: name,
            },
        }))
    }

    /// `function ( params ) [visibility|mutability]* [returns ( params )]`
    /// in a type position.
    pub fn parse_function_type(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Function)?;
        self.expect(TokenTag::LParen)?;

        let params_mark = self.scratch_mark();
        let result = self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
        if let Err(e) = result {
            self.scratch_truncate(params_mark);
            return Err(e);
        }
        self.expect(TokenTag::RParen)?;
        let (params_start, params_end) = self.commit_scratch(params_mark);

        let specs_mark = self.scratch_mark();
        loop {
            let tag = self.current_tag();
            if tag.is_visibility() || tag.is_mutability() {
                let token = self.advance();
                let spec = self.add_node(Node {
                    tag: NodeTag::Specifier,
                    main_token: token,
                    data: NodeData::default(),
                });
                self.scratch_push(spec);
            } else {
                break;
            }
        }
        let (specifiers_start, specifiers_end) = self.commit_scratch(specs_mark);

        let (returns_start, returns_end) = if self.eat(TokenTag::Returns).is_some() {
            self.expect(TokenTag::LParen)?;
            let returns_mark = self.scratch_mark();
            let result =
                self.parse_proto_parameter_list(|parser| parser.parse_variable_decl());
            if let Err(e) = result {
                self.scratch_truncate(returns_mark);
                return Err(e);
            }
            self.expect(TokenTag::RParen)?;
            self.commit_scratch(returns_mark)
        } else {
            (0, 0)
        };

        let proto = self.add_extra(&FnProto {
            specifiers_start,
            specifiers_end,
            params_start,
            params_end,
            returns_start,
            returns_end,
        });
        Ok(self.add_node(Node {
            tag: NodeTag::FunctionType,
            main_token,
            data: NodeData { lhs: proto, rhs: 0 },
        }))
    }
}
