//! Contract-kind declarations and their body elements.

use sol_ast::{
    Node, NodeData, NodeIndex, NodeTag, ParseErrorTag, ParsingError, SubRange, TokenTag,
};

use crate::recovery::MEMBER_BOUNDARY;
use crate::Parser;

impl Parser<'_> {
    /// `[abstract] contract C [is A, B(1)] { ... }` and the interface and
    /// library forms. `main_token` is the introducing keyword (`abstract`
    /// for abstract contracts).
    pub fn parse_contract_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.token_index();
        if self.eat(TokenTag::Abstract).is_some() {
            self.expect(TokenTag::Contract)?;
        } else {
            match self.current_tag() {
                TokenTag::Contract | TokenTag::Interface | TokenTag::Library => {
                    self.advance();
                }
                _ => return Err(self.fail(ParseErrorTag::ExpectedDeclaration)),
            }
        }
        self.expect(TokenTag::Identifier)?;

        let mark = self.scratch_mark();
        if self.eat(TokenTag::Is).is_some() {
            loop {
                let base = self.parse_inheritance_specifier().map_err(|e| {
                    self.scratch_truncate(mark);
                    e
                })?;
                self.scratch_push(base);
                if self.eat(TokenTag::Comma).is_none() {
                    break;
                }
            }
        }

        let bases = self.scratch_len(mark);
        // Build the base payload before the body so extra-data commits
        // stay properly nested.
        let (tag, lhs) = match bases {
            0 => {
                self.scratch_truncate(mark);
                (NodeTag::ContractDecl, 0)
            }
            1 => {
                let base = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                (NodeTag::ContractDeclInheritanceOne, base)
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                (
                    NodeTag::ContractDeclInheritance,
                    self.add_extra(&SubRange { start, end }),
                )
            }
        };

        let body = self.parse_contract_block()?;
        Ok(self.add_node(Node {
            tag,
            main_token,
            data: NodeData { lhs, rhs: body },
        }))
    }

    /// A base in an inheritance list: a path, optionally with constructor
    /// arguments (`Base(1, 2)`).
    fn parse_inheritance_specifier(&mut self) -> Result<NodeIndex, ParsingError> {
        let path = self.parse_identifier_path()?;
        if self.check(TokenTag::LParen) {
            return self.parse_call_arguments(path);
        }
        Ok(path)
    }

    /// `{ member* }` — members recover independently at
    /// [`MEMBER_BOUNDARY`], so one bad member leaves its siblings intact.
    pub fn parse_contract_block(&mut self) -> Result<NodeIndex, ParsingError> {
        let lbrace = self.expect(TokenTag::LBrace)?;
        let mark = self.scratch_mark();

        while !self.check(TokenTag::RBrace) && !self.is_at_end() {
            let before = self.token_index();
            let checkpoint = self.scratch_mark();
            match self.parse_contract_body_element() {
                Ok(node) => self.scratch_push(node),
                Err(ParsingError) => {
                    self.scratch_truncate(checkpoint);
                    self.synchronize(MEMBER_BOUNDARY);
                    self.eat(TokenTag::Semicolon);
                }
            }
            if self.token_index() == before && !self.is_at_end() && !self.check(TokenTag::RBrace)
            {
                self.advance();
            }
        }
        if self.eat(TokenTag::RBrace).is_none() {
            self.error_at(ParseErrorTag::UnbalancedDelimiter, lbrace);
        }

        let node = match self.scratch_len(mark) {
            0 => Node {
                tag: NodeTag::ContractBlockTwo,
                main_token: lbrace,
                data: NodeData::default(),
            },
            1 => {
                let member = self.scratch_since(mark)[0];
                Node {
                    tag: NodeTag::ContractBlockTwo,
                    main_token: lbrace,
                    data: NodeData {
                        lhs: member,
                        rhs: 0,
                    },
                }
            }
            2 => {
                let members = [self.scratch_since(mark)[0], self.scratch_since(mark)[1]];
                Node {
                    tag: NodeTag::ContractBlockTwo,
                    main_token: lbrace,
                    data: NodeData {
                        lhs: members[0],
                        rhs: members[1],
                    },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::ContractBlock,
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

    /// One contract body element, dispatched on the leading token.
    pub fn parse_contract_body_element(&mut self) -> Result<NodeIndex, ParsingError> {
        match self.current_tag() {
            // `function (` introduces a function-typed state variable, not
            // a function definition.
            TokenTag::Function if self.peek_tag() == TokenTag::LParen => {
                self.parse_state_variable_decl()
            }
            TokenTag::Function
            | TokenTag::Constructor
            | TokenTag::Fallback
            | TokenTag::Receive => self.parse_function(),
            TokenTag::Modifier => self.parse_modifier(),
            TokenTag::Event => self.parse_event(),
            TokenTag::Error => self.parse_error_proto(),
            TokenTag::Struct => self.parse_struct(),
            TokenTag::Enum => self.parse_enum(),
            TokenTag::Using => self.parse_using_directive(),
            TokenTag::Invalid => Err(self.fail(ParseErrorTag::InvalidToken)),
            tag if tag.is_elementary_type()
                || tag == TokenTag::Identifier
                || tag == TokenTag::Mapping =>
            {
                self.parse_state_variable_decl()
            }
            _ => Err(self.fail(ParseErrorTag::ExpectedContractMember)),
        }
    }

    /// `Type [visibility|mutability|override]* name [= init] ;`
    ///
    /// The qualifier keywords are not stored in the node — they sit between
    /// the type's last token and the name token, where the formatter
    /// re-reads them.
    pub fn parse_state_variable_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let ty = self.parse_type_expression()?;

        loop {
            match self.current_tag() {
                TokenTag::Public
                | TokenTag::Private
                | TokenTag::Internal
                | TokenTag::Constant
                | TokenTag::Immutable
                | TokenTag::Override => {
                    self.advance();
                }
                tag if tag.is_storage_location() => {
                    // Storage locations are for parameters and locals, not
                    // state variables. Record and skip.
                    let token = self.token_index();
                    self.error_at(ParseErrorTag::DisallowedStorageLocation, token);
                    self.advance();
                }
                _ => break,
            }
        }

        let name = self.expect(TokenTag::Identifier)?;
        let init = if self.eat(TokenTag::Eq).is_some() {
            self.parse_expression()?
        } else {
            0
        };
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::StateVariableDecl,
            main_token: name,
            data: NodeData { lhs: ty, rhs: init },
        }))
    }

    /// `struct S { (Type name ;)+ }`
    pub fn parse_struct(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Struct)?;
        self.expect(TokenTag::Identifier)?;
        self.expect(TokenTag::LBrace)?;

        let mark = self.scratch_mark();
        while !self.check(TokenTag::RBrace) && !self.is_at_end() {
            let before = self.token_index();
            let checkpoint = self.scratch_mark();
            match self.parse_struct_field() {
                Ok(field) => self.scratch_push(field),
                Err(ParsingError) => {
                    self.scratch_truncate(checkpoint);
                    self.synchronize(
                        crate::TokenSet::new()
                            .with(TokenTag::Semicolon)
                            .with(TokenTag::RBrace),
                    );
                    self.eat(TokenTag::Semicolon);
                }
            }
            if self.token_index() == before && !self.check(TokenTag::RBrace) && !self.is_at_end()
            {
                self.advance();
            }
        }
        if self.eat(TokenTag::RBrace).is_none() {
            self.error_at(ParseErrorTag::UnbalancedDelimiter, main_token);
        }

        let node = if self.scratch_len(mark) == 1 {
            let field = self.scratch_since(mark)[0];
            self.scratch_truncate(mark);
            Node {
                tag: NodeTag::StructDeclOne,
                main_token,
                data: NodeData { lhs: 0, rhs: field },
            }
        } else {
            let (start, end) = self.commit_scratch(mark);
            Node {
                tag: NodeTag::StructDecl,
                main_token,
                data: NodeData {
                    lhs: start,
                    rhs: end,
                },
            }
        };
        Ok(self.add_node(node))
    }

    fn parse_struct_field(&mut self) -> Result<NodeIndex, ParsingError> {
        let ty = self.parse_type_expression()?;
        if self.current_tag().is_storage_location() {
            let token = self.token_index();
            self.error_at(ParseErrorTag::DisallowedStorageLocation, token);
            self.advance();
        }
        let name = self.expect(TokenTag::Identifier)?;
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::StructField,
            main_token: name,
            data: NodeData { lhs: ty, rhs: 0 },
        }))
    }

    /// `enum E { a, b }`
    ///
    /// A trailing comma before `}` is a parse error — enum member lists are
    /// fixed-arity comma lists.
    pub fn parse_enum(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Enum)?;
        if !self.check(TokenTag::Identifier) {
            return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
        }
        self.advance();
        self.expect(TokenTag::LBrace)?;

        let mark = self.scratch_mark();
        loop {
            if self.check(TokenTag::RBrace) || self.is_at_end() {
                break;
            }
            if !self.check(TokenTag::Identifier) {
                self.scratch_truncate(mark);
                return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
            }
            let name = self.advance();
            let member = self.add_node(Node {
                tag: NodeTag::Identifier,
                main_token: name,
                data: NodeData::default(),
            });
            self.scratch_push(member);

            let Some(comma) = self.eat(TokenTag::Comma) else {
                break;
            };
            if self.check(TokenTag::RBrace) {
                self.scratch_truncate(mark);
                self.error_at(ParseErrorTag::TrailingComma, comma);
                return Err(ParsingError);
            }
        }
        self.expect(TokenTag::RBrace)?;

        let node = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
            }
            1 => {
                let member = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::EnumDeclOne,
                    main_token,
                    data: NodeData {
                        lhs: 0,
                        rhs: member,
                    },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::EnumDecl,
                    main_token,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        Ok(self.add_node(node))
    }

    /// `error E(Type [name], ...);`
    pub fn parse_error_proto(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Error)?;
        self.expect(TokenTag::Identifier)?;
        self.expect(TokenTag::LParen)?;

        let mark = self.scratch_mark();
        let result =
            self.parse_proto_parameter_list(|parser| parser.parse_error_variable_decl());
        if let Err(e) = result {
            self.scratch_truncate(mark);
            return Err(e);
        }
        self.expect(TokenTag::RParen)?;
        self.expect_semicolon()?;

        let node = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ErrorProtoSimple,
                    main_token,
                    data: NodeData::default(),
                }
            }
            1 => {
                let param = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::ErrorProtoOne,
                    main_token,
                    data: NodeData { lhs: 0, rhs: param },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::ErrorProtoMulti,
                    main_token,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        Ok(self.add_node(node))
    }

    fn parse_error_variable_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let ty = self.parse_type_expression()?;
        if self.current_tag().is_storage_location() {
            let token = self.token_index();
            self.error_at(ParseErrorTag::DisallowedStorageLocation, token);
            self.advance();
        }
        let name = self.eat(TokenTag::Identifier).unwrap_or(0);
        Ok(self.add_node(Node {
            tag: NodeTag::ErrorVariableDecl,
            main_token: name,
            data: NodeData { lhs: ty, rhs: 0 },
        }))
    }

    /// `event E(Type [indexed] [name], ...) [anonymous];`
    pub fn parse_event(&mut self) -> Result<NodeIndex, ParsingError> {
        let main_token = self.expect(TokenTag::Event)?;
        self.expect(TokenTag::Identifier)?;
        self.expect(TokenTag::LParen)?;

        let mark = self.scratch_mark();
        let result =
            self.parse_proto_parameter_list(|parser| parser.parse_event_variable_decl());
        if let Err(e) = result {
            self.scratch_truncate(mark);
            return Err(e);
        }
        self.expect(TokenTag::RParen)?;
        // `anonymous` is re-read from the token stream by consumers.
        self.eat(TokenTag::Anonymous);
        self.expect_semicolon()?;

        let node = match self.scratch_len(mark) {
            0 => {
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::EventProtoSimple,
                    main_token,
                    data: NodeData::default(),
                }
            }
            1 => {
                let param = self.scratch_since(mark)[0];
                self.scratch_truncate(mark);
                Node {
                    tag: NodeTag::EventProtoOne,
                    main_token,
                    data: NodeData { lhs: 0, rhs: param },
                }
            }
            _ => {
                let (start, end) = self.commit_scratch(mark);
                Node {
                    tag: NodeTag::EventProtoMulti,
                    main_token,
                    data: NodeData {
                        lhs: start,
                        rhs: end,
                    },
                }
            }
        };
        Ok(self.add_node(node))
    }

    fn parse_event_variable_decl(&mut self) -> Result<NodeIndex, ParsingError> {
        let ty = self.parse_type_expression()?;
        if self.current_tag().is_storage_location() {
            let token = self.token_index();
            self.error_at(ParseErrorTag::DisallowedStorageLocation, token);
            self.advance();
        }
        let indexed = self.eat(TokenTag::Indexed).unwrap_or(0);
        let name = self.eat(TokenTag::Identifier).unwrap_or(0);
        Ok(self.add_node(Node {
            tag: NodeTag::EventVariableDecl,
            main_token: name,
            data: NodeData {
                lhs: ty,
                rhs: indexed,
            },
        }))
    }

    /// Comma-separated parameters up to (not including) `)`, with the
    /// trailing-comma check shared by error and event prototypes.
    pub(crate) fn parse_proto_parameter_list(
        &mut self,
        mut parse_param: impl FnMut(&mut Self) -> Result<NodeIndex, ParsingError>,
    ) -> Result<(), ParsingError> {
        loop {
            if self.check(TokenTag::RParen) || self.is_at_end() {
                return Ok(());
            }
            let param = parse_param(self)?;
            self.scratch_push(param);
            let Some(comma) = self.eat(TokenTag::Comma) else {
                return Ok(());
            };
            if self.check(TokenTag::RParen) {
                self.error_at(ParseErrorTag::TrailingComma, comma);
                return Err(ParsingError);
            }
        }
    }
}
