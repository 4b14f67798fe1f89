//! Source-unit driver and top-level directives.

use sol_ast::{
    Node, NodeData, NodeIndex, NodeTag, ParseErrorTag, ParsingError, SubRange, TokenTag,
};

use crate::recovery::DECL_BOUNDARY;
use crate::Parser;

impl Parser<'_> {
    /// Parse a whole source unit and append the `Root` node last.
    ///
    /// Never fails: every declaration-level error is recorded and recovery
    /// resumes at the next declaration boundary.
    pub fn parse_source_unit(&mut self) {
        tracing::trace!("parse_source_unit");
        let mark = self.scratch_mark();

        while !self.is_at_end() {
            let before = self.token_index();
            let checkpoint = self.scratch_mark();
            match self.parse_top_level_declaration() {
                Ok(node) => {
                    if node != 0 {
                        self.scratch_push(node);
                    }
                }
                Err(ParsingError) => {
                    // Clean up anything a failed production left behind so
                    // it cannot leak into this list's commit.
                    self.scratch_truncate(checkpoint);
                    self.synchronize(DECL_BOUNDARY);
                    // A semicolon boundary belongs to the failed
                    // declaration; consume it so the loop resumes on the
                    // next one.
                    self.eat(TokenTag::Semicolon);
                }
            }
            // Guarantee progress even when a production failed without
            // consuming anything and recovery stopped immediately.
            if self.token_index() == before && !self.is_at_end() {
                self.advance();
            }
        }

        let (start, end) = self.commit_scratch(mark);
        self.add_node(Node {
            tag: NodeTag::Root,
            main_token: 0,
            data: NodeData {
                lhs: start,
                rhs: end,
            },
        });
    }

    /// One top-level declaration or directive.
    fn parse_top_level_declaration(&mut self) -> Result<NodeIndex, ParsingError> {
        match self.current_tag() {
            TokenTag::Pragma => self.parse_pragma_directive(),
            TokenTag::Import => self.parse_import_directive(),
            TokenTag::Using => self.parse_using_directive(),
            TokenTag::Abstract
            | TokenTag::Contract
            | TokenTag::Interface
            | TokenTag::Library => self.parse_contract_decl(),
            TokenTag::Struct => self.parse_struct(),
            TokenTag::Enum => self.parse_enum(),
            TokenTag::Error => self.parse_error_proto(),
            TokenTag::Event => self.parse_event(),
            TokenTag::Function => self.parse_function(),
            TokenTag::Mapping => {
                // Standalone mapping declaration (ABI-style source); the
                // trailing semicolon is optional for a bare fragment.
                let node = self.parse_mapping()?;
                self.eat(TokenTag::Semicolon);
                Ok(node)
            }
            TokenTag::Invalid => Err(self.fail(ParseErrorTag::InvalidToken)),
            _ => Err(self.fail(ParseErrorTag::ExpectedDeclaration)),
        }
    }

    /// `pragma <anything> ;`
    ///
    /// The body is stored as a raw token span and re-emitted verbatim by
    /// the formatter — version expressions are not a grammar this parser
    /// models.
    pub fn parse_pragma_directive(&mut self) -> Result<NodeIndex, ParsingError> {
        let pragma = self.expect(TokenTag::Pragma)?;
        if self.check(TokenTag::Semicolon) || self.is_at_end() {
            return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
        }
        let body_start = self.token_index();
        let mut body_end = body_start;
        while !self.check(TokenTag::Semicolon) && !self.is_at_end() {
            body_end = self.advance();
        }
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::PragmaDirective,
            main_token: pragma,
            data: NodeData {
                lhs: body_start,
                rhs: body_end,
            },
        }))
    }

    /// `import "p";` | `import "p" as a;` | `import * as a from "p";` |
    /// `import {a, b} from "p";`
    pub fn parse_import_directive(&mut self) -> Result<NodeIndex, ParsingError> {
        let import = self.expect(TokenTag::Import)?;

        let node = match self.current_tag() {
            TokenTag::StringLiteral => {
                let path = self.advance();
                if self.eat(TokenTag::As).is_some() {
                    let alias = self.expect(TokenTag::Identifier)?;
                    Node {
                        tag: NodeTag::ImportDirectivePathIdentifier,
                        main_token: import,
                        data: NodeData {
                            lhs: path,
                            rhs: alias,
                        },
                    }
                } else {
                    Node {
                        tag: NodeTag::ImportDirectivePath,
                        main_token: import,
                        data: NodeData { lhs: path, rhs: 0 },
                    }
                }
            }
            TokenTag::Star => {
                self.advance();
                self.expect(TokenTag::As)?;
                let alias = self.expect(TokenTag::Identifier)?;
                self.expect_contextual("from")?;
                let path = self.expect(TokenTag::StringLiteral)?;
                Node {
                    tag: NodeTag::ImportDirectiveAsterisk,
                    main_token: import,
                    data: NodeData {
                        lhs: alias,
                        rhs: path,
                    },
                }
            }
            TokenTag::LBrace => {
                self.advance();
                let mark = self.scratch_mark();
                loop {
                    if self.check(TokenTag::RBrace) {
                        break;
                    }
                    let Some(name) = self.eat(TokenTag::Identifier) else {
                        self.scratch_truncate(mark);
                        return Err(self.fail(ParseErrorTag::ExpectedIdentifier));
                    };
                    let symbol = self.add_node(Node {
                        tag: NodeTag::Identifier,
                        main_token: name,
                        data: NodeData::default(),
                    });
                    self.scratch_push(symbol);
                    if self.eat(TokenTag::Comma).is_none() {
                        break;
                    }
                }
                if self.expect(TokenTag::RBrace).is_err() {
                    self.scratch_truncate(mark);
                    return Err(ParsingError);
                }
                self.expect_contextual("from")
                    .and_then(|_| self.expect(TokenTag::StringLiteral))
                    .map(|path| {
                        let (start, end) = self.commit_scratch(mark);
                        Node {
                            tag: NodeTag::ImportDirectiveSymbol,
                            main_token: import,
                            data: NodeData {
                                lhs: self.add_extra(&SubRange { start, end }),
                                rhs: path,
                            },
                        }
                    })
                    .map_err(|e| {
                        self.scratch_truncate(mark);
                        e
                    })?
            }
            _ => return Err(self.fail(ParseErrorTag::ExpectedToken(TokenTag::StringLiteral))),
        };

        self.expect_semicolon()?;
        Ok(self.add_node(node))
    }

    /// `using A for B;` | `using A.B for *;`
    pub fn parse_using_directive(&mut self) -> Result<NodeIndex, ParsingError> {
        let using = self.expect(TokenTag::Using)?;
        let library = self.parse_identifier_path()?;
        self.expect(TokenTag::For)?;
        let target = if self.eat(TokenTag::Star).is_some() {
            0
        } else {
            self.parse_type_expression()?
        };
        self.expect_semicolon()?;
        Ok(self.add_node(Node {
            tag: NodeTag::UsingDirective,
            main_token: using,
            data: NodeData {
                lhs: library,
                rhs: target,
            },
        }))
    }
}
