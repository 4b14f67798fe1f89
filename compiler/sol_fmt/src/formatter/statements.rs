//! Statement formatting.
//!
//! [`Formatter::format_statement`] is the exhaustive dispatch over every
//! node tag: statements render here, declarations and expressions are
//! routed to their own formatters (an expression in statement position
//! gets its terminating `;` here).

use sol_ast::{
    ForHeader, IfBranches, NodeIndex, NodeTag, SubRange, TokenTag, TryHeader,
};

use crate::emitter::Emitter;
use crate::formatter::Formatter;

impl<E: Emitter> Formatter<'_, E> {
    /// Format a node in statement position.
    pub fn format_statement(&mut self, node: NodeIndex) {
        let ast = self.ast();
        let data = ast.node_data(node);
        match ast.node_tag(node) {
            NodeTag::BlockTwo | NodeTag::Block => self.format_block(node),
            NodeTag::UncheckedBlock => {
                self.write("unchecked ");
                self.format_block(data.lhs);
            }
            NodeTag::VariableDeclStatement => {
                if ast.node_tag(data.lhs) == NodeTag::TupleInit {
                    self.format_decl_tuple(data.lhs);
                } else {
                    self.format_parameter(data.lhs);
                }
                if data.rhs != 0 {
                    self.write(" = ");
                    self.format_expression(data.rhs, 0);
                }
                self.write(";");
            }
            NodeTag::IfSimple => {
                self.write("if (");
                self.format_expression(data.lhs, 0);
                self.write(") ");
                self.format_statement(data.rhs);
            }
            NodeTag::If => {
                self.write("if (");
                self.format_expression(data.lhs, 0);
                self.write(") ");
                let branches: IfBranches = ast.extra_record(data.rhs);
                self.format_statement(branches.then_body);
                self.write(" else ");
                self.format_statement(branches.else_body);
            }
            NodeTag::For => {
                let header: ForHeader = ast.extra_record(data.lhs);
                self.write("for (");
                if header.init == 0 {
                    self.write(";");
                } else {
                    // The init statement carries its own semicolon.
                    self.format_statement(header.init);
                }
                if header.cond != 0 {
                    self.space();
                    self.format_expression(header.cond, 0);
                }
                self.write(";");
                if header.step != 0 {
                    self.space();
                    self.format_expression(header.step, 0);
                }
                self.write(") ");
                self.format_statement(data.rhs);
            }
            NodeTag::While => {
                self.write("while (");
                self.format_expression(data.lhs, 0);
                self.write(") ");
                self.format_statement(data.rhs);
            }
            NodeTag::DoWhile => {
                self.write("do ");
                self.format_statement(data.lhs);
                self.write(" while (");
                self.format_expression(data.rhs, 0);
                self.write(");");
            }
            NodeTag::Return => {
                self.write("return");
                if data.lhs != 0 {
                    self.space();
                    self.format_expression(data.lhs, 0);
                }
                self.write(";");
            }
            NodeTag::Break => self.write("break;"),
            NodeTag::Continue => self.write("continue;"),
            NodeTag::Emit => {
                self.write("emit ");
                self.format_expression(data.lhs, 0);
                self.write(";");
            }
            NodeTag::Revert => {
                self.write("revert");
                if data.lhs != 0 {
                    self.space();
                    self.format_expression(data.lhs, 0);
                }
                self.write(";");
            }
            NodeTag::TryStatement => {
                let header: TryHeader = ast.extra_record(data.lhs);
                self.write("try ");
                self.format_expression(header.expr, 0);
                let returns = ast
                    .extra_nodes(header.returns_start, header.returns_end)
                    .to_vec();
                if !returns.is_empty() {
                    self.write(" returns (");
                    for (i, param) in returns.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.format_parameter(*param);
                    }
                    self.write(")");
                }
                self.space();
                self.format_block(header.block);
                let clauses: SubRange = ast.extra_record(data.rhs);
                let catches = ast.extra_nodes(clauses.start, clauses.end).to_vec();
                for clause in catches {
                    self.format_catch_clause(clause);
                }
            }
            NodeTag::CatchClause => self.format_catch_clause(node),
            NodeTag::AssemblyDecl => {
                self.write("assembly ");
                let text = self.raw_token_span(data.lhs, data.rhs);
                self.write(text);
            }

            // Declarations never appear in statement position from a
            // parse, but the dispatch stays total — each group routes to
            // a concrete renderer so no tag can bounce between fallbacks.
            NodeTag::Root => self.format_source_unit(),
            NodeTag::PragmaDirective
            | NodeTag::ImportDirectivePath
            | NodeTag::ImportDirectivePathIdentifier
            | NodeTag::ImportDirectiveAsterisk
            | NodeTag::ImportDirectiveSymbol
            | NodeTag::UsingDirective
            | NodeTag::ContractDecl
            | NodeTag::ContractDeclInheritanceOne
            | NodeTag::ContractDeclInheritance => self.format_declaration(node),
            NodeTag::ContractBlockTwo | NodeTag::ContractBlock => {
                self.format_contract_block(node);
            }
            NodeTag::StructField => self.format_struct_field(node),
            NodeTag::ErrorVariableDecl | NodeTag::EventVariableDecl | NodeTag::VariableDecl => {
                self.format_parameter(node);
            }
            NodeTag::Specifier | NodeTag::OverrideSpecifier => self.format_specifier(node),
            NodeTag::StateVariableDecl
            | NodeTag::StructDeclOne
            | NodeTag::StructDecl
            | NodeTag::EnumDeclOne
            | NodeTag::EnumDecl
            | NodeTag::ErrorProtoSimple
            | NodeTag::ErrorProtoOne
            | NodeTag::ErrorProtoMulti
            | NodeTag::EventProtoSimple
            | NodeTag::EventProtoOne
            | NodeTag::EventProtoMulti
            | NodeTag::FunctionProtoSimple
            | NodeTag::FunctionProtoOne
            | NodeTag::FunctionProtoMulti
            | NodeTag::FunctionProto
            | NodeTag::FunctionDecl
            | NodeTag::ModifierProtoSimple
            | NodeTag::ModifierProtoOne
            | NodeTag::ModifierProtoMulti
            | NodeTag::ModifierDecl => self.format_contract_body_element(node),

            // Expressions and types in statement position.
            NodeTag::Identifier
            | NodeTag::NumberLiteral
            | NodeTag::NumberLiteralSubDenomination
            | NodeTag::StringLiteral
            | NodeTag::BoolLiteral
            | NodeTag::Add
            | NodeTag::Sub
            | NodeTag::Mul
            | NodeTag::Div
            | NodeTag::Mod
            | NodeTag::Exponent
            | NodeTag::BitAnd
            | NodeTag::BitOr
            | NodeTag::BitXor
            | NodeTag::Shl
            | NodeTag::Shr
            | NodeTag::LogicalAnd
            | NodeTag::LogicalOr
            | NodeTag::EqualEqual
            | NodeTag::BangEqual
            | NodeTag::LessThan
            | NodeTag::GreaterThan
            | NodeTag::LessOrEqual
            | NodeTag::GreaterOrEqual
            | NodeTag::Assign
            | NodeTag::AssignAdd
            | NodeTag::AssignSub
            | NodeTag::AssignMul
            | NodeTag::AssignDiv
            | NodeTag::AssignMod
            | NodeTag::AssignBitAnd
            | NodeTag::AssignBitOr
            | NodeTag::AssignBitXor
            | NodeTag::AssignShl
            | NodeTag::AssignShr
            | NodeTag::Negation
            | NodeTag::BitNot
            | NodeTag::LogicalNot
            | NodeTag::Increment
            | NodeTag::Decrement
            | NodeTag::IncrementPostfix
            | NodeTag::DecrementPostfix
            | NodeTag::Delete
            | NodeTag::New
            | NodeTag::CallOne
            | NodeTag::Call
            | NodeTag::CallOptions
            | NodeTag::FieldInit
            | NodeTag::StructInitOne
            | NodeTag::StructInit
            | NodeTag::ArrayAccess
            | NodeTag::FieldAccess
            | NodeTag::Conditional
            | NodeTag::GroupedExpression
            | NodeTag::TupleInit
            | NodeTag::ArrayInitOne
            | NodeTag::ArrayInit
            | NodeTag::ElementaryType
            | NodeTag::ArrayType
            | NodeTag::MappingDecl
            | NodeTag::FunctionType => {
                self.format_expression(node, 0);
                self.write(";");
            }
        }
    }

    /// `{ ... }` — empty inline, otherwise one statement per line.
    pub(crate) fn format_block(&mut self, node: NodeIndex) {
        let ast = self.ast();
        let data = ast.node_data(node);
        let stmts: Vec<NodeIndex> = match ast.node_tag(node) {
            NodeTag::BlockTwo => [data.lhs, data.rhs]
                .into_iter()
                .filter(|&s| s != 0)
                .collect(),
            _ => ast.extra_nodes(data.lhs, data.rhs).to_vec(),
        };

        if stmts.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        for stmt in stmts {
            self.newline_indent();
            self.format_statement(stmt);
        }
        self.indent -= 1;
        self.newline_indent();
        self.write("}");
    }

    fn format_catch_clause(&mut self, node: NodeIndex) {
        let ast = self.ast();
        let main_token = ast.node_main_token(node);
        let data = ast.node_data(node);
        self.write(" catch");
        if ast.token_tag(main_token + 1) == TokenTag::Identifier {
            self.space();
            let name = self.token_source(main_token + 1);
            self.write(name);
        }
        if data.lhs != 0 {
            let params: SubRange = ast.extra_record(data.lhs);
            let params = ast.extra_nodes(params.start, params.end).to_vec();
            self.write("(");
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.format_parameter(*param);
            }
            self.write(")");
        }
        self.space();
        self.format_block(data.rhs);
    }

    /// Destructuring target: `(uint a, , address c)`.
    fn format_decl_tuple(&mut self, node: NodeIndex) {
        let ast = self.ast();
        let data = ast.node_data(node);
        let entries = ast.extra_nodes(data.lhs, data.rhs).to_vec();
        self.write("(");
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            if *entry != 0 {
                if i > 0 {
                    self.space();
                }
                self.format_parameter(*entry);
            }
        }
        self.write(")");
    }
}
