//! Expression formatting with precedence-aware parenthesization.
//!
//! Each expression node carries an intrinsic precedence; parentheses are
//! emitted only when a child's precedence is lower than its context
//! requires for a correct re-parse. Trees that came from a parse already
//! carry explicit grouping as `GroupedExpression` nodes, so the guard only
//! fires for synthetically built or transformed trees.

use sol_ast::{NodeIndex, NodeTag, SubRange, TernaryBranches};

use crate::emitter::Emitter;
use crate::formatter::Formatter;

/// Binding strength of an expression node in its surrounding context.
fn precedence(tag: NodeTag) -> u8 {
    match tag {
        NodeTag::Assign
        | NodeTag::AssignAdd
        | NodeTag::AssignSub
        | NodeTag::AssignMul
        | NodeTag::AssignDiv
        | NodeTag::AssignMod
        | NodeTag::AssignBitAnd
        | NodeTag::AssignBitOr
        | NodeTag::AssignBitXor
        | NodeTag::AssignShl
        | NodeTag::AssignShr => 1,
        NodeTag::Conditional => 2,
        NodeTag::LogicalOr => 3,
        NodeTag::LogicalAnd => 4,
        NodeTag::EqualEqual | NodeTag::BangEqual => 5,
        NodeTag::LessThan
        | NodeTag::GreaterThan
        | NodeTag::LessOrEqual
        | NodeTag::GreaterOrEqual => 6,
        NodeTag::BitOr => 7,
        NodeTag::BitXor => 8,
        NodeTag::BitAnd => 9,
        NodeTag::Shl | NodeTag::Shr => 10,
        NodeTag::Add | NodeTag::Sub => 11,
        NodeTag::Mul | NodeTag::Div | NodeTag::Mod => 12,
        NodeTag::Exponent => 13,
        NodeTag::Negation
        | NodeTag::BitNot
        | NodeTag::LogicalNot
        | NodeTag::Increment
        | NodeTag::Decrement
        | NodeTag::Delete
        | NodeTag::New => 14,
        _ => 15,
    }
}

/// Operator spelling for binary and assignment nodes.
fn operator_str(tag: NodeTag) -> &'static str {
    match tag {
        NodeTag::Add => "+",
        NodeTag::Sub => "-",
        NodeTag::Mul => "*",
        NodeTag::Div => "/",
        NodeTag::Mod => "%",
        NodeTag::Exponent => "**",
        NodeTag::BitAnd => "&",
        NodeTag::BitOr => "|",
        NodeTag::BitXor => "^",
        NodeTag::Shl => "<<",
        NodeTag::Shr => ">>",
        NodeTag::LogicalAnd => "&&",
        NodeTag::LogicalOr => "||",
        NodeTag::EqualEqual => "==",
        NodeTag::BangEqual => "!=",
        NodeTag::LessThan => "<",
        NodeTag::GreaterThan => ">",
        NodeTag::LessOrEqual => "<=",
        NodeTag::GreaterOrEqual => ">=",
        NodeTag::Assign => "=",
        NodeTag::AssignAdd => "+=",
        NodeTag::AssignSub => "-=",
        NodeTag::AssignMul => "*=",
        NodeTag::AssignDiv => "/=",
        NodeTag::AssignMod => "%=",
        NodeTag::AssignBitAnd => "&=",
        NodeTag::AssignBitOr => "|=",
        NodeTag::AssignBitXor => "^=",
        NodeTag::AssignShl => "<<=",
        NodeTag::AssignShr => ">>=",
        _ => "",
    }
}

impl<E: Emitter> Formatter<'_, E> {
    /// Format a node in expression position.
    ///
    /// `context` is the minimum precedence the surrounding expression
    /// requires; a child binding weaker than that is parenthesized.
    pub fn format_expression(&mut self, node: NodeIndex, context: u8) {
        let ast = self.ast();
        let tag = ast.node_tag(node);
        let data = ast.node_data(node);
        let prec = precedence(tag);
        let wrap = prec < context && tag != NodeTag::GroupedExpression;
        if wrap {
            self.write("(");
        }

        match tag {
            NodeTag::Identifier | NodeTag::NumberLiteral | NodeTag::StringLiteral
            | NodeTag::BoolLiteral => {
                let text = self.token_source(ast.node_main_token(node));
                self.write(text);
            }
            NodeTag::NumberLiteralSubDenomination => {
                let number = self.token_source(ast.node_main_token(node));
                self.write(number);
                self.space();
                let unit = self.token_source(data.rhs);
                self.write(unit);
            }

            NodeTag::Add
            | NodeTag::Sub
            | NodeTag::Mul
            | NodeTag::Div
            | NodeTag::Mod
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
            | NodeTag::GreaterOrEqual => {
                // Left-associative: the right child needs one step more.
                self.format_expression(data.lhs, prec);
                self.space();
                self.write(operator_str(tag));
                self.space();
                self.format_expression(data.rhs, prec + 1);
            }
            NodeTag::Exponent => {
                // Right-associative.
                self.format_expression(data.lhs, prec + 1);
                self.write(" ** ");
                self.format_expression(data.rhs, prec);
            }
            NodeTag::Assign
            | NodeTag::AssignAdd
            | NodeTag::AssignSub
            | NodeTag::AssignMul
            | NodeTag::AssignDiv
            | NodeTag::AssignMod
            | NodeTag::AssignBitAnd
            | NodeTag::AssignBitOr
            | NodeTag::AssignBitXor
            | NodeTag::AssignShl
            | NodeTag::AssignShr => {
                self.format_expression(data.lhs, prec + 1);
                self.space();
                self.write(operator_str(tag));
                self.space();
                self.format_expression(data.rhs, prec);
            }

            NodeTag::Negation => {
                // A space keeps `- -x` from fusing into the `--` token.
                let op = match ast.node_tag(data.lhs) {
                    NodeTag::Negation | NodeTag::Decrement => "- ",
                    _ => "-",
                };
                self.format_prefix(op, data.lhs, prec);
            }
            NodeTag::BitNot => self.format_prefix("~", data.lhs, prec),
            NodeTag::LogicalNot => self.format_prefix("!", data.lhs, prec),
            NodeTag::Increment => self.format_prefix("++", data.lhs, prec),
            NodeTag::Decrement => self.format_prefix("--", data.lhs, prec),
            NodeTag::Delete => self.format_prefix("delete ", data.lhs, prec),
            NodeTag::New => {
                self.write("new ");
                self.format_type_expression(data.lhs);
            }
            NodeTag::IncrementPostfix => {
                self.format_expression(data.lhs, 15);
                self.write("++");
            }
            NodeTag::DecrementPostfix => {
                self.format_expression(data.lhs, 15);
                self.write("--");
            }

            NodeTag::CallOne => {
                self.format_expression(data.lhs, self.callee_context(data.lhs));
                self.write("(");
                if data.rhs != 0 {
                    self.format_expression(data.rhs, 0);
                }
                self.write(")");
            }
            NodeTag::Call => {
                self.format_expression(data.lhs, self.callee_context(data.lhs));
                self.write("(");
                let args: SubRange = ast.extra_record(data.rhs);
                let args = ast.extra_nodes(args.start, args.end).to_vec();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.format_expression(*arg, 0);
                }
                self.write(")");
            }
            NodeTag::CallOptions => {
                self.format_expression(data.lhs, self.callee_context(data.lhs));
                self.write("{");
                let fields: SubRange = ast.extra_record(data.rhs);
                let fields = ast.extra_nodes(fields.start, fields.end).to_vec();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.format_expression(*field, 0);
                }
                self.write("}");
            }
            NodeTag::FieldInit => {
                let name = self.token_source(ast.node_main_token(node));
                self.write(name);
                self.write(": ");
                self.format_expression(data.lhs, 0);
            }
            NodeTag::StructInitOne => {
                self.write("{");
                if data.rhs != 0 {
                    self.format_expression(data.rhs, 0);
                }
                self.write("}");
            }
            NodeTag::StructInit => {
                self.write("{");
                let fields = ast.extra_nodes(data.lhs, data.rhs).to_vec();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.format_expression(*field, 0);
                }
                self.write("}");
            }

            NodeTag::ArrayAccess => {
                self.format_expression(data.lhs, 15);
                self.write("[");
                if data.rhs != 0 {
                    self.format_expression(data.rhs, 0);
                }
                self.write("]");
            }
            NodeTag::FieldAccess => {
                self.format_expression(data.lhs, 15);
                self.write(".");
                let member = self.token_source(data.rhs);
                self.write(member);
            }
            NodeTag::Conditional => {
                self.format_expression(data.lhs, prec + 1);
                let branches: TernaryBranches = ast.extra_record(data.rhs);
                self.write(" ? ");
                self.format_expression(branches.then_expr, prec);
                self.write(" : ");
                self.format_expression(branches.else_expr, prec);
            }
            NodeTag::GroupedExpression => {
                self.write("(");
                self.format_expression(data.lhs, 0);
                self.write(")");
            }
            NodeTag::TupleInit => {
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
                        self.format_expression(*entry, 0);
                    }
                }
                self.write(")");
            }
            NodeTag::ArrayInitOne => {
                self.write("[");
                if data.rhs != 0 {
                    self.format_expression(data.rhs, 0);
                }
                self.write("]");
            }
            NodeTag::ArrayInit => {
                self.write("[");
                let items = ast.extra_nodes(data.lhs, data.rhs).to_vec();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.format_expression(*item, 0);
                }
                self.write("]");
            }

            NodeTag::ElementaryType
            | NodeTag::ArrayType
            | NodeTag::MappingDecl
            | NodeTag::FunctionType => self.format_type_expression(node),

            // Anything else is not an expression; route back to the
            // statement dispatch, which is total.
            _ => self.format_statement(node),
        }

        if wrap {
            self.write(")");
        }
    }

    fn format_prefix(&mut self, op: &str, operand: NodeIndex, prec: u8) {
        self.write(op);
        self.format_expression(operand, prec);
    }

    /// `new T(...)` binds as one grammatical unit — never parenthesize a
    /// `New` callee.
    fn callee_context(&self, callee: NodeIndex) -> u8 {
        if self.ast().node_tag(callee) == NodeTag::New {
            14
        } else {
            15
        }
    }
}
