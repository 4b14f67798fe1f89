//! Type-expression formatting.

use sol_ast::{MappingTypes, NodeIndex, NodeTag, TokenTag};

use crate::emitter::Emitter;
use crate::formatter::Formatter;

impl<E: Emitter> Formatter<'_, E> {
    /// Format a node in type position.
    pub fn format_type_expression(&mut self, node: NodeIndex) {
        let ast = self.ast();
        let data = ast.node_data(node);
        match ast.node_tag(node) {
            NodeTag::ElementaryType => {
                let main_token = ast.node_main_token(node);
                let text = self.token_source(main_token);
                self.write(text);
                // `address payable` — the qualifier token follows the type
                // token directly.
                let next = main_token + 1;
                if ast.token_tag(main_token) == TokenTag::AddressType
                    && (next as usize) < ast.tokens().len()
                    && ast.token_tag(next) == TokenTag::Payable
                {
                    self.write(" payable");
                }
            }
            NodeTag::ArrayType => {
                self.format_type_expression(data.lhs);
                self.write("[");
                if data.rhs != 0 {
                    self.format_expression(data.rhs, 0);
                }
                self.write("]");
            }
            NodeTag::MappingDecl => {
                let types: MappingTypes = ast.extra_record(data.lhs);
                self.write("mapping(");
                self.format_type_expression(types.key);
                self.write(" => ");
                self.format_type_expression(types.value);
                self.write(")");
                if data.rhs != 0 {
                    self.space();
                    let name = self.token_source(data.rhs);
                    self.write(name);
                }
            }
            NodeTag::FunctionType => {
                self.format_function_proto(node);
            }
            // Identifier paths and anything else type-shaped reuse the
            // expression renderer.
            _ => self.format_expression(node, 15),
        }
    }
}
