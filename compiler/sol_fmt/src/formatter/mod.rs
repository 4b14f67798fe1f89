//! Formatting engine.
//!
//! A direct structural recursion over the node table, one case per
//! [`NodeTag`] — the dispatch in [`Formatter::format_statement`] is an
//! exhaustive match, so a parser tag without a formatter case is a compile
//! error. The formatter is read-only over the [`Ast`]: output is a pure
//! function of `(ast, node)`.
//!
//! Canonical form: single spaces between tokens, block bodies indented by
//! [`FormatConfig::indent_width`], `_one`/`_simple` container shapes on one
//! line, multi shapes one item per line, parameter and argument lists on a
//! single line, minimal parenthesization tracked through precedence
//! contexts.

mod expressions;
mod statements;
mod types;

use sol_ast::{
    Ast, FnProto, FnProtoAttrs, FnProtoMulti, NodeIndex, NodeTag, SubRange, TokenIndex, TokenTag,
};

use crate::context::FormatConfig;
use crate::emitter::Emitter;

/// Formatter over one [`Ast`], writing to a caller-supplied emitter.
pub struct Formatter<'a, E: Emitter> {
    ast: &'a Ast,
    out: &'a mut E,
    config: FormatConfig,
    indent: usize,
}

impl<'a, E: Emitter> Formatter<'a, E> {
    pub fn new(ast: &'a Ast, out: &'a mut E) -> Self {
        Self::with_config(ast, out, FormatConfig::default())
    }

    pub fn with_config(ast: &'a Ast, out: &'a mut E, config: FormatConfig) -> Self {
        Self {
            ast,
            out,
            config,
            indent: 0,
        }
    }

    // ─── Low-level output ────────────────────────────────────────────────

    pub(crate) fn write(&mut self, text: &str) {
        self.out.emit(text);
    }

    pub(crate) fn space(&mut self) {
        self.out.emit_space();
    }

    pub(crate) fn newline_indent(&mut self) {
        self.out.emit_newline();
        for _ in 0..self.indent * self.config.indent_width {
            self.out.emit_space();
        }
    }

    /// Source text of a token: fixed spelling when the tag has one,
    /// re-scanned source otherwise.
    pub(crate) fn token_source(&self, token: TokenIndex) -> &'a str {
        let tag = self.ast.token_tag(token);
        match tag.symbol() {
            Some(symbol) => symbol,
            None => sol_lexer::token_slice(self.ast.source(), self.ast.token_start(token)),
        }
    }

    pub(crate) fn ast(&self) -> &'a Ast {
        self.ast
    }

    // ─── Source unit ─────────────────────────────────────────────────────

    /// Format every top-level declaration, one per line.
    pub fn format_source_unit(&mut self) {
        let decls: Vec<NodeIndex> = self.ast.root_decls().to_vec();
        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                self.newline_indent();
            }
            self.format_declaration(*decl);
            self.out.emit_newline();
        }
    }

    /// A top-level declaration or directive.
    pub fn format_declaration(&mut self, node: NodeIndex) {
        let data = self.ast.node_data(node);
        match self.ast.node_tag(node) {
            NodeTag::PragmaDirective => {
                self.write("pragma ");
                let text = self.raw_token_span(data.lhs, data.rhs);
                self.write(text);
                self.write(";");
            }
            NodeTag::ImportDirectivePath => {
                self.write("import ");
                let path = self.token_source(data.lhs);
                self.write(path);
                self.write(";");
            }
            NodeTag::ImportDirectivePathIdentifier => {
                self.write("import ");
                let path = self.token_source(data.lhs);
                self.write(path);
                self.write(" as ");
                let alias = self.token_source(data.rhs);
                self.write(alias);
                self.write(";");
            }
            NodeTag::ImportDirectiveAsterisk => {
                self.write("import * as ");
                let alias = self.token_source(data.lhs);
                self.write(alias);
                self.write(" from ");
                let path = self.token_source(data.rhs);
                self.write(path);
                self.write(";");
            }
            NodeTag::ImportDirectiveSymbol => {
                self.write("import {");
                let range: SubRange = self.ast.extra_record(data.lhs);
                let symbols = self.ast.extra_nodes(range.start, range.end).to_vec();
                for (i, symbol) in symbols.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    let name = self.token_source(self.ast.node_main_token(*symbol));
                    self.write(name);
                }
                self.write("} from ");
                let path = self.token_source(data.rhs);
                self.write(path);
                self.write(";");
            }
            NodeTag::UsingDirective => {
                self.write("using ");
                self.format_expression(data.lhs, 0);
                self.write(" for ");
                if data.rhs == 0 {
                    self.write("*");
                } else {
                    self.format_type_expression(data.rhs);
                }
                self.write(";");
            }
            NodeTag::ContractDecl
            | NodeTag::ContractDeclInheritanceOne
            | NodeTag::ContractDeclInheritance => self.format_contract_decl(node),
            NodeTag::MappingDecl => self.format_type_expression(node),
            _ => self.format_contract_body_element(node),
        }
    }

    /// Raw source text covering an inclusive token span.
    pub(crate) fn raw_token_span(&self, first: TokenIndex, last: TokenIndex) -> &'a str {
        let start = self.ast.token_start(first) as usize;
        let last_text = sol_lexer::token_slice(self.ast.source(), self.ast.token_start(last));
        let end = self.ast.token_start(last) as usize + last_text.len();
        &self.ast.source()[start..end]
    }

    // ─── Contract declarations ───────────────────────────────────────────

    fn format_contract_decl(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);

        let name = if self.ast.token_tag(main_token) == TokenTag::Abstract {
            self.write("abstract contract");
            main_token + 2
        } else {
            self.write(self.ast.token_tag(main_token).symbol().unwrap_or("contract"));
            main_token + 1
        };
        self.space();
        let name_text = self.token_source(name);
        self.write(name_text);

        match self.ast.node_tag(node) {
            NodeTag::ContractDeclInheritanceOne => {
                self.write(" is ");
                self.format_expression(data.lhs, 0);
            }
            NodeTag::ContractDeclInheritance => {
                self.write(" is ");
                let range: SubRange = self.ast.extra_record(data.lhs);
                let bases = self.ast.extra_nodes(range.start, range.end).to_vec();
                for (i, base) in bases.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.format_expression(*base, 0);
                }
            }
            _ => {}
        }

        self.space();
        self.format_contract_block(data.rhs);
    }

    fn format_contract_block(&mut self, block: NodeIndex) {
        let data = self.ast.node_data(block);
        let members: Vec<NodeIndex> = match self.ast.node_tag(block) {
            NodeTag::ContractBlockTwo => [data.lhs, data.rhs]
                .into_iter()
                .filter(|&m| m != 0)
                .collect(),
            _ => self.ast.extra_nodes(data.lhs, data.rhs).to_vec(),
        };

        if members.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        for member in members {
            self.newline_indent();
            self.format_contract_body_element(member);
        }
        self.indent -= 1;
        self.newline_indent();
        self.write("}");
    }

    /// One contract body element, with its terminating `;` where the
    /// grammar requires one.
    pub fn format_contract_body_element(&mut self, node: NodeIndex) {
        let data = self.ast.node_data(node);
        match self.ast.node_tag(node) {
            NodeTag::StateVariableDecl => {
                self.format_type_expression(data.lhs);
                self.format_state_variable_qualifiers(node);
                self.space();
                let name = self.token_source(self.ast.node_main_token(node));
                self.write(name);
                if data.rhs != 0 {
                    self.write(" = ");
                    self.format_expression(data.rhs, 0);
                }
                self.write(";");
            }
            NodeTag::StructDeclOne | NodeTag::StructDecl => self.format_struct(node),
            NodeTag::EnumDeclOne | NodeTag::EnumDecl => self.format_enum(node),
            NodeTag::ErrorProtoSimple | NodeTag::ErrorProtoOne | NodeTag::ErrorProtoMulti => {
                self.format_error_proto(node);
            }
            NodeTag::EventProtoSimple | NodeTag::EventProtoOne | NodeTag::EventProtoMulti => {
                self.format_event_proto(node);
            }
            NodeTag::FunctionProtoSimple
            | NodeTag::FunctionProtoOne
            | NodeTag::FunctionProtoMulti
            | NodeTag::FunctionProto => {
                self.format_function_proto(node);
                self.write(";");
            }
            NodeTag::FunctionDecl => {
                self.format_function_proto(data.lhs);
                self.space();
                self.format_statement(data.rhs);
            }
            NodeTag::ModifierProtoSimple
            | NodeTag::ModifierProtoOne
            | NodeTag::ModifierProtoMulti => {
                self.format_modifier_proto(node);
                self.write(";");
            }
            NodeTag::ModifierDecl => {
                self.format_modifier_proto(data.lhs);
                self.space();
                self.format_statement(data.rhs);
            }
            NodeTag::UsingDirective => self.format_declaration(node),
            _ => self.format_statement(node),
        }
    }

    /// Visibility and mutability keywords of a state variable sit between
    /// the type's last token and the name token; re-read them from there.
    fn format_state_variable_qualifiers(&mut self, node: NodeIndex) {
        let ty = self.ast.node_data(node).lhs;
        let name = self.ast.node_main_token(node);
        let mut token = self.ast.last_token(ty) + 1;
        while token < name {
            let tag = self.ast.token_tag(token);
            if matches!(
                tag,
                TokenTag::Public
                    | TokenTag::Private
                    | TokenTag::Internal
                    | TokenTag::Constant
                    | TokenTag::Immutable
                    | TokenTag::Override
            ) {
                self.space();
                self.write(tag.symbol().unwrap_or(""));
            }
            token += 1;
        }
    }

    fn format_struct(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);
        self.write("struct ");
        let name = self.token_source(main_token + 1);
        self.write(name);

        if self.ast.node_tag(node) == NodeTag::StructDeclOne {
            self.write(" { ");
            self.format_struct_field(data.rhs);
            self.write(" }");
            return;
        }
        let fields = self.ast.extra_nodes(data.lhs, data.rhs).to_vec();
        if fields.is_empty() {
            self.write(" {}");
            return;
        }
        self.write(" {");
        self.indent += 1;
        for field in fields {
            self.newline_indent();
            self.format_struct_field(field);
        }
        self.indent -= 1;
        self.newline_indent();
        self.write("}");
    }

    fn format_struct_field(&mut self, field: NodeIndex) {
        let data = self.ast.node_data(field);
        self.format_type_expression(data.lhs);
        self.space();
        let name = self.token_source(self.ast.node_main_token(field));
        self.write(name);
        self.write(";");
    }

    fn format_enum(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);
        self.write("enum ");
        let name = self.token_source(main_token + 1);
        self.write(name);

        if self.ast.node_tag(node) == NodeTag::EnumDeclOne {
            self.write(" { ");
            let member = self.token_source(self.ast.node_main_token(data.rhs));
            self.write(member);
            self.write(" }");
            return;
        }
        let members = self.ast.extra_nodes(data.lhs, data.rhs).to_vec();
        self.write(" {");
        self.indent += 1;
        for (i, member) in members.iter().enumerate() {
            self.newline_indent();
            let text = self.token_source(self.ast.node_main_token(*member));
            self.write(text);
            if i + 1 < members.len() {
                self.write(",");
            }
        }
        self.indent -= 1;
        self.newline_indent();
        self.write("}");
    }

    fn format_error_proto(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);
        self.write("error ");
        let name = self.token_source(main_token + 1);
        self.write(name);
        self.write("(");
        let params: Vec<NodeIndex> = match self.ast.node_tag(node) {
            NodeTag::ErrorProtoSimple => Vec::new(),
            NodeTag::ErrorProtoOne => vec![data.rhs],
            _ => self.ast.extra_nodes(data.lhs, data.rhs).to_vec(),
        };
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.format_parameter(*param);
        }
        self.write(");");
    }

    fn format_event_proto(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);
        self.write("event ");
        let name = self.token_source(main_token + 1);
        self.write(name);
        self.write("(");
        let params: Vec<NodeIndex> = match self.ast.node_tag(node) {
            NodeTag::EventProtoSimple => Vec::new(),
            NodeTag::EventProtoOne => vec![data.rhs],
            _ => self.ast.extra_nodes(data.lhs, data.rhs).to_vec(),
        };
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.format_parameter(*param);
        }
        self.write(")");
        if self.ast.token_tag(self.ast.last_token(node)) == TokenTag::Anonymous {
            self.write(" anonymous");
        }
        self.write(";");
    }

    /// A parameter-like declaration: `Type [indexed] [location] [name]`.
    pub(crate) fn format_parameter(&mut self, param: NodeIndex) {
        let data = self.ast.node_data(param);
        self.format_type_expression(data.lhs);
        match self.ast.node_tag(param) {
            NodeTag::EventVariableDecl => {
                if data.rhs != 0 {
                    self.write(" indexed");
                }
            }
            NodeTag::VariableDecl => {
                if data.rhs != 0 {
                    self.space();
                    self.write(self.ast.token_tag(data.rhs).symbol().unwrap_or(""));
                }
            }
            _ => {}
        }
        let name = self.ast.node_main_token(param);
        if name != 0 {
            self.space();
            self.write(self.token_source(name));
        }
    }

    // ─── Function-ish prototypes ─────────────────────────────────────────

    /// Parameter, specifier and return ranges of any prototype shape.
    fn proto_parts(&self, node: NodeIndex) -> (Vec<NodeIndex>, Vec<NodeIndex>, Vec<NodeIndex>) {
        let data = self.ast.node_data(node);
        match self.ast.node_tag(node) {
            NodeTag::FunctionProtoSimple => {
                let specs = self.attrs_specifiers(data.lhs);
                (Vec::new(), specs, Vec::new())
            }
            NodeTag::FunctionProtoOne => {
                let specs = self.attrs_specifiers(data.lhs);
                (vec![data.rhs], specs, Vec::new())
            }
            NodeTag::FunctionProtoMulti => {
                let record: FnProtoMulti = self.ast.extra_record(data.lhs);
                (
                    self.ast
                        .extra_nodes(record.params_start, record.params_end)
                        .to_vec(),
                    self.ast
                        .extra_nodes(record.specifiers_start, record.specifiers_end)
                        .to_vec(),
                    Vec::new(),
                )
            }
            _ => {
                let record: FnProto = self.ast.extra_record(data.lhs);
                (
                    self.ast
                        .extra_nodes(record.params_start, record.params_end)
                        .to_vec(),
                    self.ast
                        .extra_nodes(record.specifiers_start, record.specifiers_end)
                        .to_vec(),
                    self.ast
                        .extra_nodes(record.returns_start, record.returns_end)
                        .to_vec(),
                )
            }
        }
    }

    fn attrs_specifiers(&self, attrs: u32) -> Vec<NodeIndex> {
        if attrs == 0 {
            return Vec::new();
        }
        let record: FnProtoAttrs = self.ast.extra_record(attrs);
        self.ast
            .extra_nodes(record.specifiers_start, record.specifiers_end)
            .to_vec()
    }

    pub(crate) fn format_function_proto(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let keyword = self.ast.token_tag(main_token);
        self.write(keyword.symbol().unwrap_or("function"));
        // Function types and constructor/fallback/receive have no name.
        if keyword == TokenTag::Function && self.ast.node_tag(node) != NodeTag::FunctionType {
            self.space();
            let name = self.token_source(main_token + 1);
            self.write(name);
        }

        let (params, specifiers, returns) = self.proto_parts(node);
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.format_parameter(*param);
        }
        self.write(")");

        for specifier in specifiers {
            self.space();
            self.format_specifier(specifier);
        }

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
    }

    pub(crate) fn format_specifier(&mut self, node: NodeIndex) {
        let data = self.ast.node_data(node);
        match self.ast.node_tag(node) {
            NodeTag::Specifier => {
                let token = self.ast.node_main_token(node);
                self.write(self.ast.token_tag(token).symbol().unwrap_or(""));
            }
            NodeTag::OverrideSpecifier => {
                self.write("override");
                let paths = self.ast.extra_nodes(data.lhs, data.rhs).to_vec();
                if !paths.is_empty() {
                    self.write("(");
                    for (i, path) in paths.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.format_expression(*path, 0);
                    }
                    self.write(")");
                }
            }
            // Modifier invocations and base-constructor calls.
            _ => self.format_expression(node, 0),
        }
    }

    fn format_modifier_proto(&mut self, node: NodeIndex) {
        let main_token = self.ast.node_main_token(node);
        let data = self.ast.node_data(node);
        self.write("modifier ");
        let name = self.token_source(main_token + 1);
        self.write(name);
        self.write("(");
        let params: Vec<NodeIndex> = match self.ast.node_tag(node) {
            NodeTag::ModifierProtoSimple => Vec::new(),
            NodeTag::ModifierProtoOne => vec![data.rhs],
            _ => self.ast.extra_nodes(data.lhs, data.rhs).to_vec(),
        };
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.format_parameter(*param);
        }
        self.write(")");

        // `virtual` / bare `override` follow the parameter list in the
        // token stream.
        let mut token = self.ast.last_token(node) + 1;
        while (token as usize) < self.ast.tokens().len()
            && matches!(
                self.ast.token_tag(token),
                TokenTag::Virtual | TokenTag::Override
            )
        {
            self.space();
            self.write(self.ast.token_tag(token).symbol().unwrap_or(""));
            token += 1;
        }
    }
}
