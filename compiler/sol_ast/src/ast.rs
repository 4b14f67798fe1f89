//! The parse result aggregate.
//!
//! [`Ast`] owns the source text, the token table, the node table, the
//! extra-data array and the error list. Every index stored anywhere in the
//! tables is only meaningful relative to this aggregate, and the whole
//! thing is immutable after construction — safe to share across threads,
//! destroyed as a unit.

use crate::error::ParseError;
use crate::node::{
    ExtraData, ExtraIndex, FnProto, FnProtoAttrs, FnProtoMulti, IfBranches, MappingTypes, Node,
    NodeData, NodeIndex, NodeList, NodeTag, SubRange, TernaryBranches, TryHeader,
};
use crate::token::{TokenIndex, TokenList, TokenTag};

/// Immutable parse result: source + token table + node table + extra data
/// + accumulated errors.
#[derive(Debug)]
pub struct Ast {
    source: String,
    tokens: TokenList,
    nodes: NodeList,
    extra_data: Vec<u32>,
    errors: Vec<ParseError>,
}

impl Ast {
    /// Assemble an aggregate from the parser's tables.
    pub fn new(
        source: String,
        tokens: TokenList,
        nodes: NodeList,
        extra_data: Vec<u32>,
        errors: Vec<ParseError>,
    ) -> Self {
        Self {
            source,
            tokens,
            nodes,
            extra_data,
            errors,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    #[inline]
    pub fn token_tag(&self, index: TokenIndex) -> TokenTag {
        self.tokens.tag(index)
    }

    #[inline]
    pub fn token_start(&self, index: TokenIndex) -> u32 {
        self.tokens.start(index)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Node {
        self.nodes.get(index)
    }

    #[inline]
    pub fn node_tag(&self, index: NodeIndex) -> NodeTag {
        self.nodes.tag(index)
    }

    #[inline]
    pub fn node_main_token(&self, index: NodeIndex) -> TokenIndex {
        self.nodes.main_token(index)
    }

    #[inline]
    pub fn node_data(&self, index: NodeIndex) -> NodeData {
        self.nodes.data(index)
    }

    /// The root node: the last node appended by a parse.
    ///
    /// Node 0 is the null-sentinel placeholder, so an `Ast` always has at
    /// least one node and `root()` is always valid.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        u32::try_from(self.nodes.len()).unwrap_or(u32::MAX) - 1
    }

    #[inline]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Raw extra-data array.
    #[inline]
    pub fn extra(&self) -> &[u32] {
        &self.extra_data
    }

    /// A `[start, end)` run of node indices in extra data.
    #[inline]
    pub fn extra_nodes(&self, start: ExtraIndex, end: ExtraIndex) -> &[NodeIndex] {
        &self.extra_data[start as usize..end as usize]
    }

    /// Decode a typed record stored at `index` in extra data.
    pub fn extra_record<T: ExtraData>(&self, index: ExtraIndex) -> T {
        let start = index as usize;
        T::decode(&self.extra_data[start..start + T::LEN])
    }

    /// Top-level declarations of the source unit.
    pub fn root_decls(&self) -> &[NodeIndex] {
        let root = self.root();
        if self.nodes.tag(root) != NodeTag::Root {
            return &[];
        }
        let data = self.nodes.data(root);
        self.extra_nodes(data.lhs, data.rhs)
    }

    /// 1-based line and column (in bytes) of a byte offset.
    pub fn offset_to_line_col(&self, offset: u32) -> (u32, u32) {
        let upto = (offset as usize).min(self.source.len());
        let mut line = 1u32;
        let mut line_start = 0usize;
        for (i, byte) in self.source.as_bytes()[..upto].iter().enumerate() {
            if *byte == b'\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let col = (upto - line_start) as u32 + 1;
        (line, col)
    }

    /// First token of the source range covered by `node`.
    pub fn first_token(&self, node: NodeIndex) -> TokenIndex {
        let n = self.nodes.get(node);
        match n.tag {
            NodeTag::Root => 0,

            // Children that precede the anchor token.
            NodeTag::StateVariableDecl
            | NodeTag::VariableDecl
            | NodeTag::StructField
            | NodeTag::ErrorVariableDecl
            | NodeTag::EventVariableDecl
            | NodeTag::ArrayType
            | NodeTag::ArrayAccess
            | NodeTag::FieldAccess
            | NodeTag::CallOne
            | NodeTag::Call
            | NodeTag::CallOptions
            | NodeTag::Conditional
            | NodeTag::IncrementPostfix
            | NodeTag::DecrementPostfix
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
            | NodeTag::AssignShr => self.first_token(n.data.lhs),

            // Everything else is anchored by its main token.
            _ => n.main_token,
        }
    }

    /// Last token of the source range covered by `node`.
    ///
    /// Exact for expression, type, parameter and prototype nodes — the
    /// shapes the formatter uses as anchors for qualifier-token scans.
    /// Block- and statement-level arms return the last token reachable
    /// from stored structure, which excludes terminating semicolons and
    /// closing braces that are not recorded in the node table.
    pub fn last_token(&self, node: NodeIndex) -> TokenIndex {
        let n = self.nodes.get(node);
        match n.tag {
            NodeTag::Root => {
                let decls = self.extra_nodes(n.data.lhs, n.data.rhs);
                match decls.last() {
                    Some(&last) => self.last_token(last),
                    None => 0,
                }
            }

            // Token-span and stored-token nodes.
            NodeTag::PragmaDirective => n.data.rhs,
            NodeTag::ImportDirectivePath => n.data.lhs,
            NodeTag::ImportDirectivePathIdentifier
            | NodeTag::ImportDirectiveAsterisk
            | NodeTag::ImportDirectiveSymbol => n.data.rhs,
            NodeTag::GroupedExpression | NodeTag::AssemblyDecl => n.data.rhs,
            NodeTag::NumberLiteralSubDenomination => n.data.rhs,
            NodeTag::FieldAccess => n.data.rhs,

            NodeTag::UsingDirective => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs)
                } else {
                    // `using A for *` — skip over `for` to the `*`.
                    self.last_token(n.data.lhs) + 2
                }
            }

            NodeTag::ContractDecl
            | NodeTag::ContractDeclInheritanceOne
            | NodeTag::ContractDeclInheritance => self.last_token(n.data.rhs),

            NodeTag::ContractBlockTwo | NodeTag::BlockTwo => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs)
                } else if n.data.lhs != 0 {
                    self.last_token(n.data.lhs)
                } else {
                    n.main_token
                }
            }
            NodeTag::ContractBlock | NodeTag::Block => {
                let members = self.extra_nodes(n.data.lhs, n.data.rhs);
                match members.last() {
                    Some(&last) => self.last_token(last),
                    None => n.main_token,
                }
            }

            NodeTag::StateVariableDecl => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs)
                } else {
                    n.main_token
                }
            }

            // `struct S { T a; }` — field, `;`, `}`.
            NodeTag::StructDeclOne => self.last_token(n.data.rhs) + 2,
            NodeTag::StructDecl => {
                let fields = self.extra_nodes(n.data.lhs, n.data.rhs);
                match fields.last() {
                    Some(&last) => self.last_token(last) + 2,
                    None => n.main_token,
                }
            }
            NodeTag::StructField => n.main_token,

            // `enum E { a }` — member, `}`.
            NodeTag::EnumDeclOne => self.last_token(n.data.rhs) + 1,
            NodeTag::EnumDecl => {
                let members = self.extra_nodes(n.data.lhs, n.data.rhs);
                match members.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token,
                }
            }

            // `error E ( )` — keyword, name, parens.
            NodeTag::ErrorProtoSimple => n.main_token + 3,
            NodeTag::ErrorProtoOne => self.last_token(n.data.rhs) + 1,
            NodeTag::ErrorProtoMulti => {
                let params = self.extra_nodes(n.data.lhs, n.data.rhs);
                match params.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 3,
                }
            }

            NodeTag::EventProtoSimple => self.with_anonymous(n.main_token + 3),
            NodeTag::EventProtoOne => self.with_anonymous(self.last_token(n.data.rhs) + 1),
            NodeTag::EventProtoMulti => {
                let params = self.extra_nodes(n.data.lhs, n.data.rhs);
                let rparen = match params.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 3,
                };
                self.with_anonymous(rparen)
            }

            NodeTag::ErrorVariableDecl => {
                if n.main_token != 0 {
                    n.main_token
                } else {
                    self.last_token(n.data.lhs)
                }
            }
            NodeTag::EventVariableDecl | NodeTag::VariableDecl => {
                if n.main_token != 0 {
                    n.main_token
                } else if n.data.rhs != 0 {
                    n.data.rhs
                } else {
                    self.last_token(n.data.lhs)
                }
            }

            NodeTag::FunctionProtoSimple => {
                let rparen = self.proto_empty_rparen(n.main_token);
                self.after_specifiers(n.data.lhs, rparen)
            }
            NodeTag::FunctionProtoOne => {
                let rparen = self.last_token(n.data.rhs) + 1;
                self.after_specifiers(n.data.lhs, rparen)
            }
            NodeTag::FunctionProtoMulti => {
                let record: FnProtoMulti = self.extra_record(n.data.lhs);
                let params = self.extra_nodes(record.params_start, record.params_end);
                let rparen = match params.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => self.proto_empty_rparen(n.main_token),
                };
                self.specifiers_last(record.specifiers_start, record.specifiers_end)
                    .unwrap_or(rparen)
            }
            NodeTag::FunctionProto | NodeTag::FunctionType => {
                let record: FnProto = self.extra_record(n.data.lhs);
                let returns = self.extra_nodes(record.returns_start, record.returns_end);
                if let Some(&last) = returns.last() {
                    return self.last_token(last) + 1;
                }
                let params = self.extra_nodes(record.params_start, record.params_end);
                let rparen = match params.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => self.proto_empty_rparen(n.main_token),
                };
                self.specifiers_last(record.specifiers_start, record.specifiers_end)
                    .unwrap_or(rparen)
            }

            NodeTag::Specifier => n.main_token,
            NodeTag::OverrideSpecifier => {
                let paths = self.extra_nodes(n.data.lhs, n.data.rhs);
                match paths.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token,
                }
            }

            NodeTag::FunctionDecl | NodeTag::ModifierDecl => self.last_token(n.data.rhs),

            NodeTag::ModifierProtoSimple => {
                // Parameter list is optional on modifiers.
                if self.tokens.tag(n.main_token + 2) == TokenTag::LParen {
                    n.main_token + 3
                } else {
                    n.main_token + 1
                }
            }
            NodeTag::ModifierProtoOne => self.last_token(n.data.rhs) + 1,
            NodeTag::ModifierProtoMulti => {
                let params = self.extra_nodes(n.data.lhs, n.data.rhs);
                match params.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 3,
                }
            }

            NodeTag::UncheckedBlock | NodeTag::Emit => self.last_token(n.data.lhs),
            NodeTag::VariableDeclStatement => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs)
                } else {
                    self.last_token(n.data.lhs)
                }
            }
            NodeTag::IfSimple | NodeTag::While | NodeTag::For => self.last_token(n.data.rhs),
            NodeTag::If => {
                let branches: IfBranches = self.extra_record(n.data.rhs);
                self.last_token(branches.else_body)
            }
            NodeTag::DoWhile => self.last_token(n.data.rhs) + 1,
            NodeTag::Return | NodeTag::Revert => {
                if n.data.lhs != 0 {
                    self.last_token(n.data.lhs)
                } else {
                    n.main_token
                }
            }
            NodeTag::Break | NodeTag::Continue => n.main_token,
            NodeTag::TryStatement => {
                let clauses: SubRange = self.extra_record(n.data.rhs);
                let catches = self.extra_nodes(clauses.start, clauses.end);
                match catches.last() {
                    Some(&last) => self.last_token(last),
                    None => {
                        let header: TryHeader = self.extra_record(n.data.lhs);
                        self.last_token(header.block)
                    }
                }
            }
            NodeTag::CatchClause => self.last_token(n.data.rhs),

            NodeTag::Identifier
            | NodeTag::NumberLiteral
            | NodeTag::StringLiteral
            | NodeTag::BoolLiteral
            | NodeTag::ElementaryType
            | NodeTag::IncrementPostfix
            | NodeTag::DecrementPostfix => n.main_token,

            NodeTag::Add
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
            | NodeTag::AssignShr => self.last_token(n.data.rhs),

            NodeTag::Negation
            | NodeTag::BitNot
            | NodeTag::LogicalNot
            | NodeTag::Increment
            | NodeTag::Decrement
            | NodeTag::Delete
            | NodeTag::New => self.last_token(n.data.lhs),

            NodeTag::CallOne | NodeTag::ArrayAccess | NodeTag::ArrayInitOne
            | NodeTag::StructInitOne => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs) + 1
                } else {
                    n.main_token + 1
                }
            }
            NodeTag::Call => {
                let args: SubRange = self.extra_record(n.data.rhs);
                let items = self.extra_nodes(args.start, args.end);
                match items.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 1,
                }
            }
            NodeTag::CallOptions => {
                let fields: SubRange = self.extra_record(n.data.rhs);
                let items = self.extra_nodes(fields.start, fields.end);
                match items.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 1,
                }
            }
            NodeTag::FieldInit => self.last_token(n.data.lhs),
            NodeTag::StructInit | NodeTag::ArrayInit => {
                let items = self.extra_nodes(n.data.lhs, n.data.rhs);
                match items.last() {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 1,
                }
            }
            NodeTag::Conditional => {
                let branches: TernaryBranches = self.extra_record(n.data.rhs);
                self.last_token(branches.else_expr)
            }
            NodeTag::TupleInit => {
                let items = self.extra_nodes(n.data.lhs, n.data.rhs);
                match items.iter().rev().find(|&&item| item != 0) {
                    Some(&last) => self.last_token(last) + 1,
                    None => n.main_token + 1,
                }
            }

            NodeTag::ArrayType => {
                if n.data.rhs != 0 {
                    self.last_token(n.data.rhs) + 1
                } else {
                    n.main_token + 1
                }
            }
            NodeTag::MappingDecl => {
                if n.data.rhs != 0 {
                    n.data.rhs
                } else {
                    let types: MappingTypes = self.extra_record(n.data.lhs);
                    self.last_token(types.value) + 1
                }
            }
        }
    }

    /// `)` position of an empty parameter list: named prototypes carry a
    /// name token between keyword and `(`, constructor/fallback/receive do
    /// not.
    fn proto_empty_rparen(&self, main_token: TokenIndex) -> TokenIndex {
        if self.tokens.tag(main_token) == TokenTag::Function {
            main_token + 3
        } else {
            main_token + 2
        }
    }

    /// Last token of a specifier range stored at `attrs_index`, if any.
    fn after_specifiers(&self, attrs_index: ExtraIndex, fallback: TokenIndex) -> TokenIndex {
        if attrs_index == 0 {
            return fallback;
        }
        let attrs: FnProtoAttrs = self.extra_record(attrs_index);
        self.specifiers_last(attrs.specifiers_start, attrs.specifiers_end)
            .unwrap_or(fallback)
    }

    fn specifiers_last(&self, start: ExtraIndex, end: ExtraIndex) -> Option<TokenIndex> {
        let specifiers = self.extra_nodes(start, end);
        specifiers.last().map(|&last| self.last_token(last))
    }

    /// Extend past a trailing `anonymous` keyword after an event's `)`.
    fn with_anonymous(&self, rparen: TokenIndex) -> TokenIndex {
        let next = rparen + 1;
        if (next as usize) < self.tokens.len() && self.tokens.tag(next) == TokenTag::Anonymous {
            next
        } else {
            rparen
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::token::Token;
    use pretty_assertions::assert_eq;

    fn leaf(tag: NodeTag, main_token: TokenIndex) -> Node {
        Node {
            tag,
            main_token,
            data: NodeData::default(),
        }
    }

    #[test]
    fn line_col_from_offset() {
        let ast = Ast::new(
            "contract A {\n  uint x;\n}\n".to_string(),
            TokenList::new(),
            {
                let mut nodes = NodeList::new();
                nodes.push(leaf(NodeTag::Root, 0));
                nodes
            },
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(ast.offset_to_line_col(0), (1, 1));
        assert_eq!(ast.offset_to_line_col(13), (2, 1));
        assert_eq!(ast.offset_to_line_col(15), (2, 3));
        assert_eq!(ast.offset_to_line_col(23), (3, 1));
    }

    #[test]
    fn binary_node_token_bounds() {
        // Tokens for `a + b`.
        let mut tokens = TokenList::new();
        tokens.push(Token {
            tag: TokenTag::Identifier,
            start: 0,
        });
        tokens.push(Token {
            tag: TokenTag::Plus,
            start: 2,
        });
        tokens.push(Token {
            tag: TokenTag::Identifier,
            start: 4,
        });
        tokens.push(Token {
            tag: TokenTag::Eof,
            start: 5,
        });

        let mut nodes = NodeList::new();
        nodes.push(leaf(NodeTag::Root, 0)); // sentinel
        let a = nodes.push(leaf(NodeTag::Identifier, 0));
        let b = nodes.push(leaf(NodeTag::Identifier, 2));
        let add = nodes.push(Node {
            tag: NodeTag::Add,
            main_token: 1,
            data: NodeData { lhs: a, rhs: b },
        });

        let ast = Ast::new("a + b".to_string(), tokens, nodes, Vec::new(), Vec::new());
        assert_eq!(ast.first_token(add), 0);
        assert_eq!(ast.last_token(add), 2);
    }
}
