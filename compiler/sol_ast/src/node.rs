//! Syntax tree nodes.
//!
//! The tree is a flat, append-only node table (struct-of-arrays) indexed by
//! [`NodeIndex`], not a pointer graph. Node index 0 is reserved as the null
//! sentinel; the parser seeds it with the `Root` placeholder before parsing
//! and fixes it up at the end. Variable-arity children live as contiguous
//! runs of node indices in a flat extra-data array; constructs with more
//! than two fixed fields store a typed record there instead (see
//! [`ExtraData`]).
//!
//! # Layout conventions
//!
//! `main_token` anchors a node to its defining token (keyword, operator, or
//! opening delimiter). `data.lhs`/`data.rhs` are overloaded per tag:
//!
//! - fixed-arity children: direct node indices (0 = absent);
//! - `*_one` shapes: the single child in `data.rhs`;
//! - `*_simple` shapes: no children;
//! - multi shapes: `[lhs, rhs)` range into extra data;
//! - record shapes: `lhs` is the extra-data index of a typed record;
//! - a few tags store token indices (documented per tag below).
//!
//! Optional token fields use 0 as "none": token 0 is the first token of the
//! file and can never occupy an optional-name or qualifier position.

use crate::token::TokenIndex;

/// Index of a node in the node table. 0 is the null sentinel.
pub type NodeIndex = u32;

/// Index into the extra-data array.
pub type ExtraIndex = u32;

/// The null node sentinel.
pub const NULL_NODE: NodeIndex = 0;

/// Two-slot payload, overloaded per [`NodeTag`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeData {
    pub lhs: u32,
    pub rhs: u32,
}

/// A syntax node: tag + anchor token + two-slot payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub tag: NodeTag,
    pub main_token: TokenIndex,
    pub data: NodeData,
}

/// Every syntax construct the parser can produce.
///
/// The formatter's dispatch is an exhaustive match over this enum — adding
/// a tag without a formatter case is a compile error, which is the
/// enforcement mechanism for the parser/formatter bijection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// Source unit aggregate. `[lhs, rhs)` extra range of declarations.
    Root,
    /// `pragma ... ;` — lhs/rhs are the first/last body TOKEN (inclusive).
    PragmaDirective,
    /// `import "path";` — lhs = path string token.
    ImportDirectivePath,
    /// `import "path" as alias;` — lhs = path token, rhs = alias token.
    ImportDirectivePathIdentifier,
    /// `import * as alias from "path";` — lhs = alias token, rhs = path token.
    ImportDirectiveAsterisk,
    /// `import {a, b} from "path";` — lhs = extra → [`SubRange`] of
    /// identifier nodes, rhs = path token.
    ImportDirectiveSymbol,
    /// `using A for B;` — lhs = library path node, rhs = type node (0 = `*`).
    UsingDirective,

    /// Contract/interface/library with no inheritance. `main_token` is the
    /// introducing keyword (`abstract` for abstract contracts); rhs = body.
    ContractDecl,
    /// One base: lhs = base node, rhs = body.
    ContractDeclInheritanceOne,
    /// Two or more bases: lhs = extra → [`SubRange`] of bases, rhs = body.
    ContractDeclInheritance,
    /// Contract body with 0–2 members: lhs/rhs direct (0 = absent).
    ContractBlockTwo,
    /// Contract body, ≥3 members: `[lhs, rhs)` extra range.
    ContractBlock,

    /// `uint x = 1;` at contract scope. `main_token` = name token,
    /// lhs = type node, rhs = initializer (0 = none). Visibility and
    /// mutability keywords sit between the type and the name in the token
    /// stream and are re-read from there.
    StateVariableDecl,

    /// `struct S { T a; }` — rhs = the single field.
    StructDeclOne,
    /// `struct S { ... }`, ≥2 fields: `[lhs, rhs)` extra range.
    StructDecl,
    /// One struct field: `main_token` = name token, lhs = type node.
    StructField,

    /// `enum E { a }` — rhs = the single member (identifier node).
    EnumDeclOne,
    /// `enum E { a, b, ... }`: `[lhs, rhs)` extra range of identifier nodes.
    EnumDecl,

    /// `error E();`
    ErrorProtoSimple,
    /// `error E(T a);` — rhs = the parameter.
    ErrorProtoOne,
    /// `error E(T a, U b, ...);` — `[lhs, rhs)` extra range.
    ErrorProtoMulti,
    /// Error parameter: `main_token` = name token (0 = unnamed),
    /// lhs = type node.
    ErrorVariableDecl,

    /// `event E();` (`anonymous` is read from the token after `)`).
    EventProtoSimple,
    /// `event E(T a);` — rhs = the parameter.
    EventProtoOne,
    /// `event E(...);` ≥2 params — `[lhs, rhs)` extra range.
    EventProtoMulti,
    /// Event parameter: `main_token` = name token (0 = unnamed),
    /// lhs = type node, rhs = `indexed` token (0 = none).
    EventVariableDecl,

    /// Function/constructor parameter or local declaration:
    /// `main_token` = name token (0 = unnamed), lhs = type node,
    /// rhs = storage location token (0 = none).
    VariableDecl,

    /// Function-ish prototype, no parameters, no returns.
    /// `main_token` = `function`/`constructor`/`fallback`/`receive`;
    /// lhs = extra → [`FnProtoAttrs`] (0 = no specifiers).
    FunctionProtoSimple,
    /// One parameter, no returns: lhs = extra → [`FnProtoAttrs`] (0 = none),
    /// rhs = the parameter.
    FunctionProtoOne,
    /// ≥2 parameters, no returns: lhs = extra → [`FnProtoMulti`].
    FunctionProtoMulti,
    /// Any prototype with a `returns (...)` clause: lhs = extra → [`FnProto`].
    FunctionProto,
    /// A bare specifier keyword (`public`, `view`, `virtual`, ...):
    /// `main_token` = the keyword.
    Specifier,
    /// `override` or `override(A, B)`: `[lhs, rhs)` extra range of path
    /// nodes (empty range = bare `override`).
    OverrideSpecifier,
    /// Prototype plus body: lhs = proto node, rhs = block node.
    FunctionDecl,

    /// `modifier m` with no parameter list or an empty one.
    ModifierProtoSimple,
    /// One parameter: rhs = the parameter.
    ModifierProtoOne,
    /// ≥2 parameters: `[lhs, rhs)` extra range.
    ModifierProtoMulti,
    /// Modifier prototype plus body: lhs = proto, rhs = block.
    ModifierDecl,

    /// `{ ... }` with 0–2 statements: lhs/rhs direct (0 = absent).
    BlockTwo,
    /// `{ ... }` with ≥3 statements: `[lhs, rhs)` extra range.
    Block,
    /// `unchecked { ... }` — lhs = block node.
    UncheckedBlock,
    /// Local declaration statement: lhs = declaration (a `VariableDecl` or
    /// a `TupleInit` of them), rhs = initializer (0 = none).
    /// `main_token` = first token of the statement.
    VariableDeclStatement,
    /// `if (c) body` — lhs = condition, rhs = body.
    IfSimple,
    /// `if (c) body else other` — lhs = condition,
    /// rhs = extra → [`IfBranches`].
    If,
    /// `for (init; cond; step) body` — lhs = extra → [`ForHeader`],
    /// rhs = body.
    For,
    /// `while (c) body` — lhs = condition, rhs = body.
    While,
    /// `do body while (c);` — lhs = body, rhs = condition.
    DoWhile,
    /// `return;` / `return e;` — lhs = expression (0 = none).
    Return,
    Break,
    Continue,
    /// `emit E(...);` — lhs = the call expression.
    Emit,
    /// `revert;` / `revert E(...);` — lhs = call expression (0 = bare).
    Revert,
    /// `try expr returns (...) {} catch ...` — lhs = extra → [`TryHeader`],
    /// rhs = extra → [`SubRange`] of catch clauses.
    TryStatement,
    /// `catch [Identifier] (params) block` — lhs = extra → [`SubRange`] of
    /// parameters (0 = no parameter list), rhs = block. The optional
    /// `Error`/`Panic` identifier is the token after `main_token`.
    CatchClause,
    /// Inline assembly, opaque: lhs/rhs are the `{`/`}` TOKEN indices;
    /// the formatter re-emits the raw source slice.
    AssemblyDecl,

    // Expressions
    Identifier,
    NumberLiteral,
    /// Number literal with a trailing unit denomination identifier
    /// (`10000 gwei`): `main_token` = number token, rhs = unit token.
    NumberLiteralSubDenomination,
    /// String or hex-string literal.
    StringLiteral,
    /// `true` / `false`.
    BoolLiteral,

    // Binary operators: lhs/rhs operands, `main_token` = operator.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exponent,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    LogicalAnd,
    LogicalOr,
    EqualEqual,
    BangEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,

    // Assignment operators: lhs = target, rhs = value.
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignMod,
    AssignBitAnd,
    AssignBitOr,
    AssignBitXor,
    AssignShl,
    AssignShr,

    // Prefix unary: lhs = operand.
    Negation,
    BitNot,
    LogicalNot,
    Increment,
    Decrement,
    /// `x++` — lhs = operand, `main_token` = the operator (after it).
    IncrementPostfix,
    /// `x--`
    DecrementPostfix,
    /// `delete x` — lhs = operand.
    Delete,
    /// `new T` — lhs = type node.
    New,

    /// Call with 0 or 1 argument: lhs = callee, rhs = argument (0 = none).
    /// `main_token` = `(`.
    CallOne,
    /// Call with ≥2 arguments: lhs = callee, rhs = extra → [`SubRange`].
    Call,
    /// `f{value: v, gas: g}` — lhs = callee, rhs = extra → [`SubRange`] of
    /// `FieldInit` nodes. `main_token` = `{`.
    CallOptions,
    /// `name: expr` inside call options or struct literals:
    /// `main_token` = name token, lhs = value.
    FieldInit,
    /// `{a: 1}` — rhs = the single `FieldInit` (0 = empty literal).
    StructInitOne,
    /// `{a: 1, b: 2, ...}` — `[lhs, rhs)` extra range of `FieldInit`.
    StructInit,

    /// `base[index]` — lhs = base, rhs = index (0 = empty, as in `T[]`
    /// used as an expression position). `main_token` = `[`.
    ArrayAccess,
    /// `base.member` — lhs = base, rhs = member TOKEN. `main_token` = `.`.
    FieldAccess,
    /// `c ? t : f` — lhs = condition, rhs = extra → [`TernaryBranches`].
    Conditional,
    /// `(expr)` — lhs = inner expression, rhs = `)` TOKEN.
    GroupedExpression,
    /// `(a, b)` tuple literal or destructuring target: `[lhs, rhs)` extra
    /// range; entries may be 0 for elided slots (`(, a)`).
    TupleInit,
    /// `[e]` / `[]` — rhs = the single element (0 = empty).
    ArrayInitOne,
    /// `[a, b, ...]` — `[lhs, rhs)` extra range.
    ArrayInit,

    // Types
    /// `uint256`, `address`, `bytes32`, ... — `main_token` = type token.
    ElementaryType,
    /// `T[]` / `T[n]` — lhs = element type, rhs = size expression (0 =
    /// dynamic). `main_token` = `[`.
    ArrayType,
    /// `mapping(K => V) [name]` — lhs = extra → [`MappingTypes`],
    /// rhs = trailing name token (0 = none). `main_token` = `mapping`.
    MappingDecl,
    /// `function (...) ... [returns (...)]` type — lhs = extra → [`FnProto`].
    FunctionType,
}

/// A `[start, end)` run of node indices in extra data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubRange {
    pub start: ExtraIndex,
    pub end: ExtraIndex,
}

/// Key and value types of a `mapping`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MappingTypes {
    pub key: NodeIndex,
    pub value: NodeIndex,
}

/// Specifier list of a prototype without returns.
///
/// `[specifiers_start, specifiers_end)` is an extra-data range of specifier
/// nodes (`Specifier`, `OverrideSpecifier`, or modifier-invocation call
/// expressions).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnProtoAttrs {
    pub specifiers_start: ExtraIndex,
    pub specifiers_end: ExtraIndex,
}

/// Specifiers plus a multi-parameter list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnProtoMulti {
    pub specifiers_start: ExtraIndex,
    pub specifiers_end: ExtraIndex,
    pub params_start: ExtraIndex,
    pub params_end: ExtraIndex,
}

/// Full prototype record: specifiers, parameters and return parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FnProto {
    pub specifiers_start: ExtraIndex,
    pub specifiers_end: ExtraIndex,
    pub params_start: ExtraIndex,
    pub params_end: ExtraIndex,
    pub returns_start: ExtraIndex,
    pub returns_end: ExtraIndex,
}

/// Then/else bodies of an `if` with an `else` branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfBranches {
    pub then_body: NodeIndex,
    pub else_body: NodeIndex,
}

/// Branches of a ternary conditional.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TernaryBranches {
    pub then_expr: NodeIndex,
    pub else_expr: NodeIndex,
}

/// Header of a `for` statement. Any field may be 0 (absent).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForHeader {
    pub init: NodeIndex,
    pub cond: NodeIndex,
    pub step: NodeIndex,
}

/// Header of a `try` statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TryHeader {
    pub expr: NodeIndex,
    pub returns_start: ExtraIndex,
    pub returns_end: ExtraIndex,
    pub block: NodeIndex,
}

/// A fixed-shape record stored in the extra-data array.
///
/// Records are encoded field-by-field as `u32`s; the parser appends them
/// with `Parser::add_extra` and readers decode with `Ast::extra_record`.
pub trait ExtraData: Sized {
    /// Number of `u32` fields.
    const LEN: usize;

    fn encode(&self, out: &mut Vec<u32>);
    fn decode(fields: &[u32]) -> Self;
}

impl ExtraData for SubRange {
    const LEN: usize = 2;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.start, self.end]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            start: fields[0],
            end: fields[1],
        }
    }
}

impl ExtraData for MappingTypes {
    const LEN: usize = 2;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.key, self.value]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            key: fields[0],
            value: fields[1],
        }
    }
}

impl ExtraData for FnProtoAttrs {
    const LEN: usize = 2;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.specifiers_start, self.specifiers_end]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            specifiers_start: fields[0],
            specifiers_end: fields[1],
        }
    }
}

impl ExtraData for FnProtoMulti {
    const LEN: usize = 4;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[
            self.specifiers_start,
            self.specifiers_end,
            self.params_start,
            self.params_end,
        ]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            specifiers_start: fields[0],
            specifiers_end: fields[1],
            params_start: fields[2],
            params_end: fields[3],
        }
    }
}

impl ExtraData for FnProto {
    const LEN: usize = 6;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[
            self.specifiers_start,
            self.specifiers_end,
            self.params_start,
            self.params_end,
            self.returns_start,
            self.returns_end,
        ]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            specifiers_start: fields[0],
            specifiers_end: fields[1],
            params_start: fields[2],
            params_end: fields[3],
            returns_start: fields[4],
            returns_end: fields[5],
        }
    }
}

impl ExtraData for IfBranches {
    const LEN: usize = 2;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.then_body, self.else_body]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            then_body: fields[0],
            else_body: fields[1],
        }
    }
}

impl ExtraData for TernaryBranches {
    const LEN: usize = 2;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.then_expr, self.else_expr]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            then_expr: fields[0],
            else_expr: fields[1],
        }
    }
}

impl ExtraData for ForHeader {
    const LEN: usize = 3;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.init, self.cond, self.step]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            init: fields[0],
            cond: fields[1],
            step: fields[2],
        }
    }
}

impl ExtraData for TryHeader {
    const LEN: usize = 4;

    fn encode(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&[self.expr, self.returns_start, self.returns_end, self.block]);
    }

    fn decode(fields: &[u32]) -> Self {
        Self {
            expr: fields[0],
            returns_start: fields[1],
            returns_end: fields[2],
            block: fields[3],
        }
    }
}

/// Columnar, append-only store of nodes.
///
/// Index stability is load-bearing: nodes and extra data reference other
/// nodes by index, so the table only ever grows. The parser seeds slot 0
/// with a placeholder so that 0 stays usable as the null sentinel; the real
/// root is the last node appended.
#[derive(Debug, Default, Clone)]
pub struct NodeList {
    tags: Vec<NodeTag>,
    main_tokens: Vec<TokenIndex>,
    data: Vec<NodeData>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, returning its index.
    #[inline]
    pub fn push(&mut self, node: Node) -> NodeIndex {
        let index = u32::try_from(self.tags.len()).unwrap_or(u32::MAX);
        self.tags.push(node.tag);
        self.main_tokens.push(node.main_token);
        self.data.push(node.data);
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline]
    pub fn tag(&self, index: NodeIndex) -> NodeTag {
        self.tags[index as usize]
    }

    #[inline]
    pub fn main_token(&self, index: NodeIndex) -> TokenIndex {
        self.main_tokens[index as usize]
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> NodeData {
        self.data[index as usize]
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Node {
        Node {
            tag: self.tag(index),
            main_token: self.main_token(index),
            data: self.data(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_returns_stable_indices() {
        let mut nodes = NodeList::new();
        let a = nodes.push(Node {
            tag: NodeTag::Root,
            main_token: 0,
            data: NodeData::default(),
        });
        let b = nodes.push(Node {
            tag: NodeTag::Identifier,
            main_token: 3,
            data: NodeData { lhs: 0, rhs: 0 },
        });
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(nodes.tag(b), NodeTag::Identifier);
        assert_eq!(nodes.main_token(b), 3);
    }

    #[test]
    fn extra_record_round_trip() {
        let proto = FnProto {
            specifiers_start: 1,
            specifiers_end: 3,
            params_start: 3,
            params_end: 5,
            returns_start: 5,
            returns_end: 6,
        };
        let mut buf = Vec::new();
        proto.encode(&mut buf);
        assert_eq!(buf.len(), FnProto::LEN);
        assert_eq!(FnProto::decode(&buf), proto);
    }

    #[test]
    fn for_header_round_trip() {
        let header = ForHeader {
            init: 4,
            cond: 7,
            step: 0,
        };
        let mut buf = Vec::new();
        header.encode(&mut buf);
        assert_eq!(ForHeader::decode(&buf), header);
    }
}
