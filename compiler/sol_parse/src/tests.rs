//! Parser integration tests: node shapes, error accumulation, recovery.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use sol_ast::{Ast, NodeIndex, NodeTag, ParseErrorTag, SubRange};

use crate::parse;

fn parse_clean(source: &str) -> Ast {
    let ast = parse(source);
    assert_eq!(ast.errors(), &[], "unexpected parse errors for {source:?}");
    ast
}

/// Tag of the only top-level declaration.
fn single_decl(ast: &Ast) -> NodeIndex {
    let decls = ast.root_decls();
    assert_eq!(decls.len(), 1, "expected a single declaration");
    decls[0]
}

#[test]
fn enum_multi_member() {
    let ast = parse_clean("enum foo{bar, baz}");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::EnumDecl);
    let data = ast.node_data(decl);
    assert_eq!(ast.extra_nodes(data.lhs, data.rhs).len(), 2);
}

#[test]
fn enum_single_member() {
    let ast = parse_clean("enum foo{bar}");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::EnumDeclOne);
    let member = ast.node_data(decl).rhs;
    assert_eq!(ast.node_tag(member), NodeTag::Identifier);
}

#[test]
fn enum_trailing_comma_is_error() {
    let ast = parse("enum foo{bar, baz,}");
    assert!(
        ast.errors()
            .iter()
            .any(|e| e.tag == ParseErrorTag::TrailingComma),
        "expected a trailing-comma error, got {:?}",
        ast.errors()
    );
}

#[test]
fn error_proto_multi_shape() {
    let ast = parse_clean("error Foo(uint foo, foo bar);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::ErrorProtoMulti);
    let data = ast.node_data(decl);
    let params = ast.extra_nodes(data.lhs, data.rhs);
    assert_eq!(params.len(), 2);
    for &param in params {
        assert_eq!(ast.node_tag(param), NodeTag::ErrorVariableDecl);
    }
}

#[test]
fn error_proto_one_and_simple_shapes() {
    let ast = parse_clean("error A();");
    assert_eq!(ast.node_tag(single_decl(&ast)), NodeTag::ErrorProtoSimple);

    let ast = parse_clean("error B(uint x);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::ErrorProtoOne);
    assert_eq!(
        ast.node_tag(ast.node_data(decl).rhs),
        NodeTag::ErrorVariableDecl
    );
}

#[test]
fn nested_named_mapping() {
    let ast = parse_clean("mapping(uint => mapping(uint => int)foo)bar");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::MappingDecl);

    let outer = ast.node_data(decl);
    // Outer trailing name is `bar`.
    assert!(outer.rhs != 0);

    let types: sol_ast::MappingTypes = ast.extra_record(outer.lhs);
    assert_eq!(ast.node_tag(types.key), NodeTag::ElementaryType);
    assert_eq!(ast.node_tag(types.value), NodeTag::MappingDecl);

    // Inner mapping carries `foo`.
    let inner = ast.node_data(types.value);
    assert!(inner.rhs != 0);
    let inner_types: sol_ast::MappingTypes = ast.extra_record(inner.lhs);
    assert_eq!(ast.node_tag(inner_types.value), NodeTag::ElementaryType);
}

#[test]
fn mapping_missing_arrow_is_error() {
    let ast = parse("mapping(uint uint) m;");
    assert!(!ast.errors().is_empty());
}

#[test]
fn event_shapes_and_indexed() {
    let ast = parse_clean("event A();");
    assert_eq!(ast.node_tag(single_decl(&ast)), NodeTag::EventProtoSimple);

    let ast = parse_clean("event B(address indexed who);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::EventProtoOne);
    let param = ast.node_data(decl).rhs;
    assert_eq!(ast.node_tag(param), NodeTag::EventVariableDecl);
    // The indexed token is recorded on the parameter.
    assert!(ast.node_data(param).rhs != 0);

    let ast = parse_clean("event C(uint a, uint b, uint c) anonymous;");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::EventProtoMulti);
    let data = ast.node_data(decl);
    assert_eq!(ast.extra_nodes(data.lhs, data.rhs).len(), 3);
}

#[test]
fn event_calldata_param_is_error() {
    let ast = parse("event E(bytes calldata data);");
    assert!(
        ast.errors()
            .iter()
            .any(|e| e.tag == ParseErrorTag::DisallowedStorageLocation),
        "expected a storage-location error, got {:?}",
        ast.errors()
    );
}

#[test]
fn function_proto_shapes() {
    let ast = parse_clean("function f();");
    assert_eq!(
        ast.node_tag(single_decl(&ast)),
        NodeTag::FunctionProtoSimple
    );

    let ast = parse_clean("function f(uint a);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::FunctionProtoOne);
    assert_eq!(ast.node_tag(ast.node_data(decl).rhs), NodeTag::VariableDecl);

    let ast = parse_clean("function f(uint a, bool b);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::FunctionProtoMulti);
    let record: sol_ast::FnProtoMulti = ast.extra_record(ast.node_data(decl).lhs);
    assert_eq!(
        ast.extra_nodes(record.params_start, record.params_end).len(),
        2
    );

    let ast = parse_clean("function f(uint a) public view returns (uint);");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::FunctionProto);
    let record: sol_ast::FnProto = ast.extra_record(ast.node_data(decl).lhs);
    assert_eq!(
        ast.extra_nodes(record.specifiers_start, record.specifiers_end)
            .len(),
        2
    );
    assert_eq!(
        ast.extra_nodes(record.returns_start, record.returns_end).len(),
        1
    );
}

#[test]
fn contract_with_members() {
    let source = "contract Vault is Base, Owned {\n\
                  uint256 public total;\n\
                  event Deposit(address indexed from, uint256 amount);\n\
                  function deposit(uint256 amount) public payable returns (bool) {\n\
                  total = total + amount;\n\
                  return true;\n\
                  }\n\
                  }";
    let ast = parse_clean(source);
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::ContractDeclInheritance);

    let bases: SubRange = ast.extra_record(ast.node_data(decl).lhs);
    assert_eq!(ast.extra_nodes(bases.start, bases.end).len(), 2);

    let body = ast.node_data(decl).rhs;
    assert_eq!(ast.node_tag(body), NodeTag::ContractBlock);
    let members = ast.node_data(body);
    let members = ast.extra_nodes(members.lhs, members.rhs);
    assert_eq!(members.len(), 3);
    assert_eq!(ast.node_tag(members[0]), NodeTag::StateVariableDecl);
    assert_eq!(ast.node_tag(members[1]), NodeTag::EventProtoMulti);
    assert_eq!(ast.node_tag(members[2]), NodeTag::FunctionDecl);
}

#[test]
fn abstract_contract_and_interface() {
    let ast = parse_clean("abstract contract A {}\ninterface I {}\nlibrary L {}");
    let decls = ast.root_decls();
    assert_eq!(decls.len(), 3);
    for &decl in decls {
        assert_eq!(ast.node_tag(decl), NodeTag::ContractDecl);
    }
}

#[test]
fn precedence_shapes() {
    let ast = parse_clean("contract C { function f() public { x = a + b * c; } }");
    // Walk: contract -> body -> function decl -> block -> assign.
    let contract = single_decl(&ast);
    let body = ast.node_data(contract).rhs;
    let member = ast.node_data(body).lhs;
    let block = ast.node_data(member).rhs;
    let stmt = ast.node_data(block).lhs;
    assert_eq!(ast.node_tag(stmt), NodeTag::Assign);
    let add = ast.node_data(stmt).rhs;
    assert_eq!(ast.node_tag(add), NodeTag::Add);
    let mul = ast.node_data(add).rhs;
    assert_eq!(ast.node_tag(mul), NodeTag::Mul);
}

#[test]
fn exponent_is_right_associative() {
    let ast = parse_clean("contract C { uint x = 2 ** 3 ** 4; }");
    let contract = single_decl(&ast);
    let body = ast.node_data(contract).rhs;
    let state_var = ast.node_data(body).lhs;
    let exp = ast.node_data(state_var).rhs;
    assert_eq!(ast.node_tag(exp), NodeTag::Exponent);
    // Right operand is itself an exponent: 2 ** (3 ** 4).
    assert_eq!(ast.node_tag(ast.node_data(exp).rhs), NodeTag::Exponent);
    assert_eq!(ast.node_tag(ast.node_data(exp).lhs), NodeTag::NumberLiteral);
}

#[test]
fn number_with_denomination() {
    let ast = parse_clean("contract C { uint x = 10000 gwei; }");
    let contract = single_decl(&ast);
    let body = ast.node_data(contract).rhs;
    let state_var = ast.node_data(body).lhs;
    let literal = ast.node_data(state_var).rhs;
    assert_eq!(ast.node_tag(literal), NodeTag::NumberLiteralSubDenomination);
}

#[test]
fn statements_round_out() {
    let source = "contract C {\n\
                  function f(uint n) public returns (uint) {\n\
                  uint acc = 0;\n\
                  for (uint i = 0; i < n; i++) { acc += i; }\n\
                  while (acc > 100) { acc--; }\n\
                  do { acc++; } while (acc < 10);\n\
                  if (acc == 0) { return 0; } else { acc = acc / 2; }\n\
                  unchecked { acc = acc * 2; }\n\
                  assembly { let x := 1 }\n\
                  return acc;\n\
                  }\n\
                  }";
    let ast = parse_clean(source);
    assert_eq!(ast.root_decls().len(), 1);
}

#[test]
fn try_catch_statement() {
    let source = "contract C {\n\
                  function f(address t) public {\n\
                  try Feed(t).latest() returns (uint v) {\n\
                  emit Got(v);\n\
                  } catch Error(string memory reason) {\n\
                  emit Failed(reason);\n\
                  } catch {\n\
                  revert();\n\
                  }\n\
                  }\n\
                  }";
    let ast = parse_clean(source);
    assert_eq!(ast.root_decls().len(), 1);
}

#[test]
fn directives_parse() {
    let source = "pragma solidity ^0.8.0;\n\
                  import \"./a.sol\";\n\
                  import \"./b.sol\" as b;\n\
                  import * as c from \"./c.sol\";\n\
                  import {X, Y} from \"./d.sol\";\n\
                  using SafeMath for uint256;";
    let ast = parse_clean(source);
    let decls = ast.root_decls();
    assert_eq!(decls.len(), 6);
    assert_eq!(ast.node_tag(decls[0]), NodeTag::PragmaDirective);
    assert_eq!(ast.node_tag(decls[1]), NodeTag::ImportDirectivePath);
    assert_eq!(ast.node_tag(decls[2]), NodeTag::ImportDirectivePathIdentifier);
    assert_eq!(ast.node_tag(decls[3]), NodeTag::ImportDirectiveAsterisk);
    assert_eq!(ast.node_tag(decls[4]), NodeTag::ImportDirectiveSymbol);
    assert_eq!(ast.node_tag(decls[5]), NodeTag::UsingDirective);
}

#[test]
fn struct_shapes() {
    let ast = parse_clean("struct S { uint a; }");
    assert_eq!(ast.node_tag(single_decl(&ast)), NodeTag::StructDeclOne);

    let ast = parse_clean("struct S { uint a; address b; }");
    let decl = single_decl(&ast);
    assert_eq!(ast.node_tag(decl), NodeTag::StructDecl);
    let data = ast.node_data(decl);
    assert_eq!(ast.extra_nodes(data.lhs, data.rhs).len(), 2);
}

#[test]
fn error_accumulation_preserves_siblings() {
    // Three malformed declarations between well-formed ones.
    let source = "enum a{x,}\n\
                  enum ok1{p}\n\
                  enum b{,}\n\
                  enum ok2{q, r}\n\
                  enum c{y,}\n\
                  enum ok3{s}";
    let ast = parse(source);
    assert_eq!(ast.errors().len(), 3, "errors: {:?}", ast.errors());

    let tags: Vec<NodeTag> = ast
        .root_decls()
        .iter()
        .map(|&d| ast.node_tag(d))
        .collect();
    assert_eq!(
        tags,
        vec![NodeTag::EnumDeclOne, NodeTag::EnumDecl, NodeTag::EnumDeclOne]
    );
}

#[test]
fn missing_semicolon_reported() {
    let ast = parse("error Foo(uint a)");
    assert!(ast
        .errors()
        .iter()
        .any(|e| e.tag == ParseErrorTag::ExpectedSemicolon));
}

#[test]
fn empty_source_has_empty_root() {
    let ast = parse_clean("");
    assert!(ast.root_decls().is_empty());
    assert_eq!(ast.node_tag(ast.root()), NodeTag::Root);
}

#[test]
fn garbage_input_terminates_with_errors() {
    let ast = parse("@@ ## ??");
    assert!(!ast.errors().is_empty());
    assert_eq!(ast.node_tag(ast.root()), NodeTag::Root);
}
