//! Formatter tests: canonical output, round-trip stability, idempotence.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sol_ast::{Ast, NodeTag};
use sol_parse::{parse, Parser};

use crate::{format, Formatter, StringEmitter};

fn parse_clean(source: &str) -> Ast {
    let ast = parse(source);
    assert_eq!(ast.errors(), &[], "unexpected parse errors for {source:?}");
    ast
}

/// All node tags in table order — the round-trip comparison key.
#[allow(clippy::cast_possible_truncation)]
fn tag_sequence(ast: &Ast) -> Vec<NodeTag> {
    (0..ast.node_count() as u32).map(|i| ast.node_tag(i)).collect()
}

/// Format a standalone expression through the public entry points.
fn format_expression_source(source: &str) -> String {
    let tokens = sol_lexer::tokenize(source);
    let mut parser = Parser::new(source, &tokens);
    let expr = parser.parse_expression().unwrap();
    let (nodes, extra, errors) = parser.finish();
    assert!(errors.is_empty());
    let ast = Ast::new(source.to_string(), tokens, nodes, extra, errors);

    let mut out = StringEmitter::new();
    Formatter::new(&ast, &mut out).format_expression(expr, 0);
    out.output()
}

#[test]
fn number_literal_keeps_denomination() {
    assert_eq!(format_expression_source("10000 gwei"), "10000 gwei");
    assert_eq!(format_expression_source("1 ether"), "1 ether");
}

#[test]
fn expression_normalization() {
    assert_eq!(format_expression_source("a+b*c"), "a + b * c");
    assert_eq!(format_expression_source("(a+b)*c"), "(a + b) * c");
    assert_eq!(format_expression_source("a?b:c"), "a ? b : c");
    assert_eq!(format_expression_source("x[1].f(2)"), "x[1].f(2)");
    assert_eq!(format_expression_source("new  Vault ( a,b )"), "new Vault(a, b)");
    assert_eq!(
        format_expression_source("f{value:1,gas:g}(x)"),
        "f{value: 1, gas: g}(x)"
    );
}

#[test]
fn enum_one_is_single_line() {
    let ast = parse_clean("enum   foo{bar}");
    assert_eq!(format(&ast), "enum foo { bar }\n");
}

#[test]
fn enum_multi_is_stacked() {
    let ast = parse_clean("enum foo{bar, baz}");
    assert_eq!(format(&ast), "enum foo {\n    bar,\n    baz\n}\n");
}

#[test]
fn struct_shapes_follow_arity() {
    let ast = parse_clean("struct S{uint a;}");
    assert_eq!(format(&ast), "struct S { uint a; }\n");

    let ast = parse_clean("struct S{uint a;address b;}");
    assert_eq!(
        format(&ast),
        "struct S {\n    uint a;\n    address b;\n}\n"
    );
}

#[test]
fn contract_canonical_form() {
    let ast = parse_clean("contract   C{uint256   public total=0;}");
    assert_eq!(
        format(&ast),
        "contract C {\n    uint256 public total = 0;\n}\n"
    );
}

#[test]
fn empty_contract_braces_stay_inline() {
    let ast = parse_clean("contract A {   }");
    assert_eq!(format(&ast), "contract A {}\n");
}

#[test]
fn error_proto_single_line_params() {
    let ast = parse_clean("error Foo( uint foo , foo bar );");
    assert_eq!(format(&ast), "error Foo(uint foo, foo bar);\n");
}

#[test]
fn event_keeps_indexed_and_anonymous() {
    let ast = parse_clean("event E(address  indexed from,uint v)anonymous;");
    assert_eq!(format(&ast), "event E(address indexed from, uint v) anonymous;\n");
}

#[test]
fn mapping_declaration_formats() {
    let ast = parse_clean("mapping(uint => mapping(uint => int)foo)bar");
    assert_eq!(
        format(&ast),
        "mapping(uint => mapping(uint => int) foo) bar\n"
    );
}

const ROUND_TRIP_SOURCES: &[&str] = &[
    "enum foo{bar, baz}",
    "enum foo{bar}",
    "error Foo(uint foo, foo bar);",
    "mapping(uint => mapping(uint => int)foo)bar",
    "pragma solidity ^0.8.0;\nimport {A, B} from \"./x.sol\";\nusing Lib for uint256;",
    "struct Point { uint128 x; uint128 y; }",
    "contract Empty {}",
    "abstract contract Base is Parent, Mixin(1) {\n  uint public x;\n}",
    "interface IFeed {\n  function latest() external view returns (uint256);\n}",
    "contract Vault {\n\
     uint256 public total;\n\
     mapping(address => uint256) balances;\n\
     event Deposit(address indexed who, uint256 amount);\n\
     error Empty();\n\
     modifier guarded(uint cap) { _; }\n\
     constructor() payable {}\n\
     receive() external payable {}\n\
     function deposit(uint256 amount) public payable guarded(10) returns (bool ok) {\n\
     uint256 fee = amount * 3 / 1000;\n\
     total += amount - fee;\n\
     balances[msg.sender] = balances[msg.sender] + amount;\n\
     emit Deposit(msg.sender, amount);\n\
     return true;\n\
     }\n\
     function sweep() external {\n\
     for (uint i = 0; i < 10; i++) { total--; }\n\
     while (total > 100) { total = total / 2; }\n\
     do { total++; } while (total < 10);\n\
     if (total == 0) { revert Empty(); } else { total = 1; }\n\
     unchecked { total = total * 2; }\n\
     assembly { let x := 1 }\n\
     (uint a, uint b) = (1, 2);\n\
     delete balances[msg.sender];\n\
     }\n\
     }",
    "contract Caster {\n\
     function cast(address a) public pure returns (uint160) {\n\
     return uint160(address(a));\n\
     }\n\
     function pay(address payable to) public {\n\
     to.transfer(1 ether);\n\
     }\n\
     }",
    "contract Try {\n\
     function f(address t) public {\n\
     try Feed(t).latest() returns (uint v) { emit Got(v); }\n\
     catch Error(string memory reason) { emit Bad(reason); }\n\
     catch {}\n\
     }\n\
     event Got(uint v);\n\
     event Bad(string r);\n\
     }",
];

/// Re-parsing formatted output yields the same node-tag sequence.
#[test]
fn round_trip_preserves_tag_sequence() {
    for source in ROUND_TRIP_SOURCES {
        let first = parse_clean(source);
        let formatted = format(&first);
        let second = parse(&formatted);
        assert_eq!(
            second.errors(),
            &[],
            "formatted output failed to re-parse:\n{formatted}"
        );
        assert_eq!(
            tag_sequence(&first),
            tag_sequence(&second),
            "tag sequence drifted for:\n{source}\nformatted:\n{formatted}"
        );
    }
}

/// format(parse(format(parse(s)))) is byte-identical to format(parse(s)).
#[test]
fn formatting_is_idempotent() {
    for source in ROUND_TRIP_SOURCES {
        let once = format(&parse_clean(source));
        let twice = format(&parse(&once));
        assert_eq!(once, twice, "not idempotent for:\n{source}");
    }
}

/// Partial trees from errored parses still format their good subtrees.
#[test]
fn partial_tree_formats_good_siblings() {
    let ast = parse("enum a{x,}\nenum ok{p, q}\n");
    assert!(!ast.errors().is_empty());
    let formatted = format(&ast);
    assert_eq!(formatted, "enum ok {\n    p,\n    q\n}\n");
}

proptest! {
    /// Idempotence over the sample pool, indices chosen by proptest.
    #[test]
    fn idempotent_on_sampled_sources(index in 0..ROUND_TRIP_SOURCES.len()) {
        let source = ROUND_TRIP_SOURCES[index];
        let once = format(&parse(source));
        let twice = format(&parse(&once));
        prop_assert_eq!(once, twice);
    }
}
