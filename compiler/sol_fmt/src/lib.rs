//! Code formatter for Solidity source.
//!
//! Walks the node table produced by `sol_parse` and re-emits normalized
//! source text: single spaces between tokens, configurable indentation,
//! minimal parenthesization, `_one`/`_simple` container shapes on one
//! line. Read-only over the [`Ast`](sol_ast::Ast) — formatting is a pure
//! function of `(ast, node)`, so it is idempotent per subtree.
//!
//! # Modules
//!
//! - [`emitter`]: output abstraction ([`Emitter`], [`StringEmitter`])
//! - [`context`]: [`FormatConfig`]
//! - [`formatter`]: the per-tag structural recursion

pub mod context;
pub mod emitter;
pub mod formatter;

pub use context::{FormatConfig, INDENT_WIDTH};
pub use emitter::{Emitter, StringEmitter};
pub use formatter::Formatter;

use sol_ast::Ast;

/// Format a whole source unit with the default configuration.
pub fn format(ast: &Ast) -> String {
    format_with_config(ast, FormatConfig::default())
}

/// Format a whole source unit.
pub fn format_with_config(ast: &Ast, config: FormatConfig) -> String {
    let mut emitter = StringEmitter::with_capacity(ast.source().len() + 16);
    Formatter::with_config(ast, &mut emitter, config).format_source_unit();
    emitter.ensure_trailing_newline();
    emitter.output()
}

#[cfg(test)]
mod tests;
