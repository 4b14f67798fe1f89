//! Grammar productions.
//!
//! Each module extends [`Parser`](crate::Parser) with methods for one
//! production family:
//!
//! - [`source_unit`]: top-level driver, pragma/import/using directives
//! - [`contract`]: contract-kind declarations, bodies, state variables
//! - [`function`]: function/constructor/fallback/receive/modifier
//!   prototypes, parameter lists, specifiers
//! - [`types`]: type expressions (elementary, paths, arrays, mappings,
//!   function types)
//! - [`statement`]: statements and blocks
//! - [`expression`]: precedence-climbing expression parsing
//!
//! Every production advances the cursor only on successful matches,
//! appends exactly its rule's nodes, and returns the root node index of
//! what it built. On mismatch it records a `ParseError` and either
//! recovers at its own boundary set or propagates `ParsingError` to the
//! caller's recovery point.

mod contract;
mod expression;
mod function;
mod source_unit;
mod statement;
mod types;
