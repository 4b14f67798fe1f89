//! Command implementations for the `solfmt` CLI.
//!
//! The CLI is thin glue over the library crates: load a `.sol` file, run
//! the parser, print diagnostics or formatted output. Nothing here is part
//! of the core parse/format pipeline.

use std::fs;
use std::path::Path;

use sol_ast::Ast;

/// Exit code for parse failures and check mismatches.
pub const EXIT_FAILURE: i32 = 1;

/// Render accumulated parse errors as `file:line:col: error: message`.
pub fn render_errors(path: &str, ast: &Ast) -> String {
    let mut out = String::new();
    for error in ast.errors() {
        let offset = if (error.token as usize) < ast.tokens().len() {
            ast.token_start(error.token)
        } else {
            0
        };
        let (line, col) = ast.offset_to_line_col(offset);
        out.push_str(&format!("{path}:{line}:{col}: error: {}\n", error.tag));
    }
    out
}

fn load_source(path: &str) -> Result<String, i32> {
    match fs::read_to_string(Path::new(path)) {
        Ok(source) => Ok(source),
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            Err(EXIT_FAILURE)
        }
    }
}

/// `solfmt fmt <file>` — print formatted source. With `write`, rewrite the
/// file in place; with `check`, print nothing and fail when formatting
/// would change the file.
pub fn run_fmt(path: &str, write: bool, check: bool) -> i32 {
    let source = match load_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let ast = sol_parse::parse(&source);
    if !ast.errors().is_empty() {
        eprint!("{}", render_errors(path, &ast));
        return EXIT_FAILURE;
    }

    let formatted = sol_fmt::format(&ast);
    if check {
        if formatted == source {
            return 0;
        }
        eprintln!("{path}: not formatted");
        return EXIT_FAILURE;
    }
    if write {
        if let Err(err) = fs::write(Path::new(path), &formatted) {
            eprintln!("error: cannot write {path}: {err}");
            return EXIT_FAILURE;
        }
        return 0;
    }
    print!("{formatted}");
    0
}

/// `solfmt parse <file>` — parse and report diagnostics or a summary.
pub fn run_parse(path: &str) -> i32 {
    let source = match load_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let ast = sol_parse::parse(&source);
    if ast.errors().is_empty() {
        println!(
            "{path}: {} declarations, {} nodes",
            ast.root_decls().len(),
            ast.node_count()
        );
        0
    } else {
        eprint!("{}", render_errors(path, &ast));
        EXIT_FAILURE
    }
}

/// `solfmt lex <file>` — dump the token stream.
pub fn run_lex(path: &str) -> i32 {
    let source = match load_source(path) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let tokens = sol_lexer::tokenize(&source);
    #[allow(clippy::cast_possible_truncation)]
    for i in 0..tokens.len() as u32 {
        let tag = tokens.tag(i);
        let start = tokens.start(i);
        if tag == sol_ast::TokenTag::Eof {
            println!("{start}: Eof");
            break;
        }
        let text = sol_lexer::token_slice(&source, start);
        println!("{start}: {tag:?} {text:?}");
    }
    0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn fmt_rewrites_in_place() {
        let file = temp_file("enum   foo{bar}");
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(run_fmt(&path, true, false), 0);
        let rewritten = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(rewritten, "enum foo { bar }\n");
    }

    #[test]
    fn check_flags_unformatted_files() {
        let file = temp_file("enum   foo{bar}");
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(run_fmt(&path, false, true), EXIT_FAILURE);

        let formatted = temp_file("enum foo { bar }\n");
        let path = formatted.path().to_str().unwrap().to_string();
        assert_eq!(run_fmt(&path, false, true), 0);
    }

    #[test]
    fn parse_reports_errors_with_location() {
        let file = temp_file("enum foo{bar, baz,}");
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(run_parse(&path), EXIT_FAILURE);
    }

    #[test]
    fn render_errors_formats_line_and_column() {
        let ast = sol_parse::parse("enum foo{bar, baz,}");
        let rendered = render_errors("in.sol", &ast);
        assert!(rendered.starts_with("in.sol:1:"), "got: {rendered}");
        assert!(rendered.contains("error:"), "got: {rendered}");
    }

    #[test]
    fn missing_file_fails() {
        assert_eq!(run_parse("/nonexistent/input.sol"), EXIT_FAILURE);
    }
}
