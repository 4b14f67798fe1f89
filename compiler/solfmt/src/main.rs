//! Solidity parser and formatter CLI.

use solfmt::{run_fmt, run_lex, run_parse};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let code = match command.as_str() {
        "fmt" => {
            let mut write = false;
            let mut check = false;
            let mut path = None;
            for arg in args.iter().skip(2) {
                match arg.as_str() {
                    "--write" | "-w" => write = true,
                    "--check" => check = true,
                    other if !other.starts_with('-') && path.is_none() => {
                        path = Some(other.to_string());
                    }
                    other => {
                        eprintln!("error: unknown option '{other}'");
                        std::process::exit(1);
                    }
                }
            }
            let Some(path) = path else {
                eprintln!("Usage: solfmt fmt <file.sol> [--write] [--check]");
                std::process::exit(1);
            };
            run_fmt(&path, write, check)
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: solfmt parse <file.sol>");
                std::process::exit(1);
            }
            run_parse(&args[2])
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: solfmt lex <file.sol>");
                std::process::exit(1);
            }
            run_lex(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("Solidity source parser and formatter");
    println!();
    println!("Usage: solfmt <command> [options]");
    println!();
    println!("Commands:");
    println!("  fmt <file.sol>      Print formatted source");
    println!("      --write, -w     Rewrite the file in place");
    println!("      --check         Exit nonzero if formatting would change the file");
    println!("  parse <file.sol>    Parse and report diagnostics");
    println!("  lex <file.sol>      Dump the token stream");
    println!("  help                Show this help");
}
