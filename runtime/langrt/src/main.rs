//! Lang runtime CLI
//!
//! Inspects module manifests, module archives and the lang vars of a fresh
//! interpreter.

use langrt::commands::{inspect_archive, print_manifest, print_vars};

fn main() {
    langrt::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "manifest" => {
            if args.len() < 3 {
                eprintln!("Usage: langrt manifest <data.lmc>");
                std::process::exit(1);
            }
            print_manifest(&args[2]);
        }
        "inspect" => {
            if args.len() < 3 {
                eprintln!("Usage: langrt inspect <module.lm>");
                std::process::exit(1);
            }
            inspect_archive(&args[2]);
        }
        "vars" => {
            print_vars();
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("langrt {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Lang runtime tools");
    println!();
    println!("Usage: langrt <command> [options]");
    println!();
    println!("Commands:");
    println!("  manifest <file>      Parse a module manifest and print its fields");
    println!("  inspect <archive>    Print the manifest and entries of a module archive");
    println!("  vars                 Print the lang vars of a fresh root scope");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=lang_eval=debug) to enable logging.");
}
