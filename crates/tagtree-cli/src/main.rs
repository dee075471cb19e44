use clap::{ArgAction, Parser, Subcommand};
use std::io::Read;
use std::path::Path;
use tagtree_lexer::Token;
use tagtree_parser::{ParseOptions, Tree};

mod logger;

#[derive(Parser)]
#[command(name = "tagtree")]
#[command(about = "tagtree — markup template tokenizer and tree builder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a template
    Tokens {
        /// Input file, or `-` for stdin
        path: String,

        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print the node tree of a template
    Tree {
        /// Input file, or `-` for stdin
        path: String,

        /// Print the node arena as JSON instead of an outline
        #[arg(long)]
        json: bool,

        /// Reject closing tags whose name differs from the open element
        #[arg(long)]
        strict: bool,
    },

    /// Check a template for errors without printing the tree
    Check {
        /// Input file, or `-` for stdin
        path: String,

        /// Reject closing tags whose name differs from the open element
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(logger::level_for(cli.verbose, cli.quiet)) {
        eprintln!("Error: could not install logger: {e}");
    }

    match cli.command {
        Command::Tokens { path, json } => cmd_tokens(&path, json),
        Command::Tree { path, json, strict } => cmd_tree(&path, json, strict),
        Command::Check { path, strict } => cmd_check(&path, strict),
    }
}

fn read_source(path: &str) -> String {
    if path == "-" {
        let mut source = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        }
        return source;
    }

    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_tree(path: &str, strict: bool) -> Tree {
    let source = read_source(path);
    let options = ParseOptions {
        check_closing_tags: strict,
    };
    log::info!("parsing {path} ({} bytes)", source.len());

    match tagtree_parser::Parser::parse_with(&source, options) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{e}");
            if !e.remaining.is_empty() {
                eprintln!("  remaining input: {}", excerpt(&e.remaining));
            }
            std::process::exit(1);
        }
    }
}

fn cmd_tokens(path: &str, json: bool) {
    let source = read_source(path);

    let tokens = match tagtree_lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&tokens);
    } else {
        print!("{}", format_tokens(&tokens));
    }
}

fn cmd_tree(path: &str, json: bool, strict: bool) {
    let tree = parse_tree(path, strict);

    if json {
        print_json(&tree);
    } else {
        print!("{}", tree.outline());
    }
}

fn cmd_check(path: &str, strict: bool) {
    let tree = parse_tree(path, strict);
    log::info!("{path}: {} nodes", tree.len());
    eprintln!("OK: {path}");
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}

/// One token per line: `line:column kind "text"`.
fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| {
            format!(
                "{}:{}\t{}\t{:?}\n",
                t.span.line, t.span.column, t.kind, t.text
            )
        })
        .collect()
}

/// At most 40 characters of `text`, marking the cut.
fn excerpt(text: &str) -> String {
    const MAX: usize = 40;
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{:?}...", &text[..cut]),
        None => format!("{text:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["tagtree", "-vv", "tree", "page.html", "--strict"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Tree { json: false, strict: true, .. }
        ));
    }

    #[test]
    fn test_format_tokens() {
        let tokens = tagtree_lexer::tokenize("<b>\nhi").unwrap();
        assert_eq!(
            format_tokens(&tokens),
            "1:1\t'<'\t\"<\"\n1:2\tbareword\t\"b\"\n1:3\t'>'\t\">\"\n1:4\tline break\t\"\\n\"\n2:1\tbareword\t\"hi\"\n"
        );
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("</p>"), "\"</p>\"");
        let long = "a".repeat(50);
        assert_eq!(excerpt(&long), format!("{:?}...", "a".repeat(40)));
    }
}
