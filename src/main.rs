use arith_interpreter::*;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Report, WrapErr};
use std::{fs, io::{self, BufRead, Write}};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Maximum parenthesis nesting accepted by the parser.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tokens of an expression file.
    Tokenize { filename: PathBuf },
    /// Print the syntax tree of an expression file in prefix form.
    Parse { filename: PathBuf },
    /// Evaluate a single expression.
    Eval { expression: String },
    /// Interactive calculator.
    Calc,
    /// Evaluate every non-empty line of a file.
    Batch { filename: PathBuf },
}

fn read_source(filename: &Path) -> miette::Result<String> {
    fs::read_to_string(filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading '{}' failed", filename.display()))
}

fn report(err: Error, source: &str) -> Report {
    Report::new(err).with_source_code(source.to_string())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { filename } => {
            let file_contents = read_source(&filename)?;

            for token in Lexer::new(&file_contents) {
                match token {
                    Ok(token) => println!("{:?}", token),
                    Err(e) => return Err(report(e.into(), &file_contents)),
                }
            }
        }
        Commands::Parse { filename } => {
            let file_contents = read_source(&filename)?;

            let mut parser = parser::Parser::with_max_depth(&file_contents, cli.max_depth);
            match parser.parse() {
                Ok(tree) => println!("{tree}"),
                Err(e) => return Err(report(e, &file_contents)),
            }
        }
        Commands::Eval { expression } => {
            match evaluate_with_max_depth(&expression, cli.max_depth) {
                Ok(res) => println!("{res}"),
                Err(e) => return Err(report(e, &expression)),
            }
        }
        Commands::Calc => {
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print!("calc> ");
                io::stdout().flush().into_diagnostic()?;

                let Some(input) = lines.next() else {
                    println!();
                    break;
                };
                let input = input.into_diagnostic().wrap_err("reading stdin failed")?;
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }

                match evaluate_with_max_depth(input, cli.max_depth) {
                    Ok(res) => println!("{res}"),
                    Err(e) => eprintln!("{:?}", report(e, input)),
                }
            }
        }
        Commands::Batch { filename } => {
            let file_contents = read_source(&filename)?;

            for expression in file_contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
                match evaluate_with_max_depth(expression, cli.max_depth) {
                    Ok(res) => println!("{expression} = {res}"),
                    Err(e) => eprintln!("{:?}", report(e, expression)),
                }
            }
        }
    }

    Ok(())
}
