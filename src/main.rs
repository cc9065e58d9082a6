// ABOUTME: Binary entry point: CLI argument parsing, script mode, and REPL mode

mod ast;
mod builtins;
mod env;
mod error;
mod eval;
mod lexer;
mod parser;
mod token;
mod value;

use std::path::PathBuf;

use clap::Parser as ClapParser;
use env::Environment;
use error::CliError;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WELCOME_MESSAGE: &str = "Hello! This is the glint language REPL.";
const HISTORY_FILE: &str = ".glint_history";

/// A tree-walking interpreter for a small, dynamically typed scripting language.
#[derive(ClapParser, Debug)]
#[command(name = "glint", version = VERSION)]
struct CliArgs {
    /// Path to a source file. With no path, starts an interactive REPL.
    script: Option<PathBuf>,
}

fn main() {
    let args = CliArgs::parse();

    let result = match args.script {
        Some(path) => run_script(&path),
        None => run_repl(),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run_script(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::ReadScript {
        path: path.display().to_string(),
        source,
    })?;

    let (program, errors) = parser::parse(&source);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("{}", err);
        }
        return Err(Box::new(CliError::Parse(errors)));
    }

    let env = Environment::new();
    let result = eval::eval_program(&program, &env);

    if let value::Value::Error(msg) = &result {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }

    println!("{}", result.inspect());
    Ok(())
}

fn run_repl() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", WELCOME_MESSAGE);

    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<(), rustyline::history::FileHistory> = Editor::with_config(config)?;
    if editor.load_history(HISTORY_FILE).is_err() {
        // No history file yet; nothing to restore.
    }

    let env = Environment::new();

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let (program, errors) = parser::parse(line);
                if !errors.is_empty() {
                    for err in &errors {
                        eprintln!("{}", err);
                    }
                    continue;
                }

                let result = eval::eval_program(&program, &env);
                if let value::Value::Error(msg) = &result {
                    eprintln!("Error: {}", msg);
                } else {
                    println!("{}", result.inspect());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(Box::new(CliError::History(std::io::Error::other(err)))),
        }
    }

    editor
        .save_history(HISTORY_FILE)
        .map_err(|err| CliError::History(std::io::Error::other(err)))?;
    Ok(())
}
