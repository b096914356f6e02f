use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::{debug, Level};

use xilize::language::{ExitCode, TranslationError};
use xilize::problem::{concise_diagnostic, full_diagnostic, Severity};
use xilize::translation::{Engine, Mode};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("xilize")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Translate Xilize markup into XHTML.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("translate")
                .about("Translate the given files, each to a page beside it")
                .arg(
                    Arg::new("fragment")
                        .long("fragment")
                        .action(ArgAction::SetTrue)
                        .help("Emit only the markup of the blocks, without the page prolog and epilog."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Where to write the translation of a single file. Use '-' for standard output."),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("A TOML file of key definitions applied before each file is read."),
                )
                .arg(
                    Arg::new("define")
                        .short('D')
                        .action(ArgAction::Append)
                        .value_name("KEY=VALUE")
                        .help("Define a key before each file is read."),
                )
                .arg(
                    Arg::new("debug")
                        .long("debug")
                        .action(ArgAction::SetTrue)
                        .help("Log the workings of the translator to standard error."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("The Xilize source files to translate."),
                ),
        )
        .subcommand(Command::new("signatures").about("List the standard signatures"))
        .get_matches();

    let code = match matches.subcommand() {
        Some(("translate", submatches)) => translate(submatches),
        Some(("signatures", _)) => {
            for name in Engine::new().signature_names() {
                println!("{}", name);
            }
            ExitCode::Okay
        }
        Some(_) => {
            println!("No valid subcommand was used");
            ExitCode::Usage
        }
        None => {
            println!("usage: xilize [COMMAND] ...");
            println!("Try '--help' for more information.");
            ExitCode::Usage
        }
    };

    std::process::exit(code.value());
}

fn translate(submatches: &ArgMatches) -> ExitCode {
    let verbose = submatches.get_flag("debug");
    let level = if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mode = if submatches.get_flag("fragment") {
        Mode::Fragment
    } else {
        Mode::Page
    };
    let mut engine = Engine::new().with_mode(mode);

    if let Some(config) = submatches.get_one::<PathBuf>("config") {
        if let Err(error) = engine.configure(config) {
            failure(&error);
            return error.code();
        }
    }

    if let Some(definitions) = submatches.get_many::<String>("define") {
        for definition in definitions {
            match definition.split_once('=') {
                Some((key, value)) => engine.define(key.trim(), value),
                None => engine.define(definition.trim(), "true"),
            }
        }
    }

    let filenames: Vec<&PathBuf> = submatches
        .get_many::<PathBuf>("filename")
        .map(|values| values.collect())
        .unwrap_or_default();
    let output = submatches.get_one::<PathBuf>("output");
    if output.is_some() && filenames.len() > 1 {
        eprintln!(
            "{}: --output can only be given with a single file",
            "error".bright_red()
        );
        return ExitCode::Usage;
    }

    let mut worst = ExitCode::Okay;
    for filename in filenames {
        let code = unit(&engine, filename, output.map(PathBuf::as_path), verbose);
        debug!("{} finished: {}", filename.display(), code);
        worst = worst.max(code);
    }
    worst
}

/// Translate one file and write the result, returning how it went.
fn unit(engine: &Engine, filename: &Path, output: Option<&Path>, verbose: bool) -> ExitCode {
    let outcome = match engine.translate_file(filename) {
        Ok(outcome) => outcome,
        Err(error) => {
            failure(&error);
            return error.code();
        }
    };

    let source = std::fs::read_to_string(filename).unwrap_or_default();
    for diagnostic in outcome
        .problems
        .iter()
    {
        if diagnostic.severity < Severity::Warning && !verbose {
            continue;
        }
        match diagnostic.severity {
            Severity::Error if diagnostic.path == filename => {
                eprintln!("{}", full_diagnostic(diagnostic, &source))
            }
            _ => eprintln!("{}", concise_diagnostic(diagnostic)),
        }
    }

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => engine.output_path(filename),
    };
    let written = if target.as_os_str() == "-" {
        std::io::stdout()
            .write_all(
                outcome
                    .output
                    .as_bytes(),
            )
            .map_err(|error| TranslationError::Io(target.clone(), error))
    } else {
        std::fs::write(&target, &outcome.output).map_err(|error| TranslationError::Io(target.clone(), error))
    };

    match written {
        Ok(()) => outcome.code,
        Err(error) => {
            failure(&error);
            error.code()
        }
    }
}

fn failure(error: &TranslationError) {
    eprintln!("{}: {}", "error".bright_red(), error.bold());
}
