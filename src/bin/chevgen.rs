//! Command-line interface for chevgen
//!
//! Usage:
//!   chevgen -i `<grammar>` -p `<parser.ts>` -t `<typing.d.ts>` [-c `<config>`]
//!   chevgen -i `<grammar>` -p -t -l                  - Print the artifacts instead of writing them
//!   chevgen -i `<grammar>` --emit-tokens [simple|json] - Dump the token stream

use chevgen::dsl::codegen::{CommandFormatter, Formatter};
use chevgen::dsl::processor::{format_tokens, Compiler, LexPolicy, Targets, TokenFormat};
use chevgen::dsl::{CompileError, GeneratorConfig};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

fn cli() -> Command {
    Command::new("chevgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile a grammar definition into a Chevrotain parser and CST typings")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Input grammar definition file")
                .required(true),
        )
        .arg(
            Arg::new("parser")
                .short('p')
                .long("parser")
                .help("Output generated parser to file")
                .num_args(0..=1)
                .default_missing_value("-"),
        )
        .arg(
            Arg::new("typing")
                .short('t')
                .long("typing")
                .help("Output generated typing to file")
                .num_args(0..=1)
                .default_missing_value("-"),
        )
        .arg(
            Arg::new("log")
                .short('l')
                .long("log")
                .help("Output to console instead of file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (JSON, or YAML by extension)"),
        )
        .arg(
            Arg::new("emit-tokens")
                .long("emit-tokens")
                .help("Print the token stream and exit")
                .num_args(0..=1)
                .default_missing_value("simple")
                .value_parser(["simple", "json"]),
        )
        .arg(
            Arg::new("formatter")
                .long("formatter")
                .help("Pipe the parser through this command (e.g. 'prettier --parser typescript')"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Report only lexical errors and stop before parsing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

fn main() {
    let matches = cli().get_matches();

    init_logging(matches.get_count("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "chevgen=debug,warn",
        _ => "chevgen=trace,info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = matches
        .get_one::<String>("input")
        .ok_or("needs input file, use '-i input.txt'")?;
    let input = PathBuf::from(input);
    let source = fs::read_to_string(&input).map_err(|source| CompileError::Read {
        path: input.clone(),
        source,
    })?;

    if let Some(format) = matches.get_one::<String>("emit-tokens") {
        let format = match format.as_str() {
            "json" => TokenFormat::Json,
            _ => TokenFormat::Simple,
        };
        println!("{}", format_tokens(&source, format)?);
        return Ok(());
    }

    let parser_out = matches.get_one::<String>("parser");
    let typing_out = matches.get_one::<String>("typing");
    if parser_out.is_none() && typing_out.is_none() {
        return Err(
            "needs further action after input, use '-p parser.ts -t typing.d.ts'".into(),
        );
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => GeneratorConfig::load(path).map_err(CompileError::from)?,
        None => GeneratorConfig::default(),
    };
    let mut compiler = Compiler::new(config).with_targets(Targets {
        parser: parser_out.is_some(),
        typing: typing_out.is_some(),
    });
    if let Some(command) = matches.get_one::<String>("formatter") {
        let formatter = CommandFormatter::from_command_line(command)
            .ok_or("--formatter needs a program name")?;
        compiler = compiler.with_formatter(Box::new(formatter) as Box<dyn Formatter>);
    }
    if matches.get_flag("strict") {
        compiler = compiler.with_lex_policy(LexPolicy::Strict);
    }

    let artifacts = compiler.compile(&source)?;
    let console = matches.get_flag("log");
    for (label, destination, content) in [
        ("Parser", parser_out, artifacts.parser),
        ("Typing", typing_out, artifacts.typing),
    ] {
        let (Some(destination), Some(content)) = (destination, content) else {
            continue;
        };
        if console || destination == "-" {
            println!("// {}: ", label);
            println!("{}", content);
        } else {
            let path = PathBuf::from(destination);
            fs::write(&path, content).map_err(|source| CompileError::Write { path, source })?;
        }
    }
    Ok(())
}
