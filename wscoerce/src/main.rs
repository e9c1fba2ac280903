//! wscoerce CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wscoerce::{
    Coercer, GroupId, HostTables, Value, build_method_catalog,
    build_variable_catalog, variable_name,
};

const LOG_ENV: &str = "WSCOERCE_LOG";

#[derive(Parser)]
#[command(
    name = "wscoerce",
    version,
    about = "Coerce loosely-typed values into workspace group representations"
)]
struct Cli {
    /// Workspace description file (TOML); the built-in group table otherwise
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Log at debug level (trace with -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Coerce a literal into a group
    Coerce {
        /// Group name, or its index in the group table
        group: String,
        /// Value text
        value: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the group table
    Groups,
    /// List workspace variables with their groups
    Variables,
    /// List workspace methods
    Methods,
    /// Print the name of the variable at an index
    Name {
        index: usize,
    },
    /// Tokenize a literal and dump tokens (debug)
    Tokens {
        text: String,
    },
    /// Start interactive coercion
    Repl,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let host = match load_tables(cli.tables.as_ref()) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Coerce { group, value, json } => coerce_value(&host, &group, &value, json),
        Command::Groups => list_groups(&host),
        Command::Variables => list_variables(&host),
        Command::Methods => list_methods(&host),
        Command::Name { index } => print_name(&host, index),
        Command::Tokens { text } => tokenize_text(&text),
        Command::Repl => run_repl(&host),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_tables(path: Option<&PathBuf>) -> wscoerce::Result<HostTables> {
    match path {
        Some(path) => HostTables::load(path),
        None => Ok(HostTables::builtin()),
    }
}

fn parse_group(group: &str) -> GroupId {
    group
        .parse::<usize>()
        .map(GroupId::Index)
        .unwrap_or_else(|_| GroupId::from(group))
}

fn coerce_value(host: &HostTables, group: &str, value: &str, json: bool) -> CliResult {
    let coercer = Coercer::new(host);
    let coerced = match coercer.coerce(&parse_group(group), Value::Text(value.to_string())) {
        Ok(coerced) => coerced,
        Err(err) => {
            wscoerce::error::report_error("<value>", value, &err);
            return Err(err.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&coerced)?);
    } else {
        println!("{coerced}");
    }
    Ok(())
}

fn list_groups(host: &HostTables) -> CliResult {
    for (i, group) in host.groups().iter().enumerate() {
        if group.description.is_empty() {
            println!("{i:>4}  {}", group.name);
        } else {
            println!("{i:>4}  {:<24} {}", group.name, group.description);
        }
    }
    Ok(())
}

fn list_variables(host: &HostTables) -> CliResult {
    let catalog = build_variable_catalog(host)?;
    for name in catalog.names() {
        let variable = catalog.lookup(name)?;
        let group = host.group_name(variable.group)?;
        match &variable.default {
            Some(default) => println!("{name:<24} {group:<16} = {default}"),
            None => println!("{name:<24} {group}"),
        }
    }
    Ok(())
}

fn list_methods(host: &HostTables) -> CliResult {
    let catalog = build_method_catalog(host)?;
    for name in catalog.names() {
        let method = catalog.lookup(name)?;
        println!(
            "{name}({}) -> ({})",
            method.inputs.join(", "),
            method.outputs.join(", ")
        );
    }
    Ok(())
}

fn print_name(host: &HostTables, index: usize) -> CliResult {
    println!("{}", variable_name(host, index)?);
    Ok(())
}

fn tokenize_text(text: &str) -> CliResult {
    let tokens = match wscoerce::lexer::tokenize(text) {
        Ok(tokens) => tokens,
        Err(err) => {
            wscoerce::error::report_error("<text>", text, &err);
            return Err(err.into());
        }
    };
    for (tok, span) in &tokens {
        println!("{:?} @ {}", tok, span);
    }
    Ok(())
}

fn run_repl(host: &HostTables) -> CliResult {
    let mut repl = wscoerce::repl::Repl::new(host)?;
    repl.run()?;
    Ok(())
}
