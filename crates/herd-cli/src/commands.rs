use std::path::Path;

use anyhow::Context as _;
use colored::Colorize;
use herd_contract::{invoke, AnimalContract, Context, InvokeResponse, RecordEntry, TransactionKind};
use herd_state::InMemoryWorldState;

use crate::cli::*;
use crate::config::HerdConfig;

struct Output {
    format: OutputFormat,
    pretty: bool,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = HerdConfig::load(&cli.config)?;
    let state_path = cli.state.clone().unwrap_or_else(|| config.state_path.clone());
    let state = InMemoryWorldState::load(&state_path)
        .with_context(|| format!("loading world state from {}", state_path.display()))?;
    let out = Output {
        format: cli.format,
        pretty: config.pretty_json,
    };

    let (function, args) = match cli.command {
        Command::List => return cmd_list(&state, &state_path, &out),
        Command::Digest(args) => return cmd_digest(&state, &args.id, &out),
        Command::Transactions => return cmd_transactions(&out),
        Command::Init => ("InitLedger".to_string(), vec![]),
        Command::Create(args) => ("CreateAnimal".to_string(), args.into_args()),
        Command::Read(args) => ("ReadAnimal".to_string(), vec![args.id]),
        Command::Exists(args) => ("AnimalExists".to_string(), vec![args.id]),
        Command::Rename(args) => ("UpdateAnimalName".to_string(), vec![args.id, args.new_name]),
        Command::Update(args) => ("UpdateAnimal".to_string(), args.into_args()),
        Command::Delete(args) => ("DeleteAnimal".to_string(), vec![args.id]),
        Command::Invoke(args) => (args.function, args.args),
    };
    run_transaction(&state, &state_path, &function, args, &out)
}

/// Invoke `function`; persist the state only if it is a submit transaction
/// and it succeeded.
fn run_transaction(
    state: &InMemoryWorldState,
    state_path: &Path,
    function: &str,
    args: Vec<String>,
    out: &Output,
) -> anyhow::Result<()> {
    let ctx = Context::new(state);
    let response = invoke(&AnimalContract::new(), &ctx, function, &args)?;

    let submit = AnimalContract::transaction(function)
        .is_some_and(|t| t.kind == TransactionKind::Submit);
    if submit {
        state
            .save(state_path)
            .with_context(|| format!("saving world state to {}", state_path.display()))?;
        tracing::info!(function, path = %state_path.display(), "transaction committed");
    }

    print_response(function, response, out);
    Ok(())
}

fn print_response(function: &str, response: InvokeResponse, out: &Output) {
    match (out.format, response) {
        (OutputFormat::Json, InvokeResponse::Empty) => {}
        (OutputFormat::Text, InvokeResponse::Empty) => {
            println!("{} {}", "✓".green().bold(), function.bold());
        }
        (OutputFormat::Json, InvokeResponse::Bool(b)) => println!("{b}"),
        (OutputFormat::Text, InvokeResponse::Bool(b)) => {
            let rendered = if b { "true".green() } else { "false".red() };
            println!("{rendered}");
        }
        (_, InvokeResponse::Payload(payload)) => println!("{}", render_json(&payload, out.pretty)),
    }
}

/// Re-indent `payload` when pretty output is on and it parses as JSON.
fn render_json(payload: &str, pretty: bool) -> String {
    if !pretty {
        return payload.to_string();
    }
    serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| payload.to_string())
}

fn cmd_list(state: &InMemoryWorldState, state_path: &Path, out: &Output) -> anyhow::Result<()> {
    if out.format == OutputFormat::Json {
        return run_transaction(state, state_path, "GetAllAnimals", vec![], out);
    }

    let entries = AnimalContract::new().get_all_animals(&Context::new(state))?;
    if entries.is_empty() {
        println!("No animals.");
        return Ok(());
    }
    for entry in &entries {
        match entry {
            RecordEntry::Decoded(animal) => {
                let pedigree = if animal.pedigree { " pedigree".cyan() } else { "".normal() };
                println!(
                    "{}  {} ({}, {}){}",
                    animal.id.yellow().bold(),
                    animal.name,
                    animal.kind,
                    animal.breed,
                    pedigree
                );
            }
            RecordEntry::Raw(bytes) => {
                let raw = String::from_utf8_lossy(bytes).into_owned();
                println!("{} {}", "raw:".red(), raw.as_str().dimmed());
            }
        }
    }
    println!("{} record(s)", entries.len().to_string().as_str().bold());
    Ok(())
}

fn cmd_digest(state: &InMemoryWorldState, id: &str, out: &Output) -> anyhow::Result<()> {
    let animal = AnimalContract::new().read_animal_record(&Context::new(state), id)?;
    let digest = animal.digest();
    match out.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "id": id, "digest": digest.to_hex() }));
        }
        OutputFormat::Text => println!("{}  {}", id.yellow().bold(), digest.to_hex().as_str().dimmed()),
    }
    Ok(())
}

fn cmd_transactions(out: &Output) -> anyhow::Result<()> {
    let transactions = AnimalContract::transactions();
    match out.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(transactions)?),
        OutputFormat::Text => {
            for tx in transactions {
                let kind = match tx.kind {
                    TransactionKind::Submit => "submit".yellow(),
                    TransactionKind::Evaluate => "evaluate".cyan(),
                };
                println!("{:<18} {:<9} ({})", tx.name.bold(), kind, tx.params.join(", "));
            }
        }
    }
    Ok(())
}
