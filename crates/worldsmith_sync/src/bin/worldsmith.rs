//! Worldsmith CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use worldsmith_storage::EntityGraph;
use worldsmith_sync::{Change, Editor, Publisher, RecordingDispatcher};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    file: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
    show_calls: bool,
    show_tree: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--calls" => config.show_calls = true,
            "--tree" => config.show_tree = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            path => {
                if config.file.is_some() {
                    return Err("only one config file may be given".into());
                }
                config.file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("worldsmith {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(file) = config.file else {
        print_help();
        return Err("missing config file".into());
    };

    let mut editor = Editor::new();
    for message in editor.load_config_file(&file)? {
        eprintln!("\x1b[33mskipped: {message}\x1b[0m");
    }

    print_entities(editor.graph());

    if config.show_tree {
        print_tree(&mut editor);
    }

    if config.show_calls {
        print_calls(editor.graph())?;
    }

    Ok(())
}

fn print_entities(graph: &EntityGraph) {
    let entities = graph.get_entities();
    println!("\x1b[1;36m=== Entities ({}) ===\x1b[0m", entities.len());
    for collection in entities {
        let name = collection.entity.as_ref().map_or("", |e| e.name.as_str());
        let kinds: Vec<_> = collection.kinds().iter().map(|k| k.name()).collect();
        if let Some(id) = collection.entity_id() {
            println!("  {:#x}  {name}  [{}]", id.felt(), kinds.join(", "));
        }
    }
    println!();
}

fn print_tree(editor: &mut Editor) {
    let walk = editor.hierarchy().walk();
    println!("\x1b[1;36m=== Hierarchy ===\x1b[0m");
    for (depth, id) in walk {
        let name = editor
            .graph()
            .get(id)
            .and_then(|c| c.entity.as_ref())
            .map_or_else(|| format!("{:#x}", id.felt()), |e| e.name.clone());
        println!("  {}{name}", "  ".repeat(depth));
    }
    println!();
}

/// Dry-runs a full publish of every entity and prints the calls.
fn print_calls(graph: &EntityGraph) -> Result<(), Box<dyn std::error::Error>> {
    let changes: Vec<Change> = graph
        .get_entities()
        .into_iter()
        .filter_map(|c| c.entity_id().map(|id| Change::update(id, c)))
        .collect();

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let mut dispatcher = RecordingDispatcher::new();
    let report = runtime.block_on(Publisher::new().publish(&mut dispatcher, changes));

    println!("\x1b[1;36m=== Calls ({}) ===\x1b[0m", dispatcher.calls().len());
    for call in dispatcher.calls() {
        println!("  {call}");
    }
    if !report.is_success() {
        return Err(format!("{} changes failed to publish", report.failed.len()).into());
    }
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mWorldsmith\x1b[0m - Entity graph editor core

\x1b[1mUSAGE:\x1b[0m
    worldsmith [OPTIONS] <CONFIG>

\x1b[1mARGUMENTS:\x1b[0m
    <CONFIG>    Config file with a dataPool array

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    --tree             Print the parent/child hierarchy
    --calls            Print the contract calls a full publish would send

\x1b[1mENVIRONMENT:\x1b[0m
    RUST_LOG           Log filter, e.g. worldsmith_storage=debug

\x1b[1mEXAMPLES:\x1b[0m
    worldsmith world.json                Print the entities in world.json
    worldsmith --tree world.json         Also print the hierarchy
    RUST_LOG=debug worldsmith --calls world.json"
    );
}
