use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stepweaver::history::DEFAULT_HISTORY_CAPACITY;
use stepweaver::error::ValidationError;
use stepweaver::io::FileStorage;
use stepweaver::model::{MappingDraft, StepDraft, StepPatch, StepType};
use stepweaver::render::WorkflowFormatter;
use stepweaver::sample::sample_workflow;
use stepweaver::store::{MoveDirection, WorkflowStore};
use tracing_subscriber::EnvFilter;

/// Edit a step workflow from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a workflow JSON file. The bundled sample is used when omitted.
    workflow_path: Option<String>,

    /// A command to apply, e.g. `-c "move step_3 up"`. May be repeated.
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,

    /// Directory used for `save` and `load`
    #[arg(long, default_value = ".stepweaver")]
    storage_dir: String,

    /// Number of snapshots kept for undo/redo
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,

    /// Run in interactive mode to be prompted for commands
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,

    /// Log every store action
    #[arg(short, long)]
    verbose: bool,
}

/// One editing command, parsed from a line of text.
#[derive(Debug)]
enum Command {
    List,
    Add { step_type: StepType, name: String },
    Rename { step_id: String, name: String },
    Delete { step_id: String },
    Move { step_id: String, direction: MoveDirection },
    Reorder { step_ids: Vec<String> },
    Map { step_id: String, draft: MappingDraft },
    Unmap { step_id: String, mapping_id: String },
    Undo,
    Redo,
    Save,
    Load,
    Export { dir: PathBuf },
    Import { path: PathBuf },
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  list                                   show the workflow
  add <TYPE> <name>                      append a step (API_CALL, FILTER, TRANSFORM, CONDITION)
  rename <stepId> <name>                 rename a step
  delete <stepId>                        delete a step
  move <stepId> up|down                  swap a step with its neighbour
  reorder <id,id,...>                    reorder all steps
  map <stepId> <source> <target> <type>  add a mapping (type: string, number, object, array)
  unmap <stepId> <mappingId>             delete a mapping
  undo | redo                            walk the history
  save | load                            write / read the storage slot
  export <dir>                           write a JSON export into <dir>
  import <file>                          replace the workflow with a JSON file
  quit                                   leave interactive mode";

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or("empty command")?.to_ascii_lowercase();
        let rest: Vec<&str> = parts.collect();
        let arg = |i: usize, what: &str| -> Result<String, String> {
            rest.get(i)
                .map(|s| s.to_string())
                .ok_or_else(|| format!("'{}' needs {}", verb, what))
        };

        let command = match verb.as_str() {
            "list" | "ls" => Command::List,
            "add" => Command::Add {
                step_type: arg(0, "a step type")?
                    .parse()
                    .map_err(|e: ValidationError| e.to_string())?,
                name: rest.get(1..).map(|n| n.join(" ")).unwrap_or_default(),
            },
            "rename" => Command::Rename {
                step_id: arg(0, "a step id")?,
                name: rest.get(1..).map(|n| n.join(" ")).unwrap_or_default(),
            },
            "delete" | "rm" => Command::Delete {
                step_id: arg(0, "a step id")?,
            },
            "move" | "mv" => Command::Move {
                step_id: arg(0, "a step id")?,
                direction: arg(1, "a direction")?.parse()?,
            },
            "reorder" => Command::Reorder {
                step_ids: arg(0, "a comma-separated id list")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            "map" => Command::Map {
                step_id: arg(0, "a step id")?,
                draft: MappingDraft::new(
                    arg(1, "a source")?,
                    arg(2, "a target")?,
                    arg(3, "a data type")?
                        .parse()
                        .map_err(|e: ValidationError| e.to_string())?,
                ),
            },
            "unmap" => Command::Unmap {
                step_id: arg(0, "a step id")?,
                mapping_id: arg(1, "a mapping id")?,
            },
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "save" => Command::Save,
            "load" => Command::Load,
            "export" => Command::Export {
                dir: PathBuf::from(arg(0, "a directory")?),
            },
            "import" => Command::Import {
                path: PathBuf::from(arg(0, "a file path")?),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut store = WorkflowStore::builder()
        .with_history_capacity(cli.history)
        .with_storage(FileStorage::new(&cli.storage_dir))
        .build();

    match &cli.workflow_path {
        Some(path) => {
            if let Err(e) = store.import_workflow(Path::new(path)) {
                exit_with_error(&format!("Failed to import workflow '{}': {}", path, e));
            }
        }
        None => {
            let sample = sample_workflow()
                .unwrap_or_else(|e| exit_with_error(&format!("Bundled sample is broken: {}", e)));
            println!("No workflow file provided. Using the bundled sample.");
            store.load_workflow(sample);
        }
    }

    if cli.human {
        run_interactive(&mut store);
    } else {
        run_non_interactive(&mut store, &cli.commands);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("stepweaver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Applies every command from the command line in order, then prints the result.
fn run_non_interactive(store: &mut WorkflowStore, commands: &[String]) {
    for line in commands {
        let command = Command::parse(line)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid command '{}': {}", line, e)));
        match execute(store, command) {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {}
            Err(e) => exit_with_error(&format!("Command '{}' failed: {}", line, e)),
        }
    }
    print_workflow(store);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(store: &mut WorkflowStore) {
    println!("--- Stepweaver Interactive Mode ---");
    println!("{}", HELP);
    print_workflow(store);

    loop {
        let Some(line) = prompt_for_input("Enter command") else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                println!("Invalid command: {}", e);
                continue;
            }
        };

        match execute(store, command) {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {}
            Err(e) => println!("Error: {}", e),
        }
        if let Some(error) = store.state().error.clone() {
            println!("Store error: {}", error);
            store.clear_error();
        }
    }
}

/// Runs one command against the store. `Ok(None)` means there is nothing to report.
fn execute(store: &mut WorkflowStore, command: Command) -> Result<Option<String>, String> {
    let outcome = |applied: bool, what: &str| {
        if applied {
            Some(format!("{} applied", what))
        } else {
            Some(format!("{} had no effect", what))
        }
    };

    let message = match command {
        Command::List => {
            print_workflow(store);
            None
        }
        Command::Add { step_type, name } => {
            let draft = StepDraft::with_defaults(step_type, &name).map_err(|e| e.to_string())?;
            store
                .add_step(draft)
                .map_err(|e| e.to_string())?
                .map(|id| format!("Added step {}", id))
        }
        Command::Rename { step_id, name } => {
            let applied = store
                .update_step(&step_id, StepPatch::default().name(name.trim()))
                .map_err(|e| e.to_string())?;
            outcome(applied, "rename")
        }
        Command::Delete { step_id } => outcome(store.delete_step(&step_id), "delete"),
        Command::Move { step_id, direction } => {
            outcome(store.move_step(&step_id, direction), "move")
        }
        Command::Reorder { step_ids } => outcome(store.reorder_steps(step_ids.as_slice()), "reorder"),
        Command::Map { step_id, draft } => store
            .add_mapping(&step_id, draft)
            .map_err(|e| e.to_string())?
            .map(|id| format!("Added mapping {}", id))
            .or_else(|| Some(format!("No step '{}'", step_id))),
        Command::Unmap {
            step_id,
            mapping_id,
        } => outcome(store.delete_mapping(&step_id, &mapping_id), "unmap"),
        Command::Undo => outcome(store.undo(), "undo"),
        Command::Redo => outcome(store.redo(), "redo"),
        Command::Save => outcome(store.save_workflow(), "save"),
        Command::Load => outcome(store.load_workflow_from_storage(), "load"),
        Command::Export { dir } => store
            .export_workflow(&dir)
            .map(|path| format!("Exported to {}", path.display())),
        Command::Import { path } => {
            store.import_workflow(&path).map_err(|e| e.to_string())?;
            Some(format!("Imported {}", path.display()))
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => None,
    };
    Ok(message)
}

fn print_workflow(store: &WorkflowStore) {
    let state = store.state();
    match state.workflow() {
        Some(workflow) => {
            println!();
            print!("{}", WorkflowFormatter::format_workflow(workflow));
            println!(
                "History: {}/{} (undo: {}, redo: {})",
                state.current_index().map_or(0, |i| i + 1),
                state.history().len(),
                state.can_undo(),
                state.can_redo()
            );
        }
        None => println!("No workflow loaded."),
    }
}

/// Prints a prompt and reads one trimmed line. Returns `None` once stdin is closed.
fn prompt_for_input(prompt_text: &str) -> Option<String> {
    let mut line = String::new();
    print!("> {}: ", prompt_text);
    io::stdout().flush().ok()?;

    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
