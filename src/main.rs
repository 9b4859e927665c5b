mod cli;

use todo_projects::config;
use todo_projects::project;
use todo_projects::storage;
use todo_projects::todo;
use todo_projects::utils;

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand, ProjectCommand};
use config::Config;
use dialoguer::Confirm;
use project::{DEFAULT_PROJECT_ID, ProjectManager};
use std::fs;
use storage::{FileStore, MemoryStore, PersistenceStore, Store};
use todo::item::DUE_DATE_FORMAT;
use todo::{Priority, TodoDraft, TodoId, TodoPatch};
use utils::paths::{get_config_path, get_logs_dir};

type Manager = ProjectManager<Box<dyn Store>>;

/// Initialize file-based logging.
///
/// Logs are written to ~/.todo-projects/logs/todo.log.
/// Use `tail -f ~/.todo-projects/logs/todo.log` to follow logs.
///
/// RUST_LOG overrides the configured level.
fn init_file_logging(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = match get_logs_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };

    // Create logs directory if it doesn't exist
    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    // Set up file appender (rolling daily)
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "todo.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn open_manager(config: &Config, in_memory: bool) -> Result<Manager> {
    let store: Box<dyn Store> = if in_memory {
        Box::new(MemoryStore::new())
    } else {
        let store = match &config.data_dir {
            Some(dir) => FileStore::new(dir),
            None => FileStore::open_default()?,
        };
        tracing::info!(dir = %store.dir().display(), "using file store");
        Box::new(store)
    };
    ProjectManager::new(PersistenceStore::new(store))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Guard must be kept alive for the duration of the command
    let _log_guard = init_file_logging(&config);
    tracing::info!(in_memory = cli.in_memory, "todo starting");

    // Config commands never touch the todo store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone());
    }

    let mut manager = open_manager(&config, cli.in_memory)?;

    match cli.command {
        None => handle_show(&manager, &config, None)?,
        Some(Commands::Show { project }) => handle_show(&manager, &config, project)?,
        Some(Commands::Add {
            title,
            description,
            due,
            priority,
            project,
        }) => {
            let draft = TodoDraft {
                title,
                description,
                due_date: validate_due(due)?.unwrap_or_default(),
                priority: priority
                    .map(Priority::from)
                    .unwrap_or_else(|| config.default_priority()),
            };
            handle_add(&mut manager, draft, project)?;
        }
        Some(Commands::Edit {
            id,
            title,
            description,
            due,
            priority,
        }) => {
            let patch = TodoPatch {
                title,
                description,
                due_date: validate_due(due)?,
                priority: priority.map(Priority::from),
            };
            handle_edit(&mut manager, TodoId::from(id), patch)?;
        }
        Some(Commands::Delete { id }) => handle_delete(&mut manager, TodoId::from(id))?,
        Some(Commands::Project { command }) => handle_project_command(&mut manager, command)?,
        Some(Commands::Reset { yes }) => {
            if yes || confirm("Erase all projects and todos?")? {
                manager.reset()?;
                println!("All data erased.");
            }
        }
        Some(Commands::Config { command }) => handle_config_command(command)?,
    }

    Ok(())
}

/// Empty string is accepted and clears the date
fn validate_due(due: Option<String>) -> Result<Option<String>> {
    match due {
        Some(d) if !d.trim().is_empty() => {
            NaiveDate::parse_from_str(d.trim(), DUE_DATE_FORMAT)
                .map_err(|_| anyhow!("Invalid due date '{}'. Use YYYY-MM-DD", d))?;
            Ok(Some(d.trim().to_string()))
        }
        Some(_) => Ok(Some(String::new())),
        None => Ok(None),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn resolve_project(manager: &Manager, project: Option<String>) -> Result<String> {
    match project {
        Some(id) if manager.get_project(&id).is_some() => Ok(id),
        Some(id) => bail!("Project '{}' not found", id),
        None => Ok(manager.active_project_id().to_string()),
    }
}

fn handle_show(manager: &Manager, config: &Config, project: Option<String>) -> Result<()> {
    let project_id = resolve_project(manager, project)?;
    let list = manager
        .get_project(&project_id)
        .ok_or_else(|| anyhow!("Project '{}' not found", project_id))?;

    println!("\n{} ({})\n", list.name(), project_id);

    if list.is_empty() {
        println!("No todos yet!");
        return Ok(());
    }

    for (idx, item) in list.get_all().iter().enumerate() {
        println!("{}. {} [{}]", idx + 1, item.title, item.priority);
        if !item.description.is_empty() {
            println!("   {}", item.description);
        }
        if !item.due_date.is_empty() {
            println!("   Due: {}", item.due_date_display(&config.date_format));
        }
        println!("   id: {}", item.id);
    }
    println!();

    Ok(())
}

fn handle_add(manager: &mut Manager, draft: TodoDraft, project: Option<String>) -> Result<()> {
    let project_id = resolve_project(manager, project)?;
    match manager.add_todo(&project_id, draft)? {
        Some(todo) => println!("✓ Added '{}' ({})", todo.title, todo.id),
        None => bail!("Project '{}' not found", project_id),
    }
    Ok(())
}

fn handle_edit(manager: &mut Manager, id: TodoId, patch: TodoPatch) -> Result<()> {
    if patch.is_empty() {
        bail!(
            "Nothing to change. Pass at least one of --title, --description, --due, --priority"
        );
    }
    let project_id = owning_project(manager, &id)?;
    manager.update_todo(&project_id, &id, patch)?;
    println!("✓ Updated {}", id);
    Ok(())
}

fn handle_delete(manager: &mut Manager, id: TodoId) -> Result<()> {
    let project_id = owning_project(manager, &id)?;
    manager.delete_todo(&project_id, &id)?;
    println!("✓ Deleted {}", id);
    Ok(())
}

fn owning_project(manager: &Manager, id: &TodoId) -> Result<String> {
    manager
        .find_todo(id)
        .map(|(project_id, _)| project_id.to_string())
        .ok_or_else(|| anyhow!("Todo '{}' not found", id))
}

fn handle_project_command(manager: &mut Manager, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => {
            let active = manager.active_project_id().to_string();
            for project in manager.get_all_projects() {
                let marker = if project.id == active { "*" } else { " " };
                println!("{} {} ({})", marker, project.name, project.id);
            }
        }
        ProjectCommand::Create { name } => match manager.create_project_named(&name)? {
            Some(id) => println!("✓ Created project '{}' ({})", name.trim(), id),
            None => bail!(
                "A project with the id derived from '{}' already exists, pick another name",
                name
            ),
        },
        ProjectCommand::Select { id } => {
            if !manager.set_active_project(&id)? {
                bail!("Project '{}' not found", id);
            }
            println!("✓ Active project is now '{}'", id);
        }
        ProjectCommand::Rename { id, name } => {
            if !manager.rename_project(&id, &name)? {
                bail!("Project '{}' not found", id);
            }
            println!("✓ Renamed '{}' to '{}'", id, name);
        }
        ProjectCommand::Delete { id, yes } => {
            if id == DEFAULT_PROJECT_ID {
                bail!("Cannot delete the default project");
            }
            if manager.get_project(&id).is_none() {
                bail!("Project '{}' not found", id);
            }
            if !yes && !confirm(&format!("Delete project '{}' and all its todos?", id))? {
                return Ok(());
            }
            manager.delete_project(&id)?;
            println!("✓ Deleted project '{}'", id);
        }
    }
    Ok(())
}

fn handle_config_command(command: ConfigCommand) -> Result<()> {
    let config_path = get_config_path()?;
    match command {
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "Config already exists at {}. Use --force to overwrite",
                    config_path.display()
                );
            }
            Config::default().save()?;
            println!("✓ Wrote default config to {}", config_path.display());
        }
        ConfigCommand::Path => println!("{}", config_path.display()),
    }
    Ok(())
}
