use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "A todo list manager with projects", long_about = None)]
pub struct Cli {
    /// Keep all state in memory for this run; nothing is saved
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the todos of the active project
    Show {
        #[arg(long)]
        project: Option<String>,
    },
    /// Add a todo to the active project
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },
    /// Change fields of an existing todo
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Delete a todo from whichever project holds it
    Delete {
        id: String,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Erase all saved todos and projects
    Reset {
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommand {
    /// List projects, marking the active one
    List,
    /// Create a project; its id is derived from the name
    Create {
        name: String,
    },
    /// Make a project the active one
    Select {
        id: String,
    },
    /// Change a project's display name; its id stays the same
    Rename {
        id: String,
        name: String,
    },
    /// Delete a project and all its todos
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the config file location
    Path,
}
