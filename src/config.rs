//! Command line and environment configuration

use crate::preview::SpaFallback;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data/projects";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "sketchbox", version, about = "Self-hosted project sandbox")]
pub struct Cli {
    /// Directory holding one namespace per project
    #[arg(long, env = "SKETCHBOX_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub serve: ServeArgs,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server
    Serve,
    /// List projects, most recently updated first
    List,
    /// Create a project from a template
    Create {
        #[arg(long)]
        name: Option<String>,
        /// Template key (see `templates`)
        #[arg(long)]
        template: Option<String>,
    },
    /// Delete a project and all of its files
    Delete { id: String },
    /// List the built-in templates
    Templates,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address for the HTTP listener
    #[arg(long, env = "SKETCHBOX_LISTEN", default_value = DEFAULT_LISTEN, global = true)]
    pub listen: String,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "SKETCHBOX_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE, global = true)]
    pub max_file_size: usize,

    /// Which missing preview paths are answered with index.html
    #[arg(long, env = "SKETCHBOX_SPA_FALLBACK", value_enum, default_value_t = SpaFallback::Always, global = true)]
    pub spa_fallback: SpaFallback,
}
