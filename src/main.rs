use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use sketchbox::config::{Cli, Command};
use sketchbox::{templates, NewProject, ProjectStore};

#[actix_web::main]
async fn main() -> Result<()> {
    // Info by default, RUST_LOG overrides
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let store = ProjectStore::open(&cli.data_dir)
        .with_context(|| format!("Failed to open data root {}", cli.data_dir.display()))?;

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            sketchbox::server::run(store, &cli.serve)
                .await
                .context("HTTP server failed")?;
        }
        Command::List => {
            let projects = store.list_projects().context("Failed to list projects")?;
            if projects.is_empty() {
                println!("No projects in {}", cli.data_dir.display());
            }
            for project in projects {
                println!(
                    "{}  {}  {}",
                    project.id,
                    project.updated_at.to_rfc3339(),
                    project.name
                );
            }
        }
        Command::Create { name, template } => {
            let project = store
                .create_project(NewProject { name, template })
                .context("Failed to create project")?;
            println!("✓ Created {} ({})", project.id, project.name);
        }
        Command::Delete { id } => {
            store
                .delete_project(&id)
                .with_context(|| format!("Failed to delete project {}", id))?;
            println!("✓ Deleted {}", id);
        }
        Command::Templates => {
            for template in templates::all() {
                let files: Vec<&str> = template.files.iter().map(|(path, _)| *path).collect();
                println!("{:<8} {:<18} {}", template.key, template.name, files.join(", "));
            }
        }
    }

    Ok(())
}
