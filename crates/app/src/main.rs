mod files;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use family_tree::seed::{seed_tree, SeedOptions};
use family_tree::{FamilyTree, PersonId};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a demo family tree
    Seed {
        /// Number of independent founders
        #[arg(long, default_value_t = 3)]
        roots: usize,
        /// Number of people to generate
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 4)]
        max_children: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a saved family tree and summarize it
    Check { tree: PathBuf },
    /// Compute the layout of a saved family tree
    Layout {
        tree: PathBuf,
        /// RON layout settings, missing fields use the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the ancestors and descendants of a person
    Lineage { tree: PathBuf, person: u64 },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match args.command {
        Command::Seed {
            roots,
            count,
            max_children,
            seed,
            output,
        } => {
            let options = SeedOptions {
                roots,
                target: count,
                max_children,
                seed,
            };
            debug!("Seeding with {options:?}");
            let tree = seed_tree(&options)?;
            files::write_ron(&tree.snapshot(), output.as_deref())
        }
        Command::Check { tree } => {
            let tree = files::load_tree(&tree)?;
            println!("{}", summary(&tree));
            Ok(())
        }
        Command::Layout {
            tree,
            config,
            output,
        } => {
            let config = files::load_config(config.as_deref())?;
            let tree = files::load_tree(&tree)?;
            let layout = tree.layout(&config)?;
            debug!(
                "Layout is {}x{} with {} crossings",
                layout.width, layout.height, layout.crossings
            );
            files::write_ron(&layout, output.as_deref())
        }
        Command::Lineage { tree, person } => {
            let tree = files::load_tree(&tree)?;
            let id = PersonId::from(person);
            let person = tree
                .get(id)
                .with_context(|| format!("No person with id {id}"))?;

            println!("{}", person.full_name());
            println!("ancestors:");
            for ancestor in tree.ancestors(id)? {
                print_person(&tree, ancestor);
            }
            println!("descendants:");
            for descendant in tree.descendants(id)? {
                print_person(&tree, descendant);
            }
            Ok(())
        }
    }
}

fn summary(tree: &FamilyTree) -> String {
    let roots = tree.iter().filter(|person| person.is_root()).count();
    let living = tree.iter().filter(|person| person.is_living).count();
    let edges: usize = tree.iter().map(|person| person.children.len()).sum();
    format!(
        "{} people, {roots} roots, {living} living, {edges} parent links",
        tree.len()
    )
}

fn print_person(tree: &FamilyTree, id: PersonId) {
    if let Some(person) = tree.get(id) {
        let death = person.death_date.as_deref().unwrap_or("");
        println!(
            "  [{id}] {} ({}-{death})",
            person.full_name(),
            person.birth_date
        );
    }
}
