//! exo-triples CLI: inspect and edit a triple snapshot.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use exo_triples::config::StoreConfig;
use exo_triples::error::ExoResult;
use exo_triples::graph::{Iri, Object, Subject, Triple, TripleStore};
use exo_triples::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "exo-triples", version, about = "Indexed triple store for note vaults")]
struct Cli {
    /// Snapshot file holding the triples.
    #[arg(long, global = true, default_value = "triples.json")]
    snapshot: PathBuf,

    /// Store configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty snapshot.
    Init {
        /// Overwrite an existing snapshot.
        #[arg(long)]
        force: bool,
    },

    /// Add a triple, e.g. `add ex:s ex:p '"value"@en'`.
    Add {
        subject: Subject,
        predicate: Iri,
        object: Object,
    },

    /// Remove a triple.
    Remove {
        subject: Subject,
        predicate: Iri,
        object: Object,
    },

    /// Print triples matching a pattern; omitted positions are wildcards.
    Match {
        #[arg(long)]
        subject: Option<Subject>,
        #[arg(long)]
        predicate: Option<Iri>,
        #[arg(long)]
        object: Option<Object>,
    },

    /// Resolve a UUID to the subjects embedding it.
    Uuid {
        uuid: String,
    },

    /// Show store statistics as JSON.
    Stats,
}

fn open_store(cli: &Cli) -> ExoResult<TripleStore> {
    let config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    let store = TripleStore::with_config(config);
    let loaded = Snapshot::load(&cli.snapshot)?.restore(&store);
    tracing::info!(loaded, snapshot = %cli.snapshot.display(), "snapshot loaded");
    Ok(store)
}

fn save_store(store: &TripleStore, path: &Path) -> ExoResult<()> {
    Snapshot::capture(store).save(path)?;
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force } => {
            if cli.snapshot.exists() && !force {
                miette::bail!(
                    help = "pass --force to overwrite it",
                    "snapshot {} already exists",
                    cli.snapshot.display()
                );
            }
            Snapshot::empty().save(&cli.snapshot)?;
            println!("Initialized empty snapshot at {}", cli.snapshot.display());
        }

        Commands::Add {
            subject,
            predicate,
            object,
        } => {
            let store = open_store(&cli)?;
            let triple = Triple::new(subject.clone(), predicate.clone(), object.clone());
            if store.add(triple.clone()) {
                save_store(&store, &cli.snapshot)?;
                println!("added {triple}");
            } else {
                println!("already present: {triple}");
            }
        }

        Commands::Remove {
            subject,
            predicate,
            object,
        } => {
            let store = open_store(&cli)?;
            let triple = Triple::new(subject.clone(), predicate.clone(), object.clone());
            if store.remove(&triple) {
                save_store(&store, &cli.snapshot)?;
                println!("removed {triple}");
            } else {
                println!("not found: {triple}");
            }
        }

        Commands::Match {
            subject,
            predicate,
            object,
        } => {
            let store = open_store(&cli)?;
            let mut found =
                store.match_triples(subject.as_ref(), predicate.as_ref(), object.as_ref());
            found.sort_by_cached_key(ToString::to_string);
            for triple in &found {
                println!("{triple}");
            }
            eprintln!("{} triple(s)", found.len());
        }

        Commands::Uuid { uuid } => {
            let store = open_store(&cli)?;
            let subjects = store.find_subjects_by_uuid(uuid);
            if subjects.is_empty() {
                eprintln!("no subject embeds {uuid}");
            }
            for subject in subjects {
                println!("{subject}");
            }
        }

        Commands::Stats => {
            let store = open_store(&cli)?;
            let json = serde_json::to_string_pretty(&store.stats()).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}
