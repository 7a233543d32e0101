use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ideascreen_core::{DEFAULT_TOP_N, ExtractedProposal, Extractor, PageMatchPolicy, split_pages};
use ideascreen_store::{
    DuckStore, MemoryStore, PROPOSAL_COLLECTION, RANK_COLLECTION, RecordStore, load_documents,
    load_proposals, save_extracted,
};
use tracing::info;

mod artifact;
mod display;
mod render;
mod screen;

use artifact::{ArtifactKind, write_artifact};

#[derive(Parser)]
#[command(name = "ideascreen", version, about = "Extract, score, and rank proposal documents")]
struct Cli {
    /// DuckDB database file. Required by every command except `extract`.
    #[arg(long, env = "IDEASCREEN_DB", global = true)]
    db: Option<PathBuf>,

    /// Directory for rendered HTML artifacts.
    #[arg(long, env = "IDEASCREEN_OUT_DIR", default_value = "templates", global = true)]
    out_dir: PathBuf,

    /// Collection holding proposal records.
    #[arg(long, env = "IDEASCREEN_PROPOSALS", default_value = PROPOSAL_COLLECTION, global = true)]
    proposals: String,

    /// Collection receiving ranked results.
    #[arg(long, env = "IDEASCREEN_RANKS", default_value = RANK_COLLECTION, global = true)]
    ranks: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract fields from one text document and print them
    Extract {
        /// Text file; pages separated by form feeds
        file: PathBuf,
        /// Keep the first page's value when a field repeats
        #[arg(long)]
        first_match: bool,
        /// Print JSON instead of a card
        #[arg(long)]
        json: bool,
    },
    /// Extract documents and store them as proposals, keyed by file stem
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        first_match: bool,
    },
    /// Score and rank stored proposals, publish the ranking
    Screen {
        /// Number of ranked ideas to keep
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: NonZeroUsize,
        /// Skip writing the rank collection
        #[arg(long)]
        no_publish: bool,
    },
    /// Render the proposal collection as an HTML table
    Table,
    /// Render a budget bar chart of stored proposals
    Chart,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    info!("ideascreen v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&cli)?;
    run(&cli, store.as_ref())
}

/// `extract` never touches the store; every other command needs a database file.
fn open_store(cli: &Cli) -> anyhow::Result<Box<dyn RecordStore>> {
    if matches!(cli.command, Command::Extract { .. }) {
        return Ok(Box::new(MemoryStore::new()));
    }
    let Some(path) = cli.db.as_deref() else {
        bail!("this command needs a store: pass --db <PATH> or set IDEASCREEN_DB");
    };
    let store = DuckStore::open_persistent(path)
        .with_context(|| format!("opening store at {}", path.display()))?;
    Ok(Box::new(store))
}

/// Document keys for `files`, one per file stem. Duplicate stems are rejected.
fn ingest_keys(files: &[PathBuf]) -> anyhow::Result<Vec<&str>> {
    let mut seen = HashSet::new();
    let mut keys = Vec::with_capacity(files.len());
    for file in files {
        let Some(key) = file.file_stem().and_then(|s| s.to_str()) else {
            bail!("cannot derive a document key from {}", file.display());
        };
        if !seen.insert(key) {
            bail!("duplicate document key {key} (from {})", file.display());
        }
        keys.push(key);
    }
    Ok(keys)
}

fn policy(first_match: bool) -> PageMatchPolicy {
    if first_match {
        PageMatchPolicy::FirstMatchWins
    } else {
        PageMatchPolicy::LastMatchWins
    }
}

fn extract_file(path: &Path, extractor: &Extractor) -> anyhow::Result<ExtractedProposal> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let pages = split_pages(&text);
    Ok(extractor.extract(&pages))
}

fn run(cli: &Cli, store: &dyn RecordStore) -> anyhow::Result<()> {
    match &cli.command {
        Command::Extract {
            file,
            first_match,
            json,
        } => {
            let extracted = extract_file(file, &Extractor::new(policy(*first_match)))?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&extracted)?);
            } else {
                display::print_extraction_card(&file.display().to_string(), &extracted);
            }
        }

        Command::Ingest { files, first_match } => {
            let extractor = Extractor::new(policy(*first_match));
            let keys = ingest_keys(files)?;
            for (file, key) in files.iter().zip(keys) {
                let extracted = extract_file(file, &extractor)?;
                save_extracted(store, &cli.proposals, key, &extracted)
                    .with_context(|| format!("storing {key}"))?;
                eprintln!("  {key}: stored in {}", cli.proposals);
            }
        }

        Command::Screen { top_n, no_publish } => {
            let opts = screen::ScreenOptions {
                proposals: &cli.proposals,
                ranks: &cli.ranks,
                top_n: *top_n,
                publish: !no_publish,
            };
            let outcome = screen::run_screen(store, &opts, chrono::Utc::now())?;
            let path = write_artifact(
                &cli.out_dir,
                ArtifactKind::RankedIdeas,
                &render::render_ranked(&outcome.ranked),
            )?;
            display::print_ranking(&outcome.ranked)?;
            let s = &outcome.stats;
            eprintln!(
                "  Read {} proposals, skipped {}, ranked {}, published {} in {:.2}s",
                s.read, s.skipped, s.ranked, s.published, s.elapsed_secs
            );
            eprintln!("  Wrote {}", path.display());
        }

        Command::Table => {
            let docs = load_documents(store, &cli.proposals)?;
            let path = write_artifact(&cli.out_dir, ArtifactKind::Table, &render::render_table(&docs))?;
            let records = load_proposals(store, &cli.proposals)?;
            display::print_proposals(&records)?;
            eprintln!("  Wrote {}", path.display());
        }

        Command::Chart => {
            let docs = load_documents(store, &cli.proposals)?;
            let svg = render::render_bar_chart(
                &docs,
                ideascreen_core::keys::NAME,
                ideascreen_core::keys::BUDGET,
            );
            let html = render::chart_page("Budget Bar Graph", &svg);
            let path = write_artifact(&cli.out_dir, ArtifactKind::Chart, &html)?;
            eprintln!("  Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_defaults() {
        let cli = Cli::try_parse_from(["ideascreen", "screen"]).unwrap();
        assert!(cli.db.is_none());
        assert_eq!(cli.out_dir, PathBuf::from("templates"));
        assert_eq!(cli.proposals, "finance");
        assert_eq!(cli.ranks, "rank");
        match cli.command {
            Command::Screen { top_n, no_publish } => {
                assert_eq!(top_n.get(), 3);
                assert!(!no_publish);
            }
            _ => panic!("expected screen"),
        }
    }

    #[test]
    fn zero_top_n_rejected() {
        assert!(Cli::try_parse_from(["ideascreen", "screen", "--top-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["ideascreen", "screen", "--top-n", "three"]).is_err());
    }

    #[test]
    fn ingest_requires_files() {
        assert!(Cli::try_parse_from(["ideascreen", "ingest"]).is_err());
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["ideascreen", "table", "--db", "x.duckdb"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.duckdb")));
    }

    #[test]
    fn ingest_then_screen_end_to_end() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bob = tmp.path().join("bob.txt");
        std::fs::write(&bob, "Name:Bob NPV:500 IRR:12 Budget:900 Email: bob@x.com").unwrap();
        let amy = tmp.path().join("amy.txt");
        std::fs::write(&amy, "Name:Amy NPV:10\x0cIRR:5 Budget:20").unwrap();
        let out = tmp.path().join("out");

        let store = MemoryStore::new();
        let ingest = Cli::try_parse_from([
            "ideascreen",
            "ingest",
            bob.to_str().unwrap(),
            amy.to_str().unwrap(),
        ])
        .unwrap();
        run(&ingest, &store).unwrap();
        assert_eq!(store.count(PROPOSAL_COLLECTION).unwrap(), 2);

        let screen = Cli::try_parse_from([
            "ideascreen",
            "screen",
            "--out-dir",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(&screen, &store).unwrap();
        let first = store.get(RANK_COLLECTION, "idea_1").unwrap().unwrap();
        assert_eq!(first["name"], serde_json::json!("Bob"));
        assert!(out.join("screened_ideas.html").exists());
    }

    #[test]
    fn store_commands_require_db() {
        for args in [
            vec!["ideascreen", "ingest", "a.txt"],
            vec!["ideascreen", "screen"],
            vec!["ideascreen", "table"],
            vec!["ideascreen", "chart"],
        ] {
            let mut cli = Cli::try_parse_from(args.iter().copied()).unwrap();
            cli.db = None;
            assert!(open_store(&cli).is_err(), "{args:?} ran without a store");
        }
    }

    #[test]
    fn extract_needs_no_db() {
        let mut cli = Cli::try_parse_from(["ideascreen", "extract", "a.txt"]).unwrap();
        cli.db = None;
        assert!(open_store(&cli).is_ok());
    }

    #[test]
    fn ingested_proposals_survive_between_invocations() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db = tmp.path().join("ideascreen.duckdb");
        let doc = tmp.path().join("zoe.txt");
        std::fs::write(&doc, "Name:Zoe NPV:40 IRR:8 Budget:70").unwrap();
        let out = tmp.path().join("out");
        let db_arg = db.to_str().unwrap();

        let ingest =
            Cli::try_parse_from(["ideascreen", "ingest", doc.to_str().unwrap(), "--db", db_arg])
                .unwrap();
        let store = open_store(&ingest).unwrap();
        run(&ingest, store.as_ref()).unwrap();
        drop(store);

        let screen = Cli::try_parse_from([
            "ideascreen",
            "screen",
            "--db",
            db_arg,
            "--out-dir",
            out.to_str().unwrap(),
        ])
        .unwrap();
        let store = open_store(&screen).unwrap();
        run(&screen, store.as_ref()).unwrap();
        let ranked = store.read_all(RANK_COLLECTION).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0]["name"], serde_json::json!("Zoe"));
    }

    #[test]
    fn duplicate_stems_rejected_before_any_write() {
        let tmp = tempfile::TempDir::new().unwrap();
        for dir in ["a", "b"] {
            std::fs::create_dir(tmp.path().join(dir)).unwrap();
            std::fs::write(tmp.path().join(dir).join("bob.txt"), "Name:Bob").unwrap();
        }
        let a = tmp.path().join("a").join("bob.txt");
        let b = tmp.path().join("b").join("bob.txt");
        let store = MemoryStore::new();
        let cli = Cli::try_parse_from([
            "ideascreen",
            "ingest",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(&cli, &store).is_err());
        assert_eq!(store.count(PROPOSAL_COLLECTION).unwrap(), 0);
    }

    #[test]
    fn ingest_keys_use_file_stems() {
        let files = vec![PathBuf::from("x/amy.txt"), PathBuf::from("y/bob.pdf.txt")];
        assert_eq!(ingest_keys(&files).unwrap(), vec!["amy", "bob.pdf"]);
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let store = MemoryStore::new();
        let cli =
            Cli::try_parse_from(["ideascreen", "extract", "/nonexistent/proposal.txt"]).unwrap();
        assert!(run(&cli, &store).is_err());
    }
}
