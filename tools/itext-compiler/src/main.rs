mod corpus;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itext_feed::{decode_feed, FeedLocator};
use itext_index::{group_by_source, TextStore};
use itext_locus::DEFAULT_SEPARATOR;
use itext_protocol::PassageQuery;
use itext_reader::{render_rows, Page, PageConfig, RenderUpdate, RowOptions, StaticFeed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about = "Builds and queries intertext reader corpora")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile Tesserae XML files into an rkyv corpus archive
    Ingest {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[arg(value_name = "XML", required = true)]
        files: Vec<PathBuf>,
    },

    /// List the texts stored in a corpus archive
    Texts {
        #[arg(short, long, value_name = "FILE")]
        corpus: PathBuf,
    },

    /// Print the units of a passage
    Passage {
        #[arg(short, long, value_name = "FILE")]
        corpus: PathBuf,

        #[arg(long)]
        text: String,

        #[arg(long)]
        first: String,

        #[arg(long)]
        last: String,
    },

    /// Print annotation counts per source for a feed document
    Sources {
        #[arg(short, long, value_name = "FILE")]
        feed: PathBuf,
    },

    /// Render a passage with its annotation badges
    Badges {
        #[arg(short, long, value_name = "FILE")]
        corpus: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        feed: PathBuf,

        /// `<text> <first> <last>`, ignored when --config is given
        #[arg(short, long, required_unless_present = "config")]
        passage: Option<String>,

        /// Page configuration (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itext=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { output, files } => {
            let corpus = corpus::ingest(&files)?;
            corpus::write_archive(&corpus, &output)?;
            println!("✅ {} texts written to {:?}", corpus.texts.len(), output);
        }
        Command::Texts { corpus } => {
            let store = TextStore::from_corpus(corpus::read_archive(&corpus)?);
            for name in store.names() {
                let units = store.text(name)?.units.len();
                println!("{:>6}  {}", units, name);
            }
        }
        Command::Passage {
            corpus,
            text,
            first,
            last,
        } => {
            let store = TextStore::from_corpus(corpus::read_archive(&corpus)?);
            let query = PassageQuery { name: text, first, last };
            let units = store.passage(&query)?;
            for row in render_rows(units, RowOptions::default(), DEFAULT_SEPARATOR) {
                println!("{:>8}  {}", row.loc, row.verse);
            }
        }
        Command::Sources { feed } => {
            let json = fs::read_to_string(&feed).with_context(|| format!("reading {}", feed.display()))?;
            let itexts = decode_feed(&json)?;
            let tally = group_by_source(&itexts);
            println!("{:>5}  all", tally.total());
            for (source, count) in tally.sorted() {
                println!("{:>5}  {}", count, source);
            }
        }
        Command::Badges {
            corpus,
            feed,
            passage,
            config,
        } => {
            let config = match (config, passage) {
                (Some(path), _) => {
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    PageConfig::from_json(&json)?
                }
                (None, Some(passage)) => PageConfig::new(passage, FeedLocator::new(feed.display().to_string())),
                (None, None) => anyhow::bail!("either --passage or --config is required"),
            };

            let store = TextStore::from_corpus(corpus::read_archive(&corpus)?);
            let json = fs::read_to_string(&feed).with_context(|| format!("reading {}", feed.display()))?;

            let mut page = Page::new(config);
            let updates = page.init_page(&store, &StaticFeed::new(json));
            print_updates(&updates);
        }
    }

    Ok(())
}

fn print_updates(updates: &[RenderUpdate]) {
    let badges: Vec<_> = updates
        .iter()
        .filter_map(|u| match u {
            RenderUpdate::Badges { badges } => Some(badges),
            _ => None,
        })
        .flatten()
        .collect();

    for update in updates {
        match update {
            RenderUpdate::Title { text } => println!("📖 {}\n", text),
            RenderUpdate::Rows { rows } => {
                for row in rows {
                    let count = badges
                        .iter()
                        .find(|b| b.row_id == row.id)
                        .map(|b| format!("[{}]", b.count))
                        .unwrap_or_default();
                    println!("{:>8}  {:<60} {}", row.loc, row.verse, count);
                }
            }
            RenderUpdate::SourceList { list } => {
                println!("{:>5}  all", list.total);
                for row in &list.rows {
                    println!("{:>5}  {}", row.count, row.source);
                }
                println!();
            }
            RenderUpdate::Error { message } => eprintln!("❌ {}", message),
            _ => {}
        }
    }
}
