//! Command line driver: indexes a TREC collection, or dumps a saved index

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use term_index::base::Len;
use term_index::builder::{index_collection, IndexOptions};
use term_index::compress::Codec;
use term_index::error::Result;
use term_index::index::Postings;
use term_index::reader::CompressedIndex;

#[derive(Parser, Debug)]
#[command(name = "term-index")]
#[command(about = "Builds compressed inverted indexes of TREC collections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct TermIndexArgs {
    /// Show debug messages
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors (overrides verbose)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

impl TermIndexArgs {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a TREC collection
    Build(BuildArgs),

    /// Print the postings lists of a saved index
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// The TREC collection
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "index")]
    output: PathBuf,

    /// Codec for the postings lists
    #[arg(long, value_enum, default_value_t = Codec::VariableByte)]
    codec: Codec,

    /// Element delimiting the documents
    #[arg(long, default_value = "DOC")]
    document_tag: String,

    /// Log the number of documents every N documents
    #[arg(long, default_value_t = 10000)]
    progress_frequency: usize,

    /// Report the K most frequent terms
    #[arg(long, default_value_t = 0)]
    top_terms: usize,

    /// Read the collection in memory instead of mapping it
    #[arg(long)]
    in_memory: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// The index directory
    index: PathBuf,

    /// Only dump these terms (all terms if none)
    terms: Vec<String>,

    /// Memory-map the postings file instead of reading it
    #[arg(long)]
    mmap: bool,
}

fn build(args: BuildArgs) -> Result<()> {
    let options = IndexOptions {
        document_tag: args.document_tag,
        progress_frequency: args.progress_frequency,
        codec: args.codec,
        top_terms: args.top_terms,
        in_memory: args.in_memory,
    };

    let summary = index_collection(&args.input, &args.output, &options)?;
    info!(
        "Indexed {} documents ({} terms) into {}",
        summary.documents,
        summary.terms,
        args.output.display()
    );
    Ok(())
}

fn write_postings(out: &mut impl Write, term: &str, postings: &Postings) -> io::Result<()> {
    write!(out, "{} {}", term, postings.len())?;
    for posting in postings.iter() {
        write!(out, " {}", posting)?;
    }
    writeln!(out)
}

fn dump(args: DumpArgs) -> Result<()> {
    let index = CompressedIndex::load(Path::new(&args.index), !args.mmap)?;
    let mut out = BufWriter::new(io::stdout().lock());

    if args.terms.is_empty() {
        for entry in index.iter() {
            let (term, postings) = entry?;
            write_postings(&mut out, term, &postings)?;
        }
    } else {
        for term in args.terms.iter() {
            match index.postings(&term.to_ascii_lowercase())? {
                Some(postings) => write_postings(&mut out, term, &postings)?,
                None => writeln!(out, "{} 0", term)?,
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn main() {
    let args = TermIndexArgs::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level())).init();

    let result = match args.command {
        Command::Build(build_args) => build(build_args),
        Command::Dump(dump_args) => dump(dump_args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
