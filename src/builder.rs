use std::path::Path;

use derivative::Derivative;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::base::IndexInformation;
use crate::compress::Codec;
use crate::error::Result;
use crate::index::IndexManager;
use crate::parser::{Parser, TokenKind};
use crate::serialize::save_index;
use crate::trec::TrecDocuments;
use crate::utils::buffer::{open_buffer, Buffer};

const DEFAULT_PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct IndexOptions {
    /// Name of the element delimiting documents
    #[derivative(Default(value = "\"DOC\".to_string()"))]
    pub document_tag: String,

    /// Report the number of documents every X documents
    /// (0 means only at the end)
    #[derivative(Default(value = "10000"))]
    pub progress_frequency: usize,

    /// Codec for the postings lists
    pub codec: Codec,

    /// Number of most frequent terms to report (0 to disable)
    #[derivative(Default(value = "0"))]
    pub top_terms: usize,

    /// Read the collection into memory instead of mapping it
    #[derivative(Default(value = "false"))]
    pub in_memory: bool,
}

/// What an indexing run produced
pub struct IndexSummary {
    pub documents: usize,
    pub terms: usize,

    /// Most frequent terms with their document frequency
    pub top_terms: Vec<(String, usize)>,

    pub information: IndexInformation,
}

/// Feeds the documents of a TREC collection to a new index manager
pub fn index_documents(collection: &[u8], options: &IndexOptions) -> Result<IndexManager> {
    let mut index = IndexManager::new();

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template(DEFAULT_PROGRESS_TEMPLATE));

    let mut total_documents = 0;
    for document in TrecDocuments::new(collection) {
        total_documents += 1;
        if options.progress_frequency > 0 && total_documents % options.progress_frequency == 0 {
            info!("Documents: {}", total_documents);
            progress.set_message(&format!("{} documents", total_documents));
            progress.tick();
        }

        let primary_key = document
            .primary_key()
            .unwrap_or_else(|| (total_documents - 1).to_string());

        for token in Parser::new(document.contents) {
            match token.kind {
                TokenKind::Alpha | TokenKind::Numeric => index.term(&token)?,
                TokenKind::XmlStartTag if token.is_tag(&options.document_tag) => {
                    index.begin_document(&primary_key)?;
                }
                TokenKind::XmlEndTag if token.is_tag(&options.document_tag) => {
                    index.end_document()?
                }
                _ => {}
            }
        }
    }

    progress.finish_and_clear();
    info!("Documents: {}", total_documents);
    Ok(index)
}

/// Indexes the collection at `input` and serializes the index into `output`
pub fn index_collection(input: &Path, output: &Path, options: &IndexOptions) -> Result<IndexSummary> {
    info!("Indexing {}", input.display());
    let collection = open_buffer(input, options.in_memory)?;
    let index = index_documents(collection.data(), options)?;

    let top_terms = index.top_terms(options.top_terms);
    for (rank, (term, df)) in top_terms.iter().enumerate() {
        info!("[{}] {} ({} documents)", rank + 1, term, df);
    }

    let information = save_index(&index, output, options.codec)?;
    Ok(IndexSummary {
        documents: index.document_count(),
        terms: index.term_count(),
        top_terms,
        information,
    })
}
