//! Splits a TREC collection into its `<DOC>` ... `</DOC>` documents

const DOCUMENT_START: &[u8] = b"<DOC>";
const DOCUMENT_END: &[u8] = b"</DOC>";
const PRIMARY_KEY_START: &[u8] = b"<DOCNO>";
const PRIMARY_KEY_END: &[u8] = b"</DOCNO>";

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// A document of a TREC collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrecDocument<'a> {
    /// The document text, including its `<DOC>` tags
    pub contents: &'a [u8],
}

impl<'a> TrecDocument<'a> {
    /// The trimmed content of the `<DOCNO>` element, if any
    pub fn primary_key(&self) -> Option<String> {
        let start = find(self.contents, PRIMARY_KEY_START)? + PRIMARY_KEY_START.len();
        let length = find(&self.contents[start..], PRIMARY_KEY_END)?;
        let key = String::from_utf8_lossy(&self.contents[start..start + length]);
        Some(key.trim().to_string())
    }
}

/// Iterates over the documents of a collection
pub struct TrecDocuments<'a> {
    collection: &'a [u8],
    position: usize,
}

impl<'a> TrecDocuments<'a> {
    pub fn new(collection: &'a [u8]) -> Self {
        Self {
            collection,
            position: 0,
        }
    }
}

impl<'a> Iterator for TrecDocuments<'a> {
    type Item = TrecDocument<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let collection = self.collection;
        let rest = &collection[self.position..];
        let start = find(rest, DOCUMENT_START)?;

        // An unterminated document runs until the end of the collection
        let end = match find(&rest[start..], DOCUMENT_END) {
            Some(offset) => start + offset + DOCUMENT_END.len(),
            None => rest.len(),
        };

        let contents = &rest[start..end];
        self.position += end;
        Some(TrecDocument { contents })
    }
}
