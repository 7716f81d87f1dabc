//! Metadata dump parsing
//!
//! Several controllers read request metadata from the engine: the dump is a
//! sequence of blocks separated by `--- <n> ---` lines, each block holding
//! `key="value"` entries. Most values are free-form strings; a few keys are
//! numeric or boolean by convention and get typed accessors here.

use std::collections::BTreeMap;

/// One metadata block from a `*.metadata` dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<String, String>,
}

impl Metadata {
    /// Raw string value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Request id
    pub fn rid(&self) -> Option<u32> {
        self.int_field("rid")
    }

    /// Position in the secondary queue
    pub fn queue_position(&self) -> Option<u32> {
        self.int_field("2nd_queue_pos")
    }

    /// Id of the source that created the request
    pub fn source_id(&self) -> Option<u32> {
        self.int_field("source_id")
    }

    /// Whether the request is flagged to be skipped
    pub fn skip(&self) -> Option<bool> {
        self.get("skip").map(|v| v == "true")
    }

    /// Artist tag, if present
    pub fn artist(&self) -> Option<&str> {
        self.get("artist")
    }

    /// Title tag, if present
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// URI the request was created from
    pub fn uri(&self) -> Option<&str> {
        self.get("initial_uri")
    }

    /// Number of entries in the block
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the block has no entries
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn int_field(&self, key: &str) -> Option<u32> {
        self.get(key)?.parse().ok()
    }
}

/// Parse a metadata dump into its blocks
///
/// Blocks without any entry are dropped. A line that is neither a separator
/// nor a `key="value"` entry is skipped with a warning, consistent with the
/// node-listing parser.
pub fn parse_metadata_blocks(text: &str) -> Vec<Metadata> {
    let mut blocks = Vec::new();
    let mut current: Option<Metadata> = None;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if is_block_separator(line) {
            if let Some(block) = current.take() {
                if !block.is_empty() {
                    blocks.push(block);
                }
            }
            current = Some(Metadata::default());
            continue;
        }
        match parse_entry(line) {
            Some((key, value)) => {
                current
                    .get_or_insert_with(Metadata::default)
                    .fields
                    .insert(key, value);
            }
            None => tracing::warn!(line, "skipping malformed metadata entry"),
        }
    }
    if let Some(block) = current {
        if !block.is_empty() {
            blocks.push(block);
        }
    }
    blocks
}

/// `--- <digits> ---`
fn is_block_separator(line: &str) -> bool {
    line.strip_prefix("--- ")
        .and_then(|rest| rest.strip_suffix(" ---"))
        .map_or(false, |n| {
            !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())
        })
}

/// `key="value"`
fn parse_entry(line: &str) -> Option<(String, String)> {
    let (key, raw) = line.split_once('=')?;
    let value = raw.strip_prefix('"')?.strip_suffix('"')?;
    Some((key.to_string(), value.to_string()))
}
