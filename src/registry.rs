//! Node registry parsing
//!
//! The engine's `list` command returns one line per controllable node, of
//! the form `<name> : <type>` with the colon surrounded by whitespace. This
//! module turns that text into an ordered sequence of [`NodeRecord`]s.
//!
//! The parse is deliberately lenient per line: a malformed line degrades
//! that one row (with a warning), never the whole poll. Output order equals
//! input line order, which fixes the display order of nodes and lets the
//! shell diff successive listings.

use crate::client::ControlChannel;
use crate::error::Result;

/// One row of the engine's node listing
///
/// Rebuilt fresh on every poll cycle; carries no identity beyond
/// name + kind for that cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Node name, unique within a single listing by convention
    pub name: String,
    /// Raw type tag; resolved by the dispatcher
    pub kind: String,
}

impl NodeRecord {
    /// Create a record
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Issue `list` on the channel and parse the response
pub fn list_nodes(channel: &mut dyn ControlChannel) -> Result<Vec<NodeRecord>> {
    Ok(parse_node_list(&channel.command("list")?))
}

/// Parse the raw text of a `list` response
///
/// Empty lines are ignored; lines that do not tokenize as `<name> : <kind>`
/// are skipped with a warning. Record order matches line order exactly.
pub fn parse_node_list(text: &str) -> Vec<NodeRecord> {
    let mut records = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_node_line(line) {
            Some(record) => records.push(record),
            None => tracing::warn!(line, "skipping malformed node listing line"),
        }
    }
    records
}

/// Tokenize one listing line: exactly `<name>`, `:`, `<kind>`
fn parse_node_line(line: &str) -> Option<NodeRecord> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    if tokens.next()? != ":" {
        return None;
    }
    let kind = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(NodeRecord::new(name, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockChannel;
    use proptest::prelude::*;

    #[test]
    fn test_parse_preserves_order_and_strings() {
        let records = parse_node_list("music : queue\nmixer : mixer\nbroadcast : output.icecast\n");
        assert_eq!(
            records,
            vec![
                NodeRecord::new("music", "queue"),
                NodeRecord::new("mixer", "mixer"),
                NodeRecord::new("broadcast", "output.icecast"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(parse_node_list("").is_empty());
        assert!(parse_node_list("\n\n").is_empty());
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let records = parse_node_list("music : queue\nnot a node line\nmixer : mixer\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "music");
        assert_eq!(records[1].name, "mixer");
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        assert!(parse_node_list("music queue").is_empty());
        assert!(parse_node_list("music :queue").is_empty());
        assert!(parse_node_list("music: queue").is_empty());
    }

    #[test]
    fn test_trailing_tokens_are_malformed() {
        assert!(parse_node_list("music : queue extra").is_empty());
    }

    #[test]
    fn test_list_nodes_issues_list_command() {
        let mut chan = MockChannel::new().with_response("list", "music : queue");
        let log = chan.log_handle();
        let records = list_nodes(&mut chan).unwrap();
        assert_eq!(records, vec![NodeRecord::new("music", "queue")]);
        assert_eq!(*log.lock().unwrap(), vec!["list".to_string()]);
    }

    proptest! {
        /// Well-formed listings parse back in order with exact strings.
        #[test]
        fn prop_wellformed_listing_roundtrip(
            rows in prop::collection::vec(("[a-z][a-z0-9_]{0,12}", "[a-z][a-z0-9_.]{0,12}"), 0..16)
        ) {
            let text: String = rows
                .iter()
                .map(|(name, kind)| format!("{} : {}\n", name, kind))
                .collect();
            let records = parse_node_list(&text);
            prop_assert_eq!(records.len(), rows.len());
            for (record, (name, kind)) in records.iter().zip(rows.iter()) {
                prop_assert_eq!(&record.name, name);
                prop_assert_eq!(&record.kind, kind);
            }
        }

        /// Parsing is a pure function of its input.
        #[test]
        fn prop_parse_is_idempotent(text in "[ -~\\n]{0,200}") {
            prop_assert_eq!(parse_node_list(&text), parse_node_list(&text));
        }
    }
}
