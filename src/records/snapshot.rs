//! Snapshot wire format for the discovery record store
//!
//! One JSON object maps each canonical raw URL to its flattened record.
//! Keys are emitted in ascending lexicographic order and the document is
//! terminated by a single trailing newline; both are committed parts of the
//! format, relied on by snapshot diffing and by resume.

use crate::records::DiscoveryRecord;
use crate::url::UrlEntity;
use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

/// On-disk shape of one record
///
/// Field order here is the member order in the serialized object.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    index: usize,
    parent_url: String,
    url: String,
    host: String,
    depth: u32,
    edges: Vec<usize>,
    #[serde(rename = "statusCode")]
    status_code: u16,
    #[serde(rename = "err", default, skip_serializing_if = "String::is_empty")]
    err_string: String,
}

impl From<&DiscoveryRecord> for SnapshotRecord {
    fn from(record: &DiscoveryRecord) -> Self {
        Self {
            index: record.index,
            parent_url: record.parent_url.clone(),
            url: record.url.raw.clone(),
            host: record.url.host.clone(),
            depth: record.depth,
            edges: record.edges.clone(),
            status_code: record.status_code,
            err_string: record.err_string.clone(),
        }
    }
}

impl From<SnapshotRecord> for DiscoveryRecord {
    fn from(record: SnapshotRecord) -> Self {
        Self {
            index: record.index,
            parent_url: record.parent_url,
            url: UrlEntity {
                host: record.host,
                raw: record.url,
            },
            depth: record.depth,
            edges: record.edges,
            status_code: record.status_code,
            err_string: record.err_string,
        }
    }
}

/// Writes the whole store as one newline-terminated JSON object
pub(super) fn write_snapshot<W: Write>(
    records: &HashMap<String, DiscoveryRecord>,
    writer: &mut W,
    pretty: bool,
) -> Result<(), StoreError> {
    // BTreeMap makes the lexicographic key order structural rather than an
    // iteration accident.
    let ordered: BTreeMap<&str, SnapshotRecord> = records
        .iter()
        .map(|(key, record)| (key.as_str(), SnapshotRecord::from(record)))
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &ordered)?;
    } else {
        serde_json::to_writer(&mut *writer, &ordered)?;
    }
    writer.write_all(b"\n")?;

    Ok(())
}

/// Parses a snapshot back into store contents
///
/// `index`, `depth`, and `edges` are taken verbatim from the input; nothing
/// is re-derived.
pub(super) fn read_snapshot<R: Read>(
    reader: &mut R,
) -> Result<HashMap<String, DiscoveryRecord>, StoreError> {
    let parsed: BTreeMap<String, SnapshotRecord> = serde_json::from_reader(reader)?;

    Ok(parsed
        .into_iter()
        .map(|(key, record)| (key, DiscoveryRecord::from(record)))
        .collect())
}
