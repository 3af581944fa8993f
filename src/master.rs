use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use tracing::{debug, info};

use crate::errors::PacknoteError;
use crate::ledgers::{Ledger, NewLedger};

const MESSAGES_KEY: &str = "tallymessage";

/// A Tally master export held as raw JSON, so fields we do not know about survive a save.
#[derive(Debug, Clone)]
pub struct MasterFile {
    path: PathBuf,
    document: Value,
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (little_endian, body) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (true, bytes),
    };
    if body.len() % 2 != 0 {
        return None;
    }
    let units = body.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

fn decode_utf8(bytes: &[u8]) -> Result<&str, std::str::Utf8Error> {
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    std::str::from_utf8(body)
}

/// Tally writes UTF-16 by default; anything we saved ourselves is UTF-8.
pub fn parse_document(path: &Path, bytes: &[u8]) -> Result<Value, PacknoteError> {
    if let Some(text) = decode_utf16(bytes) {
        match serde_json::from_str(&text) {
            Ok(document) => {
                debug!(path = %path.display(), "decoded as UTF-16");
                return Ok(document);
            }
            Err(e) => debug!(error = %e, "not UTF-16 JSON, trying UTF-8"),
        }
    }
    let encoding_error = |reason: String| PacknoteError::Encoding {
        path: path.to_path_buf(),
        reason,
    };
    let text = decode_utf8(bytes).map_err(|e| encoding_error(e.to_string()))?;
    let document = serde_json::from_str(text).map_err(|e| encoding_error(e.to_string()))?;
    debug!(path = %path.display(), "decoded as UTF-8");
    Ok(document)
}

impl MasterFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PacknoteError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PacknoteError::file(path, e))?;
        let document = parse_document(path, &bytes)?;
        let master = Self {
            path: path.to_path_buf(),
            document,
        };
        info!(
            path = %path.display(),
            ledgers = master.ledgers().len(),
            "loaded master file"
        );
        Ok(master)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All ledger records, sorted by name.
    pub fn ledgers(&self) -> Vec<Ledger> {
        let mut ledgers: Vec<Ledger> = self
            .document
            .get(MESSAGES_KEY)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Ledger::from_item).collect())
            .unwrap_or_default();
        ledgers.sort_by(|a, b| a.name.cmp(&b.name));
        ledgers
    }

    /// Appends the record to `tallymessage` and rewrites the file.
    pub fn append_ledger(&mut self, new_ledger: &NewLedger) -> Result<Ledger, PacknoteError> {
        let record = new_ledger.to_tally_value()?;
        let root = self.document.as_object_mut().ok_or_else(|| {
            PacknoteError::Structure("the document root is not a JSON object".into())
        })?;
        let messages = root
            .entry(MESSAGES_KEY)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| PacknoteError::Structure(format!("`{MESSAGES_KEY}` is not a list")))?;
        messages.push(record.clone());
        self.save()?;
        info!(name = %new_ledger.name, path = %self.path.display(), "saved new ledger");
        Ledger::from_item(&record)
            .ok_or_else(|| PacknoteError::Structure("new record is not a ledger".into()))
    }

    /// Writes the document back as 4-space indented UTF-8 JSON.
    pub fn save(&self) -> Result<(), PacknoteError> {
        let file = File::create(&self.path).map_err(|e| PacknoteError::file(&self.path, e))?;
        let mut file_writer = BufWriter::new(file);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut file_writer, PrettyFormatter::with_indent(b"    "));
        self.document.serialize(&mut serializer)?;
        file_writer.flush()?;
        Ok(())
    }

    /// An empty export in memory, used when starting without a file on disk.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        let mut root = Map::new();
        root.insert(MESSAGES_KEY.into(), Value::Array(Vec::new()));
        Self {
            path: path.into(),
            document: Value::Object(root),
        }
    }
}
