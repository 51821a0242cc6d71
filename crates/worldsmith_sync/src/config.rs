//! Persisted config files.
//!
//! A config document is `{"dataPool": [EntityCollection, ...]}`. Loading is
//! lenient per entry: an entry that fails to decode is skipped and reported
//! with the JSON path of the offending field, and the rest still load.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use worldsmith_foundation::{Error, ErrorKind, Result};
use worldsmith_storage::{EntityCollection, EntityGraph};

use crate::feed::DICT_MODEL;

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "dataPool")]
    data_pool: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    #[serde(rename = "dataPool")]
    data_pool: &'a [EntityCollection],
}

/// Why a config entry was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationMessage {
    /// Human-readable, path-qualified description.
    pub message: String,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A decoded config document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Entries that decoded.
    pub data_pool: Vec<EntityCollection>,
    /// One message per skipped entry.
    pub messages: Vec<ValidationMessage>,
}

impl LoadedConfig {
    /// The first validation message, if any.
    #[must_use]
    pub fn first_message(&self) -> Option<&ValidationMessage> {
        self.messages.first()
    }
}

/// Parses a config document.
///
/// # Errors
///
/// A validation error if the document is not a `dataPool` envelope.
pub fn load(json: &str) -> Result<LoadedConfig> {
    let envelope: Envelope = serde_json::from_str(json)
        .map_err(|e| Error::new(ErrorKind::Validation(format!("not a config document: {e}"))))?;

    let mut loaded = LoadedConfig::default();
    for (i, entry) in envelope.data_pool.into_iter().enumerate() {
        if entry.get(DICT_MODEL).is_some() {
            debug!(entry = i, "config skipped dictionary entry");
            continue;
        }
        match serde_path_to_error::deserialize::<_, EntityCollection>(entry) {
            Ok(collection) if collection.is_empty() => {
                loaded.messages.push(ValidationMessage {
                    message: format!("dataPool[{i}]: no components"),
                });
            }
            Ok(collection) => loaded.data_pool.push(collection),
            Err(e) => {
                let path = e.path().to_string();
                let location = if path == "." {
                    format!("dataPool[{i}]")
                } else {
                    format!("dataPool[{i}].{path}")
                };
                loaded.messages.push(ValidationMessage {
                    message: format!("{location}: {}", e.inner()),
                });
            }
        }
    }

    if let Some(first) = loaded.first_message() {
        warn!(skipped = loaded.messages.len(), first = %first, "config entries skipped");
    }
    Ok(loaded)
}

/// Serializes the graph's real entities as a config document.
///
/// # Errors
///
/// Serialization errors.
pub fn save(graph: &EntityGraph) -> Result<String> {
    let entities = graph.get_entities();
    serde_json::to_string_pretty(&EnvelopeRef {
        data_pool: &entities,
    })
    .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Reads and parses a config file.
///
/// # Errors
///
/// I/O errors and the errors of [`load`].
pub fn load_file(path: impl AsRef<Path>) -> Result<LoadedConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|e| Error::new(ErrorKind::Io(format!("{}: {e}", path.display()))))?;
    load(&json)
}

/// Writes the graph's real entities to a config file.
///
/// # Errors
///
/// I/O and serialization errors.
pub fn save_file(path: impl AsRef<Path>, graph: &EntityGraph) -> Result<()> {
    let path = path.as_ref();
    let json = save(graph)?;
    fs::write(path, json)
        .map_err(|e| Error::new(ErrorKind::Io(format!("{}: {e}", path.display()))))
}
