//! Binary encoding of save records with bincode.

use super::{PersistError, SessionRecord};

pub fn encode(record: &SessionRecord) -> Result<Vec<u8>, PersistError> {
    bincode::serialize(record).map_err(|e| PersistError::Io(e.to_string()))
}

/// Bytes that do not decode to a record are reported as corrupt.
pub fn decode(bytes: &[u8]) -> Result<SessionRecord, PersistError> {
    bincode::deserialize(bytes).map_err(|e| PersistError::Corrupt(e.to_string()))
}
