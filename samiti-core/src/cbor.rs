// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding and decoding of records in [CBOR].
//!
//! Records are handed to the store, published on the change feed and persisted as the session
//! snapshot as CBOR bytes. Decoding is strict: a value which does not match the target type (for
//! example an unknown role identifier) is rejected instead of being coerced.
//!
//! [CBOR]: https://cbor.io/
use ciborium::de::Error as DeserializeError;
use ciborium::ser::Error as SerializeError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Serializes a value into CBOR bytes.
pub fn encode_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)?;
    Ok(bytes)
}

/// Deserializes a value from CBOR bytes.
pub fn decode_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value = ciborium::de::from_reader(bytes)?;
    Ok(value)
}

/// A value could not be serialized.
#[derive(Debug, Error)]
#[error("could not encode value: {0}")]
pub struct EncodeError(String);

impl From<SerializeError<std::io::Error>> for EncodeError {
    fn from(value: SerializeError<std::io::Error>) -> Self {
        match value {
            SerializeError::Io(err) => EncodeError(err.to_string()),
            SerializeError::Value(reason) => EncodeError(reason),
        }
    }
}

/// Bytes could not be turned back into the requested value.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not valid CBOR or do not describe the requested type.
    ///
    /// Contains the offset of the offending item, when known.
    #[error("malformed value at position {offset:?}: {reason}")]
    Malformed {
        offset: Option<usize>,
        reason: String,
    },

    /// Nesting exceeded the decoder's recursion limit.
    #[error("recursion limit exceeded while decoding")]
    TooDeep,
}

impl From<DeserializeError<std::io::Error>> for DecodeError {
    fn from(value: DeserializeError<std::io::Error>) -> Self {
        match value {
            DeserializeError::Io(err) => DecodeError::Malformed {
                offset: None,
                reason: err.to_string(),
            },
            DeserializeError::Syntax(offset) => DecodeError::Malformed {
                offset: Some(offset),
                reason: "syntax error".into(),
            },
            DeserializeError::Semantic(offset, reason) => DecodeError::Malformed { offset, reason },
            DeserializeError::RecursionLimitExceeded => DecodeError::TooDeep,
        }
    }
}
