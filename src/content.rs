use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use ton_types::{BuilderData, Cell, IBitstring, SliceData, UInt256};

use crate::dict::{append_content_dict, load_content_dict, store_content_dict};
use crate::error::ContentError;
use crate::meta::{meta_key, BASE_FIELD_REGISTRY};
use crate::snake::{build_snake_cell, flatten_snake_cell};

pub const ONCHAIN_CONTENT_PREFIX: u8 = 0x00;
pub const OFFCHAIN_CONTENT_PREFIX: u8 = 0x01;

pub const CONTENT_DATA_FORMAT_SNAKE: u8 = 0x00;
pub const CONTENT_DATA_FORMAT_CHUNKED: u8 = 0x01;

/// Layout of a field-value cell, taken from its leading format byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDataFormat {
    Snake,
    /// Reserved by the format. There is no encoder for it here; decoders
    /// must reject it explicitly instead of misparsing the payload.
    Chunked,
    Unknown(u8),
}

impl From<u8> for ContentDataFormat {
    fn from(byte: u8) -> Self {
        match byte {
            CONTENT_DATA_FORMAT_SNAKE => Self::Snake,
            CONTENT_DATA_FORMAT_CHUNKED => Self::Chunked,
            byte => Self::Unknown(byte),
        }
    }
}

/// A decoded field value. The format stores no type tag, so the decoder
/// classifies bytes as text or binary with [`is_plain_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl ContentValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    fn from_decoded(bytes: Vec<u8>) -> Self {
        if is_plain_text(&bytes) {
            match String::from_utf8(bytes) {
                Ok(text) => Self::Text(text),
                Err(e) => Self::Bytes(e.into_bytes()),
            }
        } else {
            Self::Bytes(bytes)
        }
    }
}

impl From<&str> for ContentValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ContentValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for ContentValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// True if `data` is valid UTF-8 and contains no control byte below 0x20
/// other than `\t`, `\n` and `\r`. Values failing this check are exposed as
/// raw bytes, with no way for the encoder to force the text classification.
pub fn is_plain_text(data: &[u8]) -> bool {
    if data
        .iter()
        .any(|&byte| byte < 0x20 && !matches!(byte, b'\t' | b'\n' | b'\r'))
    {
        return false;
    }
    std::str::from_utf8(data).is_ok()
}

/// Off-chain content: a single URI-style pointer, stored as
/// `0x01 || utf8(text)` in a snake chain.
pub fn encode_offchain_content(text: &str) -> Result<Cell> {
    let mut data = Vec::with_capacity(text.len() + 1);
    data.push(OFFCHAIN_CONTENT_PREFIX);
    data.extend_from_slice(text.as_bytes());
    build_snake_cell(&data)
}

pub fn decode_offchain_content(cell: &Cell) -> Result<String> {
    let data = flatten_snake_cell(cell)?;
    match data.split_first() {
        Some((&OFFCHAIN_CONTENT_PREFIX, text)) => Ok(String::from_utf8(text.to_vec())?),
        Some(_) => Err(ContentError::InvalidPrefix.into()),
        None => Err(ContentError::MalformedChain("empty content cell").into()),
    }
}

/// On-chain content: `0x00` prefix, then a dictionary keyed by the SHA-256
/// of each field name, each value a snake-encoded cell. Insertion order is
/// irrelevant; the serialized dictionary is sorted by key.
pub fn encode_onchain_content(fields: &HashMap<String, ContentValue>) -> Result<Cell> {
    let map = store_content_dict(
        fields
            .iter()
            .map(|(name, value)| (meta_key(name), value.as_bytes())),
    )?;

    let mut builder = BuilderData::new();
    builder.append_u8(ONCHAIN_CONTENT_PREFIX)?;
    append_content_dict(&mut builder, &map)?;
    builder.into_cell()
}

/// Decodes on-chain content back into named fields. Keys are resolved
/// against the base registry extended with `additional_fields` for this
/// call only; an unresolved key becomes `hash_<64-char lowercase hex>`.
pub fn decode_onchain_content(
    cell: &Cell,
    additional_fields: &[&str],
) -> Result<HashMap<String, ContentValue>> {
    let mut slice = SliceData::load_cell_ref(cell)?;
    if slice.get_next_byte()? != ONCHAIN_CONTENT_PREFIX {
        return Err(ContentError::InvalidPrefix.into());
    }

    let overlay: HashMap<UInt256, &str> = additional_fields
        .iter()
        .map(|name| (meta_key(name), *name))
        .collect();

    let dict = load_content_dict(&mut slice)?;
    let mut fields = HashMap::with_capacity(dict.len());
    for (key, value) in dict {
        let name = BASE_FIELD_REGISTRY
            .get(&key)
            .copied()
            .or_else(|| overlay.get(&key).copied())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("hash_{}", hex::encode(key.as_slice())));
        fields.insert(name, ContentValue::from_decoded(value));
    }
    Ok(fields)
}
