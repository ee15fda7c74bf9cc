use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ton_types::UInt256;

use crate::dict::ContentDict;

/// Content key of a metadata field: the SHA-256 digest of the UTF-8 field
/// name, interpreted as a big-endian 256-bit integer.
pub fn meta_key(name: &str) -> UInt256 {
    let mut hasher: Sha256 = Sha256::new();
    hasher.update(name.as_bytes());
    UInt256::from_slice(&hasher.finalize()[..])
}

/// A well-known metadata field with its precomputed content key.
pub struct MetaDataField {
    pub name: &'static str,
    pub key: UInt256,
}

impl MetaDataField {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            key: meta_key(name),
        }
    }

    pub fn read_string(&self, dict: &ContentDict) -> Option<String> {
        dict.get(&self.key)
            .cloned()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    pub fn read_bytes(&self, dict: &ContentDict) -> Option<Vec<u8>> {
        dict.get(&self.key).cloned()
    }
}

/// Field names resolvable without caller hints. Append-only: removing or
/// renaming an entry changes how previously encoded dictionaries decode.
pub const KNOWN_FIELD_NAMES: [&str; 13] = [
    "uri",
    "name",
    "description",
    "image",
    "image_data",
    "symbol",
    "decimals",
    "content_url",
    "attributes",
    "amount_style",
    "render_type",
    "currency",
    "game",
];

lazy_static! {
    pub static ref META_URI: MetaDataField = MetaDataField::new("uri");
    pub static ref META_NAME: MetaDataField = MetaDataField::new("name");
    pub static ref META_DESCRIPTION: MetaDataField = MetaDataField::new("description");
    pub static ref META_IMAGE: MetaDataField = MetaDataField::new("image");
    pub static ref META_IMAGE_DATA: MetaDataField = MetaDataField::new("image_data");
    pub static ref META_SYMBOL: MetaDataField = MetaDataField::new("symbol");
    pub static ref META_DECIMALS: MetaDataField = MetaDataField::new("decimals");
    pub static ref META_CONTENT_URL: MetaDataField = MetaDataField::new("content_url");
    pub static ref META_ATTRIBUTES: MetaDataField = MetaDataField::new("attributes");
    pub static ref META_RENDER_TYPE: MetaDataField = MetaDataField::new("render_type");

    /// Reverse lookup from content key to field name, built once and never
    /// mutated afterwards. Caller-supplied names are resolved through a
    /// per-call overlay instead.
    pub static ref BASE_FIELD_REGISTRY: HashMap<UInt256, &'static str> = KNOWN_FIELD_NAMES
        .iter()
        .map(|name| (meta_key(name), *name))
        .collect();
}

/// Typed view over a decoded on-chain content dictionary, covering the
/// fields NFT items and collections commonly carry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NftMetaData {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub content_url: Option<String>,
    pub attributes: Option<String>,
    pub render_type: Option<String>,
}

impl From<&ContentDict> for NftMetaData {
    fn from(dict: &ContentDict) -> Self {
        NftMetaData {
            uri: META_URI.read_string(dict),
            name: META_NAME.read_string(dict),
            description: META_DESCRIPTION.read_string(dict),
            image: META_IMAGE.read_string(dict),
            image_data: META_IMAGE_DATA.read_bytes(dict),
            content_url: META_CONTENT_URL.read_string(dict),
            attributes: META_ATTRIBUTES.read_string(dict),
            render_type: META_RENDER_TYPE.read_string(dict),
        }
    }
}
