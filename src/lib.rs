//! TEP-64 token data codec.
//!
//! Implements the two standard content layouts used by NFT and jetton
//! contracts: off-chain content (a single snake-encoded URI) and on-chain
//! content (a 256-bit-keyed dictionary of snake-encoded field values, keyed
//! by the SHA-256 of each field name). Cell and dictionary primitives come
//! from `ton_types`.

pub use self::content::{
    decode_offchain_content, decode_onchain_content, encode_offchain_content,
    encode_onchain_content, is_plain_text, ContentDataFormat, ContentValue,
    CONTENT_DATA_FORMAT_CHUNKED, CONTENT_DATA_FORMAT_SNAKE, OFFCHAIN_CONTENT_PREFIX,
    ONCHAIN_CONTENT_PREFIX,
};
pub use self::dict::{append_content_dict, load_content_dict, store_content_dict, ContentDict};
pub use self::error::ContentError;
pub use self::meta::{meta_key, MetaDataField, NftMetaData, KNOWN_FIELD_NAMES};
pub use self::snake::{build_snake_cell, flatten_snake_cell, SNAKE_CHUNK_SIZE};

mod content;
mod dict;
mod error;
mod meta;
mod snake;

pub mod fields {
    //! Precomputed [`MetaDataField`](crate::MetaDataField) handles for the
    //! well-known field names.
    pub use crate::meta::{
        META_ATTRIBUTES, META_CONTENT_URL, META_DECIMALS, META_DESCRIPTION, META_IMAGE,
        META_IMAGE_DATA, META_NAME, META_RENDER_TYPE, META_SYMBOL, META_URI,
    };
}
