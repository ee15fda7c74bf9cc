use std::collections::BTreeMap;

use anyhow::Result;
use ton_types::{BuilderData, Cell, HashmapE, HashmapType, IBitstring, SliceData, UInt256};

use crate::content::{ContentDataFormat, CONTENT_DATA_FORMAT_SNAKE};
use crate::error::ContentError;
use crate::snake::{build_snake_cell, flatten_snake_cell};

/// Decoded on-chain content dictionary. A `BTreeMap` keeps entries in the
/// canonical ascending key order the serialized dictionary uses.
pub type ContentDict = BTreeMap<UInt256, Vec<u8>>;

const CONTENT_KEY_BITS: usize = 256;

/// Packs `(key, value-bytes)` pairs into a 256-bit-keyed dictionary whose
/// values are references to format-prefixed snake cells. Insertion order
/// does not affect the result.
pub fn store_content_dict<'a, I>(entries: I) -> Result<HashmapE>
where
    I: IntoIterator<Item = (UInt256, &'a [u8])>,
{
    let mut map = HashmapE::with_bit_len(CONTENT_KEY_BITS);
    for (key, value) in entries {
        let mut key_builder = BuilderData::new();
        key_builder.append_raw(key.as_slice(), CONTENT_KEY_BITS)?;

        let mut value_builder = BuilderData::new();
        value_builder.checked_append_reference(store_value_cell(value)?)?;

        map.set_builder(SliceData::load_builder(key_builder)?, &value_builder)?;
    }
    Ok(map)
}

/// Appends the dictionary to `builder` as the usual optional root reference.
pub fn append_content_dict(builder: &mut BuilderData, map: &HashmapE) -> Result<()> {
    match map.data() {
        Some(root) => {
            builder.append_bit_one()?;
            builder.checked_append_reference(root.clone())?;
        }
        None => {
            builder.append_bit_zero()?;
        }
    }
    Ok(())
}

/// Reads the dictionary from `slice`, decoding every value cell down to its
/// raw bytes.
pub fn load_content_dict(slice: &mut SliceData) -> Result<ContentDict> {
    let dict_root = slice.get_dictionary()?.reference_opt(0);
    let map = HashmapE::with_hashmap(CONTENT_KEY_BITS, dict_root);

    let mut dict = ContentDict::new();
    for entry in map.iter() {
        let (key, value) = entry?;
        let value_cell = value.reference_opt(0).ok_or(ContentError::MalformedChain(
            "dictionary value without cell reference",
        ))?;
        dict.insert(UInt256::from_slice(key.data()), load_value_cell(&value_cell)?);
    }
    Ok(dict)
}

/// Field-value cell: one format byte, then the snake-chunked value bytes.
pub(crate) fn store_value_cell(value: &[u8]) -> Result<Cell> {
    let mut data = Vec::with_capacity(value.len() + 1);
    data.push(CONTENT_DATA_FORMAT_SNAKE);
    data.extend_from_slice(value);
    build_snake_cell(&data)
}

pub(crate) fn load_value_cell(cell: &Cell) -> Result<Vec<u8>> {
    let data = flatten_snake_cell(cell)?;
    match data.split_first() {
        Some((&format_byte, value)) => match ContentDataFormat::from(format_byte) {
            ContentDataFormat::Snake => Ok(value.to_vec()),
            ContentDataFormat::Chunked | ContentDataFormat::Unknown(_) => {
                Err(ContentError::UnsupportedContentFormat(format_byte).into())
            }
        },
        None => Err(ContentError::MalformedChain("empty value cell").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CONTENT_DATA_FORMAT_CHUNKED;
    use crate::meta::meta_key;

    #[test]
    fn value_cell_round_trip() {
        let value = b"https://example.com/item.json".to_vec();
        let cell = store_value_cell(&value).unwrap();
        assert_eq!(load_value_cell(&cell).unwrap(), value);
    }

    #[test]
    fn reserved_chunked_format_is_rejected() {
        let mut data = vec![CONTENT_DATA_FORMAT_CHUNKED];
        data.extend_from_slice(b"payload");
        let cell = build_snake_cell(&data).unwrap();

        let err = load_value_cell(&cell).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContentError>(),
            Some(&ContentError::UnsupportedContentFormat(0x01))
        );
    }

    #[test]
    fn unknown_format_is_rejected_with_its_byte() {
        let cell = build_snake_cell(&[0x7f, 1, 2, 3]).unwrap();
        let err = load_value_cell(&cell).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContentError>(),
            Some(&ContentError::UnsupportedContentFormat(0x7f))
        );
    }

    #[test]
    fn dict_round_trip_ignores_insertion_order() {
        let entries = [
            (meta_key("symbol"), b"XYZ".to_vec()),
            (meta_key("name"), b"Example".to_vec()),
            (meta_key("decimals"), b"9".to_vec()),
        ];

        let forward = store_content_dict(entries.iter().map(|(k, v)| (*k, v.as_slice()))).unwrap();
        let reverse =
            store_content_dict(entries.iter().rev().map(|(k, v)| (*k, v.as_slice()))).unwrap();
        assert_eq!(forward.data(), reverse.data());

        let mut builder = BuilderData::new();
        append_content_dict(&mut builder, &forward).unwrap();
        let cell = builder.into_cell().unwrap();

        let mut slice = SliceData::load_cell_ref(&cell).unwrap();
        let dict = load_content_dict(&mut slice).unwrap();
        assert_eq!(dict.len(), entries.len());
        for (key, value) in &entries {
            assert_eq!(dict.get(key), Some(value));
        }
    }

    #[test]
    fn empty_dict_round_trip() {
        let map = store_content_dict(std::iter::empty::<(UInt256, &[u8])>()).unwrap();
        let mut builder = BuilderData::new();
        append_content_dict(&mut builder, &map).unwrap();

        let mut slice = SliceData::load_cell_ref(&builder.into_cell().unwrap()).unwrap();
        assert!(load_content_dict(&mut slice).unwrap().is_empty());
    }
}
