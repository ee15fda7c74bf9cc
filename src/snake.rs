use anyhow::Result;
use ton_types::{BuilderData, Cell, SliceData};

use crate::error::ContentError;

/// Max payload bytes per cell in a snake chain (1016 of the 1023 available
/// bits, leaving the last incomplete byte unused).
pub const SNAKE_CHUNK_SIZE: usize = 127;

/// Splits `data` into chunks of at most [`SNAKE_CHUNK_SIZE`] bytes and links
/// them into a chain of cells, each holding one chunk and a single reference
/// to the rest. The chain is assembled tail-first; the returned cell is the
/// head. Empty input produces a single empty cell.
pub fn build_snake_cell(data: &[u8]) -> Result<Cell> {
    let mut chunks = data.chunks(SNAKE_CHUNK_SIZE).rev();

    let mut cell = match chunks.next() {
        Some(chunk) => make_chunk_cell(chunk, None)?,
        None => BuilderData::new().into_cell()?,
    };
    for chunk in chunks {
        cell = make_chunk_cell(chunk, Some(cell))?;
    }
    Ok(cell)
}

fn make_chunk_cell(chunk: &[u8], next: Option<Cell>) -> Result<Cell> {
    let mut builder = BuilderData::new();
    builder.append_raw(chunk, chunk.len() * 8)?;
    if let Some(next) = next {
        builder.checked_append_reference(next)?;
    }
    builder.into_cell()
}

/// Reassembles the original buffer by walking the reference chain from the
/// head cell and concatenating each cell's payload. A trailing fragment
/// shorter than a byte is truncated, so only whole bytes are returned.
pub fn flatten_snake_cell(head: &Cell) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    let mut cell = head.clone();
    loop {
        let mut slice = SliceData::load_cell_ref(&cell)?;
        let whole_bytes = slice.remaining_bits() / 8;
        buffer.extend_from_slice(&slice.get_next_bytes(whole_bytes)?);

        match slice.remaining_references() {
            0 => return Ok(buffer),
            1 => cell = cell.reference(0)?,
            _ => {
                return Err(
                    ContentError::MalformedChain("cell has more than one reference").into(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_makes_single_empty_cell() {
        let cell = build_snake_cell(&[]).unwrap();
        assert_eq!(cell.bit_length(), 0);
        assert_eq!(cell.references_count(), 0);

        assert_eq!(flatten_snake_cell(&cell).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn chunk_boundary_at_127_bytes() {
        let data = vec![0xab; SNAKE_CHUNK_SIZE];
        let cell = build_snake_cell(&data).unwrap();
        assert_eq!(cell.bit_length(), SNAKE_CHUNK_SIZE * 8);
        assert_eq!(cell.references_count(), 0);
    }

    #[test]
    fn chunk_boundary_at_128_bytes() {
        let data = (0..128u8).collect::<Vec<_>>();
        let cell = build_snake_cell(&data).unwrap();
        assert_eq!(cell.bit_length(), SNAKE_CHUNK_SIZE * 8);
        assert_eq!(cell.references_count(), 1);

        let tail = cell.reference(0).unwrap();
        assert_eq!(tail.bit_length(), 8);
        assert_eq!(tail.references_count(), 0);

        assert_eq!(flatten_snake_cell(&cell).unwrap(), data);
    }

    #[test]
    fn long_buffer_round_trip() {
        let data = (0..4096u32).map(|i| (i % 251) as u8).collect::<Vec<_>>();
        let cell = build_snake_cell(&data).unwrap();
        assert_eq!(flatten_snake_cell(&cell).unwrap(), data);
    }

    #[test]
    fn branching_cell_is_rejected() {
        let mut builder = BuilderData::new();
        builder.append_raw(b"ab", 16).unwrap();
        builder
            .checked_append_reference(build_snake_cell(b"left").unwrap())
            .unwrap();
        builder
            .checked_append_reference(build_snake_cell(b"right").unwrap())
            .unwrap();
        let cell = builder.into_cell().unwrap();

        let err = flatten_snake_cell(&cell).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::MalformedChain(_))
        ));
    }

    #[test]
    fn partial_trailing_byte_is_truncated() {
        let mut builder = BuilderData::new();
        builder.append_raw(&[0x41, 0x42, 0x80], 8 + 8 + 3).unwrap();
        let cell = builder.into_cell().unwrap();

        assert_eq!(flatten_snake_cell(&cell).unwrap(), b"AB".to_vec());
    }
}
