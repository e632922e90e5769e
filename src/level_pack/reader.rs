use super::DecodeError;

/// Little-endian cursor over a level pack buffer.
pub(super) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(super) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(super) fn offset(&self) -> usize {
        self.offset
    }

    pub(super) fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEof {
                offset: self.offset,
                wanted: len,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub(super) fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(super) fn read_word(&mut self) -> Result<u16, DecodeError> {
        let raw = self.take(2)?;
        Ok(u16::from_le_bytes([raw[0], raw[1]]))
    }

    pub(super) fn read_long(&mut self) -> Result<u32, DecodeError> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }
}

/// Decodes a text field whose last byte is the terminator.
pub(super) fn decode_string(raw: &[u8], xor: Option<u8>) -> String {
    let body = raw.split_last().map(|(_, body)| body).unwrap_or(&[]);
    body.iter()
        .map(|byte| match xor {
            Some(mask) => byte ^ mask,
            None => *byte,
        })
        .take_while(|byte| *byte != 0)
        .map(char::from)
        .collect()
}
