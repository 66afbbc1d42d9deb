//! Utility functions and types used across the library

/// Sequential reader of native endian words from a byte slice
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of unread bytes
    pub(crate) fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Take next `count` bytes
    pub(crate) fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        if count > self.data.len() {
            return None;
        }
        let (head, tail) = self.data.split_at(count);
        self.data = tail;
        Some(head)
    }

    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.take(4)?;
        Some(u32::from_ne_bytes(bytes.try_into().ok()?))
    }

    pub(crate) fn read_f32(&mut self) -> Option<f32> {
        let bytes = self.take(4)?;
        Some(f32::from_ne_bytes(bytes.try_into().ok()?))
    }
}

/// Sequential writer of native endian words into a byte slice.
///
/// Position is tracked in the caller provided counter so nested writers can share it.
#[derive(Debug)]
pub(crate) struct ByteWriter<'a, 'b> {
    buffer: &'a mut [u8],
    offset: &'b mut usize,
}

impl<'a, 'b> ByteWriter<'a, 'b> {
    pub(crate) fn new(buffer: &'a mut [u8], offset: &'b mut usize) -> Self {
        Self { buffer, offset }
    }

    pub(crate) fn position(&self) -> usize {
        *self.offset
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> bool {
        let start = *self.offset;
        match self.buffer.get_mut(start..start + bytes.len()) {
            Some(dst) => {
                dst.copy_from_slice(bytes);
                *self.offset += bytes.len();
                true
            }
            None => false,
        }
    }

    pub(crate) fn write_u32(&mut self, value: u32) -> bool {
        self.write_bytes(&value.to_ne_bytes())
    }

    pub(crate) fn write_f32(&mut self, value: f32) -> bool {
        self.write_bytes(&value.to_ne_bytes())
    }

    /// Overwrite already written word at `position`
    pub(crate) fn patch_u32(&mut self, position: usize, value: u32) -> bool {
        match self.buffer.get_mut(position..position + 4) {
            Some(dst) => {
                dst.copy_from_slice(&value.to_ne_bytes());
                true
            }
            None => false,
        }
    }
}
