use crate::ImportError;

/// A read position inside raw buffer bytes.
///
/// Derived views are not validated when they are created. Every read checks
/// against the real length of the underlying slice instead, so a view built
/// from another view with an extra delta can never read past the buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferOffset<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BufferOffset<'a> {
    pub fn new(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, offset }
    }

    /// A view `delta` bytes further into the same buffer.
    pub fn offset(&self, delta: usize) -> Self {
        Self {
            buf: self.buf,
            offset: self.offset.saturating_add(delta),
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    /// Length of the underlying buffer, not of the remaining tail.
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    pub fn at(&self, delta: usize) -> Result<u8, ImportError> {
        self.slice(delta, 1).map(|b| b[0])
    }

    pub fn bytes<const N: usize>(&self, delta: usize) -> Result<[u8; N], ImportError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(delta, N)?);
        Ok(out)
    }

    pub fn slice(&self, delta: usize, len: usize) -> Result<&'a [u8], ImportError> {
        let out_of_bounds = || ImportError::OutOfBounds {
            offset: self.offset.saturating_add(delta),
            len,
            size: self.buf.len(),
        };
        let start = self.offset.checked_add(delta).ok_or_else(out_of_bounds)?;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        self.buf.get(start..end).ok_or_else(out_of_bounds)
    }
}
