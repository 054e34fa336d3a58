//! Streaming reader for the framed multi-block replay container.
//!
//! Layout (little-endian):
//!
//! ```text
//! [0..4)   opaque magic
//! [4..8)   block count (i32, must be >= 0)
//! then, per block:
//!          block length (i32, must be >= 0)
//!          block payload (exactly `length` bytes)
//! ```
//!
//! Blocks are exposed one at a time as bounded, forward-only views over the
//! underlying stream, so a caller that only needs the first blocks never
//! reads the rest of the file.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};
use tracing::trace;

use crate::error::{ContainerError, ReplayError};

/// Upper bound on the up-front allocation for a block payload. Larger
/// blocks grow as bytes actually arrive, so a corrupted length cannot
/// trigger a huge allocation on its own.
const PREALLOC_LIMIT: usize = 1 << 20;

/// One fully read block payload together with its position in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    index: u32,
    data: Vec<u8>,
}

impl RawBlock {
    pub fn new(index: u32, data: Vec<u8>) -> Self {
        Self { index, data }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Forward-only reader over a replay container.
pub struct ContainerReader<R> {
    inner: R,
    magic: [u8; 4],
    block_count: u32,
    /// Index of the next block header to read.
    next_index: u32,
    /// Bytes of the most recently opened block not yet consumed.
    unread: u64,
    /// (index, declared length) of the most recently opened block.
    open: Option<(u32, u32)>,
}

impl<R: Read> ContainerReader<R> {
    /// Read the 8-byte container header.
    pub fn new(mut inner: R) -> Result<Self, ReplayError> {
        let mut header = [0u8; 8];
        let read = fill(&mut inner, &mut header)?;
        if read < header.len() {
            return Err(ContainerError::TruncatedHeader { read }.into());
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[..4]);
        let count = (&header[4..]).read_i32::<LittleEndian>()?;
        if count < 0 {
            return Err(ContainerError::NegativeBlockCount(count).into());
        }

        trace!(block_count = count, "container header read");

        Ok(Self {
            inner,
            magic,
            block_count: count as u32,
            next_index: 0,
            unread: 0,
            open: None,
        })
    }

    /// The opaque 4-byte header. Not interpreted.
    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    /// Number of blocks declared by the header.
    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Open the next block as a bounded view.
    ///
    /// Any bytes left unread in the previous block are skipped first.
    /// Returns `Ok(None)` once all declared blocks have been opened.
    pub fn next_block(&mut self) -> Result<Option<BlockReader<'_, R>>, ReplayError> {
        self.skip_unread()?;

        if self.next_index >= self.block_count {
            return Ok(None);
        }

        let index = self.next_index;
        let expected = self.block_count;
        let length = self.inner.read_i32::<LittleEndian>().map_err(|e| {
            ReplayError::from_framing_io(
                e,
                ContainerError::Truncated {
                    expected,
                    found: index,
                },
            )
        })?;
        if length < 0 {
            return Err(ContainerError::NegativeBlockLength { index, length }.into());
        }

        let declared = length as u32;
        self.next_index += 1;
        self.unread = u64::from(declared);
        self.open = Some((index, declared));

        trace!(index, declared, "block opened");

        Ok(Some(BlockReader {
            container: self,
            index,
            declared,
        }))
    }

    /// Open and fully read the next block.
    pub fn read_block(&mut self) -> Result<Option<RawBlock>, ReplayError> {
        match self.next_block()? {
            Some(block) => block.into_raw().map(Some),
            None => Ok(None),
        }
    }

    /// Consume the reader into an iterator of fully read blocks.
    /// The iterator stops after the first error.
    pub fn into_blocks(self) -> Blocks<R> {
        Blocks {
            reader: self,
            done: false,
        }
    }

    fn skip_unread(&mut self) -> Result<(), ReplayError> {
        let Some((index, declared)) = self.open.take() else {
            return Ok(());
        };
        if self.unread == 0 {
            return Ok(());
        }

        let pending = self.unread;
        let skipped = io::copy(&mut (&mut self.inner).take(pending), &mut io::sink())?;
        self.unread = 0;
        if skipped < pending {
            return Err(ContainerError::BlockOverrun {
                index,
                declared,
                read: u64::from(declared) - (pending - skipped),
            }
            .into());
        }
        Ok(())
    }
}

/// Bounded, forward-only, non-seekable view over one block's payload.
///
/// Reads stop at the block boundary. If the underlying stream ends before
/// the declared length is reached, the read fails with `UnexpectedEof`.
pub struct BlockReader<'a, R> {
    container: &'a mut ContainerReader<R>,
    index: u32,
    declared: u32,
}

impl<R: Read> BlockReader<'_, R> {
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Bytes of this block not yet read.
    pub fn remaining(&self) -> u64 {
        self.container.unread
    }

    /// Read the rest of the payload into a [`RawBlock`].
    pub fn into_raw(mut self) -> Result<RawBlock, ReplayError> {
        let capacity = (self.declared as usize).min(PREALLOC_LIMIT);
        let mut data = Vec::with_capacity(capacity);
        if let Err(e) = self.read_to_end(&mut data) {
            let read = u64::from(self.declared) - self.container.unread;
            return Err(ReplayError::from_framing_io(
                e,
                ContainerError::BlockOverrun {
                    index: self.index,
                    declared: self.declared,
                    read,
                },
            ));
        }
        Ok(RawBlock::new(self.index, data))
    }
}

impl<R: Read> Read for BlockReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let unread = self.container.unread;
        if unread == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = (buf.len() as u64).min(unread) as usize;
        let n = self.container.inner.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("block {} ended {} bytes early", self.index, unread),
            ));
        }
        self.container.unread -= n as u64;
        Ok(n)
    }
}

/// Iterator returned by [`ContainerReader::into_blocks`].
pub struct Blocks<R> {
    reader: ContainerReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Blocks<R> {
    type Item = Result<RawBlock, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` as far as the stream allows; returns the number of bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ReplayError> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(read)
}
