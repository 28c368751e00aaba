//! One worker's share of a copy.
//!
//! Workers share the source and destination handles. Every call names its
//! absolute offset, so no worker depends on or moves a shared file cursor and
//! no locking is needed as long as the ranges are disjoint.

use std::fmt;
use std::fs::File;
use std::io;

use crate::copy::partition::WorkRange;
use crate::errors::{categorize_io_error, ErrorCategory};

/// Positioned read.
pub trait ReadAt {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

/// Positioned write.
pub trait WriteAt {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize>;
}

#[cfg(unix)]
impl ReadAt for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }
}

#[cfg(unix)]
impl WriteAt for File {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::write_at(self, buf, offset)
    }
}

#[cfg(windows)]
impl ReadAt for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }
}

#[cfg(windows)]
impl WriteAt for File {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_write(self, buf, offset)
    }
}

/// Which side of the copy a chunk failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOp {
    Read,
    Write,
}

/// A non-transient failure inside [`copy_chunk`].
#[derive(Debug)]
pub struct ChunkError {
    pub op: ChunkOp,
    pub offset: u64,
    pub source: io::Error,
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            ChunkOp::Read => "pread",
            ChunkOp::Write => "pwrite",
        };
        write!(f, "[{op}] at offset {}: {}", self.offset, self.source)
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Copy `range` from `src` to the same offsets in `dst`, `block_size` bytes
/// at a time.
///
/// Interrupted and would-block calls are retried in place. `on_block` is
/// called with the byte count of every block once it has been written.
/// Returns the number of bytes copied, which equals `range.size` on success.
pub fn copy_chunk<R, W, F>(
    src: &R,
    dst: &W,
    range: WorkRange,
    block_size: usize,
    mut on_block: F,
) -> Result<u64, ChunkError>
where
    R: ReadAt + ?Sized,
    W: WriteAt + ?Sized,
    F: FnMut(u64),
{
    let block_size = block_size.max(1) as u64;
    let mut buffer = vec![0u8; block_size.min(range.size) as usize];
    let mut offset = range.offset;
    let mut remaining = range.size;

    while remaining > 0 {
        let step = remaining.min(block_size);
        let buf = &mut buffer[..step as usize];
        read_full_at(src, buf, offset).map_err(|(at, source)| ChunkError {
            op: ChunkOp::Read,
            offset: at,
            source,
        })?;
        write_full_at(dst, buf, offset).map_err(|(at, source)| ChunkError {
            op: ChunkOp::Write,
            offset: at,
            source,
        })?;
        offset += step;
        remaining -= step;
        on_block(step);
    }

    Ok(range.size)
}

fn read_full_at<R: ReadAt + ?Sized>(
    src: &R,
    mut buf: &mut [u8],
    mut offset: u64,
) -> Result<(), (u64, io::Error)> {
    while !buf.is_empty() {
        match src.read_at(buf, offset) {
            Ok(0) => {
                return Err((
                    offset,
                    io::Error::new(io::ErrorKind::UnexpectedEof, "source ended early"),
                ))
            }
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(err) if categorize_io_error(&err) == ErrorCategory::Transient => continue,
            Err(err) => return Err((offset, err)),
        }
    }
    Ok(())
}

fn write_full_at<W: WriteAt + ?Sized>(
    dst: &W,
    mut buf: &[u8],
    mut offset: u64,
) -> Result<(), (u64, io::Error)> {
    while !buf.is_empty() {
        match dst.write_at(buf, offset) {
            Ok(0) => {
                return Err((
                    offset,
                    io::Error::new(io::ErrorKind::WriteZero, "destination accepted no bytes"),
                ))
            }
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(err) if categorize_io_error(&err) == ErrorCategory::Transient => continue,
            Err(err) => return Err((offset, err)),
        }
    }
    Ok(())
}
