//! Bit-granular codec cursors over caller-provided byte buffers.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for packing and
//! unpacking integer fields of arbitrary width (1-64 bits) MSB-first, with
//! no byte alignment between fields, plus [`Bounds`] checkpoints for the
//! reserve-now-patch-later idiom (length prefixes and the like).
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **No allocation** - The caller owns and sizes the backing buffer; the
//!   cursors only borrow it.
//! - **No domain knowledge** - This crate knows nothing about the messages
//!   or protocols packed through it.
//! - **Caller-checked bounds** - Operations are deterministic, branch-light
//!   bit arithmetic; running past the buffer is a caller bug and panics at
//!   the slice boundary instead of returning an error.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut buf = [0u8; 4];
//! let mut writer = BitWriter::new(&mut buf);
//! writer.write_bit(true);
//! writer.write_bits(0x2A, 7);
//! assert_eq!(writer.size_in_bytes(), 1);
//!
//! let mut reader = BitReader::new(&buf);
//! assert!(reader.read_bit());
//! assert_eq!(reader.read_bits(7), 0x2A);
//! ```

mod bounds;
mod reader;
mod writer;

pub use bounds::Bounds;
pub use reader::BitReader;
pub use writer::BitWriter;
