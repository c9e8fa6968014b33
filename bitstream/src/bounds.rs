//! Checkpoints for reserve-now, patch-later stream regions.

use core::ops::{Deref, DerefMut};

use crate::writer::BitWriter;

/// A checkpoint over a reserved region of a [`BitWriter`]'s stream.
///
/// Supports the length-prefix idiom: reserve space for a field whose value
/// is only known after the content following it has been encoded, fill it
/// in, and resume the main stream exactly where it would have been.
///
/// [`save`](Self::save) records the resume position and parks the writer at
/// the start of the reserved region. While the checkpoint is armed it holds
/// the writer's mutable borrow, so no other writer can touch the buffer; the
/// caller reaches the writer through deref to fill the region or to seek
/// elsewhere and patch earlier fields. [`restore`](Self::restore) consumes
/// the checkpoint, so restoring twice is a compile error rather than a
/// runtime one.
///
/// Dropping an armed checkpoint without restoring leaves the writer wherever
/// the caller last put it; tracking the resume point is then the caller's
/// problem again.
#[derive(Debug)]
#[must_use = "a checkpoint that is never restored leaves the writer parked in the reserved region"]
pub struct Bounds<'w, 'a> {
    writer: &'w mut BitWriter<'a>,
    resume_position: usize,
}

impl<'w, 'a> Bounds<'w, 'a> {
    /// Saves a checkpoint on `writer`.
    ///
    /// Skips `skip_bits` of stream the caller does not want to touch, lands
    /// the cursor at the start of a `reserved_bits`-wide region, and records
    /// the position just past that region as the resume point.
    pub fn save(writer: &'w mut BitWriter<'a>, skip_bits: usize, reserved_bits: usize) -> Self {
        let position = writer.size_in_bits();
        let resume_position = position + skip_bits + reserved_bits;
        writer.seek(position + skip_bits);
        Self {
            writer,
            resume_position,
        }
    }

    /// Returns the bit position the stream resumes at after
    /// [`restore`](Self::restore).
    #[must_use]
    pub const fn resume_position(&self) -> usize {
        self.resume_position
    }

    /// Consumes the checkpoint and seeks the writer to the resume position,
    /// regardless of where the cursor moved in between.
    pub fn restore(self) {
        let resume = self.resume_position;
        self.writer.seek(resume);
    }
}

impl<'a> Deref for Bounds<'_, 'a> {
    type Target = BitWriter<'a>;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl DerefMut for Bounds<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}
