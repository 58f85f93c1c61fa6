/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use tokio::io::AsyncBufRead;

mod limited_read_until;
use limited_read_until::LimitedReadUntil;

pub(crate) trait LimitedBufReadExt: AsyncBufRead {
    /// Read bytes into `buf` up to and including `delimiter`, but never
    /// more than `max_len` bytes in total for this call.
    ///
    /// Resolves to `(found, read_len)`. `read_len == 0` means EOF; `found`
    /// is false when the limit was hit before the delimiter.
    fn limited_read_until<'a>(
        &'a mut self,
        delimiter: u8,
        max_len: usize,
        buf: &'a mut Vec<u8>,
    ) -> LimitedReadUntil<'a, Self>
    where
        Self: Unpin,
    {
        LimitedReadUntil::new(self, delimiter, max_len, buf)
    }
}

impl<R: AsyncBufRead + ?Sized> LimitedBufReadExt for R {}
