/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

mod line;
pub use line::FtpLineDataReceiver;
pub(crate) use line::FtpLineDataTransfer;

/// Representation type negotiated with `TYPE` before a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpTransferType {
    Ascii,
    Image,
}
