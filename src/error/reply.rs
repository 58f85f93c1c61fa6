/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpReplyError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("reply line too long")]
    LineTooLong,
    #[error("invalid reply line format")]
    InvalidLineFormat,
    #[error("invalid reply code {0}")]
    InvalidReplyCode(u16),
    #[error("reply line is not utf8")]
    LineIsNotUtf8,
    #[error("too many reply lines")]
    TooManyLines,
    #[error("read reply for stage '{0}' timed out")]
    ReadTimedOut(&'static str),
}
