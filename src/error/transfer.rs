/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::io;

use thiserror::Error;

use super::{FtpCommandError, FtpReplyError};
use crate::control::FtpCommand;

/// Failure while negotiating passive mode or opening the data connection.
#[derive(Debug, Error)]
pub enum FtpTransferSetupError {
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("failed to connect data stream: {0}")]
    DataConnectFailed(String),
    #[error("timed out to connect data stream")]
    DataConnectTimedOut,
}

impl From<FtpCommandError> for FtpTransferSetupError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpTransferSetupError::ServiceNotAvailable,
            _ => FtpTransferSetupError::CommandError(e),
        }
    }
}

/// Negative transfer-end reply on the control connection.
#[derive(Debug, Error)]
pub enum FtpTransferServerError {
    #[error("recv failed: {0}")]
    RecvFailed(#[from] FtpReplyError),
    #[error("restart needed")]
    RestartNeeded,
    #[error("data transfer not established")]
    DataTransferNotEstablished,
    #[error("data transfer lost")]
    DataTransferLost,
    #[error("server failed to process transfer")]
    ServerFailed,
    #[error("page type unknown")]
    PageTypeUnknown,
    #[error("exceeded storage allocation")]
    ExceededStorageAllocation,
    #[error("unexpected end reply code ({0} -> {1})")]
    UnexpectedEndReplyCode(FtpCommand, u16),
}

#[derive(Debug, Error)]
pub enum FtpLineDataReadError {
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
    #[error("unsupported encoding")]
    UnsupportedEncoding,
    #[error("line {0} is too long")]
    LineTooLong(usize),
    #[error("too many lines")]
    TooManyLines,
    #[error("aborted by callback")]
    AbortedByCallback,
}
