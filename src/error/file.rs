/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use thiserror::Error;

use super::command::FtpCommandError;
use super::transfer::{FtpLineDataReadError, FtpTransferServerError, FtpTransferSetupError};
use crate::error::FtpReplyError;

#[derive(Debug, Error)]
pub enum FtpEntryParseError {
    #[error("no space delimiter")]
    NoSpaceDelimiter,
    #[error("no delimiter in fact ({0})")]
    NoDelimiterInFact(String),
    #[error("invalid modify time: {0}")]
    InvalidModifyTime(chrono::ParseError),
    #[error("invalid create time: {0}")]
    InvalidCreateTime(chrono::ParseError),
    #[error("invalid size")]
    InvalidSize,
}

/// Failure of a single-reply file operation (DELE / RMD).
#[derive(Debug, Error)]
pub enum FtpFileStatError {
    #[error("raw command error: {0}")]
    RawCommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("file unavailable")]
    FileUnavailable,
}

impl From<FtpCommandError> for FtpFileStatError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpFileStatError::ServiceNotAvailable,
            _ => FtpFileStatError::RawCommandError(e),
        }
    }
}

/// Failure before any listing data was transferred.
#[derive(Debug, Error)]
pub enum FtpListStartError {
    #[error("data transfer setup error: {0}")]
    TransferSetupFailed(FtpTransferSetupError),
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("file unavailable")]
    FileUnavailable,
}

impl From<FtpCommandError> for FtpListStartError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpListStartError::ServiceNotAvailable,
            _ => FtpListStartError::CommandError(e),
        }
    }
}

impl From<FtpTransferSetupError> for FtpListStartError {
    fn from(e: FtpTransferSetupError) -> Self {
        match e {
            FtpTransferSetupError::ServiceNotAvailable => FtpListStartError::ServiceNotAvailable,
            _ => FtpListStartError::TransferSetupFailed(e),
        }
    }
}

/// Failure while receiving listing data or its end reply.
#[derive(Debug, Error)]
pub enum FtpFileListError {
    #[error("server reported error: {0}")]
    ServerReportedError(#[from] FtpTransferServerError),
    #[error("timeout to wait end reply")]
    TimeoutToWaitEndReply,
    #[error("timeout to wait all data")]
    TimeoutToWaitAllData,
    #[error("data read failed: {0}")]
    DataReadFailed(FtpLineDataReadError),
}

#[derive(Debug, Error)]
pub enum FtpStoreStartError {
    #[error("data transfer setup error: {0}")]
    TransferSetupFailed(FtpTransferSetupError),
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("file unavailable")]
    FileUnavailable,
    #[error("need account for storing")]
    NeedAccountForStoring,
    #[error("filename not allowed")]
    FileNameNotAllowed,
    #[error("insufficient storage space")]
    InsufficientStorageSpace,
}

impl From<FtpCommandError> for FtpStoreStartError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpStoreStartError::ServiceNotAvailable,
            _ => FtpStoreStartError::CommandError(e),
        }
    }
}

impl From<FtpTransferSetupError> for FtpStoreStartError {
    fn from(e: FtpTransferSetupError) -> Self {
        match e {
            FtpTransferSetupError::ServiceNotAvailable => FtpStoreStartError::ServiceNotAvailable,
            _ => FtpStoreStartError::TransferSetupFailed(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpFileStoreError {
    #[error("server reported error: {0}")]
    ServerReportedError(FtpTransferServerError),
    #[error("timeout to wait end reply")]
    TimeoutToWaitEndReply,
    #[error("control read error: {0}")]
    ControlReadError(FtpReplyError),
}

impl From<FtpTransferServerError> for FtpFileStoreError {
    fn from(e: FtpTransferServerError) -> Self {
        if let FtpTransferServerError::RecvFailed(e) = e {
            FtpFileStoreError::ControlReadError(e)
        } else {
            FtpFileStoreError::ServerReportedError(e)
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpRenameError {
    #[error("raw command error: {0}")]
    RawCommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("file unavailable")]
    FileUnavailable,
    #[error("target name not allowed")]
    NameNotAllowed,
    /// RNTO failed after RNFR was already accepted, the source entry is
    /// left in a rename-pending state on the server.
    #[error("rename broken after RNFR was accepted: {0}")]
    BrokenMidway(Box<FtpRenameError>),
}

impl From<FtpCommandError> for FtpRenameError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpRenameError::ServiceNotAvailable,
            _ => FtpRenameError::RawCommandError(e),
        }
    }
}

/// Failure of a full directory scan, with "directory not found" kept
/// distinct from transfer errors so callers can branch on it.
#[derive(Debug, Error)]
pub enum FtpScanDirError {
    #[error("directory not found")]
    NotFound,
    #[error("failed to start listing: {0}")]
    StartFailed(FtpListStartError),
    #[error("listing transfer failed: {0}")]
    TransferFailed(#[from] FtpFileListError),
}

impl From<FtpListStartError> for FtpScanDirError {
    fn from(e: FtpListStartError) -> Self {
        match e {
            FtpListStartError::FileUnavailable => FtpScanDirError::NotFound,
            _ => FtpScanDirError::StartFailed(e),
        }
    }
}
