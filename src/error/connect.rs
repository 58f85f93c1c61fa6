/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use thiserror::Error;

use super::{FtpCommandError, ServerAddrParseError};

#[derive(Debug, Error)]
pub enum FtpConnectError<E: std::error::Error> {
    #[error("invalid server address: {0}")]
    InvalidServerAddress(ServerAddrParseError),
    #[error("connect failed: {0:?}")]
    ConnectIoError(E),
    #[error("timed out to connect")]
    ConnectTimedOut,
    #[error("timed out to receive greetings")]
    GreetingTimedOut,
    #[error("greeting failed: {0}")]
    GreetingFailed(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
}
