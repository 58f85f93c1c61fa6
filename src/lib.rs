/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

//! Async FTP client with a persistent control channel and passive mode
//! (PASV) data transfers. Directory listings use MLSD (RFC 3659).
//!
//! [`FtpClient`] is the typed-error protocol client, generic over the
//! stream type supplied by an [`FtpConnectionProvider`]. [`FtpSession`]
//! wraps it into a boolean-surface facade gated on a successful login.

mod addr;
pub use addr::ServerAddr;

mod config;
pub use config::{FtpClientConfig, FtpControlConfig, FtpTransferConfig};

mod connection;
pub use connection::{FtpConnectionProvider, TcpConnectionProvider};

mod control;
pub use control::FtpCommand;

mod transfer;
pub use transfer::{FtpLineDataReceiver, FtpTransferType};

mod facts;
pub use facts::{FtpEntry, FtpEntryType};

mod client;
pub use client::FtpClient;

mod session;
pub use session::FtpSession;

mod error;
pub use error::{
    FtpCommandError, FtpConnectError, FtpEntryParseError, FtpFileListError, FtpFileStatError,
    FtpFileStoreError, FtpLineDataReadError, FtpListStartError, FtpRenameError, FtpReplyError,
    FtpScanDirError, FtpSessionOpenError, FtpStoreStartError, FtpTransferServerError,
    FtpTransferSetupError, ServerAddrParseError,
};

mod io;

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};
