/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

mod addr;
pub use addr::ServerAddrParseError;

mod reply;
pub use reply::FtpReplyError;

mod command;
pub use command::FtpCommandError;

mod connect;
pub use connect::FtpConnectError;

mod session;
pub(crate) use session::FtpAuthStatus;
pub use session::FtpSessionOpenError;

mod transfer;
pub use transfer::{FtpLineDataReadError, FtpTransferServerError, FtpTransferSetupError};

mod file;
pub use file::{
    FtpEntryParseError, FtpFileListError, FtpFileStatError, FtpFileStoreError, FtpListStartError,
    FtpRenameError, FtpScanDirError, FtpStoreStartError,
};
