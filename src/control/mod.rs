/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, BufStream};

use crate::config::FtpControlConfig;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpFileStatError, FtpListStartError, FtpRenameError,
    FtpStoreStartError, FtpTransferServerError,
};
use crate::transfer::FtpTransferType;

mod response;

mod command;
pub use command::FtpCommand;

/// The persistent command/reply connection to the server.
///
/// Strictly half-duplex: every method sends one command and reads its
/// full reply before returning.
pub(crate) struct FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    config: FtpControlConfig,
    stream: BufStream<T>,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: T, config: FtpControlConfig) -> Self {
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
        }
    }

    pub(crate) async fn wait_greetings(&mut self) -> Result<(), FtpCommandError> {
        loop {
            let reply = self.read_reply().await?;
            return match reply.code() {
                120 => continue,
                220 => Ok(()),
                421 => Err(FtpCommandError::ServiceNotAvailable),
                n => Err(FtpCommandError::UnexpectedReplyCode(
                    FtpCommand::GREETING,
                    n,
                )),
            };
        }
    }

    pub(crate) async fn send_username(
        &mut self,
        name: &str,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::USER;
        let username = if name.is_empty() { "anonymous" } else { name };
        self.send_cmd1(cmd, username)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send username").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            230 => Ok(FtpAuthStatus::LoggedIn),
            331 => Ok(FtpAuthStatus::NeedPassword),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_password(
        &mut self,
        pass: &str,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::PASS;
        self.send_cmd1(cmd, pass)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send password").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            503 => Err(FtpCommandError::BadCommandSequence(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            202 => Err(FtpCommandError::CommandNotImplemented(cmd)), // not fatal but unexpected
            230 => Ok(FtpAuthStatus::LoggedIn),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_quit(&mut self) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::QUIT;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send quit").await?;
        match reply.code() {
            500 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            221 => Ok(()),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn delete_file(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let cmd = FtpCommand::DELE;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_reply("delete file")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            250 => Ok(()),
            421 => Err(FtpFileStatError::ServiceNotAvailable),
            450 | 550 => Err(FtpFileStatError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn remove_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let cmd = FtpCommand::RMD;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_reply("remove dir")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            250 => Ok(()),
            421 => Err(FtpFileStatError::ServiceNotAvailable),
            450 | 550 => Err(FtpFileStatError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn rename_from(&mut self, path: &str) -> Result<(), FtpRenameError> {
        let cmd = FtpCommand::RNFR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_reply("rename from")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            350 => Ok(()),
            421 => Err(FtpRenameError::ServiceNotAvailable),
            450 | 550 => Err(FtpRenameError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn rename_to(&mut self, path: &str) -> Result<(), FtpRenameError> {
        let cmd = FtpCommand::RNTO;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_reply("rename to")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            503 => Err(FtpCommandError::BadCommandSequence(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            250 => Ok(()),
            421 => Err(FtpRenameError::ServiceNotAvailable),
            450 | 550 => Err(FtpRenameError::FileUnavailable),
            532 | 553 => Err(FtpRenameError::NameNotAllowed),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn request_transfer_type(
        &mut self,
        t: FtpTransferType,
    ) -> Result<(), FtpCommandError> {
        let cmd = match t {
            FtpTransferType::Ascii => FtpCommand::TYPE_A,
            FtpTransferType::Image => FtpCommand::TYPE_I,
        };
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("request transfer type").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            504 => Err(FtpCommandError::ParameterNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            200 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_pasv_port(&mut self) -> Result<SocketAddr, FtpCommandError> {
        let cmd = FtpCommand::PASV;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("request pasv port").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            227 => match reply.parse_pasv_227_reply() {
                Some(addr) => Ok(addr),
                None => Err(FtpCommandError::InvalidReplySyntax(cmd, 227)),
            },
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_restart(&mut self, position: u64) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::REST;
        self.send_cmd1(cmd, &position.to_string())
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("request restart").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            350 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn start_mlsd(&mut self, path: &str) -> Result<(), FtpListStartError> {
        let cmd = FtpCommand::MLSD;
        if path.is_empty() {
            self.send_cmd(cmd)
                .await
                .map_err(FtpCommandError::SendFailed)?;
        } else {
            self.send_cmd1(cmd, path)
                .await
                .map_err(FtpCommandError::SendFailed)?;
        }

        let reply = self
            .timed_read_reply("start mlsd")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            125 | 150 => Ok(()),
            421 => Err(FtpListStartError::ServiceNotAvailable),
            450 | 550 => Err(FtpListStartError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn wait_mlsd_end(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_reply().await?;
        match reply.code() {
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(
                FtpCommand::MLSD,
                n,
            )),
        }
    }

    pub(crate) async fn start_store(&mut self, path: &str) -> Result<(), FtpStoreStartError> {
        let cmd = FtpCommand::STOR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_reply("start store")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            532 => Err(FtpStoreStartError::NeedAccountForStoring),
            553 => Err(FtpStoreStartError::FileNameNotAllowed),
            125 | 150 => Ok(()),
            421 => Err(FtpStoreStartError::ServiceNotAvailable),
            450 => Err(FtpStoreStartError::FileUnavailable),
            452 => Err(FtpStoreStartError::InsufficientStorageSpace),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn wait_store_end(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_reply().await?;
        match reply.code() {
            110 => Err(FtpTransferServerError::RestartNeeded),
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            551 => Err(FtpTransferServerError::PageTypeUnknown),
            552 => Err(FtpTransferServerError::ExceededStorageAllocation),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(
                FtpCommand::STOR,
                n,
            )),
        }
    }
}
