/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::addr::ServerAddr;
use crate::config::FtpClientConfig;
use crate::connection::FtpConnectionProvider;
use crate::control::FtpControlChannel;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpConnectError, FtpFileListError, FtpFileStatError,
    FtpFileStoreError, FtpListStartError, FtpRenameError, FtpSessionOpenError, FtpStoreStartError,
    FtpTransferSetupError,
};
use crate::transfer::{FtpLineDataReceiver, FtpLineDataTransfer, FtpTransferType};

/// Typed-error FTP protocol client.
///
/// Owns the control channel and the connection provider. Data streams
/// for transfers are handed back to the caller, the matching
/// `*_receive` / `*_end` method must be called afterwards to consume
/// the transfer-end reply on the control channel.
pub struct FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    conn_provider: CP,
    server: ServerAddr,
    config: FtpClientConfig,
    control: FtpControlChannel<S>,
    transfer_type: Option<FtpTransferType>,
    _phantom: PhantomData<(E, UD)>,
}

impl<CP, S, E, UD> FtpClient<CP, S, E, UD>
where
    CP: FtpConnectionProvider<S, E, UD>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: std::error::Error,
{
    /// Open the control connection and wait for the server greeting.
    pub async fn connect_to(
        mut conn_provider: CP,
        server: ServerAddr,
        user_data: &UD,
        config: &FtpClientConfig,
    ) -> Result<Self, FtpConnectError<E>> {
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            conn_provider.new_control_connection(&server, user_data),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(FtpConnectError::ConnectIoError(e)),
            Err(_) => return Err(FtpConnectError::ConnectTimedOut),
        };

        let mut control = FtpControlChannel::new(stream, config.control.clone());
        match tokio::time::timeout(config.greeting_timeout, control.wait_greetings()).await {
            Ok(Ok(_)) => {}
            Ok(Err(FtpCommandError::ServiceNotAvailable)) => {
                return Err(FtpConnectError::ServiceNotAvailable);
            }
            Ok(Err(e)) => return Err(FtpConnectError::GreetingFailed(e)),
            Err(_) => return Err(FtpConnectError::GreetingTimedOut),
        }

        Ok(FtpClient {
            conn_provider,
            server,
            config: config.clone(),
            control,
            transfer_type: None,
            _phantom: PhantomData,
        })
    }

    #[inline]
    pub fn server(&self) -> &ServerAddr {
        &self.server
    }

    /// Log in with USER and, if the server asks for one, PASS.
    ///
    /// An empty username is sent as `anonymous`.
    pub async fn new_user_session(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), FtpSessionOpenError> {
        match self.control.send_username(username).await? {
            FtpAuthStatus::LoggedIn => Ok(()),
            FtpAuthStatus::NotLoggedIn => Err(FtpSessionOpenError::NotLoggedIn),
            FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
            FtpAuthStatus::NeedPassword => match self.control.send_password(password).await? {
                FtpAuthStatus::LoggedIn => Ok(()),
                FtpAuthStatus::NotLoggedIn => Err(FtpSessionOpenError::NotLoggedIn),
                FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
                FtpAuthStatus::NeedPassword => Err(FtpSessionOpenError::RawCommandError(
                    FtpCommandError::BadCommandSequence(crate::control::FtpCommand::PASS),
                )),
            },
        }
    }

    pub async fn quit_and_close(mut self) -> Result<(), FtpCommandError> {
        self.control.send_quit().await
    }

    pub async fn delete_file(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        self.control.delete_file(path).await
    }

    pub async fn remove_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        self.control.remove_dir(path).await
    }

    /// RNFR / RNTO rename. If RNFR was already accepted and RNTO then
    /// fails, the error is wrapped in
    /// [`FtpRenameError::BrokenMidway`](crate::FtpRenameError::BrokenMidway).
    pub async fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpRenameError> {
        self.control.rename_from(from).await?;
        self.control
            .rename_to(to)
            .await
            .map_err(|e| FtpRenameError::BrokenMidway(Box::new(e)))
    }

    async fn setup_data_transfer(
        &mut self,
        transfer_type: FtpTransferType,
        user_data: &UD,
    ) -> Result<S, FtpTransferSetupError> {
        if self.transfer_type != Some(transfer_type) {
            self.control.request_transfer_type(transfer_type).await?;
            self.transfer_type = Some(transfer_type);
        }

        let data_addr = self.control.request_pasv_port().await?;
        let data_server = ServerAddr::from(data_addr);
        match tokio::time::timeout(
            self.config.connect_timeout,
            self.conn_provider
                .new_data_connection(&data_server, user_data),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(FtpTransferSetupError::DataConnectFailed(e.to_string())),
            Err(_) => Err(FtpTransferSetupError::DataConnectTimedOut),
        }
    }

    /// Negotiate a passive data connection and start MLSD on `path`.
    /// An empty `path` lists the current working directory.
    ///
    /// The returned stream carries the listing and must be passed to
    /// [`list_directory_receive`](Self::list_directory_receive).
    pub async fn list_directory_start(
        &mut self,
        path: &str,
        user_data: &UD,
    ) -> Result<S, FtpListStartError> {
        let data_stream = self
            .setup_data_transfer(FtpTransferType::Ascii, user_data)
            .await?;
        self.control.start_mlsd(path).await?;
        Ok(data_stream)
    }

    /// Read all listing lines into `receiver`, then consume the
    /// transfer-end reply on the control channel.
    pub async fn list_directory_receive<R>(
        &mut self,
        data_stream: S,
        receiver: &mut R,
    ) -> Result<(), FtpFileListError>
    where
        R: FtpLineDataReceiver + Send,
    {
        let transfer = FtpLineDataTransfer::new(data_stream, &self.config.transfer);
        match tokio::time::timeout(
            self.config.transfer.list_all_timeout,
            transfer.read_to_end(receiver),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(FtpFileListError::DataReadFailed(e)),
            Err(_) => return Err(FtpFileListError::TimeoutToWaitAllData),
        }

        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_mlsd_end(),
        )
        .await
        {
            Ok(r) => r.map_err(FtpFileListError::ServerReportedError),
            Err(_) => Err(FtpFileListError::TimeoutToWaitEndReply),
        }
    }

    /// Negotiate a passive data connection and start STOR on `path`.
    /// A non-zero `offset` is announced with REST first.
    ///
    /// The caller writes the file body to the returned stream, shuts it
    /// down, then calls [`store_file_end`](Self::store_file_end).
    pub async fn store_file_start(
        &mut self,
        path: &str,
        transfer_type: FtpTransferType,
        offset: u64,
        user_data: &UD,
    ) -> Result<S, FtpStoreStartError> {
        let data_stream = self.setup_data_transfer(transfer_type, user_data).await?;
        if offset > 0 {
            self.control.request_restart(offset).await?;
        }
        self.control.start_store(path).await?;
        Ok(data_stream)
    }

    pub async fn store_file_end(&mut self) -> Result<(), FtpFileStoreError> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_store_end(),
        )
        .await
        {
            Ok(r) => r.map_err(FtpFileStoreError::from),
            Err(_) => Err(FtpFileStoreError::TimeoutToWaitEndReply),
        }
    }
}
