/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::cmp::Ordering;
use std::io;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, SeekFrom};
use tokio::net::TcpStream;

use crate::addr::{DEFAULT_CONTROL_PORT, ServerAddr};
use crate::client::FtpClient;
use crate::config::FtpClientConfig;
use crate::connection::TcpConnectionProvider;
use crate::error::{FtpConnectError, FtpScanDirError};
use crate::facts::{FtpEntry, FtpEntryType};
use crate::transfer::{FtpLineDataReceiver, FtpTransferType};

/// Boolean-surface session facade over [`FtpClient`].
///
/// All file operations require a prior successful [`login`](Self::login),
/// before that they refuse silently: mutating operations return `false`
/// and [`scan_directory`](Self::scan_directory) returns an empty list,
/// without sending anything to the server. Failures of the operations
/// themselves are reported as `false` and logged, the typed errors stay
/// with [`FtpClient`].
pub struct FtpSession {
    client: FtpClient<TcpConnectionProvider, TcpStream, io::Error, ()>,
    config: FtpClientConfig,
    logged_in: bool,
}

impl FtpSession {
    /// Connect to `addr`, which is a `host` or `host:port` string.
    /// Port 21 is used when none is given.
    pub async fn connect(addr: &str) -> Result<Self, FtpConnectError<io::Error>> {
        let server = ServerAddr::from_str(addr).map_err(FtpConnectError::InvalidServerAddress)?;
        FtpSession::connect_with(server, FtpClientConfig::default()).await
    }

    /// Like [`connect`](Self::connect) with explicit address and config.
    /// A zero port (what a host-only address parses to) is replaced with
    /// port 21 here as well.
    pub async fn connect_with(
        server: ServerAddr,
        config: FtpClientConfig,
    ) -> Result<Self, FtpConnectError<io::Error>> {
        let server = with_default_port(server);
        let client =
            FtpClient::connect_to(TcpConnectionProvider::new(), server, &(), &config).await?;
        Ok(FtpSession {
            client,
            config,
            logged_in: false,
        })
    }

    #[inline]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// An empty username logs in as `anonymous`.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        match self.client.new_user_session(username, password).await {
            Ok(_) => {
                self.logged_in = true;
                true
            }
            Err(e) => {
                log::warn!("login failed: {e}");
                false
            }
        }
    }

    /// List the child entries of `path`, excluding the directory
    /// self-references the server reports along with them.
    ///
    /// With a `type_filter` only entries of that type are kept. With
    /// `sort_by_modify_time` entries are sorted by modification time
    /// ascending, entries without one first; the listing order is
    /// preserved among equals.
    ///
    /// A missing directory is [`FtpScanDirError::NotFound`], which an
    /// empty `Ok` list is not.
    pub async fn scan_directory(
        &mut self,
        path: &str,
        sort_by_modify_time: bool,
        type_filter: Option<FtpEntryType>,
    ) -> Result<Vec<FtpEntry>, FtpScanDirError> {
        if !self.logged_in {
            return Ok(Vec::new());
        }
        let mut entries = self.list_directory(path, type_filter).await?;
        if sort_by_modify_time {
            sort_entries_by_mtime(&mut entries);
        }
        Ok(entries)
    }

    async fn list_directory(
        &mut self,
        path: &str,
        type_filter: Option<FtpEntryType>,
    ) -> Result<Vec<FtpEntry>, FtpScanDirError> {
        let data_stream = self.client.list_directory_start(path, &()).await?;
        let mut collector = EntryCollector::new(type_filter);
        self.client
            .list_directory_receive(data_stream, &mut collector)
            .await?;
        Ok(collector.entries)
    }

    pub async fn remove_file(&mut self, path: &str) -> bool {
        if !self.logged_in {
            return false;
        }
        match self.client.delete_file(path).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("failed to delete file {path}: {e}");
                false
            }
        }
    }

    /// Remove the directory `path` and everything below it.
    ///
    /// Directories are expanded with an explicit work stack instead of
    /// call recursion, children are always removed before their parent.
    /// Stops and returns `false` when nesting exceeds the configured
    /// `remove_dir_max_depth`.
    pub async fn remove_dir_all(&mut self, path: &str) -> bool {
        if !self.logged_in {
            return false;
        }

        // (path, depth, expanded): an expanded entry has had all of its
        // children pushed (and files deleted) already
        let mut stack: Vec<(String, usize, bool)> = vec![(path.to_string(), 0, false)];

        while let Some((dir, depth, expanded)) = stack.pop() {
            if expanded {
                if let Err(e) = self.client.remove_dir(&dir).await {
                    log::warn!("failed to remove directory {dir}: {e}");
                    return false;
                }
                continue;
            }

            if depth >= self.config.remove_dir_max_depth {
                log::warn!(
                    "directory {dir} exceeds max removal depth {}",
                    self.config.remove_dir_max_depth
                );
                return false;
            }

            let entries = match self.list_directory(&dir, None).await {
                Ok(entries) => entries,
                Err(e) => {
                    // can't expand it, still try to remove it as-is
                    log::warn!("failed to list directory {dir}: {e}");
                    if let Err(e) = self.client.remove_dir(&dir).await {
                        log::warn!("failed to remove directory {dir}: {e}");
                        return false;
                    }
                    continue;
                }
            };

            stack.push((dir.clone(), depth, true));
            for entry in &entries {
                let child = join_remote_path(&dir, entry.name());
                if entry.is_dir() {
                    stack.push((child, depth + 1, false));
                } else if let Err(e) = self.client.delete_file(&child).await {
                    log::warn!("failed to delete file {child}: {e}");
                    return false;
                }
            }
        }

        true
    }

    pub async fn rename(&mut self, from: &str, to: &str) -> bool {
        if !self.logged_in {
            return false;
        }
        match self.client.rename(from, to).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("failed to rename {from} to {to}: {e}");
                false
            }
        }
    }

    /// Upload the local file at `local_path` to `remote_path`, in image
    /// (binary) or ascii representation.
    ///
    /// A non-zero `offset` resumes: the local file is read from that
    /// offset and the server is told to write from it with REST.
    pub async fn upload(
        &mut self,
        local_path: &Path,
        remote_path: &str,
        binary: bool,
        offset: u64,
    ) -> bool {
        if !self.logged_in {
            return false;
        }
        match self
            .upload_inner(local_path, remote_path, binary, offset)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::warn!(
                    "failed to upload {} to {remote_path}: {e}",
                    local_path.display()
                );
                false
            }
        }
    }

    async fn upload_inner(
        &mut self,
        local_path: &Path,
        remote_path: &str,
        binary: bool,
        offset: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut file = tokio::fs::File::open(local_path).await?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).await?;
        }

        let transfer_type = if binary {
            FtpTransferType::Image
        } else {
            FtpTransferType::Ascii
        };
        let mut data_stream = self
            .client
            .store_file_start(remote_path, transfer_type, offset, &())
            .await?;
        tokio::io::copy(&mut file, &mut data_stream).await?;
        data_stream.shutdown().await?;
        drop(data_stream);

        self.client.store_file_end().await?;
        Ok(())
    }

    /// Send QUIT and close the control connection.
    pub async fn close(self) {
        if let Err(e) = self.client.quit_and_close().await {
            log::debug!("error while quitting: {e}");
        }
    }
}

struct EntryCollector {
    entries: Vec<FtpEntry>,
    type_filter: Option<FtpEntryType>,
}

impl EntryCollector {
    fn new(type_filter: Option<FtpEntryType>) -> Self {
        EntryCollector {
            entries: Vec::new(),
            type_filter,
        }
    }
}

#[async_trait]
impl FtpLineDataReceiver for EntryCollector {
    async fn recv_line(&mut self, line: &str) {
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        match FtpEntry::parse_line(line) {
            Ok(entry) => {
                if entry.entry_type().is_self_reference() || matches!(entry.name(), "." | "..") {
                    return;
                }
                if let Some(t) = &self.type_filter {
                    if entry.entry_type() != t {
                        return;
                    }
                }
                self.entries.push(entry);
            }
            Err(e) => log::warn!("skipped invalid listing line {line:?}: {e}"),
        }
    }

    fn should_return_early(&self) -> bool {
        false
    }
}

// stable, so equal and unparsable timestamps keep their listing order
fn sort_entries_by_mtime(entries: &mut [FtpEntry]) {
    entries.sort_by(|a, b| match (a.mtime(), b.mtime()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    });
}

fn with_default_port(mut server: ServerAddr) -> ServerAddr {
    if server.port() == 0 {
        server.set_port(DEFAULT_CONTROL_PORT);
    }
    server
}

fn join_remote_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}
