/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_GREETING_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(90);

/// Limits and timeouts for the control connection.
#[derive(Debug, Clone)]
pub struct FtpControlConfig {
    /// max length of a single reply line, including CRLF
    pub max_line_len: usize,
    /// max number of continuation lines in a multiline reply
    pub max_multi_lines: usize,
    /// timeout for reading the full reply to one command
    pub command_timeout: Duration,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: 2048,
            max_multi_lines: 128,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Limits and timeouts for data connections.
#[derive(Debug, Clone)]
pub struct FtpTransferConfig {
    /// max length of a single MLSD listing line
    pub list_max_line_len: usize,
    /// max number of entries accepted from one listing
    pub list_max_entries: usize,
    /// timeout for reading a whole listing from the data connection
    pub list_all_timeout: Duration,
    /// timeout for the transfer-end reply on the control connection
    /// after the data connection reached EOF
    pub end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            list_max_line_len: 2048,
            list_max_entries: 4096,
            list_all_timeout: Duration::from_secs(300),
            end_wait_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    /// timeout for establishing the control or data TCP connection
    pub connect_timeout: Duration,
    /// timeout for the server greeting after the control connection is up
    pub greeting_timeout: Duration,
    /// depth cap for recursive directory removal
    pub remove_dir_max_depth: usize,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            greeting_timeout: DEFAULT_GREETING_TIMEOUT,
            remove_dir_max_depth: 64,
        }
    }
}

impl FtpClientConfig {
    /// Set one timeout value for both connect and per-command waits.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
        self.control.command_timeout = timeout;
    }
}
