/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerAddrParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("invalid port")]
    InvalidPort,
    #[error("invalid address format")]
    InvalidFormat,
}
