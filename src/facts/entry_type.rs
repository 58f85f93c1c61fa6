/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::fmt;

/// Value of the MLSD `type` fact.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FtpEntryType {
    Unknown,
    File,
    Directory,
    CurrentDir,
    ParentDir,
    OsType(String),
}

impl fmt::Display for FtpEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FtpEntryType {
    pub(super) fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "file" => FtpEntryType::File,
            "dir" => FtpEntryType::Directory,
            "cdir" => FtpEntryType::CurrentDir,
            "pdir" => FtpEntryType::ParentDir,
            _ => FtpEntryType::OsType(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FtpEntryType::Unknown => "unknown",
            FtpEntryType::File => "file",
            FtpEntryType::Directory => "dir",
            FtpEntryType::CurrentDir => "cdir",
            FtpEntryType::ParentDir => "pdir",
            FtpEntryType::OsType(s) => s,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FtpEntryType::Directory)
    }

    /// cdir/pdir facts reference the listed directory itself and its
    /// parent, they never name a real child entry.
    pub fn is_self_reference(&self) -> bool {
        matches!(self, FtpEntryType::CurrentDir | FtpEntryType::ParentDir)
    }

    pub fn maybe_file(&self) -> bool {
        match self {
            FtpEntryType::Unknown => true,
            FtpEntryType::File => true,
            FtpEntryType::Directory => false,
            FtpEntryType::CurrentDir => false,
            FtpEntryType::ParentDir => false,
            FtpEntryType::OsType(_) => true,
        }
    }
}
