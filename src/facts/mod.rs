/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::str::FromStr;

use chrono::{DateTime, Utc};
use mime::Mime;

use crate::error::FtpEntryParseError;

mod entry_type;
pub(crate) mod time_val;

pub use entry_type::FtpEntryType;

/// One entry of an MLSD directory listing.
#[derive(Debug, Clone)]
pub struct FtpEntry {
    name: String,
    entry_type: FtpEntryType,
    size: Option<u64>,
    media_type: Option<Mime>,
    modify_time: Option<DateTime<Utc>>,
    create_time: Option<DateTime<Utc>>,
}

impl FtpEntry {
    fn new(name: &str) -> Self {
        FtpEntry {
            name: name.to_string(),
            entry_type: FtpEntryType::Unknown,
            size: None,
            media_type: None,
            modify_time: None,
            create_time: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn entry_type(&self) -> &FtpEntryType {
        &self.entry_type
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    #[inline]
    pub fn maybe_file(&self) -> bool {
        self.entry_type.maybe_file()
    }

    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    #[inline]
    pub fn mtime(&self) -> Option<&DateTime<Utc>> {
        self.modify_time.as_ref()
    }

    #[inline]
    pub fn ctime(&self) -> Option<&DateTime<Utc>> {
        self.create_time.as_ref()
    }

    #[inline]
    pub fn media_type(&self) -> Option<&Mime> {
        self.media_type.as_ref()
    }

    /// Parse one MLSD listing line: semicolon separated `key=value` facts,
    /// then a single space, then the entry name. Unknown facts are ignored.
    pub fn parse_line(line: &str) -> Result<Self, FtpEntryParseError> {
        if let Some((facts, name)) = line.trim_start().split_once(' ') {
            let mut entry = FtpEntry::new(name);

            for fact in facts.split(';') {
                if fact.is_empty() {
                    continue;
                }

                if let Some((key, value)) = fact.split_once('=') {
                    entry.set_fact(key, value)?;
                } else {
                    return Err(FtpEntryParseError::NoDelimiterInFact(fact.to_string()));
                }
            }

            Ok(entry)
        } else {
            Err(FtpEntryParseError::NoSpaceDelimiter)
        }
    }

    fn set_fact(&mut self, key: &str, value: &str) -> Result<(), FtpEntryParseError> {
        match key.to_lowercase().as_str() {
            "type" => self.entry_type = FtpEntryType::parse(value),
            "modify" => {
                let dt = time_val::parse_from_str(value)
                    .map_err(FtpEntryParseError::InvalidModifyTime)?;
                self.modify_time = Some(dt);
            }
            "create" => {
                let dt = time_val::parse_from_str(value)
                    .map_err(FtpEntryParseError::InvalidCreateTime)?;
                self.create_time = Some(dt);
            }
            "size" => {
                let size = u64::from_str(value).map_err(|_| FtpEntryParseError::InvalidSize)?;
                self.size = Some(size);
            }
            "media-type" => {
                if let Ok(mime) = value.parse() {
                    self.media_type = Some(mime);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pdir_line() {
        let entry = FtpEntry::parse_line("type=pdir;sizd=4096;modify=20210525083610;UNIX.mode=0755;UNIX.uid=0;UNIX.gid=0;unique=804g2; /").unwrap();
        assert_eq!(entry.entry_type, FtpEntryType::ParentDir);
        assert!(entry.size.is_none());
        assert!(entry.mtime().is_some());
    }

    #[test]
    fn parse_file_line() {
        let entry =
            FtpEntry::parse_line("type=file;size=1024;modify=20230102030405; report.txt").unwrap();
        assert_eq!(entry.name(), "report.txt");
        assert_eq!(entry.entry_type, FtpEntryType::File);
        assert_eq!(entry.size(), Some(1024));
        assert!(entry.maybe_file());
        assert!(!entry.is_dir());
    }

    #[test]
    fn parse_name_with_spaces() {
        let entry = FtpEntry::parse_line("type=file; summer photos.jpg").unwrap();
        assert_eq!(entry.name(), "summer photos.jpg");
    }

    #[test]
    fn unknown_facts_ignored() {
        let entry = FtpEntry::parse_line("type=dir;perm=flcdmpe;unique=13f0c0a; sub").unwrap();
        assert_eq!(entry.name(), "sub");
        assert!(entry.is_dir());
    }

    #[test]
    fn reject_missing_delimiters() {
        assert!(matches!(
            FtpEntry::parse_line("type=file;noequalsign a.txt"),
            Err(FtpEntryParseError::NoDelimiterInFact(_))
        ));
        assert!(matches!(
            FtpEntry::parse_line("no-space-at-all"),
            Err(FtpEntryParseError::NoSpaceDelimiter)
        ));
    }
}
