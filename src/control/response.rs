/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpControlChannel;
use crate::error::FtpReplyError;
use crate::io::LimitedBufReadExt;

#[derive(Debug)]
pub(super) enum FtpReply {
    SingleLine(u16, String),
    MultiLine(u16, Vec<String>),
}

fn parse_reply_code(line: &[u8]) -> Result<u16, FtpReplyError> {
    if !line[..3].iter().all(|c| c.is_ascii_digit()) {
        return Err(FtpReplyError::InvalidLineFormat);
    }
    let code =
        (line[0] - b'0') as u16 * 100 + (line[1] - b'0') as u16 * 10 + (line[2] - b'0') as u16;
    if !(100..600).contains(&code) {
        return Err(FtpReplyError::InvalidReplyCode(code));
    }
    Ok(code)
}

impl FtpReply {
    pub(super) fn parse_single_line(line: &[u8]) -> Result<Self, FtpReplyError> {
        let code = parse_reply_code(line)?;
        let msg = std::str::from_utf8(&line[4..]).map_err(|_| FtpReplyError::LineIsNotUtf8)?;
        Ok(FtpReply::SingleLine(code, msg.trim_end().to_string()))
    }

    pub(super) fn get_multi_line_parser(
        line: &[u8],
        max_lines: usize,
    ) -> Result<FtpMultiLineReplyParser, FtpReplyError> {
        let code = parse_reply_code(line)?;
        let end_prefix = [line[0], line[1], line[2], b' '];
        let mut lines = Vec::<String>::with_capacity(max_lines.min(16));
        let msg = std::str::from_utf8(&line[4..]).map_err(|_| FtpReplyError::LineIsNotUtf8)?;
        lines.push(msg.trim_end().to_string());
        Ok(FtpMultiLineReplyParser {
            code,
            end_prefix,
            lines,
        })
    }

    pub(super) fn code(&self) -> u16 {
        match self {
            FtpReply::SingleLine(code, _) => *code,
            FtpReply::MultiLine(code, _) => *code,
        }
    }

    /// Parse the `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)` reply
    /// into the advertised data endpoint.
    pub(super) fn parse_pasv_227_reply(&self) -> Option<SocketAddr> {
        let line = match self {
            FtpReply::SingleLine(_, line) => line,
            FtpReply::MultiLine(_, _) => return None,
        };

        let p_start = memchr::memchr(b'(', line.as_bytes())?;
        let p_end = memchr::memchr(b')', &line.as_bytes()[p_start..])? + p_start;

        let a: Vec<&str> = line[p_start + 1..p_end].split(',').collect();
        if a.len() != 6 {
            return None;
        }

        let h1 = u8::from_str(a[0]).ok()?;
        let h2 = u8::from_str(a[1]).ok()?;
        let h3 = u8::from_str(a[2]).ok()?;
        let h4 = u8::from_str(a[3]).ok()?;
        let p1 = u8::from_str(a[4]).ok()?;
        let p2 = u8::from_str(a[5]).ok()?;

        let ip = IpAddr::V4(Ipv4Addr::new(h1, h2, h3, h4));
        let port = ((p1 as u16) << 8) + (p2 as u16);
        Some(SocketAddr::new(ip, port))
    }
}

pub(super) struct FtpMultiLineReplyParser {
    code: u16,
    end_prefix: [u8; 4],
    lines: Vec<String>,
}

impl FtpMultiLineReplyParser {
    pub(super) fn feed_line(&mut self, line: &[u8]) -> Result<bool, FtpReplyError> {
        if line.starts_with(&self.end_prefix) {
            let msg = std::str::from_utf8(&line[4..]).map_err(|_| FtpReplyError::LineIsNotUtf8)?;
            self.lines.push(msg.trim_end().to_string());
            Ok(true)
        } else {
            let msg = std::str::from_utf8(line).map_err(|_| FtpReplyError::LineIsNotUtf8)?;
            // do not trim whitespace at beginning
            self.lines.push(msg.trim_end().to_string());
            Ok(false)
        }
    }

    pub(super) fn finish(self) -> FtpReply {
        FtpReply::MultiLine(self.code, self.lines)
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn read_line(&mut self, buf: &mut Vec<u8>, min_len: usize) -> Result<(), FtpReplyError> {
        buf.clear();

        let (found, len) = self
            .stream
            .limited_read_until(b'\n', self.config.max_line_len, buf)
            .await
            .map_err(FtpReplyError::ReadFailed)?;
        if len == 0 {
            return Err(FtpReplyError::ConnectionClosed);
        }

        #[cfg(feature = "log-raw-io")]
        crate::debug::log_rsp(unsafe { std::str::from_utf8_unchecked(buf).trim_end() });

        if len < min_len {
            Err(FtpReplyError::InvalidLineFormat)
        } else if !found {
            Err(FtpReplyError::LineTooLong)
        } else {
            Ok(())
        }
    }

    pub(super) async fn read_reply(&mut self) -> Result<FtpReply, FtpReplyError> {
        let mut buf = Vec::<u8>::with_capacity(self.config.max_line_len);
        // at least <code><sp>\n
        self.read_line(&mut buf, 5).await?;

        match buf[3] {
            b' ' => FtpReply::parse_single_line(&buf),
            b'-' => {
                let mut ml_parser =
                    FtpReply::get_multi_line_parser(&buf, self.config.max_multi_lines)?;
                for _i in 0..self.config.max_multi_lines {
                    self.read_line(&mut buf, 2).await?;
                    let end = ml_parser.feed_line(&buf)?;
                    if end {
                        return Ok(ml_parser.finish());
                    }
                }
                Err(FtpReplyError::TooManyLines)
            }
            _ => Err(FtpReplyError::InvalidLineFormat),
        }
    }

    pub(super) async fn timed_read_reply(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpReply, FtpReplyError> {
        match tokio::time::timeout(self.config.command_timeout, self.read_reply()).await {
            Ok(r) => r,
            Err(_) => Err(FtpReplyError::ReadTimedOut(stage)),
        }
    }
}
