/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ftpkit contributors
 */

//! Session tests against a scripted in-process FTP server.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;

use ftpkit::{
    FtpClient, FtpClientConfig, FtpConnectError, FtpEntryType, FtpRenameError, FtpScanDirError,
    FtpSession, ServerAddr, TcpConnectionProvider,
};

type CmdLog = Arc<Mutex<Vec<String>>>;

struct Ctrl {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    log: CmdLog,
}

impl Ctrl {
    /// Accept a control connection without sending any greeting yet.
    async fn accept_raw(listener: &TcpListener, log: &CmdLog) -> Ctrl {
        let (stream, _) = listener.accept().await.unwrap();
        let (r, w) = stream.into_split();
        Ctrl {
            reader: BufReader::new(r),
            writer: w,
            log: log.clone(),
        }
    }

    async fn accept(listener: &TcpListener, log: &CmdLog) -> Ctrl {
        let mut ctrl = Ctrl::accept_raw(listener, log).await;
        ctrl.reply("220 ready").await;
        ctrl
    }

    async fn cmd(&mut self) -> String {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.unwrap();
        assert!(n > 0, "control connection closed while expecting a command");
        let line = line.trim_end().to_string();
        self.log.lock().unwrap().push(line.clone());
        line
    }

    async fn reply(&mut self, s: &str) {
        self.writer
            .write_all(format!("{s}\r\n").as_bytes())
            .await
            .unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn expect(&mut self, cmd: &str, reply: &str) {
        let line = self.cmd().await;
        assert_eq!(line, cmd);
        self.reply(reply).await;
    }

    async fn login(&mut self, user: &str, pass: &str) {
        self.expect(&format!("USER {user}"), "331 password required")
            .await;
        self.expect(&format!("PASS {pass}"), "230 logged in").await;
    }

    /// Answer the next PASV with a fresh loopback data listener.
    async fn pasv(&mut self) -> TcpListener {
        let data = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = data.local_addr().unwrap().port();
        let line = self.cmd().await;
        assert_eq!(line, "PASV");
        self.reply(&format!(
            "227 Entering Passive Mode (127,0,0,1,{},{})",
            port >> 8,
            port & 0xff
        ))
        .await;
        data
    }

    async fn send_listing(&mut self, data: TcpListener, lines: &[&str]) {
        let line = self.cmd().await;
        assert!(line.starts_with("MLSD"), "expected MLSD, got {line}");
        self.reply("150 here comes the listing").await;

        let (mut ds, _) = data.accept().await.unwrap();
        for l in lines {
            ds.write_all(format!("{l}\r\n").as_bytes()).await.unwrap();
        }
        ds.shutdown().await.unwrap();
        drop(ds);

        self.reply("226 transfer complete").await;
    }

    async fn expect_eof(mut self) {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.unwrap();
        assert_eq!(n, 0, "unexpected command {line:?}");
    }
}

async fn start_server() -> (TcpListener, CmdLog, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, Arc::new(Mutex::new(Vec::new())), addr)
}

fn logged(log: &CmdLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn greeting_preliminary_then_ready() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept_raw(&listener, &log).await;
        ctrl.reply("120 service ready in a moment").await;
        ctrl.reply("220 ready").await;
        ctrl.login("alice", "secret").await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    drop(session);

    server.await.unwrap();
}

#[tokio::test]
async fn greeting_service_not_available() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept_raw(&listener, &log).await;
        ctrl.reply("421 down for maintenance").await;
    });

    let r = FtpSession::connect(&addr).await;
    assert!(matches!(r, Err(FtpConnectError::ServiceNotAvailable)));

    server.await.unwrap();
}

#[tokio::test]
async fn login_accepted() {
    let (listener, log, addr) = start_server().await;
    let srv_log = log.clone();
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &srv_log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("QUIT", "221 bye").await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(session.is_logged_in());
    session.close().await;

    server.await.unwrap();
    assert_eq!(logged(&log), ["USER alice", "PASS secret", "QUIT"]);
}

#[tokio::test]
async fn login_rejected() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.expect("USER alice", "331 password required").await;
        ctrl.expect("PASS wrong", "530 not logged in").await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(!session.login("alice", "wrong").await);
    assert!(!session.is_logged_in());
    drop(session);

    server.await.unwrap();
}

#[tokio::test]
async fn operations_refused_before_login() {
    let (listener, log, addr) = start_server().await;
    let srv_log = log.clone();
    let server = tokio::spawn(async move {
        let ctrl = Ctrl::accept(&listener, &srv_log).await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(!session.remove_file("/a.txt").await);
    assert!(!session.remove_dir_all("/a").await);
    assert!(!session.rename("/a", "/b").await);
    let entries = session.scan_directory("/a", true, None).await.unwrap();
    assert!(entries.is_empty());
    drop(session);

    server.await.unwrap();
    assert!(logged(&log).is_empty());
}

#[tokio::test]
async fn scan_directory_sorted() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE A", "200 switched to ascii").await;
        let data = ctrl.pasv().await;
        ctrl.send_listing(
            data,
            &[
                "type=cdir;modify=20230101000000; /pub",
                "type=pdir;modify=20230101000000; /",
                "type=dir;modify=20230101000000; .",
                "type=file;modify=20230105000000; new.txt",
                "type=dir;modify=20230102000000; sub",
                "type=file;modify=20230103000000; old.txt",
            ],
        )
        .await;
        ctrl.expect("QUIT", "221 bye").await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    let entries = session.scan_directory("/pub", true, None).await.unwrap();
    session.close().await;
    server.await.unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["sub", "old.txt", "new.txt"]);
}

#[tokio::test]
async fn scan_directory_type_filter() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE A", "200 switched to ascii").await;
        let data = ctrl.pasv().await;
        ctrl.send_listing(
            data,
            &[
                "type=file;modify=20230101000000; a.txt",
                "type=dir;modify=20230102000000; sub",
                "type=file;modify=20230103000000; b.txt",
            ],
        )
        .await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    let entries = session
        .scan_directory("/pub", false, Some(FtpEntryType::File))
        .await
        .unwrap();
    drop(session);
    server.await.unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["a.txt", "b.txt"]);
}

#[tokio::test]
async fn scan_directory_not_found() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE A", "200 switched to ascii").await;
        let _data = ctrl.pasv().await;
        ctrl.expect("MLSD /missing", "550 no such directory").await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    let r = session.scan_directory("/missing", true, None).await;
    assert!(matches!(r, Err(FtpScanDirError::NotFound)));
    drop(session);

    server.await.unwrap();
}

#[tokio::test]
async fn remove_dir_all_children_first() {
    let (listener, log, addr) = start_server().await;
    let srv_log = log.clone();
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &srv_log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE A", "200 switched to ascii").await;

        let data = ctrl.pasv().await;
        ctrl.send_listing(
            data,
            &[
                "type=cdir;modify=20230101000000; /a",
                "type=pdir;modify=20230101000000; /",
                "type=file;modify=20230101000000; x.txt",
                "type=dir;modify=20230101000000; b",
            ],
        )
        .await;
        ctrl.expect("DELE /a/x.txt", "250 deleted").await;

        // transfer type is already ascii, no second TYPE A
        let data = ctrl.pasv().await;
        ctrl.send_listing(data, &[]).await;

        ctrl.expect("RMD /a/b", "250 removed").await;
        ctrl.expect("RMD /a", "250 removed").await;
        ctrl.expect("QUIT", "221 bye").await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(session.remove_dir_all("/a").await);
    session.close().await;
    server.await.unwrap();

    let file_ops: Vec<String> = logged(&log)
        .into_iter()
        .filter(|c| {
            c.starts_with("MLSD") || c.starts_with("DELE") || c.starts_with("RMD")
        })
        .collect();
    assert_eq!(
        file_ops,
        ["MLSD /a", "DELE /a/x.txt", "MLSD /a/b", "RMD /a/b", "RMD /a"]
    );
}

#[tokio::test]
async fn remove_dir_all_stops_at_depth_cap() {
    let (listener, log, addr) = start_server().await;
    let srv_log = log.clone();
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &srv_log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE A", "200 switched to ascii").await;

        let data = ctrl.pasv().await;
        ctrl.send_listing(data, &["type=dir;modify=20230101000000; b"])
            .await;

        // the nested directory is over the cap, nothing more is sent
        ctrl.expect_eof().await;
    });

    let server_addr: ServerAddr = addr.parse().unwrap();
    let mut config = FtpClientConfig::default();
    config.remove_dir_max_depth = 1;
    let mut session = FtpSession::connect_with(server_addr, config).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(!session.remove_dir_all("/a").await);
    drop(session);

    server.await.unwrap();
    let cmds = logged(&log);
    assert!(cmds.iter().all(|c| !c.starts_with("RMD")));
    assert!(cmds.iter().all(|c| c != "MLSD /a/b"));
}

#[tokio::test]
async fn rename_accepted() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("RNFR /old.txt", "350 ready for destination").await;
        ctrl.expect("RNTO /new.txt", "250 renamed").await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(session.rename("/old.txt", "/new.txt").await);
    drop(session);

    server.await.unwrap();
}

#[tokio::test]
async fn rename_target_refused() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("RNFR /old.txt", "350 ready for destination").await;
        ctrl.expect("RNTO /denied.txt", "550 permission denied").await;
        ctrl.expect_eof().await;
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(!session.rename("/old.txt", "/denied.txt").await);
    drop(session);

    server.await.unwrap();
}

#[tokio::test]
async fn rename_broken_after_source_accepted() {
    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("RNFR /old.txt", "350 ready for destination").await;
        ctrl.expect("RNTO /denied.txt", "550 permission denied").await;
        ctrl.expect_eof().await;
    });

    let server_addr: ServerAddr = addr.parse().unwrap();
    let config = FtpClientConfig::default();
    let mut client =
        FtpClient::connect_to(TcpConnectionProvider::new(), server_addr, &(), &config)
            .await
            .unwrap();
    client.new_user_session("alice", "secret").await.unwrap();

    let r = client.rename("/old.txt", "/denied.txt").await;
    assert!(matches!(r, Err(FtpRenameError::BrokenMidway(_))));
    drop(client);

    server.await.unwrap();
}

#[tokio::test]
async fn upload_full_file() {
    let local = std::env::temp_dir().join("ftpkit-test-upload-full.bin");
    std::fs::write(&local, b"hello ftp").unwrap();

    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE I", "200 switched to binary").await;
        let data = ctrl.pasv().await;
        ctrl.expect("STOR /up.bin", "150 ok to send data").await;

        let (mut ds, _) = data.accept().await.unwrap();
        let mut body = Vec::new();
        ds.read_to_end(&mut body).await.unwrap();
        drop(ds);
        ctrl.reply("226 transfer complete").await;

        ctrl.expect("QUIT", "221 bye").await;
        body
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(session.upload(&local, "/up.bin", true, 0).await);
    session.close().await;

    let body = server.await.unwrap();
    assert_eq!(body, b"hello ftp");
    let _ = std::fs::remove_file(&local);
}

#[tokio::test]
async fn upload_resumes_from_offset() {
    let local = std::env::temp_dir().join("ftpkit-test-upload-offset.bin");
    std::fs::write(&local, b"0123456789").unwrap();

    let (listener, log, addr) = start_server().await;
    let server = tokio::spawn(async move {
        let mut ctrl = Ctrl::accept(&listener, &log).await;
        ctrl.login("alice", "secret").await;
        ctrl.expect("TYPE I", "200 switched to binary").await;
        let data = ctrl.pasv().await;
        ctrl.expect("REST 4", "350 restarting at 4").await;
        ctrl.expect("STOR /up.bin", "150 ok to send data").await;

        let (mut ds, _) = data.accept().await.unwrap();
        let mut body = Vec::new();
        ds.read_to_end(&mut body).await.unwrap();
        drop(ds);
        ctrl.reply("226 transfer complete").await;

        ctrl.expect_eof().await;
        body
    });

    let mut session = FtpSession::connect(&addr).await.unwrap();
    assert!(session.login("alice", "secret").await);
    assert!(session.upload(&local, "/up.bin", true, 4).await);
    drop(session);

    let body = server.await.unwrap();
    assert_eq!(body, b"456789");
    let _ = std::fs::remove_file(&local);
}
