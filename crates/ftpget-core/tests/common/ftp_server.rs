//! Minimal FTP server for integration tests.
//!
//! Serves one static file in passive mode (EPSV and PASV). Handles the
//! command sequence libcurl issues for a single RETR and answers anything else
//! with 502. Optionally stalls before sending the body to trip read timeouts.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FtpServerOptions {
    pub username: String,
    pub password: String,
    /// Path (after the leading '/') of the only file served.
    pub path: String,
    /// Delay after `150` before the first body byte.
    pub stall: Option<Duration>,
}

impl Default for FtpServerOptions {
    fn default() -> Self {
        Self {
            username: "ftp-user".to_string(),
            password: "ftp-user".to_string(),
            path: "files/test.txt".to_string(),
            stall: None,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the file URL
/// (e.g. "ftp://127.0.0.1:12345/files/test.txt"). Runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, FtpServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: FtpServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let url = format!("ftp://127.0.0.1:{}/{}", port, opts.path);
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            thread::spawn(move || {
                let _ = handle(stream, &body, &opts);
            });
        }
    });
    url
}

struct Session {
    cwd: Vec<String>,
    user_ok: bool,
    logged_in: bool,
    data: Option<TcpListener>,
}

fn reply(out: &mut TcpStream, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")?;
    out.flush()
}

fn handle(stream: TcpStream, body: &[u8], opts: &FtpServerOptions) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    let mut out = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut s = Session {
        cwd: Vec::new(),
        user_ok: false,
        logged_in: false,
        data: None,
    };

    reply(&mut out, "220 test server ready")?;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        let (cmd, arg) = match line.split_once(' ') {
            Some((c, a)) => (c.to_ascii_uppercase(), a.to_string()),
            None => (line.to_ascii_uppercase(), String::new()),
        };

        match cmd.as_str() {
            "USER" => {
                s.user_ok = arg == opts.username;
                reply(&mut out, "331 password required")?;
            }
            "PASS" => {
                if s.user_ok && arg == opts.password {
                    s.logged_in = true;
                    reply(&mut out, "230 logged in")?;
                } else {
                    reply(&mut out, "530 login incorrect")?;
                }
            }
            _ if !s.logged_in && cmd != "QUIT" => reply(&mut out, "530 not logged in")?,
            "PWD" => reply(&mut out, "257 \"/\" is the current directory")?,
            "CWD" => {
                for part in arg.split('/').filter(|p| !p.is_empty()) {
                    s.cwd.push(part.to_string());
                }
                reply(&mut out, "250 directory changed")?;
            }
            "TYPE" => reply(&mut out, "200 type set")?,
            "EPSV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let port = listener.local_addr()?.port();
                s.data = Some(listener);
                reply(&mut out, &format!("229 Entering Extended Passive Mode (|||{}|)", port))?;
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let port = listener.local_addr()?.port();
                s.data = Some(listener);
                reply(
                    &mut out,
                    &format!("227 Entering Passive Mode (127,0,0,1,{},{})", port >> 8, port & 0xff),
                )?;
            }
            "SIZE" => {
                if requested(&s, &arg) == opts.path {
                    reply(&mut out, &format!("213 {}", body.len()))?;
                } else {
                    reply(&mut out, "550 no such file")?;
                }
            }
            "RETR" => {
                if requested(&s, &arg) != opts.path {
                    reply(&mut out, "550 no such file")?;
                    continue;
                }
                let Some(listener) = s.data.take() else {
                    reply(&mut out, "425 use PASV first")?;
                    continue;
                };
                reply(&mut out, &format!("150 opening data connection ({} bytes)", body.len()))?;
                let (mut data, _) = listener.accept()?;
                if let Some(stall) = opts.stall {
                    thread::sleep(stall);
                }
                if data.write_all(body).is_err() {
                    reply(&mut out, "426 transfer aborted")?;
                    continue;
                }
                drop(data);
                reply(&mut out, "226 transfer complete")?;
            }
            "QUIT" => {
                reply(&mut out, "221 bye")?;
                return Ok(());
            }
            _ => reply(&mut out, "502 command not implemented")?,
        }
    }
}

fn requested(s: &Session, arg: &str) -> String {
    let arg = arg.trim_start_matches('/');
    if s.cwd.is_empty() {
        arg.to_string()
    } else {
        format!("{}/{}", s.cwd.join("/"), arg)
    }
}
