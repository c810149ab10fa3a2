//! Accepts connections and prints what the clients send.
//!
//! Each connection is read on its own thread. In [`Mode::RequestLine`] the
//! request-line is parsed with [`reqline`] and printed as
//!
//! ```text
//! Request line:
//! - Method: GET
//! - Target: /
//! - Version: 1.1
//! ```
//!
//! In [`Mode::Lines`] every `\n` terminated line is printed as received.

#[macro_use]
extern crate log;

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use reqline::{ReaderConfig, RequestLine, RequestLineReader};

mod error;
pub use error::Error;

mod lines;
pub use lines::LineReader;

pub mod server;
use server::Acceptor;

/// What to print for each connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Parse and print the request-line.
    #[default]
    RequestLine,
    /// Print every line received.
    Lines,
}

#[derive(Debug, Clone, Default)]
pub struct ListenConfig {
    pub mode: Mode,
    pub reader: ReaderConfig,
    pub read_timeout: Option<Duration>,
}

/// Output shared between connection threads.
pub type SharedOutput<W> = Arc<Mutex<W>>;

/// Accept connections until the acceptor runs out.
///
/// Errors on a connection are logged and only end that connection. An accept
/// error ends the loop after waiting for running connections.
pub fn serve<A, W>(mut acceptor: A, config: &ListenConfig, out: SharedOutput<W>) -> Result<(), Error>
where
    A: Acceptor,
    W: io::Write + Send + 'static,
{
    let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

    let result = loop {
        let (reader, name) = match acceptor.accept() {
            Ok(Some(v)) => v,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e.into()),
        };

        info!("Accepted connection: {}", name);

        let config = config.clone();
        let out = Arc::clone(&out);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", name))
            .spawn(move || match handle_connection(reader, &config, &*out) {
                Ok(()) => info!("Closed connection: {}", name),
                Err(e) => warn!("Connection {} failed: {}", name, e),
            });

        let handle = match spawned {
            Ok(v) => v,
            Err(e) => break Err(e.into()),
        };

        let (finished, running): (Vec<_>, Vec<_>) =
            handles.into_iter().partition(|h| h.is_finished());
        join_all(finished);
        handles = running;
        handles.push(handle);
    };

    join_all(handles);

    result
}

/// Join threads, returning how many panicked.
fn join_all(handles: Vec<thread::JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for handle in handles {
        let name = handle.thread().name().unwrap_or("connection").to_string();
        if handle.join().is_err() {
            warn!("Thread {} panicked", name);
            panicked += 1;
        }
    }
    panicked
}

/// Read one connection to the end and print it.
pub fn handle_connection<R, W>(reader: R, config: &ListenConfig, out: &Mutex<W>) -> Result<(), Error>
where
    R: io::Read,
    W: io::Write,
{
    match config.mode {
        Mode::RequestLine => {
            let mut reader = RequestLineReader::with_config(reader, config.reader);
            let line = reader.read_request_line()?;

            debug!("{} bytes read past the request-line", reader.remainder().len());

            let mut out = lock(out)?;
            write_request_line(&mut *out, &line)?;
            out.flush()?;
        }
        Mode::Lines => {
            let mut lines = LineReader::new(reader, config.reader.chunk_size);

            while let Some(line) = lines.next_line()? {
                let mut out = lock(out)?;
                out.write_all(&line)?;
                out.write_all(b"\n")?;
                out.flush()?;
            }
        }
    }

    Ok(())
}

pub fn write_request_line(out: &mut impl io::Write, line: &RequestLine) -> io::Result<()> {
    writeln!(out, "Request line:")?;
    writeln!(out, "- Method: {}", line.method())?;
    writeln!(out, "- Target: {}", line.target())?;
    writeln!(out, "- Version: {}", line.version())?;
    Ok(())
}

fn lock<W>(out: &Mutex<W>) -> io::Result<std::sync::MutexGuard<'_, W>> {
    out.lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "output lock poisoned"))
}

#[cfg(test)]
mod test {
    use super::server::test::TestAcceptor;
    use super::*;

    fn output(out: &SharedOutput<Vec<u8>>) -> String {
        String::from_utf8(out.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn prints_request_line() -> Result<(), Error> {
        let out = Mutex::new(Vec::new());
        let input = &b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n"[..];

        handle_connection(input, &ListenConfig::default(), &out)?;

        let s = String::from_utf8(out.into_inner().unwrap()).unwrap();
        assert_eq!(
            s,
            "Request line:\n- Method: GET\n- Target: /coffee\n- Version: 1.1\n"
        );
        Ok(())
    }

    #[test]
    fn bad_request_prints_nothing() {
        let out = Mutex::new(Vec::new());
        let r = handle_connection(&b"GET / HTTP/1.0\r\n"[..], &ListenConfig::default(), &out);
        assert!(matches!(r, Err(Error::Parse(reqline::Error::BadRequest(_)))));
        assert!(out.into_inner().unwrap().is_empty());
    }

    #[test]
    fn incomplete_is_source_failure() {
        let out = Mutex::new(Vec::new());
        let r = handle_connection(&b"GET / HTTP/1.1"[..], &ListenConfig::default(), &out);
        let Err(Error::Parse(e)) = r else {
            panic!("expected parse error");
        };
        assert!(e.is_source_failure());
    }

    #[test]
    fn prints_lines() -> Result<(), Error> {
        let out = Mutex::new(Vec::new());
        let config = ListenConfig {
            mode: Mode::Lines,
            reader: ReaderConfig::default().chunk_size(8),
            ..Default::default()
        };

        handle_connection(&b"first line\nsecond\nlast"[..], &config, &out)?;

        let s = String::from_utf8(out.into_inner().unwrap()).unwrap();
        assert_eq!(s, "first line\nsecond\nlast\n");
        Ok(())
    }

    #[test]
    fn join_all_counts_panics() {
        let ok = thread::spawn(|| {});
        let bad = thread::spawn(|| panic!("connection failed hard"));
        while !ok.is_finished() || !bad.is_finished() {
            thread::yield_now();
        }
        assert_eq!(join_all(vec![ok, bad]), 1);
    }

    #[test]
    fn serve_all_connections() -> Result<(), Error> {
        let acceptor = TestAcceptor::new([
            "GET /a HTTP/1.1\r\n",
            "garbage\r\n",
            "POST /b HTTP/1.1\r\n",
        ]);
        let out = Arc::new(Mutex::new(Vec::new()));

        serve(acceptor, &ListenConfig::default(), Arc::clone(&out))?;

        // Connections run concurrently, the order of blocks is not fixed.
        let s = output(&out);
        assert_eq!(s.matches("Request line:\n").count(), 2);
        assert!(s.contains("- Method: GET\n- Target: /a\n- Version: 1.1\n"));
        assert!(s.contains("- Method: POST\n- Target: /b\n- Version: 1.1\n"));
        Ok(())
    }
}
