use std::io;

/// Source of connections.
pub trait Acceptor {
    type Reader: io::Read + Send + 'static;

    /// Wait for the next connection.
    ///
    /// Returns the connection and a name for it used in logs. `None` means
    /// there will be no more connections.
    fn accept(&mut self) -> io::Result<Option<(Self::Reader, String)>>;
}

pub mod tcp {
    use std::io;
    use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
    use std::time::Duration;

    use super::Acceptor;

    pub struct TcpAcceptor {
        listener: TcpListener,
        read_timeout: Option<Duration>,
    }

    impl TcpAcceptor {
        pub fn bind(addr: impl ToSocketAddrs, read_timeout: Option<Duration>) -> io::Result<Self> {
            let listener = TcpListener::bind(addr)?;
            Ok(TcpAcceptor {
                listener,
                read_timeout,
            })
        }

        pub fn local_addr(&self) -> io::Result<SocketAddr> {
            self.listener.local_addr()
        }
    }

    impl Acceptor for TcpAcceptor {
        type Reader = TcpStream;

        fn accept(&mut self) -> io::Result<Option<(Self::Reader, String)>> {
            let (stream, peer) = self.listener.accept()?;
            stream.set_read_timeout(self.read_timeout)?;
            Ok(Some((stream, peer.to_string())))
        }
    }
}

pub mod test {
    use std::collections::VecDeque;
    use std::io;

    use super::Acceptor;

    /// Hands out in-memory connections, one per input, then ends.
    #[derive(Default)]
    pub struct TestAcceptor {
        inputs: VecDeque<Vec<u8>>,
        count: usize,
    }

    impl TestAcceptor {
        pub fn new<I, B>(inputs: I) -> Self
        where
            I: IntoIterator<Item = B>,
            B: Into<Vec<u8>>,
        {
            TestAcceptor {
                inputs: inputs.into_iter().map(Into::into).collect(),
                count: 0,
            }
        }
    }

    impl Acceptor for TestAcceptor {
        type Reader = io::Cursor<Vec<u8>>;

        fn accept(&mut self) -> io::Result<Option<(Self::Reader, String)>> {
            let Some(input) = self.inputs.pop_front() else {
                return Ok(None);
            };
            self.count += 1;
            Ok(Some((io::Cursor::new(input), format!("test-{}", self.count))))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;

    use super::tcp::TcpAcceptor;
    use super::test::TestAcceptor;
    use super::*;

    #[test]
    fn test_acceptor_ends() -> io::Result<()> {
        let mut a = TestAcceptor::new(["one", "two"]);

        let (mut r, name) = a.accept()?.unwrap();
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        assert_eq!(s, "one");
        assert_eq!(name, "test-1");

        let (_, name) = a.accept()?.unwrap();
        assert_eq!(name, "test-2");

        assert!(a.accept()?.is_none());
        Ok(())
    }

    #[test]
    fn tcp_acceptor() -> Result<(), crate::Error> {
        let mut a = TcpAcceptor::bind("127.0.0.1:0", None)?;
        let addr = a.local_addr()?;

        let client = thread::spawn(move || -> io::Result<()> {
            let mut s = TcpStream::connect(addr)?;
            s.write_all(b"GET /tcp HTTP/1.1\r\n")?;
            Ok(())
        });

        let (stream, _) = a.accept()?.unwrap();
        let line = reqline::read_request_line(stream)?;
        assert_eq!(line.target(), "/tcp");

        client.join().unwrap()?;
        Ok(())
    }
}
