use openssl::ssl::SslStream;
use std::net::TcpStream;
use std::io::{Read, BufRead, BufReader, Write, Error};

#[derive(Debug)]
pub enum IMAPStream {
    Plain(BufReader<TcpStream>),
    SSL(BufReader<SslStream<TcpStream>>),
}

impl Write for IMAPStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        match *self {
            IMAPStream::Plain(ref mut stream) => stream.get_mut().write(buf),
            IMAPStream::SSL(ref mut stream) => stream.get_mut().write(buf),
        }
    }

    fn flush(&mut self) -> Result<(), Error> {
        match *self {
            IMAPStream::Plain(ref mut stream) => stream.get_mut().flush(),
            IMAPStream::SSL(ref mut stream) => stream.get_mut().flush(),
        }
    }
}

impl Read for IMAPStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        match *self {
            IMAPStream::Plain(ref mut stream) => stream.read(buf),
            IMAPStream::SSL(ref mut stream) => stream.read(buf),
        }
    }
}

impl BufRead for IMAPStream {
    fn fill_buf(&mut self) -> Result<&[u8], Error> {
        match *self {
            IMAPStream::Plain(ref mut stream) => stream.fill_buf(),
            IMAPStream::SSL(ref mut stream) => stream.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match *self {
            IMAPStream::Plain(ref mut stream) => stream.consume(amt),
            IMAPStream::SSL(ref mut stream) => stream.consume(amt),
        }
    }
}

/// Send one protocol line, terminated by CRLF.
pub fn write_line<W: Write>(stream: &mut W, line: &str) -> Result<(), Error> {
    stream.write_all(format!("{}\r\n", line).as_ref())?;
    stream.flush()
}
