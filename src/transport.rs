//! Duplex connection.
//!
//! A session reads from one handle on its own thread and writes through
//! a second handle from any thread, so the connection must be able to
//! hand out another handle to itself. Shutting down any handle must wake
//! up a reader blocked on another one.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// Byte-readable, byte-writable connection.
pub trait Transport: Read + Write + Send + 'static {
    /// Another handle to the same connection.
    fn try_clone(&self) -> io::Result<Self>
    where
        Self: Sized;

    /// Close both directions. A pending read on any handle returns promptly.
    fn shutdown(&self) -> io::Result<()>;
}

impl Transport for TcpStream {
    #[inline]
    fn try_clone(&self) -> io::Result<Self> { TcpStream::try_clone(self) }

    #[inline]
    fn shutdown(&self) -> io::Result<()> { TcpStream::shutdown(self, Shutdown::Both) }
}
