use std::io::BufReader;

use log::debug;

use super::Endpoint;

use crate::http::{HttpReader, Request};
use crate::handshake::{validate_request, switching_protocols, bad_request};
use crate::session::{Session, Observer};
use crate::transport::Transport;
use crate::role::ServerRole;
use crate::config::Config;
use crate::error::{Error, HandshakeError};

impl<IO: Transport, Role: ServerRole> Endpoint<IO, Role> {
    /// Perform the server handshake, return a new websocket session.
    /// It will block until the handshake completes, or an error occurs.
    pub fn accept<O: Observer>(io: IO, observer: O) -> Result<Session<IO, Role, O>, Error> {
        Self::accept_with_config(io, observer, Config::new())
    }

    /// [`accept`](Self::accept) with custom limits.
    pub fn accept_with_config<O: Observer>(
        io: IO,
        observer: O,
        config: Config,
    ) -> Result<Session<IO, Role, O>, Error> {
        Self::accept_request(io, observer, config).map(|(session, _)| session)
    }

    /// Like [`accept_with_config`](Self::accept_with_config), also return
    /// the upgrade request, e.g. to look at its path or cookies.
    ///
    /// A request that can not be upgraded is answered with
    /// `400 Bad Request` before the error is returned.
    pub fn accept_request<O: Observer>(
        io: IO,
        observer: O,
        config: Config,
    ) -> Result<(Session<IO, Role, O>, Request), Error> {
        let mut writer = io.try_clone()?;
        let mut reader =
            HttpReader::with_config(BufReader::with_capacity(config.read_buffer_size, io), config);

        let request = match reader.read_request()? {
            Some(request) => request,
            None => return Err(HandshakeError::ConnectionClosed.into()),
        };

        let sec_key = match validate_request(&request) {
            Ok(key) => key,
            Err(e) => {
                debug!("upgrade rejected: {}", e);
                bad_request().encode(&mut writer)?;
                writer.flush()?;
                return Err(e.into());
            }
        };

        // an upgrade request should not carry a body
        reader.finish_body()?;

        switching_protocols(sec_key).encode(&mut writer)?;
        writer.flush()?;

        debug!("upgrade accepted: {}", request.target);

        let session = Session::from_buffered(reader.into_inner(), observer, config)?;
        Ok((session, request))
    }
}
