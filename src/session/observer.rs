use super::Sender;
use crate::error::Error;

/// Callbacks driven by [`Session::handle_next_frame`](super::Session::handle_next_frame).
///
/// Every callback runs on the reading thread and gets a [`Sender`],
/// so replies can be written from inside a callback.
/// `on_close` is called exactly once per session.
pub trait Observer {
    /// A complete text message.
    fn on_text(&mut self, sender: &Sender, text: String);

    /// A complete binary message.
    fn on_binary(&mut self, sender: &Sender, data: Vec<u8>);

    /// A pong, solicited or not.
    fn on_pong(&mut self, _sender: &Sender, _data: Vec<u8>) {}

    /// The session reached its closed state.
    ///
    /// `code` is 1005 if the peer closed without a status,
    /// 1006 if the connection ended without a close frame.
    fn on_close(&mut self, sender: &Sender, code: u16, reason: String);

    /// The session failed the connection, `on_close` follows.
    fn on_error(&mut self, _sender: &Sender, _err: &Error) {}
}
