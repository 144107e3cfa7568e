//! Session engine for the Proover terminal client.
//!
//! Everything with non-trivial state lives here, UI-free:
//! - [`history`] - submitted-command ring with a navigation cursor
//! - [`transcript`] - append-only (command, response) record of the session
//! - [`client`] - HTTP dispatch and incremental UTF-8 stream decoding
//! - [`typeset`] - tolerant delimiter-based math typesetting
//! - [`session`] - the explicit session object tying the above together

pub mod client;
pub mod config;
pub mod history;
pub mod interrupt;
pub mod session;
pub mod transcript;
pub mod typeset;
