//! Lanyard socket client.
//!
//! Owns one WebSocket subscription for one subject: sends the subscribe
//! frame on open, heartbeats at the cadence the server announces, and
//! reconnects after a fixed delay whenever the connection drops without
//! a closing handshake. Decoded snapshots and link changes are emitted
//! as [`StreamEvent`]s.

mod client;
mod connection;
mod handler;
mod heartbeat;
mod types;

#[cfg(test)]
mod tests;

pub use client::StreamClient;
pub use types::{LinkState, StreamConfig, StreamEvent, DEFAULT_STREAM_URL};
