//! Realtime room channel.
//!
//! The backend pushes `newMessage` and `participantUpdate` over a socket.
//! `LoopbackTransport` plays both ends in-process and delivers those pushes
//! as domain events on the event bus.

mod loopback;

pub use loopback::LoopbackTransport;
