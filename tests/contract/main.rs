mod backend;
mod common;
mod handshake;
