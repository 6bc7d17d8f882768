//! Infrastructure layer: the one adapter this repo ships — the HTTP
//! surface described in §6/§15.

pub mod http;
