//! Warden - minimal HTTP/1.1 login server
//!
//! Core library for request parsing, routing, session handling and
//! response serialization.

pub mod app;
pub mod auth;
pub mod config;
pub mod http;
pub mod routing;
pub mod server;
pub mod static_files;
