//! Socket accept loop.

pub mod listener;
