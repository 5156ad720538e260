//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server: one request per connection, bodies
//! framed only by `Content-Length`, no chunked encoding and no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one client stream through the state machine below
//! - **`parser`**: Reads header lines and a length-delimited body into a `Request`
//! - **`request`**: Request model with decoded query, cookie and form views
//! - **`cookie`**: `Cookie` / `Set-Cookie` codec and the session cookie key
//! - **`response`**: Response model with builder
//! - **`writer`**: Serializes and writes responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read header block and body
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Legacy query login or dispatcher
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, shut the stream down
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use warden::app::AppContext;
//! use warden::config::Config;
//! use warden::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = AppContext::from_config(&Config::default());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let context = context.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, context);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod cookie;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
