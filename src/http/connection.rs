use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::app::AppContext;
use crate::http::parser::{ParseError, read_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Serves exactly one request on a client stream.
pub struct Connection<S> {
    stream: BufReader<S>,
    context: AppContext,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, context: AppContext) -> Self {
        Self {
            stream: BufReader::new(stream),
            context,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. The stream is released when the
    /// connection is dropped, whichever way this returns.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(request) => {
                        tracing::debug!(
                            method = ?request.method,
                            path = %request.path,
                            "Request parsed"
                        );
                        self.state = ConnectionState::Processing(request);
                    }

                    Err(e) => {
                        if e.is_client_error() {
                            self.reject().await;
                        }
                        return Err(anyhow::anyhow!("HTTP parse error: {}", e));
                    }
                },

                ConnectionState::Processing(request) => {
                    let path = request.path.clone();
                    let context = self.context.clone();
                    let response =
                        tokio::task::spawn_blocking(move || context.serve(&request)).await??;

                    tracing::debug!(
                        path = %path,
                        status = response.status.as_u16(),
                        "Response ready"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        let limits = self.context.limits();

        tokio::time::timeout(
            limits.read_timeout,
            read_request(&mut self.stream, limits.max_header_bytes, limits.max_body_bytes),
        )
        .await
        .map_err(|_| ParseError::TimedOut)?
    }

    /// Sends the 400 page for a request that could not be parsed.
    async fn reject(&mut self) {
        let context = self.context.clone();
        let response = match tokio::task::spawn_blocking(move || context.malformed_response()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build 400 response");
                return;
            }
        };

        if let Err(e) = ResponseWriter::new(&response)
            .write_to_stream(&mut self.stream)
            .await
        {
            tracing::debug!(error = %e, "Failed to send 400 response");
        }
    }
}
