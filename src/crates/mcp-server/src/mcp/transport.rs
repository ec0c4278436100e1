use crate::error::Result;
use crate::mcp::{JsonRpcResponse, McpProtocol};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

/// Reads newline-delimited messages.
pub struct MessageReader<R> {
    lines: Lines<BufReader<R>>,
}

impl MessageReader<io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Next non-blank line, or `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

/// Writes one response per line. Clones share the underlying stream so
/// responses from concurrent tasks never interleave.
pub struct MessageWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for MessageWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MessageWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    pub async fn write_message(&self, response: &JsonRpcResponse) -> Result<()> {
        let mut buffer = McpProtocol::serialize(response)?;
        buffer.push('\n');

        let mut writer = self.inner.lock().await;
        writer.write_all(buffer.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}
