//! Line-protocol session with the engine
//!
//! The engine reads one command per line on stdin and answers on stdout.
//! Every write is flushed before returning: the driver never queues a
//! command the engine cannot see yet.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::common::{Error, Result};

/// Ordered command/response stream pair
///
/// Generic over the transport so the dispatch loop can be exercised
/// against in-memory buffers.
pub struct Session<W, R> {
    writer: W,
    reader: R,
    reset_command: String,
}

impl<W, R> Session<W, R>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    pub fn new(writer: W, reader: R, reset_command: impl Into<String>) -> Self {
        Self {
            writer,
            reader,
            reset_command: reset_command.into(),
        }
    }

    /// Forward one fixture command, terminated by exactly one newline
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        tracing::debug!("engine <<< {}", command);
        write_line(&mut self.writer, command).await
    }

    /// Send the board reset directive
    pub async fn send_reset(&mut self) -> Result<()> {
        tracing::debug!("engine <<< {} (reset)", self.reset_command);
        write_line(&mut self.writer, &self.reset_command).await
    }

    /// Next line of engine output without its terminator, `None` at EOF
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let Some(line) = read_text_line(&mut self.reader).await? else {
            return Ok(None);
        };
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Give back the transport halves
    pub fn into_parts(self) -> (W, R) {
        (self.writer, self.reader)
    }
}

/// Read one line, terminator included, `None` at EOF
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// garbled line is just another line.
pub(crate) async fn read_text_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Option<String>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Session over a spawned engine's stdio
pub type EngineSession = Session<BufWriter<ChildStdin>, BufReader<ChildStdout>>;

/// The single engine child process of a run
pub struct EngineProcess {
    child: Child,
    session: EngineSession,
}

impl EngineProcess {
    /// Spawn the engine with piped stdin/stdout and inherited stderr
    ///
    /// The child is killed if the process handle is dropped without
    /// [`EngineProcess::shutdown`].
    pub fn spawn(binary: &Path, args: &[String], reset_command: &str) -> Result<Self> {
        let mut cmd = Command::new(binary);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            Error::EngineStartFailed(format!("Failed to start {}: {}", binary.display(), e))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::EngineStartFailed("Failed to get engine stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::EngineStartFailed("Failed to get engine stdout".to_string()))?;

        tracing::info!("Started engine {} (pid {:?})", binary.display(), child.id());

        Ok(Self {
            child,
            session: Session::new(BufWriter::new(stdin), BufReader::new(stdout), reset_command),
        })
    }

    pub fn session(&mut self) -> &mut EngineSession {
        &mut self.session
    }

    /// Close the engine's input and wait for it to exit, killing it after `grace`
    pub async fn shutdown(self, grace: Duration) -> Result<()> {
        let Self { mut child, session } = self;
        let (mut writer, reader) = session.into_parts();
        // A broken pipe here only means the engine already exited.
        let _ = writer.shutdown().await;
        drop(writer);
        drop(reader);

        match tokio::time::timeout(grace, child.wait()).await {
            Ok(status) => {
                let status = status?;
                tracing::debug!("Engine exited with {}", status);
            }
            Err(_) => {
                tracing::warn!(
                    "Engine still running {} seconds after its input closed, killing it",
                    grace.as_secs()
                );
                child.kill().await?;
            }
        }
        Ok(())
    }
}
