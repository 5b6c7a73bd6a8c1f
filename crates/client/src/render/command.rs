//! Subprocess renderer.
//!
//! Runs a configured program that renders a page and writes the resulting
//! HTML to stdout. The child is killed when the time budget runs out, when the
//! output cap is hit, or when the request future is dropped.

use std::process::Stdio;
use std::time::Instant;

use quire_core::AppConfig;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::{RenderError, RenderRequest, RenderedPage, Renderer};

const URL_PLACEHOLDER: &str = "{url}";
const STDERR_LIMIT: usize = 16 * 1024;

/// Renders pages by invoking an external program.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Create a renderer for `program`; every `{url}` in `args` is substituted per request.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.render_command.clone(), config.render_args.clone())
    }

    fn args_for(&self, request: &RenderRequest) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(URL_PLACEHOLDER, request.url.as_str()))
            .collect()
    }

    async fn run(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .args(self.args_for(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::Launch(format!("{}: {}", self.program, e)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| RenderError::Process("stdout was not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RenderError::Process("stderr was not captured".into()))?;

        // An oversized stdout aborts immediately instead of waiting on stderr.
        let (html, diagnostics) =
            tokio::try_join!(read_bounded(&mut stdout, request.max_bytes), read_diagnostics(&mut stderr))?;

        let status = child
            .wait()
            .await
            .map_err(|e| RenderError::Process(format!("failed to wait for {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(RenderError::Process(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                String::from_utf8_lossy(&diagnostics).trim()
            )));
        }

        Ok(html)
    }
}

/// Read `reader` to the end, failing once more than `limit` bytes arrive.
async fn read_bounded<R>(reader: &mut R, limit: usize) -> Result<Vec<u8>, RenderError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|e| RenderError::Process(format!("failed to read output: {}", e)))?;
        if n == 0 {
            return Ok(buf);
        }
        if buf.len() + n > limit {
            return Err(RenderError::BufferExceeded(limit));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Keep the first `STDERR_LIMIT` bytes of stderr and drain the rest.
async fn read_diagnostics<R>(reader: &mut R) -> Result<Vec<u8>, RenderError>
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    let mut chunk = [0u8; 4096];

    while let Ok(n) = reader.read(&mut chunk).await {
        if n == 0 {
            break;
        }
        let room = STDERR_LIMIT.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..n.min(room)]);
    }

    Ok(kept)
}

#[async_trait::async_trait]
impl Renderer for CommandRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, RenderError> {
        let start = Instant::now();
        tracing::debug!(program = %self.program, url = %request.url, "rendering with external command");

        // Dropping the `run` future on timeout drops the child, which kills it.
        let bytes = tokio::time::timeout(request.timeout, self.run(request))
            .await
            .map_err(|_| RenderError::Timeout(request.timeout_ms()))??;

        let html = String::from_utf8(bytes).map_err(|e| RenderError::Process(format!("output is not UTF-8: {}", e)))?;
        if html.trim().is_empty() {
            return Err(RenderError::Process(format!("{} produced no output", self.program)));
        }

        let render_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(url = %request.url, render_time_ms, bytes = html.len(), "render finished");

        Ok(RenderedPage { html, final_url: request.url.clone(), render_time_ms })
    }
}
