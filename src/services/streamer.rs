//! Timed wire output of stroke commands.

use raster_strokes::{CancellationToken, EmitOutcome, StrokeCommand};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Progress is logged every this many strokes
pub const PROGRESS_INTERVAL: usize = 50;

/// Write one wire frame per line, pausing `delay` after each.
///
/// The token is checked before every command; a cancelled stream stops
/// without writing anything further.
pub async fn stream_commands<W>(
    commands: &[StrokeCommand],
    writer: &mut W,
    delay: Duration,
    token: &CancellationToken,
) -> std::io::Result<EmitOutcome>
where
    W: AsyncWrite + Unpin,
{
    let total = commands.len();

    for (completed, command) in commands.iter().enumerate() {
        if token.is_cancelled() {
            writer.flush().await?;
            tracing::info!(completed, total, "Drawing stopped");
            return Ok(EmitOutcome::Cancelled { emitted: completed });
        }

        let mut line = command.to_wire();
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;

        let done = completed + 1;
        if done % PROGRESS_INTERVAL == 0 || done == total {
            writer.flush().await?;
            let percent = done as f64 * 100.0 / total as f64;
            tracing::info!(done, total, percent = %format!("{percent:.1}"), "Drawing progress");
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    writer.flush().await?;
    Ok(EmitOutcome::Completed { emitted: total })
}
