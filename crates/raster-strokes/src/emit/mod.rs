//! Handing commands to a drawing surface.

mod token;

pub use token::CancellationToken;

use std::convert::Infallible;
use std::io::Write;

use thiserror::Error;

use crate::output::StrokeCommand;

/// Anything that can draw a straight colored segment.
pub trait DrawingSurface {
    type Error: std::error::Error + Send + Sync + 'static;

    fn draw(&mut self, command: &StrokeCommand) -> Result<(), Self::Error>;
}

/// Collects commands in memory.
impl DrawingSurface for Vec<StrokeCommand> {
    type Error = Infallible;

    fn draw(&mut self, command: &StrokeCommand) -> Result<(), Self::Error> {
        self.push(command.clone());
        Ok(())
    }
}

/// Writes one wire frame per line.
#[derive(Debug)]
pub struct WireSurface<W> {
    writer: W,
}

impl<W: Write> WireSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DrawingSurface for WireSurface<W> {
    type Error = std::io::Error;

    fn draw(&mut self, command: &StrokeCommand) -> Result<(), Self::Error> {
        writeln!(self.writer, "{}", command.to_wire())
    }
}

/// How an emission run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    Completed { emitted: usize },
    Cancelled { emitted: usize },
}

impl EmitOutcome {
    pub fn emitted(&self) -> usize {
        match *self {
            Self::Completed { emitted } | Self::Cancelled { emitted } => emitted,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// The surface refused a command.
#[derive(Debug, Error)]
#[error("drawing surface failed at command {index}")]
pub struct EmitError {
    /// Position of the failed command; earlier ones were drawn.
    pub index: usize,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Draw `commands` in order, checking `token` before each one.
///
/// # Errors
///
/// Returns [`EmitError`] when the surface fails. Cancellation is not an
/// error and is reported as [`EmitOutcome::Cancelled`].
pub fn emit<S: DrawingSurface>(
    commands: &[StrokeCommand],
    surface: &mut S,
    token: &CancellationToken,
) -> Result<EmitOutcome, EmitError> {
    for (index, command) in commands.iter().enumerate() {
        if token.is_cancelled() {
            tracing::info!(emitted = index, total = commands.len(), "emission cancelled");
            return Ok(EmitOutcome::Cancelled { emitted: index });
        }
        surface.draw(command).map_err(|e| EmitError {
            index,
            source: Box::new(e),
        })?;
    }
    Ok(EmitOutcome::Completed {
        emitted: commands.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Orientation;

    fn commands(n: usize) -> Vec<StrokeCommand> {
        (0..n)
            .map(|i| StrokeCommand {
                color: "#123456".into(),
                x1: 0.0,
                y1: i as f64 / 10.0,
                x2: 1.0,
                y2: i as f64 / 10.0,
                orientation: Orientation::RunPrimary,
            })
            .collect()
    }

    /// Cancels its token after a fixed number of draws.
    struct Interrupting {
        token: CancellationToken,
        after: usize,
        drawn: usize,
    }

    impl DrawingSurface for Interrupting {
        type Error = Infallible;

        fn draw(&mut self, _command: &StrokeCommand) -> Result<(), Self::Error> {
            self.drawn += 1;
            if self.drawn == self.after {
                self.token.cancel();
            }
            Ok(())
        }
    }

    struct Failing;

    impl DrawingSurface for Failing {
        type Error = std::io::Error;

        fn draw(&mut self, _command: &StrokeCommand) -> Result<(), Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_emit_all() {
        let mut sink: Vec<StrokeCommand> = Vec::new();
        let outcome = emit(&commands(3), &mut sink, &CancellationToken::new()).unwrap();
        assert_eq!(outcome, EmitOutcome::Completed { emitted: 3 });
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_cancel_stops_at_boundary() {
        let token = CancellationToken::new();
        let mut surface = Interrupting {
            token: token.clone(),
            after: 2,
            drawn: 0,
        };
        let outcome = emit(&commands(5), &mut surface, &token).unwrap();
        assert_eq!(outcome, EmitOutcome::Cancelled { emitted: 2 });
        assert_eq!(surface.drawn, 2);
    }

    #[test]
    fn test_pre_cancelled_token_draws_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut sink: Vec<StrokeCommand> = Vec::new();
        let outcome = emit(&commands(2), &mut sink, &token).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.emitted(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_surface_error_reports_index() {
        let err = emit(&commands(2), &mut Failing, &CancellationToken::new()).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.to_string(), "drawing surface failed at command 0");
    }

    #[test]
    fn test_wire_surface_writes_lines() {
        let mut surface = WireSurface::new(Vec::new());
        emit(&commands(2), &mut surface, &CancellationToken::new()).unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(r#"42["drawcmd",0,[0.000000,0.100000,1.000000,0.100000"#));
    }
}
