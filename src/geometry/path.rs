use crate::error::{OperationError, Result};

use super::{Coord, Curve};

/// One command of a path stream, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    MoveTo(Coord),
    LineTo(Coord),
    QuadTo(Coord, Coord),
    CubicTo(Coord, Coord, Coord),
    ClosePath,
}

/// Accumulates path commands and converts them into curves.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, to: Coord) -> Self {
        self.commands.push(PathCommand::MoveTo(to));
        self
    }

    #[must_use]
    pub fn line_to(mut self, to: Coord) -> Self {
        self.commands.push(PathCommand::LineTo(to));
        self
    }

    #[must_use]
    pub fn quad_to(mut self, control: Coord, to: Coord) -> Self {
        self.commands.push(PathCommand::QuadTo(control, to));
        self
    }

    #[must_use]
    pub fn cubic_to(mut self, control0: Coord, control1: Coord, to: Coord) -> Self {
        self.commands.push(PathCommand::CubicTo(control0, control1, to));
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::ClosePath);
        self
    }

    /// The accumulated commands.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Converts the accumulated commands into curves.
    ///
    /// # Errors
    ///
    /// See [`curves_from_commands`].
    pub fn build(&self) -> Result<Vec<Curve>> {
        curves_from_commands(&self.commands)
    }
}

/// Converts a command stream into its curve segments.
///
/// `ClosePath` adds a closing line back to the subpath start unless the
/// pen is already there. Consecutive `MoveTo`s simply move the pen.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if a drawing command appears
/// before the first `MoveTo`.
pub fn curves_from_commands(commands: &[PathCommand]) -> Result<Vec<Curve>> {
    let mut curves = Vec::new();
    let mut pen: Option<Coord> = None;
    let mut subpath_start: Option<Coord> = None;

    for (index, command) in commands.iter().enumerate() {
        if let PathCommand::MoveTo(to) = *command {
            pen = Some(to);
            subpath_start = Some(to);
            continue;
        }
        let (Some(from), Some(origin)) = (pen, subpath_start) else {
            return Err(OperationError::InvalidInput(format!(
                "path command {index} ({command:?}) precedes the first MoveTo"
            ))
            .into());
        };
        let to = match *command {
            PathCommand::LineTo(to) => {
                curves.push(Curve::line(from, to));
                to
            }
            PathCommand::QuadTo(k, to) => {
                curves.push(Curve::quadratic(from, k, to));
                to
            }
            PathCommand::CubicTo(k0, k1, to) => {
                curves.push(Curve::cubic(from, k0, k1, to));
                to
            }
            PathCommand::ClosePath | PathCommand::MoveTo(_) => {
                if from != origin {
                    curves.push(Curve::line(from, origin));
                }
                origin
            }
        };
        pen = Some(to);
    }
    Ok(curves)
}

/// Converts a chain of curves into commands, starting new subpaths wherever
/// consecutive curves do not meet. Point curves emit only a `MoveTo`.
#[must_use]
pub fn commands_from_curves(curves: &[Curve], close: bool) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(curves.len() + 2);
    let mut pen: Option<Coord> = None;
    for curve in curves {
        if pen != Some(curve.start()) {
            commands.push(PathCommand::MoveTo(curve.start()));
        }
        commands.extend(curve.to_path_command());
        pen = Some(curve.end());
    }
    if close && !commands.is_empty() {
        commands.push(PathCommand::ClosePath);
    }
    commands
}

impl Curve {
    /// The drawing command that continues a path along this curve from its
    /// start, or `None` for a point.
    #[must_use]
    pub fn to_path_command(&self) -> Option<PathCommand> {
        match *self {
            Self::Point(_) => None,
            Self::Line([_, b]) => Some(PathCommand::LineTo(b)),
            Self::Quadratic([_, k, b]) => Some(PathCommand::QuadTo(k, b)),
            Self::Cubic([_, k0, k1, b]) => Some(PathCommand::CubicTo(k0, k1, b)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn builder_produces_curves() {
        let curves = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(100, 0))
            .quad_to(c(150, 50), c(100, 100))
            .cubic_to(c(50, 150), c(0, 150), c(0, 100))
            .close()
            .build()
            .unwrap();
        assert_eq!(curves.len(), 4);
        assert_eq!(curves[0], Curve::line(c(0, 0), c(100, 0)));
        assert_eq!(curves[1].degree(), 2);
        assert_eq!(curves[2].degree(), 3);
        assert_eq!(curves[3], Curve::line(c(0, 100), c(0, 0)));
    }

    #[test]
    fn close_at_origin_adds_nothing() {
        let curves = PathBuilder::new()
            .move_to(c(0, 0))
            .line_to(c(10, 0))
            .line_to(c(0, 0))
            .close()
            .build()
            .unwrap();
        assert_eq!(curves.len(), 2);
    }

    #[test]
    fn drawing_before_move_is_rejected() {
        assert!(curves_from_commands(&[PathCommand::LineTo(c(1, 1))]).is_err());
        assert!(curves_from_commands(&[PathCommand::ClosePath]).is_err());
    }

    #[test]
    fn curves_round_trip_through_commands() {
        let curves = vec![
            Curve::line(c(0, 0), c(10, 0)),
            Curve::quadratic(c(10, 0), c(20, 10), c(10, 20)),
            Curve::line(c(50, 50), c(60, 50)),
        ];
        let commands = commands_from_curves(&curves, false);
        assert_eq!(commands[0], PathCommand::MoveTo(c(0, 0)));
        assert_eq!(commands[3], PathCommand::MoveTo(c(50, 50)));
        assert_eq!(curves_from_commands(&commands).unwrap(), curves);
    }
}
