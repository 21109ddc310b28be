//! Collects skrifa outline callbacks into [`PathCommand`]s

use skrifa::outline::OutlinePen;
use typa_core::path::PathCommand;
use typa_core::types::Point;

#[derive(Debug, Default)]
pub(crate) struct CommandPen {
    commands: Vec<PathCommand>,
}

impl CommandPen {
    pub(crate) fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }
}

fn pt(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

impl OutlinePen for CommandPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo(pt(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo(pt(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::QuadTo(pt(cx0, cy0), pt(x, y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands
            .push(PathCommand::CubicTo(pt(cx0, cy0), pt(cx1, cy1), pt(x, y)));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}
