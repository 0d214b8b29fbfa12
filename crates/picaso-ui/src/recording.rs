//! In-memory surface that records every command.

use crate::surface::Surface;
use picaso_hw::{Colour, PanelState, Point, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RectangleFilled(Point, Point, Colour),
    Panel(PanelState, Point, u16, u16, Colour),
    MoveTo(Point),
    PutStr(String),
    TextFgColour(Colour),
    TextWidth(u16),
    TextHeight(u16),
    CharWidth(u8),
    CharHeight(u8),
}

/// Records calls and reports a fixed character cell size.
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub char_size: (u16, u16),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            char_size: (8, 12),
        }
    }

    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn fills(&self) -> Vec<(Point, Point, Colour)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::RectangleFilled(a, b, c) => Some((*a, *b, *c)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }
}

impl Surface for RecordingSurface {
    fn rectangle_filled(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        colour: Colour,
    ) -> Result<()> {
        self.calls
            .push(Call::RectangleFilled(top_left, bottom_right, colour));
        Ok(())
    }

    fn panel(
        &mut self,
        state: PanelState,
        origin: Point,
        width: u16,
        height: u16,
        colour: Colour,
    ) -> Result<()> {
        self.calls
            .push(Call::Panel(state, origin, width, height, colour));
        Ok(())
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        self.calls.push(Call::MoveTo(point));
        Ok(())
    }

    fn put_str(&mut self, text: &str) -> Result<u16> {
        self.calls.push(Call::PutStr(text.to_string()));
        Ok(text.len() as u16)
    }

    fn text_fg_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.calls.push(Call::TextFgColour(colour));
        Ok(0)
    }

    fn text_width(&mut self, multiplier: u16) -> Result<u16> {
        self.calls.push(Call::TextWidth(multiplier));
        Ok(1)
    }

    fn text_height(&mut self, multiplier: u16) -> Result<u16> {
        self.calls.push(Call::TextHeight(multiplier));
        Ok(1)
    }

    fn char_width(&mut self, character: u8) -> Result<u16> {
        self.calls.push(Call::CharWidth(character));
        Ok(self.char_size.0)
    }

    fn char_height(&mut self, character: u8) -> Result<u16> {
        self.calls.push(Call::CharHeight(character));
        Ok(self.char_size.1)
    }
}
