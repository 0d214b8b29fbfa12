//! Drawing surface used by widgets.
//!
//! Widgets only need a handful of display commands. Keeping them behind a
//! trait lets the tree be drawn onto a recording surface in tests.

use picaso_hw::{Colour, Display, PanelState, Point, Result, SerialChannel};

/// The display commands a widget tree issues while laying out and painting.
pub trait Surface {
    fn rectangle_filled(&mut self, top_left: Point, bottom_right: Point, colour: Colour)
        -> Result<()>;

    fn panel(
        &mut self,
        state: PanelState,
        origin: Point,
        width: u16,
        height: u16,
        colour: Colour,
    ) -> Result<()>;

    fn move_to(&mut self, point: Point) -> Result<()>;

    fn put_str(&mut self, text: &str) -> Result<u16>;

    fn text_fg_colour(&mut self, colour: Colour) -> Result<Colour>;

    fn text_width(&mut self, multiplier: u16) -> Result<u16>;

    fn text_height(&mut self, multiplier: u16) -> Result<u16>;

    fn char_width(&mut self, character: u8) -> Result<u16>;

    fn char_height(&mut self, character: u8) -> Result<u16>;
}

impl<C: SerialChannel> Surface for Display<C> {
    fn rectangle_filled(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        colour: Colour,
    ) -> Result<()> {
        Display::rectangle_filled(self, top_left, bottom_right, colour)
    }

    fn panel(
        &mut self,
        state: PanelState,
        origin: Point,
        width: u16,
        height: u16,
        colour: Colour,
    ) -> Result<()> {
        Display::panel(self, state, origin, width, height, colour)
    }

    fn move_to(&mut self, point: Point) -> Result<()> {
        Display::move_to(self, point)
    }

    fn put_str(&mut self, text: &str) -> Result<u16> {
        Display::put_str(self, text)
    }

    fn text_fg_colour(&mut self, colour: Colour) -> Result<Colour> {
        Display::text_fg_colour(self, colour)
    }

    fn text_width(&mut self, multiplier: u16) -> Result<u16> {
        Display::text_width(self, multiplier)
    }

    fn text_height(&mut self, multiplier: u16) -> Result<u16> {
        Display::text_height(self, multiplier)
    }

    fn char_width(&mut self, character: u8) -> Result<u16> {
        Display::char_width(self, character)
    }

    fn char_height(&mut self, character: u8) -> Result<u16> {
        Display::char_height(self, character)
    }
}
