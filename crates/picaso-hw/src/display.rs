//! Display module command set.
//!
//! Each method encodes one command, runs it through the [`Link`] and decodes
//! the response the command is documented to return. Arguments are validated
//! before anything is written.

use crate::baud::BaudNegotiator;
use crate::channel::{NativeChannel, SerialChannel};
use crate::colour::Colour;
use crate::link::Link;
use crate::protocol::{Frame, Opcode, ResponseShape, MAX_STRING_LEN};
use crate::screen_mode::ScreenMode;
use crate::types::{
    ButtonState, GfxQuery, GfxSetting, PanelState, Point, SliderMode, TextAttributes, TouchMode,
    TouchQuery, TouchStatus,
};
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Display module controller.
pub struct Display<C> {
    link: Link<C>,
    negotiator: BaudNegotiator,
    screen_mode: ScreenMode,
}

impl Display<NativeChannel> {
    /// Opens the serial port and connects to the module.
    pub fn connect(port: &str, rate: u32) -> Result<Self> {
        Ok(Self::new(Link::connect(port, rate)?))
    }
}

impl<C: SerialChannel> Display<C> {
    /// Wraps an open link.
    pub fn new(link: Link<C>) -> Self {
        Self {
            link,
            negotiator: BaudNegotiator::new(),
            screen_mode: ScreenMode::default(),
        }
    }

    /// Overrides the per-read bound used while probing baud rates.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.negotiator = self.negotiator.with_probe_timeout(timeout);
        self
    }

    /// Returns the underlying link.
    pub fn link(&self) -> &Link<C> {
        &self.link
    }

    /// Returns the underlying link mutably.
    pub fn link_mut(&mut self) -> &mut Link<C> {
        &mut self.link
    }

    /// Returns the last screen mode set through this handle.
    pub fn current_screen_mode(&self) -> ScreenMode {
        self.screen_mode
    }

    /// Returns the display dimensions for the current screen mode.
    pub fn dimensions(&self) -> (u16, u16) {
        self.screen_mode.dimensions()
    }

    fn ack(&mut self, frame: Frame) -> Result<()> {
        self.link.execute(&frame, ResponseShape::Ack)?;
        Ok(())
    }

    fn word(&mut self, frame: Frame) -> Result<u16> {
        self.link.execute(&frame, ResponseShape::Word)?.into_word()
    }

    // Text and string commands

    /// Moves the text cursor to a line and column.
    pub fn move_cursor(&mut self, line: u16, column: u16) -> Result<()> {
        self.ack(Frame::new(Opcode::MoveCursor).words(&[line, column]))
    }

    /// Prints one character at the cursor.
    pub fn put_char(&mut self, character: u8) -> Result<()> {
        self.ack(Frame::new(Opcode::PutChar).word(character as u16))
    }

    /// Prints a string at the cursor, returning the number of characters
    /// printed. Strings longer than 511 bytes are truncated.
    pub fn put_str(&mut self, text: &str) -> Result<u16> {
        let bytes = text.as_bytes();
        let bytes = &bytes[..bytes.len().min(MAX_STRING_LEN)];
        if bytes.contains(&0) {
            return Err(Error::invalid("string contains a NUL byte"));
        }
        self.word(Frame::new(Opcode::PutStr).text(bytes))
    }

    /// Returns the pixel width of a character in the current font.
    pub fn char_width(&mut self, character: u8) -> Result<u16> {
        self.word(Frame::new(Opcode::CharWidth).byte(character))
    }

    /// Returns the pixel height of a character in the current font.
    pub fn char_height(&mut self, character: u8) -> Result<u16> {
        self.word(Frame::new(Opcode::CharHeight).byte(character))
    }

    /// Sets the text foreground colour, returning the previous one.
    pub fn text_fg_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.word(Frame::new(Opcode::TextFgColour).word(colour))
    }

    /// Sets the text background colour, returning the previous one.
    pub fn text_bg_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.word(Frame::new(Opcode::TextBgColour).word(colour))
    }

    /// Selects a font, returning the previous font id.
    pub fn text_font(&mut self, id: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::TextFontId).word(id))
    }

    /// Sets the text width multiplier, returning the previous one.
    pub fn text_width(&mut self, multiplier: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::TextWidth).word(multiplier))
    }

    /// Sets the text height multiplier, returning the previous one.
    pub fn text_height(&mut self, multiplier: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::TextHeight).word(multiplier))
    }

    /// Sets the horizontal gap between characters.
    pub fn text_x_gap(&mut self, pixels: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::TextXGap).word(pixels))
    }

    /// Sets the vertical gap between lines.
    pub fn text_y_gap(&mut self, pixels: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::TextYGap).word(pixels))
    }

    fn text_flag(&mut self, opcode: Opcode, on: bool) -> Result<bool> {
        Ok(self.word(Frame::new(opcode).word(on as u16))? != 0)
    }

    pub fn text_bold(&mut self, on: bool) -> Result<bool> {
        self.text_flag(Opcode::TextBold, on)
    }

    pub fn text_inverse(&mut self, on: bool) -> Result<bool> {
        self.text_flag(Opcode::TextInverse, on)
    }

    pub fn text_italic(&mut self, on: bool) -> Result<bool> {
        self.text_flag(Opcode::TextItalic, on)
    }

    pub fn text_opacity(&mut self, opaque: bool) -> Result<bool> {
        self.text_flag(Opcode::TextOpacity, opaque)
    }

    pub fn text_underline(&mut self, on: bool) -> Result<bool> {
        self.text_flag(Opcode::TextUnderline, on)
    }

    /// Sets several text attributes at once, returning the previous set.
    pub fn text_attributes(&mut self, attributes: TextAttributes) -> Result<TextAttributes> {
        let previous = self.word(Frame::new(Opcode::TextAttributes).word(attributes.bits()))?;
        Ok(TextAttributes::from_bits_truncate(previous))
    }

    // Graphics commands

    /// Clears the screen to the background colour.
    pub fn cls(&mut self) -> Result<()> {
        self.ack(Frame::new(Opcode::ClearScreen))
    }

    /// Replaces every pixel of one colour with another.
    pub fn change_colour(&mut self, old: Colour, new: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::ChangeColour).words(&[old, new]))
    }

    pub fn circle(&mut self, centre: Point, radius: u16, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::Circle).words(&[centre.x, centre.y, radius, colour]))
    }

    pub fn circle_filled(&mut self, centre: Point, radius: u16, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::CircleFilled).words(&[centre.x, centre.y, radius, colour]))
    }

    pub fn line(&mut self, from: Point, to: Point, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::Line).words(&[from.x, from.y, to.x, to.y, colour]))
    }

    pub fn rectangle(&mut self, top_left: Point, bottom_right: Point, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::Rectangle).words(&[
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            colour,
        ]))
    }

    pub fn rectangle_filled(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        colour: Colour,
    ) -> Result<()> {
        self.ack(Frame::new(Opcode::RectangleFilled).words(&[
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            colour,
        ]))
    }

    fn vertices(opcode: Opcode, points: &[Point], colour: Colour) -> Frame {
        let xs: Vec<u16> = points.iter().map(|p| p.x).collect();
        let ys: Vec<u16> = points.iter().map(|p| p.y).collect();
        Frame::new(opcode)
            .word(points.len() as u16)
            .words(&xs)
            .words(&ys)
            .word(colour)
    }

    fn check_vertices(name: &str, points: &[Point], min: usize) -> Result<()> {
        if points.len() < min {
            return Err(Error::invalid(format!(
                "{} needs at least {} points, got {}",
                name,
                min,
                points.len()
            )));
        }
        if points.len() > u16::MAX as usize {
            return Err(Error::invalid(format!("{} has too many points", name)));
        }
        Ok(())
    }

    /// Draws connected line segments through the points.
    pub fn polyline(&mut self, colour: Colour, points: &[Point]) -> Result<()> {
        Self::check_vertices("polyline", points, 2)?;
        self.ack(Self::vertices(Opcode::Polyline, points, colour))
    }

    /// Draws a closed polygon outline.
    pub fn polygon(&mut self, colour: Colour, points: &[Point]) -> Result<()> {
        Self::check_vertices("polygon", points, 3)?;
        self.ack(Self::vertices(Opcode::Polygon, points, colour))
    }

    /// Draws a filled polygon.
    pub fn polygon_filled(&mut self, colour: Colour, points: &[Point]) -> Result<()> {
        Self::check_vertices("filled polygon", points, 3)?;
        self.ack(Self::vertices(Opcode::PolygonFilled, points, colour))
    }

    pub fn triangle(&mut self, a: Point, b: Point, c: Point, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::Triangle).words(&[a.x, a.y, b.x, b.y, c.x, c.y, colour]))
    }

    pub fn triangle_filled(&mut self, a: Point, b: Point, c: Point, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::TriangleFilled).words(&[a.x, a.y, b.x, b.y, c.x, c.y, colour]))
    }

    /// Computes the point at `angle` and `distance` from the current origin.
    pub fn orbit(&mut self, angle: u16, distance: u16) -> Result<Point> {
        let (x, y) = self
            .link
            .execute(
                &Frame::new(Opcode::Orbit).words(&[angle, distance]),
                ResponseShape::WordPair,
            )?
            .into_word_pair()?;
        Ok(Point::new(x, y))
    }

    pub fn put_pixel(&mut self, point: Point, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::PutPixel).words(&[point.x, point.y, colour]))
    }

    pub fn get_pixel(&mut self, point: Point) -> Result<Colour> {
        self.word(Frame::new(Opcode::GetPixel).words(&[point.x, point.y]))
    }

    /// Moves the graphics origin.
    pub fn move_to(&mut self, point: Point) -> Result<()> {
        self.ack(Frame::new(Opcode::MoveTo).words(&[point.x, point.y]))
    }

    /// Draws a line from the origin, moving the origin to its end.
    pub fn line_to(&mut self, point: Point) -> Result<()> {
        self.ack(Frame::new(Opcode::LineTo).words(&[point.x, point.y]))
    }

    pub fn clipping(&mut self, enable: bool) -> Result<()> {
        self.ack(Frame::new(Opcode::Clipping).word(enable as u16))
    }

    pub fn clip_window(&mut self, top_left: Point, bottom_right: Point) -> Result<()> {
        self.ack(Frame::new(Opcode::ClipWindow).words(&[
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
        ]))
    }

    /// Forces the clip region to the extent of the last text or image.
    pub fn set_clip_region(&mut self) -> Result<()> {
        self.ack(Frame::new(Opcode::SetClipRegion))
    }

    pub fn ellipse(&mut self, centre: Point, x_radius: u16, y_radius: u16, colour: Colour) -> Result<()> {
        self.ack(Frame::new(Opcode::Ellipse).words(&[centre.x, centre.y, x_radius, y_radius, colour]))
    }

    pub fn ellipse_filled(
        &mut self,
        centre: Point,
        x_radius: u16,
        y_radius: u16,
        colour: Colour,
    ) -> Result<()> {
        self.ack(
            Frame::new(Opcode::EllipseFilled).words(&[centre.x, centre.y, x_radius, y_radius, colour]),
        )
    }

    /// Draws a labelled button.
    #[allow(clippy::too_many_arguments)]
    pub fn button(
        &mut self,
        state: ButtonState,
        origin: Point,
        button_colour: Colour,
        text_colour: Colour,
        font: u16,
        text_width: u16,
        text_height: u16,
        text: &str,
    ) -> Result<()> {
        if text_width < 1 {
            return Err(Error::invalid("text width must be at least 1"));
        }
        if text_height < 1 {
            return Err(Error::invalid("text height must be at least 1"));
        }
        if text.as_bytes().contains(&0) {
            return Err(Error::invalid("button label contains a NUL byte"));
        }
        self.ack(
            Frame::new(Opcode::Button)
                .words(&[
                    state as u16,
                    origin.x,
                    origin.y,
                    button_colour,
                    text_colour,
                    font,
                    text_width,
                    text_height,
                ])
                .text(text.as_bytes()),
        )
    }

    /// Draws a raised or recessed panel.
    pub fn panel(
        &mut self,
        state: PanelState,
        origin: Point,
        width: u16,
        height: u16,
        colour: Colour,
    ) -> Result<()> {
        self.ack(Frame::new(Opcode::Panel).words(&[
            state as u16,
            origin.x,
            origin.y,
            width,
            height,
            colour,
        ]))
    }

    /// Draws a slider, returning the screen position of the thumb centre.
    ///
    /// The module answers with a word here even though only an ACK is
    /// documented.
    pub fn slider(
        &mut self,
        mode: SliderMode,
        top_left: Point,
        bottom_right: Point,
        colour: Colour,
        scale: u16,
        value: u16,
    ) -> Result<u16> {
        self.word(Frame::new(Opcode::Slider).words(&[
            mode as u16,
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            colour,
            scale,
            value,
        ]))
    }

    /// Copies a screen region to another position.
    pub fn screen_copy_paste(
        &mut self,
        source: Point,
        dest: Point,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.ack(Frame::new(Opcode::ScreenCopyPaste).words(&[
            source.x, source.y, dest.x, dest.y, width, height,
        ]))
    }

    /// Sets the button bevel shadow depth (0-4), returning the previous one.
    pub fn bevel_shadow(&mut self, shadow: u16) -> Result<u16> {
        if shadow > 4 {
            return Err(Error::invalid(format!(
                "bevel shadow must be between 0 and 4, got {}",
                shadow
            )));
        }
        self.word(Frame::new(Opcode::BevelShadow).word(shadow))
    }

    /// Sets the button bevel width (0-15), returning the previous one.
    pub fn bevel_width(&mut self, width: u16) -> Result<u16> {
        if width > 15 {
            return Err(Error::invalid(format!(
                "bevel width must be between 0 and 15, got {}",
                width
            )));
        }
        self.word(Frame::new(Opcode::BevelWidth).word(width))
    }

    pub fn background_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.word(Frame::new(Opcode::BackgroundColour).word(colour))
    }

    pub fn outline_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.word(Frame::new(Opcode::OutlineColour).word(colour))
    }

    /// Sets the contrast: 1-15, or 0 to turn the display off.
    pub fn contrast(&mut self, contrast: u16) -> Result<u16> {
        if contrast > 15 {
            return Err(Error::invalid(format!(
                "contrast must be between 0 and 15, got {}",
                contrast
            )));
        }
        self.word(Frame::new(Opcode::Contrast).word(contrast))
    }

    pub fn frame_delay(&mut self, millis: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::FrameDelay).word(millis))
    }

    pub fn line_pattern(&mut self, pattern: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::LinePattern).word(pattern))
    }

    /// Changes the screen mode, returning the previous one.
    pub fn screen_mode(&mut self, mode: ScreenMode) -> Result<ScreenMode> {
        let previous = self.word(Frame::new(Opcode::ScreenMode).word(mode.word()))?;
        self.screen_mode = mode;
        debug!("Screen mode set to {}", mode);
        ScreenMode::from_word(previous)
    }

    pub fn transparency(&mut self, enable: bool) -> Result<bool> {
        Ok(self.word(Frame::new(Opcode::Transparency).word(enable as u16))? != 0)
    }

    pub fn transparent_colour(&mut self, colour: Colour) -> Result<Colour> {
        self.word(Frame::new(Opcode::TransparentColour).word(colour))
    }

    pub fn gfx_set(&mut self, setting: GfxSetting, value: u16) -> Result<()> {
        self.ack(Frame::new(Opcode::GfxSet).words(&[setting as u16, value]))
    }

    pub fn gfx_get(&mut self, query: GfxQuery) -> Result<u16> {
        self.word(Frame::new(Opcode::GfxGet).word(query as u16))
    }

    // Serial commands

    /// Finds the rate the module is currently running at.
    pub fn detect_baud_rate(&mut self) -> Result<u32> {
        self.negotiator.detect(&mut self.link)
    }

    /// Switches the module and host to a new rate.
    pub fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        self.negotiator.switch(&mut self.link, rate)
    }

    // Timer commands

    /// Puts the module to sleep for the given number of seconds.
    pub fn sleep(&mut self, seconds: u16) -> Result<u16> {
        self.word(Frame::new(Opcode::Sleep).word(seconds))
    }

    // Touch screen commands

    pub fn touch_detect_region(&mut self, top_left: Point, bottom_right: Point) -> Result<()> {
        self.ack(Frame::new(Opcode::TouchDetectRegion).words(&[
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
        ]))
    }

    pub fn touch_set(&mut self, mode: TouchMode) -> Result<()> {
        self.ack(Frame::new(Opcode::TouchSet).word(mode as u16))
    }

    pub fn touch_get(&mut self, query: TouchQuery) -> Result<u16> {
        self.word(Frame::new(Opcode::TouchGet).word(query as u16))
    }

    /// Returns the current touch state.
    pub fn touch_status(&mut self) -> Result<TouchStatus> {
        TouchStatus::from_word(self.touch_get(TouchQuery::Status)?)
    }

    // System commands

    /// Returns the module's model name.
    pub fn model(&mut self) -> Result<Vec<u8>> {
        self.link
            .execute(
                &Frame::new(Opcode::GetDisplayModel),
                ResponseShape::CountedBytes,
            )?
            .into_bytes()
    }

    // Connection

    /// Sends the out-of-band reset sequence.
    pub fn reset(&mut self) -> Result<()> {
        self.link.reset()
    }

    /// Closes the serial link.
    pub fn close(&mut self) -> Result<()> {
        self.link.close()?;
        info!("Display connection closed");
        Ok(())
    }
}
