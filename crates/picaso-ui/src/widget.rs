//! Widget tree.
//!
//! Every widget owns its children and is drawn onto a [`Surface`] passed in
//! at draw time. Two flags drive redrawing:
//!
//! - `dirty`: the widget must be repainted on the next [`Widget::draw_dirty`].
//! - `fitted`: the widget's children have been laid out inside its envelope.
//!
//! Changing a widget's envelope clears `fitted` and sets `dirty` on it and on
//! every descendant, so the next draw lays the subtree out again.

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::layout::{self, Orientation};
use crate::surface::Surface;
use picaso_hw::colour::{self, Colour};
use picaso_hw::{PanelState, Point};
use tracing::{debug, trace};

/// Character used to measure the current font.
const SAMPLE_CHAR: u8 = b'e';

/// Settings for a filled background region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub background: Colour,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: colour::BLACK,
        }
    }
}

impl CanvasConfig {
    pub fn background(mut self, colour: Colour) -> Self {
        self.background = colour;
        self
    }
}

/// Settings for a raised button with a centred label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub text: String,
    pub background: Colour,
    pub foreground: Colour,
    /// Text width multiplier.
    pub char_width: u16,
    /// Text height multiplier.
    pub char_height: u16,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            background: colour::WHITE,
            foreground: colour::BLACK,
            char_width: 2,
            char_height: 3,
        }
    }
}

impl ButtonConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn background(mut self, colour: Colour) -> Self {
        self.background = colour;
        self
    }

    pub fn foreground(mut self, colour: Colour) -> Self {
        self.foreground = colour;
        self
    }

    pub fn char_size(mut self, width: u16, height: u16) -> Self {
        self.char_width = width;
        self.char_height = height;
        self
    }
}

/// What a widget paints and how it lays itself out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    /// Fills its envelope with a background colour.
    Canvas(CanvasConfig),
    /// Paints nothing; only arranges its children.
    Grid,
    /// Raised panel with a label centred in the envelope.
    Button {
        config: ButtonConfig,
        /// Pixel size of one character, measured once on first fit.
        char_size: Option<(u16, u16)>,
        /// Where the label starts.
        text_origin: Point,
    },
}

impl WidgetKind {
    fn layout<S: Surface>(&mut self, envelope: Envelope, surface: &mut S) -> Result<()> {
        if let WidgetKind::Button {
            config,
            char_size,
            text_origin,
        } = self
        {
            let (char_w, char_h) = match *char_size {
                Some(size) => size,
                None => {
                    surface.text_width(config.char_width)?;
                    surface.text_height(config.char_height)?;
                    let size = (
                        surface.char_width(SAMPLE_CHAR)?,
                        surface.char_height(SAMPLE_CHAR)?,
                    );
                    debug!("Measured character cell {}x{}", size.0, size.1);
                    *char_size = Some(size);
                    size
                }
            };
            *text_origin = label_origin(envelope, config.text.len(), char_w, char_h);
        }
        Ok(())
    }

    fn paint<S: Surface>(&self, envelope: Envelope, surface: &mut S) -> Result<()> {
        match self {
            WidgetKind::Canvas(config) => {
                surface.rectangle_filled(
                    envelope.top_left(),
                    envelope.bottom_right(),
                    config.background,
                )?;
            }
            WidgetKind::Grid => {}
            WidgetKind::Button {
                config,
                text_origin,
                ..
            } => {
                surface.panel(
                    PanelState::Raised,
                    envelope.top_left(),
                    envelope.width(),
                    envelope.height(),
                    config.background,
                )?;
                // Other buttons may have changed the text size since layout.
                surface.text_width(config.char_width)?;
                surface.text_height(config.char_height)?;
                surface.text_fg_colour(config.foreground)?;
                surface.move_to(*text_origin)?;
                surface.put_str(&config.text)?;
            }
        }
        Ok(())
    }
}

/// Centres `len` characters in the envelope, clamped to the screen.
fn label_origin(envelope: Envelope, len: usize, char_w: u16, char_h: u16) -> Point {
    let centre_x = i64::from(envelope.x2) - i64::from(envelope.width()) / 2;
    let centre_y = i64::from(envelope.y2) - i64::from(envelope.height()) / 2;
    let x = centre_x - (len as i64 * i64::from(char_w)) / 2;
    let y = centre_y - i64::from(char_h) / 2;
    let clamp = |v: i64| v.clamp(0, i64::from(u16::MAX)) as u16;
    Point::new(clamp(x), clamp(y))
}

/// A node in the widget tree.
#[derive(Debug, Clone)]
pub struct Widget {
    kind: WidgetKind,
    orientation: Orientation,
    envelope: Option<Envelope>,
    dirty: bool,
    fitted: bool,
    children: Vec<Widget>,
}

impl Widget {
    fn new(kind: WidgetKind, orientation: Orientation) -> Self {
        Self {
            kind,
            orientation,
            envelope: None,
            dirty: true,
            fitted: false,
            children: Vec::new(),
        }
    }

    /// Creates a root canvas covering a display of the given dimensions.
    pub fn screen(dimensions: (u16, u16), config: CanvasConfig) -> Self {
        Self::canvas(config).with_envelope(Envelope::screen(dimensions))
    }

    /// Creates a canvas. Without an envelope it takes its parent's.
    pub fn canvas(config: CanvasConfig) -> Self {
        Self::new(WidgetKind::Canvas(config), Orientation::Single)
    }

    /// Creates a grid laying children out left to right.
    pub fn x_grid() -> Self {
        Self::new(WidgetKind::Grid, Orientation::Horizontal)
    }

    /// Creates a grid stacking children top to bottom.
    pub fn y_grid() -> Self {
        Self::new(WidgetKind::Grid, Orientation::Vertical)
    }

    pub fn button(config: ButtonConfig) -> Self {
        Self::new(
            WidgetKind::Button {
                config,
                char_size: None,
                text_origin: Point::default(),
            },
            Orientation::Single,
        )
    }

    /// Sets the initial envelope.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the envelope, or an empty one if none has been assigned yet.
    pub fn envelope(&self) -> Envelope {
        self.envelope.unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn children(&self) -> &[Widget] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Widget> {
        self.children.get_mut(index)
    }

    /// Appends a child.
    ///
    /// A child without an envelope inherits this widget's, or waits for the
    /// next fit if this widget is not placed yet. Non-grid widgets accept a
    /// single child.
    pub fn add_child(&mut self, mut child: Widget) -> Result<&mut Widget> {
        if !self.orientation.is_grid() && !self.children.is_empty() {
            return Err(Error::TooManyChildren);
        }

        if let (None, Some(envelope)) = (child.envelope, self.envelope) {
            child.set_envelope(envelope);
        }
        self.children.push(child);
        self.unfit();
        self.mark_dirty();

        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    /// Moves the widget, marking its whole subtree for layout and repaint.
    pub fn set_envelope(&mut self, envelope: Envelope) {
        trace!(
            "Envelope set to ({}, {})-({}, {})",
            envelope.x1,
            envelope.y1,
            envelope.x2,
            envelope.y2
        );
        self.envelope = Some(envelope);
        self.unfit();
        self.mark_dirty();
    }

    /// Marks this widget and every descendant for repaint.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        for child in &mut self.children {
            child.mark_dirty();
        }
    }

    /// Marks this widget and every descendant for layout.
    pub fn unfit(&mut self) {
        self.fitted = false;
        for child in &mut self.children {
            child.unfit();
        }
    }

    /// Lays out the direct children inside this widget's envelope.
    pub fn fit_children<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let envelope = self.envelope();

        match self.orientation {
            Orientation::Single => {
                let placed = self.envelope;
                if let (Some(child), Some(envelope)) = (self.children.first_mut(), placed) {
                    match child.envelope {
                        None => child.set_envelope(envelope),
                        Some(current) if !envelope.contains(&current) => {
                            let clipped = envelope.intersect(&current).unwrap_or(envelope);
                            debug!("Clipping child to parent envelope");
                            child.set_envelope(clipped);
                        }
                        Some(_) => {}
                    }
                }
            }
            Orientation::Horizontal | Orientation::Vertical => {
                let spans = layout::split(envelope, self.orientation, self.children.len());
                for (child, span) in self.children.iter_mut().zip(spans) {
                    child.set_envelope(span);
                }
            }
        }

        self.kind.layout(envelope, surface)?;
        self.fitted = true;
        Ok(())
    }

    /// Repaints the whole tree.
    pub fn draw<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        self.mark_dirty();
        self.draw_dirty(surface)
    }

    /// Lays out and repaints only what changed, parents before children.
    pub fn draw_dirty<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        if !self.fitted {
            self.fit_children(surface)?;
        }
        if self.dirty {
            self.kind.paint(self.envelope(), surface)?;
            self.dirty = false;
        }
        for child in &mut self.children {
            child.draw_dirty(surface)?;
        }
        Ok(())
    }
}
