//! Overlay GUI model: full-screen layers holding simple widgets.

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// CSS `green`.
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Vertical anchoring of a control inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Horizontal anchoring of a control inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// A pixel rectangle, origin at the top-left of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Returns true if the point lies inside the rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// A clickable text button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub text: String,
    pub width_px: f32,
    pub height_px: f32,
    /// Text and border color.
    pub color: Color,
    pub background: Color,
    pub corner_radius: f32,
    pub font_size_px: f32,
    pub vertical_alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical offset from the aligned position; negative moves up.
    pub top_px: f32,
    /// Horizontal offset from the aligned position; negative moves left.
    pub left_px: f32,
}

impl Button {
    /// A button with a text label and default styling.
    pub fn simple(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            width_px: 200.0,
            height_px: 40.0,
            color: Color::BLACK,
            background: Color::TRANSPARENT,
            corner_radius: 0.0,
            font_size_px: 18.0,
            vertical_alignment: VerticalAlignment::Center,
            horizontal_alignment: HorizontalAlignment::Center,
            top_px: 0.0,
            left_px: 0.0,
        }
    }

    /// Resolves alignment and offsets to a screen rectangle.
    #[allow(clippy::cast_precision_loss)]
    pub fn layout(&self, screen_width: u32, screen_height: u32) -> Rect {
        let (sw, sh) = (screen_width as f32, screen_height as f32);
        let left = match self.horizontal_alignment {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Center => (sw - self.width_px) * 0.5,
            HorizontalAlignment::Right => sw - self.width_px,
        };
        let top = match self.vertical_alignment {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => (sh - self.height_px) * 0.5,
            VerticalAlignment::Bottom => sh - self.height_px,
        };
        Rect {
            left: left + self.left_px,
            top: top + self.top_px,
            width: self.width_px,
            height: self.height_px,
        }
    }
}

/// A widget placed on an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    Button(Button),
}

impl Control {
    /// The control's name.
    pub fn name(&self) -> &str {
        match self {
            Control::Button(button) => &button.name,
        }
    }
}

/// A screen-covering overlay layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FullscreenUi {
    pub name: String,
    pub controls: Vec<Control>,
}

impl FullscreenUi {
    /// Creates an empty overlay.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controls: Vec::new(),
        }
    }

    /// Adds a control on top of the existing ones.
    pub fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    /// Looks up a button by name.
    pub fn button(&self, name: &str) -> Option<&Button> {
        self.controls.iter().find_map(|control| match control {
            Control::Button(button) if button.name == name => Some(button),
            Control::Button(_) => None,
        })
    }
}

/// Receives overlays built by the application.
pub trait GuiLayer {
    /// Installs `ui` as a full-screen overlay.
    fn create_fullscreen_ui(&mut self, ui: FullscreenUi);
}

/// In-process GUI layer keeping one overlay per name.
///
/// Installing an overlay whose name is already present replaces it, so
/// repeated rebuilds never stack duplicate layers.
#[derive(Debug, Default)]
pub struct RetainedGui {
    overlays: Vec<FullscreenUi>,
    builds: usize,
}

impl RetainedGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overlays, bottom to top.
    pub fn overlays(&self) -> &[FullscreenUi] {
        &self.overlays
    }

    /// Looks up an overlay by name.
    pub fn overlay(&self, name: &str) -> Option<&FullscreenUi> {
        self.overlays.iter().find(|ui| ui.name == name)
    }

    /// Number of overlays installed so far, including replacements.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    /// Returns the topmost button under `(x, y)` for a screen of the given size.
    pub fn hit_test(
        &self,
        x: f32,
        y: f32,
        screen_width: u32,
        screen_height: u32,
    ) -> Option<&Button> {
        self.overlays.iter().rev().find_map(|ui| {
            ui.controls.iter().rev().find_map(|control| match control {
                Control::Button(button)
                    if button.layout(screen_width, screen_height).contains(x, y) =>
                {
                    Some(button)
                }
                Control::Button(_) => None,
            })
        })
    }
}

impl GuiLayer for RetainedGui {
    fn create_fullscreen_ui(&mut self, ui: FullscreenUi) {
        self.builds += 1;
        if let Some(existing) = self.overlays.iter_mut().find(|o| o.name == ui.name) {
            log::debug!("Replacing overlay '{}'", ui.name);
            *existing = ui;
        } else {
            log::debug!("Creating overlay '{}'", ui.name);
            self.overlays.push(ui);
        }
    }
}
