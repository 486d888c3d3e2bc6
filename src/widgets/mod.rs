//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
mod input_field;
mod text_edit;

pub use input_field::*;
pub use text_edit::TextEdit;

use crate::*;
use bitflags::bitflags;
use std::ops::Index;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Position of a widget in the table; handed out by [`Context::add`].
pub struct WidgetId(pub(crate) usize);

impl WidgetId {
    /// Returns the declaration index.
    pub fn index(self) -> usize { self.0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// [`Handler`] callbacks a widget takes part in.
    pub struct Callbacks : u32 {
        /// Text refreshed by [`Handler::on_render`] right before drawing.
        const RENDER = 4;
        /// Input validated by [`Handler::on_validate`] when focus is lost.
        const VALIDATE = 2;
        /// Clicks reported through [`Handler::on_click`].
        const CLICK = 1;
        /// No callbacks.
        const NONE = 0;
    }
}

impl Default for Callbacks {
    fn default() -> Self { Callbacks::NONE }
}

#[derive(Clone, Debug)]
/// Text shared by labels and buttons.
pub struct TextWidget {
    /// Displayed text.
    pub text: String,
    /// Text color.
    pub text_color: Color,
    /// Background color; blank leaves the default fill.
    pub background: Color,
    /// Font used for drawing and sizing.
    pub font: FontId,
}

#[derive(Clone, Debug)]
/// Picture loaded from a PNG file at startup.
pub struct ImageWidget {
    /// Path of the PNG file.
    pub path: String,
    texture: Option<TextureId>,
}

impl ImageWidget {
    /// Returns the backing texture once loaded.
    pub fn texture(&self) -> Option<TextureId> { self.texture }
}

#[derive(Clone, Debug)]
/// Kind specific widget data.
pub enum WidgetKind {
    /// Static text on an optional background.
    Label(TextWidget),
    /// Raised button with centered text.
    Button(TextWidget),
    /// Texture blitted at the widget position.
    Image(ImageWidget),
    /// Close-style button showing " x ".
    CrossButton {
        /// Glyph color.
        text_color: Color,
        /// Glyph font.
        font: FontId,
    },
    /// Decorative bevelled rectangle.
    Panel {
        /// Fill color; blank selects the default fill.
        background: Color,
        /// Draws the frame pressed in.
        sunken: bool,
    },
    /// Editable text field.
    Input(InputField),
}

/// Text drawn by a [`WidgetKind::CrossButton`].
pub const CROSS_TEXT: &str = " x ";

#[derive(Clone, Debug)]
/// One entry of the widget table.
pub struct Widget {
    rect: Recti,
    hovered: bool,
    callbacks: Callbacks,
    /// Kind specific state.
    pub kind: WidgetKind,
}

impl Widget {
    fn new(rect: Recti, kind: WidgetKind) -> Self {
        Self {
            rect,
            hovered: false,
            callbacks: Callbacks::NONE,
            kind,
        }
    }

    /// Label at `pos`; sized to its text when added to a [`Context`].
    pub fn label(pos: Vec2i, text: &str, font: FontId, text_color: Color) -> Self {
        Self::new(
            rect(pos.x, pos.y, 0, 0),
            WidgetKind::Label(TextWidget {
                text: text.to_string(),
                text_color,
                background: Color::BLANK,
                font,
            }),
        )
    }

    /// Button covering `r`.
    pub fn button(r: Recti, text: &str, font: FontId, text_color: Color) -> Self {
        Self::new(
            r,
            WidgetKind::Button(TextWidget {
                text: text.to_string(),
                text_color,
                background: Color::BLANK,
                font,
            }),
        )
    }

    /// Image at `pos`; sized to the texture once loaded.
    pub fn image(pos: Vec2i, path: &str) -> Self { Self::new(rect(pos.x, pos.y, 0, 0), WidgetKind::Image(ImageWidget { path: path.to_string(), texture: None })) }

    /// Cross button at `pos`.
    pub fn cross_button(pos: Vec2i, font: FontId, text_color: Color) -> Self { Self::new(rect(pos.x, pos.y, 0, 0), WidgetKind::CrossButton { text_color, font }) }

    /// Panel covering `r`.
    pub fn panel(r: Recti, background: Color, sunken: bool) -> Self { Self::new(r, WidgetKind::Panel { background, sunken }) }

    /// Input at `pos` accepting up to `max_chars` code points from `allowed`.
    pub fn input(pos: Vec2i, max_chars: usize, allowed: &str, font: FontId, text_color: Color) -> Self {
        Self::new(rect(pos.x, pos.y, 0, 0), WidgetKind::Input(InputField::new(max_chars, allowed, font, text_color)))
    }

    /// Enables the given handler callbacks.
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks |= callbacks;
        self
    }

    /// Screen rectangle; fixed once the widget is added.
    pub fn rect(&self) -> Recti { self.rect }

    /// Returns `true` when the pointer was over the widget during the last frame.
    pub fn hovered(&self) -> bool { self.hovered }

    /// Enabled handler callbacks.
    pub fn callbacks(&self) -> Callbacks { self.callbacks }

    /// Returns the input state if this is an input widget.
    pub fn as_input(&self) -> Option<&InputField> {
        match &self.kind {
            WidgetKind::Input(field) => Some(field),
            _ => None,
        }
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) { self.hovered = hovered; }

    pub(crate) fn as_input_mut(&mut self) -> Option<&mut InputField> {
        match &mut self.kind {
            WidgetKind::Input(field) => Some(field),
            _ => None,
        }
    }

    /// Derives the size of content-sized kinds from the atlas metrics.
    pub(crate) fn fit_content(&mut self, atlas: &AtlasHandle) {
        let size = match &self.kind {
            WidgetKind::Label(t) => atlas.get_text_size(t.font, &t.text),
            WidgetKind::CrossButton { font, .. } => {
                let s = atlas.get_text_size(*font, CROSS_TEXT);
                Dimensioni::new(s.width + 1, s.height + 1)
            }
            WidgetKind::Input(field) => {
                let m = atlas.get_text_size(field.font, "M");
                Dimensioni::new(m.width * field.max_chars() as i32 + 5, m.height + 5)
            }
            _ => return,
        };
        self.rect.width = size.width;
        self.rect.height = size.height;
    }

    pub(crate) fn attach_texture(&mut self, texture: TextureId, size: Dimensioni) {
        if let WidgetKind::Image(image) = &mut self.kind {
            image.texture = Some(texture);
            self.rect.width = size.width;
            self.rect.height = size.height;
        }
    }

    pub(crate) fn detach_texture(&mut self) -> Option<TextureId> {
        match &mut self.kind {
            WidgetKind::Image(image) => image.texture.take(),
            _ => None,
        }
    }
}

#[derive(Default)]
/// Fixed table of widgets in declaration order. Callbacks may change text
/// through it but never geometry.
pub struct Widgets(Vec<Widget>);

impl Widgets {
    /// Number of widgets.
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` when no widget was declared.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns the widget behind `id`.
    pub fn get(&self, id: WidgetId) -> Option<&Widget> { self.0.get(id.0) }

    /// Iterates widgets with their ids in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget)> { self.0.iter().enumerate().map(|(i, w)| (WidgetId(i), w)) }

    /// Returns the displayed text of a label, button or input.
    pub fn text(&self, id: WidgetId) -> Option<&str> {
        match &self.get(id)?.kind {
            WidgetKind::Label(t) | WidgetKind::Button(t) => Some(&t.text),
            WidgetKind::Input(field) => Some(field.text()),
            _ => None,
        }
    }

    /// Replaces the displayed text of a label, button or input; other kinds are left alone.
    pub fn set_text(&mut self, id: WidgetId, text: &str) {
        if let Some(widget) = self.0.get_mut(id.0) {
            match &mut widget.kind {
                WidgetKind::Label(t) | WidgetKind::Button(t) => {
                    t.text.clear();
                    t.text.push_str(text);
                }
                WidgetKind::Input(field) => field.set_text(text),
                _ => (),
            }
        }
    }

    /// Returns the input state behind `id`.
    pub fn input(&self, id: WidgetId) -> Option<&InputField> { self.get(id)?.as_input() }

    pub(crate) fn push(&mut self, widget: Widget) -> WidgetId {
        self.0.push(widget);
        WidgetId(self.0.len() - 1)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> { self.0.get_mut(id.0) }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Widget> { self.0.iter_mut() }
}

impl Index<WidgetId> for Widgets {
    type Output = Widget;
    fn index(&self, id: WidgetId) -> &Widget { &self.0[id.0] }
}

/// Application callbacks invoked by [`Context`]. Each runs only for widgets
/// carrying the matching [`Callbacks`] flag.
pub trait Handler {
    /// A clickable widget was released under the pointer.
    fn on_click(&mut self, _widgets: &mut Widgets, _id: WidgetId) {}
    /// A label or button is about to be drawn.
    fn on_render(&mut self, _widgets: &mut Widgets, _id: WidgetId) {}
    /// An input lost focus.
    fn on_validate(&mut self, _widgets: &mut Widgets, _id: WidgetId) {}
    /// Asks the main loop to stop after the current frame.
    fn wants_exit(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::make_test_atlas;

    #[test]
    fn content_sizes_follow_font_metrics() {
        let atlas = make_test_atlas();
        let font = FontId::default();
        let mut label = Widget::label(vec2(5, 6), "ab", font, Color::BLACK);
        let mut cross = Widget::cross_button(vec2(0, 0), font, Color::BLACK);
        let mut input = Widget::input(vec2(0, 0), 3, "", font, Color::BLACK);
        let mut button = Widget::button(rect(1, 2, 25, 25), "▲", font, Color::BLACK);
        for w in [&mut label, &mut cross, &mut input, &mut button] {
            w.fit_content(&atlas);
        }
        let size = |w: &Widget| (w.rect().x, w.rect().y, w.rect().width, w.rect().height);
        assert_eq!(size(&label), (5, 6, 21, 20));
        assert_eq!(size(&cross), (0, 0, 33, 21));
        assert_eq!(size(&input), (0, 0, 35, 25));
        assert_eq!(size(&button), (1, 2, 25, 25));
    }

    #[test]
    fn set_text_ignores_non_text_kinds() {
        let mut widgets = Widgets::default();
        let label = widgets.push(Widget::label(vec2(0, 0), "a", FontId::default(), Color::BLACK));
        let panel = widgets.push(Widget::panel(rect(0, 0, 5, 5), Color::BLANK, true));
        widgets.set_text(label, "BMI");
        widgets.set_text(panel, "nope");
        assert_eq!(widgets.text(label), Some("BMI"));
        assert_eq!(widgets.text(panel), None);
        assert_eq!(panel.index(), 1);
    }
}
