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
#![deny(missing_docs)]
//! `bmicalc` is a body-mass-index calculator built on a small retained widget runtime.
//! The crate exposes the widget table and its per-frame dispatch loop ([`Context`]), a glyph
//! atlas and canvas that turn recorded draw commands into textured quads for any [`Renderer`],
//! and the calculator application itself ([`BmiCalculator`]). The SDL2/GLES backend lives
//! behind the `backend` feature.

mod app;
mod atlas;
mod bmi;
mod canvas;
mod config;
mod context;
mod draw;
mod error;
mod packer;
mod widgets;

#[cfg(feature = "backend")]
pub mod backend;

pub use app::*;
pub use atlas::*;
pub use bmi::*;
pub use canvas::*;
pub use config::*;
pub use context::Context;
pub use draw::*;
pub use error::{Error, Result};
pub use rs_math3d::*;
pub use widgets::*;

use bitflags::*;

/// Trait implemented by render backends used by the canvas.
pub trait Renderer {
    /// Returns the atlas backing the renderer.
    fn get_atlas(&self) -> AtlasHandle;
    /// Begins a new frame with the viewport size and clear color.
    fn begin(&mut self, width: i32, height: i32, clr: Color);
    /// Pushes four vertices representing a quad to the backend.
    fn push_quad_vertices(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, v3: &Vertex);
    /// Flushes any buffered geometry to the GPU.
    fn flush(&mut self);
    /// Ends the frame, finalizing any outstanding GPU work.
    fn end(&mut self);
    /// Creates a texture owned by the renderer.
    fn create_texture(&mut self, id: TextureId, width: i32, height: i32, pixels: &[u8]);
    /// Destroys a previously created texture.
    fn destroy_texture(&mut self, id: TextureId);
    /// Draws the provided textured quad.
    fn draw_texture(&mut self, id: TextureId, vertices: [Vertex; 4]);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Handle referencing a renderer-owned texture.
pub struct TextureId(u32);

impl TextureId {
    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Fully transparent black. Bevels treat it as "use the default fill".
    pub const BLANK: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    /// Opaque black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    /// Opaque white.
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    /// Returns `true` when every channel is zero.
    pub fn is_blank(&self) -> bool { *self == Self::BLANK }
}

#[derive(PartialEq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in style colors.
pub enum ControlColor {
    /// Fill of a sunken (pressed or input) frame.
    Sunken = 6,
    /// Fill of a frame under the pointer.
    Hover = 5,
    /// Default frame fill.
    Normal = 4,
    /// Dark edge of the frame that owns keyboard focus.
    ShadowActive = 3,
    /// Light edge of the frame that owns keyboard focus.
    LightActive = 2,
    /// Dark bevel edge.
    Shadow = 1,
    /// Light bevel edge.
    Light = 0,
}

impl ControlColor {
    /// Promotes a bevel edge to its focused variant.
    pub fn focus(&mut self) {
        *self = match self {
            Self::Light => Self::LightActive,
            Self::Shadow => Self::ShadowActive,
            _ => *self,
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// Collection of visual constants that drive widget appearance.
pub struct Style {
    /// Thickness of bevel edges in pixels.
    pub bevel_width: i32,
    /// Offset of input text from the input frame.
    pub input_inset: i32,
    /// Distance text buttons shift their label while held.
    pub press_offset: i32,
    /// Palette of [`ControlColor`] entries.
    pub colors: [Color; 7],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bevel_width: 2,
            input_inset: 3,
            press_offset: 2,
            colors: [
                Color { r: 255, g: 255, b: 255, a: 255 },
                Color { r: 0, g: 0, b: 0, a: 255 },
                Color { r: 0, g: 121, b: 241, a: 255 },
                Color { r: 0, g: 82, b: 172, a: 255 },
                Color { r: 200, g: 200, b: 200, a: 255 },
                Color { r: 190, g: 190, b: 190, a: 255 },
                Color { r: 175, g: 175, b: 175, a: 255 },
            ],
        }
    }
}

impl Style {
    /// Returns the palette entry for `id`.
    pub fn color(&self, id: ControlColor) -> Color { self.colors[id as usize] }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Mouse button state as reported by the input system.
    pub struct MouseButton : u32 {
        /// Middle mouse button.
        const MIDDLE = 4;
        /// Right mouse button.
        const RIGHT = 2;
        /// Left mouse button.
        const LEFT = 1;
        /// No buttons pressed.
        const NONE = 0;
    }
}

impl MouseButton {
    /// Returns `true` if the left mouse button is set.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if no mouse buttons are set.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

impl Default for MouseButton {
    fn default() -> Self { MouseButton::NONE }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Editing keys consumed by the focused input.
pub enum Key {
    /// Deletes the character before the cursor.
    Backspace,
    /// Deletes the character after the cursor.
    Delete,
    /// Moves the cursor one character left.
    Left,
    /// Moves the cursor one character right.
    Right,
    /// Moves the cursor to the start of the text.
    Home,
    /// Moves the cursor to the end of the text.
    End,
    /// Commits the edit, releasing focus.
    Return,
}

#[derive(Clone, Debug, Default)]
/// Aggregates raw input collected during the current frame.
pub struct Input {
    mouse_pos: Vec2i,
    mouse_down: MouseButton,
    mouse_released: MouseButton,
    keys_pressed: Vec<Key>,
    codepoints: Vec<u32>,
}

impl Input {
    /// Returns the current pointer position.
    pub fn mouse_pos(&self) -> Vec2i { self.mouse_pos }

    /// Returns the currently held mouse buttons.
    pub fn mouse_down(&self) -> MouseButton { self.mouse_down }

    /// Returns the mouse buttons released this frame.
    pub fn mouse_released(&self) -> MouseButton { self.mouse_released }

    /// Returns the editing keys pressed this frame, in arrival order.
    pub fn keys_pressed(&self) -> &[Key] { &self.keys_pressed }

    /// Returns the code points typed this frame, in arrival order.
    pub fn codepoints(&self) -> &[u32] { &self.codepoints }

    /// Updates the current mouse pointer position.
    pub fn mousemove(&mut self, x: i32, y: i32) { self.mouse_pos = vec2(x, y); }

    /// Records that the specified mouse button was pressed.
    pub fn mousedown(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down |= btn;
    }

    /// Records that the specified mouse button was released.
    pub fn mouseup(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down &= !btn;
        self.mouse_released |= btn;
    }

    /// Records that an editing key was pressed.
    pub fn keydown(&mut self, key: Key) { self.keys_pressed.push(key); }

    /// Queues a raw code point. Invalid values are kept and dropped later by the editor.
    pub fn codepoint(&mut self, cp: u32) { self.codepoints.push(cp); }

    /// Queues every character of a decoded UTF-8 text event.
    pub fn text(&mut self, text: &str) { self.codepoints.extend(text.chars().map(u32::from)); }

    pub(crate) fn epilogue(&mut self) {
        self.mouse_released = MouseButton::NONE;
        self.keys_pressed.clear();
        self.codepoints.clear();
    }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Returns `true` when `p` lies inside `r`; the right and bottom edges are exclusive.
pub fn rect_contains(r: Recti, p: Vec2i) -> bool { p.x >= r.x && p.x < r.x + r.width && p.y >= r.y && p.y < r.y + r.height }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_edge_lasts_one_frame() {
        let mut input = Input::default();
        input.mousedown(3, 4, MouseButton::LEFT);
        assert!(input.mouse_down().is_left());
        input.mouseup(5, 6, MouseButton::LEFT);
        assert!(input.mouse_released().is_left());
        assert!(!input.mouse_down().is_left());
        assert_eq!((input.mouse_pos().x, input.mouse_pos().y), (5, 6));
        input.epilogue();
        assert!(input.mouse_released().is_none());
    }

    #[test]
    fn palette_holds_the_bevel_colors() {
        let style = Style::default();
        assert_eq!(style.colors.len(), ControlColor::Sunken as usize + 1);
        assert_eq!(style.color(ControlColor::Normal), color(200, 200, 200, 255));
        assert_eq!(style.color(ControlColor::Sunken), color(175, 175, 175, 255));
        let mut edge = ControlColor::Shadow;
        edge.focus();
        assert_eq!(edge, ControlColor::ShadowActive);
    }

    #[test]
    fn text_events_queue_codepoints() {
        let mut input = Input::default();
        input.text("a²");
        input.codepoint(0xD800);
        assert_eq!(input.codepoints(), &[0x61, 0xB2, 0xD800]);
    }

    #[test]
    fn rect_contains_excludes_far_edges() {
        let r = rect(10, 10, 5, 5);
        assert!(rect_contains(r, vec2(10, 10)));
        assert!(rect_contains(r, vec2(14, 14)));
        assert!(!rect_contains(r, vec2(15, 12)));
        assert!(!rect_contains(r, vec2(12, 9)));
    }
}
