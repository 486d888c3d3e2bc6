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
use crate::*;

#[derive(Clone)]
/// Low-level drawing command recorded during the render pass.
pub enum Command {
    /// Draws a solid rectangle.
    Rect {
        /// Target rectangle.
        rect: Recti,
        /// Fill color.
        color: Color,
    },
    /// Draws text.
    Text {
        /// Font to use.
        font: FontId,
        /// Top-left text position.
        pos: Vec2i,
        /// Text color.
        color: Color,
        /// UTF-8 string to render.
        text: String,
    },
    /// Draws a renderer-owned texture.
    Image {
        /// Texture handle.
        texture: TextureId,
        /// Destination rectangle.
        rect: Recti,
        /// Tint color.
        color: Color,
    },
}

#[derive(Default)]
/// Ordered list of commands produced by one render pass.
pub struct DrawList {
    commands: Vec<Command>,
}

impl DrawList {
    /// Returns the commands recorded so far.
    pub fn commands(&self) -> &[Command] { &self.commands }

    /// Records a solid rectangle; empty rectangles are skipped.
    pub fn draw_rect(&mut self, rect: Recti, color: Color) {
        if rect.width > 0 && rect.height > 0 {
            self.commands.push(Command::Rect { rect, color });
        }
    }

    /// Records a text run starting at `pos`.
    pub fn draw_text(&mut self, font: FontId, text: &str, pos: Vec2i, color: Color) {
        if !text.is_empty() {
            self.commands.push(Command::Text {
                font,
                pos,
                color,
                text: String::from(text),
            });
        }
    }

    /// Records a texture blit.
    pub fn draw_image(&mut self, texture: TextureId, rect: Recti, color: Color) { self.commands.push(Command::Image { texture, rect, color }); }

    /// Replays and drains the recorded commands into `canvas`.
    pub fn render<R: Renderer>(&mut self, canvas: &mut Canvas<R>) {
        for cmd in self.commands.drain(..) {
            match cmd {
                Command::Rect { rect, color } => canvas.draw_rect(rect, color),
                Command::Text { font, pos, color, text } => canvas.draw_chars(font, &text, pos, color),
                Command::Image { texture, rect, color } => {
                    // textures use their own batch
                    canvas.flush();
                    canvas.draw_texture(texture, rect, color);
                }
            }
        }
    }

    /// Paints a 3D frame: fill, then light top/left and shadow bottom/right edges.
    /// Edges are centered on the frame border, so half of each lies outside `r`.
    /// A blank `background` selects the default fill for the hover/sunken state;
    /// sunken frames swap the edges and `active` frames use the focus edge colors.
    pub fn draw_bevel(&mut self, r: Recti, background: Color, hover: bool, sunken: bool, active: bool, style: &Style) {
        let fill = if background.is_blank() {
            match (hover, sunken) {
                (_, true) => style.color(ControlColor::Sunken),
                (true, false) => style.color(ControlColor::Hover),
                _ => style.color(ControlColor::Normal),
            }
        } else {
            background
        };

        let mut light = ControlColor::Light;
        let mut shadow = ControlColor::Shadow;
        if active {
            light.focus();
            shadow.focus();
        }
        if sunken {
            std::mem::swap(&mut light, &mut shadow);
        }

        let bw = style.bevel_width;
        let half = bw / 2;
        self.draw_rect(r, fill);
        self.draw_rect(rect(r.x, r.y - half, r.width + 1, bw), style.color(light));
        self.draw_rect(rect(r.x - half, r.y, bw, r.height + 1), style.color(light));
        self.draw_rect(rect(r.x + 1, r.y + r.height - half, r.width, bw), style.color(shadow));
        self.draw_rect(rect(r.x + r.width - half, r.y + 1, bw, r.height), style.color(shadow));
    }

    /// Paints a raised button with `text` centered; while `pressed` the frame sinks
    /// and the text shifts up-left by the style's press offset.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_button(&mut self, r: Recti, text: &str, font: FontId, text_color: Color, hover: bool, pressed: bool, style: &Style, atlas: &AtlasHandle) {
        let sunken = hover && pressed;
        let delta = if sunken { -style.press_offset } else { 0 };
        let size = atlas.get_text_size(font, text);
        self.draw_bevel(r, Color::BLANK, hover, sunken, false, style);
        let pos = vec2(
            r.x + r.width / 2 - size.width / 2 + delta,
            r.y + r.height / 2 - size.height / 2 + delta,
        );
        self.draw_text(font, text, pos, text_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::make_test_atlas;
    use crate::canvas::tests::recording_canvas;

    fn rects(list: &DrawList) -> Vec<(Recti, Color)> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                Command::Rect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blank_bevel_uses_state_fill() {
        let style = Style::default();
        let r = rect(0, 0, 20, 10);
        for (hover, sunken, expected) in [(false, false, 200), (true, false, 190), (true, true, 175), (false, true, 175)] {
            let mut list = DrawList::default();
            list.draw_bevel(r, Color::BLANK, hover, sunken, false, &style);
            let fill = rects(&list)[0].1;
            assert_eq!(fill, color(expected, expected, expected, 255));
        }
    }

    #[test]
    fn sunken_active_bevel_swaps_focus_edges() {
        let style = Style::default();
        let mut list = DrawList::default();
        list.draw_bevel(rect(0, 0, 20, 10), Color::BLANK, false, true, true, &style);
        let painted = rects(&list);
        assert_eq!(painted.len(), 5);
        // top edge carries the active shadow, bottom edge the active light
        assert_eq!(painted[1].1, style.color(ControlColor::ShadowActive));
        assert_eq!(painted[3].1, style.color(ControlColor::LightActive));
    }

    #[test]
    fn bevel_edges_straddle_the_border() {
        let style = Style::default();
        let mut list = DrawList::default();
        list.draw_bevel(rect(10, 20, 30, 15), Color::BLANK, false, false, false, &style);
        let edges: Vec<_> = rects(&list).iter().skip(1).map(|(r, _)| (r.x, r.y, r.width, r.height)).collect();
        assert_eq!(edges, vec![(10, 19, 31, 2), (9, 20, 2, 16), (11, 34, 30, 2), (39, 21, 2, 15)]);
    }

    #[test]
    fn explicit_background_wins() {
        let style = Style::default();
        let mut list = DrawList::default();
        let bg = color(10, 20, 30, 255);
        list.draw_bevel(rect(0, 0, 20, 10), bg, true, false, false, &style);
        assert_eq!(rects(&list)[0].1, bg);
    }

    #[test]
    fn pressed_button_shifts_text() {
        let style = Style::default();
        let atlas = make_test_atlas();
        let text_pos = |pressed| {
            let mut list = DrawList::default();
            list.draw_text_button(rect(0, 0, 40, 40), "M", FontId::default(), Color::BLACK, true, pressed, &style, &atlas);
            list.commands()
                .iter()
                .find_map(|c| match c {
                    Command::Text { pos, .. } => Some((pos.x, pos.y)),
                    _ => None,
                })
                .unwrap()
        };
        // "M" is 10x20 in the test atlas
        assert_eq!(text_pos(false), (15, 10));
        assert_eq!(text_pos(true), (13, 8));
    }

    #[test]
    fn render_drains_into_canvas() {
        let (mut canvas, log) = recording_canvas();
        let mut list = DrawList::default();
        list.draw_rect(rect(1, 1, 5, 5), Color::WHITE);
        list.draw_rect(rect(1, 1, 0, 5), Color::WHITE);
        list.draw_text(FontId::default(), "ab", vec2(0, 0), Color::BLACK);
        list.render(&mut canvas);
        assert!(list.commands().is_empty());
        // one rect plus one quad per glyph
        assert_eq!(log.borrow().quads.len(), 3);
    }
}
