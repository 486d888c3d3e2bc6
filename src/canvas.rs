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
use super::*;
use std::collections::HashMap;

#[derive(Default, Copy, Clone, Debug)]
#[repr(C)]
/// Vertex submitted to the renderer: position, atlas coordinate, and 8-bit color.
pub struct Vertex {
    pos: Vec2f,
    tex: Vec2f,
    color: Color4b,
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate, and color.
    pub fn new(pos: Vec2f, tex: Vec2f, color: Color4b) -> Self { Self { pos, tex, color } }

    /// Returns the position of the vertex in screen space.
    pub fn position(&self) -> Vec2f { self.pos }

    /// Returns the texture coordinates associated with the vertex.
    pub fn tex_coord(&self) -> Vec2f { self.tex }

    /// Returns the vertex color.
    pub fn color(&self) -> Color4b { self.color }
}

#[derive(Clone, Copy)]
struct TextureInfo {
    width: i32,
    height: i32,
}

fn quad(dst: Recti, uv: (f32, f32, f32, f32), color: Color) -> [Vertex; 4] {
    let (u0, v0, u1, v1) = uv;
    let (x0, y0) = (dst.x as f32, dst.y as f32);
    let (x1, y1) = ((dst.x + dst.width) as f32, (dst.y + dst.height) as f32);
    let c = color4b(color.r, color.g, color.b, color.a);
    [
        Vertex::new(Vec2f::new(x0, y0), Vec2f::new(u0, v0), c),
        Vertex::new(Vec2f::new(x1, y0), Vec2f::new(u1, v0), c),
        Vertex::new(Vec2f::new(x1, y1), Vec2f::new(u1, v1), c),
        Vertex::new(Vec2f::new(x0, y1), Vec2f::new(u0, v1), c),
    ]
}

/// Turns rectangles, strings and images into quads for a [`Renderer`], clipped to the viewport.
pub struct Canvas<R: Renderer> {
    renderer: R,
    atlas: AtlasHandle,
    clip: Recti,
    next_texture_id: u32,
    textures: HashMap<TextureId, TextureInfo>,
    rect_batch: Vec<(Recti, Recti, Color)>,
}

impl<R: Renderer> Canvas<R> {
    /// Creates a canvas owning `renderer`, with a viewport of `dim`.
    pub fn new(renderer: R, dim: Dimensioni) -> Self {
        let atlas = renderer.get_atlas();
        Self {
            renderer,
            atlas,
            clip: Recti::new(0, 0, dim.width, dim.height),
            next_texture_id: 1,
            textures: HashMap::new(),
            rect_batch: Vec::new(),
        }
    }

    /// Returns the atlas associated with the renderer.
    pub fn get_atlas(&self) -> AtlasHandle { self.atlas.clone() }

    /// Computes the clipped destination/source rectangles for rendering.
    pub fn clip_rect(dst_r: Recti, src_r: Recti, clip_r: Recti) -> Option<(Recti, Recti)> {
        match dst_r.intersect(&clip_r) {
            Some(r) if r.width == dst_r.width && r.height == dst_r.height => Some((dst_r, src_r)),
            Some(r) if r.width != 0 && r.height != 0 => {
                // map the visible part back into source space proportionally
                let sx = |x: i32| src_r.x as f32 + (x - dst_r.x) as f32 / dst_r.width as f32 * src_r.width as f32;
                let sy = |y: i32| src_r.y as f32 + (y - dst_r.y) as f32 / dst_r.height as f32 * src_r.height as f32;
                let (x0, y0) = (sx(r.x), sy(r.y));
                let (x1, y1) = (sx(r.x + r.width), sy(r.y + r.height));
                Some((r, Recti::new(x0 as _, y0 as _, (x1 - x0) as _, (y1 - y0) as _)))
            }
            _ => None,
        }
    }

    /// Pushes textured quads referencing the atlas.
    pub fn push_rects(&mut self, rects: &[(Recti, Recti, Color)]) {
        let dim = self.atlas.get_texture_dimension();
        let (aw, ah) = (dim.width as f32, dim.height as f32);
        for (dst, src, color) in rects {
            if let Some((dst, src)) = Self::clip_rect(*dst, *src, self.clip) {
                let uv = (
                    src.x as f32 / aw,
                    src.y as f32 / ah,
                    (src.x + src.width) as f32 / aw,
                    (src.y + src.height) as f32 / ah,
                );
                let [v0, v1, v2, v3] = quad(dst, uv, *color);
                self.renderer.push_quad_vertices(&v0, &v1, &v2, &v3);
            }
        }
    }

    /// Draws a solid colored rectangle.
    pub fn draw_rect(&mut self, r: Recti, color: Color) {
        let white = self.atlas.get_white_rect();
        self.push_rects(&[(r, white, color)]);
    }

    /// Draws UTF-8 text with its top-left corner at `pos`.
    pub fn draw_chars(&mut self, font: FontId, text: &str, pos: Vec2i, color: Color) {
        let mut batch = std::mem::take(&mut self.rect_batch);
        batch.clear();
        self.atlas.draw_string(font, text, |_, _, dst, src| {
            batch.push((Recti::new(pos.x + dst.x, pos.y + dst.y, dst.width, dst.height), src, color));
        });
        self.push_rects(&batch);
        self.rect_batch = batch;
    }

    /// Uploads raw RGBA pixels as a renderer-owned texture.
    pub fn load_texture_rgba(&mut self, width: i32, height: i32, pixels: &[u8]) -> TextureId {
        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(id, TextureInfo { width, height });
        self.renderer.create_texture(id, width, height, pixels);
        id
    }

    /// Destroys a texture allocated via [`Canvas::load_texture_rgba`]. Unknown ids are ignored.
    pub fn free_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.renderer.destroy_texture(id);
        }
    }

    /// Draws a whole texture stretched over `r`, tinted by `color`.
    pub fn draw_texture(&mut self, texture: TextureId, r: Recti, color: Color) {
        let Some(info) = self.textures.get(&texture).copied() else {
            return;
        };
        let src = Recti::new(0, 0, info.width, info.height);
        if let Some((dst, src)) = Self::clip_rect(r, src, self.clip) {
            let (tw, th) = (info.width as f32, info.height as f32);
            let uv = (
                src.x as f32 / tw,
                src.y as f32 / th,
                (src.x + src.width) as f32 / tw,
                (src.y + src.height) as f32 / th,
            );
            self.renderer.draw_texture(texture, quad(dst, uv, color));
        }
    }

    /// Begins a new drawing pass; the viewport becomes the clip rectangle.
    pub fn begin(&mut self, width: i32, height: i32, clr: Color) {
        self.clip = Recti::new(0, 0, width, height);
        self.renderer.begin(width, height, clr);
    }

    /// Ends the current drawing pass.
    pub fn end(&mut self) { self.renderer.end() }

    /// Flushes any buffered geometry without ending the frame.
    pub fn flush(&mut self) { self.renderer.flush() }
}

impl<R: Renderer> Drop for Canvas<R> {
    fn drop(&mut self) {
        for (id, _) in self.textures.drain() {
            self.renderer.destroy_texture(id);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub(crate) struct Log {
        pub quads: Vec<[Vertex; 4]>,
        pub created: Vec<(TextureId, i32, i32)>,
        pub destroyed: Vec<TextureId>,
        pub textured: Vec<TextureId>,
    }

    /// Records every call so tests can inspect what reached the backend.
    pub(crate) struct RecordingRenderer {
        pub atlas: AtlasHandle,
        pub log: Rc<RefCell<Log>>,
    }

    impl Renderer for RecordingRenderer {
        fn get_atlas(&self) -> AtlasHandle { self.atlas.clone() }
        fn begin(&mut self, _width: i32, _height: i32, _clr: Color) {}
        fn push_quad_vertices(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, v3: &Vertex) { self.log.borrow_mut().quads.push([*v0, *v1, *v2, *v3]); }
        fn flush(&mut self) {}
        fn end(&mut self) {}
        fn create_texture(&mut self, id: TextureId, width: i32, height: i32, _pixels: &[u8]) { self.log.borrow_mut().created.push((id, width, height)); }
        fn destroy_texture(&mut self, id: TextureId) { self.log.borrow_mut().destroyed.push(id); }
        fn draw_texture(&mut self, id: TextureId, _vertices: [Vertex; 4]) { self.log.borrow_mut().textured.push(id); }
    }

    pub(crate) fn recording_canvas() -> (Canvas<RecordingRenderer>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let renderer = RecordingRenderer {
            atlas: crate::atlas::tests::make_test_atlas(),
            log: log.clone(),
        };
        (Canvas::new(renderer, Dimensioni::new(100, 100)), log)
    }

    fn assert_rect_eq(actual: Recti, expected: Recti) {
        assert_eq!(
            (actual.x, actual.y, actual.width, actual.height),
            (expected.x, expected.y, expected.width, expected.height)
        );
    }

    #[test]
    fn clip_rect_passthrough() {
        let dst = Recti::new(0, 0, 10, 10);
        let src = Recti::new(5, 5, 10, 10);
        let res = Canvas::<RecordingRenderer>::clip_rect(dst, src, Recti::new(0, 0, 20, 20)).unwrap();
        assert_rect_eq(res.0, dst);
        assert_rect_eq(res.1, src);
    }

    #[test]
    fn clip_rect_partial() {
        let dst = Recti::new(0, 0, 100, 100);
        let src = Recti::new(0, 0, 50, 50);
        let res = Canvas::<RecordingRenderer>::clip_rect(dst, src, Recti::new(20, 20, 40, 40)).unwrap();
        assert_rect_eq(res.0, Recti::new(20, 20, 40, 40));
        assert_rect_eq(res.1, Recti::new(10, 10, 20, 20));
    }

    #[test]
    fn clip_rect_none() {
        let r = Recti::new(0, 0, 10, 10);
        assert!(Canvas::<RecordingRenderer>::clip_rect(r, r, Recti::new(50, 50, 10, 10)).is_none());
    }

    #[test]
    fn draw_rect_emits_one_quad_with_color() {
        let (mut canvas, log) = recording_canvas();
        canvas.draw_rect(rect(10, 20, 30, 40), color(1, 2, 3, 4));
        let log = log.borrow();
        assert_eq!(log.quads.len(), 1);
        let [v0, _, v2, _] = log.quads[0];
        assert_eq!((v0.position().x, v0.position().y), (10.0, 20.0));
        assert_eq!((v2.position().x, v2.position().y), (40.0, 60.0));
        assert_eq!(v0.color().w, 4);
    }

    #[test]
    fn offscreen_rect_is_dropped() {
        let (mut canvas, log) = recording_canvas();
        canvas.draw_rect(rect(200, 200, 5, 5), Color::BLACK);
        assert!(log.borrow().quads.is_empty());
    }

    #[test]
    fn textures_are_released_once() {
        let (mut canvas, log) = recording_canvas();
        let a = canvas.load_texture_rgba(2, 2, &[0; 16]);
        let b = canvas.load_texture_rgba(1, 1, &[0; 4]);
        assert_ne!(a, b);
        canvas.free_texture(a);
        canvas.free_texture(a);
        canvas.draw_texture(a, rect(0, 0, 2, 2), Color::WHITE);
        canvas.draw_texture(b, rect(0, 0, 2, 2), Color::WHITE);
        drop(canvas);
        let log = log.borrow();
        assert_eq!(log.destroyed, vec![a, b]);
        assert_eq!(log.textured, vec![b]);
    }
}
