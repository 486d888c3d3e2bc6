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
//! Skyline packing of glyph and icon tiles into the atlas texture.

use crate::*;

/// Describes size and padding requirements of rectangle packing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Config {
    /// Width of the encompassing rectangle.
    pub width: i32,
    /// Height of the encompassing rectangle.
    pub height: i32,
    /// Minimum spacing between border and rectangles.
    pub border_padding: i32,
    /// Minimum spacing between rectangles.
    pub rectangle_padding: i32,
}

#[derive(Copy, Clone, Debug)]
struct Skyline {
    left: i32,
    y: i32,
    width: i32,
}

impl Skyline {
    #[inline(always)]
    fn right(&self) -> i32 { self.left + self.width }
}

/// Places rectangles bottom-left along a skyline; each tile goes where its top edge ends lowest.
pub(crate) struct Packer {
    config: Config,
    width: i32,
    height: i32,
    // sorted by `left`, always covering [0, width)
    skylines: Vec<Skyline>,
}

impl Packer {
    pub fn new(config: Config) -> Self {
        let width = (config.width + config.rectangle_padding - 2 * config.border_padding).max(0);
        let height = (config.height + config.rectangle_padding - 2 * config.border_padding).max(0);
        Self { config, width, height, skylines: vec![Skyline { left: 0, y: 0, width }] }
    }

    /// Returns the position of the new tile, or `None` once the texture is full.
    pub fn pack(&mut self, width: i32, height: i32) -> Option<Recti> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let w = width + self.config.rectangle_padding;
        let h = height + self.config.rectangle_padding;

        let mut best: Option<(usize, i32)> = None;
        for i in 0..self.skylines.len() {
            if let Some(y) = self.fit(i, w, h) {
                match best {
                    Some((_, best_y)) if best_y <= y => (),
                    _ => best = Some((i, y)),
                }
            }
        }

        let (index, y) = best?;
        let left = self.skylines[index].left;
        self.split(index, Skyline { left, y: y + h, width: w });
        self.merge();
        Some(Recti::new(left + self.config.border_padding, y + self.config.border_padding, width, height))
    }

    fn fit(&self, index: usize, w: i32, h: i32) -> Option<i32> {
        let left = self.skylines[index].left;
        if left + w > self.width {
            return None;
        }
        let mut y = 0;
        let mut remaining = w;
        let mut i = index;
        while remaining > 0 {
            let sky = self.skylines.get(i)?;
            y = y.max(sky.y);
            if y + h > self.height {
                return None;
            }
            remaining -= sky.width;
            i += 1;
        }
        Some(y)
    }

    fn split(&mut self, index: usize, sky: Skyline) {
        self.skylines.insert(index, sky);
        let right = sky.right();
        let i = index + 1;
        while i < self.skylines.len() {
            let next = &mut self.skylines[i];
            if next.left >= right {
                break;
            }
            let shrink = right - next.left;
            if shrink >= next.width {
                self.skylines.remove(i);
            } else {
                next.left += shrink;
                next.width -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                self.skylines[i - 1].width += self.skylines[i].width;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: &Recti, b: &Recti) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn packed_tiles_stay_inside_and_apart() {
        let mut packer = Packer::new(Config { width: 64, height: 64, border_padding: 1, rectangle_padding: 1 });
        let mut placed = Vec::new();
        for (w, h) in [(10, 12), (20, 5), (7, 7), (30, 9), (3, 18), (12, 12)] {
            let r = packer.pack(w, h).expect("tile fits");
            assert_eq!((r.width, r.height), (w, h));
            assert!(r.x >= 1 && r.y >= 1);
            assert!(r.x + r.width <= 63 && r.y + r.height <= 63);
            placed.push(r);
        }
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn oversized_tile_is_rejected() {
        let mut packer = Packer::new(Config { width: 16, height: 16, border_padding: 1, rectangle_padding: 1 });
        assert!(packer.pack(20, 4).is_none());
        assert!(packer.pack(0, 4).is_none());
        assert!(packer.pack(8, 8).is_some());
    }

    #[test]
    fn full_texture_reports_none() {
        let mut packer = Packer::new(Config { width: 10, height: 10, border_padding: 0, rectangle_padding: 0 });
        assert!(packer.pack(10, 5).is_some());
        assert!(packer.pack(10, 5).is_some());
        assert!(packer.pack(1, 1).is_none());
    }
}
