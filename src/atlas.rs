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
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::rc::Rc;

use png::{BitDepth, ColorType, Decoder, Transformations};

use crate::packer::{self, Packer};
use crate::*;

#[derive(Debug, Clone)]
/// Metrics and atlas coordinates for a glyph.
pub struct CharEntry {
    /// Pixel offset relative to the draw origin.
    pub offset: Vec2i,
    /// Horizontal advance after drawing this glyph.
    pub advance: Vec2i,
    /// Rectangle inside the atlas texture.
    pub rect: Recti, // coordinates in the atlas
}

#[derive(Clone)]
struct Font {
    line_size: usize,                  // line size
    baseline: i32,                     // distance from top of line to baseline
    font_size: usize,                  // font size in pixels
    spacing: i32,                      // extra pixels between glyphs
    entries: HashMap<char, CharEntry>, // printable ascii plus requested extras
}

impl Debug for Font {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Font {{ line_size: {}, baseline: {}, font_size: {}, glyphs: {} }}",
            self.line_size,
            self.baseline,
            self.font_size,
            self.entries.len()
        ))
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Handle referencing a font stored in the atlas.
pub struct FontId(usize);

struct Atlas {
    width: usize,
    height: usize,
    pixels: Vec<Color4b>,
    fonts: Vec<Font>,
    white: Recti,
}

#[derive(Clone)]
/// Shared handle exposing read access to the atlas.
pub struct AtlasHandle(Rc<RefCell<Atlas>>);

/// Pixel spacing a font of `size` pixels puts between glyphs.
fn glyph_spacing(size: usize) -> i32 { (size / 24) as i32 }

/// Decodes PNG bytes into 32-bit pixels.
/// Grayscale and RGB inputs are expanded to opaque RGBA (alpha = 255).
pub fn load_image_bytes(bytes: &[u8]) -> Result<(usize, usize, Vec<Color4b>)> {
    let mut cursor = Cursor::new(bytes);
    let mut decoder = Decoder::new(&mut cursor);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(|e| Error::Image(format!("PNG decode error: {}", e)))?;
    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| Error::Image("PNG decoder did not report output size".into()))?;
    let mut img_data = vec![0; buf_size];
    let info = reader
        .next_frame(&mut img_data)
        .map_err(|e| Error::Image(format!("PNG frame error: {}", e)))?;

    if info.bit_depth != BitDepth::Eight {
        return Err(Error::Image(format!("Unsupported PNG bit depth: {:?}", info.bit_depth)));
    }

    let pixel_size = match info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Indexed => return Err(Error::Image("Indexed PNGs are not supported".into())),
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
    };

    let mut pixels = Vec::with_capacity((info.width * info.height) as usize);
    for y in 0..info.height as usize {
        let line = &img_data[y * info.line_size..(y + 1) * info.line_size];
        for px in line.chunks_exact(pixel_size).take(info.width as usize) {
            let color = match info.color_type {
                ColorType::Grayscale => color4b(px[0], px[0], px[0], 0xFF),
                ColorType::GrayscaleAlpha => color4b(px[0], px[0], px[0], px[1]),
                ColorType::Rgb => color4b(px[0], px[1], px[2], 0xFF),
                _ => color4b(px[0], px[1], px[2], px[3]),
            };
            pixels.push(color);
        }
    }

    Ok((info.width as _, info.height as _, pixels))
}

/// Reads and decodes a PNG file, returning its size and RGBA8888 bytes.
pub fn load_image_file(path: &str) -> Result<(usize, usize, Vec<u8>)> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| Error::io(path, e))?;
    let (width, height, pixels) = load_image_bytes(&bytes)?;
    Ok((width, height, rgba_bytes(&pixels)))
}

/// Flattens 32-bit pixels into an RGBA8888 byte buffer.
pub fn rgba_bytes(pixels: &[Color4b]) -> Vec<u8> { pixels.iter().flat_map(|c| [c.x, c.y, c.z, c.w]).collect() }

/// Incrementally constructs an atlas by packing a white tile and font glyphs.
pub struct AtlasBuilder {
    packer: Packer,
    atlas: Atlas,
}

impl AtlasBuilder {
    /// Creates a builder for a texture of the given size; the solid white tile is reserved first.
    pub fn new(texture_width: usize, texture_height: usize) -> Result<Self> {
        let packer = Packer::new(packer::Config {
            width: texture_width as _,
            height: texture_height as _,
            border_padding: 1,
            rectangle_padding: 1,
        });
        let atlas = Atlas {
            width: texture_width,
            height: texture_height,
            pixels: vec![Color4b::default(); texture_width * texture_height],
            fonts: Vec::new(),
            white: Recti::new(0, 0, 0, 0),
        };
        let mut builder = Self { packer, atlas };
        // sample the center texel so bilinear filtering never reaches the padding
        let tile = builder.add_tile(3, 3, &[color4b(0xFF, 0xFF, 0xFF, 0xFF); 9])?;
        builder.atlas.white = Recti::new(tile.x + 1, tile.y + 1, 1, 1);
        Ok(builder)
    }

    /// Loads a TrueType font from disk and rasterizes it at `size` pixels.
    pub fn add_font(&mut self, path: &str, size: usize, extra_chars: &[char]) -> Result<FontId> {
        let mut data = Vec::new();
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut data))
            .map_err(|e| Error::io(path, e))?;
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default()).map_err(|reason| Error::Font {
            path: path.to_string(),
            reason: reason.to_string(),
        })?;
        self.add_fontdue(&format_path(path), &font, size, extra_chars)
    }

    /// Rasterizes printable ASCII plus `extra_chars` of an already parsed font.
    pub fn add_fontdue(&mut self, name: &str, font: &fontdue::Font, size: usize, extra_chars: &[char]) -> Result<FontId> {
        let mut entries = HashMap::new();
        let ascii = (32u8..127).map(|c| c as char);
        for ch in ascii.chain(extra_chars.iter().copied()) {
            if entries.contains_key(&ch) {
                continue;
            }
            if !ch.is_ascii() && font.lookup_glyph_index(ch) == 0 {
                log::warn!("font '{}' has no glyph for U+{:04X}", name, ch as u32);
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, size as f32);
            let glyph = bitmap.iter().map(|c| color4b(0xFF, 0xFF, 0xFF, *c)).collect::<Vec<Color4b>>();
            let rect = self.add_tile(metrics.width, metrics.height, &glyph)?;
            entries.insert(
                ch,
                CharEntry {
                    offset: Vec2i::new(metrics.xmin, metrics.ymin),
                    advance: Vec2i::new(metrics.advance_width.round() as _, metrics.advance_height.round() as _),
                    rect,
                },
            );
        }

        let line_metrics = font.horizontal_line_metrics(size as f32);
        let line_size = line_metrics.as_ref().map(|m| m.new_line_size.round() as usize).unwrap_or(size);
        let baseline = line_metrics.as_ref().map(|m| m.ascent.round() as i32).unwrap_or(line_size as i32);
        let id = FontId(self.atlas.fonts.len());
        log::debug!("font '{}' at {}px: {} glyphs, line size {}", name, size, entries.len(), line_size);
        self.atlas.fonts.push(Font {
            line_size,
            baseline,
            font_size: size,
            spacing: glyph_spacing(size),
            entries,
        });
        Ok(id)
    }

    fn add_tile(&mut self, width: usize, height: usize, pixels: &[Color4b]) -> Result<Recti> {
        if width == 0 || height == 0 {
            return Ok(Recti::new(0, 0, 0, 0));
        }
        let r = self.packer.pack(width as _, height as _).ok_or(Error::Atlas {
            width: self.atlas.width,
            height: self.atlas.height,
        })?;
        for y in 0..height {
            for x in 0..width {
                let index = r.x as usize + x + (r.y as usize + y) * self.atlas.width;
                self.atlas.pixels[index] = pixels[x + y * width];
            }
        }
        Ok(r)
    }

    /// Consumes the builder and returns an [`AtlasHandle`].
    pub fn to_atlas(self) -> AtlasHandle { AtlasHandle(Rc::new(RefCell::new(self.atlas))) }
}

fn format_path(path: &str) -> String {
    let p = Path::new(path);
    p.file_stem().and_then(|n| n.to_str()).unwrap_or(path).to_string()
}

/// Describes a font baked into an [`AtlasSource`].
pub struct FontEntry<'a> {
    /// Distance between baselines in pixels.
    pub line_size: usize,
    /// Offset from the top of the line to the baseline.
    pub baseline: i32,
    /// Requested pixel size.
    pub font_size: usize,
    /// Glyph metadata table.
    pub entries: &'a [(char, CharEntry)],
}

/// In-memory description of an atlas: raw RGBA pixels plus glyph tables.
pub struct AtlasSource<'a> {
    /// Width of the atlas texture.
    pub width: usize,
    /// Height of the atlas texture.
    pub height: usize,
    /// RGBA8888 pixel data.
    pub pixels: &'a [u8],
    /// Rectangle of an opaque white texel used for solid fills.
    pub white: Recti,
    /// Fonts baked into the atlas.
    pub fonts: &'a [FontEntry<'a>],
}

impl AtlasHandle {
    /// Reconstructs an atlas from an [`AtlasSource`].
    pub fn try_from(source: &AtlasSource<'_>) -> Result<Self> {
        let expected = source.width * source.height * 4;
        if source.pixels.len() != expected {
            return Err(Error::Image(format!("Expected {} RGBA bytes, found {}", expected, source.pixels.len())));
        }
        let pixels = source.pixels.chunks_exact(4).map(|c| color4b(c[0], c[1], c[2], c[3])).collect();
        let fonts = source
            .fonts
            .iter()
            .map(|f| Font {
                line_size: f.line_size,
                baseline: f.baseline,
                font_size: f.font_size,
                spacing: glyph_spacing(f.font_size),
                entries: f.entries.iter().cloned().collect(),
            })
            .collect();
        Ok(Self(Rc::new(RefCell::new(Atlas {
            width: source.width,
            height: source.height,
            pixels,
            fonts,
            white: source.white,
        }))))
    }

    /// Returns the atlas texture width in pixels.
    pub fn width(&self) -> usize { self.0.borrow().width }

    /// Returns the atlas texture height in pixels.
    pub fn height(&self) -> usize { self.0.borrow().height }

    /// Executes a closure with shared access to the atlas pixels.
    pub fn apply_pixels<F: FnMut(usize, usize, &[Color4b])>(&self, mut f: F) {
        let s = self.0.borrow();
        f(s.width, s.height, &s.pixels);
    }

    /// Returns the line height for the specified font.
    pub fn get_font_height(&self, font: FontId) -> usize { self.0.borrow().fonts[font.0].line_size }

    /// Returns the atlas rectangle of the solid white texel.
    pub fn get_white_rect(&self) -> Recti { self.0.borrow().white }

    /// Returns the atlas texture dimensions.
    pub fn get_texture_dimension(&self) -> Dimensioni {
        let atlas = self.0.borrow();
        Dimensioni::new(atlas.width as _, atlas.height as _)
    }

    /// Walks glyphs applying baseline-aware placement.
    fn walk_glyphs<F>(&self, font: FontId, text: &str, mut f: F)
    where
        F: FnMut(char, Vec2i, Recti, Recti),
    {
        let atlas = self.0.borrow();
        let font = &atlas.fonts[font.0];
        let mut dst = Recti::new(0, 0, 0, 0);
        let mut pen_x = 0;

        for chr in text.chars() {
            let src = font.entries.get(&chr).or_else(|| font.entries.get(&'_')).cloned().unwrap_or(CharEntry {
                offset: Vec2i::new(0, 0),
                advance: Vec2i::new(8, 0),
                rect: Recti::new(0, 0, 0, 0),
            });

            dst.width = src.rect.width;
            dst.height = src.rect.height;
            dst.x = pen_x + src.offset.x;
            dst.y = font.baseline - src.offset.y - src.rect.height;

            f(chr, src.advance, dst, src.rect);
            pen_x += src.advance.x + font.spacing;
        }
    }

    /// Walks each glyph in the string and invokes the closure with draw information.
    pub fn draw_string<DrawFunction: FnMut(char, Vec2i, Recti, Recti)>(&self, font: FontId, text: &str, f: DrawFunction) { self.walk_glyphs(font, text, f); }

    /// Measures the extent of a single line of text: advances plus inter-glyph spacing, one line high.
    pub fn get_text_size(&self, font: FontId, text: &str) -> Dimensioni {
        let mut width = 0;
        let mut pen_x = 0;
        let mut glyphs = 0;
        let spacing = self.0.borrow().fonts[font.0].spacing;
        self.walk_glyphs(font, text, |_, advance, dst, _| {
            glyphs += 1;
            width = width.max(dst.x + dst.width);
            pen_x += advance.x + spacing;
        });
        if glyphs == 0 {
            return Dimensioni::new(0, 0);
        }
        width = width.max(pen_x - spacing);
        Dimensioni::new(width, self.get_font_height(font) as i32)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use png::Encoder;

    fn entry(advance: i32) -> CharEntry {
        CharEntry {
            offset: Vec2i::new(0, 0),
            advance: Vec2i::new(advance, 0),
            rect: Recti::new(0, 0, 1, 1),
        }
    }

    /// Tiny atlas with one 24px font: ASCII glyphs advance 10px, ▲ advances 14px.
    pub(crate) fn make_test_atlas() -> AtlasHandle {
        let pixels = [0xFF; 4];
        let mut entries: Vec<(char, CharEntry)> = (32u8..127).map(|c| (c as char, entry(10))).collect();
        entries.push(('▲', entry(14)));
        let fonts = [FontEntry {
            line_size: 20,
            baseline: 16,
            font_size: 24,
            entries: &entries,
        }];
        let source = AtlasSource {
            width: 1,
            height: 1,
            pixels: &pixels,
            white: Recti::new(0, 0, 1, 1),
            fonts: &fonts,
        };
        AtlasHandle::try_from(&source).unwrap()
    }

    pub(crate) fn encode_png(color_type: ColorType, data: &[u8], width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, width, height);
            encoder.set_color(color_type);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buffer
    }

    #[test]
    fn png_decode_error_returns_err() {
        assert!(matches!(load_image_bytes(&[]), Err(Error::Image(_))));
    }

    #[test]
    fn png_decode_rgb_expands_alpha() {
        let bytes = encode_png(ColorType::Rgb, &[10, 20, 30, 40, 50, 60], 2, 1);
        let (width, height, pixels) = load_image_bytes(&bytes).unwrap();
        assert_eq!((width, height), (2, 1));
        assert_eq!(rgba_bytes(&pixels), vec![10, 20, 30, 0xFF, 40, 50, 60, 0xFF]);
    }

    #[test]
    fn png_decode_gray_alpha() {
        let bytes = encode_png(ColorType::GrayscaleAlpha, &[7, 128], 1, 1);
        let (_, _, pixels) = load_image_bytes(&bytes).unwrap();
        assert_eq!(rgba_bytes(&pixels), vec![7, 7, 7, 128]);
    }

    #[test]
    fn missing_image_file_is_io_error() {
        assert!(matches!(load_image_file("/nonexistent/icon.png"), Err(Error::Io { .. })));
    }

    #[test]
    fn text_size_counts_spacing_between_glyphs() {
        let atlas = make_test_atlas();
        let font = FontId::default();
        // 24px font: one pixel between glyphs
        assert_eq!(atlas.get_text_size(font, "M").width, 10);
        assert_eq!(atlas.get_text_size(font, "MM").width, 21);
        assert_eq!(atlas.get_text_size(font, "▲").width, 14);
        assert_eq!(atlas.get_text_size(font, "ab").height, 20);
        let empty = atlas.get_text_size(font, "");
        assert_eq!((empty.width, empty.height), (0, 0));
    }

    #[test]
    fn unknown_glyph_falls_back_to_underscore() {
        let atlas = make_test_atlas();
        let font = FontId::default();
        assert_eq!(atlas.get_text_size(font, "ж").width, atlas.get_text_size(font, "_").width);
    }

    #[test]
    fn builder_reserves_white_texel() {
        let atlas = AtlasBuilder::new(32, 32).unwrap().to_atlas();
        let white = atlas.get_white_rect();
        assert_eq!((white.width, white.height), (1, 1));
        let mut texel = Color4b::default();
        atlas.apply_pixels(|width, _, pixels| texel = pixels[white.x as usize + white.y as usize * width]);
        assert_eq!((texel.x, texel.y, texel.z, texel.w), (0xFF, 0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn builder_rejects_tiny_texture() {
        assert!(matches!(AtlasBuilder::new(2, 2), Err(Error::Atlas { .. })));
    }
}
