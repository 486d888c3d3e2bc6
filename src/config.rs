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

/// Environment variable overriding [`Config::font_regular`].
pub const ENV_FONT_REGULAR: &str = "BMICALC_FONT_REGULAR";
/// Environment variable overriding [`Config::font_bold`].
pub const ENV_FONT_BOLD: &str = "BMICALC_FONT_BOLD";
/// Environment variable overriding [`Config::icon`].
pub const ENV_ICON: &str = "BMICALC_ICON";

/// Startup settings of the calculator window.
#[derive(Clone, Debug)]
pub struct Config {
    /// Window title.
    pub title: String,
    /// Client area width in pixels.
    pub width: u32,
    /// Client area height in pixels.
    pub height: u32,
    /// Frame rate cap.
    pub fps: u32,
    /// Clear color of the window.
    pub background: Color,
    /// PNG used as window icon; a missing file only logs a warning.
    pub icon: String,
    /// TrueType font for labels, inputs and buttons.
    pub font_regular: String,
    /// TrueType font for the result line.
    pub font_bold: String,
    /// Rasterization size of both fonts in pixels.
    pub font_size: usize,
    /// Side of the square atlas texture.
    pub atlas_size: usize,
    /// Glyphs rasterized besides printable ASCII.
    pub extra_chars: Vec<char>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "BMI Calculator".into(),
            width: 380,
            height: 270,
            fps: 30,
            background: color(230, 230, 230, 255),
            icon: "icon.png".into(),
            font_regular: "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf".into(),
            font_bold: "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf".into(),
            font_size: 32,
            atlas_size: 512,
            extra_chars: vec!['²', '▲', '▼'],
        }
    }
}

impl Config {
    /// Defaults with font and icon paths taken from the environment when set.
    pub fn from_env() -> Self { Self::default().with_overrides(|key| std::env::var(key).ok()) }

    /// Applies path overrides looked up through `lookup`; empty values are ignored.
    pub fn with_overrides<F: Fn(&str) -> Option<String>>(mut self, lookup: F) -> Self {
        for (key, slot) in [
            (ENV_FONT_REGULAR, &mut self.font_regular),
            (ENV_FONT_BOLD, &mut self.font_bold),
            (ENV_ICON, &mut self.icon),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                log::info!("{} = {}", key, value);
                *slot = value;
            }
        }
        self
    }

    /// Milliseconds between frames at the configured rate.
    pub fn frame_millis(&self) -> u64 { 1000 / u64::from(self.fps.max(1)) }

    /// Rasterizes the configured fonts into a fresh atlas.
    pub fn build_atlas(&self) -> Result<(AtlasHandle, Fonts)> {
        let mut builder = AtlasBuilder::new(self.atlas_size, self.atlas_size)?;
        let regular = builder.add_font(&self.font_regular, self.font_size, &self.extra_chars)?;
        let bold = builder.add_font(&self.font_bold, self.font_size, &self.extra_chars)?;
        Ok((builder.to_atlas(), Fonts { regular, bold }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_calculator_window() {
        let config = Config::default();
        assert_eq!((config.width, config.height), (380, 270));
        assert_eq!(config.frame_millis(), 33);
        assert_eq!(config.background, color(230, 230, 230, 255));
        assert!(config.extra_chars.contains(&'²'));
    }

    #[test]
    fn overrides_replace_paths() {
        let config = Config::default().with_overrides(|key| match key {
            ENV_FONT_BOLD => Some("/tmp/bold.ttf".to_string()),
            ENV_ICON => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.font_bold, "/tmp/bold.ttf");
        assert_eq!(config.icon, "icon.png");
        assert!(config.font_regular.ends_with("LiberationSans-Regular.ttf"));
    }

    #[test]
    fn missing_font_is_reported() {
        let config = Config {
            font_regular: "/nonexistent/font.ttf".into(),
            ..Config::default()
        };
        assert!(matches!(config.build_atlas(), Err(Error::Io { .. })));
    }
}
