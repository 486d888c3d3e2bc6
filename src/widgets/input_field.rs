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
use super::text_edit::{TextEdit, TextEditOutcome};
use crate::{Color, FontId, Key};

/// Single-line text field limited to `max_chars` code points drawn from `allowed`.
#[derive(Clone, Debug)]
pub struct InputField {
    text: String,
    max_chars: usize,
    allowed: String,
    /// Text color.
    pub text_color: Color,
    /// Font used for the text and for sizing.
    pub font: FontId,
    edit: Option<TextEdit>,
}

impl InputField {
    /// Creates an empty field. An empty `allowed` set accepts any character.
    pub fn new(max_chars: usize, allowed: &str, font: FontId, text_color: Color) -> Self {
        Self {
            text: String::new(),
            max_chars,
            allowed: allowed.to_string(),
            text_color,
            font,
            edit: None,
        }
    }

    /// Returns the stored value.
    pub fn text(&self) -> &str { &self.text }

    /// Replaces the stored value; an active edit moves its cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        if let Some(edit) = self.edit.as_mut() {
            *edit = TextEdit::at_end(&self.text);
        }
    }

    /// Maximum number of code points the field accepts.
    pub fn max_chars(&self) -> usize { self.max_chars }

    /// Returns the editing view while the field owns keyboard focus.
    pub fn edit(&self) -> Option<&TextEdit> { self.edit.as_ref() }

    /// Returns `true` while the field owns keyboard focus.
    pub fn is_editing(&self) -> bool { self.edit.is_some() }

    pub(crate) fn begin_edit(&mut self) {
        if self.edit.is_none() {
            self.edit = Some(TextEdit::at_end(&self.text));
        }
    }

    pub(crate) fn end_edit(&mut self) { self.edit = None; }

    pub(crate) fn apply(&mut self, keys: &[Key], codepoints: &[u32]) -> TextEditOutcome {
        match self.edit.as_mut() {
            Some(edit) => edit.apply(&mut self.text, keys, codepoints, self.max_chars, &self.allowed),
            None => TextEditOutcome::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_only_reach_an_editing_field() {
        let mut field = InputField::new(3, "0123456789", FontId::default(), Color::BLACK);
        field.apply(&[], &['4' as u32]);
        assert_eq!(field.text(), "");
        field.begin_edit();
        field.apply(&[], &['4' as u32, '2' as u32]);
        assert_eq!(field.text(), "42");
        field.end_edit();
        assert!(!field.is_editing());
    }

    #[test]
    fn set_text_while_editing_keeps_cursor_valid() {
        let mut field = InputField::new(3, "", FontId::default(), Color::BLACK);
        field.set_text("€€");
        field.begin_edit();
        field.set_text("1");
        assert_eq!(field.edit().map(|e| e.cursor()), Some(1));
        field.apply(&[Key::Backspace], &[]);
        assert_eq!(field.text(), "");
    }
}
