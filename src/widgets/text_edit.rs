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
use crate::Key;

fn delete_prev(buf: &mut String, cursor: &mut usize) -> bool {
    if *cursor == 0 || buf.is_empty() {
        return false;
    }
    let end = (*cursor).min(buf.len());
    let start = move_left(buf, end);
    buf.replace_range(start..end, "");
    *cursor = start;
    true
}

fn delete_next(buf: &mut String, cursor: usize) -> bool {
    if cursor >= buf.len() {
        return false;
    }
    let end = move_right(buf, cursor);
    buf.replace_range(cursor..end, "");
    true
}

fn move_left(buf: &str, cursor: usize) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut new_cursor = cursor - 1;
    while new_cursor > 0 && !buf.is_char_boundary(new_cursor) {
        new_cursor -= 1;
    }
    new_cursor
}

fn move_right(buf: &str, cursor: usize) -> usize {
    if cursor >= buf.len() {
        return buf.len();
    }
    let mut new_cursor = cursor + 1;
    while new_cursor < buf.len() && !buf.is_char_boundary(new_cursor) {
        new_cursor += 1;
    }
    new_cursor
}

/// Encodes a raw code point; surrogates and values past U+10FFFF yield `None`.
pub(crate) fn encode_codepoint(cp: u32, out: &mut [u8; 4]) -> Option<&str> {
    char::from_u32(cp).map(|c| &*c.encode_utf8(out))
}

/// Transient editing view over an input buffer. Only the cursor lives here;
/// the buffer itself never carries a cursor marker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextEdit {
    cursor: usize,
}

/// Result of feeding one frame of keys and code points to a [`TextEdit`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextEditOutcome {
    pub changed: bool,
    pub submit: bool,
}

impl TextEdit {
    /// Starts editing with the cursor at the end of `buf`.
    pub fn at_end(buf: &str) -> Self { Self { cursor: buf.len() } }

    /// Byte offset of the cursor; always on a char boundary.
    pub fn cursor(&self) -> usize { self.cursor }

    /// Inserts `cp` at the cursor unless it is invalid, outside `allowed`
    /// (when non-empty), or the buffer already holds `max_chars` code points.
    pub fn insert(&mut self, buf: &mut String, cp: u32, max_chars: usize, allowed: &str) -> bool {
        let mut scratch = [0u8; 4];
        let Some(encoded) = encode_codepoint(cp, &mut scratch) else {
            return false;
        };
        if !allowed.is_empty() && !allowed.contains(encoded) {
            return false;
        }
        if buf.chars().count() >= max_chars {
            return false;
        }
        let at = self.cursor.min(buf.len());
        buf.insert_str(at, encoded);
        self.cursor = at + encoded.len();
        true
    }

    /// Applies editing keys first, then typed code points, in arrival order.
    /// `Return` stops processing and reports a submit.
    pub(crate) fn apply(&mut self, buf: &mut String, keys: &[Key], codepoints: &[u32], max_chars: usize, allowed: &str) -> TextEditOutcome {
        let mut outcome = TextEditOutcome::default();
        self.cursor = self.cursor.min(buf.len());

        for key in keys {
            match key {
                Key::Backspace => outcome.changed |= delete_prev(buf, &mut self.cursor),
                Key::Delete => outcome.changed |= delete_next(buf, self.cursor),
                Key::Left => self.cursor = move_left(buf, self.cursor),
                Key::Right => self.cursor = move_right(buf, self.cursor),
                Key::Home => self.cursor = 0,
                Key::End => self.cursor = buf.len(),
                Key::Return => {
                    outcome.submit = true;
                    return outcome;
                }
            }
        }

        for cp in codepoints {
            outcome.changed |= self.insert(buf, *cp, max_chars, allowed);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_removes_whole_multibyte_char() {
        let mut buf = String::from("a²€");
        let mut edit = TextEdit::at_end(&buf);
        let out = edit.apply(&mut buf, &[Key::Backspace], &[], 10, "");
        assert!(out.changed);
        assert_eq!(buf, "a²");
        assert_eq!(edit.cursor(), buf.len());
        edit.apply(&mut buf, &[Key::Backspace], &[], 10, "");
        assert_eq!(buf, "a");
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop() {
        let mut buf = String::new();
        let mut edit = TextEdit::at_end(&buf);
        assert!(!edit.apply(&mut buf, &[Key::Backspace], &[], 3, "").changed);
    }

    #[test]
    fn disallowed_char_is_discarded() {
        let mut buf = String::from("12");
        let mut edit = TextEdit::at_end(&buf);
        let out = edit.apply(&mut buf, &[], &['a' as u32, '-' as u32], 3, "0123456789");
        assert!(!out.changed);
        assert_eq!(buf, "12");
    }

    #[test]
    fn max_count_is_in_code_points() {
        let mut buf = String::new();
        let mut edit = TextEdit::at_end(&buf);
        let typed: Vec<u32> = "ü²€▲".chars().map(u32::from).collect();
        edit.apply(&mut buf, &[], &typed, 3, "");
        assert_eq!(buf, "ü²€");
        assert_eq!(buf.chars().count(), 3);
        assert!(buf.len() > 3);
    }

    #[test]
    fn invalid_code_points_produce_nothing() {
        let mut buf = String::new();
        let mut edit = TextEdit::at_end(&buf);
        edit.apply(&mut buf, &[], &[0xD800, 0x11_0000, 'x' as u32], 5, "");
        assert_eq!(buf, "x");
    }

    #[test]
    fn cursor_moves_by_code_point() {
        let mut buf = String::from("a€b");
        let mut edit = TextEdit::at_end(&buf);
        edit.apply(&mut buf, &[Key::Left, Key::Left], &[], 10, "");
        assert_eq!(edit.cursor(), 1);
        edit.apply(&mut buf, &[Key::Delete], &['z' as u32], 10, "");
        assert_eq!(buf, "azb");
        edit.apply(&mut buf, &[Key::Home], &['0' as u32], 10, "");
        assert_eq!(buf, "0azb");
        edit.apply(&mut buf, &[Key::End, Key::Right], &['!' as u32], 10, "");
        assert_eq!(buf, "0azb!");
    }

    #[test]
    fn return_submits_and_skips_the_rest() {
        let mut buf = String::from("7");
        let mut edit = TextEdit::at_end(&buf);
        let out = edit.apply(&mut buf, &[Key::Return, Key::Backspace], &['1' as u32], 3, "");
        assert!(out.submit);
        assert_eq!(buf, "7");
    }
}
