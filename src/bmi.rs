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
//! Body-mass-index arithmetic and the integer rules of the two inputs.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Inclusive integer range with a fallback value.
pub struct Bounded {
    /// Smallest accepted value.
    pub min: i32,
    /// Largest accepted value.
    pub max: i32,
    /// Value used when the input is empty or zero.
    pub default: i32,
}

/// Weight in kilograms.
pub const WEIGHT: Bounded = Bounded { min: 30, max: 200, default: 70 };

/// Height in centimeters.
pub const HEIGHT: Bounded = Bounded { min: 120, max: 220, default: 170 };

impl Bounded {
    /// Next value up, saturating at `max`.
    pub fn step_up(&self, value: i32) -> i32 { value.saturating_add(1).min(self.max) }

    /// Next value down, saturating at `min`.
    pub fn step_down(&self, value: i32) -> i32 { value.saturating_sub(1).max(self.min) }

    /// Parses the leading integer of `text`; zero (including nothing parsable)
    /// falls back to the default, then the result is clamped into range.
    pub fn validate(&self, text: &str) -> i32 {
        match parse_leading_int(text) {
            0 => self.default,
            v => v,
        }
        .clamp(self.min, self.max)
    }
}

/// `atoi`-style parse: optional leading whitespace and sign followed by
/// digits; parsing stops at the first non-digit, and no digits yields 0.
/// Out-of-range values saturate.
pub fn parse_leading_int(text: &str) -> i32 {
    let s = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C']);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Body-mass index for a weight in kilograms and a height in centimeters.
pub fn bmi(weight: i32, height: i32) -> f64 { f64::from(weight) * 1e4 / (f64::from(height) * f64::from(height)) }

/// Text shown in the result label, e.g. `BMI = 24.2 kg/m²`.
pub fn format_bmi(weight: i32, height: i32) -> String { format!("BMI = {:.1} kg/m²", bmi(weight, height)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_saturate_at_the_bounds() {
        assert_eq!(WEIGHT.step_up(200), 200);
        assert_eq!(WEIGHT.step_down(30), 30);
        assert_eq!(WEIGHT.step_up(70), 71);
        assert_eq!(HEIGHT.step_down(170), 169);
        assert_eq!(HEIGHT.step_up(220), 220);
        assert_eq!(HEIGHT.step_down(120), 120);
    }

    #[test]
    fn in_range_values_survive_validation() {
        assert_eq!(WEIGHT.validate("85"), 85);
        assert_eq!(WEIGHT.validate("085"), 85);
        assert_eq!(HEIGHT.validate("120"), 120);
        assert_eq!(HEIGHT.validate("220"), 220);
    }

    #[test]
    fn empty_or_zero_yields_default() {
        assert_eq!(WEIGHT.validate(""), 70);
        assert_eq!(WEIGHT.validate("0"), 70);
        assert_eq!(WEIGHT.validate("000"), 70);
        assert_eq!(HEIGHT.validate("abc"), 170);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(WEIGHT.validate("250"), 200);
        assert_eq!(WEIGHT.validate("5"), 30);
        assert_eq!(HEIGHT.validate("999"), 220);
        assert_eq!(HEIGHT.validate("-5"), 120);
    }

    #[test]
    fn leading_int_parse_matches_atoi() {
        assert_eq!(parse_leading_int("  42kg"), 42);
        assert_eq!(parse_leading_int("+7"), 7);
        assert_eq!(parse_leading_int("-12x"), -12);
        assert_eq!(parse_leading_int("x12"), 0);
        assert_eq!(parse_leading_int("-"), 0);
        assert_eq!(parse_leading_int("99999999999"), i32::MAX);
        assert_eq!(parse_leading_int("-99999999999"), i32::MIN);
    }

    #[test]
    fn bmi_text_has_one_decimal_and_unit() {
        assert_eq!(format_bmi(70, 170), "BMI = 24.2 kg/m²");
        assert_eq!(format_bmi(200, 120), "BMI = 138.9 kg/m²");
        assert_eq!(format_bmi(30, 220), "BMI = 6.2 kg/m²");
    }
}
