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

/// Fonts the calculator draws with.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fonts {
    /// Labels, inputs and buttons.
    pub regular: FontId,
    /// Result line.
    pub bold: FontId,
}

#[derive(Copy, Clone, Debug)]
struct Ids {
    weight_input: WidgetId,
    height_input: WidgetId,
    weight_up: WidgetId,
    weight_down: WidgetId,
    height_up: WidgetId,
    height_down: WidgetId,
    result: WidgetId,
}

/// Calculator state: the committed weight and height plus the widgets they drive.
pub struct BmiCalculator {
    weight: i32,
    height: i32,
    ids: Ids,
    exit: bool,
}

impl BmiCalculator {
    /// Declares the calculator widgets on `ctx` and returns the handler driving them.
    pub fn build<R: Renderer>(ctx: &mut Context<R>, fonts: Fonts) -> Self {
        let digits = "0123456789";
        let black = Color::BLACK;
        let regular = fonts.regular;

        ctx.add(Widget::label(vec2(50, 50), "Weight [kg]:", regular, black));
        ctx.add(Widget::label(vec2(50, 120), "Height [cm]:", regular, black));
        let weight_input = ctx.add(Widget::input(vec2(220, 50), 3, digits, regular, black).with_callbacks(Callbacks::VALIDATE));
        let height_input = ctx.add(Widget::input(vec2(220, 120), 3, digits, regular, black).with_callbacks(Callbacks::VALIDATE));
        let mut step = |y, text| ctx.add(Widget::button(rect(300, y, 25, 25), text, regular, black).with_callbacks(Callbacks::CLICK));
        let weight_up = step(42, "▲");
        let weight_down = step(71, "▼");
        let height_up = step(112, "▲");
        let height_down = step(141, "▼");
        let result = ctx.add(Widget::label(vec2(85, 200), "", fonts.bold, black).with_callbacks(Callbacks::RENDER));

        let app = Self {
            weight: WEIGHT.default,
            height: HEIGHT.default,
            ids: Ids {
                weight_input,
                height_input,
                weight_up,
                weight_down,
                height_up,
                height_down,
                result,
            },
            exit: false,
        };
        let widgets = ctx.widgets_mut();
        widgets.set_text(weight_input, &app.weight.to_string());
        widgets.set_text(height_input, &app.height.to_string());
        app
    }

    /// Committed weight in kilograms.
    pub fn weight(&self) -> i32 { self.weight }

    /// Committed height in centimeters.
    pub fn height(&self) -> i32 { self.height }

    /// Makes the main loop stop after the current frame.
    pub fn request_exit(&mut self) { self.exit = true; }
}

impl Handler for BmiCalculator {
    fn on_click(&mut self, widgets: &mut Widgets, id: WidgetId) {
        let ids = self.ids;
        let (input, value) = match id {
            _ if id == ids.weight_up => (ids.weight_input, WEIGHT.step_up(self.weight)),
            _ if id == ids.weight_down => (ids.weight_input, WEIGHT.step_down(self.weight)),
            _ if id == ids.height_up => (ids.height_input, HEIGHT.step_up(self.height)),
            _ if id == ids.height_down => (ids.height_input, HEIGHT.step_down(self.height)),
            _ => return,
        };
        if input == ids.weight_input {
            self.weight = value;
        } else {
            self.height = value;
        }
        widgets.set_text(input, &value.to_string());
    }

    fn on_render(&mut self, widgets: &mut Widgets, id: WidgetId) {
        if id == self.ids.result {
            widgets.set_text(id, &format_bmi(self.weight, self.height));
        }
    }

    fn on_validate(&mut self, widgets: &mut Widgets, id: WidgetId) {
        let (range, value) = match id {
            _ if id == self.ids.weight_input => (WEIGHT, &mut self.weight),
            _ if id == self.ids.height_input => (HEIGHT, &mut self.height),
            _ => return,
        };
        *value = range.validate(widgets.text(id).unwrap_or_default());
        widgets.set_text(id, &value.to_string());
    }

    fn wants_exit(&self) -> bool { self.exit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::tests::{RecordingRenderer, recording_canvas};

    struct Harness {
        ctx: Context<RecordingRenderer>,
        app: BmiCalculator,
    }

    impl Harness {
        fn new() -> Self {
            let (canvas, log) = recording_canvas();
            let renderer = RecordingRenderer { atlas: canvas.get_atlas(), log };
            let mut ctx = Context::new(renderer, Dimensioni::new(380, 270));
            let app = BmiCalculator::build(&mut ctx, Fonts::default());
            Self { ctx, app }
        }

        fn click(&mut self, x: i32, y: i32) {
            self.ctx.input.mousedown(x, y, MouseButton::LEFT);
            self.ctx.frame(&mut self.app);
            self.ctx.input.mouseup(x, y, MouseButton::LEFT);
            self.ctx.frame(&mut self.app);
        }

        fn type_text(&mut self, text: &str) {
            self.ctx.input.text(text);
            self.ctx.frame(&mut self.app);
        }

        fn press(&mut self, key: Key) {
            self.ctx.input.keydown(key);
            self.ctx.frame(&mut self.app);
        }

        fn text(&self, id: WidgetId) -> String { self.ctx.widgets().text(id).unwrap_or_default().to_string() }
    }

    #[test]
    fn starts_with_defaults_and_result() {
        let mut h = Harness::new();
        assert_eq!(h.ctx.widgets().len(), 9);
        assert_eq!(h.text(h.app.ids.weight_input), "70");
        assert_eq!(h.text(h.app.ids.height_input), "170");
        assert_eq!(h.text(h.app.ids.result), "");
        h.ctx.render(&mut h.app);
        assert_eq!(h.text(h.app.ids.result), "BMI = 24.2 kg/m²");
    }

    #[test]
    fn increase_at_max_weight_stays() {
        let mut h = Harness::new();
        // weight input at (220, 50), 35x25 in the test atlas
        h.click(225, 55);
        h.press(Key::Backspace);
        h.press(Key::Backspace);
        h.type_text("200");
        h.click(10, 10);
        assert_eq!(h.app.weight(), 200);
        h.click(310, 50);
        assert_eq!(h.app.weight(), 200);
        assert_eq!(h.text(h.app.ids.weight_input), "200");
        h.click(310, 80);
        assert_eq!(h.app.weight(), 199);
        assert_eq!(h.text(h.app.ids.weight_input), "199");
    }

    #[test]
    fn decrease_at_min_height_stays() {
        let mut h = Harness::new();
        for _ in 0..60 {
            h.click(310, 150);
        }
        assert_eq!(h.app.height(), 120);
        assert_eq!(h.text(h.app.ids.height_input), "120");
    }

    #[test]
    fn typed_value_is_clamped_on_focus_loss() {
        let mut h = Harness::new();
        h.click(225, 55);
        assert_eq!(h.ctx.focus(), Some(h.app.ids.weight_input));
        for _ in 0..3 {
            h.press(Key::Backspace);
        }
        h.type_text("2");
        h.type_text("5");
        h.type_text("0");
        assert_eq!(h.text(h.app.ids.weight_input), "250");
        h.click(10, 250);
        assert_eq!(h.ctx.focus(), None);
        assert_eq!(h.text(h.app.ids.weight_input), "200");
        assert_eq!(h.app.weight(), 200);
    }

    #[test]
    fn non_digits_and_overflow_are_refused() {
        let mut h = Harness::new();
        h.click(225, 125);
        h.type_text("a");
        assert_eq!(h.text(h.app.ids.height_input), "170");
        h.type_text("9");
        assert_eq!(h.text(h.app.ids.height_input), "170");
        h.press(Key::Backspace);
        h.type_text("9");
        assert_eq!(h.text(h.app.ids.height_input), "179");
    }

    #[test]
    fn emptied_input_falls_back_to_default() {
        let mut h = Harness::new();
        h.click(310, 120);
        assert_eq!(h.app.height(), 171);
        h.click(225, 125);
        for _ in 0..3 {
            h.press(Key::Backspace);
        }
        h.press(Key::Return);
        assert_eq!(h.app.height(), 170);
        assert_eq!(h.text(h.app.ids.height_input), "170");
    }

    #[test]
    fn exit_flag_is_reported() {
        let mut h = Harness::new();
        assert!(!h.app.wants_exit());
        h.app.request_exit();
        assert!(h.app.wants_exit());
    }
}
