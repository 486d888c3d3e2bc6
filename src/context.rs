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

/// Widget runtime: owns the widget table, the focused input slot and the
/// canvas the widgets are painted on.
pub struct Context<R: Renderer> {
    canvas: Canvas<R>,
    style: Style,
    widgets: Widgets,
    focus: Option<WidgetId>,
    commands: DrawList,
    frame: usize,

    /// Input collected for the next frame.
    pub input: Input,
}

impl<R: Renderer> Context<R> {
    /// Creates an empty runtime drawing through `renderer` into a `dim` sized viewport.
    pub fn new(renderer: R, dim: Dimensioni) -> Self {
        Self {
            canvas: Canvas::new(renderer, dim),
            style: Style::default(),
            widgets: Widgets::default(),
            focus: None,
            commands: DrawList::default(),
            frame: 0,
            input: Input::default(),
        }
    }

    /// Appends a widget, sizing text based kinds from the atlas.
    pub fn add(&mut self, mut widget: Widget) -> WidgetId {
        widget.fit_content(&self.canvas.get_atlas());
        self.widgets.push(widget)
    }

    /// Uploads the texture of every image widget and sizes the widget to it.
    pub fn load_images(&mut self) -> Result<()> {
        for widget in self.widgets.iter_mut() {
            let path = match &widget.kind {
                WidgetKind::Image(image) if image.texture().is_none() => image.path.clone(),
                _ => continue,
            };
            let (width, height, pixels) = load_image_file(&path)?;
            let texture = self.canvas.load_texture_rgba(width as i32, height as i32, &pixels);
            log::debug!("image '{}' loaded as texture {} ({}x{})", path, texture.raw(), width, height);
            widget.attach_texture(texture, Dimensioni::new(width as i32, height as i32));
        }
        Ok(())
    }

    /// Returns the widget table.
    pub fn widgets(&self) -> &Widgets { &self.widgets }

    /// Returns the widget table for text updates.
    pub fn widgets_mut(&mut self) -> &mut Widgets { &mut self.widgets }

    /// Returns the input currently receiving keystrokes.
    pub fn focus(&self) -> Option<WidgetId> { self.focus }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> usize { self.frame }

    fn defocus<H: Handler>(&mut self, handler: &mut H) {
        let Some(id) = self.focus.take() else {
            return;
        };
        for widget in self.widgets.iter_mut() {
            if let Some(field) = widget.as_input_mut() {
                field.end_edit();
            }
        }
        log::debug!("input {} lost focus", id.index());
        if self.widgets[id].callbacks().contains(Callbacks::VALIDATE) {
            handler.on_validate(&mut self.widgets, id);
        }
    }

    fn set_focus(&mut self, id: WidgetId) {
        if let Some(field) = self.widgets.get_mut(id).and_then(|w| w.as_input_mut()) {
            field.begin_edit();
            self.focus = Some(id);
            log::debug!("input {} focused", id.index());
        }
    }

    /// Processes the pending input: a left release ends editing (running
    /// validation), the focused input consumes keys and typed code points,
    /// then widgets are hit-tested and clicks are dispatched.
    pub fn frame<H: Handler>(&mut self, handler: &mut H) {
        let released = self.input.mouse_released().is_left();

        if released {
            self.defocus(handler);
        }

        if let Some(id) = self.focus {
            let keys = self.input.keys_pressed();
            let codepoints = self.input.codepoints();
            let outcome = match self.widgets.get_mut(id).and_then(|w| w.as_input_mut()) {
                Some(field) => field.apply(keys, codepoints),
                None => Default::default(),
            };
            if outcome.submit {
                self.defocus(handler);
            }
        }

        let pos = self.input.mouse_pos();
        let mut clicked = None;
        let mut focus_target = None;
        for widget in self.widgets.iter_mut() {
            widget.set_hovered(false);
        }
        for i in 0..self.widgets.len() {
            let id = WidgetId(i);
            let Some(widget) = self.widgets.get_mut(id) else {
                break;
            };
            match widget.kind {
                WidgetKind::Panel { .. } => continue,
                _ if !rect_contains(widget.rect(), pos) => continue,
                WidgetKind::Input(_) => {
                    widget.set_hovered(true);
                    if released && focus_target.is_none() {
                        focus_target = Some(id);
                    }
                }
                _ => {
                    widget.set_hovered(true);
                    if released && widget.callbacks().contains(Callbacks::CLICK) {
                        clicked = Some(id);
                    }
                    break;
                }
            }
        }

        if let Some(id) = focus_target {
            self.set_focus(id);
        }
        if let Some(id) = clicked {
            log::debug!("widget {} clicked", id.index());
            handler.on_click(&mut self.widgets, id);
        }

        self.input.epilogue();
        self.frame += 1;
    }

    /// Records the draw commands of every widget in declaration order.
    /// Labels and buttons with the render callback are refreshed just before painting.
    pub fn render<H: Handler>(&mut self, handler: &mut H) {
        let atlas = self.canvas.get_atlas();
        let pressed = self.input.mouse_down().is_left();
        for i in 0..self.widgets.len() {
            let id = WidgetId(i);
            let widget = &self.widgets[id];
            if matches!(widget.kind, WidgetKind::Label(_) | WidgetKind::Button(_)) && widget.callbacks().contains(Callbacks::RENDER) {
                handler.on_render(&mut self.widgets, id);
            }
            paint_widget(&mut self.commands, &self.widgets[id], pressed, &self.style, &atlas);
        }
    }

    /// Begins a new draw pass on the underlying canvas.
    pub fn begin(&mut self, width: i32, height: i32, clr: Color) { self.canvas.begin(width, height, clr); }

    /// Flushes recorded draw commands to the renderer and ends the draw pass.
    pub fn end(&mut self) {
        self.commands.render(&mut self.canvas);
        self.canvas.end();
    }
}

impl<R: Renderer> Drop for Context<R> {
    fn drop(&mut self) {
        for widget in self.widgets.iter_mut() {
            if let Some(texture) = widget.detach_texture() {
                self.canvas.free_texture(texture);
            }
        }
    }
}

fn paint_widget(list: &mut DrawList, widget: &Widget, pressed: bool, style: &Style, atlas: &AtlasHandle) {
    let r = widget.rect();
    match &widget.kind {
        WidgetKind::Panel { background, sunken } => list.draw_bevel(r, *background, false, *sunken, false, style),
        WidgetKind::Image(image) => {
            if let Some(texture) = image.texture() {
                list.draw_image(texture, r, Color::WHITE);
            }
        }
        WidgetKind::Button(t) => list.draw_text_button(r, &t.text, t.font, t.text_color, widget.hovered(), pressed, style, atlas),
        WidgetKind::CrossButton { text_color, font } => list.draw_text_button(r, CROSS_TEXT, *font, *text_color, widget.hovered(), pressed, style, atlas),
        WidgetKind::Label(t) => {
            if !t.background.is_blank() {
                list.draw_rect(r, t.background);
            }
            list.draw_text(t.font, &t.text, vec2(r.x, r.y), t.text_color);
        }
        WidgetKind::Input(field) => {
            list.draw_bevel(r, Color::BLANK, false, true, field.is_editing(), style);
            let origin = vec2(r.x + style.input_inset, r.y + style.input_inset);
            list.draw_text(field.font, field.text(), origin, field.text_color);
            if let Some(edit) = field.edit() {
                let before = atlas.get_text_size(field.font, &field.text()[..edit.cursor()]).width;
                let height = atlas.get_font_height(field.font) as i32;
                list.draw_rect(rect(origin.x + before, origin.y, 1, height), field.text_color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::tests::{encode_png, make_test_atlas};
    use crate::canvas::tests::{RecordingRenderer, recording_canvas};

    #[derive(Default)]
    struct Recorder {
        clicks: Vec<WidgetId>,
        validated: Vec<WidgetId>,
        rendered: Vec<WidgetId>,
    }

    impl Handler for Recorder {
        fn on_click(&mut self, _widgets: &mut Widgets, id: WidgetId) { self.clicks.push(id); }
        fn on_render(&mut self, widgets: &mut Widgets, id: WidgetId) {
            self.rendered.push(id);
            widgets.set_text(id, "fresh");
        }
        fn on_validate(&mut self, _widgets: &mut Widgets, id: WidgetId) { self.validated.push(id); }
    }

    fn context() -> Context<RecordingRenderer> {
        let (canvas, _) = recording_canvas();
        let renderer = RecordingRenderer {
            atlas: canvas.get_atlas(),
            log: Default::default(),
        };
        Context::new(renderer, Dimensioni::new(400, 300))
    }

    fn click(ctx: &mut Context<RecordingRenderer>, handler: &mut Recorder, x: i32, y: i32) {
        ctx.input.mousedown(x, y, MouseButton::LEFT);
        ctx.frame(handler);
        ctx.input.mouseup(x, y, MouseButton::LEFT);
        ctx.frame(handler);
    }

    fn font() -> FontId { FontId::default() }

    #[test]
    fn first_matching_widget_takes_the_click() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let a = ctx.add(Widget::button(rect(0, 0, 50, 50), "a", font(), Color::BLACK).with_callbacks(Callbacks::CLICK));
        let b = ctx.add(Widget::button(rect(10, 10, 50, 50), "b", font(), Color::BLACK).with_callbacks(Callbacks::CLICK));
        click(&mut ctx, &mut h, 20, 20);
        assert_eq!(h.clicks, vec![a]);
        assert!(ctx.widgets()[a].hovered());
        assert!(!ctx.widgets()[b].hovered());
    }

    #[test]
    fn panels_are_not_hit_tested() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let panel = ctx.add(Widget::panel(rect(0, 0, 100, 100), Color::BLANK, false).with_callbacks(Callbacks::CLICK));
        let button = ctx.add(Widget::button(rect(10, 10, 20, 20), "b", font(), Color::BLACK).with_callbacks(Callbacks::CLICK));
        click(&mut ctx, &mut h, 15, 15);
        assert_eq!(h.clicks, vec![button]);
        assert!(!ctx.widgets()[panel].hovered());
    }

    #[test]
    fn widgets_without_click_flag_still_stop_the_scan() {
        let mut ctx = context();
        let mut h = Recorder::default();
        ctx.add(Widget::label(vec2(0, 0), "cover", font(), Color::BLACK));
        ctx.add(Widget::button(rect(0, 0, 20, 20), "b", font(), Color::BLACK).with_callbacks(Callbacks::CLICK));
        click(&mut ctx, &mut h, 5, 5);
        assert!(h.clicks.is_empty());
    }

    #[test]
    fn input_does_not_stop_the_scan() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let input = ctx.add(Widget::input(vec2(0, 0), 3, "", font(), Color::BLACK));
        let button = ctx.add(Widget::button(rect(0, 0, 30, 30), "b", font(), Color::BLACK).with_callbacks(Callbacks::CLICK));
        click(&mut ctx, &mut h, 5, 5);
        assert_eq!(ctx.focus(), Some(input));
        assert_eq!(h.clicks, vec![button]);
        assert!(ctx.widgets()[input].hovered());
    }

    #[test]
    fn release_anywhere_validates_and_clears_focus() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let input = ctx.add(Widget::input(vec2(0, 0), 3, "", font(), Color::BLACK).with_callbacks(Callbacks::VALIDATE));
        click(&mut ctx, &mut h, 5, 5);
        assert!(ctx.widgets().input(input).map(|f| f.is_editing()).unwrap_or(false));
        click(&mut ctx, &mut h, 300, 250);
        assert_eq!(ctx.focus(), None);
        assert_eq!(h.validated, vec![input]);
        assert!(ctx.widgets().iter().all(|(_, w)| w.as_input().map_or(true, |f| !f.is_editing())));
    }

    #[test]
    fn only_one_input_edits_at_a_time() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let a = ctx.add(Widget::input(vec2(0, 0), 3, "", font(), Color::BLACK).with_callbacks(Callbacks::VALIDATE));
        let b = ctx.add(Widget::input(vec2(0, 100), 3, "", font(), Color::BLACK).with_callbacks(Callbacks::VALIDATE));
        click(&mut ctx, &mut h, 5, 5);
        click(&mut ctx, &mut h, 5, 105);
        assert_eq!(ctx.focus(), Some(b));
        assert_eq!(h.validated, vec![a]);
        let editing: Vec<_> = ctx.widgets().iter().filter(|(_, w)| w.as_input().is_some_and(|f| f.is_editing())).map(|(id, _)| id).collect();
        assert_eq!(editing, vec![b]);
    }

    #[test]
    fn typing_reaches_only_the_focused_input() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let a = ctx.add(Widget::input(vec2(0, 0), 3, "0123456789", font(), Color::BLACK));
        let b = ctx.add(Widget::input(vec2(0, 100), 3, "0123456789", font(), Color::BLACK));
        ctx.input.text("9");
        ctx.frame(&mut h);
        assert_eq!(ctx.widgets().text(a), Some(""));
        click(&mut ctx, &mut h, 5, 5);
        ctx.input.text("4x2");
        ctx.input.keydown(Key::Backspace);
        ctx.frame(&mut h);
        // keys run before the typed text
        assert_eq!(ctx.widgets().text(a), Some("42"));
        assert_eq!(ctx.widgets().text(b), Some(""));
    }

    #[test]
    fn return_commits_like_focus_loss() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let input = ctx.add(Widget::input(vec2(0, 0), 3, "", font(), Color::BLACK).with_callbacks(Callbacks::VALIDATE));
        click(&mut ctx, &mut h, 5, 5);
        ctx.input.keydown(Key::Return);
        ctx.frame(&mut h);
        assert_eq!(ctx.focus(), None);
        assert_eq!(h.validated, vec![input]);
    }

    #[test]
    fn render_refreshes_text_before_painting() {
        let mut ctx = context();
        let mut h = Recorder::default();
        let label = ctx.add(Widget::label(vec2(10, 10), "stale", font(), Color::BLACK).with_callbacks(Callbacks::RENDER));
        let plain = ctx.add(Widget::label(vec2(10, 40), "plain", font(), Color::BLACK));
        let before = ctx.widgets()[label].rect();
        ctx.render(&mut h);
        assert_eq!(h.rendered, vec![label]);
        assert_eq!(ctx.widgets().text(label), Some("fresh"));
        assert_eq!(ctx.widgets().text(plain), Some("plain"));
        let after = ctx.widgets()[label].rect();
        assert_eq!((before.width, before.height), (after.width, after.height));
        let texts: Vec<String> = ctx
            .commands
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["fresh".to_string(), "plain".to_string()]);
    }

    #[test]
    fn focused_input_draws_a_caret() {
        let mut ctx = context();
        let mut h = Recorder::default();
        ctx.add(Widget::input(vec2(0, 0), 3, "", font(), Color::BLACK));
        ctx.render(&mut h);
        let unfocused = ctx.commands.commands().len();
        ctx.end();
        click(&mut ctx, &mut h, 5, 5);
        ctx.render(&mut h);
        assert_eq!(ctx.commands.commands().len(), unfocused + 1);
    }

    #[test]
    fn image_is_sized_from_its_texture_and_released_once() {
        let path = std::env::temp_dir().join(format!("bmicalc-image-{}.png", std::process::id()));
        let pixels: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        std::fs::write(&path, encode_png(png::ColorType::Rgba, &pixels, 2, 3)).unwrap();

        let renderer = RecordingRenderer {
            atlas: make_test_atlas(),
            log: Default::default(),
        };
        let log = renderer.log.clone();
        let mut ctx = Context::new(renderer, Dimensioni::new(400, 300));
        let image = ctx.add(Widget::image(vec2(7, 9), path.to_str().unwrap()));
        ctx.load_images().unwrap();
        ctx.load_images().unwrap();
        std::fs::remove_file(&path).unwrap();

        let r = ctx.widgets()[image].rect();
        assert_eq!((r.x, r.y, r.width, r.height), (7, 9, 2, 3));
        assert_eq!(log.borrow().created.len(), 1);
        let (texture, w, h) = log.borrow().created[0];
        assert_eq!((w, h), (2, 3));

        drop(ctx);
        assert_eq!(log.borrow().destroyed, vec![texture]);
    }

    #[test]
    fn missing_image_file_is_an_error() {
        let mut ctx = context();
        ctx.add(Widget::image(vec2(0, 0), "/nonexistent/image.png"));
        assert!(matches!(ctx.load_images(), Err(Error::Io { .. })));
    }
}
