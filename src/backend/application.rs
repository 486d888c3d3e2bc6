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
use std::time::{Duration, Instant};

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::surface::Surface;
use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::{Sdl, VideoSubsystem};

use super::GLRenderer;
use crate::*;

/// SDL2 window with a GLES 3.0 context driving a [`Context`] and its handler.
pub struct Application<H: Handler> {
    // dropped first: GL objects need the context alive
    ctx: Context<GLRenderer>,
    handler: H,
    config: Config,
    window: Window,
    gl_ctx: GLContext,
    _sdl_vid: VideoSubsystem,
    sdl_ctx: Sdl,
}

fn map_mouse_button(sdl_mb: sdl2::mouse::MouseButton) -> MouseButton {
    match sdl_mb {
        sdl2::mouse::MouseButton::Left => MouseButton::LEFT,
        sdl2::mouse::MouseButton::Right => MouseButton::RIGHT,
        sdl2::mouse::MouseButton::Middle => MouseButton::MIDDLE,
        _ => MouseButton::NONE,
    }
}

fn map_key(sdl_kc: Keycode) -> Option<Key> {
    match sdl_kc {
        Keycode::Backspace => Some(Key::Backspace),
        Keycode::Delete => Some(Key::Delete),
        Keycode::Left => Some(Key::Left),
        Keycode::Right => Some(Key::Right),
        Keycode::Home => Some(Key::Home),
        Keycode::End => Some(Key::End),
        Keycode::Return | Keycode::KpEnter => Some(Key::Return),
        _ => None,
    }
}

fn set_window_icon(window: &mut Window, path: &str) -> Result<()> {
    let (width, height, mut pixels) = load_image_file(path)?;
    let surface = Surface::from_data(&mut pixels, width as u32, height as u32, (width * 4) as u32, PixelFormatEnum::ABGR8888).map_err(Error::Backend)?;
    window.set_icon(surface);
    Ok(())
}

impl<H: Handler> Application<H> {
    /// Opens the centered, fixed-size window and lets `init` declare the widgets.
    pub fn new<F: FnOnce(&mut Context<GLRenderer>) -> H>(config: Config, atlas: AtlasHandle, init: F) -> Result<Self> {
        let sdl_ctx = sdl2::init().map_err(Error::Backend)?;
        let video = sdl_ctx.video().map_err(Error::Backend)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::GLES);
        gl_attr.set_context_version(3, 0);

        let mut window = video
            .window(&config.title, config.width, config.height)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| Error::Backend(e.to_string()))?;

        if let Err(e) = set_window_icon(&mut window, &config.icon) {
            log::warn!("window icon not set: {}", e);
        }

        // keep the context alive for the whole lifetime of the window
        let gl_ctx = window.gl_create_context().map_err(Error::Backend)?;
        window.gl_make_current(&gl_ctx).map_err(Error::Backend)?;
        let gl = unsafe { glow::Context::from_loader_function(|s| video.gl_get_proc_address(s) as *const _) };

        let (width, height) = window.size();
        let renderer = GLRenderer::new(gl, atlas, width, height)?;
        let mut ctx = Context::new(renderer, Dimensioni::new(width as _, height as _));
        let handler = init(&mut ctx);
        ctx.load_images()?;
        video.text_input().start();
        log::info!("window '{}' opened at {}x{}", config.title, width, height);

        Ok(Self {
            ctx,
            handler,
            config,
            window,
            gl_ctx,
            _sdl_vid: video,
            sdl_ctx,
        })
    }

    /// Runs frames until the window closes, Escape is pressed or the handler asks to exit.
    pub fn event_loop(&mut self) -> Result<()> {
        self.window.gl_make_current(&self.gl_ctx).map_err(Error::Backend)?;
        let mut event_pump = self.sdl_ctx.event_pump().map_err(Error::Backend)?;
        let frame_time = Duration::from_millis(self.config.frame_millis());

        'running: loop {
            let started = Instant::now();

            for event in event_pump.poll_iter() {
                let input = &mut self.ctx.input;
                match event {
                    Event::Quit { .. } | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => break 'running,
                    Event::Window { win_event: WindowEvent::Close, .. } => break 'running,
                    Event::MouseMotion { x, y, .. } => input.mousemove(x, y),
                    Event::MouseButtonDown { x, y, mouse_btn, .. } => input.mousedown(x, y, map_mouse_button(mouse_btn)),
                    Event::MouseButtonUp { x, y, mouse_btn, .. } => input.mouseup(x, y, map_mouse_button(mouse_btn)),
                    Event::KeyDown { keycode: Some(kc), .. } => {
                        if let Some(key) = map_key(kc) {
                            input.keydown(key);
                        }
                    }
                    Event::TextInput { text, .. } => input.text(text.as_str()),
                    _ => {}
                }
            }

            self.ctx.frame(&mut self.handler);
            if self.handler.wants_exit() {
                break 'running;
            }

            let (width, height) = self.window.size();
            self.ctx.begin(width as i32, height as i32, self.config.background);
            self.ctx.render(&mut self.handler);
            self.ctx.end();
            self.window.gl_swap_window();

            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        log::info!("closing after {} frames", self.ctx.frame_count());
        Ok(())
    }
}
