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
use std::collections::HashMap;

use glow::{HasContext, NativeBuffer, NativeProgram, NativeTexture, NativeUniformLocation, PixelUnpackData};

use crate::*;

const VERTEX_SHADER: &str = "#version 100
uniform highp mat4 uTransform;
attribute highp vec2 vertexPosition;
attribute highp vec2 vertexTexCoord;
attribute lowp vec4 vertexColor;
varying highp vec2 vTexCoord;
varying lowp vec4 vVertexColor;
void main()
{
    vVertexColor = vertexColor;
    vTexCoord = vertexTexCoord;
    highp vec4 pos = vec4(vertexPosition.x, vertexPosition.y, 0.0, 1.0);
    gl_Position = uTransform * pos;
}";

const FRAGMENT_SHADER: &str = "#version 100
varying highp vec2 vTexCoord;
varying lowp vec4 vVertexColor;
uniform sampler2D uTexture;
void main()
{
    lowp vec4 col = texture2D(uTexture, vTexCoord);
    gl_FragColor = col * vVertexColor;
}";

const VERTEX_STRIDE: i32 = 20;

fn ortho4(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> [f32; 16] {
    let width = right - left;
    let height = top - bottom;
    let depth = far - near;
    let r00 = 2.0 / width;
    let r11 = 2.0 / height;
    let r22 = -2.0 / depth;
    let r03 = -(right + left) / width;
    let r13 = -(top + bottom) / height;
    let r23 = -(far + near) / depth;
    [r00, 0.0, 0.0, 0.0, 0.0, r11, 0.0, 0.0, 0.0, 0.0, r22, 0.0, r03, r13, r23, 1.0]
}

fn create_program(gl: &glow::Context, vertex_shader_source: &str, fragment_shader_source: &str) -> Result<NativeProgram> {
    unsafe {
        let program = gl.create_program().map_err(Error::Backend)?;
        let shader_sources = [(glow::VERTEX_SHADER, vertex_shader_source), (glow::FRAGMENT_SHADER, fragment_shader_source)];
        let mut shaders = Vec::with_capacity(shader_sources.len());

        for (shader_type, shader_source) in shader_sources.iter() {
            let shader = gl.create_shader(*shader_type).map_err(Error::Backend)?;
            gl.shader_source(shader, shader_source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                for shader in shaders {
                    gl.delete_shader(shader);
                }
                gl.delete_program(program);
                return Err(Error::Backend(log));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        let log = if linked { String::new() } else { gl.get_program_info_log(program) };
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if !linked {
            gl.delete_program(program);
            return Err(Error::Backend(log));
        }
        Ok(program)
    }
}

fn create_rgba_texture(gl: &glow::Context, width: i32, height: i32, pixels: &[u8]) -> Result<NativeTexture> {
    unsafe {
        let tex = gl.create_texture().map_err(Error::Backend)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(tex));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            width,
            height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelUnpackData::Slice(Some(pixels)),
        );
        debug_assert!(gl.get_error() == 0);
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(tex)
    }
}

/// OpenGL ES renderer batching textured quads; atlas quads share one draw call,
/// every external texture gets its own.
pub struct GLRenderer {
    gl: glow::Context,
    verts: Vec<Vertex>,
    indices: Vec<u16>,

    vbo: NativeBuffer,
    ibo: NativeBuffer,
    atlas_tex: NativeTexture,
    program: NativeProgram,
    u_texture: NativeUniformLocation,
    u_transform: NativeUniformLocation,
    attribs: [u32; 3],

    width: u32,
    height: u32,

    atlas: AtlasHandle,
    textures: HashMap<TextureId, NativeTexture>,
    batch_texture: Option<TextureId>,
}

impl GLRenderer {
    /// Compiles the shaders and uploads the atlas.
    pub fn new(gl: glow::Context, atlas: AtlasHandle, width: u32, height: u32) -> Result<Self> {
        debug_assert_eq!(core::mem::size_of::<Vertex>(), VERTEX_STRIDE as usize);
        let mut pixels = Vec::new();
        atlas.apply_pixels(|_, _, p| pixels = rgba_bytes(p));
        let atlas_tex = create_rgba_texture(&gl, atlas.width() as i32, atlas.height() as i32, &pixels)?;
        let program = create_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        unsafe {
            let uniform = |name: &str| gl.get_uniform_location(program, name).ok_or_else(|| Error::Backend(format!("missing uniform {}", name)));
            let attrib = |name: &str| gl.get_attrib_location(program, name).ok_or_else(|| Error::Backend(format!("missing attribute {}", name)));
            let u_texture = uniform("uTexture")?;
            let u_transform = uniform("uTransform")?;
            let attribs = [attrib("vertexPosition")?, attrib("vertexTexCoord")?, attrib("vertexColor")?];
            let vbo = gl.create_buffer().map_err(Error::Backend)?;
            let ibo = gl.create_buffer().map_err(Error::Backend)?;
            log::info!("GL renderer ready: {}x{} viewport, {}x{} atlas", width, height, atlas.width(), atlas.height());

            Ok(Self {
                gl,
                verts: Vec::new(),
                indices: Vec::new(),
                vbo,
                ibo,
                atlas_tex,
                program,
                u_texture,
                u_transform,
                attribs,
                width,
                height,
                atlas,
                textures: HashMap::new(),
                batch_texture: None,
            })
        }
    }
}

impl Renderer for GLRenderer {
    fn get_atlas(&self) -> AtlasHandle { self.atlas.clone() }

    fn flush(&mut self) {
        if self.verts.is_empty() || self.indices.is_empty() {
            return;
        }
        let texture = match self.batch_texture {
            Some(id) => match self.textures.get(&id) {
                Some(tex) => *tex,
                None => {
                    self.verts.clear();
                    self.indices.clear();
                    return;
                }
            },
            None => self.atlas_tex,
        };

        let gl = &self.gl;
        let [pos_attrib, tex_attrib, col_attrib] = self.attribs;
        unsafe {
            // opengl rendering states
            gl.viewport(0, 0, self.width as i32, self.height as i32);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            debug_assert!(gl.get_error() == 0);

            gl.use_program(Some(self.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.uniform_1_i32(Some(&self.u_texture), 0);
            let tm = ortho4(0.0, self.width as f32, self.height as f32, 0.0, -1.0, 1.0);
            gl.uniform_matrix_4_f32_slice(Some(&self.u_transform), false, &tm);
            debug_assert_eq!(gl.get_error(), 0);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
            let vertices_u8: &[u8] = core::slice::from_raw_parts(self.verts.as_ptr() as *const u8, self.verts.len() * core::mem::size_of::<Vertex>());
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, vertices_u8, glow::DYNAMIC_DRAW);
            let indices_u8: &[u8] = core::slice::from_raw_parts(self.indices.as_ptr() as *const u8, self.indices.len() * core::mem::size_of::<u16>());
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, indices_u8, glow::DYNAMIC_DRAW);
            debug_assert!(gl.get_error() == 0);

            for attrib in self.attribs {
                gl.enable_vertex_attrib_array(attrib);
            }
            gl.vertex_attrib_pointer_f32(pos_attrib, 2, glow::FLOAT, false, VERTEX_STRIDE, 0);
            gl.vertex_attrib_pointer_f32(tex_attrib, 2, glow::FLOAT, false, VERTEX_STRIDE, 8);
            gl.vertex_attrib_pointer_f32(col_attrib, 4, glow::UNSIGNED_BYTE, true, VERTEX_STRIDE, 16);

            gl.draw_elements(glow::TRIANGLES, self.indices.len() as i32, glow::UNSIGNED_SHORT, 0);
            debug_assert!(gl.get_error() == 0);

            for attrib in self.attribs {
                gl.disable_vertex_attrib_array(attrib);
            }
            gl.use_program(None);
        }

        self.verts.clear();
        self.indices.clear();
    }

    fn push_quad_vertices(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
        if self.verts.len() + 4 >= 65536 || self.indices.len() + 6 >= 65536 {
            self.flush();
        }

        let is = self.verts.len() as u16;
        self.indices.extend_from_slice(&[is, is + 1, is + 2, is + 2, is + 3, is]);
        self.verts.extend_from_slice(&[*v0, *v1, *v2, *v3]);
    }

    fn begin(&mut self, width: i32, height: i32, clr: Color) {
        self.width = width as u32;
        self.height = height as u32;
        let gl = &self.gl;
        unsafe {
            gl.viewport(0, 0, width, height);
            gl.clear_color(clr.r as f32 / 255.0, clr.g as f32 / 255.0, clr.b as f32 / 255.0, clr.a as f32 / 255.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
            debug_assert!(gl.get_error() == 0);
        }
    }

    fn end(&mut self) { self.flush(); }

    fn create_texture(&mut self, id: TextureId, width: i32, height: i32, pixels: &[u8]) {
        match create_rgba_texture(&self.gl, width, height, pixels) {
            Ok(tex) => {
                if let Some(old) = self.textures.insert(id, tex) {
                    unsafe { self.gl.delete_texture(old) };
                }
            }
            Err(e) => log::error!("texture {} upload failed: {}", id.raw(), e),
        }
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(tex) = self.textures.remove(&id) {
            unsafe { self.gl.delete_texture(tex) };
        }
    }

    fn draw_texture(&mut self, id: TextureId, vertices: [Vertex; 4]) {
        self.flush();
        self.batch_texture = Some(id);
        let [v0, v1, v2, v3] = vertices;
        self.push_quad_vertices(&v0, &v1, &v2, &v3);
        self.flush();
        self.batch_texture = None;
    }
}

impl Drop for GLRenderer {
    fn drop(&mut self) {
        let gl = &self.gl;
        unsafe {
            for (_, tex) in self.textures.drain() {
                gl.delete_texture(tex);
            }
            gl.delete_texture(self.atlas_tex);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ibo);
            gl.delete_program(self.program);
        }
    }
}
