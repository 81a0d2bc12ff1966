//! A headless [`Surface`] that records every call, for tests.
//!
//! Shader "compilation" accepts any source containing `void main` and no `#error`. Linking
//! checks that every fragment `in` has a matching vertex `out`. Attribute locations are the
//! declaration order of the vertex `in`s and uniforms resolve if either stage declares them.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use super::{BufferTarget, DepthFunc, ShaderStage, Surface, TextureParameter};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Clear,
    EnableDepthTest(DepthFunc),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData { target: BufferTarget, len: usize },
    BindVertexArray(Option<u32>),
    VertexAttribPointer {
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    UseProgram(Option<u32>),
    UniformMatrix4 { location: u32, value: [f32; 16] },
    UniformI32 { location: u32, value: i32 },
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    TexImage {
        texture: Option<u32>,
        width: u32,
        height: u32,
        first_pixel: Option<[u8; 4]>,
    },
    TexParameter {
        texture: Option<u32>,
        parameter: TextureParameter,
    },
    GenerateMipmap(Option<u32>),
    DrawTriangles { count: i32, offset: i32 },
}

#[derive(Default)]
struct ShaderObject {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: HashMap<String, u32>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    calls: Vec<Call>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashSet<u32>,
    vertex_arrays: HashSet<u32>,
    textures: HashSet<u32>,
    bound_texture: Option<u32>,
    pending_errors: Vec<u32>,
    allocations_left: Option<u32>,
    max_texture_size: Option<u32>,
}

impl State {
    fn allocate(&mut self) -> Result<u32, String> {
        match &mut self.allocations_left {
            Some(0) => return Err("out of memory".to_string()),
            Some(left) => *left -= 1,
            None => {}
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}

pub struct RecordingSurface {
    size: (u32, u32),
    state: RefCell<State>,
}

/// Names declared with `qualifier` (e.g. `in`, `out`, `uniform`), in declaration order.
fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix(qualifier)?.strip_prefix(' ')?;
            let name = rest.split_whitespace().last()?.trim_end_matches(';');
            Some(name.to_string())
        })
        .collect()
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            state: RefCell::new(State::default()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn draw_calls(&self) -> Vec<i32> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawTriangles { count, .. } => Some(*count),
                _ => None,
            })
            .collect()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn fail_allocations(&self) {
        self.fail_allocations_after(0);
    }

    /// Lets the next `count` object creations succeed and fails every one after that.
    pub fn fail_allocations_after(&self, count: u32) {
        self.state.borrow_mut().allocations_left = Some(count);
    }

    /// Texture uploads larger than `size` on either axis raise `GL_INVALID_VALUE`.
    pub fn limit_texture_size(&self, size: u32) {
        self.state.borrow_mut().max_texture_size = Some(size);
    }

    pub fn raise_error(&self, code: u32) {
        self.state.borrow_mut().pending_errors.push(code);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Surface for RecordingSurface {
    type Buffer = u32;
    type VertexArray = u32;
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn drawable_size(&self) -> (u32, u32) {
        self.size
    }

    fn viewport(&self, _width: u32, _height: u32) {}

    fn create_buffer(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.buffers.insert(id);
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
        self.record(Call::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.state.borrow_mut().buffers.remove(&buffer);
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.vertex_arrays.insert(id);
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.state.borrow_mut().vertex_arrays.remove(&vertex_array);
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            components,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.shaders.insert(
            id,
            ShaderObject {
                stage: Some(stage),
                ..Default::default()
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader) {
            object.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader) {
            object.compiled =
                object.source.contains("void main") && !object.source.contains("#error");
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|object| object.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "ERROR: 0:1: syntax error".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.programs.insert(id, ProgramObject::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program) {
            object.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(object) = self.state.borrow_mut().programs.get_mut(&program) {
            object.attached.retain(|attached| *attached != shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            return;
        };

        let stage_source = |stage: ShaderStage| {
            attached
                .iter()
                .filter_map(|id| state.shaders.get(id))
                .find(|object| object.stage == Some(stage) && object.compiled)
                .map(|object| object.source.clone())
        };
        let (Some(vertex), Some(fragment)) = (
            stage_source(ShaderStage::Vertex),
            stage_source(ShaderStage::Fragment),
        ) else {
            if let Some(object) = state.programs.get_mut(&program) {
                object.linked = false;
                object.log = "error: missing compiled shader stage".to_string();
            }
            return;
        };

        let outputs = declarations(&vertex, "out");
        let missing: Vec<String> = declarations(&fragment, "in")
            .into_iter()
            .filter(|name| !outputs.contains(name))
            .collect();

        let mut uniforms = HashMap::new();
        for name in declarations(&vertex, "uniform")
            .into_iter()
            .chain(declarations(&fragment, "uniform"))
        {
            if !uniforms.contains_key(&name) {
                state.next_id += 1;
                uniforms.insert(name, state.next_id);
            }
        }

        if let Some(object) = state.programs.get_mut(&program) {
            if missing.is_empty() {
                object.linked = true;
                object.log.clear();
                object.attributes = declarations(&vertex, "in");
                object.uniforms = uniforms;
            } else {
                object.linked = false;
                object.log =
                    format!("error: fragment input `{}` has no matching output", missing[0]);
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|object| object.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|object| object.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let object = state.programs.get(&program).filter(|p| p.linked)?;
        object
            .attributes
            .iter()
            .position(|attribute| attribute == name)
            .map(|index| index as u32)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let object = state.programs.get(&program).filter(|p| p.linked)?;
        object.uniforms.get(name).copied()
    }

    fn uniform_matrix_4(&self, location: &u32, value: &[f32; 16]) {
        self.record(Call::UniformMatrix4 {
            location: *location,
            value: *value,
        });
    }

    fn uniform_i32(&self, location: &u32, value: i32) {
        self.record(Call::UniformI32 {
            location: *location,
            value,
        });
    }

    fn create_texture(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.textures.insert(id);
        Ok(id)
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: Option<u32>) {
        self.state.borrow_mut().bound_texture = texture;
        self.record(Call::BindTexture(texture));
    }

    fn tex_image_rgba(&self, width: u32, height: u32, pixels: &[u8]) {
        let mut state = self.state.borrow_mut();
        if state
            .max_texture_size
            .is_some_and(|max| width > max || height > max)
        {
            state.pending_errors.push(0x0501);
        }
        let texture = state.bound_texture;
        drop(state);
        self.record(Call::TexImage {
            texture,
            width,
            height,
            first_pixel: pixels.get(..4).and_then(|p| p.try_into().ok()),
        });
    }

    fn tex_parameter(&self, parameter: TextureParameter) {
        let texture = self.state.borrow().bound_texture;
        self.record(Call::TexParameter { texture, parameter });
    }

    fn generate_mipmap(&self) {
        let texture = self.state.borrow().bound_texture;
        self.record(Call::GenerateMipmap(texture));
    }

    fn delete_texture(&self, texture: u32) {
        self.state.borrow_mut().textures.remove(&texture);
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear_depth(&self, depth: f32) {
        self.record(Call::ClearDepth(depth));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn enable_depth_test(&self, func: DepthFunc) {
        self.record(Call::EnableDepthTest(func));
    }

    fn draw_triangles_u16(&self, count: i32, offset: i32) {
        self.record(Call::DrawTriangles { count, offset });
    }

    fn take_error(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if state.pending_errors.is_empty() {
            None
        } else {
            Some(state.pending_errors.remove(0))
        }
    }
}
