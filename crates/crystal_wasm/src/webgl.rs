//! WebGL2 draw backend for the crystal scene.

use anyhow::{anyhow, Context, Result};
use crystal_core::error::CrystalError;
use crystal_core::render::RenderBackend;
use crystal_core::scene::Scene;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const FLOATS_PER_VERTEX: usize = 9;
const EMISSIVE_INTENSITY: f32 = 0.4;
const SHININESS: f32 = 100.0;
const SPECULAR: u32 = 0x111111;
const OPACITY: f32 = 0.8;

struct Uniforms {
    model: WebGlUniformLocation,
    view_proj: WebGlUniformLocation,
    ambient: WebGlUniformLocation,
    light_pos: WebGlUniformLocation,
    light_color: WebGlUniformLocation,
    camera_pos: WebGlUniformLocation,
    specular: WebGlUniformLocation,
    shininess: WebGlUniformLocation,
    emissive: WebGlUniformLocation,
    opacity: WebGlUniformLocation,
}

pub(crate) struct WebGlBackend {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    vbo: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    uniforms: Uniforms,
}

impl WebGlBackend {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl = canvas
            .get_context_with_context_options("webgl2", &alpha_antialias_options())
            .map_err(|e| anyhow!("{e:?}"))
            .context("requesting webgl2 context")?
            .ok_or_else(|| anyhow!("webgl2 is not available"))?
            .dyn_into::<Gl>()
            .map_err(|_| anyhow!("context is not a WebGl2RenderingContext"))?;

        let program = build_program(
            &gl,
            include_str!("shaders/face.vert"),
            include_str!("shaders/face.frag"),
        )
        .context("building face program")?;
        let vbo = gl
            .create_buffer()
            .ok_or_else(|| anyhow!("failed to create face buffer"))?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| anyhow!("failed to create face vao"))?;
        let uniforms = Uniforms {
            model: uniform(&gl, &program, "u_model")?,
            view_proj: uniform(&gl, &program, "u_view_proj")?,
            ambient: uniform(&gl, &program, "u_ambient")?,
            light_pos: uniform(&gl, &program, "u_light_pos")?,
            light_color: uniform(&gl, &program, "u_light_color")?,
            camera_pos: uniform(&gl, &program, "u_camera_pos")?,
            specular: uniform(&gl, &program, "u_specular")?,
            shininess: uniform(&gl, &program, "u_shininess")?,
            emissive: uniform(&gl, &program, "u_emissive")?,
            opacity: uniform(&gl, &program, "u_opacity")?,
        };

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vbo));
        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;
        for (location, offset) in [(0u32, 0i32), (1, 3), (2, 6)] {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(location, 3, Gl::FLOAT, false, stride, offset * 4);
        }
        gl.bind_vertex_array(None);

        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::CULL_FACE);
        gl.cull_face(Gl::BACK);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            canvas,
            gl,
            program,
            vbo,
            vao,
            uniforms,
        })
    }

    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(1.0) as u32);
        self.canvas.set_height(height.max(1.0) as u32);
        self.gl
            .viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
    }

    fn set_uniforms(&self, scene: &Scene) {
        let gl = &self.gl;
        let camera = scene.camera();
        let lighting = scene.lighting();
        let model = scene
            .crystal()
            .map(|c| c.model_matrix())
            .unwrap_or_else(nalgebra::Matrix4::identity)
            .cast::<f32>();
        let view_proj = camera.view_projection().cast::<f32>();
        let ambient = lighting.ambient.color.to_array().map(|c| c * lighting.ambient.intensity);
        let light_color = lighting.point.color.to_array().map(|c| c * lighting.point.intensity);
        let light_pos = lighting.point.position.coords.cast::<f32>();
        let camera_pos = camera.position.coords.cast::<f32>();
        let specular = crystal_core::palette::Rgb::from_hex(SPECULAR).to_array();

        gl.uniform_matrix4fv_with_f32_array(Some(&self.uniforms.model), false, model.as_slice());
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.uniforms.view_proj),
            false,
            view_proj.as_slice(),
        );
        gl.uniform3fv_with_f32_array(Some(&self.uniforms.ambient), &ambient);
        gl.uniform3fv_with_f32_array(Some(&self.uniforms.light_color), &light_color);
        gl.uniform3fv_with_f32_array(Some(&self.uniforms.light_pos), light_pos.as_slice());
        gl.uniform3fv_with_f32_array(Some(&self.uniforms.camera_pos), camera_pos.as_slice());
        gl.uniform3fv_with_f32_array(Some(&self.uniforms.specular), &specular);
        gl.uniform1f(Some(&self.uniforms.shininess), SHININESS);
        gl.uniform1f(Some(&self.uniforms.emissive), EMISSIVE_INTENSITY);
        gl.uniform1f(Some(&self.uniforms.opacity), OPACITY);
    }
}

impl RenderBackend for WebGlBackend {
    fn draw(&mut self, scene: &Scene) -> Result<(), CrystalError> {
        let gl = &self.gl;
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let verts = vertex_data(scene);
        if verts.is_empty() {
            return Ok(());
        }
        if gl.is_context_lost() {
            return Err(CrystalError::InitializationFailed(
                "webgl2 context lost".to_string(),
            ));
        }

        gl.use_program(Some(&self.program));
        self.set_uniforms(scene);
        gl.bind_vertex_array(Some(&self.vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.vbo));
        // SAFETY: the view is consumed by buffer_data before `verts` is touched
        // again and no allocation happens in between.
        unsafe {
            let view = js_sys::Float32Array::view(&verts);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &view, Gl::STREAM_DRAW);
        }
        gl.draw_arrays(Gl::TRIANGLES, 0, (verts.len() / FLOATS_PER_VERTEX) as i32);
        gl.bind_vertex_array(None);
        Ok(())
    }
}

/// Interleaved position, normal and color for every face, in crystal-local
/// space. The orientation is applied by the model matrix.
pub(crate) fn vertex_data(scene: &Scene) -> Vec<f32> {
    let Some(crystal) = scene.crystal() else {
        return Vec::new();
    };
    let mut verts = Vec::with_capacity(crystal.faces().len() * 3 * FLOATS_PER_VERTEX);
    for face in crystal.faces() {
        let normal = face.triangle.normal.cast::<f32>();
        let color = face.color.to_array();
        for vertex in &face.triangle.vertices {
            let p = vertex.coords.cast::<f32>();
            verts.extend_from_slice(&[p.x, p.y, p.z]);
            verts.extend_from_slice(&[normal.x, normal.y, normal.z]);
            verts.extend_from_slice(&color);
        }
    }
    verts
}

fn alpha_antialias_options() -> js_sys::Object {
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&options, &"alpha".into(), &true.into());
    let _ = js_sys::Reflect::set(&options, &"antialias".into(), &true.into());
    options
}

fn uniform(gl: &Gl, program: &WebGlProgram, name: &str) -> Result<WebGlUniformLocation> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| anyhow!("uniform {name} not found"))
}

fn build_program(gl: &Gl, vs_src: &str, fs_src: &str) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, Gl::VERTEX_SHADER, vs_src).context("vertex shader")?;
    let fs = compile_shader(gl, Gl::FRAGMENT_SHADER, fs_src).context("fragment shader")?;
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow!("unable to create program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if !gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown link error".to_string());
        return Err(anyhow!(log));
    }
    Ok(program)
}

fn compile_shader(gl: &Gl, kind: u32, src: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow!("unable to create shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        return Err(anyhow!(log));
    }
    Ok(shader)
}

#[cfg(test)]
mod tests {
    use super::{vertex_data, FLOATS_PER_VERTEX};
    use crystal_core::aggregate::CategoryTotal;
    use crystal_core::mesh::build_faces;
    use crystal_core::scene::Scene;
    use crystal_core::OverflowPolicy;

    #[test]
    fn vertex_data_is_empty_without_crystal() {
        let scene = Scene::new(320.0, 240.0).expect("scene");
        assert!(vertex_data(&scene).is_empty());
    }

    #[test]
    fn vertex_data_interleaves_three_vertices_per_face() {
        let totals = vec![
            CategoryTotal {
                category: "Food".to_string(),
                amount: 3,
            },
            CategoryTotal {
                category: "Health".to_string(),
                amount: 1,
            },
        ];
        let mut scene = Scene::new(320.0, 240.0).expect("scene");
        scene.rebuild(build_faces(&totals, 4, OverflowPolicy::Truncate));

        let verts = vertex_data(&scene);
        assert_eq!(verts.len(), 2 * 3 * FLOATS_PER_VERTEX);

        let faces = scene.crystal().expect("crystal").faces();
        let first_vertex = faces[0].triangle.vertices[0];
        assert!((verts[0] - first_vertex.x as f32).abs() < 1e-6);
        let color = faces[0].color.to_array();
        assert_eq!(&verts[6..9], &color);
    }
}
