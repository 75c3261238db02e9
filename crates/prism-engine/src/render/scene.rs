use crate::backend::{BindScope, DrawUniforms, GeometryId, GpuBackend, ProgramId, RenderError};
use crate::camera::CameraFrameBridge;
use crate::geometry::{self, GeometryBuffer};
use crate::shader::ShaderProgram;
use crate::texture::{PixelBuffer, TextureBinder};
use crate::transform::{self, FitPolicy, Mat4};

use super::shaders::{CAMERA_VS, SOLID_FS, SOLID_VS, TEXTURED_FS, TEXTURED_VS};
use super::Renderer;

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const DEFAULT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// What a [`SceneRenderer`] draws.
pub enum Scene {
    Triangle,
    Square,
    Circle { radius: f32, segments: u16 },
    /// A decoded image, shown centered without cropping.
    Image(PixelBuffer),
    /// Full-surface live camera frames.
    CameraFeed(CameraFrameBridge),
}

impl Scene {
    pub fn circle() -> Self {
        Scene::Circle {
            radius: 0.5,
            segments: 60,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Triangle => "triangle",
            Scene::Square => "square",
            Scene::Circle { .. } => "circle",
            Scene::Image(_) => "image",
            Scene::CameraFeed(_) => "camera",
        }
    }

    fn shaders(&self) -> (&'static str, &'static str) {
        match self {
            Scene::Triangle | Scene::Square | Scene::Circle { .. } => (SOLID_VS, SOLID_FS),
            Scene::Image(_) => (TEXTURED_VS, TEXTURED_FS),
            Scene::CameraFeed(_) => (CAMERA_VS, TEXTURED_FS),
        }
    }

    fn policy(&self) -> FitPolicy {
        match self {
            Scene::Triangle | Scene::Square | Scene::Circle { .. } => FitPolicy::OrthoFit,
            Scene::Image(_) => FitPolicy::CenterInside,
            Scene::CameraFeed(_) => FitPolicy::Identity,
        }
    }

    fn geometry(&self) -> GeometryBuffer {
        match self {
            Scene::Triangle => geometry::triangle(),
            Scene::Square => geometry::square(),
            Scene::Circle { radius, segments } => geometry::circle(*radius, *segments),
            Scene::Image(_) => geometry::image_quad(),
            Scene::CameraFeed(_) => geometry::camera_quad(),
        }
    }
}

struct Loaded {
    shader: ShaderProgram,
    program: ProgramId,
    geometry: GeometryId,
    image: Option<TextureBinder>,
}

/// The one renderer behind every scene kind.
///
/// Scene kinds only differ in data (shaders, geometry, fit policy and an
/// optional texture source); setup, resize and draw are shared.
pub struct SceneRenderer {
    scene: Scene,
    color: [f32; 4],
    mvp: Mat4,
    loaded: Option<Loaded>,
}

impl SceneRenderer {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            color: DEFAULT_COLOR,
            mvp: Mat4::IDENTITY,
            loaded: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }

    fn release(&mut self, gpu: &mut dyn GpuBackend) {
        if let Some(loaded) = self.loaded.take() {
            gpu.release_geometry(loaded.geometry);
            gpu.release_program(loaded.program);
            if let Some(image) = loaded.image {
                image.release(gpu);
            }
        }
    }
}

impl Renderer for SceneRenderer {
    fn on_ready(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        self.release(gpu);

        let (vs, fs) = self.scene.shaders();
        let shader = ShaderProgram::build(self.scene.name(), vs, fs)?;
        shader.locate_attribute("position")?;

        let program = gpu.create_program(&shader)?;
        let geometry = match gpu.upload_geometry(&self.scene.geometry()) {
            Ok(g) => g,
            Err(e) => {
                gpu.release_program(program);
                return Err(e);
            }
        };

        let image = match &mut self.scene {
            Scene::Image(pixels) => TextureBinder::create_2d(gpu, "image", pixels).map(Some),
            Scene::CameraFeed(bridge) => bridge.on_surface_created(gpu).map(|()| None),
            _ => Ok(None),
        };
        let image = match image {
            Ok(image) => image,
            Err(e) => {
                gpu.release_geometry(geometry);
                gpu.release_program(program);
                return Err(e);
            }
        };

        self.loaded = Some(Loaded {
            shader,
            program,
            geometry,
            image,
        });
        Ok(())
    }

    fn on_resize(&mut self, gpu: &mut dyn GpuBackend, width: u32, height: u32) {
        gpu.set_viewport(width, height);
        let (content_width, content_height) = match &self.scene {
            Scene::Image(pixels) => pixels.size(),
            _ => (width, height),
        };
        self.mvp = transform::solve(width, height, content_width, content_height, self.scene.policy());
    }

    fn on_draw(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        let Self {
            scene,
            color,
            mvp,
            loaded,
        } = self;
        let Some(loaded) = loaded.as_ref() else {
            return Ok(());
        };

        let is_camera = matches!(scene, Scene::CameraFeed(_));
        let (texture, tex_matrix) = match scene {
            Scene::CameraFeed(bridge) => match bridge.prepare(gpu)? {
                Some(stream) => (Some(stream.texture), Some(stream.tex_matrix)),
                None => (None, None),
            },
            _ => (loaded.image.as_ref(), None),
        };
        // A camera feed with no frame yet still presents a cleared surface.
        let skip = is_camera && texture.is_none();

        if !gpu.begin_frame(CLEAR_COLOR)? {
            return Ok(());
        }

        let result = if skip {
            Ok(())
        } else {
            let mut uniforms = DrawUniforms::new(*mvp);
            if loaded.shader.locate_uniform("u_color").is_ok() {
                uniforms.color = Some(*color);
            }
            if loaded.shader.locate_uniform("u_tex_matrix").is_ok() {
                uniforms.tex_matrix = tex_matrix;
            }
            draw(gpu, loaded, texture, &uniforms)
        };

        gpu.end_frame();
        result
    }

    fn on_destroy(&mut self, gpu: &mut dyn GpuBackend) {
        self.release(gpu);
        if let Scene::CameraFeed(bridge) = &mut self.scene {
            bridge.close(gpu);
        }
    }
}

fn draw(
    gpu: &mut dyn GpuBackend,
    loaded: &Loaded,
    texture: Option<&TextureBinder>,
    uniforms: &DrawUniforms,
) -> Result<(), RenderError> {
    let mut scope = BindScope::new(gpu);
    scope.program(loaded.program)?;
    if let Some(texture) = texture {
        texture.bind(&mut scope, &loaded.shader)?;
    }
    scope.draw(loaded.geometry, uniforms)
}
