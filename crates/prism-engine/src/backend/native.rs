use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::geometry::{GeometryBuffer, Topology};
use crate::shader::{Attribute, ShaderProgram, Uniform, UniformKind, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::texture::{FilterMode, PixelBuffer, PixelFormat, TextureDesc, WrapMode};
use crate::transform::Mat4;

use super::{DrawUniforms, GeometryId, GpuBackend, ProgramId, RenderError, TextureId};

/// Every backend instance gets its own generation so handles from a previous
/// surface are recognizably stale.
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// [`GpuBackend`] over wgpu.
///
/// Programs map to a shader-module pair plus a bind group layout built from the
/// reflected uniforms; render pipelines are created lazily per
/// (topology, surface format). Each draw records its own render pass into the
/// frame encoder; the first pass of a frame clears.
pub struct WgpuBackend {
    gpu: Gpu,
    generation: u32,
    next_index: u32,

    programs: HashMap<u32, ProgramEntry>,
    geometries: HashMap<u32, GeometryEntry>,
    textures: HashMap<u32, TextureEntry>,

    viewport: (u32, u32),
    frame: Option<FrameState>,

    bound_program: Option<u32>,
    bound_texture: Option<u32>,
}

struct FrameState {
    frame: GpuFrame,
    clear: wgpu::Color,
    cleared: bool,
}

type PipelineKey = (Topology, wgpu::TextureFormat);

/// Bind group cache key: texture slot index and storage version.
type BindKey = Option<(u32, u64)>;

struct ProgramEntry {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    uniforms: Vec<Uniform>,
    buffers: HashMap<String, wgpu::Buffer>,
    position: Attribute,
    tex_coord: Option<Attribute>,

    bind_group: Option<(BindKey, wgpu::BindGroup)>,
}

struct GeometryEntry {
    positions: wgpu::Buffer,
    tex_coords: Option<wgpu::Buffer>,
    indices: Option<wgpu::Buffer>,
    components: u32,
    element_count: u32,
    topology: Topology,
}

struct TextureEntry {
    label: &'static str,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
    version: u64,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        let size = gpu.size();
        Self {
            gpu,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            next_index: 0,
            programs: HashMap::new(),
            geometries: HashMap::new(),
            textures: HashMap::new(),
            viewport: (size.width, size.height),
            frame: None,
            bound_program: None,
            bound_texture: None,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn next_index(&mut self) -> u32 {
        self.next_index += 1;
        self.next_index
    }

    fn current(&self, generation: u32, what: impl std::fmt::Display) -> Result<(), RenderError> {
        if generation == self.generation {
            Ok(())
        } else {
            Err(RenderError::InvalidHandle(what.to_string()))
        }
    }
}

impl GpuBackend for WgpuBackend {
    fn create_program(&mut self, program: &ShaderProgram) -> Result<ProgramId, RenderError> {
        let position = program.locate_attribute("position")?.clone();
        let tex_coord = program.locate_attribute("tex_coord").ok().cloned();

        if let Some(u) = program.uniforms().iter().find(|u| u.group != 0) {
            return Err(RenderError::Layout(format!(
                "`{}` uses bind group {}; only group 0 is supported",
                u.name, u.group
            )));
        }

        let device = self.gpu.device();
        let label = program.label().to_owned();

        let vs_label = format!("prism {label} vs");
        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&vs_label),
            source: wgpu::ShaderSource::Wgsl(program.vertex().source().into()),
        });
        let fs_label = format!("prism {label} fs");
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&fs_label),
            source: wgpu::ShaderSource::Wgsl(program.fragment().source().into()),
        });

        let entries: Vec<wgpu::BindGroupLayoutEntry> =
            program.uniforms().iter().map(layout_entry).collect();
        let bgl_label = format!("prism {label} bgl");
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&bgl_label),
            entries: &entries,
        });

        let layout_label = format!("prism {label} pipeline layout");
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&layout_label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffers = program
            .uniforms()
            .iter()
            .filter_map(|u| match u.kind {
                UniformKind::Buffer { size } => {
                    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&u.name),
                        size,
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    });
                    Some((u.name.clone(), buffer))
                }
                _ => None,
            })
            .collect();

        let index = self.next_index();
        self.programs.insert(
            index,
            ProgramEntry {
                label,
                vertex,
                fragment,
                bind_group_layout,
                pipeline_layout,
                pipelines: HashMap::new(),
                uniforms: program.uniforms().to_vec(),
                buffers,
                position,
                tex_coord,
                bind_group: None,
            },
        );

        Ok(ProgramId::new(index, self.generation))
    }

    fn release_program(&mut self, id: ProgramId) {
        if id.generation != self.generation {
            return;
        }
        if self.programs.remove(&id.index).is_some() && self.bound_program == Some(id.index) {
            self.bound_program = None;
        }
    }

    fn upload_geometry(&mut self, geometry: &GeometryBuffer) -> Result<GeometryId, RenderError> {
        let device = self.gpu.device();

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism positions"),
            contents: geometry.position_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let tex_coords = geometry.tex_coord_bytes().map(|bytes| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("prism tex coords"),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        let indices = geometry.index_bytes().map(|bytes| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("prism indices"),
                contents: bytes,
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let index = self.next_index();
        self.geometries.insert(
            index,
            GeometryEntry {
                positions,
                tex_coords,
                indices,
                components: geometry.components(),
                element_count: geometry.element_count(),
                topology: geometry.topology(),
            },
        );
        Ok(GeometryId::new(index, self.generation))
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if id.generation == self.generation {
            self.geometries.remove(&id.index);
        }
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RenderError> {
        let device = self.gpu.device();
        let format = texture_format(PixelFormat::Rgba8);
        let (texture, view) = allocate_texture(device, desc.label, 1, 1, format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(desc.label),
            address_mode_u: address_mode(desc.sampler.wrap_u),
            address_mode_v: address_mode(desc.sampler.wrap_v),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter_mode(desc.sampler.mag_filter),
            min_filter: filter_mode(desc.sampler.min_filter),
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let index = self.next_index();
        self.textures.insert(
            index,
            TextureEntry {
                label: desc.label,
                texture,
                view,
                sampler,
                format,
                version: 0,
            },
        );
        Ok(TextureId::new(index, self.generation))
    }

    fn upload_texture(&mut self, id: TextureId, pixels: &PixelBuffer) -> Result<(), RenderError> {
        if !self.is_texture_live(id) {
            return Err(RenderError::StaleTextureHandle(id));
        }
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let Some(entry) = self.textures.get_mut(&id.index) else {
            return Err(RenderError::StaleTextureHandle(id));
        };

        let (width, height) = pixels.size();
        let format = texture_format(pixels.format());
        let current = entry.texture.size();
        if current.width != width || current.height != height || entry.format != format {
            let (texture, view) = allocate_texture(device, entry.label, width, height, format);
            entry.texture = texture;
            entry.view = view;
            entry.format = format;
            entry.version += 1;
            log::debug!("{id} storage resized to {width}x{height} {format:?}");
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &entry.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(pixels.bytes_per_row()),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn release_texture(&mut self, id: TextureId) {
        if id.generation != self.generation || self.textures.remove(&id.index).is_none() {
            return;
        }
        if self.bound_texture == Some(id.index) {
            self.bound_texture = None;
        }
        for program in self.programs.values_mut() {
            if matches!(program.bind_group, Some((Some((index, _)), _)) if index == id.index) {
                program.bind_group = None;
            }
        }
    }

    fn is_texture_live(&self, id: TextureId) -> bool {
        id.generation == self.generation && self.textures.contains_key(&id.index)
    }

    /// Also reconfigures the swapchain: wgpu surfaces track the drawable size.
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        let size = PhysicalSize::new(width, height);
        if self.gpu.size() != size {
            self.gpu.resize(size);
        }
    }

    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<bool, RenderError> {
        if self.frame.is_some() {
            log::warn!("begin_frame with a frame in flight; presenting the previous one");
            self.end_frame();
        }

        match self.gpu.begin_frame() {
            Ok(frame) => {
                self.frame = Some(FrameState {
                    frame,
                    clear: wgpu::Color {
                        r: f64::from(clear[0]),
                        g: f64::from(clear[1]),
                        b: f64::from(clear[2]),
                        a: f64::from(clear[3]),
                    },
                    cleared: false,
                });
                Ok(true)
            }
            Err(err) => {
                let message = err.to_string();
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(RenderError::Surface(message)),
                    action => {
                        log::debug!("skipping frame ({message}): {action:?}");
                        Ok(false)
                    }
                }
            }
        }
    }

    fn bind_program(&mut self, id: ProgramId) -> Result<(), RenderError> {
        self.current(id.generation, id)?;
        if !self.programs.contains_key(&id.index) {
            return Err(RenderError::InvalidHandle(id.to_string()));
        }
        self.bound_program = Some(id.index);
        Ok(())
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<(), RenderError> {
        if !self.is_texture_live(id) {
            return Err(RenderError::StaleTextureHandle(id));
        }
        self.bound_texture = Some(id.index);
        Ok(())
    }

    fn unbind_all(&mut self) {
        self.bound_program = None;
        self.bound_texture = None;
    }

    fn draw(&mut self, geometry: GeometryId, uniforms: &DrawUniforms) -> Result<(), RenderError> {
        self.current(geometry.generation, geometry)?;

        let Some(state) = self.frame.as_mut() else {
            return Err(RenderError::Surface("draw issued outside of a frame".into()));
        };
        let program = self
            .bound_program
            .and_then(|i| self.programs.get_mut(&i))
            .ok_or_else(|| RenderError::InvalidHandle("no program bound".into()))?;
        let geo = self
            .geometries
            .get(&geometry.index)
            .ok_or_else(|| RenderError::InvalidHandle(geometry.to_string()))?;
        let texture = match self.bound_texture {
            Some(i) => Some((i, self.textures.get(&i).ok_or_else(|| {
                RenderError::InvalidHandle(format!("texture slot {i}"))
            })?)),
            None => None,
        };

        if geo.components != program.position.components {
            return Err(RenderError::Layout(format!(
                "`{}` expects {}-component positions, geometry has {}",
                program.label, program.position.components, geo.components
            )));
        }
        if program.tex_coord.is_some() && geo.tex_coords.is_none() {
            return Err(RenderError::Layout(format!(
                "`{}` samples a texture but the geometry has no texture coordinates",
                program.label
            )));
        }

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let key = (geo.topology, self.gpu.surface_format());

        write_uniforms(queue, program, uniforms);
        ensure_pipeline(device, program, key)?;
        ensure_bind_group(device, program, texture)?;

        let (Some(pipeline), Some((_, bind_group))) =
            (program.pipelines.get(&key), program.bind_group.as_ref())
        else {
            return Err(RenderError::Layout("pipeline state unavailable".into()));
        };

        let surface = self.gpu.size();
        let (vw, vh) = (
            self.viewport.0.min(surface.width).max(1),
            self.viewport.1.min(surface.height).max(1),
        );

        let load = if state.cleared {
            wgpu::LoadOp::Load
        } else {
            state.cleared = true;
            wgpu::LoadOp::Clear(state.clear)
        };

        let GpuFrame { view, encoder, .. } = &mut state.frame;
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &*view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, vw as f32, vh as f32, 0.0, 1.0);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, geo.positions.slice(..));
        if program.tex_coord.is_some() {
            if let Some(tc) = &geo.tex_coords {
                rpass.set_vertex_buffer(1, tc.slice(..));
            }
        }
        match &geo.indices {
            Some(ibo) => {
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..geo.element_count, 0, 0..1);
            }
            None => rpass.draw(0..geo.element_count, 0..1),
        }

        Ok(())
    }

    fn end_frame(&mut self) {
        let Some(mut state) = self.frame.take() else { return };

        if !state.cleared {
            // Nothing was drawn; still present a cleared image.
            let GpuFrame { view, encoder, .. } = &mut state.frame;
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &*view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(state.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.gpu.submit(state.frame);
    }
}

fn layout_entry(u: &Uniform) -> wgpu::BindGroupLayoutEntry {
    let mut visibility = wgpu::ShaderStages::NONE;
    if u.visibility.vertex {
        visibility |= wgpu::ShaderStages::VERTEX;
    }
    if u.visibility.fragment {
        visibility |= wgpu::ShaderStages::FRAGMENT;
    }

    let ty = match u.kind {
        UniformKind::Buffer { size } => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size),
        },
        UniformKind::Texture => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        UniformKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    };

    wgpu::BindGroupLayoutEntry {
        binding: u.binding,
        visibility,
        ty,
        count: None,
    }
}

/// `mat4x4<f32>` uniform, column-major.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    cols: [[f32; 4]; 4],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self {
            cols: m.to_cols_array_2d(),
        }
    }
}

/// `vec4<f32>` uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ColorUniform {
    rgba: [f32; 4],
}

fn write_uniforms(queue: &wgpu::Queue, program: &ProgramEntry, uniforms: &DrawUniforms) {
    for (name, buffer) in &program.buffers {
        match name.as_str() {
            "u_mvp" => {
                let m = MatrixUniform::from(uniforms.mvp);
                queue.write_buffer(buffer, 0, bytemuck::bytes_of(&m));
            }
            "u_tex_matrix" => {
                let m = MatrixUniform::from(uniforms.tex_matrix.unwrap_or(Mat4::IDENTITY));
                queue.write_buffer(buffer, 0, bytemuck::bytes_of(&m));
            }
            "u_color" => {
                let c = ColorUniform {
                    rgba: uniforms.color.unwrap_or([1.0; 4]),
                };
                queue.write_buffer(buffer, 0, bytemuck::bytes_of(&c));
            }
            other => log::trace!("`{}`: no value for uniform `{other}`", program.label),
        }
    }
}

fn ensure_pipeline(
    device: &wgpu::Device,
    program: &mut ProgramEntry,
    key: PipelineKey,
) -> Result<(), RenderError> {
    if program.pipelines.contains_key(&key) {
        return Ok(());
    }
    let (topology, surface_format) = key;

    let position_attrs = [wgpu::VertexAttribute {
        format: vertex_format(program.position.components)?,
        offset: 0,
        shader_location: program.position.location,
    }];
    let tex_attrs = match &program.tex_coord {
        Some(a) => Some([wgpu::VertexAttribute {
            format: vertex_format(a.components)?,
            offset: 0,
            shader_location: a.location,
        }]),
        None => None,
    };

    let mut buffers = vec![wgpu::VertexBufferLayout {
        array_stride: u64::from(program.position.components) * 4,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &position_attrs,
    }];
    if let (Some(attrs), Some(a)) = (&tex_attrs, &program.tex_coord) {
        buffers.push(wgpu::VertexBufferLayout {
            array_stride: u64::from(a.components) * 4,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: attrs,
        });
    }

    let (topology, strip_index_format) = match topology {
        Topology::TriangleList => (wgpu::PrimitiveTopology::TriangleList, None),
        Topology::TriangleStrip => (
            wgpu::PrimitiveTopology::TriangleStrip,
            Some(wgpu::IndexFormat::Uint16),
        ),
    };

    let label = format!("prism {} pipeline", program.label);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(&program.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    program.pipelines.insert(key, pipeline);
    Ok(())
}

fn ensure_bind_group(
    device: &wgpu::Device,
    program: &mut ProgramEntry,
    texture: Option<(u32, &TextureEntry)>,
) -> Result<(), RenderError> {
    let key: BindKey = texture.map(|(i, t)| (i, t.version));
    if matches!(&program.bind_group, Some((cached, _)) if *cached == key) {
        return Ok(());
    }

    let mut entries = Vec::with_capacity(program.uniforms.len());
    for u in &program.uniforms {
        let resource = match u.kind {
            UniformKind::Buffer { .. } => program
                .buffers
                .get(&u.name)
                .ok_or_else(|| RenderError::Layout(format!("no buffer for `{}`", u.name)))?
                .as_entire_binding(),
            UniformKind::Texture => {
                let (_, t) = texture.ok_or_else(|| {
                    RenderError::Texture(format!("`{}` needs a bound texture", program.label))
                })?;
                wgpu::BindingResource::TextureView(&t.view)
            }
            UniformKind::Sampler => {
                let (_, t) = texture.ok_or_else(|| {
                    RenderError::Texture(format!("`{}` needs a bound sampler", program.label))
                })?;
                wgpu::BindingResource::Sampler(&t.sampler)
            }
        };
        entries.push(wgpu::BindGroupEntry {
            binding: u.binding,
            resource,
        });
    }

    let label = format!("prism {} bind group", program.label);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&label),
        layout: &program.bind_group_layout,
        entries: &entries,
    });

    program.bind_group = Some((key, bind_group));
    Ok(())
}

fn allocate_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Rgba8 => wgpu::TextureFormat::Rgba8UnormSrgb,
        PixelFormat::Bgra8 => wgpu::TextureFormat::Bgra8UnormSrgb,
    }
}

fn filter_mode(mode: FilterMode) -> wgpu::FilterMode {
    match mode {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}

fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn vertex_format(components: u32) -> Result<wgpu::VertexFormat, RenderError> {
    match components {
        1 => Ok(wgpu::VertexFormat::Float32),
        2 => Ok(wgpu::VertexFormat::Float32x2),
        3 => Ok(wgpu::VertexFormat::Float32x3),
        4 => Ok(wgpu::VertexFormat::Float32x4),
        n => Err(RenderError::Layout(format!("unsupported attribute width {n}"))),
    }
}
