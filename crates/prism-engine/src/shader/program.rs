use std::collections::{BTreeMap, BTreeSet};

use naga::{AddressSpace, Binding, Module, ShaderStage, TypeInner};

use super::{ShaderError, Stage};

/// Entry point every vertex module must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment module must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// One successfully compiled (parsed + validated) shader stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: Stage,
    source: String,
    module: Module,
}

impl CompiledStage {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Vertex input reflected from the vertex entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub location: u32,
    /// Number of scalar components (1..=4).
    pub components: u32,
}

/// What a uniform slot holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformKind {
    Buffer { size: u64 },
    Texture,
    Sampler,
}

/// Which stages reference a resource.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StageMask {
    pub vertex: bool,
    pub fragment: bool,
}

impl StageMask {
    fn with(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Vertex => self.vertex = true,
            Stage::Fragment => self.fragment = true,
        }
        self
    }
}

/// Resource binding reflected from either stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniform {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub kind: UniformKind,
    pub visibility: StageMask,
}

/// A linked vertex + fragment pair with its reflected symbol tables.
///
/// This is a CPU-side object; the backend turns it into device objects and
/// releases them when the surface goes away.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    label: String,
    vertex: CompiledStage,
    fragment: CompiledStage,
    attributes: Vec<Attribute>,
    uniforms: Vec<Uniform>,
}

impl ShaderProgram {
    /// Parses and validates a single stage.
    pub fn compile(stage: Stage, source: &str) -> Result<CompiledStage, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
            stage,
            message: e.emit_to_string(source),
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Compile {
                stage,
                message: e.as_inner().to_string(),
            })?;

        Ok(CompiledStage {
            stage,
            source: source.to_owned(),
            module,
        })
    }

    /// Resolves entry points and inter-stage interfaces.
    pub fn link(
        label: impl Into<String>,
        vertex: CompiledStage,
        fragment: CompiledStage,
    ) -> Result<Self, ShaderError> {
        if vertex.stage != Stage::Vertex || fragment.stage != Stage::Fragment {
            return Err(ShaderError::Link(format!(
                "stage mismatch: got {} + {}",
                vertex.stage, fragment.stage
            )));
        }

        let vs = entry_point(&vertex.module, VERTEX_ENTRY, ShaderStage::Vertex)?;
        let fs = entry_point(&fragment.module, FRAGMENT_ENTRY, ShaderStage::Fragment)?;

        let attributes = located_inputs(&vertex.module, vs)?;

        let produced = output_locations(&vertex.module, vs);
        for input in located_inputs(&fragment.module, fs)? {
            if !produced.contains(&input.location) {
                return Err(ShaderError::Link(format!(
                    "fragment input `{}` at location {} is not written by the vertex stage",
                    input.name, input.location
                )));
            }
        }

        let mut slots: BTreeMap<(u32, u32), Uniform> = BTreeMap::new();
        for stage in [&vertex, &fragment] {
            for uniform in resources(&stage.module, stage.stage)? {
                let key = (uniform.group, uniform.binding);
                match slots.get_mut(&key) {
                    Some(existing) if existing.name != uniform.name || existing.kind != uniform.kind => {
                        return Err(ShaderError::Link(format!(
                            "binding ({}, {}) is `{}` in one stage and `{}` in the other",
                            key.0, key.1, existing.name, uniform.name
                        )));
                    }
                    Some(existing) => existing.visibility = existing.visibility.with(stage.stage),
                    None => {
                        slots.insert(key, uniform);
                    }
                }
            }
        }

        let label = label.into();
        log::debug!(
            "linked program `{label}`: {} attribute(s), {} uniform(s)",
            attributes.len(),
            slots.len()
        );

        Ok(Self {
            label,
            vertex,
            fragment,
            attributes,
            uniforms: slots.into_values().collect(),
        })
    }

    /// Compiles both stages and links them.
    pub fn build(
        label: impl Into<String>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = Self::compile(Stage::Vertex, vertex_source)?;
        let fragment = Self::compile(Stage::Fragment, fragment_source)?;
        Self::link(label, vertex, fragment)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Uniforms ordered by `(group, binding)`.
    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    /// Looks up a vertex attribute by name.
    ///
    /// Absent names (typos, or inputs the compiler dropped) are `MissingSymbol`.
    pub fn locate_attribute(&self, name: &str) -> Result<&Attribute, ShaderError> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ShaderError::MissingSymbol { name: name.to_owned() })
    }

    /// Looks up a uniform, texture or sampler by name.
    pub fn locate_uniform(&self, name: &str) -> Result<&Uniform, ShaderError> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .ok_or_else(|| ShaderError::MissingSymbol { name: name.to_owned() })
    }
}

fn entry_point<'m>(
    module: &'m Module,
    name: &str,
    stage: ShaderStage,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| ShaderError::Link(format!("entry point `{name}` not found")))
}

/// Location-bound arguments of an entry point, flattening struct arguments.
fn located_inputs(module: &Module, ep: &naga::EntryPoint) -> Result<Vec<Attribute>, ShaderError> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        let name = arg.name.clone().unwrap_or_default();
        collect_located(module, &name, arg.ty, arg.binding.as_ref(), &mut out)?;
    }
    Ok(out)
}

/// Locations written by an entry point's result. Only the slots matter here,
/// so the value types are not inspected.
fn output_locations(module: &Module, ep: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    if let Some(result) = &ep.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn collect_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn collect_located(
    module: &Module,
    name: &str,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Attribute>,
) -> Result<(), ShaderError> {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push(Attribute {
                name: name.to_owned(),
                location: *location,
                components: components(&module.types[ty].inner).ok_or_else(|| {
                    ShaderError::Link(format!("`{name}` has a non-vector interface type"))
                })?,
            });
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    let member_name = member.name.clone().unwrap_or_default();
                    collect_located(module, &member_name, member.ty, member.binding.as_ref(), out)?;
                }
            }
        }
    }
    Ok(())
}

fn components(inner: &TypeInner) -> Option<u32> {
    match inner {
        TypeInner::Scalar(_) => Some(1),
        TypeInner::Vector { size, .. } => Some(*size as u32),
        _ => None,
    }
}

fn resources(module: &Module, stage: Stage) -> Result<Vec<Uniform>, ShaderError> {
    let mut out = Vec::new();
    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = var.name.clone().unwrap_or_default();
        let inner = &module.types[var.ty].inner;

        let kind = match (var.space, inner) {
            (AddressSpace::Uniform, inner) => UniformKind::Buffer {
                size: buffer_size(inner).ok_or_else(|| {
                    ShaderError::Link(format!("uniform `{name}` has an unsupported type"))
                })?,
            },
            (AddressSpace::Handle, TypeInner::Image { .. }) => UniformKind::Texture,
            (AddressSpace::Handle, TypeInner::Sampler { .. }) => UniformKind::Sampler,
            _ => {
                return Err(ShaderError::Link(format!(
                    "resource `{name}` uses an unsupported address space"
                )));
            }
        };

        out.push(Uniform {
            name,
            group: binding.group,
            binding: binding.binding,
            kind,
            visibility: StageMask::default().with(stage),
        });
    }
    Ok(out)
}

/// Byte size of a plain uniform value (vec3 columns pad to vec4).
fn buffer_size(inner: &TypeInner) -> Option<u64> {
    match inner {
        TypeInner::Scalar(s) => Some(u64::from(s.width)),
        TypeInner::Vector { size, scalar } => {
            let n = match *size as u64 {
                3 => 4,
                n => n,
            };
            Some(n * u64::from(scalar.width))
        }
        TypeInner::Matrix {
            columns,
            rows,
            scalar,
        } => {
            let rows = match *rows as u64 {
                3 => 4,
                n => n,
            };
            Some(*columns as u64 * rows * u64::from(scalar.width))
        }
        _ => None,
    }
}
