//! Load-time checks that a WGSL module matches the host-side contract
//!
//! The records in this crate cross the host/shader boundary as raw bytes, so
//! nothing catches a divergence between the two sides at compile time. These
//! checks parse a shader with naga and compare the reflected struct sizes,
//! member offsets, resource bindings and entry point locations against the
//! host definitions. Run them once at startup, before building pipelines.

use naga::proc::Layouter;
use thiserror::Error;

use crate::gbuffer::GBufferData;
use crate::slots::{
    BufferIndex, TextureIndex, VertexAttribute, BUFFER_GROUP, SAMPLER_BINDING, TEXTURE_GROUP,
};
use crate::uniforms::Uniforms;

/// Entry point names shared with the WGSL sources.
pub const GBUFFER_VERTEX_ENTRY: &str = "gbuffer_vertex";
pub const GBUFFER_FRAGMENT_ENTRY: &str = "gbuffer_fragment";
pub const DEFERRED_VERTEX_ENTRY: &str = "deferred_vertex";
pub const DEFERRED_FRAGMENT_ENTRY: &str = "deferred_fragment";

/// Interface mismatch between a shader module and the host contract.
#[derive(Error, Debug)]
pub enum InterfaceError {
    #[error("failed to parse WGSL: {0}")]
    Parse(String),
    #[error("failed to lay out shader types: {0}")]
    Layout(String),
    #[error("entry point `{0}` not found")]
    MissingEntryPoint(String),
    #[error("no uniform block bound at group {group} binding {binding}")]
    MissingUniformBlock { group: u32, binding: u32 },
    #[error("uniform block `{name}` is {shader} bytes in the shader but {host} bytes on the host")]
    SizeMismatch { name: String, shader: u32, host: u32 },
    #[error("uniform block has {shader} members, expected {host}")]
    MemberCountMismatch { shader: usize, host: usize },
    #[error("member `{name}` sits at offset {shader} in the shader but {host} on the host")]
    OffsetMismatch { name: String, shader: u32, host: u32 },
    #[error("member `{name}` is not a mat4x4<f32>")]
    MemberTypeMismatch { name: String },
    #[error("vertex entry `{entry}` reads location {location}, which no attribute feeds")]
    UnknownVertexInput { entry: String, location: u32 },
    #[error("vertex input at location {location} has an unexpected type")]
    VertexInputTypeMismatch { location: u32 },
    #[error("fragment entry `{entry}` writes locations {found:?}, expected {expected:?}")]
    FragmentOutputMismatch {
        entry: String,
        found: Vec<u32>,
        expected: Vec<u32>,
    },
    #[error("texture `{name}` is bound at group {group} binding {binding}, outside the texture table")]
    UnknownTextureBinding {
        name: String,
        group: u32,
        binding: u32,
    },
    #[error("sampler `{name}` is bound at group {group} binding {binding}, expected group {expected_group} binding {expected_binding}")]
    SamplerBindingMismatch {
        name: String,
        group: u32,
        binding: u32,
        expected_group: u32,
        expected_binding: u32,
    },
}

pub type InterfaceResult<T> = Result<T, InterfaceError>;

/// Parse WGSL source into a naga module.
pub fn parse_wgsl(source: &str) -> InterfaceResult<naga::Module> {
    naga::front::wgsl::parse_str(source)
        .map_err(|err| InterfaceError::Parse(err.emit_to_string(source)))
}

/// Check the uniform block bound at [`BufferIndex::Uniforms`] against
/// [`Uniforms`]: same size, member offsets, and member types.
pub fn validate_uniform_block(module: &naga::Module) -> InterfaceResult<()> {
    let binding = naga::ResourceBinding {
        group: BUFFER_GROUP,
        binding: BufferIndex::Uniforms.binding(),
    };
    let var = module
        .global_variables
        .iter()
        .map(|(_, var)| var)
        .find(|var| {
            var.space == naga::AddressSpace::Uniform && var.binding.as_ref() == Some(&binding)
        })
        .ok_or(InterfaceError::MissingUniformBlock {
            group: binding.group,
            binding: binding.binding,
        })?;

    let mut layouter = Layouter::default();
    layouter
        .update(module.to_ctx())
        .map_err(|err| InterfaceError::Layout(err.to_string()))?;

    let ty = &module.types[var.ty];
    let name = ty.name.clone().unwrap_or_else(|| "<anonymous>".to_string());

    let shader_size = layouter[var.ty].size;
    let host_size = std::mem::size_of::<Uniforms>() as u32;
    if shader_size != host_size {
        return Err(InterfaceError::SizeMismatch {
            name,
            shader: shader_size,
            host: host_size,
        });
    }

    let naga::TypeInner::Struct { members, .. } = &ty.inner else {
        return Err(InterfaceError::MemberTypeMismatch { name });
    };
    let expected = [
        ("projection_matrix", std::mem::offset_of!(Uniforms, projection_matrix) as u32),
        ("model_view_matrix", std::mem::offset_of!(Uniforms, model_view_matrix) as u32),
    ];
    if members.len() != expected.len() {
        return Err(InterfaceError::MemberCountMismatch {
            shader: members.len(),
            host: expected.len(),
        });
    }
    for (member, (host_name, host_offset)) in members.iter().zip(expected) {
        let member_name = member
            .name
            .clone()
            .unwrap_or_else(|| host_name.to_string());
        if member.offset != host_offset {
            return Err(InterfaceError::OffsetMismatch {
                name: member_name,
                shader: member.offset,
                host: host_offset,
            });
        }
        if !is_mat4x4_f32(&module.types[member.ty].inner) {
            return Err(InterfaceError::MemberTypeMismatch { name: member_name });
        }
    }

    log::debug!("uniform block `{name}` matches the host layout ({host_size} bytes)");
    Ok(())
}

/// Check that a vertex entry point only reads locations the mesh streams
/// feed, with the expected component types.
pub fn validate_vertex_inputs(module: &naga::Module, entry: &str) -> InterfaceResult<()> {
    let ep = find_entry(module, entry, naga::ShaderStage::Vertex)?;
    for (location, inner) in input_locations(module, &ep.function) {
        match VertexAttribute::from_index(location) {
            Some(VertexAttribute::Position) => {
                if !is_vec_f32(inner, naga::VectorSize::Tri) {
                    return Err(InterfaceError::VertexInputTypeMismatch { location });
                }
            }
            Some(VertexAttribute::Texcoord) => {
                if !is_vec_f32(inner, naga::VectorSize::Bi) {
                    return Err(InterfaceError::VertexInputTypeMismatch { location });
                }
            }
            None => {
                return Err(InterfaceError::UnknownVertexInput {
                    entry: entry.to_string(),
                    location,
                });
            }
        }
    }
    log::debug!("vertex entry `{entry}` reads only attested attribute locations");
    Ok(())
}

/// Check that a fragment entry point writes exactly the given attachment
/// locations.
pub fn validate_fragment_outputs(
    module: &naga::Module,
    entry: &str,
    expected: &[u32],
) -> InterfaceResult<()> {
    let ep = find_entry(module, entry, naga::ShaderStage::Fragment)?;
    let mut found = Vec::new();
    if let Some(result) = &ep.function.result {
        match &result.binding {
            Some(naga::Binding::Location { location, .. }) => found.push(*location),
            _ => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[result.ty].inner {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            found.push(*location);
                        }
                    }
                }
            }
        }
    }
    found.sort_unstable();
    let mut want = expected.to_vec();
    want.sort_unstable();
    if found != want {
        return Err(InterfaceError::FragmentOutputMismatch {
            entry: entry.to_string(),
            found,
            expected: want,
        });
    }
    log::debug!("fragment entry `{entry}` writes attachments {want:?}");
    Ok(())
}

/// Check that every texture global sits in the texture table and the shared
/// sampler at [`SAMPLER_BINDING`].
pub fn validate_texture_bindings(module: &naga::Module) -> InterfaceResult<()> {
    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else { continue };
        let name = var.name.clone().unwrap_or_else(|| "<anonymous>".to_string());
        match &module.types[var.ty].inner {
            naga::TypeInner::Image { .. } => {
                if binding.group != TEXTURE_GROUP
                    || TextureIndex::from_index(binding.binding).is_none()
                {
                    return Err(InterfaceError::UnknownTextureBinding {
                        name,
                        group: binding.group,
                        binding: binding.binding,
                    });
                }
            }
            naga::TypeInner::Sampler { .. } => {
                if binding.group != TEXTURE_GROUP || binding.binding != SAMPLER_BINDING {
                    return Err(InterfaceError::SamplerBindingMismatch {
                        name,
                        group: binding.group,
                        binding: binding.binding,
                        expected_group: TEXTURE_GROUP,
                        expected_binding: SAMPLER_BINDING,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate the full deferred pipeline interface of a module containing both
/// the G-buffer and the deferred lighting entry points.
pub fn validate_deferred_module(module: &naga::Module) -> InterfaceResult<()> {
    validate_uniform_block(module)?;
    validate_texture_bindings(module)?;
    validate_vertex_inputs(module, GBUFFER_VERTEX_ENTRY)?;
    validate_fragment_outputs(
        module,
        GBUFFER_FRAGMENT_ENTRY,
        &[
            GBufferData::ALBEDO_ATTACHMENT.attachment(),
            GBufferData::NORMAL_DEPTH_ATTACHMENT.attachment(),
        ],
    )?;
    validate_vertex_inputs(module, DEFERRED_VERTEX_ENTRY)?;
    // The lighting pass resolves to the single swapchain attachment.
    validate_fragment_outputs(module, DEFERRED_FRAGMENT_ENTRY, &[0])?;
    log::info!("deferred shader module matches the host interface contract");
    Ok(())
}

fn find_entry<'a>(
    module: &'a naga::Module,
    name: &str,
    stage: naga::ShaderStage,
) -> InterfaceResult<&'a naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| InterfaceError::MissingEntryPoint(name.to_string()))
}

/// Flatten entry point arguments into `(location, type)` pairs, looking
/// through input structs. Builtins are skipped.
fn input_locations<'a>(
    module: &'a naga::Module,
    function: &'a naga::Function,
) -> Vec<(u32, &'a naga::TypeInner)> {
    let mut locations = Vec::new();
    for arg in &function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => {
                locations.push((*location, &module.types[arg.ty].inner));
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            locations.push((*location, &module.types[member.ty].inner));
                        }
                    }
                }
            }
        }
    }
    locations
}

fn is_mat4x4_f32(inner: &naga::TypeInner) -> bool {
    matches!(
        inner,
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar: naga::Scalar {
                kind: naga::ScalarKind::Float,
                width: 4,
            },
        }
    )
}

fn is_vec_f32(inner: &naga::TypeInner, expected: naga::VectorSize) -> bool {
    matches!(
        inner,
        naga::TypeInner::Vector {
            size,
            scalar: naga::Scalar {
                kind: naga::ScalarKind::Float,
                width: 4,
            },
        } if *size == expected
    )
}
