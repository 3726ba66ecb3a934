//! Mesh vertex streams and their buffer layouts
//!
//! Meshes are split into two streams, each bound through its own
//! [`BufferIndex`] slot: a tightly packed position stream and a "generics"
//! stream carrying the remaining attributes (currently just texcoords).

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::slots::{BufferIndex, VertexAttribute};

/// Element of the position stream, bound at [`BufferIndex::MeshPositions`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshPosition {
    pub position: Vec3,
}

impl MeshPosition {
    pub const BUFFER: BufferIndex = BufferIndex::MeshPositions;

    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: VertexAttribute::Position.location(),
    }];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Element of the generics stream, bound at [`BufferIndex::MeshGenerics`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshGeneric {
    pub texcoord: Vec2,
}

impl MeshGeneric {
    pub const BUFFER: BufferIndex = BufferIndex::MeshGenerics;

    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: VertexAttribute::Texcoord.location(),
    }];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

const _: () = {
    assert!(std::mem::size_of::<MeshPosition>() == 12);
    assert!(std::mem::size_of::<MeshGeneric>() == 8);
    // Stream order in the pipeline vertex state follows the buffer slots.
    assert!(MeshPosition::BUFFER as u32 == 0);
    assert!(MeshGeneric::BUFFER as u32 == 1);
};

/// Vertex buffer layouts for pipeline creation, ordered by buffer slot.
pub const fn mesh_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [MeshPosition::LAYOUT, MeshGeneric::LAYOUT]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_strides_match_contract() {
        assert_eq!(MeshPosition::LAYOUT.array_stride, 12);
        assert_eq!(MeshGeneric::LAYOUT.array_stride, 8);
    }

    #[test]
    fn shader_locations_come_from_attribute_slots() {
        assert_eq!(
            MeshPosition::ATTRIBUTES[0].shader_location,
            VertexAttribute::Position.location()
        );
        assert_eq!(
            MeshGeneric::ATTRIBUTES[0].shader_location,
            VertexAttribute::Texcoord.location()
        );
    }

    #[test]
    fn layouts_are_ordered_by_buffer_slot() {
        let layouts = mesh_buffer_layouts();
        assert_eq!(layouts[MeshPosition::BUFFER.binding() as usize].array_stride, 12);
        assert_eq!(layouts[MeshGeneric::BUFFER.binding() as usize].array_stride, 8);
    }

    #[test]
    fn position_stream_is_tightly_packed() {
        let verts = [
            MeshPosition { position: Vec3::new(1.0, 2.0, 3.0) },
            MeshPosition { position: Vec3::new(4.0, 5.0, 6.0) },
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 24);
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[3], 4.0);
    }
}
