//! Binding slot enumerations shared between host code and shaders
//!
//! The numeric values of these enums appear verbatim in the WGSL sources as
//! `@group`/`@binding` and `@location` attributes. Buffers live in bind group
//! [`BUFFER_GROUP`] at their [`BufferIndex`] value, textures in bind group
//! [`TEXTURE_GROUP`] at their [`TextureIndex`] value, with the shared sampler
//! directly after the texture table at [`SAMPLER_BINDING`].
//!
//! Each enum carries a `COUNT` constant instead of a trailing sentinel
//! variant, so the count can size arrays but can never be passed where a real
//! slot is expected.

/// Bind group holding per-draw buffers (vertex streams, uniforms).
pub const BUFFER_GROUP: u32 = 0;

/// Bind group holding textures and the shared sampler.
pub const TEXTURE_GROUP: u32 = 1;

/// Buffer binding slots.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferIndex {
    MeshPositions = 0,
    MeshGenerics = 1,
    Uniforms = 2,
}

impl BufferIndex {
    /// Number of buffer slots; sizes tables indexed by [`BufferIndex`].
    pub const COUNT: usize = 3;

    /// All slots in binding order.
    pub const ALL: [Self; Self::COUNT] = [Self::MeshPositions, Self::MeshGenerics, Self::Uniforms];

    /// The `@binding` value inside [`BUFFER_GROUP`].
    pub const fn binding(self) -> u32 {
        self as u32
    }

    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::MeshPositions),
            1 => Some(Self::MeshGenerics),
            2 => Some(Self::Uniforms),
            _ => None,
        }
    }
}

/// Vertex attribute slots. Ordering mirrors the fixed shader input layout.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position = 0,
    Texcoord = 1,
}

impl VertexAttribute {
    pub const COUNT: usize = 2;

    pub const ALL: [Self; Self::COUNT] = [Self::Position, Self::Texcoord];

    /// The `@location` value in the vertex stage input.
    pub const fn location(self) -> u32 {
        self as u32
    }

    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Position),
            1 => Some(Self::Texcoord),
            _ => None,
        }
    }
}

/// Texture binding slots. `Albedo` and `NormalDepth` double as the color
/// attachment indices of the G-buffer pass.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureIndex {
    Albedo = 0,
    NormalDepth = 1,
    ColorMap = 2,
}

impl TextureIndex {
    /// Number of texture slots; sizes tables indexed by [`TextureIndex`].
    pub const COUNT: usize = 3;

    /// All slots in binding order.
    pub const ALL: [Self; Self::COUNT] = [Self::Albedo, Self::NormalDepth, Self::ColorMap];

    /// The `@binding` value inside [`TEXTURE_GROUP`].
    pub const fn binding(self) -> u32 {
        self as u32
    }

    /// The color attachment index a render target bound to this slot uses.
    pub const fn attachment(self) -> u32 {
        self as u32
    }

    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Albedo),
            1 => Some(Self::NormalDepth),
            2 => Some(Self::ColorMap),
            _ => None,
        }
    }
}

/// Binding of the shared sampler, placed just past the texture table.
pub const SAMPLER_BINDING: u32 = TextureIndex::COUNT as u32;

// Slot values are a contract with the WGSL sources; keep them contiguous and
// zero-based.
const _: () = {
    assert!(BufferIndex::MeshPositions as u32 == 0);
    assert!(BufferIndex::MeshGenerics as u32 == 1);
    assert!(BufferIndex::Uniforms as u32 == 2);
    assert!(BufferIndex::ALL.len() == BufferIndex::COUNT);

    assert!(VertexAttribute::Position as u32 == 0);
    assert!(VertexAttribute::Texcoord as u32 == 1);
    assert!(VertexAttribute::ALL.len() == VertexAttribute::COUNT);

    assert!(TextureIndex::Albedo as u32 == 0);
    assert!(TextureIndex::NormalDepth as u32 == 1);
    assert!(TextureIndex::ColorMap as u32 == 2);
    assert!(TextureIndex::ALL.len() == TextureIndex::COUNT);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_slots_are_contiguous() {
        for (i, slot) in BufferIndex::ALL.iter().enumerate() {
            assert_eq!(slot.binding(), i as u32);
        }
    }

    #[test]
    fn texture_slots_are_contiguous() {
        for (i, slot) in TextureIndex::ALL.iter().enumerate() {
            assert_eq!(slot.binding(), i as u32);
            assert_eq!(slot.attachment(), i as u32);
        }
    }

    #[test]
    fn attribute_locations_are_contiguous() {
        for (i, attr) in VertexAttribute::ALL.iter().enumerate() {
            assert_eq!(attr.location(), i as u32);
        }
    }

    #[test]
    fn from_index_round_trips() {
        for slot in BufferIndex::ALL {
            assert_eq!(BufferIndex::from_index(slot.binding()), Some(slot));
        }
        for slot in TextureIndex::ALL {
            assert_eq!(TextureIndex::from_index(slot.binding()), Some(slot));
        }
        for attr in VertexAttribute::ALL {
            assert_eq!(VertexAttribute::from_index(attr.location()), Some(attr));
        }
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(BufferIndex::from_index(BufferIndex::COUNT as u32), None);
        assert_eq!(TextureIndex::from_index(TextureIndex::COUNT as u32), None);
        assert_eq!(VertexAttribute::from_index(VertexAttribute::COUNT as u32), None);
    }

    #[test]
    fn sampler_sits_past_the_texture_table() {
        assert_eq!(SAMPLER_BINDING, TextureIndex::ALL.len() as u32);
    }
}
