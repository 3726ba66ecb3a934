//! Per-frame uniform data shared with every pass

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniform buffers bound for dynamic offsets must align each slot to this.
pub const UNIFORM_ALIGN: usize = 256;

/// Per-frame uniforms, bound at [`BufferIndex::Uniforms`].
///
/// The struct is copied to the GPU as raw bytes, so field order, size and
/// alignment are part of the shader contract: two column-major `mat4x4<f32>`
/// at offsets 0 and 64, 128 bytes total, no padding.
///
/// [`BufferIndex::Uniforms`]: crate::slots::BufferIndex::Uniforms
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub projection_matrix: Mat4,
    pub model_view_matrix: Mat4,
}

const _: () = {
    assert!(std::mem::size_of::<Uniforms>() == 128);
    assert!(std::mem::align_of::<Uniforms>() == 16);
    assert!(std::mem::offset_of!(Uniforms, projection_matrix) == 0);
    assert!(std::mem::offset_of!(Uniforms, model_view_matrix) == 64);
};

impl Uniforms {
    pub const IDENTITY: Self = Self {
        projection_matrix: Mat4::IDENTITY,
        model_view_matrix: Mat4::IDENTITY,
    };

    pub fn new(projection_matrix: Mat4, model_view_matrix: Mat4) -> Self {
        Self {
            projection_matrix,
            model_view_matrix,
        }
    }

    /// Raw bytes for uploading into a uniform buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Reinterpret a raw block as uniforms. Returns `None` when the block's
    /// size or alignment does not match.
    pub fn from_bytes(bytes: &[u8]) -> Option<&Self> {
        bytemuck::try_from_bytes(bytes).ok()
    }

    /// Slot size for ring-buffered uniforms, rounded up to [`UNIFORM_ALIGN`].
    pub const fn aligned_size() -> usize {
        (std::mem::size_of::<Self>() + UNIFORM_ALIGN - 1) & !(UNIFORM_ALIGN - 1)
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn layout_matches_contract() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 128);
        assert_eq!(std::mem::offset_of!(Uniforms, projection_matrix), 0);
        assert_eq!(std::mem::offset_of!(Uniforms, model_view_matrix), 64);
    }

    #[test]
    fn byte_round_trip() {
        let uniforms = Uniforms::new(
            Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 100.0),
            Mat4::from_translation(Vec3::new(1.0, 2.0, -3.0)),
        );
        let restored = Uniforms::from_bytes(uniforms.as_bytes()).unwrap();
        assert_eq!(*restored, uniforms);
    }

    #[test]
    fn model_view_occupies_second_matrix() {
        let mut uniforms = Uniforms::IDENTITY;
        uniforms.model_view_matrix = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let bytes = uniforms.as_bytes();
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        // Translation lands in the fourth column of the second matrix.
        assert_eq!(floats[16 + 12], 5.0);
        // First matrix is untouched identity.
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[12], 0.0);
    }

    #[test]
    fn from_bytes_rejects_wrong_size() {
        let short = [0u8; 64];
        assert!(Uniforms::from_bytes(&short).is_none());
    }

    #[test]
    fn aligned_size_covers_one_slot() {
        assert_eq!(Uniforms::aligned_size(), 256);
        assert!(Uniforms::aligned_size() >= std::mem::size_of::<Uniforms>());
        assert_eq!(Uniforms::aligned_size() % UNIFORM_ALIGN, 0);
    }
}
