//! G-buffer pixel record and its color attachment mapping

use bytemuck::{Pod, Zeroable};
use half::f16;

use crate::slots::TextureIndex;

/// Per-pixel record written by the G-buffer fragment stage.
///
/// Each field is stored in its own `Rgba16Float` render target; the
/// attachment constants below say which. `normal_depth` packs the view-space
/// normal in xyz and view-space depth in w.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GBufferData {
    pub albedo: [f16; 4],
    pub normal_depth: [f16; 4],
}

const _: () = {
    assert!(std::mem::size_of::<GBufferData>() == 16);
    assert!(std::mem::offset_of!(GBufferData, albedo) == 0);
    assert!(std::mem::offset_of!(GBufferData, normal_depth) == 8);
    // Attachment tags must agree with the texture slots they name.
    assert!(GBufferData::ALBEDO_ATTACHMENT as u32 == 0);
    assert!(GBufferData::NORMAL_DEPTH_ATTACHMENT as u32 == 1);
};

impl GBufferData {
    /// Target receiving `albedo`, later sampled through the same slot.
    pub const ALBEDO_ATTACHMENT: TextureIndex = TextureIndex::Albedo;

    /// Target receiving `normal_depth`.
    pub const NORMAL_DEPTH_ATTACHMENT: TextureIndex = TextureIndex::NormalDepth;

    /// Texture format backing each color attachment; matches the half4 fields.
    pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

    /// Number of color attachments the G-buffer pass renders to.
    pub const TARGET_COUNT: usize = 2;

    pub fn new(albedo: [f32; 4], normal_depth: [f32; 4]) -> Self {
        Self {
            albedo: albedo.map(f16::from_f32),
            normal_depth: normal_depth.map(f16::from_f32),
        }
    }

    /// Formats of the pass's color attachments, ordered by attachment index.
    pub const fn color_formats() -> [wgpu::TextureFormat; Self::TARGET_COUNT] {
        [Self::TARGET_FORMAT; Self::TARGET_COUNT]
    }

    /// Color target descriptors for pipeline creation, ordered by attachment
    /// index.
    pub fn color_targets() -> [Option<wgpu::ColorTargetState>; Self::TARGET_COUNT] {
        let target = wgpu::ColorTargetState {
            format: Self::TARGET_FORMAT,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        };
        let mut targets = [None, None];
        targets[Self::ALBEDO_ATTACHMENT.attachment() as usize] = Some(target.clone());
        targets[Self::NORMAL_DEPTH_ATTACHMENT.attachment() as usize] = Some(target);
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_two_half4() {
        assert_eq!(std::mem::size_of::<GBufferData>(), 16);
        assert_eq!(std::mem::offset_of!(GBufferData, normal_depth), 8);
    }

    #[test]
    fn attachment_tags_match_texture_slots() {
        assert_eq!(GBufferData::ALBEDO_ATTACHMENT, TextureIndex::Albedo);
        assert_eq!(GBufferData::NORMAL_DEPTH_ATTACHMENT, TextureIndex::NormalDepth);
    }

    #[test]
    fn every_attachment_has_a_target() {
        let targets = GBufferData::color_targets();
        assert_eq!(targets.len(), GBufferData::TARGET_COUNT);
        for target in &targets {
            let target = target.as_ref().unwrap();
            assert_eq!(target.format, GBufferData::TARGET_FORMAT);
        }
    }

    #[test]
    fn half_precision_round_trip() {
        let data = GBufferData::new([0.5, 0.25, 1.0, 1.0], [0.0, 1.0, 0.0, -2.5]);
        assert_eq!(data.albedo[0].to_f32(), 0.5);
        assert_eq!(data.normal_depth[3].to_f32(), -2.5);
    }

    #[test]
    fn byte_reinterpretation_preserves_fields() {
        let data = GBufferData::new([1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.125]);
        let bytes = bytemuck::bytes_of(&data);
        assert_eq!(bytes.len(), 16);
        let restored: &GBufferData = bytemuck::from_bytes(bytes);
        assert_eq!(*restored, data);
    }
}
