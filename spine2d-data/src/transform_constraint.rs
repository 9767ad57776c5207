use crate::{ConstraintData, Error, Named};

/// Blends the transform of its bones toward a target bone.
///
/// Pure data: the solver lives in the pose evaluator. Mix factors are nominally in `[0, 1]` but
/// are stored unclamped. Offsets are applied before mixing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TransformConstraintData {
    pub base: ConstraintData,
    /// Constrained bones, by index.
    pub bones: Vec<usize>,
    /// Target bone index.
    pub target: usize,

    pub rotate_mix: f32,
    pub translate_mix: f32,
    pub scale_mix: f32,
    pub shear_mix: f32,

    pub offset_rotation: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub offset_scale_x: f32,
    pub offset_scale_y: f32,
    pub offset_shear_y: f32,

    /// Offsets are relative to the target's current transform instead of absolute.
    pub relative: bool,
    /// Computed in the target's local space instead of world space.
    pub local: bool,
}

impl TransformConstraintData {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            base: ConstraintData::new(name)?,
            bones: Vec::new(),
            target: 0,
            rotate_mix: 0.0,
            translate_mix: 0.0,
            scale_mix: 0.0,
            shear_mix: 0.0,
            offset_rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_scale_x: 0.0,
            offset_scale_y: 0.0,
            offset_shear_y: 0.0,
            relative: false,
            local: false,
        })
    }

    /// `[rotate, translate, scale, shear]`.
    pub fn mixes(&self) -> [f32; 4] {
        [
            self.rotate_mix,
            self.translate_mix,
            self.scale_mix,
            self.shear_mix,
        ]
    }

    pub fn set_mixes(&mut self, [rotate, translate, scale, shear]: [f32; 4]) {
        self.rotate_mix = rotate;
        self.translate_mix = translate;
        self.scale_mix = scale;
        self.shear_mix = shear;
    }

    /// `[rotation, x, y, scaleX, scaleY, shearY]`.
    pub fn offsets(&self) -> [f32; 6] {
        [
            self.offset_rotation,
            self.offset_x,
            self.offset_y,
            self.offset_scale_x,
            self.offset_scale_y,
            self.offset_shear_y,
        ]
    }
}

impl Named for TransformConstraintData {
    fn name(&self) -> &str {
        &self.base.name
    }
}
