//! Setup-pose records owned by [`crate::SkeletonData`].
//!
//! Cross references (`parent`, `bone`, `target`, ...) are indices into the lists of the owning
//! `SkeletonData`; they are checked when the graph is built.

use crate::{Error, Named};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct BoneData {
    pub name: String,
    pub parent: Option<usize>,
    pub length: f32,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub shear_x: f32,
    pub shear_y: f32,
    pub transform_mode: TransformMode,
    pub skin_required: bool,
    /// Editor color; nonessential.
    pub color: [f32; 4],
}

impl BoneData {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            length: 0.0,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            shear_x: 0.0,
            shear_y: 0.0,
            transform_mode: TransformMode::Normal,
            skin_required: false,
            color: [0.61, 0.61, 0.61, 1.0],
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum TransformMode {
    #[default]
    Normal,
    OnlyTranslation,
    NoRotationOrReflection,
    NoScale,
    NoScaleOrReflection,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SlotData {
    pub name: String,
    pub bone: usize,
    pub color: [f32; 4],
    /// Tint-black color; `None` when the slot has no dark color.
    pub dark_color: Option<[f32; 3]>,
    pub attachment: Option<String>,
    pub blend: BlendMode,
}

impl SlotData {
    pub fn new(name: impl Into<String>, bone: usize) -> Self {
        Self {
            name: name.into(),
            bone,
            color: [1.0; 4],
            dark_color: None,
            attachment: None,
            blend: BlendMode::Normal,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
}

/// One attachment entry of a skin, keyed by slot and attachment name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SkinAttachment {
    pub slot: usize,
    pub name: String,
    /// Atlas region name, when it differs from `name`.
    pub path: Option<String>,
}

impl SkinAttachment {
    /// Name of the atlas region this attachment draws from.
    pub fn region_name(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SkinData {
    pub name: String,
    pub attachments: Vec<SkinAttachment>,
    pub bones: Vec<usize>,
    pub ik_constraints: Vec<usize>,
    pub transform_constraints: Vec<usize>,
    pub path_constraints: Vec<usize>,
}

impl SkinData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attachments: Vec::new(),
            bones: Vec::new(),
            ik_constraints: Vec::new(),
            transform_constraints: Vec::new(),
            path_constraints: Vec::new(),
        }
    }

    pub fn attachment(&self, slot_index: usize, attachment_name: &str) -> Option<&SkinAttachment> {
        self.attachments
            .iter()
            .find(|a| a.slot == slot_index && a.name == attachment_name)
    }

    pub fn slot_attachments(&self, slot_index: usize) -> impl Iterator<Item = &SkinAttachment> {
        self.attachments.iter().filter(move |a| a.slot == slot_index)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct EventData {
    pub name: String,
    pub int_value: i32,
    pub float_value: f32,
    pub string: String,
    pub audio_path: String,
    pub volume: f32,
    pub balance: f32,
}

impl EventData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            int_value: 0,
            float_value: 0.0,
            string: String::new(),
            audio_path: String::new(),
            volume: 1.0,
            balance: 0.0,
        }
    }
}

/// A named animation. Timelines belong to the playback engine and are not stored here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Animation {
    pub name: String,
    pub duration: f32,
}

impl Animation {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Fields shared by every constraint kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ConstraintData {
    pub name: String,
    /// Position in the skeleton's constraint update order.
    pub order: i32,
    /// When true, the constraint is only active while the current skin lists it.
    pub skin_required: bool,
}

impl ConstraintData {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName { kind: "constraint" });
        }
        Ok(Self {
            name,
            order: 0,
            skin_required: false,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct IkConstraintData {
    pub base: ConstraintData,
    pub bones: Vec<usize>,
    pub target: usize,
    pub mix: f32,
    pub softness: f32,
    /// `1` or `-1`.
    pub bend_direction: i32,
    pub compress: bool,
    pub stretch: bool,
    pub uniform: bool,
}

impl IkConstraintData {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            base: ConstraintData::new(name)?,
            bones: Vec::new(),
            target: 0,
            mix: 1.0,
            softness: 0.0,
            bend_direction: 1,
            compress: false,
            stretch: false,
            uniform: false,
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum PositionMode {
    Fixed,
    #[default]
    Percent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum SpacingMode {
    #[default]
    Length,
    Fixed,
    Percent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum RotateMode {
    #[default]
    Tangent,
    Chain,
    ChainScale,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PathConstraintData {
    pub base: ConstraintData,
    pub bones: Vec<usize>,
    /// Index of the slot holding the path attachment.
    pub target: usize,
    pub position_mode: PositionMode,
    pub spacing_mode: SpacingMode,
    pub rotate_mode: RotateMode,
    pub offset_rotation: f32,
    pub position: f32,
    pub spacing: f32,
    pub rotate_mix: f32,
    pub translate_mix: f32,
}

impl PathConstraintData {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            base: ConstraintData::new(name)?,
            bones: Vec::new(),
            target: 0,
            position_mode: PositionMode::default(),
            spacing_mode: SpacingMode::default(),
            rotate_mode: RotateMode::default(),
            offset_rotation: 0.0,
            position: 0.0,
            spacing: 0.0,
            rotate_mix: 1.0,
            translate_mix: 1.0,
        })
    }
}

impl Named for BoneData {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for SlotData {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for SkinData {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for EventData {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Animation {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ConstraintData {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for IkConstraintData {
    fn name(&self) -> &str {
        &self.base.name
    }
}

impl Named for PathConstraintData {
    fn name(&self) -> &str {
        &self.base.name
    }
}
