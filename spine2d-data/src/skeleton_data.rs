use crate::names::NameIndex;
use crate::{
    Animation, BoneData, Error, EventData, IkConstraintData, Named, PathConstraintData, SkinData,
    SlotData, TransformConstraintData, is_supported_version,
};
use std::fmt;

/// Everything a loader collects for one skeleton. [`SkeletonDataBuilder::build`] checks the cross
/// references and produces the queryable [`SkeletonData`].
#[derive(Clone, Debug, Default)]
pub struct SkeletonDataBuilder {
    pub name: String,
    /// Parents first; index 0 is the root.
    pub bones: Vec<BoneData>,
    /// Setup-pose draw order.
    pub slots: Vec<SlotData>,
    /// All skins, including the default skin.
    pub skins: Vec<SkinData>,
    /// Index into `skins`.
    pub default_skin: Option<usize>,
    pub events: Vec<EventData>,
    pub animations: Vec<Animation>,
    pub ik_constraints: Vec<IkConstraintData>,
    pub transform_constraints: Vec<TransformConstraintData>,
    pub path_constraints: Vec<PathConstraintData>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub version: Option<String>,
    pub hash: Option<String>,
    pub fps: f32,
    pub images_path: Option<String>,
    pub audio_path: Option<String>,
}

impl SkeletonDataBuilder {
    pub fn build(self) -> Result<SkeletonData, Error> {
        if let Some(version) = self.version.as_deref() {
            if !is_supported_version(version) {
                log::warn!(
                    "skeleton '{}' was exported by Spine {version}; fields may be missing",
                    self.name
                );
            }
        }

        let mut data = SkeletonData {
            name: self.name,
            bones: self.bones,
            slots: self.slots,
            skins: self.skins,
            default_skin: self.default_skin,
            events: self.events,
            animations: self.animations,
            ik_constraints: self.ik_constraints,
            transform_constraints: self.transform_constraints,
            path_constraints: self.path_constraints,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            version: self.version,
            hash: self.hash,
            fps: self.fps,
            images_path: self.images_path,
            audio_path: self.audio_path,
            index: Indexes::default(),
        };
        data.validate()?;
        data.index = Indexes {
            bones: NameIndex::build(&data.bones),
            slots: NameIndex::build(&data.slots),
            skins: NameIndex::build(&data.skins),
            events: NameIndex::build(&data.events),
            animations: NameIndex::build(&data.animations),
            ik_constraints: NameIndex::build(&data.ik_constraints),
            transform_constraints: NameIndex::build(&data.transform_constraints),
            path_constraints: NameIndex::build(&data.path_constraints),
        };
        log::debug!(
            "built skeleton data '{}': {} bone(s), {} slot(s), {} skin(s), {} animation(s), {} constraint(s)",
            data.name,
            data.bones.len(),
            data.slots.len(),
            data.skins.len(),
            data.animations.len(),
            data.ik_constraints.len() + data.transform_constraints.len() + data.path_constraints.len(),
        );
        Ok(data)
    }
}

#[derive(Clone, Debug, Default)]
struct Indexes {
    bones: NameIndex,
    slots: NameIndex,
    skins: NameIndex,
    events: NameIndex,
    animations: NameIndex,
    ik_constraints: NameIndex,
    transform_constraints: NameIndex,
    path_constraints: NameIndex,
}

/// The setup pose and all other stateless data of a skeleton.
///
/// Built once by a loader and then shared read-only (eg. behind an `Arc`) by any number of
/// skeleton instances. All `find_*` lookups are O(1) and return the first entry when names
/// repeat; an empty name is rejected with [`Error::EmptyName`].
///
/// The `set_*` methods replace whole collections after load. They take `&mut self`, so they can
/// only run while no other thread holds a reference.
#[derive(Clone, Debug)]
pub struct SkeletonData {
    name: String,
    bones: Vec<BoneData>,
    slots: Vec<SlotData>,
    skins: Vec<SkinData>,
    default_skin: Option<usize>,
    events: Vec<EventData>,
    animations: Vec<Animation>,
    ik_constraints: Vec<IkConstraintData>,
    transform_constraints: Vec<TransformConstraintData>,
    path_constraints: Vec<PathConstraintData>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    version: Option<String>,
    hash: Option<String>,
    fps: f32,
    images_path: Option<String>,
    audio_path: Option<String>,
    index: Indexes,
}

impl SkeletonData {
    pub fn builder() -> SkeletonDataBuilder {
        SkeletonDataBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bones, parents first. The root bone is always first.
    pub fn bones(&self) -> &[BoneData] {
        &self.bones
    }

    /// The slots in setup-pose draw order.
    pub fn slots(&self) -> &[SlotData] {
        &self.slots
    }

    /// All skins, including the default skin.
    pub fn skins(&self) -> &[SkinData] {
        &self.skins
    }

    /// The skin holding attachments that were not placed in a named skin. May be `None`.
    pub fn default_skin(&self) -> Option<&SkinData> {
        self.default_skin.and_then(|index| self.skins.get(index))
    }

    pub fn default_skin_index(&self) -> Option<usize> {
        self.default_skin
    }

    /// The skin a skeleton instance should show: the default skin, else the first skin.
    pub fn resolve_skin(&self) -> Option<&SkinData> {
        self.resolve_skin_index().and_then(|index| self.skins.get(index))
    }

    /// Position of [`SkeletonData::resolve_skin`] in [`SkeletonData::skins`].
    pub fn resolve_skin_index(&self) -> Option<usize> {
        match self.default_skin {
            Some(index) => Some(index),
            None if self.skins.is_empty() => None,
            None => Some(0),
        }
    }

    pub fn events(&self) -> &[EventData] {
        &self.events
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn ik_constraints(&self) -> &[IkConstraintData] {
        &self.ik_constraints
    }

    pub fn transform_constraints(&self) -> &[TransformConstraintData] {
        &self.transform_constraints
    }

    pub fn path_constraints(&self) -> &[PathConstraintData] {
        &self.path_constraints
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// The Spine version used to export this data, if known.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Dopesheet frame rate; nonessential, `0.0` when not exported.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Images directory as set in the editor; nonessential.
    pub fn images_path(&self) -> Option<&str> {
        self.images_path.as_deref()
    }

    /// Audio directory as set in the editor; nonessential.
    pub fn audio_path(&self) -> Option<&str> {
        self.audio_path.as_deref()
    }

    pub fn find_bone(&self, name: &str) -> Result<Option<&BoneData>, Error> {
        Ok(self.find_bone_index(name)?.map(|index| &self.bones[index]))
    }

    pub fn find_bone_index(&self, name: &str) -> Result<Option<usize>, Error> {
        lookup(&self.index.bones, "bone", name)
    }

    pub fn find_slot(&self, name: &str) -> Result<Option<&SlotData>, Error> {
        Ok(self.find_slot_index(name)?.map(|index| &self.slots[index]))
    }

    pub fn find_slot_index(&self, name: &str) -> Result<Option<usize>, Error> {
        lookup(&self.index.slots, "slot", name)
    }

    pub fn find_skin(&self, name: &str) -> Result<Option<&SkinData>, Error> {
        Ok(lookup(&self.index.skins, "skin", name)?.map(|index| &self.skins[index]))
    }

    pub fn find_event(&self, name: &str) -> Result<Option<&EventData>, Error> {
        Ok(lookup(&self.index.events, "event", name)?.map(|index| &self.events[index]))
    }

    pub fn find_animation(&self, name: &str) -> Result<Option<&Animation>, Error> {
        Ok(lookup(&self.index.animations, "animation", name)?
            .map(|index| &self.animations[index]))
    }

    pub fn find_ik_constraint(&self, name: &str) -> Result<Option<&IkConstraintData>, Error> {
        Ok(lookup(&self.index.ik_constraints, "IK constraint", name)?
            .map(|index| &self.ik_constraints[index]))
    }

    pub fn find_transform_constraint(
        &self,
        name: &str,
    ) -> Result<Option<&TransformConstraintData>, Error> {
        Ok(
            lookup(&self.index.transform_constraints, "transform constraint", name)?
                .map(|index| &self.transform_constraints[index]),
        )
    }

    pub fn find_path_constraint(&self, name: &str) -> Result<Option<&PathConstraintData>, Error> {
        Ok(self
            .find_path_constraint_index(name)?
            .map(|index| &self.path_constraints[index]))
    }

    pub fn find_path_constraint_index(&self, name: &str) -> Result<Option<usize>, Error> {
        lookup(&self.index.path_constraints, "path constraint", name)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_skins(&mut self, skins: Vec<SkinData>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.skins, skins);
        if let Err(err) = self.validate() {
            self.skins = previous;
            return Err(err);
        }
        self.index.skins = NameIndex::build(&self.skins);
        log::debug!("replaced skins of '{}': {}", self.name, self.skins.len());
        Ok(())
    }

    pub fn set_default_skin(&mut self, skin_index: Option<usize>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.default_skin, skin_index);
        if let Err(err) = self.validate() {
            self.default_skin = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn set_events(&mut self, events: Vec<EventData>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.events, events);
        if let Err(err) = self.validate() {
            self.events = previous;
            return Err(err);
        }
        self.index.events = NameIndex::build(&self.events);
        log::debug!("replaced events of '{}': {}", self.name, self.events.len());
        Ok(())
    }

    pub fn set_animations(&mut self, animations: Vec<Animation>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.animations, animations);
        if let Err(err) = self.validate() {
            self.animations = previous;
            return Err(err);
        }
        self.index.animations = NameIndex::build(&self.animations);
        log::debug!(
            "replaced animations of '{}': {}",
            self.name,
            self.animations.len()
        );
        Ok(())
    }

    pub fn set_ik_constraints(&mut self, constraints: Vec<IkConstraintData>) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.ik_constraints, constraints);
        if let Err(err) = self.validate() {
            self.ik_constraints = previous;
            return Err(err);
        }
        self.index.ik_constraints = NameIndex::build(&self.ik_constraints);
        log::debug!(
            "replaced IK constraints of '{}': {}",
            self.name,
            self.ik_constraints.len()
        );
        Ok(())
    }

    pub fn set_transform_constraints(
        &mut self,
        constraints: Vec<TransformConstraintData>,
    ) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.transform_constraints, constraints);
        if let Err(err) = self.validate() {
            self.transform_constraints = previous;
            return Err(err);
        }
        self.index.transform_constraints = NameIndex::build(&self.transform_constraints);
        log::debug!(
            "replaced transform constraints of '{}': {}",
            self.name,
            self.transform_constraints.len()
        );
        Ok(())
    }

    pub fn set_path_constraints(
        &mut self,
        constraints: Vec<PathConstraintData>,
    ) -> Result<(), Error> {
        let previous = std::mem::replace(&mut self.path_constraints, constraints);
        if let Err(err) = self.validate() {
            self.path_constraints = previous;
            return Err(err);
        }
        self.index.path_constraints = NameIndex::build(&self.path_constraints);
        log::debug!(
            "replaced path constraints of '{}': {}",
            self.name,
            self.path_constraints.len()
        );
        Ok(())
    }

    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    pub fn set_hash(&mut self, hash: Option<String>) {
        self.hash = hash;
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    pub fn set_images_path(&mut self, images_path: Option<String>) {
        self.images_path = images_path;
    }

    pub fn set_audio_path(&mut self, audio_path: Option<String>) {
        self.audio_path = audio_path;
    }

    fn validate(&self) -> Result<(), Error> {
        let bone_count = self.bones.len();
        let slot_count = self.slots.len();

        for (index, bone) in self.bones.iter().enumerate() {
            require_name(bone, "bone")?;
            let Some(parent) = bone.parent else {
                continue;
            };
            if index == 0 {
                return Err(Error::RootBoneHasParent {
                    bone: bone.name.clone(),
                });
            }
            check_index("bone", bone, "parent bone", parent, bone_count)?;
            if parent >= index {
                return Err(Error::BoneOrder {
                    bone: bone.name.clone(),
                    parent: self.bones[parent].name.clone(),
                });
            }
        }

        for slot in &self.slots {
            require_name(slot, "slot")?;
            check_index("slot", slot, "bone", slot.bone, bone_count)?;
        }

        for constraint in &self.ik_constraints {
            require_name(constraint, "IK constraint")?;
            check_all("IK constraint", constraint, "bone", &constraint.bones, bone_count)?;
            check_index("IK constraint", constraint, "target bone", constraint.target, bone_count)?;
        }

        for constraint in &self.transform_constraints {
            require_name(constraint, "transform constraint")?;
            check_all("transform constraint", constraint, "bone", &constraint.bones, bone_count)?;
            check_index(
                "transform constraint",
                constraint,
                "target bone",
                constraint.target,
                bone_count,
            )?;
        }

        for constraint in &self.path_constraints {
            require_name(constraint, "path constraint")?;
            check_all("path constraint", constraint, "bone", &constraint.bones, bone_count)?;
            check_index("path constraint", constraint, "target slot", constraint.target, slot_count)?;
        }

        for skin in &self.skins {
            require_name(skin, "skin")?;
            for attachment in &skin.attachments {
                check_index("skin", skin, "slot", attachment.slot, slot_count)?;
            }
            check_all("skin", skin, "bone", &skin.bones, bone_count)?;
            check_all(
                "skin",
                skin,
                "IK constraint",
                &skin.ik_constraints,
                self.ik_constraints.len(),
            )?;
            check_all(
                "skin",
                skin,
                "transform constraint",
                &skin.transform_constraints,
                self.transform_constraints.len(),
            )?;
            check_all(
                "skin",
                skin,
                "path constraint",
                &skin.path_constraints,
                self.path_constraints.len(),
            )?;
        }

        if let Some(default_skin) = self.default_skin {
            if default_skin >= self.skins.len() {
                return Err(Error::InvalidReference {
                    kind: "skeleton",
                    name: self.name.clone(),
                    field: "default skin",
                    index: default_skin,
                });
            }
        }

        for event in &self.events {
            require_name(event, "event")?;
        }
        for animation in &self.animations {
            require_name(animation, "animation")?;
        }
        Ok(())
    }
}

impl fmt::Display for SkeletonData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn lookup(index: &NameIndex, kind: &'static str, name: &str) -> Result<Option<usize>, Error> {
    if name.is_empty() {
        return Err(Error::EmptyName { kind });
    }
    Ok(index.get(name))
}

fn require_name<T: Named>(item: &T, kind: &'static str) -> Result<(), Error> {
    if item.name().is_empty() {
        return Err(Error::EmptyName { kind });
    }
    Ok(())
}

fn check_index<T: Named>(
    kind: &'static str,
    item: &T,
    field: &'static str,
    index: usize,
    len: usize,
) -> Result<(), Error> {
    if index < len {
        return Ok(());
    }
    Err(Error::InvalidReference {
        kind,
        name: item.name().to_string(),
        field,
        index,
    })
}

fn check_all<T: Named>(
    kind: &'static str,
    item: &T,
    field: &'static str,
    indices: &[usize],
    len: usize,
) -> Result<(), Error> {
    indices
        .iter()
        .try_for_each(|&index| check_index(kind, item, field, index, len))
}
