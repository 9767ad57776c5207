use crate::{
    Animation, BoneData, Error, EventData, IkConstraintData, PathConstraintData, SkeletonData,
    SkeletonDataBuilder, SkinAttachment, SkinData, SlotData, TransformConstraintData,
};
use std::sync::Arc;

fn rig() -> SkeletonDataBuilder {
    let mut follow = TransformConstraintData::new("follow").unwrap();
    follow.bones = vec![2];
    follow.target = 1;
    follow.rotate_mix = 1.0;
    follow.relative = true;

    let mut reach = IkConstraintData::new("reach").unwrap();
    reach.bones = vec![1, 2];
    reach.target = 3;

    let mut rail = PathConstraintData::new("rail").unwrap();
    rail.bones = vec![3];
    rail.target = 1;

    let mut armor = SkinData::new("armor");
    armor.attachments.push(SkinAttachment {
        slot: 0,
        name: "body".to_string(),
        path: Some("armor/body".to_string()),
    });
    armor.transform_constraints.push(0);

    SkeletonDataBuilder {
        name: "hero".to_string(),
        bones: vec![
            BoneData::new("root", None),
            BoneData::new("hip", Some(0)),
            BoneData::new("leg", Some(1)),
            BoneData::new("target", Some(0)),
            BoneData::new("hip", Some(0)),
        ],
        slots: vec![SlotData::new("body", 1), SlotData::new("path", 0)],
        skins: vec![SkinData::new("default"), armor],
        default_skin: Some(0),
        events: vec![EventData::new("step")],
        animations: vec![Animation::new("walk", 1.0), Animation::new("run", 0.5)],
        ik_constraints: vec![reach],
        transform_constraints: vec![follow],
        path_constraints: vec![rail],
        width: 120.0,
        height: 300.0,
        version: Some("3.8.99".to_string()),
        hash: Some("abc".to_string()),
        fps: 30.0,
        ..Default::default()
    }
}

#[test]
fn find_returns_entries_by_name() {
    let data = rig().build().unwrap();

    assert_eq!(data.name(), "hero");
    assert_eq!(data.find_bone("leg").unwrap().unwrap().parent, Some(1));
    assert_eq!(data.find_slot("body").unwrap().unwrap().bone, 1);
    assert_eq!(data.find_skin("armor").unwrap().unwrap().name, "armor");
    assert_eq!(data.find_event("step").unwrap().unwrap().volume, 1.0);
    assert_eq!(data.find_animation("run").unwrap().unwrap().duration, 0.5);
    assert_eq!(data.find_ik_constraint("reach").unwrap().unwrap().target, 3);
    assert!(data.find_transform_constraint("follow").unwrap().unwrap().relative);
    assert_eq!(data.find_path_constraint("rail").unwrap().unwrap().target, 1);
}

#[test]
fn find_absent_names_return_none() {
    let data = rig().build().unwrap();

    assert!(data.find_bone("tail").unwrap().is_none());
    assert!(data.find_slot("tail").unwrap().is_none());
    assert!(data.find_skin("tail").unwrap().is_none());
    assert!(data.find_event("tail").unwrap().is_none());
    assert!(data.find_animation("tail").unwrap().is_none());
    assert!(data.find_ik_constraint("tail").unwrap().is_none());
    assert!(data.find_transform_constraint("tail").unwrap().is_none());
    assert!(data.find_path_constraint("tail").unwrap().is_none());
}

#[test]
fn empty_name_is_an_argument_error() {
    let data = rig().build().unwrap();

    assert!(matches!(
        data.find_bone(""),
        Err(Error::EmptyName { kind: "bone" })
    ));
    assert!(matches!(
        data.find_bone_index(""),
        Err(Error::EmptyName { kind: "bone" })
    ));
    assert!(matches!(
        data.find_slot_index(""),
        Err(Error::EmptyName { kind: "slot" })
    ));
    assert!(matches!(
        data.find_animation(""),
        Err(Error::EmptyName { kind: "animation" })
    ));
    assert!(matches!(
        data.find_path_constraint_index(""),
        Err(Error::EmptyName {
            kind: "path constraint"
        })
    ));
}

#[test]
fn index_lookups_match_positions() {
    let data = rig().build().unwrap();

    for (i, bone) in data.bones().iter().enumerate() {
        let found = data.find_bone_index(&bone.name).unwrap().unwrap();
        assert_eq!(data.bones()[found].name, bone.name);
        // "hip" appears twice; the first one wins.
        if bone.name != "hip" {
            assert_eq!(found, i);
        }
    }
    assert_eq!(data.find_bone_index("hip").unwrap(), Some(1));
    assert_eq!(data.find_bone("hip").unwrap().unwrap().parent, Some(0));
    assert_eq!(data.find_bone_index("tail").unwrap(), None);

    assert_eq!(data.find_slot_index("path").unwrap(), Some(1));
    assert_eq!(data.find_slot_index("tail").unwrap(), None);
    assert_eq!(data.find_path_constraint_index("rail").unwrap(), Some(0));
    assert_eq!(data.find_path_constraint_index("tail").unwrap(), None);
}

#[test]
fn empty_bone_list_finds_nothing() {
    let data = SkeletonData::builder().build().unwrap();
    assert!(data.bones().is_empty());
    assert!(data.find_bone("root").unwrap().is_none());
    assert!(data.resolve_skin().is_none());
}

#[test]
fn resolve_skin_prefers_default_then_first() {
    let skins = vec![SkinData::new("A"), SkinData::new("B")];

    let data = SkeletonDataBuilder {
        skins: skins.clone(),
        ..Default::default()
    }
    .build()
    .unwrap();
    assert!(data.default_skin().is_none());
    assert_eq!(data.resolve_skin().unwrap().name, "A");

    let data = SkeletonDataBuilder {
        skins,
        default_skin: Some(1),
        ..Default::default()
    }
    .build()
    .unwrap();
    assert_eq!(data.default_skin().unwrap().name, "B");
    assert_eq!(data.resolve_skin().unwrap().name, "B");
}

#[test]
fn scalars_and_metadata() {
    let mut data = rig().build().unwrap();
    assert_eq!(data.version(), Some("3.8.99"));
    assert_eq!(data.hash(), Some("abc"));
    assert_eq!(data.fps(), 30.0);
    assert_eq!(data.images_path(), None);
    assert_eq!((data.width(), data.height()), (120.0, 300.0));

    data.set_bounds(-10.0, -5.0, 20.0, 40.0);
    data.set_images_path(Some("./images/".to_string()));
    data.set_name("villain");
    assert_eq!((data.x(), data.y()), (-10.0, -5.0));
    assert_eq!(data.images_path(), Some("./images/"));
    assert_eq!(data.to_string(), "villain");
}

#[test]
fn child_before_parent_is_rejected() {
    let err = SkeletonDataBuilder {
        bones: vec![
            BoneData::new("root", None),
            BoneData::new("arm", Some(2)),
            BoneData::new("shoulder", Some(0)),
        ],
        ..Default::default()
    }
    .build()
    .unwrap_err();
    assert!(matches!(
        err,
        Error::BoneOrder { ref bone, ref parent } if bone == "arm" && parent == "shoulder"
    ));
}

#[test]
fn root_with_parent_is_rejected() {
    let err = SkeletonDataBuilder {
        bones: vec![BoneData::new("root", Some(0))],
        ..Default::default()
    }
    .build()
    .unwrap_err();
    assert!(matches!(err, Error::RootBoneHasParent { .. }));
}

#[test]
fn dangling_references_are_rejected() {
    let mut builder = rig();
    builder.slots.push(SlotData::new("ghost", 9));
    assert!(matches!(
        builder.build(),
        Err(Error::InvalidReference {
            kind: "slot",
            field: "bone",
            index: 9,
            ..
        })
    ));

    let mut builder = rig();
    builder.transform_constraints[0].target = 42;
    assert!(matches!(
        builder.build(),
        Err(Error::InvalidReference {
            kind: "transform constraint",
            field: "target bone",
            index: 42,
            ..
        })
    ));

    let mut builder = rig();
    builder.path_constraints[0].target = 5;
    assert!(matches!(
        builder.build(),
        Err(Error::InvalidReference {
            field: "target slot",
            ..
        })
    ));

    let mut builder = rig();
    builder.default_skin = Some(2);
    assert!(matches!(
        builder.build(),
        Err(Error::InvalidReference {
            field: "default skin",
            ..
        })
    ));
}

#[test]
fn unnamed_entities_are_rejected() {
    let mut builder = rig();
    builder.animations.push(Animation::new("", 0.0));
    assert!(matches!(
        builder.build(),
        Err(Error::EmptyName { kind: "animation" })
    ));
}

#[test]
fn setters_replace_collections_and_reindex() {
    let mut data = rig().build().unwrap();

    data.set_animations(vec![Animation::new("idle", 2.0)]).unwrap();
    assert!(data.find_animation("walk").unwrap().is_none());
    assert_eq!(data.find_animation("idle").unwrap().unwrap().duration, 2.0);

    data.set_default_skin(Some(1)).unwrap();
    assert_eq!(data.default_skin().unwrap().name, "armor");
    data.set_skins(vec![SkinData::new("only")]).unwrap_err();
    assert_eq!(data.skins().len(), 2);
    assert!(data.set_default_skin(Some(2)).is_err());
    assert_eq!(data.default_skin_index(), Some(1));

    data.set_default_skin(None).unwrap();
    data.set_skins(vec![SkinData::new("only")]).unwrap();
    assert_eq!(data.resolve_skin().unwrap().name, "only");
    assert!(data.find_skin("armor").unwrap().is_none());

    let mut chain = PathConstraintData::new("chain").unwrap();
    chain.target = 0;
    data.set_path_constraints(vec![chain]).unwrap();
    assert_eq!(data.find_path_constraint_index("chain").unwrap(), Some(0));
    assert_eq!(data.find_path_constraint_index("rail").unwrap(), None);
}

#[test]
fn failed_setter_keeps_previous_state() {
    let mut data = rig().build().unwrap();

    let mut broken = IkConstraintData::new("broken").unwrap();
    broken.bones = vec![77];
    assert!(data.set_ik_constraints(vec![broken]).is_err());
    assert_eq!(data.ik_constraints().len(), 1);
    assert!(data.find_ik_constraint("reach").unwrap().is_some());

    // The armor skin lists transform constraint 0.
    assert!(data.set_transform_constraints(Vec::new()).is_err());
    assert!(data.find_transform_constraint("follow").unwrap().is_some());

    data.set_events(Vec::new()).unwrap();
    assert!(data.find_event("step").unwrap().is_none());
}

#[test]
fn skin_attachment_lookup() {
    let data = rig().build().unwrap();
    let armor = data.find_skin("armor").unwrap().unwrap();
    let body = armor.attachment(0, "body").unwrap();
    assert_eq!(body.region_name(), "armor/body");
    assert!(armor.attachment(1, "body").is_none());
    assert_eq!(armor.slot_attachments(0).count(), 1);
}

#[test]
fn shared_read_only_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SkeletonData>();

    let data = Arc::new(rig().build().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = Arc::clone(&data);
            std::thread::spawn(move || data.find_bone_index("target").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(3));
    }
}

#[test]
fn resolve_skin_index_tracks_position() {
    let skins = vec![SkinData::new("hero"), SkinData::new("hero")];
    let mut data = SkeletonDataBuilder {
        skins,
        ..Default::default()
    }
    .build()
    .unwrap();
    assert_eq!(data.resolve_skin_index(), Some(0));

    data.set_default_skin(Some(1)).unwrap();
    assert_eq!(data.resolve_skin_index(), Some(1));

    data.set_default_skin(None).unwrap();
    data.set_skins(Vec::new()).unwrap();
    assert_eq!(data.resolve_skin_index(), None);
}
