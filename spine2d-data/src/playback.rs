//! Glue between [`SkeletonData`] and an external playback engine.
//!
//! The engine (track blending, time advance, completion events) is reached only through
//! [`AnimationPlayer`]; these helpers resolve names against the data graph first.

use crate::{Animation, Error, SkeletonData, SkinData};

/// Callback run once when a non-looping track entry completes.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Snapshot of what a playback track is doing.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackStatus {
    pub animation: String,
    pub looped: bool,
    /// The entry played through its last frame at least once.
    pub complete: bool,
}

/// Animation playback capability consumed by this crate.
pub trait AnimationPlayer {
    /// Replaces the current entry of `track_index` with `animation`.
    fn set_animation(&mut self, track_index: usize, animation: &Animation, looped: bool);

    fn set_loop(&mut self, track_index: usize, looped: bool);

    fn set_time_scale(&mut self, track_index: usize, time_scale: f32);

    fn clear_track(&mut self, track_index: usize);

    fn current(&self, track_index: usize) -> Option<TrackStatus>;

    /// Runs `callback` once, when the entry currently set on `track_index` completes.
    fn on_complete(&mut self, track_index: usize, callback: CompletionCallback);

    /// Index into [`SkeletonData::skins`] of the skin the skeleton instance currently shows.
    ///
    /// Skins are told apart by position, since two skins may share a name.
    fn skin(&self) -> Option<usize>;

    fn set_skin(&mut self, skin_index: Option<usize>, skin: Option<&SkinData>);

    fn set_slots_to_setup_pose(&mut self);
}

/// Track used by [`change_animation`] and [`current_animation_name`].
pub const MAIN_TRACK: usize = 0;

pub fn has_animation(data: &SkeletonData, name: &str) -> bool {
    matches!(data.find_animation(name), Ok(Some(_)))
}

/// Name of the animation on the main track, or an empty string when the track is idle.
pub fn current_animation_name<P: AnimationPlayer + ?Sized>(player: &P) -> String {
    player
        .current(MAIN_TRACK)
        .map(|status| status.animation)
        .unwrap_or_default()
}

/// Plays the named animation on `track_index`.
///
/// `on_complete` is only registered for non-looping playback.
pub fn play_animation<P: AnimationPlayer + ?Sized>(
    player: &mut P,
    data: &SkeletonData,
    name: &str,
    track_index: usize,
    looped: bool,
    on_complete: Option<CompletionCallback>,
) -> Result<(), Error> {
    let animation = data
        .find_animation(name)?
        .ok_or_else(|| Error::UnknownAnimation {
            name: name.to_string(),
        })?;
    player.set_animation(track_index, animation, looped);
    if let Some(callback) = on_complete {
        if !looped {
            player.on_complete(track_index, callback);
        }
    }
    Ok(())
}

/// Switches the main track to `name` and the skin to [`SkeletonData::resolve_skin`].
///
/// The animation restarts only if the track is idle, shows a different animation, or finished a
/// non-looping run; otherwise just its loop flag changes. A missing or unknown name clears the
/// track. Returns the skin that is now applied.
pub fn change_animation<'a, P: AnimationPlayer + ?Sized>(
    player: &mut P,
    data: &'a SkeletonData,
    name: Option<&str>,
    looped: bool,
) -> Result<Option<&'a SkinData>, Error> {
    let animation = match name.filter(|name| !name.is_empty()) {
        Some(name) => data.find_animation(name)?,
        None => None,
    };

    match animation {
        Some(animation) => {
            let restart = match player.current(MAIN_TRACK) {
                None => true,
                Some(status) => {
                    status.animation != animation.name || (status.complete && !status.looped)
                }
            };
            if restart {
                player.set_animation(MAIN_TRACK, animation, looped);
            } else {
                player.set_loop(MAIN_TRACK, looped);
            }
            player.set_time_scale(MAIN_TRACK, 1.0);
        }
        None => player.clear_track(MAIN_TRACK),
    }

    let skin_index = data.resolve_skin_index();
    let skin = skin_index.and_then(|index| data.skins().get(index));
    if skin.is_none() {
        log::warn!("skeleton '{}' has no skin to apply", data.name());
    }
    if player.skin() != skin_index {
        player.set_skin(skin_index, skin);
        player.set_slots_to_setup_pose();
    }
    Ok(skin)
}
