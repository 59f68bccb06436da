//! Per-frame driver of a running transition episode.

use bevy::prelude::*;

use crate::config::TransitionConfig;
use crate::config::TransitionCurves;
use crate::events::TransitionEnd;
use crate::events::ViewUnloaded;
use crate::events::ZoomInEnd;
use crate::events::ZoomOutEnd;
use crate::fade::FadeBatchId;
use crate::fade::FadeCategory;
use crate::fade::FadeController;
use crate::fade::FadeKind;
use crate::loader::ViewLoader;
use crate::support::ViewScenes;
use crate::transition::Episode;
use crate::transition::TransitionManager;
use crate::transition::TransitionPhase;
use crate::transition::TransitionStep;
use crate::zoom::ZoomStyle;

/// Advances the zoom, unloads the outgoing view once it has zoomed out, reveals
/// the incoming POIs once the zoom-in is over and finally ends the episode.
pub fn drive_transition(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<TransitionConfig>,
    curves: Res<TransitionCurves>,
    mut manager: ResMut<TransitionManager>,
    mut fades: ResMut<FadeController>,
    mut loader: ResMut<ViewLoader>,
    mut scenes: ViewScenes,
) {
    let &TransitionPhase::Transitioning(step) = manager.phase() else {
        return;
    };
    let Some(episode) = manager.episode_mut() else {
        warn!("Transition has no episode data, returning to idle");
        manager.finish();
        return;
    };

    if let TransitionStep::RevealingPoi { batch } = step {
        if fades.is_complete(batch) {
            let colliders = std::mem::take(&mut episode.stash.colliders);
            end_episode(&mut commands, &mut manager, &mut scenes, &colliders);
        }
        return;
    }

    let dt_ms = time.delta_secs() * 1000.0;
    step_zoom(episode, dt_ms, &config, &curves, &mut scenes);
    let zoom_out_done = episode.zoom.zoom_out_done();
    let zoom_in_done = episode.zoom.zoom_in_done();
    let rest = episode.zoom.plan().map(|plan| plan.next_rest);
    let outgoing = episode.outgoing.clone();
    let incoming = episode.incoming.clone();
    let stash = episode.stash.clone();

    if step == TransitionStep::Zooming && zoom_out_done {
        if let Some(slot) = &outgoing {
            loader.unload_root(&slot.view, slot.root);
            commands.entity(slot.root).despawn();
            info!("Unloaded view {}", slot.view);
            commands.trigger(ViewUnloaded {
                view: slot.view.clone(),
                root: slot.root,
            });
        }
        scenes.restore_camera_input(&stash.cameras);
        scenes.restore_rotation_drivers(&stash.drivers);
        commands.trigger(ZoomOutEnd {
            view: outgoing.map(|slot| slot.view),
        });
        manager.set_step(TransitionStep::AwaitingZoomIn);
    }

    if zoom_out_done && zoom_in_done {
        if let Some(rest) = rest {
            scenes.set_root_transform(incoming.root, rest);
        }
        commands.trigger(ZoomInEnd {
            view: incoming.view.clone(),
        });

        let pois = scenes.fade_entities(incoming.root, FadeCategory::Poi);
        let batch: FadeBatchId =
            fades.fade(pois, FadeKind::In, config.poi_fade_in_ms, curves.poi_fade.clone());
        manager.set_step(TransitionStep::RevealingPoi { batch });

        if fades.is_complete(batch) {
            end_episode(&mut commands, &mut manager, &mut scenes, &stash.colliders);
        }
    }
}

fn step_zoom(
    episode: &mut Episode,
    dt_ms: f32,
    config: &TransitionConfig,
    curves: &TransitionCurves,
    scenes: &mut ViewScenes,
) {
    let prev_root = episode.outgoing.as_ref().map(|slot| slot.root);
    let next_root = episode.incoming.root;
    let mut prev = prev_root.and_then(|root| scenes.root_transform(root));
    let mut next = scenes.root_transform(next_root);
    let zoom_curves = curves.zoom(episode.style);

    match episode.style {
        ZoomStyle::Split => {
            if episode.zoom.zoom_out_done() {
                episode
                    .zoom
                    .step_zoom_in(dt_ms, config.zoom_in_ms, zoom_curves, next.as_mut());
            } else {
                episode.zoom.step_zoom_out(
                    dt_ms,
                    config.zoom_out_ms,
                    &curves.rotation,
                    &curves.scale,
                    prev.as_mut(),
                );
            }
        },
        ZoomStyle::Simultaneous | ZoomStyle::SimultaneousGlide => {
            episode.zoom.step_simultaneous(
                dt_ms,
                config.simultaneous_zoom_ms,
                zoom_curves,
                prev.as_mut(),
                next.as_mut(),
            );
        },
    }

    if let (Some(root), Some(pose)) = (prev_root, prev) {
        scenes.set_root_transform(root, pose);
    }
    if let Some(pose) = next {
        scenes.set_root_transform(next_root, pose);
    }
}

fn end_episode(
    commands: &mut Commands,
    manager: &mut TransitionManager,
    scenes: &mut ViewScenes,
    colliders: &[(Entity, bool)],
) {
    scenes.restore_colliders(colliders);
    let direction = manager.direction();
    manager.finish();
    let Some(view) = manager.current_view().cloned() else {
        return;
    };
    info!("Transition {direction:?} to {view} complete");
    commands.trigger(TransitionEnd { view, direction });
}
