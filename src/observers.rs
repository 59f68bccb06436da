//! Observers that turn navigation requests into transition episodes.

use bevy::prelude::*;

use crate::components::SceneKind;
use crate::config::TransitionConfig;
use crate::config::TransitionCurves;
use crate::error::TransitionError;
use crate::events::LoadNextView;
use crate::events::LoadPreviousView;
use crate::events::TransitionBegin;
use crate::events::ViewLoaded;
use crate::fade::FadeCategory;
use crate::fade::FadeController;
use crate::fade::FadeKind;
use crate::focus::fit_to_display;
use crate::focus::lossy_scale;
use crate::loader::ViewLoader;
use crate::support::ViewScenes;
use crate::transition::Episode;
use crate::transition::TransitionManager;
use crate::transition::ViewSlot;
use crate::view_stack::ViewStack;
use crate::zoom::ZoomChoreographer;
use crate::zoom::ZoomStyle;

/// Observer for `LoadNextView`.
pub fn on_load_next_view(
    request: On<LoadNextView>,
    mut manager: ResMut<TransitionManager>,
    mut stack: ResMut<ViewStack>,
    mut loader: ResMut<ViewLoader>,
) -> Result {
    let view = request.view.clone();

    if !manager.is_idle() {
        warn!("LoadNextView({view}) ignored: a transition is already in progress");
        return Ok(());
    }
    if !loader.is_registered(&view) {
        return Err(TransitionError::UnknownView(view).into());
    }

    if let Err(rejected) = manager.begin_next(view.clone(), request.keep_on_stack, &mut stack) {
        warn!("LoadNextView({view}) ignored: {rejected}");
        return Ok(());
    }
    loader.request_load(&view)?;
    info!("LoadNextView: {view} (stack depth {})", stack.len());
    Ok(())
}

/// Observer for `LoadPreviousView`.
pub fn on_load_previous_view(
    _request: On<LoadPreviousView>,
    mut manager: ResMut<TransitionManager>,
    mut stack: ResMut<ViewStack>,
    mut loader: ResMut<ViewLoader>,
) -> Result {
    let view = match manager.begin_previous(&mut stack) {
        Ok(view) => view,
        Err(rejected) => {
            warn!("LoadPreviousView ignored: {rejected}");
            return Ok(());
        },
    };
    loader.request_load(&view)?;
    info!("LoadPreviousView: {view} (stack depth {})", stack.len());
    Ok(())
}

/// Observer for `ViewLoaded`. Prepares the episode: gates interaction, fits and
/// hides the incoming view, plans the zoom and starts the content fades.
pub fn on_view_loaded(
    loaded: On<ViewLoaded>,
    mut commands: Commands,
    config: Res<TransitionConfig>,
    curves: Res<TransitionCurves>,
    mut manager: ResMut<TransitionManager>,
    mut fades: ResMut<FadeController>,
    mut scenes: ViewScenes,
) {
    let incoming = ViewSlot {
        view: loaded.view.clone(),
        root: loaded.root,
    };
    let outgoing_root = manager.current_root();
    if !manager.on_loaded(&incoming.view, incoming.root) {
        debug!("ViewLoaded({}) is not part of a transition", incoming.view);
        return;
    }
    let outgoing = manager
        .previous_view()
        .cloned()
        .zip(outgoing_root)
        .map(|(view, root)| ViewSlot { view, root });

    let Some(incoming_root) = scenes.view_root(incoming.root).cloned() else {
        error!("ViewLoaded({}) root {:?} has no ViewRoot", incoming.view, incoming.root);
        manager.finish();
        return;
    };
    let outgoing_kind = outgoing
        .as_ref()
        .and_then(|slot| scenes.view_root(slot.root))
        .map(|root| root.kind);

    info!(
        "Transition {:?}: {} -> {}",
        manager.direction(),
        outgoing.as_ref().map_or("<none>", |slot| slot.view.as_str()),
        incoming.view
    );

    // Interaction off on both sides. The outgoing view is unloaded at zoom-out
    // end, so only the incoming flags are kept.
    if let Some(slot) = &outgoing {
        scenes.suspend_interaction(slot.root);
    }
    let mut stash = scenes.suspend_interaction(incoming.root);
    if config.gate_camera_input {
        stash.cameras = scenes.suspend_camera_input();
    }

    // Fit the incoming view to the display volume.
    let outgoing_pose = outgoing.as_ref().and_then(|slot| {
        let pose = scenes.root_transform(slot.root)?;
        let content_scale = scenes.view_root(slot.root).map_or(1.0, |root| root.content_scale);
        Some((pose, content_scale))
    });
    let (anchor, scale) = match outgoing_pose {
        Some((pose, content_scale)) => (
            pose.translation,
            fit_to_display(lossy_scale(pose.scale), content_scale, incoming_root.content_scale),
        ),
        None => (
            config.display_anchor,
            config.display_scale * incoming_root.content_scale,
        ),
    };
    if let Some(mut pose) = scenes.root_transform(incoming.root) {
        pose.translation = anchor;
        pose.scale = Vec3::splat(scale);
        scenes.set_root_transform(incoming.root, pose);
    }

    // Plan the zoom.
    let next_geometry = scenes.focus_geometry(
        incoming.root,
        outgoing
            .as_ref()
            .zip(outgoing_kind)
            .map(|(slot, kind)| (&slot.view, kind == SceneKind::Planet)),
    );
    let previous_geometry = outgoing.as_ref().and_then(|slot| {
        scenes.focus_geometry(
            slot.root,
            Some((&incoming.view, incoming_root.is_single_planet())),
        )
    });
    let zoom = ZoomChoreographer::init(next_geometry.as_ref(), previous_geometry.as_ref());
    let style = ZoomStyle::select(outgoing_kind, incoming_root.kind);

    // Incoming view stays invisible until the zoom reveals it.
    let incoming_pois = scenes.fade_entities(incoming.root, FadeCategory::Poi);
    fades.set_alpha_immediate(incoming_pois, 0.0, |entity, alpha| scenes.apply_alpha(entity, alpha));
    if zoom.plan().is_some() {
        if let Some(mut pose) = scenes.root_transform(incoming.root) {
            pose.scale = Vec3::ZERO;
            scenes.set_root_transform(incoming.root, pose);
        }
    }

    // Fade out the outgoing view, POIs first.
    if let (Some(slot), Some(kind)) = (&outgoing, outgoing_kind) {
        let pois = scenes.fade_entities(slot.root, FadeCategory::Poi);
        fades.fade(pois, FadeKind::Out, config.poi_fade_out_ms, curves.poi_fade.clone());
        fades.fade_except(
            scenes.fade_targets(slot.root),
            Some(FadeCategory::Poi),
            None,
            FadeKind::Out,
            config.fade_out_ms(kind),
            curves.fade_out.clone(),
        );
    }

    // Fade in the incoming content.
    let incoming_content = scenes.fade_entities(incoming.root, FadeCategory::Content);
    let hidden = fades.set_alpha_immediate(incoming_content.iter().copied(), 0.0, |entity, alpha| {
        scenes.apply_alpha(entity, alpha)
    });
    debug!("Fading in {hidden} content targets of {}", incoming.view);
    fades.fade(
        incoming_content,
        FadeKind::In,
        config.opening_fade_ms,
        curves.opening(incoming_root.kind).clone(),
    );

    debug!("Zoom style {style:?}");
    commands.trigger(TransitionBegin {
        from:      outgoing.as_ref().map(|slot| slot.view.clone()),
        to:        incoming.view.clone(),
        direction: manager.direction(),
    });
    manager.start_episode(Episode {
        outgoing,
        incoming,
        zoom,
        style,
        stash,
    });
}
