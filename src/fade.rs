//! Opacity interpolation for view content.
//!
//! A fade is started as a batch over a set of target entities and reports
//! completion once per batch through `FadeEnd`. Any number of batches may run
//! at the same time; callers wait on the specific `FadeBatchId` they care about.

use bevy::prelude::*;

use crate::components::TransitionAlpha;
use crate::curve::TransitionCurve;
use crate::curve::clamp01;
use crate::events::FadeEnd;

/// Handle of a fade batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct FadeBatchId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum FadeKind {
    /// Alpha goes from 0 to 1.
    In,
    /// Alpha goes from 1 to 0.
    Out,
}

/// Category used to exclude targets from a fade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum FadeCategory {
    Content,
    Poi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeTarget {
    pub entity:   Entity,
    pub category: FadeCategory,
}

#[derive(Debug)]
struct FadeBatch {
    id:          FadeBatchId,
    targets:     Vec<Entity>,
    kind:        FadeKind,
    duration_ms: f32,
    delay_ms:    f32,
    elapsed_ms:  f32,
    curve:       TransitionCurve,
}

impl FadeBatch {
    fn alpha_at(&self, t: f32) -> f32 {
        let value = self.curve.evaluate(t);
        match self.kind {
            FadeKind::In => value,
            FadeKind::Out => 1.0 - value,
        }
    }
}

/// Runs fade batches. Ticked once per frame by `advance_fades`.
#[derive(Resource, Debug, Default)]
pub struct FadeController {
    next_id:   u64,
    batches:   Vec<FadeBatch>,
    completed: Vec<FadeBatchId>,
}

impl FadeController {
    pub fn new() -> Self { Self::default() }

    /// Starts fading `targets` over `duration_ms`.
    pub fn fade(
        &mut self,
        targets: impl IntoIterator<Item = Entity>,
        kind: FadeKind,
        duration_ms: f32,
        curve: TransitionCurve,
    ) -> FadeBatchId {
        self.fade_delayed(targets, kind, duration_ms, 0.0, curve)
    }

    /// Like `fade`, but alpha only starts moving after `delay_ms`.
    pub fn fade_delayed(
        &mut self,
        targets: impl IntoIterator<Item = Entity>,
        kind: FadeKind,
        duration_ms: f32,
        delay_ms: f32,
        curve: TransitionCurve,
    ) -> FadeBatchId {
        let id = FadeBatchId(self.next_id);
        self.next_id += 1;

        let targets: Vec<Entity> = targets.into_iter().collect();
        if targets.is_empty() {
            debug!("Fade {id:?}: no targets, completing immediately");
            self.completed.push(id);
            return id;
        }

        debug!(
            "Fade {id:?}: {kind:?} over {duration_ms:.0}ms for {} targets",
            targets.len()
        );
        self.batches.push(FadeBatch {
            id,
            targets,
            kind,
            duration_ms: duration_ms.max(0.0),
            delay_ms: delay_ms.max(0.0),
            elapsed_ms: 0.0,
            curve,
        });
        id
    }

    /// Like `fade`, skipping targets of `excluded_category` and the single
    /// `excluded_instance`.
    pub fn fade_except(
        &mut self,
        targets: impl IntoIterator<Item = FadeTarget>,
        excluded_category: Option<FadeCategory>,
        excluded_instance: Option<Entity>,
        kind: FadeKind,
        duration_ms: f32,
        curve: TransitionCurve,
    ) -> FadeBatchId {
        let remaining = targets
            .into_iter()
            .filter(|target| Some(target.category) != excluded_category)
            .filter(|target| Some(target.entity) != excluded_instance)
            .map(|target| target.entity);
        self.fade(remaining, kind, duration_ms, curve)
    }

    /// Writes `alpha` to every target right away, without interpolation.
    /// Returns how many targets took the write; the rest are skipped, the same
    /// way `tick` drops them.
    pub fn set_alpha_immediate(
        &self,
        targets: impl IntoIterator<Item = Entity>,
        alpha: f32,
        mut apply: impl FnMut(Entity, f32) -> bool,
    ) -> usize {
        let alpha = clamp01(alpha);
        targets
            .into_iter()
            .filter(|&entity| apply(entity, alpha))
            .count()
    }

    /// Advances every running batch by `dt_ms`.
    ///
    /// `apply` writes an alpha to a target and returns `false` when the target
    /// no longer exists. Such targets are dropped from their batch; the batch
    /// itself keeps running.
    pub fn tick(&mut self, dt_ms: f32, mut apply: impl FnMut(Entity, f32) -> bool) {
        let mut finished = Vec::new();

        for batch in &mut self.batches {
            batch.elapsed_ms += dt_ms;
            let active_ms = batch.elapsed_ms - batch.delay_ms;
            if active_ms < 0.0 {
                continue;
            }

            let t = if batch.duration_ms > 0.0 {
                active_ms / batch.duration_ms
            } else {
                1.0
            };
            let alpha = batch.alpha_at(t);
            batch.targets.retain(|&entity| apply(entity, alpha));

            if t >= 1.0 {
                finished.push(batch.id);
            }
        }

        if !finished.is_empty() {
            self.batches.retain(|batch| !finished.contains(&batch.id));
            self.completed.extend(finished);
        }
    }

    /// Batches completed since the last call.
    pub fn drain_completed(&mut self) -> Vec<FadeBatchId> { std::mem::take(&mut self.completed) }

    /// Whether `id` has finished. Unknown future ids are never complete.
    pub fn is_complete(&self, id: FadeBatchId) -> bool {
        id.0 < self.next_id && !self.batches.iter().any(|batch| batch.id == id)
    }

    pub fn active_batches(&self) -> usize { self.batches.len() }
}

/// Writes `alpha` to a fade target, hiding it at zero. Returns `false` when the
/// entity is gone or is not a fade target.
pub(crate) fn apply_alpha(
    targets: &mut Query<(&mut TransitionAlpha, Option<&mut Visibility>)>,
    entity: Entity,
    alpha: f32,
) -> bool {
    let Ok((mut target, visibility)) = targets.get_mut(entity) else {
        return false;
    };
    target.0 = alpha;
    if let Some(mut visibility) = visibility {
        let wanted = if alpha <= 0.0 {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        visibility.set_if_neq(wanted);
    }
    true
}

/// System that advances fade batches and fires `FadeEnd` for finished ones.
pub fn advance_fades(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: ResMut<FadeController>,
    mut targets: Query<(&mut TransitionAlpha, Option<&mut Visibility>)>,
) {
    let dt_ms = time.delta_secs() * 1000.0;
    fades.tick(dt_ms, |entity, alpha| apply_alpha(&mut targets, entity, alpha));

    for batch in fades.drain_completed() {
        commands.trigger(FadeEnd { batch });
    }
}

/// Copies `TransitionAlpha` into the base colour alpha of `StandardMaterial`s.
#[cfg(feature = "materials")]
pub fn sync_material_alpha(
    query: Query<(&TransitionAlpha, &MeshMaterial3d<StandardMaterial>), Changed<TransitionAlpha>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
    use bevy::color::Alpha;

    let Some(mut materials) = materials else {
        return;
    };
    for (alpha, handle) in &query {
        let Some(mut material) = materials.get_mut(&handle.0) else {
            continue;
        };
        material.base_color.set_alpha(alpha.0);
        if alpha.0 < 1.0 {
            material.alpha_mode = AlphaMode::Blend;
        }
    }
}
