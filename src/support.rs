//! Hierarchy helpers for reading and writing view content.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::components::FocusCollider;
use crate::components::Interactable;
use crate::components::PlanetLink;
use crate::components::Poi;
use crate::components::RotationDriver;
use crate::components::TransitionAlpha;
use crate::components::ViewRoot;
use crate::fade::FadeCategory;
use crate::fade::FadeTarget;
use crate::fade::apply_alpha;
use crate::focus::FocusGeometry;
use crate::focus::LinkedFocus;
use crate::focus::accumulate_chain;
use crate::focus::resolve_effective_focus;
use crate::interaction;
use crate::interaction::InteractionStash;
use crate::view_stack::ViewId;

/// Queries over loaded views, bundled for the transition observers and systems.
#[derive(SystemParam)]
pub struct ViewScenes<'w, 's> {
    children:        Query<'w, 's, &'static Children>,
    parents:         Query<'w, 's, &'static ChildOf>,
    transforms:      Query<'w, 's, &'static mut Transform>,
    roots:           Query<'w, 's, &'static ViewRoot>,
    colliders:       Query<'w, 's, &'static FocusCollider>,
    links:           Query<'w, 's, &'static PlanetLink>,
    pois:            Query<'w, 's, (), With<Poi>>,
    alphas:          Query<'w, 's, (&'static mut TransitionAlpha, Option<&'static mut Visibility>)>,
    interactables:   Query<'w, 's, &'static mut Interactable>,
    drivers:         Query<'w, 's, &'static mut RotationDriver>,
    cameras:         Query<'w, 's, &'static mut PanOrbitCamera>,
    camera_entities: Query<'w, 's, Entity, With<PanOrbitCamera>>,
}

impl ViewScenes<'_, '_> {
    /// `root` followed by all of its descendants.
    pub fn descendants(&self, root: Entity) -> Vec<Entity> {
        std::iter::once(root)
            .chain(self.children.iter_descendants(root))
            .collect()
    }

    pub fn view_root(&self, root: Entity) -> Option<&ViewRoot> { self.roots.get(root).ok() }

    pub fn root_transform(&self, root: Entity) -> Option<Transform> {
        self.transforms.get(root).ok().copied()
    }

    pub fn set_root_transform(&mut self, root: Entity, transform: Transform) {
        if let Ok(mut current) = self.transforms.get_mut(root) {
            current.set_if_neq(transform);
        }
    }

    /// Pose of `entity` relative to `root`, composed link by link down the
    /// parent chain. `None` when `entity` is not below `root`.
    pub fn pose_in_root(&self, entity: Entity, root: Entity) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut current = entity;
        while current != root {
            chain.push(self.transforms.get(current).ok().copied()?);
            current = self.parents.get(current).ok()?.parent();
        }
        Some(accumulate_chain(chain.into_iter().rev()))
    }

    /// Focus geometry of the view at `root` for a transition against `other`.
    ///
    /// `other` is the view on the other side and whether it is a single-planet
    /// view, in which case the `PlanetLink` leading to it replaces the view's own
    /// `FocusCollider`.
    pub fn focus_geometry(&self, root: Entity, other: Option<(&ViewId, bool)>) -> Option<FocusGeometry> {
        let view_root = self.roots.get(root).ok()?;
        let root_pose = self.root_transform(root)?;
        let is_single_planet = view_root.is_single_planet();
        let descendants = self.descendants(root);

        let own_focus = descendants.iter().find_map(|&entity| {
            let collider = self.colliders.get(entity).ok()?;
            let local = self.pose_in_root(entity, root)?;
            FocusGeometry::new(root_pose, local, collider.radius, is_single_planet)
        });
        if own_focus.is_none() {
            warn!("View {} has no usable focus collider", view_root.view);
        }

        let Some((other_view, other_is_single_planet)) = other else {
            return own_focus;
        };

        let links: Vec<(&ViewId, FocusGeometry)> = descendants
            .iter()
            .filter_map(|&entity| {
                let link = self.links.get(entity).ok()?;
                let local = self.pose_in_root(entity, root)?;
                let geometry = FocusGeometry::new(root_pose, local, link.radius, is_single_planet)?;
                Some((&link.view, geometry))
            })
            .collect();

        resolve_effective_focus(
            own_focus,
            links
                .iter()
                .map(|&(view, geometry)| LinkedFocus { view, geometry }),
            other_view,
            other_is_single_planet,
        )
    }

    /// Every fade target under `root`, tagged as content or POI.
    pub fn fade_targets(&self, root: Entity) -> Vec<FadeTarget> {
        self.descendants(root)
            .into_iter()
            .filter(|&entity| self.alphas.contains(entity))
            .map(|entity| FadeTarget {
                entity,
                category: if self.pois.contains(entity) {
                    FadeCategory::Poi
                } else {
                    FadeCategory::Content
                },
            })
            .collect()
    }

    pub fn fade_entities(&self, root: Entity, category: FadeCategory) -> Vec<Entity> {
        self.fade_targets(root)
            .into_iter()
            .filter(|target| target.category == category)
            .map(|target| target.entity)
            .collect()
    }

    /// Alpha sink for the fade controller.
    pub fn apply_alpha(&mut self, entity: Entity, alpha: f32) -> bool {
        apply_alpha(&mut self.alphas, entity, alpha)
    }

    /// Switches off colliders and rotation drivers under `root`, returning
    /// what they were.
    pub fn suspend_interaction(&mut self, root: Entity) -> InteractionStash {
        let entities = self.descendants(root);
        InteractionStash {
            colliders: interaction::suspend(entities.iter().copied(), &mut self.interactables),
            drivers: interaction::suspend(entities, &mut self.drivers),
            cameras: Vec::new(),
        }
    }

    /// Switches off input on every orbit camera, returning what it was.
    pub fn suspend_camera_input(&mut self) -> Vec<(Entity, bool)> {
        let cameras: Vec<Entity> = self.camera_entities.iter().collect();
        interaction::suspend(cameras, &mut self.cameras)
    }

    pub fn restore_colliders(&mut self, stash: &[(Entity, bool)]) {
        let changed = interaction::restore(stash, &mut self.interactables);
        debug!("Restored {} colliders ({changed} changed)", stash.len());
    }

    pub fn restore_rotation_drivers(&mut self, stash: &[(Entity, bool)]) {
        interaction::restore(stash, &mut self.drivers);
    }

    pub fn restore_camera_input(&mut self, stash: &[(Entity, bool)]) {
        interaction::restore(stash, &mut self.cameras);
    }
}
