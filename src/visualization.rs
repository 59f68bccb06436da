//! Debug drawing of focus spheres and the zoom pivot.
//!
//! Uses Bevy's `GizmoConfigGroup` pattern. Disabled by default; toggle via
//! `GizmoConfigStore::config_mut::<FocusGizmo>().enabled`.

use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::components::FocusCollider;
use crate::components::PlanetLink;
use crate::focus::lossy_scale;
use crate::transition::TransitionManager;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct FocusGizmo {}

/// Colours and line width of the focus gizmos.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct FocusGizmoConfig {
    pub focus_color: Color,
    pub link_color:  Color,
    pub pivot_color: Color,
    pub line_width:  f32,
    /// Size of the pivot cross in world units.
    pub pivot_size:  f32,
}

impl Default for FocusGizmoConfig {
    fn default() -> Self {
        Self {
            focus_color: Color::srgb(0.2, 0.8, 1.0),
            link_color:  Color::srgb(1.0, 0.6, 0.1),
            pivot_color: Color::srgb(1.0, 0.1, 0.6),
            line_width:  1.5,
            pivot_size:  0.05,
        }
    }
}

pub struct FocusGizmoPlugin;

impl Plugin for FocusGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<FocusGizmo>()
            .init_resource::<FocusGizmoConfig>()
            .add_systems(Startup, init_focus_gizmo)
            .add_systems(
                Update,
                (apply_focus_gizmo_config, follow_camera_layers, draw_focus_gizmos).chain(),
            );
    }
}

fn init_focus_gizmo(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<FocusGizmo>();
    config.enabled = false;
    config.depth_bias = -1.0;
}

/// Pushes edits of `FocusGizmoConfig` into the gizmo group.
fn apply_focus_gizmo_config(
    mut config_store: ResMut<GizmoConfigStore>,
    viz_config: Res<FocusGizmoConfig>,
) {
    if !viz_config.is_changed() {
        return;
    }
    let (config, _) = config_store.config_mut::<FocusGizmo>();
    config.line.width = viz_config.line_width;
}

/// Draws on every layer any orbit camera renders. Recomputed when an orbit
/// camera appears or its layers change.
fn follow_camera_layers(
    mut config_store: ResMut<GizmoConfigStore>,
    cameras: Query<Option<&RenderLayers>, With<PanOrbitCamera>>,
    changed: Query<(), (With<PanOrbitCamera>, Or<(Added<PanOrbitCamera>, Changed<RenderLayers>)>)>,
) {
    if changed.is_empty() {
        return;
    }
    let layers = cameras.iter().fold(RenderLayers::none(), |all, layers| {
        all.union(layers.unwrap_or(&RenderLayers::default()))
    });
    let (config, _) = config_store.config_mut::<FocusGizmo>();
    config.render_layers = layers;
}

fn draw_focus_gizmos(
    mut gizmos: Gizmos<FocusGizmo>,
    config: Res<FocusGizmoConfig>,
    manager: Res<TransitionManager>,
    colliders: Query<(&FocusCollider, &GlobalTransform)>,
    links: Query<(&PlanetLink, &GlobalTransform)>,
) {
    for (collider, transform) in &colliders {
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        gizmos.sphere(
            Isometry3d::from_translation(translation),
            collider.radius * lossy_scale(scale),
            config.focus_color,
        );
    }
    for (link, transform) in &links {
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        gizmos.sphere(
            Isometry3d::from_translation(translation),
            link.radius * lossy_scale(scale),
            config.link_color,
        );
    }

    let Some(plan) = manager.episode().and_then(|episode| episode.zoom.plan()) else {
        return;
    };
    let half = config.pivot_size * 0.5;
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        gizmos.line(
            plan.pivot_world - axis * half,
            plan.pivot_world + axis * half,
            config.pivot_color,
        );
    }
    gizmos.line(plan.pivot_world, plan.next_pivot_rest, config.pivot_color);
}
