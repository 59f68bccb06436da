//! A small guided tour: galaxy -> solar system -> planet.
//!
//! - Press 'S' in the galaxy to zoom into the solar system
//! - Press 'E' or 'M' in the solar system to visit Earth or Mars
//! - Press 'Backspace' to go back to the previous view
//! - Press 'D' to toggle focus gizmos

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use bevy_view_transition::FocusGizmo;
use bevy_view_transition::FocusGizmoPlugin;
use bevy_view_transition::prelude::*;

const GALAXY_STARS: usize = 48;
const GALAXY_RADIUS: f32 = 2.0;
const SUN_STAR_RADIUS: f32 = 0.03;
const SUN_RADIUS: f32 = 0.25;
const EARTH_ORBIT: f32 = 0.9;
const MARS_ORBIT: f32 = 1.4;
const PLANET_RADIUS: f32 = 0.6;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            PanOrbitCameraPlugin,
            ViewTransitionPlugin,
            FocusGizmoPlugin,
        ))
        .add_systems(Startup, (setup, register_views))
        .add_systems(Update, (navigate, toggle_gizmos))
        .add_observer(log_transition_begin)
        .add_observer(log_transition_end)
        .add_observer(log_view_unloaded)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        PanOrbitCamera {
            radius: Some(6.0),
            ..default()
        },
        Transform::from_xyz(0.0, 2.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn register_views(mut loader: ResMut<ViewLoader>, mut commands: Commands) {
    loader
        .register(
            ViewRoot::new("galaxy", SceneKind::Galaxy).with_content_scale(0.5),
            spawn_galaxy,
        )
        .register(
            ViewRoot::new("solar_system", SceneKind::SolarSystem),
            spawn_solar_system,
        )
        .register(ViewRoot::new("earth", SceneKind::Planet), |world: &mut World| {
            spawn_planet(world, Color::srgb(0.2, 0.45, 1.0))
        })
        .register(ViewRoot::new("mars", SceneKind::Planet), |world: &mut World| {
            spawn_planet(world, Color::srgb(0.85, 0.35, 0.2))
        });
    commands.trigger(LoadNextView::new("galaxy"));
}

/// Mesh + blended material + fade target.
fn body(world: &mut World, radius: f32, color: Color) -> impl Bundle {
    let mesh = world.resource_mut::<Assets<Mesh>>().add(Sphere::new(radius));
    let material = world
        .resource_mut::<Assets<StandardMaterial>>()
        .add(StandardMaterial {
            base_color: color,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
    (
        Mesh3d(mesh),
        MeshMaterial3d(material),
        TransitionAlpha::default(),
        Visibility::default(),
    )
}

fn spawn_galaxy(world: &mut World) -> Entity {
    let root = world.spawn((Transform::default(), Visibility::default())).id();
    for i in 0..GALAXY_STARS {
        let angle = i as f32 / GALAXY_STARS as f32 * TAU * 2.0;
        let distance = GALAXY_RADIUS * (i as f32 + 1.0) / GALAXY_STARS as f32;
        let star = body(world, 0.02, Color::srgb(0.9, 0.9, 1.0));
        world.spawn((
            star,
            Transform::from_xyz(distance * angle.cos(), 0.0, distance * angle.sin()),
            ChildOf(root),
        ));
    }
    let sun = body(world, SUN_STAR_RADIUS, Color::srgb(1.0, 0.85, 0.3));
    world.spawn((
        sun,
        Transform::from_xyz(1.2, 0.0, 0.4),
        FocusCollider {
            radius: SUN_STAR_RADIUS,
        },
        Poi,
        Interactable::default(),
        ChildOf(root),
    ));
    root
}

fn spawn_solar_system(world: &mut World) -> Entity {
    let root = world.spawn((Transform::default(), Visibility::default())).id();
    let sun = body(world, SUN_RADIUS, Color::srgb(1.0, 0.8, 0.2));
    world.spawn((
        sun,
        Transform::default(),
        FocusCollider { radius: SUN_RADIUS },
        ChildOf(root),
    ));

    for (view, orbit, radius, color, speed) in [
        ("earth", EARTH_ORBIT, 0.06, Color::srgb(0.2, 0.45, 1.0), 0.4),
        ("mars", MARS_ORBIT, 0.045, Color::srgb(0.85, 0.35, 0.2), 0.25),
    ] {
        let pivot = world
            .spawn((
                Transform::default(),
                Visibility::default(),
                RotationDriver::new(Vec3::Y, speed),
                ChildOf(root),
            ))
            .id();
        let planet = body(world, radius, color);
        world.spawn((
            planet,
            Transform::from_xyz(orbit, 0.0, 0.0),
            PlanetLink {
                view: ViewId::from(view),
                radius,
            },
            Poi,
            Interactable::default(),
            ChildOf(pivot),
        ));
    }
    root
}

fn spawn_planet(world: &mut World, color: Color) -> Entity {
    let root = world.spawn((Transform::default(), Visibility::default())).id();
    let planet = body(world, PLANET_RADIUS, color);
    world.spawn((
        planet,
        Transform::default(),
        FocusCollider {
            radius: PLANET_RADIUS,
        },
        RotationDriver::new(Vec3::Y, 0.2),
        ChildOf(root),
    ));
    root
}

fn navigate(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    manager: Res<TransitionManager>,
) {
    let current = manager.current_view().map(ViewId::as_str);
    let next = match current {
        Some("galaxy") if keyboard.just_pressed(KeyCode::KeyS) => Some("solar_system"),
        Some("solar_system") if keyboard.just_pressed(KeyCode::KeyE) => Some("earth"),
        Some("solar_system") if keyboard.just_pressed(KeyCode::KeyM) => Some("mars"),
        _ => None,
    };
    if let Some(view) = next {
        commands.trigger(LoadNextView::new(view));
    }
    if keyboard.just_pressed(KeyCode::Backspace) {
        commands.trigger(LoadPreviousView);
    }
}

fn toggle_gizmos(keyboard: Res<ButtonInput<KeyCode>>, mut config_store: ResMut<GizmoConfigStore>) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        let (config, _) = config_store.config_mut::<FocusGizmo>();
        config.enabled = !config.enabled;
    }
}

fn log_transition_begin(begin: On<TransitionBegin>) {
    info!(
        "TransitionBegin: {:?} -> {} ({:?})",
        begin.from, begin.to, begin.direction
    );
}

fn log_transition_end(end: On<TransitionEnd>) {
    info!("TransitionEnd: {} ({:?})", end.view, end.direction);
}

fn log_view_unloaded(unloaded: On<ViewUnloaded>) {
    info!("ViewUnloaded: {}", unloaded.view);
}
