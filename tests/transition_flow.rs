//! End-to-end navigation through a headless app.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_view_transition::prelude::*;
use bevy_view_transition::TransitionPhase;
use bevy_view_transition::TransitionStep;
use bevy_view_transition::ZoomInEnd;
use bevy_view_transition::ZoomOutEnd;

const STEP_MS: u64 = 50;
const DURATION_MS: f32 = 200.0;

#[derive(Resource, Default)]
struct EventLog(Vec<String>);

fn solar_system(world: &mut World) -> Entity {
    world
        .spawn((
            Transform::default(),
            children![
                (
                    Transform::from_xyz(0.5, 0.0, 0.0),
                    FocusCollider { radius: 0.1 },
                    TransitionAlpha::default(),
                    Interactable::default(),
                ),
                (
                    Transform::from_xyz(1.0, 0.0, 0.0),
                    PlanetLink {
                        view:   ViewId::from("earth"),
                        radius: 0.05,
                    },
                    Poi,
                    TransitionAlpha::default(),
                    Interactable::default(),
                ),
            ],
        ))
        .id()
}

fn galaxy(world: &mut World) -> Entity {
    world
        .spawn((
            Transform::default(),
            children![(
                Transform::from_xyz(0.3, 0.0, 0.0),
                FocusCollider { radius: 0.02 },
                Poi,
                TransitionAlpha::default(),
                Interactable::default(),
            )],
        ))
        .id()
}

/// Solar system authored with a disabled collider and a paused driver.
fn paused_solar_system(world: &mut World) -> Entity {
    world
        .spawn((
            Transform::default(),
            children![
                (
                    Transform::from_xyz(0.5, 0.0, 0.0),
                    FocusCollider { radius: 0.1 },
                    TransitionAlpha::default(),
                    Interactable { enabled: false },
                    RotationDriver {
                        enabled: false,
                        ..RotationDriver::new(Vec3::Y, 1.0)
                    },
                ),
                (
                    Transform::from_xyz(1.0, 0.0, 0.0),
                    TransitionAlpha::default(),
                    Interactable::default(),
                ),
            ],
        ))
        .id()
}

fn planet(world: &mut World) -> Entity {
    world
        .spawn((
            Transform::default(),
            children![(
                Transform::from_xyz(0.0, 0.2, 0.0),
                FocusCollider { radius: 0.4 },
                TransitionAlpha::default(),
                Interactable::default(),
            )],
        ))
        .id()
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(STEP_MS)))
        .insert_resource(TransitionConfig::with_uniform_duration(DURATION_MS))
        .insert_resource(TransitionCurves::linear())
        .add_plugins(ViewTransitionPlugin)
        .init_resource::<EventLog>()
        .add_observer(|e: On<TransitionBegin>, mut log: ResMut<EventLog>| {
            log.0.push(format!("begin:{}", e.to));
        })
        .add_observer(|e: On<ViewUnloaded>, mut log: ResMut<EventLog>| {
            log.0.push(format!("unloaded:{}", e.view));
        })
        .add_observer(|_: On<ZoomOutEnd>, mut log: ResMut<EventLog>| {
            log.0.push("zoom_out_end".to_owned());
        })
        .add_observer(|_: On<ZoomInEnd>, mut log: ResMut<EventLog>| {
            log.0.push("zoom_in_end".to_owned());
        })
        .add_observer(|e: On<TransitionEnd>, mut log: ResMut<EventLog>| {
            log.0.push(format!("end:{}", e.view));
        });

    app.world_mut()
        .resource_mut::<ViewLoader>()
        .register(ViewRoot::new("a", SceneKind::SolarSystem), solar_system)
        .register(ViewRoot::new("b", SceneKind::SolarSystem), solar_system)
        .register(ViewRoot::new("c", SceneKind::SolarSystem), solar_system)
        .register(ViewRoot::new("paused", SceneKind::SolarSystem), paused_solar_system)
        .register(
            ViewRoot::new("galaxy", SceneKind::Galaxy).with_content_scale(0.5),
            galaxy,
        )
        .register(ViewRoot::new("earth", SceneKind::Planet), planet);
    app
}

fn is_settled(app: &App) -> bool {
    app.world().resource::<TransitionManager>().is_idle()
        && app.world().resource::<ViewLoader>().pending_count() == 0
}

fn run_until_idle(app: &mut App) {
    for _ in 0..200 {
        app.update();
        if is_settled(app) {
            return;
        }
    }
    panic!("transition never finished");
}

fn stack(app: &App) -> Vec<String> {
    app.world()
        .resource::<ViewStack>()
        .iter()
        .map(|view| view.to_string())
        .collect()
}

fn root_of(app: &App, view: &str) -> Option<Entity> {
    app.world().resource::<ViewLoader>().root(&ViewId::from(view))
}

fn current_view(app: &App) -> Option<String> {
    app.world()
        .resource::<TransitionManager>()
        .current_view()
        .map(ToString::to_string)
}

fn step(app: &App) -> Option<TransitionStep> {
    match app.world().resource::<TransitionManager>().phase() {
        TransitionPhase::Transitioning(step) => Some(*step),
        _ => None,
    }
}

fn take_log(app: &mut App) -> Vec<String> {
    std::mem::take(&mut app.world_mut().resource_mut::<EventLog>().0)
}

fn children_of<C: Component + Clone>(app: &mut App, root: Entity) -> Vec<C> {
    let mut query = app.world_mut().query::<(&ChildOf, &C)>();
    query
        .iter(app.world())
        .filter(|(parent, _)| parent.parent() == root)
        .map(|(_, component)| component.clone())
        .collect()
}

fn start_at_a() -> App {
    let mut app = test_app();
    app.world_mut().trigger(LoadNextView::new("a"));
    run_until_idle(&mut app);
    app.world_mut().resource_mut::<EventLog>().0.clear();
    app
}

#[test]
fn first_load_shows_view_without_zoom() {
    let mut app = start_at_a();
    assert_eq!(stack(&app), vec!["a"]);
    assert_eq!(current_view(&app).as_deref(), Some("a"));

    let root = root_of(&app, "a").expect("a loaded");
    let pose = app.world().get::<Transform>(root).expect("root transform");
    assert!(pose.scale.abs_diff_eq(Vec3::ONE, 1e-5));

    let mut alphas = app.world_mut().query::<&TransitionAlpha>();
    assert!(alphas.iter(app.world()).all(|alpha| (alpha.0 - 1.0).abs() < 1e-5));
    let mut colliders = app.world_mut().query::<&Interactable>();
    assert!(colliders.iter(app.world()).all(|collider| collider.enabled));
}

#[test]
fn forward_navigation_unloads_previous_view() {
    let mut app = start_at_a();
    let root_a = root_of(&app, "a").expect("a loaded");

    app.world_mut().trigger(LoadNextView::new("b"));
    assert_eq!(stack(&app), vec!["a", "b"]);

    app.update();
    assert!(app.world().resource::<TransitionManager>().is_transitioning());
    let root_b = root_of(&app, "b").expect("b loaded");
    let mut colliders = app.world_mut().query::<(&ChildOf, &Interactable)>();
    assert!(
        colliders
            .iter(app.world())
            .filter(|(parent, _)| parent.parent() == root_b)
            .all(|(_, collider)| !collider.enabled)
    );

    run_until_idle(&mut app);

    assert!(app.world().get_entity(root_a).is_err());
    assert_eq!(root_of(&app, "a"), None);
    assert_eq!(stack(&app), vec!["a", "b"]);
    assert_eq!(current_view(&app).as_deref(), Some("b"));

    let log = &app.world().resource::<EventLog>().0;
    assert_eq!(log, &vec![
        "begin:b".to_owned(),
        "unloaded:a".to_owned(),
        "zoom_out_end".to_owned(),
        "zoom_in_end".to_owned(),
        "end:b".to_owned(),
    ]);

    let pose = app.world().get::<Transform>(root_b).expect("b root");
    assert!(pose.scale.abs_diff_eq(Vec3::ONE, 1e-4));
    assert!(pose.translation.abs_diff_eq(Vec3::ZERO, 1e-4));
    let mut colliders = app.world_mut().query::<&Interactable>();
    assert!(colliders.iter(app.world()).all(|collider| collider.enabled));
}

#[test]
fn backward_navigation_pops_before_loading() {
    let mut app = start_at_a();
    app.world_mut().trigger(LoadNextView::new("b"));
    run_until_idle(&mut app);
    let root_b = root_of(&app, "b").expect("b loaded");

    app.world_mut().trigger(LoadPreviousView);
    assert_eq!(stack(&app), vec!["a"]);
    assert_eq!(
        app.world().resource::<TransitionManager>().direction(),
        NavigationDirection::Backward
    );

    run_until_idle(&mut app);

    assert!(app.world().get_entity(root_b).is_err());
    assert_eq!(current_view(&app).as_deref(), Some("a"));
    assert_eq!(stack(&app), vec!["a"]);
}

#[test]
fn request_during_transition_is_rejected() {
    let mut app = start_at_a();
    app.world_mut().trigger(LoadNextView::new("b"));
    app.update();
    assert!(app.world().resource::<TransitionManager>().is_transitioning());

    let phase_before = app.world().resource::<TransitionManager>().phase().clone();
    app.world_mut().trigger(LoadNextView::new("c"));
    app.world_mut().trigger(LoadPreviousView);

    assert_eq!(stack(&app), vec!["a", "b"]);
    assert_eq!(current_view(&app).as_deref(), Some("b"));
    assert_eq!(
        app.world().resource::<TransitionManager>().phase(),
        &phase_before
    );
    assert_eq!(app.world().resource::<ViewLoader>().pending_count(), 0);

    run_until_idle(&mut app);
    assert_eq!(root_of(&app, "c"), None);
    assert_eq!(current_view(&app).as_deref(), Some("b"));
}

#[test]
fn request_while_awaiting_load_is_rejected() {
    let mut app = start_at_a();
    app.world_mut().trigger(LoadNextView::new("b"));
    assert!(matches!(
        app.world().resource::<TransitionManager>().phase(),
        TransitionPhase::AwaitingLoad { .. }
    ));

    app.world_mut().trigger(LoadNextView::new("c"));
    assert_eq!(stack(&app), vec!["a", "b"]);
    assert_eq!(app.world().resource::<ViewLoader>().pending_count(), 1);
}

#[test]
fn back_without_history_does_nothing() {
    let mut app = start_at_a();
    app.world_mut().trigger(LoadPreviousView);
    assert!(app.world().resource::<TransitionManager>().is_idle());
    assert_eq!(stack(&app), vec!["a"]);
    app.update();
    assert_eq!(current_view(&app).as_deref(), Some("a"));
}

#[test]
fn single_planet_view_settles_at_display_fit() {
    let mut app = start_at_a();
    app.world_mut().trigger(LoadNextView::new("earth"));
    run_until_idle(&mut app);

    let root = root_of(&app, "earth").expect("earth loaded");
    let pose = app.world().get::<Transform>(root).expect("earth root");
    assert!(pose.scale.abs_diff_eq(Vec3::ONE, 1e-4));
    assert!(pose.translation.abs_diff_eq(Vec3::ZERO, 1e-4));
    assert_eq!(stack(&app), vec!["a", "earth"]);
}

#[test]
fn single_planet_zoom_pivots_on_planet_link() {
    let mut app = start_at_a();
    let root_a = root_of(&app, "a").expect("a loaded");
    let pose_a = *app.world().get::<Transform>(root_a).expect("a root");

    app.world_mut().trigger(LoadNextView::new("earth"));
    app.update();

    let manager = app.world().resource::<TransitionManager>();
    let plan = manager
        .episode()
        .and_then(|episode| episode.zoom.plan())
        .expect("zoom plan");
    let link_centre = pose_a.transform_point(Vec3::new(1.0, 0.0, 0.0));
    let collider_centre = pose_a.transform_point(Vec3::new(0.5, 0.0, 0.0));
    assert!(plan.pivot_world.abs_diff_eq(link_centre, 1e-5));
    assert!(!plan.pivot_world.abs_diff_eq(collider_centre, 1e-3));
}

#[test]
fn galaxy_round_trip_zooms_out_then_in() {
    let mut app = test_app();
    app.world_mut().trigger(LoadNextView::new("galaxy"));
    run_until_idle(&mut app);
    let galaxy_root = root_of(&app, "galaxy").expect("galaxy loaded");
    let pose = app.world().get::<Transform>(galaxy_root).expect("galaxy root");
    assert!(pose.scale.abs_diff_eq(Vec3::splat(0.5), 1e-5));
    take_log(&mut app);

    app.world_mut().trigger(LoadNextView::new("a"));
    let mut frames = 0;
    while step(&app) != Some(TransitionStep::AwaitingZoomIn) {
        app.update();
        frames += 1;
        assert!(frames < 200, "zoom-out never finished");
    }

    // Galaxy is gone while the solar system is still zooming in.
    assert!(app.world().get_entity(galaxy_root).is_err());
    assert_eq!(root_of(&app, "galaxy"), None);
    let root_a = root_of(&app, "a").expect("a loaded");
    let pose = app.world().get::<Transform>(root_a).expect("a root");
    assert!(pose.scale.x < 1.0 - 1e-3);
    assert_eq!(take_log(&mut app), vec![
        "begin:a".to_owned(),
        "unloaded:galaxy".to_owned(),
        "zoom_out_end".to_owned(),
    ]);

    run_until_idle(&mut app);
    let pose = app.world().get::<Transform>(root_a).expect("a root");
    assert!(pose.scale.abs_diff_eq(Vec3::ONE, 1e-4));
    assert!(pose.translation.abs_diff_eq(Vec3::ZERO, 1e-4));
    assert_eq!(take_log(&mut app), vec![
        "zoom_in_end".to_owned(),
        "end:a".to_owned(),
    ]);

    app.world_mut().trigger(LoadPreviousView);
    run_until_idle(&mut app);

    assert!(app.world().get_entity(root_a).is_err());
    let galaxy_root = root_of(&app, "galaxy").expect("galaxy reloaded");
    let pose = app.world().get::<Transform>(galaxy_root).expect("galaxy root");
    assert!(pose.scale.abs_diff_eq(Vec3::splat(0.5), 1e-4));
    assert!(pose.translation.abs_diff_eq(Vec3::ZERO, 1e-4));
    assert_eq!(stack(&app), vec!["galaxy"]);
    assert_eq!(take_log(&mut app), vec![
        "begin:galaxy".to_owned(),
        "unloaded:a".to_owned(),
        "zoom_out_end".to_owned(),
        "zoom_in_end".to_owned(),
        "end:galaxy".to_owned(),
    ]);
}

#[test]
fn transition_restores_authored_interaction_state() {
    let mut app = test_app();
    let locked = app
        .world_mut()
        .spawn(PanOrbitCamera {
            enabled: false,
            ..default()
        })
        .id();
    let free = app.world_mut().spawn(PanOrbitCamera::default()).id();
    let camera_enabled = |app: &App, camera: Entity| {
        app.world()
            .get::<PanOrbitCamera>(camera)
            .expect("camera")
            .enabled
    };

    app.world_mut().trigger(LoadNextView::new("a"));
    run_until_idle(&mut app);
    app.world_mut().trigger(LoadNextView::new("paused"));
    app.update();

    let root = root_of(&app, "paused").expect("paused loaded");
    assert!(!camera_enabled(&app, free));
    assert!(
        children_of::<Interactable>(&mut app, root)
            .iter()
            .all(|interactable| !interactable.enabled)
    );

    run_until_idle(&mut app);

    assert!(!camera_enabled(&app, locked));
    assert!(camera_enabled(&app, free));
    let mut flags: Vec<bool> = children_of::<Interactable>(&mut app, root)
        .iter()
        .map(|interactable| interactable.enabled)
        .collect();
    flags.sort_unstable();
    assert_eq!(flags, vec![false, true]);
    assert!(
        children_of::<RotationDriver>(&mut app, root)
            .iter()
            .all(|driver| !driver.enabled)
    );
}

#[test]
#[should_panic]
fn unknown_view_is_fatal() {
    let mut app = test_app();
    app.world_mut().trigger(LoadNextView::new("nowhere"));
}
