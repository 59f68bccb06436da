//! Input gating and animators paused during transitions.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::components::Interactable;
use crate::components::RotationDriver;

/// A component with an on/off switch that transitions take over.
pub trait Gated {
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

impl Gated for Interactable {
    fn enabled(&self) -> bool { self.enabled }

    fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
}

impl Gated for RotationDriver {
    fn enabled(&self) -> bool { self.enabled }

    fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
}

impl Gated for PanOrbitCamera {
    fn enabled(&self) -> bool { self.enabled }

    fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
}

/// `enabled` flags as they were before a transition switched them off.
///
/// Captured when the incoming view loads and written back piece by piece:
/// camera input and rotation drivers at zoom-out end, colliders once the
/// episode is over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionStash {
    pub colliders: Vec<(Entity, bool)>,
    pub drivers:   Vec<(Entity, bool)>,
    pub cameras:   Vec<(Entity, bool)>,
}

/// Switches off `C` on every entity in `entities` that has one and returns the
/// previous flags.
pub fn suspend<C>(
    entities: impl IntoIterator<Item = Entity>,
    query: &mut Query<&mut C>,
) -> Vec<(Entity, bool)>
where
    C: Component<Mutability = Mutable> + Gated,
{
    entities
        .into_iter()
        .filter_map(|entity| {
            let mut gated = query.get_mut(entity).ok()?;
            let was_enabled = gated.enabled();
            if was_enabled {
                gated.set_enabled(false);
            }
            Some((entity, was_enabled))
        })
        .collect()
}

/// Writes stashed flags back. Entities that are gone are skipped. Returns how
/// many flags changed.
pub fn restore<C>(stash: &[(Entity, bool)], query: &mut Query<&mut C>) -> usize
where
    C: Component<Mutability = Mutable> + Gated,
{
    let mut changed = 0;
    for &(entity, enabled) in stash {
        let Ok(mut gated) = query.get_mut(entity) else {
            continue;
        };
        if gated.enabled() != enabled {
            gated.set_enabled(enabled);
            changed += 1;
        }
    }
    changed
}

/// Spins every enabled `RotationDriver` around its local axis.
pub fn spin_rotation_drivers(time: Res<Time>, mut drivers: Query<(&RotationDriver, &mut Transform)>) {
    let dt = time.delta_secs();
    for (driver, mut transform) in &mut drivers {
        if !driver.enabled {
            continue;
        }
        let Ok(axis) = Dir3::new(driver.axis) else {
            continue;
        };
        transform.rotate_local_axis(axis, driver.radians_per_second * dt);
    }
}
