//! Registry and loading of view content.
//!
//! Views are registered up front with a blueprint that spawns their hierarchy.
//! Loads are requested from observers and carried out by `load_requested_views`,
//! an exclusive system that runs at the start of the next update.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;

use crate::components::ViewRoot;
use crate::error::TransitionError;
use crate::events::ViewLoaded;
use crate::view_stack::ViewId;

/// Spawns the hierarchy of a view and returns its root entity.
pub trait ViewBlueprint: Send + Sync + 'static {
    fn spawn(&self, world: &mut World) -> Entity;
}

impl<F> ViewBlueprint for F
where
    F: Fn(&mut World) -> Entity + Send + Sync + 'static,
{
    fn spawn(&self, world: &mut World) -> Entity { self(world) }
}

struct Registration {
    root:      ViewRoot,
    blueprint: Arc<dyn ViewBlueprint>,
}

/// Known views, pending loads and the roots of loaded views.
#[derive(Resource, Default)]
pub struct ViewLoader {
    registry: HashMap<ViewId, Registration>,
    pending:  VecDeque<ViewId>,
    loaded:   HashMap<ViewId, Entity>,
}

impl ViewLoader {
    /// Registers a view. `root` is inserted on the spawned root entity unless the
    /// blueprint already put a `ViewRoot` there.
    pub fn register(&mut self, root: ViewRoot, blueprint: impl ViewBlueprint) -> &mut Self {
        let view = root.view.clone();
        if self
            .registry
            .insert(view.clone(), Registration {
                root,
                blueprint: Arc::new(blueprint),
            })
            .is_some()
        {
            warn!("ViewLoader: replaced registration of view {view}");
        }
        self
    }

    pub fn is_registered(&self, view: &ViewId) -> bool { self.registry.contains_key(view) }

    /// Queues `view` for loading on the next update.
    pub fn request_load(&mut self, view: &ViewId) -> Result<(), TransitionError> {
        if !self.is_registered(view) {
            return Err(TransitionError::UnknownView(view.clone()));
        }
        debug!("ViewLoader: queued load of {view}");
        self.pending.push_back(view.clone());
        Ok(())
    }

    pub fn pending_count(&self) -> usize { self.pending.len() }

    /// Root entity of a loaded view.
    pub fn root(&self, view: &ViewId) -> Option<Entity> { self.loaded.get(view).copied() }

    pub fn is_loaded(&self, view: &ViewId) -> bool { self.loaded.contains_key(view) }

    /// Forgets the loaded root of `view`. The caller despawns it.
    pub fn unload(&mut self, view: &ViewId) -> Option<Entity> { self.loaded.remove(view) }

    /// Forgets `root` if it is still the loaded root of `view`. A view can be
    /// loaded again before its previous instance is unloaded.
    pub fn unload_root(&mut self, view: &ViewId, root: Entity) -> bool {
        if self.loaded.get(view) == Some(&root) {
            self.loaded.remove(view);
            true
        } else {
            false
        }
    }

    fn take_pending(&mut self) -> Vec<(ViewRoot, Arc<dyn ViewBlueprint>)> {
        self.pending
            .drain(..)
            .filter_map(|view| {
                self.registry
                    .get(&view)
                    .map(|registration| (registration.root.clone(), Arc::clone(&registration.blueprint)))
            })
            .collect()
    }
}

/// Spawns every queued view and triggers `ViewLoaded` for each.
pub fn load_requested_views(world: &mut World) {
    let requests = match world.get_resource_mut::<ViewLoader>() {
        Some(mut loader) if loader.pending_count() > 0 => loader.take_pending(),
        _ => return,
    };

    for (root, blueprint) in requests {
        let view = root.view.clone();
        let entity = blueprint.spawn(world);

        let Ok(mut spawned) = world.get_entity_mut(entity) else {
            error!("ViewLoader: blueprint for {view} returned a missing entity {entity:?}");
            continue;
        };
        if !spawned.contains::<ViewRoot>() {
            spawned.insert(root);
        }

        world.resource_mut::<ViewLoader>().loaded.insert(view.clone(), entity);
        info!("ViewLoader: loaded {view} as {entity:?}");
        world.trigger(ViewLoaded { root: entity, view });
    }
}
