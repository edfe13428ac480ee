use {
    crate::MissionCtx,
    bevy::{platform::collections::HashMap, prelude::*},
    mission_events::{AgentId, AgentState, MissionMode},
};

type Listener<A> = Box<dyn FnMut(&mut MissionCtx, A) + Send + Sync>;

/// One owner's set of mission callbacks. Each kind is its own optional
/// slot; unset slots cost nothing at dispatch.
#[derive(Default)]
pub struct ListenerBundle {
    pub agent_built: Option<Listener<AgentId>>,
    pub agent_removed: Option<Listener<(AgentId, Option<AgentId>, AgentState)>>,
    /// Routed only to the bundle owned by the killer's hero.
    pub got_kill: Option<Listener<(AgentId, AgentId, AgentState)>>,
    /// Routed only to the bundle owned by the victim's hero.
    pub got_killed: Option<Listener<(AgentId, Option<AgentId>, AgentState)>>,
    pub tick: Option<Listener<f32>>,
    pub slow_tick: Option<Listener<f32>>,
    pub mission_over: Option<Listener<()>>,
    pub mission_reset: Option<Listener<()>>,
    pub mode_changed: Option<Listener<(MissionMode, MissionMode, bool)>>,
}

/// The hub: listener bundles keyed by owning entity (a hero, or a
/// subsystem's marker entity). Adding a bundle for an owner replaces
/// whatever that owner had registered before.
#[derive(Resource, Default)]
pub struct MissionListeners {
    bundles: HashMap<Entity, ListenerBundle>,
}

impl MissionListeners {
    pub fn add(&mut self, owner: Entity, bundle: ListenerBundle) {
        if self.bundles.insert(owner, bundle).is_some() {
            debug!(owner = ?owner, "replaced existing mission listeners");
        }
    }

    pub fn remove(&mut self, owner: Entity) {
        self.bundles.remove(&owner);
    }

    pub fn has(&self, owner: Entity) -> bool {
        self.bundles.contains_key(&owner)
    }

    pub fn clear(&mut self) {
        self.bundles.clear();
    }

    /// Take every bundle out for dispatch. Listeners registered while
    /// dispatch runs land in the (empty) map and win over the taken
    /// bundles when [`Self::restore`] merges them back.
    pub(crate) fn take_all(&mut self) -> HashMap<Entity, ListenerBundle> {
        std::mem::take(&mut self.bundles)
    }

    pub(crate) fn restore(&mut self, taken: HashMap<Entity, ListenerBundle>) {
        for (owner, bundle) in taken {
            self.bundles.entry(owner).or_insert(bundle);
        }
    }
}

/// Run `f` over every bundle with the hub temporarily emptied, so a
/// listener re-registering through deferred actions cannot observe a
/// half-dispatched hub.
pub(crate) fn dispatch<F>(listeners: &mut MissionListeners, mut f: F)
where
    F: FnMut(Entity, &mut ListenerBundle),
{
    let mut taken = listeners.take_all();
    for (owner, bundle) in taken.iter_mut() {
        f(*owner, bundle);
    }
    listeners.restore(taken);
}
