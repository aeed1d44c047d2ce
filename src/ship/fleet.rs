use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{error, info};
use rayon::prelude::*;

use crate::config::ConfigHandle;
use crate::error::ControlError;
use crate::host::{DeviceDiscovery, GravityField, Notifier, Severity};
use crate::vessel::{Vessel, VesselId};
use super::controller::{ShipController, TickContext, TickOutcome};

// ---------------------------------------------------------------------------
// Fleet: registry of controlled vessels
// ---------------------------------------------------------------------------

/// Owns one `ShipController` per attached vessel and drives them each host
/// tick. Collaborators are injected here and handed down per tick.
pub struct Fleet {
    config: ConfigHandle,
    discovery: Arc<dyn DeviceDiscovery>,
    gravity: Arc<dyn GravityField>,
    notifier: Arc<dyn Notifier>,
    ships: HashMap<VesselId, ShipController>,
    failing: HashSet<VesselId>, // already notified, until the next clean tick
}

impl Fleet {
    pub fn new(
        config: ConfigHandle,
        discovery: Arc<dyn DeviceDiscovery>,
        gravity: Arc<dyn GravityField>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            discovery,
            gravity,
            notifier,
            ships: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Start controlling `vessel`. Bodies without physics and vessels
    /// already attached are ignored. Returns true if a controller was created.
    pub fn attach(&mut self, vessel: Arc<Vessel>) -> bool {
        if !vessel.has_physics() || self.ships.contains_key(&vessel.id()) {
            return false;
        }
        info!("attach vessel {} ({})", vessel.id(), vessel.name());
        let config = self.config.load();
        self.ships.insert(vessel.id(), ShipController::new(vessel, &config));
        true
    }

    /// Stop controlling a vessel and release its state.
    pub fn detach(&mut self, id: VesselId) -> Option<Arc<Vessel>> {
        let mut ship = self.ships.remove(&id)?;
        self.failing.remove(&id);
        ship.release();
        info!("detach vessel {}", id);
        Some(Arc::clone(ship.vessel()))
    }

    /// Detach every vessel the host has marked for removal.
    fn reap(&mut self) {
        let marked: Vec<VesselId> = self
            .ships
            .iter()
            .filter(|(_, ship)| ship.is_marked_for_removal())
            .map(|(id, _)| *id)
            .collect();
        for id in marked {
            self.detach(id);
        }
    }

    /// One host tick: drop vessels marked for removal, update the rest (in
    /// parallel), then advance their counters. Per-vessel failures are
    /// logged and notified, never propagated. Returns the outcome of each
    /// successful update, by id.
    pub fn tick(&mut self) -> Vec<(VesselId, TickOutcome)> {
        self.reap();

        let config = self.config.load();
        let ctx = TickContext {
            config: &config,
            discovery: self.discovery.as_ref(),
            gravity: self.gravity.as_ref(),
        };

        let results: Vec<(VesselId, Result<TickOutcome, ControlError>)> = self
            .ships
            .par_iter_mut()
            .map(|(id, ship)| (*id, ship.update(&ctx)))
            .collect();

        for ship in self.ships.values_mut() {
            ship.advance_tick_counters();
        }

        let mut outcomes = Vec::with_capacity(results.len());
        for (id, result) in results {
            match result {
                Ok(outcome) => {
                    self.failing.remove(&id);
                    outcomes.push((id, outcome));
                }
                Err(err) => self.report(id, &err),
            }
        }
        outcomes.sort_by_key(|(id, _)| *id);
        outcomes
    }

    fn report(&mut self, id: VesselId, err: &ControlError) {
        error!("vessel {}: tick failed: {}", id, err);
        if self.failing.insert(id) {
            self.notifier
                .notify(&format!("Leveling error on vessel {}: {}", id, err), Severity::Error);
        }
    }

    pub fn get(&self, id: VesselId) -> Option<&ShipController> {
        self.ships.get(&id)
    }

    pub fn ids(&self) -> Vec<VesselId> {
        let mut ids: Vec<_> = self.ships.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
