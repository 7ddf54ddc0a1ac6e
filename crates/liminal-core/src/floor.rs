//! Floor transition engine - keeps the room the player is in plus any room
//! spawned beyond a doorway they are approaching.
//!
//! Per tick:
//! 1. Advance the clock and scan every zone against the player.
//! 2. Debounce: standing in any zone cancels a pending commit. Leaving a
//!    zone schedules a commit for it, unless one is already pending for
//!    that zone.
//! 3. Spawn: on the first zone entered from open floor, place a room
//!    beyond it unless its doorway is already connected. One per tick.
//! 4. Commit: when the timer fires, the owner of the vacated zone becomes
//!    current. Backing out into the current room drops every speculative
//!    room; walking forward drops the old room and anything no longer
//!    reachable through doorway connections.
//! 5. Propagate scene transforms.

use hecs::World;
use liminal_logic::config::FloorTuning;
use liminal_logic::geometry::Vec3;
use liminal_logic::layout::LayoutTable;
use liminal_logic::placement::{select_next_room, VacatedZone};
use liminal_logic::timer::CommitTimer;
use liminal_logic::zone::{scan_zones, RenderingZone, RoomId, ZoneRef};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

use crate::assets::{LoadError, LoadedModel, ModelLoader, ModelTicket};
use crate::components::*;
use crate::generation::build_room;
use crate::physics::{PhysicsWorld, StaticBox};
use crate::systems::propagate_transforms;

/// Something the engine did during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FloorEvent {
    Spawned {
        room: RoomId,
        layout: String,
        from: ZoneRef,
    },
    /// No candidate layout could attach to the zone.
    SpawnSkipped { zone: ZoneRef },
    CommitScheduled { zone: ZoneRef },
    CommitCancelled,
    Committed {
        current: RoomId,
        removed: Vec<RoomId>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FloorError {
    #[error("unknown layout: {0}")]
    UnknownLayout(String),
}

/// What happened to a model load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelOutcome {
    Attached,
    Failed,
    /// The room was unloaded before the result arrived.
    RoomGone,
    AlreadyResolved,
    UnknownSlot,
}

pub struct FloorEngine<P, L> {
    layouts: LayoutTable,
    tuning: FloorTuning,
    scene: World,
    physics: P,
    loader: L,
    /// Index 0 is the current room.
    rooms: Vec<RoomInstance>,
    next_id: u32,
    last_zone: Option<ZoneRef>,
    commit: CommitTimer<ZoneRef>,
    clock: f64,
    puzzle_completed: bool,
    zone_bounds_visible: bool,
    rng: StdRng,
}

impl<P: PhysicsWorld, L: ModelLoader> FloorEngine<P, L> {
    pub fn new(layouts: LayoutTable, tuning: FloorTuning, physics: P, loader: L) -> Self {
        let commit = CommitTimer::new(tuning.commit_delay_secs);
        Self {
            layouts,
            tuning,
            scene: World::new(),
            physics,
            loader,
            rooms: Vec::new(),
            next_id: 1,
            last_zone: None,
            commit,
            clock: 0.0,
            puzzle_completed: false,
            zone_bounds_visible: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Make room selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Drop every room and build `layout_name` as the current room.
    pub fn start(&mut self, layout_name: &str, position: Vec3) -> Result<RoomId, FloorError> {
        let plan = self
            .layouts
            .get(layout_name)
            .ok_or_else(|| FloorError::UnknownLayout(layout_name.to_string()))?
            .resolve();

        for mut room in self.rooms.drain(..) {
            room.unload(&mut self.scene, &mut self.physics);
        }
        self.last_zone = None;
        self.commit.cancel();

        let id = self.allocate_id();
        let room = build_room(
            &mut self.scene,
            &mut self.physics,
            &mut self.loader,
            id,
            &plan,
            position,
            &self.tuning,
        );
        self.rooms.push(room);
        self.apply_gizmo_visibility();
        propagate_transforms(&mut self.scene);
        log::info!("floor started in {} ({})", id, layout_name);
        Ok(id)
    }

    /// Advance one tick with the player's sampled position.
    pub fn update(&mut self, player: Vec3, delta_seconds: f32) -> Vec<FloorEvent> {
        self.clock += delta_seconds.max(0.0) as f64;
        let mut events = Vec::new();

        let scan = scan_zones(
            self.rooms
                .iter_mut()
                .map(|r| (r.id, r.zones.as_mut_slice())),
            &player,
        );

        match (scan.active, self.last_zone) {
            (Some(_), _) => {
                if self.commit.cancel() {
                    log::debug!("commit cancelled at t={:.3}", self.clock);
                    events.push(FloorEvent::CommitCancelled);
                }
            }
            (None, Some(left)) => {
                if !self.commit.is_pending_for(&left) {
                    self.commit.schedule(self.clock, left);
                    log::debug!(
                        "commit scheduled for {} zone {} at t={:.3}",
                        left.room,
                        left.index,
                        self.clock
                    );
                    events.push(FloorEvent::CommitScheduled { zone: left });
                }
            }
            (None, None) => {}
        }

        if self.last_zone.is_none() {
            if let Some(&entered) = scan.triggered.first() {
                events.extend(self.spawn_through(entered));
            }
        }
        self.last_zone = scan.active;

        if let Some(vacated) = self.commit.poll(self.clock) {
            events.extend(self.commit_through(vacated));
        }

        propagate_transforms(&mut self.scene);
        events
    }

    fn allocate_id(&mut self) -> RoomId {
        let id = RoomId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_through(&mut self, zone_ref: ZoneRef) -> Option<FloorEvent> {
        let (owner_layout, vacated) = {
            let zone = self.zone(zone_ref)?;
            if zone.connected.is_some() {
                return None;
            }
            let owner = self.room(zone_ref.room)?;
            (
                owner.layout_name.clone(),
                VacatedZone {
                    direction: zone.direction,
                    opening_center: zone.opening_center,
                },
            )
        };

        let Some(placement) = select_next_room(
            &self.layouts,
            &owner_layout,
            &vacated,
            self.puzzle_completed,
            &mut self.rng,
        ) else {
            log::warn!(
                "no layout can attach to {} zone {} ({})",
                zone_ref.room,
                zone_ref.index,
                vacated.direction
            );
            return Some(FloorEvent::SpawnSkipped { zone: zone_ref });
        };

        let id = self.allocate_id();
        let mut room = build_room(
            &mut self.scene,
            &mut self.physics,
            &mut self.loader,
            id,
            &placement.plan,
            placement.position,
            &self.tuning,
        );
        if let Some(attached) = room.zones.get_mut(placement.attach_zone) {
            attached.connected = Some(zone_ref.room);
        }
        if let Some(zone) = self.zone_mut(zone_ref) {
            zone.connected = Some(id);
        }
        self.rooms.push(room);
        self.apply_gizmo_visibility();

        log::info!(
            "spawned {} ({}) beyond {} {} doorway, turned {}°",
            id,
            placement.layout_name,
            zone_ref.room,
            vacated.direction,
            placement.turns.count() * 90
        );
        Some(FloorEvent::Spawned {
            room: id,
            layout: placement.layout_name,
            from: zone_ref,
        })
    }

    fn commit_through(&mut self, vacated: ZoneRef) -> Option<FloorEvent> {
        let current = self.rooms.first()?.id;
        let new_current = vacated.room;
        if self.room(new_current).is_none() {
            log::warn!("commit for {} ignored, room is gone", new_current);
            return None;
        }
        let removed = self.manage_room_transitions(current, new_current);
        log::info!(
            "committed {} as current, unloaded {:?} ({} rooms live)",
            new_current,
            removed,
            self.rooms.len()
        );
        Some(FloorEvent::Committed {
            current: new_current,
            removed,
        })
    }

    /// Make `new_current` the current room and unload what it no longer
    /// needs. Returns the removed room ids.
    fn manage_room_transitions(&mut self, current: RoomId, new_current: RoomId) -> Vec<RoomId> {
        let doomed: Vec<RoomInstance> = if new_current == current {
            // backed out: everything past the current room was speculative
            self.rooms.drain(1..).collect()
        } else {
            if let Some(index) = self.rooms.iter().position(|r| r.id == new_current) {
                let room = self.rooms.remove(index);
                self.rooms.insert(0, room);
            }
            let reachable = self.reachable_from(new_current, current);
            let (keep, doomed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rooms)
                .into_iter()
                .partition(|r| reachable.contains(&r.id));
            self.rooms = keep;
            doomed
        };

        let removed: Vec<RoomId> = doomed.iter().map(|r| r.id).collect();
        for mut room in doomed {
            room.unload(&mut self.scene, &mut self.physics);
        }
        self.forget_rooms(&removed);
        removed
    }

    /// Rooms reachable from `start` through connected doorways without
    /// passing through `excluded`.
    fn reachable_from(&self, start: RoomId, excluded: RoomId) -> HashSet<RoomId> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Some(room) = self.room(id) else { continue };
            for next in room.zones.iter().filter_map(|z| z.connected) {
                if next != excluded && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    fn forget_rooms(&mut self, removed: &[RoomId]) {
        if removed.is_empty() {
            return;
        }
        for room in &mut self.rooms {
            for zone in &mut room.zones {
                if zone.connected.is_some_and(|c| removed.contains(&c)) {
                    zone.connected = None;
                }
            }
        }
        if self.last_zone.is_some_and(|z| removed.contains(&z.room)) {
            self.last_zone = None;
        }
        if matches!(self.commit.pending(), Some((z, _)) if removed.contains(&z.room)) {
            self.commit.cancel();
        }
    }

    fn apply_gizmo_visibility(&mut self) {
        let visible = self.zone_bounds_visible;
        for room in &self.rooms {
            for &node in &room.zone_gizmos {
                if let Ok(mut gizmo) = self.scene.get::<&mut ZoneGizmo>(node) {
                    gizmo.visible = visible;
                }
            }
        }
    }

    // ── Model loading ───────────────────────────────────────────────────

    /// Hand back the result of a model request. Results for rooms that are
    /// gone, or for slots already resolved, change nothing.
    pub fn resolve_model(
        &mut self,
        ticket: ModelTicket,
        result: Result<LoadedModel, LoadError>,
    ) -> ModelOutcome {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == ticket.room) else {
            log::debug!("model result for unloaded {} dropped", ticket.room);
            return ModelOutcome::RoomGone;
        };
        let Some(slot) = room.models.get(ticket.slot) else {
            log::warn!("{} has no model slot {}", room.id, ticket.slot);
            return ModelOutcome::UnknownSlot;
        };
        if slot.state != ModelSlotState::Pending {
            return ModelOutcome::AlreadyResolved;
        }
        let (node, path) = (slot.node, slot.path.clone());

        match result {
            Ok(model) => {
                let global = self
                    .scene
                    .get::<&GlobalTransform>(node)
                    .map(|g| g.0)
                    .unwrap_or_else(|_| Transform::from_translation(room.position));
                let size = model.size * global.scale;
                let center = global.transform_point(model.center_offset);
                let collider = self.physics.add_static_box(StaticBox {
                    center,
                    half_extents: size * 0.5,
                    rotation_y: global.rotation_y,
                });
                room.colliders.push(collider);
                room.models[ticket.slot].state = ModelSlotState::Loaded { collider };
                if let Ok(mut instance) = self.scene.get::<&mut ModelInstance>(node) {
                    instance.loaded_size = Some(size);
                }
                log::debug!("attached {} to {}", path, room.id);
                ModelOutcome::Attached
            }
            Err(err) => {
                log::warn!("model {} for {} failed: {}", path, room.id, err);
                room.models[ticket.slot].state = ModelSlotState::Failed;
                ModelOutcome::Failed
            }
        }
    }

    // ── Debug tooling ───────────────────────────────────────────────────

    pub fn set_zone_bounds_visible(&mut self, visible: bool) {
        self.zone_bounds_visible = visible;
        self.apply_gizmo_visibility();
    }

    pub fn zone_bounds_visible(&self) -> bool {
        self.zone_bounds_visible
    }

    /// Set a zone's manual trigger flag. Scans ignore it.
    pub fn trigger_zone(&mut self, zone: ZoneRef) -> bool {
        self.zone_mut(zone).map(|z| z.trigger()).is_some()
    }

    pub fn reset_zone(&mut self, zone: ZoneRef) -> bool {
        self.zone_mut(zone).map(|z| z.reset()).is_some()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn rooms(&self) -> &[RoomInstance] {
        &self.rooms
    }

    pub fn current_room(&self) -> Option<&RoomInstance> {
        self.rooms.first()
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomInstance> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Room whose floor lies under `p`, current room first.
    pub fn room_at(&self, p: &Vec3) -> Option<RoomId> {
        self.rooms.iter().find(|r| r.contains_xz(p)).map(|r| r.id)
    }

    pub fn zone(&self, zone: ZoneRef) -> Option<&RenderingZone> {
        self.room(zone.room)?.zones.get(zone.index)
    }

    fn zone_mut(&mut self, zone: ZoneRef) -> Option<&mut RenderingZone> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == zone.room)?
            .zones
            .get_mut(zone.index)
    }

    /// Zone the player stood in on the last tick.
    pub fn last_zone(&self) -> Option<ZoneRef> {
        self.last_zone
    }

    pub fn pending_commit(&self) -> Option<ZoneRef> {
        self.commit.pending().map(|(z, _)| *z)
    }

    pub fn set_puzzle_completed(&mut self, completed: bool) {
        if completed != self.puzzle_completed {
            log::info!("puzzle completed: {}", completed);
        }
        self.puzzle_completed = completed;
    }

    pub fn puzzle_completed(&self) -> bool {
        self.puzzle_completed
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    pub fn tuning(&self) -> &FloorTuning {
        &self.tuning
    }

    pub fn scene(&self) -> &World {
        &self.scene
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// Seconds since the engine was created.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Colliders owned by live rooms.
    pub fn live_collider_count(&self) -> usize {
        self.rooms.iter().map(|r| r.colliders.len()).sum()
    }
}
