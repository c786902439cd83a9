//! Battle session: phase state machine, command handling, enemy phase loop
//!
//! All simulation mutation happens inside `handle` and `advance`; the
//! frame loop calls `advance` once per completed presentation step during
//! the enemy phase, so every call observes fully committed state. Illegal
//! commands are absorbed as no-ops; only setup errors are fatal.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

use crate::battle::ai::{decide, TargetInfo};
use crate::battle::combat::resolve_attack;
use crate::battle::events::BattleEvent;
use crate::battle::pathfinding::{extract_path, reachable, ReachableSet};
use crate::battle::scheduler::MidBattleEventScheduler;
use crate::battle::setup::{BattleSetup, EnemyTemplateSet};
use crate::battle::units::UnitEntity;
use crate::core::error::{GridfallError, Result};
use crate::core::types::{Team, UnitId};
use crate::grid::coord::GridCoord;
use crate::grid::elevation::generate_elevation;
use crate::grid::map::GridModel;
use crate::roster::Roster;

/// Phases of the battle protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattlePhase {
    #[default]
    Setup,
    PlayerTurn,
    SelectingAttackTarget,
    EnemyTurn,
    Victory,
}

/// Player-issued commands; anything illegal in the current state is ignored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SelectUnit(UnitId),
    MoveUnit {
        unit: UnitId,
        destination: GridCoord,
    },
    ToggleAttackMode,
    Attack {
        target: UnitId,
    },
    EndTurn,
    /// Party menu or cutscene takes over input
    OpenOverlay,
    CloseOverlay,
}

/// One running battle
#[derive(Debug)]
pub struct BattleSession {
    pub grid: GridModel,
    units: Vec<UnitEntity>,
    pub phase: BattlePhase,
    /// Starts at 1; increments once per enemy-to-player transition
    pub turn: u32,
    selected: Option<UnitId>,
    overlay_depth: u32,
    scheduler: MidBattleEventScheduler,
    enemy_queue: VecDeque<UnitId>,
    rng: ChaCha8Rng,
    events: Vec<BattleEvent>,
}

impl BattleSession {
    /// Build a session from a setup value.
    ///
    /// Structural errors (unknown template, off-grid spawn, too few roster
    /// records) abort the load; no partial battle state is left behind.
    pub fn new(
        setup: &BattleSetup,
        templates: &EnemyTemplateSet,
        roster: &Roster,
        seed: u64,
    ) -> Result<Self> {
        if roster.records.len() < setup.friendly_spawns.len() {
            return Err(GridfallError::RosterTooSmall {
                spawns: setup.friendly_spawns.len(),
                records: roster.records.len(),
            });
        }

        let mut grid = GridModel::new(setup.width, setup.height);
        if let Some(config) = &setup.elevation {
            generate_elevation(&mut grid, config, seed);
        }
        for obstacle in &setup.obstacles {
            grid.set_blocked(*obstacle, true);
        }

        let mut units = Vec::new();

        for (record, coord) in roster.records.iter().zip(&setup.friendly_spawns) {
            if !grid.in_bounds(*coord) {
                return Err(GridfallError::SpawnOutOfBounds(coord.col, coord.row));
            }
            let mut unit = UnitEntity::new(Team::Friendly, *coord, record.battle_stats());
            unit.current_hp = record.spawn_hp();
            unit.roster_ref = Some(record.id);
            units.push(unit);
        }

        for spawn in &setup.enemy_spawns {
            if !grid.in_bounds(spawn.position) {
                return Err(GridfallError::SpawnOutOfBounds(
                    spawn.position.col,
                    spawn.position.row,
                ));
            }
            let template = templates.get(&spawn.template)?;
            units.push(UnitEntity::new(Team::Enemy, spawn.position, template.stats));
        }

        let mut events = Vec::new();
        for unit in &units {
            grid.place(unit.id, unit.position);
            events.push(BattleEvent::UnitSpawned {
                unit: unit.id,
                team: unit.team,
                position: unit.position,
            });
        }

        Ok(Self {
            grid,
            units,
            phase: BattlePhase::Setup,
            turn: 1,
            selected: None,
            overlay_depth: 0,
            scheduler: MidBattleEventScheduler::new(setup.trigger_list()),
            enemy_queue: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events,
        })
    }

    /// Fire turn-1 triggers and enter the first player phase
    pub fn start(&mut self) {
        if self.phase != BattlePhase::Setup {
            return;
        }

        tracing::info!(turn = self.turn, "battle started");
        self.fire_scheduled();
        self.events.push(BattleEvent::TurnChanged {
            number: self.turn,
            side: Team::Friendly,
        });
        self.phase = BattlePhase::PlayerTurn;
        self.check_victory();
    }

    // ----- queries -----

    pub fn units(&self) -> &[UnitEntity] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitEntity> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn living(&self, team: Team) -> usize {
        self.units
            .iter()
            .filter(|u| u.team == team && u.is_alive())
            .count()
    }

    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_depth > 0
    }

    /// Tiles the given unit could move to right now
    pub fn movement_options(&self, unit: UnitId) -> Option<ReachableSet> {
        let unit = self.unit(unit)?;
        if !unit.action.can_move() {
            return None;
        }
        Some(reachable(&self.grid, unit.position, unit.stats.movement))
    }

    /// Take all notifications emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // ----- command handling -----

    pub fn handle(&mut self, command: Command) {
        if self.phase == BattlePhase::Victory || self.phase == BattlePhase::Setup {
            return;
        }

        // Modal menu or cutscene swallows everything except its own close
        if self.overlay_depth > 0 {
            match command {
                Command::OpenOverlay => self.overlay_depth += 1,
                Command::CloseOverlay => self.overlay_depth -= 1,
                _ => {}
            }
            return;
        }

        match command {
            Command::SelectUnit(id) => self.select_unit(id),
            Command::MoveUnit { unit, destination } => self.move_unit(unit, destination),
            Command::ToggleAttackMode => self.toggle_attack_mode(),
            Command::Attack { target } => self.attack(target),
            Command::EndTurn => self.end_turn(),
            Command::OpenOverlay => self.overlay_depth += 1,
            Command::CloseOverlay => {}
        }
    }

    fn select_unit(&mut self, id: UnitId) {
        if self.phase != BattlePhase::PlayerTurn {
            return;
        }
        // Exhausted units only get an info view, handled by presentation
        match self.unit(id) {
            Some(u) if u.team == Team::Friendly && u.is_alive() && !u.action.is_exhausted() => {
                self.selected = Some(id);
            }
            _ => {}
        }
    }

    fn move_unit(&mut self, id: UnitId, destination: GridCoord) {
        if self.phase != BattlePhase::PlayerTurn {
            return;
        }
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let unit = &self.units[idx];
        if unit.team != Team::Friendly || !unit.is_alive() || !unit.action.can_move() {
            return;
        }
        let origin = unit.position;
        if destination == origin {
            return;
        }

        let set = reachable(&self.grid, origin, unit.stats.movement);
        let Some(path) = extract_path(&self.grid, &set, destination) else {
            return; // unreachable or occupied: ignored input
        };

        self.grid.vacate(origin);
        self.grid.place(id, destination);

        self.units[idx].position = destination;
        self.units[idx].mark_moved();
        self.events.push(BattleEvent::UnitMoved { unit: id, path });
        self.selected = Some(id);

        self.auto_exhaust(idx);
    }

    /// A moved unit with no enemy in range has nothing left to do; forcing
    /// it exhausted avoids a stuck "attack available" state in the UI.
    fn auto_exhaust(&mut self, idx: usize) {
        let unit = &self.units[idx];
        let range = unit.stats.attack_range;
        let position = unit.position;

        let any_target = self
            .units
            .iter()
            .any(|u| u.team == Team::Enemy && u.is_alive() && u.position.distance(&position) <= range);

        if !any_target {
            self.units[idx].exhaust();
        }
    }

    fn toggle_attack_mode(&mut self) {
        match self.phase {
            BattlePhase::PlayerTurn => {
                let can_attack = self
                    .selected
                    .and_then(|id| self.unit(id))
                    .map(|u| u.is_alive() && u.action.can_attack())
                    .unwrap_or(false);
                if can_attack {
                    self.phase = BattlePhase::SelectingAttackTarget;
                }
            }
            BattlePhase::SelectingAttackTarget => {
                self.phase = BattlePhase::PlayerTurn;
            }
            _ => {}
        }
    }

    fn attack(&mut self, target_id: UnitId) {
        if self.phase != BattlePhase::SelectingAttackTarget {
            return;
        }
        let Some(attacker_id) = self.selected else {
            return;
        };
        let Some(attacker) = self.unit(attacker_id).cloned() else {
            return;
        };
        let Some(target) = self.unit(target_id) else {
            return;
        };
        if target.team != Team::Enemy
            || !target.is_alive()
            || attacker.position.distance(&target.position) > attacker.stats.attack_range
        {
            return; // out of range or dead: ignored input
        }

        self.resolve(attacker_id, target_id);

        if let Some(idx) = self.index_of(attacker_id) {
            self.units[idx].mark_attacked();
        }
        self.selected = None;
        if self.phase == BattlePhase::SelectingAttackTarget {
            self.phase = BattlePhase::PlayerTurn;
        }
    }

    fn end_turn(&mut self) {
        if self.phase != BattlePhase::PlayerTurn {
            return;
        }

        self.selected = None;
        self.phase = BattlePhase::EnemyTurn;
        self.events.push(BattleEvent::TurnChanged {
            number: self.turn,
            side: Team::Enemy,
        });

        // Enemies act in roster order; their availability resets here
        self.enemy_queue.clear();
        for unit in &mut self.units {
            if unit.team == Team::Enemy && unit.is_alive() {
                unit.new_turn();
                self.enemy_queue.push_back(unit.id);
            }
        }
    }

    // ----- enemy phase -----

    /// Run the next enemy activation.
    ///
    /// One activation per call so the frame loop can play the resulting
    /// movement/attack presentation before the next enemy commits. Entries
    /// killed since the queue was built are skipped without acting.
    pub fn advance(&mut self) {
        if self.phase != BattlePhase::EnemyTurn {
            return;
        }

        while let Some(id) = self.enemy_queue.pop_front() {
            let alive = self.unit(id).map(|u| u.is_alive()).unwrap_or(false);
            if !alive {
                continue;
            }
            self.enemy_act(id);
            if self.phase != BattlePhase::EnemyTurn {
                return; // victory fired mid-phase
            }
            if self.enemy_queue.is_empty() {
                break;
            }
            return;
        }

        self.finish_enemy_phase();
    }

    /// Drive the enemy phase to completion in one call
    pub fn run_enemy_phase(&mut self) {
        while self.phase == BattlePhase::EnemyTurn {
            self.advance();
        }
    }

    fn enemy_act(&mut self, id: UnitId) {
        let Some(enemy) = self.unit(id).cloned() else {
            return;
        };

        let targets: Vec<TargetInfo> = self
            .units
            .iter()
            .filter(|u| u.team == Team::Friendly && u.is_alive())
            .map(|u| TargetInfo {
                id: u.id,
                position: u.position,
                current_hp: u.current_hp,
            })
            .collect();

        // Isolated enemy with nobody to fight: stay put, still exhaust
        if targets.is_empty() {
            if let Some(idx) = self.index_of(id) {
                self.units[idx].exhaust();
            }
            return;
        }

        let set = reachable(&self.grid, enemy.position, enemy.stats.movement);
        let Some(decision) = decide(&enemy, &targets, &set) else {
            if let Some(idx) = self.index_of(id) {
                self.units[idx].exhaust();
            }
            return;
        };

        if decision.destination != enemy.position {
            if let Some(path) = extract_path(&self.grid, &set, decision.destination) {
                self.grid.vacate(enemy.position);
                self.grid.place(id, decision.destination);
                if let Some(idx) = self.index_of(id) {
                    self.units[idx].position = decision.destination;
                }
                self.events.push(BattleEvent::UnitMoved { unit: id, path });
            }
        }

        // Attack only if the target really is in range from where we ended up
        let in_range = match (self.unit(id), self.unit(decision.target)) {
            (Some(e), Some(t)) => {
                t.is_alive() && e.position.distance(&t.position) <= e.stats.attack_range
            }
            _ => false,
        };
        if in_range {
            self.resolve(id, decision.target);
        }

        if let Some(idx) = self.index_of(id) {
            self.units[idx].exhaust();
        }
    }

    fn finish_enemy_phase(&mut self) {
        for unit in &mut self.units {
            if unit.team == Team::Friendly && unit.is_alive() {
                unit.new_turn();
            }
        }

        self.turn += 1;
        self.events.push(BattleEvent::TurnChanged {
            number: self.turn,
            side: Team::Friendly,
        });
        self.phase = BattlePhase::PlayerTurn;
        self.fire_scheduled();
    }

    // ----- shared internals -----

    /// Roll and apply one attack; handles the death notification
    fn resolve(&mut self, attacker_id: UnitId, target_id: UnitId) {
        let Some(attacker) = self.unit(attacker_id).cloned() else {
            return;
        };
        let Some(target_idx) = self.index_of(target_id) else {
            return;
        };

        let delta = self
            .grid
            .elevation_difference(attacker.position, self.units[target_idx].position);
        let outcome = resolve_attack(&attacker, &mut self.units[target_idx], delta, &mut self.rng);

        self.events.push(BattleEvent::AttackResolved {
            attacker: attacker_id,
            target: target_id,
            damage: outcome.damage,
            high_ground: outcome.high_ground,
        });

        if outcome.lethal {
            self.remove_unit(target_id, Some(attacker_id));
        }
    }

    /// External damage entry point for reactive/scripted effects.
    ///
    /// Deaths here follow the same synchronous notification path as combat
    /// deaths, including mid-enemy-phase removal.
    pub fn apply_external_damage(&mut self, unit: UnitId, amount: i32, source: Option<UnitId>) {
        let Some(idx) = self.index_of(unit) else {
            return;
        };
        if !self.units[idx].is_alive() {
            return;
        }
        if self.units[idx].apply_damage(amount) {
            self.remove_unit(unit, source);
        }
    }

    /// Remove a dead unit the instant it hits zero HP, publishing the
    /// death notification before anything else proceeds
    fn remove_unit(&mut self, id: UnitId, killer: Option<UnitId>) {
        let Some(idx) = self.index_of(id) else {
            return;
        };

        self.events.push(BattleEvent::UnitDied { unit: id, killer });
        self.grid.vacate(self.units[idx].position);
        self.units.remove(idx);

        if self.selected == Some(id) {
            self.selected = None;
        }

        self.check_victory();
    }

    /// Write survivors' missing HP back to their roster records.
    ///
    /// Called by the mission layer once the battle is over; records of
    /// fallen units are left untouched.
    pub fn sync_wounds(&self, roster: &mut Roster) {
        for unit in &self.units {
            let Some(roster_id) = unit.roster_ref else {
                continue;
            };
            if let Some(record) = roster.record_mut(roster_id) {
                record.wounds = unit.stats.max_hp - unit.current_hp;
            }
        }
    }

    fn check_victory(&mut self) {
        if self.phase == BattlePhase::Victory {
            return;
        }
        if self.living(Team::Enemy) == 0 {
            tracing::info!(turn = self.turn, "battle won");
            self.phase = BattlePhase::Victory;
            self.events.push(BattleEvent::BattleWon);
        }
    }

    fn fire_scheduled(&mut self) {
        for reference in self.scheduler.fire_due(self.turn) {
            self.events.push(BattleEvent::PlayNarrative { reference });
        }
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }
}
