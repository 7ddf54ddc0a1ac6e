//! Game session - main entry point tying the floor and the puzzle together

use liminal_logic::config::TuningConfig;
use liminal_logic::geometry::Vec3;
use liminal_logic::layout::LayoutTable;
use liminal_logic::puzzle::{PlayerId, PlayerView, PuzzleBoard, PuzzleEvent};
use liminal_logic::zone::RoomId;
use serde::{Deserialize, Serialize};

use crate::assets::{ModelLoader, QueuedModelLoader};
use crate::floor::{FloorEngine, FloorError, FloorEvent};
use crate::physics::{PhysicsWorld, StaticColliderSet};

/// Player input sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    /// Camera (eye) position; zones are tested against it.
    pub position: Vec3,
    pub look: Vec3,
}

impl PlayerState {
    pub fn new(position: Vec3, look: Vec3) -> Self {
        Self {
            id: PlayerId(1),
            position,
            look: look.normalize(),
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            eye: self.position,
            look: self.look,
        }
    }
}

/// Everything that happened in one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub floor: Vec<FloorEvent>,
    pub puzzle: Vec<PuzzleEvent>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.floor.is_empty() && self.puzzle.is_empty()
    }
}

/// One play session. Owns all mutable game state; nothing is global.
pub struct GameSession<P, L> {
    pub floor: FloorEngine<P, L>,
    pub puzzle: PuzzleBoard,
    pub tuning: TuningConfig,
}

impl<P: PhysicsWorld, L: ModelLoader> GameSession<P, L> {
    pub fn new(
        tuning: TuningConfig,
        layouts: LayoutTable,
        physics: P,
        loader: L,
        puzzle: PuzzleBoard,
    ) -> Self {
        let mut floor = FloorEngine::new(layouts, tuning.floor.clone(), physics, loader);
        if let Some(seed) = tuning.seed {
            floor = floor.with_seed(seed);
        }
        Self {
            floor,
            puzzle,
            tuning,
        }
    }

    pub fn start(&mut self, layout_name: &str) -> Result<RoomId, FloorError> {
        self.floor.start(layout_name, Vec3::ZERO)
    }

    /// Floor first, then the puzzle. Solving every sensor restricts the
    /// next spawns to the exit layout.
    pub fn tick(&mut self, player: &PlayerState, delta_seconds: f32) -> TickReport {
        let floor = self.floor.update(player.position, delta_seconds);
        let puzzle = self.puzzle.update(Some(&player.view()), &self.tuning.puzzle);
        if puzzle.contains(&PuzzleEvent::AllSolved) {
            self.floor.set_puzzle_completed(true);
        }
        TickReport { floor, puzzle }
    }

    /// Drop the held light, or pick one up if nothing is held.
    pub fn interact(&mut self, player: &PlayerState) -> Option<PuzzleEvent> {
        if self.puzzle.held_by(player.id).is_some() {
            self.puzzle.drop_held(player.id)
        } else {
            self.puzzle.pick_up(&player.view(), &self.tuning.puzzle)
        }
    }
}

impl GameSession<StaticColliderSet, QueuedModelLoader> {
    /// Session backed by the in-memory collaborators.
    pub fn headless(tuning: TuningConfig, puzzle: PuzzleBoard) -> Self {
        Self::new(
            tuning,
            LayoutTable::builtin(),
            StaticColliderSet::new(),
            QueuedModelLoader::new(),
            puzzle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liminal_logic::puzzle::starter_board;

    fn session() -> GameSession<StaticColliderSet, QueuedModelLoader> {
        let tuning = TuningConfig {
            seed: Some(3),
            ..TuningConfig::default()
        };
        let board = starter_board(Vec3::ZERO, &tuning.puzzle);
        let mut s = GameSession::headless(tuning, board);
        s.start("main").unwrap();
        s
    }

    #[test]
    fn interact_toggles_pickup() {
        let mut s = session();
        // red light sits at (5, 1, 6)
        let player = PlayerState::new(Vec3::new(5.0, 1.0, 8.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(matches!(
            s.interact(&player),
            Some(PuzzleEvent::PickedUp { light: 1, .. })
        ));
        assert!(matches!(
            s.interact(&player),
            Some(PuzzleEvent::Dropped { light: 1, .. })
        ));
    }

    #[test]
    fn solving_everything_completes_the_floor_puzzle() {
        let mut s = session();
        for sensor in &mut s.puzzle.sensors {
            sensor.is_solved = true;
        }
        let player = PlayerState::new(Vec3::new(8.0, 1.6, 8.0), Vec3::new(0.0, 0.0, 1.0));
        let report = s.tick(&player, 0.016);
        assert_eq!(report.puzzle, vec![PuzzleEvent::AllSolved]);
        assert!(s.floor.puzzle_completed());
    }
}
