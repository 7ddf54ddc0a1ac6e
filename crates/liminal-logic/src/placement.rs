//! Room selection and doorway alignment.
//!
//! Algorithm:
//! 1. Candidates are every layout except the one being left, or only the
//!    exit layout once the puzzle is complete.
//!    Layouts without zones cannot attach and are dropped.
//! 2. Pick a candidate and one of its zones uniformly at random.
//! 3. Rotate the candidate so that zone faces opposite the vacated zone.
//! 4. Translate so both opening centers coincide (Y stays 0).

use crate::geometry::{Direction, QuarterTurns, Vec3};
use crate::layout::{Layout, LayoutTable};
use crate::plan::RoomPlan;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The doorway a new room must attach to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VacatedZone {
    pub direction: Direction,
    pub opening_center: Vec3,
}

/// A fully placed candidate room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlacement {
    pub layout_name: String,
    pub turns: QuarterTurns,
    /// World origin of the rotated plan.
    pub position: Vec3,
    /// Index of the zone that sits on the vacated doorway.
    pub attach_zone: usize,
    pub plan: RoomPlan,
}

impl RoomPlacement {
    pub fn rotation_y(&self) -> f32 {
        self.turns.radians()
    }

    /// World-space opening center of the attached zone.
    pub fn attached_opening(&self) -> Vec3 {
        self.plan.zones[self.attach_zone].opening_center + self.position
    }
}

/// Layouts eligible to follow `current`.
pub fn candidate_layouts<'a>(
    table: &'a LayoutTable,
    current: &str,
    puzzle_completed: bool,
) -> Vec<&'a Layout> {
    let exit = table.exit_layout_name();
    table
        .layouts()
        .iter()
        .filter(|l| {
            if puzzle_completed {
                l.name == exit
            } else {
                l.name != current
            }
        })
        .filter(|l| !l.zones.is_empty())
        .collect()
}

/// Rotate and translate `layout` so its zone `zone_index` meets `vacated`.
pub fn align_to_zone(
    layout: &Layout,
    zone_index: usize,
    vacated: &VacatedZone,
) -> Option<RoomPlacement> {
    let zone = layout.zones.get(zone_index)?;
    let desired = vacated.direction.opposite();
    let turns = QuarterTurns::between(zone.direction, desired);
    let plan = layout.resolve().rotated(turns);
    let rotated_center = plan.zones[zone_index].opening_center;
    let position = (vacated.opening_center - rotated_center).with_y(0.0);
    Some(RoomPlacement {
        layout_name: layout.name.clone(),
        turns,
        position,
        attach_zone: zone_index,
        plan,
    })
}

/// Pick and place the next room. `None` when nothing can attach.
pub fn select_next_room<R: Rng>(
    table: &LayoutTable,
    current: &str,
    vacated: &VacatedZone,
    puzzle_completed: bool,
    rng: &mut R,
) -> Option<RoomPlacement> {
    let candidates = candidate_layouts(table, current, puzzle_completed);
    let layout = candidates.choose(rng)?;
    let zone_index = rng.gen_range(0..layout.zones.len());
    align_to_zone(layout, zone_index, vacated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::layout_names;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zone_index(layout: &Layout, dir: Direction) -> usize {
        layout.zones.iter().position(|z| z.direction == dir).unwrap()
    }

    #[test]
    fn west_vacated_east_candidate_needs_no_turn() {
        let table = LayoutTable::builtin();
        let secondary = table.get(layout_names::SECONDARY).unwrap();
        let vacated = VacatedZone {
            direction: Direction::West,
            opening_center: Vec3::new(15.0, 0.0, 13.0),
        };
        let p = align_to_zone(secondary, zone_index(secondary, Direction::East), &vacated).unwrap();
        assert_eq!(p.turns, QuarterTurns::ZERO);
        assert_eq!(p.rotation_y(), 0.0);
        assert_eq!(p.position, Vec3::new(3.0, 0.0, 9.0));
        assert!(p.attached_opening().approx_eq(&vacated.opening_center, 1e-5));
    }

    #[test]
    fn west_vacated_west_candidate_turns_half() {
        // A candidate door facing the same way must be turned 180°.
        let layout = Layout::new("probe", 12.0, 8.0).with_door(Direction::West, 4.0);
        let vacated = VacatedZone {
            direction: Direction::West,
            opening_center: Vec3::new(15.0, 0.0, 13.0),
        };
        let p = align_to_zone(&layout, 0, &vacated).unwrap();
        assert!((p.rotation_y() - std::f32::consts::PI).abs() < 1e-6);
        // local opening (0,0,4) turns to (0,0,-4)
        assert!(p.position.approx_eq(&Vec3::new(15.0, 0.0, 17.0), 1e-5));
        assert_eq!(p.plan.zones[0].direction, Direction::East);
    }

    #[test]
    fn placed_room_lies_beyond_the_doorway() {
        let table = LayoutTable::builtin();
        let vacated = VacatedZone {
            direction: Direction::North,
            opening_center: Vec3::new(8.0, 0.0, 0.0),
        };
        for layout in table.layouts() {
            for i in 0..layout.zones.len() {
                let p = align_to_zone(layout, i, &vacated).unwrap();
                let fp = p.plan.footprint.translated(p.position);
                // the new room must sit north of the seam (z <= 0)
                assert!(fp.max.z <= 1e-4, "{} zone {i}: {fp:?}", layout.name);
            }
        }
    }

    #[test]
    fn candidates_exclude_only_the_current_layout() {
        let table = LayoutTable::builtin();
        let names: Vec<_> = candidate_layouts(&table, layout_names::MAIN, false)
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert!(!names.contains(&layout_names::MAIN));
        assert!(names.contains(&layout_names::EXIT));
        assert_eq!(names.len(), 4);

        let from_exit: Vec<_> = candidate_layouts(&table, layout_names::EXIT, false)
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert!(!from_exit.contains(&layout_names::EXIT));
        assert_eq!(from_exit.len(), 4);
    }

    #[test]
    fn puzzle_completion_restricts_to_exit() {
        let table = LayoutTable::builtin();
        let mut rng = StdRng::seed_from_u64(9);
        let vacated = VacatedZone {
            direction: Direction::East,
            opening_center: Vec3::new(16.0, 0.0, 4.0),
        };
        for _ in 0..20 {
            let p = select_next_room(&table, layout_names::MAIN, &vacated, true, &mut rng).unwrap();
            assert_eq!(p.layout_name, layout_names::EXIT);
        }
    }

    #[test]
    fn zoneless_candidates_yield_none() {
        let table = LayoutTable::new(
            vec![Layout::new("a", 4.0, 4.0), Layout::new("b", 4.0, 4.0)],
            "b",
        );
        let mut rng = StdRng::seed_from_u64(1);
        let vacated = VacatedZone {
            direction: Direction::South,
            opening_center: Vec3::ZERO,
        };
        assert!(select_next_room(&table, "a", &vacated, false, &mut rng).is_none());
        assert!(select_next_room(&table, "a", &vacated, true, &mut rng).is_none());
    }

    #[test]
    fn selection_is_deterministic_per_seed() {
        let table = LayoutTable::builtin();
        let vacated = VacatedZone {
            direction: Direction::West,
            opening_center: Vec3::new(0.0, 0.0, 12.0),
        };
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| select_next_room(&table, "main", &vacated, false, &mut rng).unwrap())
                .map(|p| (p.layout_name, p.attach_zone))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
