//! Pickup lights, proximity color mixing and color sensors.
//!
//! Mixing is rebuilt from scratch every update: each light's mix list is
//! cleared, then every pair of active lights closer than the overlap
//! threshold contributes the other's *primary* color with a linear-falloff
//! weight. A light never mixes the same color twice; the nearest source of
//! that color sets the weight.
//!
//! A sensor is solved by either
//! - one in-range light whose displayed color is within the sensor's
//!   tolerance (and, for directional sensors, that points at it), or
//! - all in-range, correctly pointed lights together: their per-channel
//!   maximum, boosted by `1 + boost · n`, is within the combined tolerance.
//!
//! Solved is terminal until an explicit debug reset.

use crate::color::{blend, mix_weight, Rgb};
use crate::config::PuzzleTuning;
use crate::geometry::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// What the puzzle needs to know about a player each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub eye: Vec3,
    pub look: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleLight {
    pub id: u32,
    pub position: Vec3,
    /// Unit vector the light shines along.
    pub forward: Vec3,
    pub primary: Rgb,
    pub mixed: Vec<(Rgb, f32)>,
    pub held_by: Option<PlayerId>,
    pub active: bool,
}

impl PuzzleLight {
    pub fn new(id: u32, position: Vec3, forward: Vec3, primary: Rgb) -> Self {
        Self {
            id,
            position,
            forward: forward.normalize(),
            primary,
            mixed: Vec::new(),
            held_by: None,
            active: true,
        }
    }

    /// Current displayed color.
    pub fn display_color(&self) -> Rgb {
        blend(self.primary, &self.mixed)
    }

    fn add_mix(&mut self, color: Rgb, weight: f32) {
        match self.mixed.iter_mut().find(|(c, _)| *c == color) {
            Some((_, w)) => *w = w.max(weight),
            None => self.mixed.push((color, weight)),
        }
    }

    /// Weight this light currently receives from `color`, if any.
    pub fn mix_weight_from(&self, color: Rgb) -> Option<f32> {
        self.mixed.iter().find(|(c, _)| *c == color).map(|(_, w)| *w)
    }
}

/// Rebuild every light's mix list from current positions.
pub fn recompute_mixes(lights: &mut [PuzzleLight], tuning: &PuzzleTuning) {
    for light in lights.iter_mut() {
        light.mixed.clear();
    }
    for i in 0..lights.len() {
        for j in (i + 1)..lights.len() {
            if !lights[i].active || !lights[j].active {
                continue;
            }
            let distance = lights[i].position.distance(&lights[j].position);
            let Some(weight) =
                mix_weight(distance, tuning.overlap_threshold, tuning.max_mix_weight)
            else {
                continue;
            };
            let (ci, cj) = (lights[i].primary, lights[j].primary);
            lights[i].add_mix(cj, weight);
            lights[j].add_mix(ci, weight);
        }
    }
}

/// Per-channel max of the lights' displayed colors, boosted by count.
pub fn combined_color(lights: &[&PuzzleLight], boost_per_light: f32) -> Rgb {
    let max = lights
        .iter()
        .fold(Rgb::BLACK, |acc, l| acc.max_channels(l.display_color()));
    max.scale(1.0 + boost_per_light * lights.len() as f32).clamped()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSensor {
    pub id: u32,
    pub position: Vec3,
    pub target: Rgb,
    pub detection_radius: f32,
    /// Accepted RGB distance for the single-light check.
    pub tolerance: f32,
    pub requires_directional: bool,
    pub is_solved: bool,
}

impl ColorSensor {
    pub fn new(
        id: u32,
        position: Vec3,
        target: Rgb,
        detection_radius: f32,
        tolerance: f32,
    ) -> Self {
        Self {
            id,
            position,
            target,
            detection_radius,
            tolerance,
            requires_directional: false,
            is_solved: false,
        }
    }

    pub fn directional(mut self) -> Self {
        self.requires_directional = true;
        self
    }

    fn in_range(&self, light: &PuzzleLight) -> bool {
        light.active && light.position.distance(&self.position) <= self.detection_radius
    }

    /// Whether `light` faces this sensor closely enough.
    pub fn is_pointed_at_by(&self, light: &PuzzleLight, cone_cos: f32) -> bool {
        let to_sensor = (self.position - light.position).normalize();
        light.forward.normalize().dot(&to_sensor) >= cone_cos
    }

    fn passes_direction(&self, light: &PuzzleLight, cone_cos: f32) -> bool {
        !self.requires_directional || self.is_pointed_at_by(light, cone_cos)
    }

    /// Evaluate the sensor. Returns true only on the call that solves it.
    pub fn check(&mut self, lights: &[PuzzleLight], tuning: &PuzzleTuning) -> bool {
        if self.is_solved {
            return false;
        }

        let eligible: Vec<&PuzzleLight> = lights
            .iter()
            .filter(|l| self.in_range(l) && self.passes_direction(l, tuning.direction_cone_cos))
            .collect();

        let single = eligible
            .iter()
            .any(|l| l.display_color().distance(&self.target) <= self.tolerance);

        let combined = !eligible.is_empty()
            && combined_color(&eligible, tuning.combined_boost_per_light).distance(&self.target)
                <= tuning.combined_tolerance;

        if single || combined {
            self.is_solved = true;
        }
        self.is_solved
    }

    /// Debug tooling only.
    pub fn debug_reset(&mut self) {
        self.is_solved = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    PickedUp { light: u32, player: PlayerId },
    Dropped { light: u32, player: PlayerId },
    SensorSolved { sensor: u32 },
    AllSolved,
}

/// Nearest free light within reach inside the look cone.
pub fn find_pickup_target(
    lights: &[PuzzleLight],
    view: &PlayerView,
    tuning: &PuzzleTuning,
) -> Option<usize> {
    let look = view.look.normalize();
    lights
        .iter()
        .enumerate()
        .filter(|(_, l)| l.active && l.held_by.is_none())
        .filter_map(|(i, l)| {
            let offset = l.position - view.eye;
            let distance = offset.length();
            if distance > tuning.pickup_reach {
                return None;
            }
            let facing = distance <= f32::EPSILON
                || offset.normalize().dot(&look) >= tuning.pickup_cone_cos;
            facing.then_some((i, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Lights and sensors of one puzzle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PuzzleBoard {
    pub lights: Vec<PuzzleLight>,
    pub sensors: Vec<ColorSensor>,
    all_solved_reported: bool,
}

impl PuzzleBoard {
    pub fn new(lights: Vec<PuzzleLight>, sensors: Vec<ColorSensor>) -> Self {
        Self {
            lights,
            sensors,
            all_solved_reported: false,
        }
    }

    pub fn light(&self, id: u32) -> Option<&PuzzleLight> {
        self.lights.iter().find(|l| l.id == id)
    }

    pub fn light_mut(&mut self, id: u32) -> Option<&mut PuzzleLight> {
        self.lights.iter_mut().find(|l| l.id == id)
    }

    pub fn sensor(&self, id: u32) -> Option<&ColorSensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn held_by(&self, player: PlayerId) -> Option<&PuzzleLight> {
        self.lights.iter().find(|l| l.held_by == Some(player))
    }

    /// Pick up the light the player is looking at. A player holds at most
    /// one light.
    pub fn pick_up(&mut self, view: &PlayerView, tuning: &PuzzleTuning) -> Option<PuzzleEvent> {
        if self.held_by(view.id).is_some() {
            return None;
        }
        let index = find_pickup_target(&self.lights, view, tuning)?;
        let light = &mut self.lights[index];
        light.held_by = Some(view.id);
        log::debug!("light {} picked up by player {}", light.id, view.id.0);
        Some(PuzzleEvent::PickedUp {
            light: light.id,
            player: view.id,
        })
    }

    /// Release whatever the player holds where it currently floats.
    pub fn drop_held(&mut self, player: PlayerId) -> Option<PuzzleEvent> {
        let light = self.lights.iter_mut().find(|l| l.held_by == Some(player))?;
        light.held_by = None;
        Some(PuzzleEvent::Dropped {
            light: light.id,
            player,
        })
    }

    /// Move held lights with their player, rebuild mixes, check sensors.
    pub fn update(&mut self, view: Option<&PlayerView>, tuning: &PuzzleTuning) -> Vec<PuzzleEvent> {
        if let Some(view) = view {
            let look = view.look.normalize();
            for light in self.lights.iter_mut().filter(|l| l.held_by == Some(view.id)) {
                light.position = view.eye + look * tuning.hold_distance;
                light.forward = look;
            }
        }

        recompute_mixes(&mut self.lights, tuning);

        let mut events = Vec::new();
        for sensor in self.sensors.iter_mut() {
            if sensor.is_solved {
                continue;
            }
            if sensor.check(&self.lights, tuning) {
                log::info!("sensor {} solved", sensor.id);
                events.push(PuzzleEvent::SensorSolved { sensor: sensor.id });
            }
        }

        if !self.all_solved_reported && self.all_solved() {
            self.all_solved_reported = true;
            events.push(PuzzleEvent::AllSolved);
        }
        events
    }

    pub fn all_solved(&self) -> bool {
        !self.sensors.is_empty() && self.sensors.iter().all(|s| s.is_solved)
    }

    /// Debug tooling: unsolve one sensor.
    pub fn debug_reset_sensor(&mut self, id: u32) -> bool {
        match self.sensors.iter_mut().find(|s| s.id == id) {
            Some(sensor) => {
                sensor.debug_reset();
                self.all_solved_reported = false;
                true
            }
            None => false,
        }
    }
}

/// The light puzzle placed in the starting room: three primary lights,
/// a yellow sensor that needs red and green together, and a directional
/// blue sensor.
pub fn starter_board(origin: Vec3, tuning: &PuzzleTuning) -> PuzzleBoard {
    let at = |x: f32, z: f32| origin + Vec3::new(x, 1.0, z);
    let south = Vec3::new(0.0, 0.0, 1.0);
    PuzzleBoard::new(
        vec![
            PuzzleLight::new(1, at(5.0, 6.0), south, Rgb::RED),
            PuzzleLight::new(2, at(8.0, 6.0), south, Rgb::GREEN),
            PuzzleLight::new(3, at(11.0, 6.0), south, Rgb::BLUE),
        ],
        vec![
            ColorSensor::new(1, at(8.0, 12.0), Rgb::YELLOW, 2.0, tuning.combined_tolerance),
            ColorSensor::new(2, at(13.0, 13.0), Rgb::BLUE, 2.5, tuning.individual_tolerance)
                .directional(),
        ],
    )
}
