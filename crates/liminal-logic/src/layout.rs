//! Declarative room layouts and the compiled-in layout table.
//!
//! A [`Layout`] is an immutable template in its own frame: the room spans
//! `x ∈ [0, width]`, `z ∈ [0, depth]`, `y ∈ [0, height]`. Perimeter walls
//! are implied by the dimensions and split around [`Doorway`]s when the
//! layout is resolved into a [`crate::plan::RoomPlan`]; `walls` lists only
//! interior segments (pillars, partitions).

use crate::constants::{layout_names, DOOR_WIDTH, ROOM_HEIGHT, WALL_THICKNESS, ZONE_DEPTH};
use crate::geometry::{Direction, Point2, Rect2, Vec3};
use serde::{Deserialize, Serialize};

/// A wall as a floor-plane line with thickness. Its height is the room's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub from: Point2,
    pub to: Point2,
    pub thickness: f32,
}

impl WallSegment {
    pub fn new(from: Point2, to: Point2, thickness: f32) -> Self {
        Self {
            from,
            to,
            thickness,
        }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(&self.to)
    }

    pub fn midpoint(&self) -> Point2 {
        self.from.midpoint(&self.to)
    }

    /// Yaw that turns a box's local +X axis onto this segment.
    pub fn yaw(&self) -> f32 {
        (-(self.to.z - self.from.z)).atan2(self.to.x - self.from.x)
    }
}

/// A gap in one perimeter wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Doorway {
    pub side: Direction,
    /// Center of the opening, measured along the wall from its first
    /// endpoint (x for north/south walls, z for west/east walls).
    pub offset: f32,
    pub width: f32,
}

/// Ceiling light position on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightFixture {
    pub x: f32,
    pub z: f32,
    #[serde(default)]
    pub flicker: bool,
}

/// Trigger volume declared by two corners plus its doorway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub from: Vec3,
    pub to: Vec3,
    pub direction: Direction,
    /// Where the doorway sits, on the wall line at floor level.
    pub opening_center: Vec3,
}

/// Decorative prop loaded asynchronously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    pub path: String,
    pub position: Vec3,
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

/// Immutable room template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    #[serde(default)]
    pub doorways: Vec<Doorway>,
    #[serde(default)]
    pub walls: Vec<WallSegment>,
    #[serde(default)]
    pub lights: Vec<LightFixture>,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub models: Vec<ModelPlacement>,
}

impl Layout {
    pub fn new(name: impl Into<String>, width: f32, depth: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height: ROOM_HEIGHT,
            depth,
            doorways: Vec::new(),
            walls: Vec::new(),
            lights: Vec::new(),
            zones: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Add a standard-width doorway plus the trigger zone in front of it.
    pub fn with_door(mut self, side: Direction, offset: f32) -> Self {
        self.doorways.push(Doorway {
            side,
            offset,
            width: DOOR_WIDTH,
        });
        let zone = self.doorway_zone(side, offset, DOOR_WIDTH);
        self.zones.push(zone);
        self
    }

    pub fn with_wall(mut self, from: (f32, f32), to: (f32, f32), thickness: f32) -> Self {
        self.walls.push(WallSegment::new(
            Point2::new(from.0, from.1),
            Point2::new(to.0, to.1),
            thickness,
        ));
        self
    }

    pub fn with_light(mut self, x: f32, z: f32, flicker: bool) -> Self {
        self.lights.push(LightFixture { x, z, flicker });
        self
    }

    pub fn with_model(mut self, path: &str, x: f32, z: f32, rotation_y: f32) -> Self {
        self.models.push(ModelPlacement {
            path: path.to_string(),
            position: Vec3::new(x, 0.0, z),
            rotation_y,
            scale: 1.0,
        });
        self
    }

    pub fn footprint(&self) -> Rect2 {
        Rect2::from_corners(Point2::new(0.0, 0.0), Point2::new(self.width, self.depth))
    }

    /// Length of the wall on `side`.
    pub fn wall_length(&self, side: Direction) -> f32 {
        match side {
            Direction::North | Direction::South => self.width,
            Direction::East | Direction::West => self.depth,
        }
    }

    /// Endpoints of the perimeter wall on `side`, in offset order.
    pub fn wall_line(&self, side: Direction) -> (Point2, Point2) {
        let (w, d) = (self.width, self.depth);
        match side {
            Direction::North => (Point2::new(0.0, 0.0), Point2::new(w, 0.0)),
            Direction::South => (Point2::new(0.0, d), Point2::new(w, d)),
            Direction::West => (Point2::new(0.0, 0.0), Point2::new(0.0, d)),
            Direction::East => (Point2::new(w, 0.0), Point2::new(w, d)),
        }
    }

    /// Point on the wall line of `side` at `offset`, at floor level.
    pub fn point_on_wall(&self, side: Direction, offset: f32) -> Vec3 {
        let (a, b) = self.wall_line(side);
        let t = offset / self.wall_length(side).max(f32::EPSILON);
        Vec3::new(a.x + (b.x - a.x) * t, 0.0, a.z + (b.z - a.z) * t)
    }

    /// Trigger zone spanning a doorway and reaching [`ZONE_DEPTH`] inward.
    pub fn doorway_zone(&self, side: Direction, offset: f32, width: f32) -> ZoneSpec {
        let half = width / 2.0;
        let (w, h, d) = (self.width, self.height, self.depth);
        let (from, to) = match side {
            Direction::North => (
                Vec3::new(offset - half, 0.0, 0.0),
                Vec3::new(offset + half, h, ZONE_DEPTH),
            ),
            Direction::South => (
                Vec3::new(offset - half, 0.0, d - ZONE_DEPTH),
                Vec3::new(offset + half, h, d),
            ),
            Direction::West => (
                Vec3::new(0.0, 0.0, offset - half),
                Vec3::new(ZONE_DEPTH, h, offset + half),
            ),
            Direction::East => (
                Vec3::new(w - ZONE_DEPTH, 0.0, offset - half),
                Vec3::new(w, h, offset + half),
            ),
        };
        ZoneSpec {
            from,
            to,
            direction: side,
            opening_center: self.point_on_wall(side, offset),
        }
    }
}

/// The set of layouts a floor draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTable {
    layouts: Vec<Layout>,
    exit_layout: String,
}

impl LayoutTable {
    pub fn new(layouts: Vec<Layout>, exit_layout: impl Into<String>) -> Self {
        Self {
            layouts,
            exit_layout: exit_layout.into(),
        }
    }

    /// The compiled-in backrooms layouts.
    pub fn builtin() -> Self {
        use Direction::*;
        let main = Layout::new(layout_names::MAIN, 16.0, 16.0)
            .with_door(North, 8.0)
            .with_door(West, 12.0)
            .with_door(East, 4.0)
            .with_door(South, 8.0)
            .with_light(4.0, 4.0, false)
            .with_light(12.0, 4.0, false)
            .with_light(4.0, 12.0, true)
            .with_light(12.0, 12.0, false)
            .with_model("models/office_chair.glb", 3.0, 3.0, 0.6)
            .with_model("models/water_cooler.glb", 14.5, 14.5, 0.0);

        let secondary = Layout::new(layout_names::SECONDARY, 12.0, 8.0)
            .with_door(East, 4.0)
            .with_door(South, 6.0)
            .with_light(6.0, 4.0, false)
            .with_model("models/filing_cabinet.glb", 1.0, 1.0, 0.0);

        let corridor = Layout::new(layout_names::CORRIDOR, 4.0, 20.0)
            .with_door(North, 2.0)
            .with_door(South, 2.0)
            .with_light(2.0, 5.0, false)
            .with_light(2.0, 15.0, true);

        let pillars = Layout::new(layout_names::PILLARS, 20.0, 20.0)
            .with_door(West, 10.0)
            .with_door(East, 10.0)
            .with_door(North, 10.0)
            .with_wall((5.5, 6.0), (6.5, 6.0), 1.0)
            .with_wall((13.5, 6.0), (14.5, 6.0), 1.0)
            .with_wall((5.5, 14.0), (6.5, 14.0), 1.0)
            .with_wall((13.5, 14.0), (14.5, 14.0), 1.0)
            .with_wall((10.0, 15.0), (10.0, 20.0), WALL_THICKNESS)
            .with_light(5.0, 10.0, false)
            .with_light(15.0, 10.0, true);

        let exit = Layout::new(layout_names::EXIT, 6.0, 6.0)
            .with_door(South, 3.0)
            .with_light(3.0, 3.0, false)
            .with_model("models/exit_door.glb", 3.0, 0.3, 0.0);

        Self::new(
            vec![main, secondary, corridor, pillars, exit],
            layout_names::EXIT,
        )
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name == name)
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.name.as_str())
    }

    pub fn exit_layout_name(&self) -> &str {
        &self.exit_layout
    }

    pub fn exit_layout(&self) -> Option<&Layout> {
        self.get(&self.exit_layout)
    }
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self::builtin()
    }
}
