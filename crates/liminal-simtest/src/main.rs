//! Liminal Headless Walk Harness
//!
//! Validates layouts, room transitions and the light puzzle in-process.
//! No renderer, no physics engine, no asset pipeline.
//!
//! Usage:
//!   cargo run -p liminal-simtest
//!   cargo run -p liminal-simtest -- --verbose
//!   cargo run -p liminal-simtest -- --json --seed 7 --config data/tuning.json

use liminal_core::prelude::*;
use liminal_logic::color::{mix_weight, Rgb};
use liminal_logic::config::TuningConfig;
use liminal_logic::geometry::{Direction, QuarterTurns, Vec3};
use liminal_logic::layout::LayoutTable;
use liminal_logic::openings::{openings_on, split_wall};
use liminal_logic::placement::{align_to_zone, VacatedZone};
use liminal_logic::plan::rotate_layout;
use liminal_logic::puzzle::{recompute_mixes, starter_board, PuzzleBoard, PuzzleEvent, PuzzleLight};
use liminal_logic::validation::{self, Severity};
use liminal_logic::zone::{RoomId, ZoneRef};
use serde::Serialize;

// ── Default tuning (same JSON a host would ship) ────────────────────────
const TUNING_JSON: &str = include_str!("../../../data/tuning.json");

const TICK: f32 = 1.0 / 60.0;
const EPS: f32 = 1e-4;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    group: &'static str,
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    passed: usize,
    failed: usize,
    total: usize,
    results: Vec<TestResult>,
}

struct Options {
    verbose: bool,
    json: bool,
    config: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> Options {
    let mut opts = Options {
        verbose: false,
        json: false,
        config: None,
        seed: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--json" => opts.json = true,
            "--config" => opts.config = args.next(),
            "--seed" => match args.next().map(|s| s.parse::<u64>()) {
                Some(Ok(seed)) => opts.seed = Some(seed),
                _ => log::warn!("--seed expects an unsigned integer, ignoring"),
            },
            other => log::warn!("unknown argument {other}"),
        }
    }
    opts
}

fn load_tuning(opts: &Options) -> TuningConfig {
    let loaded = match &opts.config {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => TuningConfig::from_json(&text),
            Err(e) => {
                eprintln!("cannot read {path}: {e}");
                std::process::exit(2);
            }
        },
        None => TuningConfig::from_json(TUNING_JSON),
    };
    let mut tuning = match loaded {
        Ok(t) => t,
        Err(e) => {
            eprintln!("bad tuning config: {e}");
            std::process::exit(2);
        }
    };
    if opts.seed.is_some() {
        tuning.seed = opts.seed;
    }
    tuning.seed = Some(tuning.seed.unwrap_or(42));
    tuning
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = parse_args();
    let tuning = load_tuning(&opts);
    let verbose = opts.verbose && !opts.json;

    if !opts.json {
        println!("=== Liminal Walk Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Layout table validation
    results.extend(validate_layouts(verbose));

    // 2. Seam alignment for every pairing
    results.extend(validate_seams(verbose));

    // 3. Rotation and wall openings
    results.extend(validate_rotation_and_openings(verbose));

    // 4. Scripted forward walk
    results.extend(validate_forward_walk(&tuning, verbose));

    // 5. Back-out and debounce
    results.extend(validate_back_out_and_debounce(&tuning, verbose));

    // 6. Model loads racing room unloads
    results.extend(validate_model_race(&tuning, verbose));

    // 7. Color mixing
    results.extend(validate_color_mixing(&tuning, verbose));

    // 8. Light puzzle solve and exit restriction
    results.extend(validate_puzzle_and_exit(&tuning, verbose));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if opts.json {
        let report = Report {
            seed: tuning.seed.unwrap_or_default(),
            passed,
            failed,
            total,
            results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("cannot serialize report: {e}"),
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} [{}] {}: {}", icon, r.group, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

type Session = GameSession<StaticColliderSet, QueuedModelLoader>;

fn session(tuning: &TuningConfig, board: PuzzleBoard) -> Option<Session> {
    let mut s = GameSession::headless(tuning.clone(), board);
    match s.start("main") {
        Ok(_) => Some(s),
        Err(e) => {
            log::error!("cannot start floor: {e}");
            None
        }
    }
}

fn player_at(p: Vec3) -> PlayerState {
    PlayerState::new(p, Vec3::new(0.0, 0.0, -1.0))
}

/// Points on a straight walk through one doorway: open floor before it,
/// its zone, the neighbour's zone, open floor beyond.
fn seam_points(s: &Session, zone: ZoneRef) -> Option<[Vec3; 4]> {
    let z = s.floor.zone(zone)?;
    let out = z.direction.unit();
    let c = z.opening_center + Vec3::new(0.0, 1.6, 0.0);
    Some([c - out * 2.5, c - out * 0.7, c + out * 0.7, c + out * 2.5])
}

fn zone_of_current(s: &Session, dir: Direction) -> Option<ZoneRef> {
    let room = s.floor.current_room()?;
    let index = room.zones.iter().position(|z| z.direction == dir)?;
    Some(ZoneRef {
        room: room.id,
        index,
    })
}

fn free_zone_of_current(s: &Session) -> Option<ZoneRef> {
    let room = s.floor.current_room()?;
    let index = room.zones.iter().position(|z| z.connected.is_none())?;
    Some(ZoneRef {
        room: room.id,
        index,
    })
}

fn hold(s: &mut Session, p: Vec3, seconds: f32) -> Vec<FloorEvent> {
    let player = player_at(p);
    let mut events = Vec::new();
    let mut t = 0.0;
    while t < seconds {
        events.extend(s.tick(&player, TICK).floor);
        t += TICK;
    }
    events
}

fn commits(events: &[FloorEvent]) -> Vec<(RoomId, Vec<RoomId>)> {
    events
        .iter()
        .filter_map(|e| match e {
            FloorEvent::Committed { current, removed } => Some((*current, removed.clone())),
            _ => None,
        })
        .collect()
}

fn spawns(events: &[FloorEvent]) -> Vec<(RoomId, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            FloorEvent::Spawned { room, layout, .. } => Some((*room, layout.clone())),
            _ => None,
        })
        .collect()
}

fn colliders_consistent(s: &Session) -> bool {
    s.floor.physics().body_count() == s.floor.live_collider_count()
}

// ── 1. Layout Table ─────────────────────────────────────────────────────

fn validate_layouts(verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Layout Table ---");
    let mut results = Vec::new();
    let table = LayoutTable::builtin();

    for layout in table.layouts() {
        let errors = validation::validate_layout(layout);
        results.push(TestResult {
            group: "layouts",
            name: format!("layout_{}_valid", layout.name),
            passed: validation::error_count(&errors) == 0,
            detail: if errors.is_empty() {
                format!(
                    "{}×{} m, {} doorways, {} zones",
                    layout.width,
                    layout.depth,
                    layout.doorways.len(),
                    layout.zones.len()
                )
            } else {
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        });
    }

    let table_errors = validation::validate_table(&table);
    let warnings = table_errors
        .iter()
        .filter(|e| e.severity == Severity::Warning)
        .count();
    results.push(TestResult {
        group: "layouts",
        name: "table_valid".into(),
        passed: validation::error_count(&table_errors) == 0,
        detail: format!(
            "{} layouts, exit '{}', {} warnings",
            table.layouts().len(),
            table.exit_layout_name(),
            warnings
        ),
    });

    results
}

// ── 2. Seam Alignment ───────────────────────────────────────────────────

fn validate_seams(verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Seam Alignment ---");
    let table = LayoutTable::builtin();
    let mut checked = 0;
    let mut misaligned = Vec::new();
    let mut overlapping = Vec::new();

    for existing in table.layouts() {
        for k in 0..4 {
            let plan = existing.resolve().rotated(QuarterTurns::new(k));
            let footprint = plan.footprint;
            for zone in &plan.zones {
                let vacated = VacatedZone {
                    direction: zone.direction,
                    opening_center: zone.opening_center,
                };
                for candidate in table.layouts() {
                    for index in 0..candidate.zones.len() {
                        let Some(placed) = align_to_zone(candidate, index, &vacated) else {
                            continue;
                        };
                        checked += 1;
                        let label = format!(
                            "{}@{}° {} → {}#{index}",
                            existing.name,
                            k * 90,
                            zone.direction,
                            candidate.name
                        );
                        let opening_ok =
                            placed.attached_opening().approx_eq(&vacated.opening_center, EPS);
                        let facing_ok =
                            placed.plan.zones[index].direction == vacated.direction.opposite();
                        if !opening_ok || !facing_ok {
                            misaligned.push(label.clone());
                        }
                        let other = placed.plan.footprint.translated(placed.position);
                        let w = footprint.max.x.min(other.max.x) - footprint.min.x.max(other.min.x);
                        let d = footprint.max.z.min(other.max.z) - footprint.min.z.max(other.min.z);
                        if w > EPS && d > EPS {
                            overlapping.push(label);
                        }
                    }
                }
            }
        }
    }

    if verbose {
        println!("  {} pairings checked", checked);
    }

    vec![
        TestResult {
            group: "seams",
            name: "seams_openings_coincide".into(),
            passed: misaligned.is_empty() && checked > 0,
            detail: if misaligned.is_empty() {
                format!("{checked} pairings aligned")
            } else {
                format!("{} misaligned: {}", misaligned.len(), misaligned.join(", "))
            },
        },
        TestResult {
            group: "seams",
            name: "seams_rooms_disjoint".into(),
            passed: overlapping.is_empty(),
            detail: if overlapping.is_empty() {
                "no placed room overlaps the room it attaches to".into()
            } else {
                format!("{} overlapping: {}", overlapping.len(), overlapping.join(", "))
            },
        },
    ]
}

// ── 3. Rotation & Openings ──────────────────────────────────────────────

fn validate_rotation_and_openings(verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Rotation & Openings ---");
    let table = LayoutTable::builtin();
    let mut results = Vec::new();

    let mut not_restored = Vec::new();
    for layout in table.layouts() {
        let plan = layout.resolve();
        let mut turned = plan.clone();
        for _ in 0..4 {
            turned = rotate_layout(&turned, QuarterTurns::new(1));
        }
        if turned.walls != plan.walls || turned.zones != plan.zones || turned.lights != plan.lights
        {
            not_restored.push(layout.name.clone());
        }
    }
    results.push(TestResult {
        group: "rotation",
        name: "rotation_four_turns_identity".into(),
        passed: not_restored.is_empty(),
        detail: if not_restored.is_empty() {
            "every layout restored after four quarter turns".into()
        } else {
            format!("not restored: {}", not_restored.join(", "))
        },
    });

    let mut bad_partition = Vec::new();
    for layout in table.layouts() {
        for side in Direction::ALL {
            let openings = openings_on(layout, side);
            let length = layout.wall_length(side);
            let open: f32 = openings.iter().map(|(_, w)| w).sum();
            let solid: f32 = split_wall(length, &openings).iter().map(|(a, b)| b - a).sum();
            if (solid - (length - open)).abs() > EPS {
                bad_partition.push(format!("{} {side}", layout.name));
            }
        }
    }
    results.push(TestResult {
        group: "rotation",
        name: "openings_partition_walls".into(),
        passed: bad_partition.is_empty(),
        detail: if bad_partition.is_empty() {
            "solid spans sum to L − W on every wall".into()
        } else {
            format!("bad walls: {}", bad_partition.join(", "))
        },
    });

    results
}

// ── 4. Forward Walk ─────────────────────────────────────────────────────

fn validate_forward_walk(tuning: &TuningConfig, verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Forward Walk ---");
    let mut results = Vec::new();
    let Some(mut s) = session(tuning, PuzzleBoard::default()) else {
        results.push(TestResult {
            group: "walk",
            name: "walk_start".into(),
            passed: false,
            detail: "floor did not start".into(),
        });
        return results;
    };

    let mut route = vec![s.floor.current_room().map(|r| r.layout_name.clone()).unwrap_or_default()];
    let mut single_room_after_commit = true;
    let mut colliders_ok = true;
    let mut repeats = 0;
    let mut steps = 0;

    for _ in 0..12 {
        let Some(zone) = free_zone_of_current(&s) else { break };
        let Some([before, in_old, in_new, beyond]) = seam_points(&s, zone) else { break };
        hold(&mut s, before, TICK);
        let spawned = spawns(&hold(&mut s, in_old, TICK));
        hold(&mut s, in_new, TICK);
        let events = hold(&mut s, beyond, 0.5);
        let committed = commits(&events);

        let Some((new_id, layout)) = spawned.first().cloned() else { break };
        if committed.len() != 1 || committed[0].0 != new_id {
            break;
        }
        steps += 1;
        single_room_after_commit &= s.floor.rooms().len() == 1;
        colliders_ok &= colliders_consistent(&s);
        if route.last() == Some(&layout) {
            repeats += 1;
        }
        route.push(layout);
    }

    if verbose {
        println!("  route: {}", route.join(" → "));
    }

    results.push(TestResult {
        group: "walk",
        name: "walk_twelve_rooms".into(),
        passed: steps == 12,
        detail: format!("{steps} forward commits"),
    });
    results.push(TestResult {
        group: "walk",
        name: "walk_one_room_between_doorways".into(),
        passed: single_room_after_commit,
        detail: "only the current room is live after each commit".into(),
    });
    results.push(TestResult {
        group: "walk",
        name: "walk_no_stale_colliders".into(),
        passed: colliders_ok,
        detail: format!(
            "{} bodies for {} live colliders at the end",
            s.floor.physics().body_count(),
            s.floor.live_collider_count()
        ),
    });
    results.push(TestResult {
        group: "walk",
        name: "walk_never_repeats_layout".into(),
        passed: repeats == 0,
        detail: format!("{repeats} consecutive repeats"),
    });

    results
}

// ── 5. Back-out & Debounce ──────────────────────────────────────────────

fn validate_back_out_and_debounce(tuning: &TuningConfig, verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Back-out & Debounce ---");
    let mut results = Vec::new();
    let delay = tuning.floor.commit_delay_secs as f32;

    // back out of a doorway
    let backed_out = (|| {
        let mut s = session(tuning, PuzzleBoard::default())?;
        let start = s.floor.current_room()?.id;
        let zone = zone_of_current(&s, Direction::North)?;
        let [before, in_old, _, _] = seam_points(&s, zone)?;
        let spawned = spawns(&hold(&mut s, in_old, TICK));
        let events = hold(&mut s, before, delay + 0.2);
        let c = commits(&events);
        Some(
            spawned.len() == 1
                && c.len() == 1
                && c[0].0 == start
                && c[0].1 == vec![spawned[0].0]
                && s.floor.rooms().len() == 1
                && colliders_consistent(&s),
        )
    })();
    results.push(TestResult {
        group: "debounce",
        name: "back_out_unloads_speculative".into(),
        passed: backed_out == Some(true),
        detail: "entering then leaving a doorway drops the spawned room".into(),
    });

    // in, out, in within the delay: no commit
    let flicker = (|| {
        let mut s = session(tuning, PuzzleBoard::default())?;
        let zone = zone_of_current(&s, Direction::West)?;
        let [before, in_old, _, _] = seam_points(&s, zone)?;
        let mut events = hold(&mut s, in_old, TICK);
        events.extend(hold(&mut s, before, delay * 0.5));
        events.extend(hold(&mut s, in_old, delay * 3.0));
        Some((commits(&events).len(), s.floor.rooms().len()))
    })();
    results.push(TestResult {
        group: "debounce",
        name: "debounce_in_out_in".into(),
        passed: flicker == Some((0, 2)),
        detail: format!("(commits, rooms) = {:?}", flicker),
    });

    // in, out, wait: exactly one commit
    let settle = (|| {
        let mut s = session(tuning, PuzzleBoard::default())?;
        let zone = zone_of_current(&s, Direction::East)?;
        let [before, in_old, _, _] = seam_points(&s, zone)?;
        let mut events = hold(&mut s, in_old, TICK);
        events.extend(hold(&mut s, before, delay * 5.0));
        Some(commits(&events).len())
    })();
    results.push(TestResult {
        group: "debounce",
        name: "debounce_in_out_wait".into(),
        passed: settle == Some(1),
        detail: format!("{:?} commits", settle),
    });

    results
}

// ── 6. Model Load Race ──────────────────────────────────────────────────

fn validate_model_race(tuning: &TuningConfig, verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Model Load Race ---");
    let mut results = Vec::new();

    let outcome = (|| {
        let mut s = session(tuning, PuzzleBoard::default())?;
        let requests = s.floor.loader_mut().drain();
        let first = requests.first()?.ticket;
        let second = requests.get(1)?.ticket;

        // one model fails while the room is alive
        let failed = s.floor.resolve_model(second, Err(LoadError::NotFound("missing.glb".into())));

        let zone = zone_of_current(&s, Direction::South)?;
        let [before, in_old, in_new, beyond] = seam_points(&s, zone)?;
        hold(&mut s, before, TICK);
        hold(&mut s, in_old, TICK);
        hold(&mut s, in_new, TICK);
        hold(&mut s, beyond, 0.5);

        let bodies = s.floor.physics().body_count();
        let late = s.floor.resolve_model(
            first,
            Ok(LoadedModel {
                size: Vec3::new(0.6, 1.0, 0.6),
                center_offset: Vec3::new(0.0, 0.5, 0.0),
            }),
        );
        Some((failed, late, s.floor.physics().body_count() == bodies && colliders_consistent(&s)))
    })();

    results.push(TestResult {
        group: "models",
        name: "model_failure_isolated".into(),
        passed: matches!(outcome, Some((ModelOutcome::Failed, _, _))),
        detail: format!("{:?}", outcome.map(|o| o.0)),
    });
    results.push(TestResult {
        group: "models",
        name: "model_after_unload_no_op".into(),
        passed: matches!(outcome, Some((_, ModelOutcome::RoomGone, true))),
        detail: format!("{:?}", outcome.map(|o| (o.1, o.2))),
    });

    results
}

// ── 7. Color Mixing ─────────────────────────────────────────────────────

fn validate_color_mixing(tuning: &TuningConfig, verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Color Mixing ---");
    let p = &tuning.puzzle;
    let mut results = Vec::new();

    let south = Vec3::new(0.0, 0.0, 1.0);
    let mut lights = vec![
        PuzzleLight::new(1, Vec3::new(0.0, 1.0, 0.0), south, Rgb::RED),
        PuzzleLight::new(2, Vec3::new(0.4, 1.0, 0.0), south, Rgb::GREEN),
        PuzzleLight::new(3, Vec3::new(5.0, 1.0, 0.0), south, Rgb::BLUE),
    ];
    recompute_mixes(&mut lights, p);

    let w12 = lights[0].mix_weight_from(Rgb::GREEN);
    let w21 = lights[1].mix_weight_from(Rgb::RED);
    results.push(TestResult {
        group: "color",
        name: "mix_symmetric".into(),
        passed: w12.is_some() && w12 == w21,
        detail: format!("red←green {:?}, green←red {:?}", w12, w21),
    });

    let expected = mix_weight(0.4, p.overlap_threshold, p.max_mix_weight);
    results.push(TestResult {
        group: "color",
        name: "mix_weight_falloff".into(),
        passed: w12.zip(expected).is_some_and(|(a, b)| (a - b).abs() < 1e-5)
            && w12.is_some_and(|w| w <= p.max_mix_weight),
        detail: format!("{:?} at 0.4 m", w12),
    });

    results.push(TestResult {
        group: "color",
        name: "mix_far_light_untouched".into(),
        passed: lights[2].mixed.is_empty() && lights[2].display_color() == Rgb::BLUE,
        detail: "lights beyond the threshold keep their primary".into(),
    });

    let shown = lights[0].display_color();
    results.push(TestResult {
        group: "color",
        name: "mix_display_clamped".into(),
        passed: [shown.r, shown.g, shown.b].iter().all(|c| (0.0..=1.0).contains(c)),
        detail: format!("red shows ({:.2}, {:.2}, {:.2})", shown.r, shown.g, shown.b),
    });

    results
}

// ── 8. Puzzle & Exit ────────────────────────────────────────────────────

fn validate_puzzle_and_exit(tuning: &TuningConfig, verbose: bool) -> Vec<TestResult> {
    section_header(verbose, "--- Light Puzzle & Exit ---");
    let mut results = Vec::new();
    let board = starter_board(Vec3::ZERO, &tuning.puzzle);
    let Some(mut s) = session(tuning, board) else {
        results.push(TestResult {
            group: "puzzle",
            name: "puzzle_start".into(),
            passed: false,
            detail: "floor did not start".into(),
        });
        return results;
    };

    let mut events: Vec<PuzzleEvent> = Vec::new();
    let mut step = |s: &mut Session, eye: Vec3, look: Vec3, interact: bool| {
        let player = PlayerState::new(eye, look);
        events.extend(s.tick(&player, TICK).puzzle);
        if interact {
            events.extend(s.interact(&player));
        }
        events.extend(s.tick(&player, TICK).puzzle);
    };
    let (north, east, west) = (
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
    );

    // red next to the yellow sensor
    step(&mut s, Vec3::new(5.0, 1.0, 8.0), north, true);
    step(&mut s, Vec3::new(5.5, 1.0, 12.0), east, true);
    let red_alone_unsolved = !s.puzzle.sensor(1).is_some_and(|x| x.is_solved);

    // green on the other side: red + green reads as yellow
    step(&mut s, Vec3::new(8.0, 1.0, 8.0), north, true);
    step(&mut s, Vec3::new(10.5, 1.0, 12.0), west, false);
    let yellow_solved = s.puzzle.sensor(1).is_some_and(|x| x.is_solved);
    step(&mut s, Vec3::new(10.5, 1.0, 12.0), west, true);

    // blue held beside the directional sensor, pointing away, then at it
    step(&mut s, Vec3::new(11.0, 1.0, 8.0), north, true);
    step(&mut s, Vec3::new(14.0, 1.0, 11.5), west, false);
    let pointing_away_unsolved = !s.puzzle.sensor(2).is_some_and(|x| x.is_solved);
    let toward = (Vec3::new(13.0, 1.0, 13.0) - Vec3::new(11.0, 1.0, 10.0)).normalize();
    step(&mut s, Vec3::new(11.0, 1.0, 10.0), toward, false);
    let blue_solved = s.puzzle.sensor(2).is_some_and(|x| x.is_solved);

    results.push(TestResult {
        group: "puzzle",
        name: "sensor_single_light_insufficient".into(),
        passed: red_alone_unsolved,
        detail: "red alone does not read as yellow".into(),
    });
    results.push(TestResult {
        group: "puzzle",
        name: "sensor_combined_solve".into(),
        passed: yellow_solved,
        detail: "red and green together solve the yellow sensor".into(),
    });
    results.push(TestResult {
        group: "puzzle",
        name: "sensor_directional_gate".into(),
        passed: pointing_away_unsolved && blue_solved,
        detail: format!(
            "pointing away unsolved={}, pointing at solved={}",
            pointing_away_unsolved, blue_solved
        ),
    });

    let all_solved_count = events.iter().filter(|e| **e == PuzzleEvent::AllSolved).count();
    results.push(TestResult {
        group: "puzzle",
        name: "puzzle_all_solved_once".into(),
        passed: all_solved_count == 1 && s.floor.puzzle_completed(),
        detail: format!("{all_solved_count} AllSolved events"),
    });

    // solved sensors stay solved whatever the lights do
    for light in &mut s.puzzle.lights {
        light.position = Vec3::new(-50.0, 1.0, -50.0);
    }
    hold(&mut s, Vec3::new(8.0, 1.6, 8.0), 0.1);
    results.push(TestResult {
        group: "puzzle",
        name: "sensor_solved_is_terminal".into(),
        passed: s.puzzle.all_solved(),
        detail: "moving every light away keeps both sensors solved".into(),
    });

    // every doorway now leads to the exit
    let mut exit_only = true;
    let mut spawned_layouts = Vec::new();
    for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
        let Some(zone) = zone_of_current(&s, dir) else {
            exit_only = false;
            continue;
        };
        let Some([before, in_old, _, _]) = seam_points(&s, zone) else {
            exit_only = false;
            continue;
        };
        let spawned = spawns(&hold(&mut s, in_old, TICK));
        hold(&mut s, before, 0.5);
        match spawned.first() {
            Some((_, layout)) => {
                exit_only &= layout == s.floor.layouts().exit_layout_name();
                spawned_layouts.push(layout.clone());
            }
            None => exit_only = false,
        }
    }
    results.push(TestResult {
        group: "puzzle",
        name: "exit_restriction".into(),
        passed: exit_only,
        detail: format!("spawned: {}", spawned_layouts.join(", ")),
    });

    results
}

fn section_header(verbose: bool, header: &str) {
    if verbose {
        println!("{header}");
    }
}
