use std::collections::HashMap;

use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use room_core::content::COMBAT_TEMPLATE_COUNT;
use room_core::grid::FLOOR_CODE;
use room_core::{
    Archetype, Cue, Dice, Direction, Doors, EntityId, FrameInput, Grid, Group, RoomBlueprint,
    RoomConfig, RoomEvent, RoomSignal, RoomState, RunState, Tile, build_room,
};

fn scripted_input(rng: &mut ChaCha8Rng) -> FrameInput {
    let direction = Direction::ALL[(rng.next_u64() % 4) as usize];
    match rng.next_u64() % 5 {
        0 | 1 => FrameInput::attacking(direction),
        2 => FrameInput::moving(direction),
        3 => FrameInput::ending_turn(),
        _ => FrameInput::idle(),
    }
}

fn open_room(player: Tile) -> RoomState {
    let config = RoomConfig::default();
    let grid = Grid::filled(&config.grid, FLOOR_CODE);
    RoomState::new(config, grid, player, Dice::new(1))
}

fn run_until(room: &mut RoomState, run: &mut RunState, input: FrameInput, done: impl Fn(&RoomState) -> bool) {
    for _ in 0..20_000 {
        if done(room) {
            return;
        }
        room.update(&input, run);
    }
    panic!("condition never reached");
}

fn check_invariants(room: &RoomState, queue_was_rebuilt: bool) -> Result<(), String> {
    let live = room.live_entities();
    for id in live {
        let entity = room.entity(*id).ok_or("live id missing from roster")?;
        if entity.dead {
            return Err(format!("{id:?} is live but dead"));
        }
        if room.grid().is_solid(entity.pos) {
            return Err(format!("{id:?} stands inside a wall at {}", entity.pos));
        }
    }
    for id in room.turn_queue().chain(room.pending_kills()) {
        if !live.contains(&id) {
            return Err(format!("{id:?} is queued but no longer live"));
        }
    }

    let mut squads: HashMap<&Group, usize> = HashMap::new();
    for (_, enemy) in room.live_enemies() {
        if let Some(group) = enemy.group() {
            *squads.entry(group).or_default() += 1;
        }
    }
    for (id, enemy) in room.live_enemies() {
        let size = enemy.group().map_or(0, |group| squads[group]);
        if size < 2 && !enemy.invincible {
            return Err(format!("{id:?} survives in a squad of {size}"));
        }
    }

    if queue_was_rebuilt && !room.is_game_over() {
        let queue: Vec<EntityId> = room.turn_queue().collect();
        let speed = |id: &EntityId| room.entity(*id).map_or(0, |entity| entity.current_speed());
        if queue.len() != live.len() || live.iter().any(|id| !queue.contains(id)) {
            return Err("new round queue is not a permutation of the live entities".to_string());
        }
        for pair in queue.windows(2) {
            let (a, b) = (speed(&pair[0]), speed(&pair[1]));
            let order = |id: &EntityId| live.iter().position(|live_id| live_id == id);
            if a < b || (a == b && order(&pair[0]) > order(&pair[1])) {
                return Err(format!("queue out of order: {queue:?}"));
            }
        }
    }
    Ok(())
}

#[test]
fn bot_sessions_preserve_scheduler_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let seeds = (any::<u64>(), any::<u64>(), 0_usize..COMBAT_TEMPLATE_COUNT);

    runner
        .run(&seeds, |(room_seed, input_seed, template)| {
            let blueprint = RoomBlueprint::from_template(0, Doors::all(), template);
            let mut room = build_room(
                &blueprint,
                Direction::West,
                RoomConfig::default(),
                &mut Dice::new(room_seed),
            );
            let mut run = RunState::default();
            let mut rng = ChaCha8Rng::seed_from_u64(input_seed);

            for _ in 0..1500 {
                let round = room.round();
                let signal = room.update(&scripted_input(&mut rng), &mut run);
                check_invariants(&room, room.round() != round).map_err(TestCaseError::fail)?;
                if signal != RoomSignal::Continue || room.is_game_over() {
                    break;
                }
            }
            Ok(())
        })
        .expect("scheduler invariants should hold under random play");
}

#[test]
fn shoving_a_squad_into_line_clears_the_room() {
    let mut room = open_room(Tile::new(5, 5)).with_doors(Doors::all());
    for (x, y) in [(6, 5), (7, 6), (7, 7)] {
        room.spawn_enemy(Archetype::Skeleton, Group::new("a"), Tile::new(x, y));
    }
    room.close_doors();
    let mut run = RunState::default();

    room.update(&FrameInput::idle(), &mut run);
    assert!(room.is_player_turn());
    run_until(&mut room, &mut run, FrameInput::idle(), |room| room.delay() == 0);

    room.update(&FrameInput::attacking(Direction::East), &mut run);
    assert_eq!(room.pending_kills().count(), 3);

    run_until(&mut room, &mut run, FrameInput::idle(), |room| !room.doors_locked());
    assert!(!room.in_combat());
    let events = room.drain_events();
    assert_eq!(events.iter().filter(|e| matches!(e, RoomEvent::EntityDied { .. })).count(), 3);
    assert_eq!(events.iter().filter(|e| **e == RoomEvent::Cue(Cue::Boom)).count(), 1);
    assert!(events.contains(&RoomEvent::DoorsOpened));
}

#[test]
fn a_passive_player_is_eventually_overrun() {
    let mut room = open_room(Tile::new(5, 5));
    for (x, y) in [(15, 5), (17, 5), (19, 5)] {
        room.spawn_enemy(Archetype::Skeleton, Group::new("a"), Tile::new(x, y));
    }
    let mut run = RunState::default();

    run_until(&mut room, &mut run, FrameInput::ending_turn(), RoomState::is_game_over);
    assert_eq!(run.health, 0);
    assert!(room.drain_events().contains(&RoomEvent::GameOver));
    assert!(!room.live_entities().contains(&room.player_id()));

    let restart = FrameInput { restart: true, ..FrameInput::default() };
    let mut signal = RoomSignal::Continue;
    for _ in 0..=room.config().timing.game_over_grace {
        signal = room.update(&restart, &mut run);
    }
    assert_eq!(signal, RoomSignal::ReturnToMenu);
}
