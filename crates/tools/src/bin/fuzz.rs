use anyhow::{Result, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use room_core::content::COMBAT_TEMPLATE_COUNT;
use room_core::{
    Dice, Direction, Doors, FrameInput, RoomBlueprint, RoomConfig, RoomSignal, RoomState, RunState,
    build_room,
};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of rooms to play, one seed each
    #[arg(short, long, default_value_t = 200)]
    rooms: u64,
    #[arg(short, long, default_value_t = 3000)]
    ticks: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn random_input(rng: &mut ChaCha8Rng) -> FrameInput {
    let direction = choose(rng, &Direction::ALL);
    match rng.next_u64() % 8 {
        0..=2 => FrameInput::attacking(direction),
        3..=5 => FrameInput::moving(direction),
        6 => FrameInput::ending_turn(),
        _ => FrameInput { cycle_enemy_view: true, ..FrameInput::default() },
    }
}

fn check_invariants(room: &RoomState) -> Result<()> {
    let live = room.live_entities();
    for id in live {
        let Some(entity) = room.entity(*id) else {
            anyhow::bail!("Invariant failed: live {id:?} missing from roster");
        };
        ensure!(!entity.dead, "Invariant failed: {id:?} is live but dead");
        ensure!(!room.grid().is_solid(entity.pos), "Invariant failed: {id:?} inside wall at {}", entity.pos);
    }
    for id in room.turn_queue() {
        ensure!(live.contains(&id), "Invariant failed: dead {id:?} still queued");
    }
    for id in room.pending_kills() {
        ensure!(live.contains(&id), "Invariant failed: pending kill {id:?} already gone");
    }

    let mut squads = BTreeMap::new();
    for (_, enemy) in room.live_enemies().filter(|(_, enemy)| !enemy.invincible) {
        if let Some(group) = enemy.group() {
            *squads.entry(group.clone()).or_insert(0_usize) += 1;
        }
    }
    for (group, size) in squads {
        ensure!(size >= 2, "Invariant failed: squad {} left with {size}", group.as_str());
    }

    let mut tiles: Vec<_> = live.iter().filter_map(|id| room.entity(*id)).map(|entity| entity.pos).collect();
    tiles.sort();
    ensure!(tiles.windows(2).all(|pair| pair[0] != pair[1]), "Invariant failed: two entities share a tile");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Fuzzing {} rooms from seed {} for max {} ticks each...", args.rooms, args.seed, args.ticks);
    let mut outcomes: BTreeMap<String, u64> = BTreeMap::new();

    for offset in 0..args.rooms {
        let seed = args.seed.wrapping_add(offset);
        let mut dice = Dice::new(seed);
        let template = (seed % COMBAT_TEMPLATE_COUNT as u64) as usize;
        let blueprint = RoomBlueprint::from_template(0, Doors::all(), template);
        let entered = choose(&mut ChaCha8Rng::seed_from_u64(seed), &Direction::ALL);
        let mut room = build_room(&blueprint, entered, RoomConfig::default(), &mut dice);
        let mut run = RunState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);

        let mut outcome = "timeout".to_string();
        for tick in 0..args.ticks {
            let signal = room.update(&random_input(&mut rng), &mut run);
            check_invariants(&room).map_err(|err| err.context(format!("seed {seed} tick {tick}")))?;
            if room.is_game_over() {
                outcome = "game over".to_string();
                break;
            }
            if signal != RoomSignal::Continue {
                outcome = format!("{signal:?}");
                break;
            }
        }
        log::debug!("seed {seed} template {template}: {outcome}");
        *outcomes.entry(outcome).or_default() += 1;
    }

    for (outcome, count) in &outcomes {
        println!("{outcome}: {count}");
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
