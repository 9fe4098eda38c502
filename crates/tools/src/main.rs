use anyhow::{Context, Result};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use room_core::content::COMBAT_TEMPLATE_COUNT;
use room_core::{
    Dice, Direction, Doors, FrameInput, RoomBlueprint, RoomConfig, RoomEvent, RoomSignal,
    RoomState, RunState, build_room,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for room construction and the bot's choices
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Maximum number of ticks to simulate
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
    /// TOML file overriding the default room configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// TOML room blueprint; a built-in combat template is used otherwise
    #[arg(short, long)]
    blueprint: Option<PathBuf>,
    /// Built-in combat template index, ignored when a blueprint is given
    #[arg(long)]
    template: Option<usize>,
    /// Direction the player travelled to reach the room
    #[arg(long, value_parser = parse_direction, default_value = "north")]
    entered: Direction,
}

#[derive(Serialize, Default)]
struct Summary {
    seed: u64,
    ticks: u32,
    rounds: u32,
    outcome: String,
    kills: usize,
    matches: usize,
    hearts_lost: usize,
    enemies_left: usize,
    health: i32,
    snapshot_hash: String,
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    match value.to_ascii_lowercase().as_str() {
        "north" | "n" => Ok(Direction::North),
        "south" | "s" => Ok(Direction::South),
        "east" | "e" => Ok(Direction::East),
        "west" | "w" => Ok(Direction::West),
        other => Err(format!("unknown direction `{other}`")),
    }
}

/// Shoves an adjacent enemy when one is in reach, otherwise wanders.
fn bot_input(room: &RoomState, rng: &mut ChaCha8Rng) -> FrameInput {
    let player = room.player().pos;
    if room.in_combat() {
        let target = Direction::ALL
            .into_iter()
            .find(|direction| room.entity_at(player.step(*direction), false, &[room.player_id()]).is_some());
        if let Some(direction) = target {
            return FrameInput::attacking(direction);
        }
        if rng.next_u64() % 4 == 0 {
            return FrameInput::ending_turn();
        }
    }
    FrameInput::moving(Direction::ALL[(rng.next_u64() % 4) as usize])
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RoomConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RoomConfig::default(),
    };
    let mut dice = Dice::new(args.seed);
    let blueprint = match (&args.blueprint, args.template) {
        (Some(path), _) => RoomBlueprint::load(path)
            .with_context(|| format!("Failed to load blueprint: {}", path.display()))?,
        (None, Some(index)) if index < COMBAT_TEMPLATE_COUNT => {
            RoomBlueprint::from_template(0, Doors::all(), index)
        }
        (None, Some(index)) => anyhow::bail!(
            "template {index} out of range, {COMBAT_TEMPLATE_COUNT} templates available"
        ),
        (None, None) => RoomBlueprint::combat(0, Doors::all(), &mut dice),
    };

    log::info!("simulating seed {} for up to {} ticks", args.seed, args.ticks);
    let mut room = build_room(&blueprint, args.entered, config, &mut dice);
    let mut run = RunState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut summary = Summary { seed: args.seed, outcome: "timeout".to_string(), ..Summary::default() };

    while summary.ticks < args.ticks {
        let input = bot_input(&room, &mut rng);
        let signal = room.update(&input, &mut run);
        summary.ticks += 1;

        for event in room.drain_events() {
            match event {
                RoomEvent::EntityDied { .. } => summary.kills += 1,
                RoomEvent::MatchFound { .. } => summary.matches += 1,
                RoomEvent::PlayerDamaged { .. } => summary.hearts_lost += 1,
                _ => {}
            }
        }

        if room.is_game_over() {
            summary.outcome = "game over".to_string();
            break;
        }
        if signal != RoomSignal::Continue {
            summary.outcome = format!("{signal:?}");
            break;
        }
    }

    summary.rounds = room.round();
    summary.enemies_left = room.live_enemies().count();
    summary.health = run.health;
    summary.snapshot_hash = format!("{:016x}", room.snapshot_hash());

    let report = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    println!("{report}");
    Ok(())
}
