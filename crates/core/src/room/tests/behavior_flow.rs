use super::support::*;

#[test]
fn chaser_plans_a_route_to_the_player_and_stops_short_of_it() {
    let mut room = open_room(Tile::new(2, 2));
    let skeleton = add_enemy(&mut room, Archetype::Skeleton, "a", 2, 8);
    add_bystanders(&mut room, "a");

    room.choose_intentions(skeleton);

    let planned = room.planned_tiles(skeleton);
    assert_eq!(planned.len(), 6);
    assert_eq!(planned.last(), Some(&Tile::new(2, 2)));
    assert!(room.roster[skeleton].planned_directions().all(|d| d == Direction::South));
    assert_eq!(room.roster[skeleton].future_pos, Tile::new(2, 6), "two moves per turn");
}

#[test]
fn future_position_never_lands_on_the_player() {
    let mut room = open_room(Tile::new(2, 2));
    let vampire = add_enemy(&mut room, Archetype::Vampire, "a", 2, 4);
    add_bystanders(&mut room, "a");

    room.choose_intentions(vampire);
    assert_eq!(room.roster[vampire].future_pos, Tile::new(2, 3));
}

#[test]
fn chasers_do_not_plan_into_a_claimed_tile() {
    let mut room = open_room(Tile::new(10, 5));
    let first = add_enemy(&mut room, Archetype::Skeleton, "a", 7, 5);
    let second = add_enemy(&mut room, Archetype::Skeleton, "b", 9, 7);
    for (x, y) in [(8, 6), (10, 6), (8, 7), (10, 7)] {
        add_wall(&mut room, x, y);
    }

    room.choose_intentions(first);
    room.choose_intentions(second);

    assert_eq!(room.roster[first].future_pos, Tile::new(9, 5));
    assert_eq!(room.planned_tiles(second).first(), Some(&Tile::new(9, 6)));
    assert_eq!(room.roster[second].future_pos, Tile::new(9, 6), "(9, 5) is already claimed");
}

#[test]
fn adjacent_chaser_attacks_once_and_finishes() {
    let mut room = open_room(Tile::new(5, 5));
    let skeleton = add_enemy(&mut room, Archetype::Skeleton, "a", 5, 6);
    add_bystanders(&mut room, "a");
    let mut run = RunState::default();

    room.start_turn(skeleton, &run);
    assert!(room.act(skeleton, &FrameInput::idle(), &mut run));
    assert_eq!(run.health, 2);
    assert!(room.roster[skeleton].is_finished());
    assert!(!room.act(skeleton, &FrameInput::idle(), &mut run));
    assert_eq!(run.health, 2);

    let events = room.drain_events();
    assert!(events.contains(&RoomEvent::Cue(Cue::Hurt)));
    assert!(events.contains(&RoomEvent::PlayerDamaged { health: 2 }));
}

#[test]
fn wanderers_never_hurt_the_player() {
    for seed in 0..16 {
        let mut room = open_room(Tile::new(5, 5));
        room.dice = Dice::new(seed);
        let slime = add_enemy(&mut room, Archetype::Slime, "a", 5, 6);
        add_bystanders(&mut room, "a");
        let mut run = RunState::default();

        room.start_turn(slime, &run);
        for _ in 0..4 {
            room.act(slime, &FrameInput::idle(), &mut run);
        }
        assert_eq!(run.health, 3, "seed {seed}");
        assert!(room.roster[slime].is_finished());
    }
}

#[test]
fn blocked_chaser_finishes_without_moving() {
    let mut room = open_room(Tile::new(2, 2));
    let skeleton = add_enemy(&mut room, Archetype::Skeleton, "a", 2, 8);
    add_bystanders(&mut room, "a");
    let mut run = RunState::default();
    room.start_turn(skeleton, &run);

    let blocker = add_enemy(&mut room, Archetype::Slime, "b", 2, 7);
    assert!(!room.act(skeleton, &FrameInput::idle(), &mut run));
    assert_eq!(room.roster[skeleton].pos, Tile::new(2, 8));
    assert!(room.roster[skeleton].is_finished());
    assert!(room.is_alive(blocker));
}

#[test]
fn player_moves_are_budgeted_in_combat() {
    let mut room = open_room(Tile::new(5, 5));
    add_bystanders(&mut room, "k");
    let mut run = RunState::default();
    let player = room.player_id();
    room.start_turn(player, &run);

    let east = FrameInput::moving(Direction::East);
    assert!(room.act(player, &east, &mut run));
    assert!(room.act(player, &east, &mut run));
    assert_eq!(room.player().pos, Tile::new(7, 5));
    assert_eq!(room.player().turn.moves_left, 0);
    assert!(!room.player().is_finished(), "an attack is still available");

    assert!(!room.act(player, &east, &mut run));
    assert_eq!(room.player().pos, Tile::new(7, 5));

    assert!(!room.act(player, &FrameInput::ending_turn(), &mut run));
    assert!(room.player().is_finished());
    assert!(!room.act(player, &east, &mut run));
}

#[test]
fn player_cannot_walk_into_walls_or_enemies() {
    let mut room = open_room(Tile::new(5, 5));
    add_bystanders(&mut room, "k");
    add_wall(&mut room, 6, 5);
    add_enemy(&mut room, Archetype::Skeleton, "k", 5, 6);
    let mut run = RunState::default();
    let player = room.player_id();
    room.start_turn(player, &run);

    assert!(!room.act(player, &FrameInput::moving(Direction::East), &mut run));
    assert!(!room.act(player, &FrameInput::moving(Direction::North), &mut run));
    assert_eq!(room.player().pos, Tile::new(5, 5));
    assert_eq!(room.player().turn.moves_left, run.movements);
}

#[test]
fn shove_that_lines_up_a_squad_marks_it() {
    let mut room = open_room(Tile::new(5, 5));
    let pushed = add_enemy(&mut room, Archetype::Skeleton, "a", 6, 5);
    let upper = add_enemy(&mut room, Archetype::Skeleton, "a", 7, 6);
    let top = add_enemy(&mut room, Archetype::Skeleton, "a", 7, 7);
    let mut run = RunState::default();
    let player = room.player_id();
    room.start_turn(player, &run);

    assert!(room.act(player, &FrameInput::attacking(Direction::East), &mut run));
    assert_eq!(room.roster[pushed].pos, Tile::new(7, 5));
    assert_eq!(room.roster[pushed].future_pos, Tile::new(7, 5));
    assert_eq!(room.player().turn.attacks_left, 0);
    assert!(!room.player().is_finished(), "moves are still available");

    let marked: Vec<EntityId> = room.pending_kills().collect();
    for id in [pushed, upper, top] {
        assert!(marked.contains(&id));
    }
    assert!(room.particles().iter().any(|p| matches!(p.kind, ParticleKind::Text { .. })));
}

#[test]
fn shove_into_a_wall_still_spends_the_attack() {
    let mut room = open_room(Tile::new(5, 5));
    add_bystanders(&mut room, "k");
    let target = add_enemy(&mut room, Archetype::Skeleton, "k", 6, 5);
    add_wall(&mut room, 7, 5);
    let mut run = RunState::default();
    let player = room.player_id();
    room.start_turn(player, &run);

    assert!(room.act(player, &FrameInput::attacking(Direction::East), &mut run));
    assert_eq!(room.roster[target].pos, Tile::new(6, 5));
    assert_eq!(room.player().turn.attacks_left, 0);
    assert!(!room.act(player, &FrameInput::attacking(Direction::East), &mut run));
}

#[test]
fn swinging_at_nothing_costs_nothing() {
    let mut room = open_room(Tile::new(5, 5));
    add_bystanders(&mut room, "k");
    let mut run = RunState::default();
    let player = room.player_id();
    room.start_turn(player, &run);

    assert!(!room.act(player, &FrameInput::attacking(Direction::West), &mut run));
    assert_eq!(room.player().turn.attacks_left, run.attacks);
}

#[test]
fn exploring_movement_is_free() {
    let mut room = open_room(Tile::new(12, 10));
    let mut run = RunState::default();
    let player = room.player_id();

    for _ in 0..5 {
        assert!(room.act(player, &FrameInput::moving(Direction::East), &mut run));
    }
    assert_eq!(room.player().pos, Tile::new(17, 10));
    assert!(!room.act(player, &FrameInput::attacking(Direction::East), &mut run));
}
