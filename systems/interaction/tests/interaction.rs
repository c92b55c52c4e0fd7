use std::time::Duration;

use cabin_chase_core::{
    layout::ENEMY_HEAD_HEIGHT, terrain_elevation, Command, EnemyState, EntityCategory, Event,
    PickupKind, SessionConfig,
};
use cabin_chase_system_interaction::Interaction;
use cabin_chase_system_spawning::{Config as SpawningConfig, Spawning};
use cabin_chase_world::{self as world, query, World};
use glam::{Vec2, Vec3};

const FRAME: Duration = Duration::from_millis(100);

fn started_world() -> World {
    let mut world = World::new(SessionConfig::default()).expect("default config is valid");
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world
}

fn apply_all(world: &mut World, commands: Vec<Command>, events: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, events);
    }
}

/// Runs one frame: clock, input, then the interaction pass.
fn frame(world: &mut World, interaction: &mut Interaction, input: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    apply_all(world, input, &mut events);

    let session = query::session(world);
    let entities = query::entity_view(world);
    let playfield = query::playfield(world);
    let mut commands = Vec::new();
    interaction.handle(&events, &session, &entities, &playfield, &mut commands);
    apply_all(world, commands, &mut events);
    events
}

fn step(world: &mut World, interaction: &mut Interaction, dx: f32, dz: f32) -> Vec<Event> {
    frame(
        world,
        interaction,
        vec![Command::MovePlayer {
            delta: Vec2::new(dx, dz),
        }],
    )
}

fn spawn(world: &mut World, category: EntityCategory, x: f32, z: f32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEntity {
            category,
            position: Vec2::new(x, z),
        },
        &mut events,
    );
}

fn player_xz(world: &World) -> Vec2 {
    let player = query::session(world).player;
    Vec2::new(player.x, player.z)
}

fn rolled_back(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::PlayerRolledBack { .. }))
}

#[test]
fn leaving_the_bounds_rolls_back_to_last_valid_position() {
    let mut world = started_world();
    let mut interaction = Interaction;

    let events = step(&mut world, &mut interaction, -9.5, 0.0);
    assert!(rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(10.0, 16.0));

    let events = step(&mut world, &mut interaction, 39.5, 0.0);
    assert!(rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(10.0, 16.0));

    let events = step(&mut world, &mut interaction, -8.5, 0.0);
    assert!(!rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(1.5, 16.0));
}

#[test]
fn wall_rejects_the_move_while_the_door_gap_lets_the_player_in() {
    let mut world = started_world();
    let mut interaction = Interaction;

    let events = step(&mut world, &mut interaction, -5.5, -7.0);
    assert!(!rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(4.5, 9.0));

    let events = step(&mut world, &mut interaction, 1.2, 0.0);
    assert!(rolled_back(&events), "side wall must reject the approach");
    assert_eq!(player_xz(&world), Vec2::new(4.5, 9.0));

    let events = step(&mut world, &mut interaction, 5.5, 4.0);
    assert!(!rolled_back(&events));
    let events = step(&mut world, &mut interaction, 0.0, -1.0);
    assert!(!rolled_back(&events), "door gap must be passable");
    assert!(!query::session(&world).in_cabin);

    let events = step(&mut world, &mut interaction, 0.0, -1.0);
    assert!(!rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(10.0, 11.0));
    assert!(events.contains(&Event::CabinChanged { in_cabin: true }));
    assert!(query::session(&world).in_cabin);
}

#[test]
fn door_frame_rejects_approach_beside_the_gap() {
    let mut world = started_world();
    let mut interaction = Interaction;

    let _ = step(&mut world, &mut interaction, -3.0, -3.0);
    assert_eq!(player_xz(&world), Vec2::new(7.0, 13.0));

    let events = step(&mut world, &mut interaction, 0.0, -0.75);
    assert!(rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(7.0, 13.0));
}

#[test]
fn tree_trunk_blocks_the_player() {
    let mut world = started_world();
    let mut interaction = Interaction;
    spawn(&mut world, EntityCategory::TreeTrunk, 12.0, 16.0);

    let events = step(&mut world, &mut interaction, 2.0, 0.0);
    assert!(rolled_back(&events));
    assert_eq!(player_xz(&world), Vec2::new(10.0, 16.0));
}

#[test]
fn touching_the_torso_kills_and_game_over_follows_three_seconds_later() {
    let mut world = started_world();
    let mut interaction = Interaction;
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SteerEnemy {
            head: Vec3::new(10.0, terrain_elevation(10.0, 16.0) + ENEMY_HEAD_HEIGHT, 16.0),
            yaw: 0.0,
            pitch: 0.0,
            state: EnemyState::Chase,
        },
        &mut events,
    );

    let events = frame(&mut world, &mut interaction, Vec::new());
    assert!(events.contains(&Event::PlayerDied));
    assert!(!query::session(&world).alive);

    for _ in 0..29 {
        let events = frame(&mut world, &mut interaction, Vec::new());
        assert!(!events.contains(&Event::GameOver));
    }
    assert!(!query::session(&world).game_over);

    let events = frame(&mut world, &mut interaction, Vec::new());
    assert!(events.contains(&Event::GameOver));
    assert!(query::session(&world).game_over);

    let events = step(&mut world, &mut interaction, 1.0, 0.0);
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. })),
        "dead players cannot move"
    );
}

#[test]
fn each_pickup_kind_is_collected_only_once() {
    let mut world = started_world();
    let mut interaction = Interaction;
    spawn(&mut world, EntityCategory::Mushroom, 10.0, 16.0);
    spawn(&mut world, EntityCategory::Mushroom, 10.0, 16.0);

    let events = frame(&mut world, &mut interaction, Vec::new());
    let collected = events
        .iter()
        .filter(|event| matches!(event, Event::PickupCollected { .. }))
        .count();
    assert_eq!(collected, 1);

    let events = frame(&mut world, &mut interaction, Vec::new());
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PickupCollected { .. })));

    let session = query::session(&world);
    assert_eq!(session.pickups.count(PickupKind::Mushroom), 1);
    assert_eq!(query::entities_of(&world, EntityCategory::Mushroom).len(), 1);
}

#[test]
fn pickups_on_the_ramp_are_reachable_from_directly_above() {
    let mut world = started_world();
    let mut interaction = Interaction;
    spawn(&mut world, EntityCategory::Nail, 25.9, 16.0);

    let nail = query::find_entity(&world, "Nail").expect("spawned nail");
    let ground = query::height_field(&world).height_at(25.9, 16.0);
    assert_eq!(nail.position.y, ground);

    let events = step(&mut world, &mut interaction, 15.9, 0.0);
    assert!(!rolled_back(&events));
    assert!((query::session(&world).player.y - (ground + 1.0)).abs() < 1e-6);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PickupCollected { kind: PickupKind::Nail, .. })));
    assert_eq!(query::session(&world).pickups.count(PickupKind::Nail), 1);
    assert!(query::entities_of(&world, EntityCategory::Nail).is_empty());
}

#[test]
fn objective_trades_a_full_set_and_respawns_one_of_each_pickup() {
    let mut world = started_world();
    let mut interaction = Interaction;
    let playfield = query::playfield(&world);
    let mut spawning = Spawning::new(SpawningConfig::new(0, 0, 17));

    let events = step(&mut world, &mut interaction, 0.0, -7.0);
    assert_eq!(player_xz(&world), Vec2::new(10.0, 9.0));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ObjectiveRedeemed { .. })));
    assert_eq!(query::session(&world).pickups.candies(), 0);

    let _ = step(&mut world, &mut interaction, 0.0, 7.0);
    for kind in PickupKind::ALL {
        spawn(&mut world, kind.category(), 10.0, 16.0);
    }
    let _ = frame(&mut world, &mut interaction, Vec::new());
    let session = query::session(&world);
    assert!(session.pickups.has_full_set());
    for kind in PickupKind::ALL {
        assert!(query::entities_of(&world, kind.category()).is_empty());
    }

    let mut events = step(&mut world, &mut interaction, 0.0, -7.0);
    let mut commands = Vec::new();
    spawning.handle(&events, &playfield, &mut commands);
    apply_all(&mut world, commands, &mut events);

    let session = query::session(&world);
    assert_eq!(session.pickups.candies(), 1);
    assert!((session.enemy_speed - 1.7).abs() < 1e-6);
    for kind in PickupKind::ALL {
        assert_eq!(session.pickups.count(kind), 0);
        let respawned = query::entities_of(&world, kind.category());
        assert_eq!(respawned.len(), 1, "expected one fresh {kind:?}");
        let position = Vec2::new(respawned[0].position.x, respawned[0].position.z);
        assert!(!playfield.home.contains(position));
    }
}

#[test]
fn bushes_hide_only_a_crouching_player() {
    let mut world = started_world();
    let mut interaction = Interaction;
    spawn(&mut world, EntityCategory::Bush, 10.0, 16.0);

    let events = frame(&mut world, &mut interaction, Vec::new());
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::HiddenChanged { .. })));
    assert!(!query::session(&world).hidden);

    let events = frame(&mut world, &mut interaction, vec![Command::ToggleCrouch]);
    assert!(events.contains(&Event::HiddenChanged { hidden: true }));

    let events = frame(&mut world, &mut interaction, vec![Command::ToggleCrouch]);
    assert!(events.contains(&Event::HiddenChanged { hidden: false }));

    let _ = frame(&mut world, &mut interaction, vec![Command::ToggleCrouch]);
    assert!(query::session(&world).hidden);
    let events = step(&mut world, &mut interaction, 5.0, 0.0);
    assert!(events.contains(&Event::HiddenChanged { hidden: false }));
}

#[test]
fn interaction_waits_for_the_session_to_start() {
    let mut world = World::new(SessionConfig::default()).expect("valid");
    let mut interaction = Interaction;
    spawn(&mut world, EntityCategory::Nail, 10.0, 16.0);

    let _ = frame(&mut world, &mut interaction, Vec::new());
    assert_eq!(query::session(&world).pickups.count(PickupKind::Nail), 0);
    assert_eq!(query::entities_of(&world, EntityCategory::Nail).len(), 1);
}
