/// Generation integration tests — catalogs in, connected dungeons out.

use dungeon_engine::core::builder::{generate, DungeonGenerator, GenerateError};
use dungeon_engine::core::catalog::Catalog;
use dungeon_engine::core::connector::{bootstrap, ConnectError};
use dungeon_engine::core::quota::Quota;
use dungeon_engine::schema::blueprint::{Blueprint, ExitFlags};
use dungeon_engine::schema::direction::Relative;
use dungeon_engine::schema::dungeon::Dungeon;
use dungeon_engine::schema::room::Room;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Room kinds as a closed enum, the way a game with hand-written rooms
/// would implement the blueprint contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chamber {
    Gate,
    Stairs,
    Cell(u8),
    Passage(u8),
    Junction(u8),
    Hall,
}

impl Blueprint for Chamber {
    fn name(&self) -> &str {
        match self {
            Chamber::Gate => "gate",
            Chamber::Stairs => "stairs",
            Chamber::Cell(0) => "cell_a",
            Chamber::Cell(1) => "cell_b",
            Chamber::Cell(2) => "cell_c",
            Chamber::Cell(_) => "cell_d",
            Chamber::Passage(0) => "passage_a",
            Chamber::Passage(1) => "passage_b",
            Chamber::Passage(_) => "passage_c",
            Chamber::Junction(0) => "junction_a",
            Chamber::Junction(_) => "junction_b",
            Chamber::Hall => "hall",
        }
    }

    fn exit_count(&self) -> u8 {
        match self {
            Chamber::Gate => 2,
            Chamber::Stairs | Chamber::Cell(_) => 1,
            Chamber::Passage(_) => 2,
            Chamber::Junction(_) => 3,
            Chamber::Hall => 4,
        }
    }

    fn exit_flags(&self) -> ExitFlags {
        match self {
            Chamber::Gate => ExitFlags::new(false, false, true),
            Chamber::Stairs | Chamber::Cell(_) => ExitFlags::NONE,
            Chamber::Passage(n) => ExitFlags::new(*n == 0, *n == 1, *n >= 2),
            Chamber::Junction(0) => ExitFlags::new(true, true, false),
            Chamber::Junction(_) => ExitFlags::new(false, true, true),
            Chamber::Hall => ExitFlags::ALL,
        }
    }
}

fn chambers() -> Vec<Chamber> {
    let mut out: Vec<Chamber> = (0..4).map(Chamber::Cell).collect();
    out.extend((0..3).map(Chamber::Passage));
    out.extend((0..2).map(Chamber::Junction));
    out.push(Chamber::Hall);
    out
}

fn fixture(name: &str) -> Catalog {
    Catalog::load_from_ron(Path::new(&format!("tests/fixtures/{}", name))).unwrap()
}

fn assert_well_formed<B: Blueprint>(d: &Dungeon<B>, exit_name: &str) {
    assert!(d.is_consistent(), "broken links: {:?}", d.broken_links());
    assert_eq!(d.exit().unwrap().name(), exit_name);

    for (id, room) in d.iter().skip(1) {
        let origin = room
            .origin_direction()
            .unwrap_or_else(|| panic!("room {:?} is not oriented", id));
        let parent = room.door(origin).occupant.unwrap();
        assert!(parent < id, "room {:?} placed before its origin {:?}", id, parent);
        let labels = room
            .doors()
            .filter(|(_, slot)| slot.label == Some(Relative::Origin))
            .count();
        assert_eq!(labels, 1);
    }
}

#[test]
fn exact_catalog_generates_twelve_rooms() {
    let catalog = fixture("exact_catalog.ron");
    let mut rng = StdRng::seed_from_u64(2024);
    let d = generate(
        &catalog.blueprints,
        &catalog.entrance,
        &catalog.exit,
        &Quota::default(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(d.len(), 4 + 3 + 2 + 1 + 2);
    assert_eq!(d.entrance().unwrap().name(), "entrance");
    assert_well_formed(&d, "exit");
    for (id, _) in d.iter() {
        assert!(d.leads_back(id));
    }
}

#[test]
fn short_catalog_fails_before_placing_rooms() {
    let catalog = fixture("short_catalog.ron");
    let mut rng = StdRng::seed_from_u64(1);
    let err = generate(
        &catalog.blueprints,
        &catalog.entrance,
        &catalog.exit,
        &Quota::default(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::InsufficientCatalog {
            category: 2,
            needed: 3,
            found: 2
        }
    ));
    assert!(err.to_string().contains("quota needs 3"));
}

#[test]
fn enum_blueprints_generate() {
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let d = generate(
            &chambers(),
            &Chamber::Gate,
            &Chamber::Stairs,
            &Quota::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(d.len(), 12);
        assert_eq!(d.exit().unwrap().blueprint(), &Chamber::Stairs);
        assert_well_formed(&d, "stairs");
    }
}

#[test]
fn bootstrapping_entrance_twice_fails() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut gate = Room::new(Chamber::Gate);
    bootstrap(&mut gate, &mut rng).unwrap();
    assert!(matches!(
        bootstrap(&mut gate, &mut rng),
        Err(ConnectError::AlreadyOriented(_))
    ));
}

#[test]
fn sample_catalog_draws_varied_dungeons() {
    let mut generator = DungeonGenerator::builder()
        .seed(7)
        .catalog_file("catalogs/crypt.ron")
        .build()
        .unwrap();

    let dungeons = generator.generate_variants(10).unwrap();
    for d in &dungeons {
        assert_eq!(d.len(), 12);
        assert_well_formed(d, "spiral_stair");
    }

    let layouts: Vec<Vec<&str>> = dungeons
        .iter()
        .map(|d| d.rooms().iter().map(|r| r.name()).collect())
        .collect();
    assert!(
        layouts.iter().any(|l| l != &layouts[0]),
        "Expected different dungeons across generations"
    );
}

#[test]
fn merged_catalog_files() {
    let mut generator = DungeonGenerator::builder()
        .seed(3)
        .catalog_file("tests/fixtures/short_catalog.ron")
        .catalog_file("tests/fixtures/exact_catalog.ron")
        .build()
        .unwrap();
    assert_eq!(generator.catalog().blueprints.len(), 10);
    let d = generator.generate().unwrap();
    assert_eq!(d.len(), 12);
}

#[test]
fn missing_catalog_file_fails() {
    let err = DungeonGenerator::builder()
        .catalog_file("tests/fixtures/nope.ron")
        .build()
        .unwrap_err();
    assert!(matches!(err, GenerateError::Catalog(_)));
}
