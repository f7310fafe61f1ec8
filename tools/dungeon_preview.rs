/// Dungeon Preview — generates dungeons from a catalog and prints their doors.
///
/// Usage: dungeon_preview --catalog <file.ron> [--seed <n>] [--count <n>]

use dungeon_engine::core::builder::DungeonGenerator;
use dungeon_engine::schema::blueprint::RoomBlueprint;
use dungeon_engine::schema::dungeon::Dungeon;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut catalog = None;
    let mut seed: u64 = 42;
    let mut count: usize = 1;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a non-negative integer");
                    process::exit(1);
                });
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --count must be a non-negative integer");
                    process::exit(1);
                });
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let catalog = catalog.unwrap_or_else(|| {
        eprintln!("Error: --catalog is required");
        print_usage();
        process::exit(1);
    });

    let mut generator = DungeonGenerator::builder()
        .seed(seed)
        .catalog_file(&catalog)
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    tracing::info!(catalog = %catalog, seed, count, "generating");

    for n in 0..count {
        match generator.generate() {
            Ok(dungeon) => {
                println!("=== Dungeon {} (seed {}) ===", n + 1, seed);
                print_dungeon(&dungeon);
            }
            Err(e) => {
                eprintln!("Error generating dungeon {}: {}", n + 1, e);
                process::exit(1);
            }
        }
    }
}

fn print_dungeon(dungeon: &Dungeon<RoomBlueprint>) {
    for (id, room) in dungeon.iter() {
        println!("[{:>2}] {} ({} exits)", id.0, room.name(), room.category());
        for (dir, slot) in room.doors() {
            let label = slot.label.map(|l| l.name()).unwrap_or("-");
            let leads_to = match slot.occupant.and_then(|n| dungeon.get(n).map(|r| (n, r))) {
                Some((n, neighbor)) => format!("[{:>2}] {}", n.0, neighbor.name()),
                None => String::new(),
            };
            println!("       {:<5} {:<8} {}", dir.name(), label, leads_to);
        }
    }

    let broken = dungeon.broken_links();
    if broken.is_empty() {
        println!("All {} rooms connected both ways.\n", dungeon.len());
    } else {
        println!("BROKEN LINKS: {:?}\n", broken);
    }
}

fn print_usage() {
    println!("Usage: dungeon_preview --catalog <file.ron> [--seed <n>] [--count <n>]");
}
