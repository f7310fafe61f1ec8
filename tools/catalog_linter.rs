/// Catalog Linter — checks a catalog file without generating anything.
///
/// Usage: catalog_linter <catalog.ron> [<catalog.ron> ...]

use dungeon_engine::core::catalog::Catalog;
use dungeon_engine::core::quota::Quota;
use dungeon_engine::schema::blueprint::{check_contract, Blueprint};
use rustc_hash::FxHashSet;
use std::path::Path;
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

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog.ron> [<catalog.ron> ...]");
        process::exit(0);
    }

    let mut failed = false;
    for path in &args[1..] {
        let catalog = match Catalog::load_from_ron(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to load '{}': {}", path, e);
                failed = true;
                continue;
            }
        };
        tracing::debug!(path = %path, blueprints = catalog.blueprints.len(), "catalog loaded");

        let (errors, warnings) = lint_catalog(&catalog);

        println!("\n=== {} ===\n", path);
        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed!");
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }
        println!(
            "\nSummary: {} errors, {} warnings",
            errors.len(),
            warnings.len()
        );
        failed |= !errors.is_empty();
    }

    if failed {
        process::exit(1);
    }
}

/// Collect every problem instead of stopping at the first one.
fn lint_catalog(catalog: &Catalog) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if catalog.entrance.exit_count() != 2 {
        errors.push(format!(
            "Entrance '{}' has {} exits (must be 2)",
            catalog.entrance.name, catalog.entrance.exits
        ));
    }
    if catalog.exit.exit_count() != 1 {
        errors.push(format!(
            "Exit '{}' has {} exits (must be 1)",
            catalog.exit.name, catalog.exit.exits
        ));
    }

    if catalog.entrance.name == catalog.exit.name {
        errors.push(format!(
            "Entrance and exit share the name '{}'",
            catalog.entrance.name
        ));
    }

    let mut seen = FxHashSet::default();
    for blueprint in [&catalog.entrance, &catalog.exit]
        .into_iter()
        .chain(&catalog.blueprints)
    {
        if let Err(e) = check_contract(blueprint) {
            errors.push(e.to_string());
        }
    }
    for blueprint in &catalog.blueprints {
        if !seen.insert(blueprint.name()) {
            errors.push(format!("Duplicate blueprint '{}'", blueprint.name));
        }
        let endpoint = [&catalog.entrance, &catalog.exit]
            .into_iter()
            .find(|e| e.name == blueprint.name);
        match endpoint {
            Some(e) if e == blueprint => warnings.push(format!(
                "'{}' is the entrance or exit and will never be drawn from the pool",
                blueprint.name
            )),
            Some(_) => errors.push(format!(
                "'{}' redefines the entrance or exit with different doors",
                blueprint.name
            )),
            None => {}
        }
    }

    let quota = catalog.effective_quota();
    if let Err(e) = quota.validate() {
        errors.push(e.to_string());
    }

    for category in Quota::categories() {
        let available = catalog
            .blueprints
            .iter()
            .filter(|b| b.exit_count() == category)
            .filter(|b| b.name != catalog.entrance.name && b.name != catalog.exit.name)
            .count();
        let needed = quota.for_category(category);
        if available < needed {
            errors.push(format!(
                "Only {} blueprints with {} exits, quota needs {}",
                available, category, needed
            ));
        } else if available == needed && needed > 0 {
            warnings.push(format!(
                "Exactly {} blueprints with {} exits; every dungeon will use all of them",
                available, category
            ));
        }
    }

    (errors, warnings)
}
