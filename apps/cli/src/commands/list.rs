//! Listing available commands.

use colored::Colorize;
use railcar_core::commands::{Dispatcher, camelize};

/// Print every visible command, grouped by namespace.
pub fn execute(dispatcher: &mut Dispatcher) {
    let groups = dispatcher.sorted_groups();

    if groups.iter().all(|(_, namespaces)| namespaces.is_empty()) {
        println!("{}", "No commands found.".yellow());
        println!();
        println!("Add command modules under a load path:");
        println!("  • --load-path <DIR>");
        println!("  • RAILCAR_LOAD_PATH");
        return;
    }

    for (base, namespaces) in groups {
        if namespaces.is_empty() {
            continue;
        }
        println!("{}", format!("{}:", camelize(&base)).bold().cyan());
        for namespace in namespaces {
            println!("  {}", namespace);
        }
        println!();
    }
}
