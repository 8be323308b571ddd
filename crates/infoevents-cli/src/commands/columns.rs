//! Columns command implementation.

use infoevents_source::{ARGUMENTS, COLUMNS};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("ARGUMENTS");
    for argument in ARGUMENTS.iter() {
        let presence = if argument.required { "required" } else { "optional" };
        println!("  {:<12} {:<10} {}", argument.name, argument.kind, presence);
    }
    println!("COLUMNS");
    for column in COLUMNS.iter() {
        println!("  {:<12} {}", column.name, column.kind);
    }
    Ok(())
}
