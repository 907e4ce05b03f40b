//! Languages command - list registered readers and writers.

use pseudocode_syntax::registry;

pub fn cmd_languages() {
    println!("Readers:");
    for reader in registry::readers() {
        let extensions: Vec<String> = reader
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!("  {} ({})", reader.language(), extensions.join(", "));
    }
    println!("Writers:");
    for writer in registry::writers() {
        println!("  {} (.{})", writer.language(), writer.extension());
    }
}
