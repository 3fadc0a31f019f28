//! Hyprland configuration language server.
//!
//! Provides hover documentation, completion, document symbols, inline
//! colour swatches and nesting diagnostics for open `.conf` files.
//! Connects to editors via the `hyprls serve` CLI subcommand over stdio.

pub mod color;
pub mod completion;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod server;
pub mod settings;
pub mod symbols;

mod position;

/// Run the LSP server over stdio. This is the public entry point
/// called by `hyprls serve`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    server::run()
}
