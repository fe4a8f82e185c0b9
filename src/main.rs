// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Log lines would tear the alternate screen unless RUST_LOG asks for them
    budget_admin::logging::init("off");

    run_ui_mode()
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let config = budget_admin::ClientConfig::from_env()?;

    println!("🖥️  Loading Budget Admin...");
    println!("   Budgets API: {}", config.api_url);
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(&config)?;
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or start the mock API: cargo run --bin budget-server --features server");
    std::process::exit(1);
}
