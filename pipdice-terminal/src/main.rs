/// PipDice Terminal Demo - Dice Roller
///
/// Renders a die in the terminal and animates each roll into the face
/// showing the result.
/// Usage: pipdice-terminal [sides]   (default 20)
/// Controls:
///   - Space/Enter: Roll
///   - N: Next die type, T: Toggle numbers/dots, C: Cycle color
///   - WASD / Arrow Keys: Turn the die
///   - Q/ESC: Quit

use std::env;
use std::io;
use pipdice_terminal::TerminalApp;

const DEFAULT_SIDES: u32 = 20;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let sides = match env::args().nth(1) {
        Some(arg) => arg.parse::<u32>().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid side count {arg:?}: {e}"))
        })?,
        None => DEFAULT_SIDES,
    };

    println!("PipDice Terminal - building a d{sides}...");
    let mut app = TerminalApp::new(sides)?;
    app.run()?;

    println!("Thanks for rolling with PipDice!");
    Ok(())
}
