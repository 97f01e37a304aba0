//! Terminal front-end: board rendering and an interactive match loop.
//!
//! Coordinates are written column letter first, row number second (`A1`
//! is the top-left cell, `J10` the bottom-right).

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::Context;
use rand::Rng;

use crate::engine::{
    missing_classes, Board, BoardError, Coord, MatchSession, Orientation, Phase, SessionError,
    Ship, ShotResult, Winner, BOARD_SIZE,
};

pub fn coord_to_string(r: usize, c: usize) -> String {
    let col = (b'A' + c as u8) as char;
    format!("{}{}", col, r + 1)
}

pub fn parse_coord(input: &str) -> Result<Coord, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars
        .next()
        .ok_or("No column letter")?
        .to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= BOARD_SIZE {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Ok((row - 1, col))
}

/// Parse `A5 H` / `B3 V`. A missing orientation means horizontal.
pub fn parse_placement(input: &str) -> Result<(Coord, Orientation), String> {
    let mut parts = input.split_whitespace();
    let coord = parse_coord(parts.next().ok_or("Please enter coordinates (e.g., A5 H)")?)?;
    let orientation = match parts.next().map(|s| s.to_ascii_uppercase()) {
        None => Orientation::Horizontal,
        Some(s) if s == "H" => Orientation::Horizontal,
        Some(s) if s == "V" => Orientation::Vertical,
        Some(s) => return Err(format!("Invalid orientation '{}' - use H or V", s)),
    };
    Ok((coord, orientation))
}

/// Draw a board. With `reveal` unset, intact ship segments look like
/// water.
pub fn render_board(board: &Board, reveal: bool) -> String {
    let mut out = String::from("     ");
    for c in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "  {:2} ", r + 1);
        for c in 0..BOARD_SIZE {
            let ch = match board.cell(r, c) {
                Some(cell) if cell.is_shot() && cell.has_ship() => {
                    if board.ship_at(r, c).is_some_and(Ship::is_sunk) {
                        '#'
                    } else {
                        'X'
                    }
                }
                Some(cell) if cell.is_shot() => 'o',
                Some(cell) if reveal && cell.has_ship() => 'S',
                _ => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    if reveal {
        out.push_str("  Legend: S=Ship  X=Hit  #=Sunk  o=Miss  .=Water\n");
    } else {
        out.push_str("  Legend: X=Hit  #=Sunk  o=Miss  .=Unknown\n");
    }
    out
}

fn print_views<O: Write>(session: &MatchSession, out: &mut O, reveal_enemy: bool) -> anyhow::Result<()> {
    writeln!(
        out,
        "\nEnemy waters ({} ships afloat):",
        session.opponent_board().remaining_ship_count()
    )?;
    write!(out, "{}", render_board(session.opponent_board(), reveal_enemy))?;
    writeln!(
        out,
        "\n{}'s fleet ({} ships afloat):",
        session.nickname(),
        session.player_board().remaining_ship_count()
    )?;
    write!(out, "{}", render_board(session.player_board(), true))?;
    Ok(())
}

// `None` on end of input.
fn prompt<I: BufRead, O: Write>(input: &mut I, out: &mut O, msg: &str) -> anyhow::Result<Option<String>> {
    write!(out, "{}", msg)?;
    out.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the match interactively until it finishes or the user quits. The
/// session keeps autosaving if it has a store attached, so quitting
/// suspends rather than abandons.
pub fn play<R, I, O>(session: &mut MatchSession, rng: &mut R, mut input: I, out: &mut O) -> anyhow::Result<()>
where
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    writeln!(out, "Welcome aboard, {}!", session.nickname())?;
    if session.phase() == Phase::Placement && !place_fleet(session, rng, &mut input, out)? {
        return suspend(session, out);
    }
    if session.phase() == Phase::Battle && !battle(session, rng, &mut input, out)? {
        return suspend(session, out);
    }
    if let Some(winner) = session.phase().winner() {
        writeln!(out, "\n═══════════════════ GAME OVER ═══════════════════")?;
        print_views(session, out, true)?;
        match winner {
            Winner::Player => writeln!(out, "\nVICTORY! You sank all {} enemy ships.", session.sunk_ships())?,
            Winner::Machine => writeln!(out, "\nDEFEAT. All your ships have been destroyed.")?,
        }
    }
    Ok(())
}

fn suspend<O: Write>(session: &MatchSession, out: &mut O) -> anyhow::Result<()> {
    if session.has_store() {
        writeln!(out, "Match saved. Use `continue` to pick it up again.")?;
    } else {
        writeln!(out, "Leaving the match.")?;
    }
    Ok(())
}

// Returns false if the user quit.
fn place_fleet<R, I, O>(session: &mut MatchSession, rng: &mut R, input: &mut I, out: &mut O) -> anyhow::Result<bool>
where
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    writeln!(out, "\n════════════════ SHIP PLACEMENT ════════════════")?;
    writeln!(out, "Enter <coord> <H|V> (e.g. A5 H), ENTER for a random spot,")?;
    writeln!(out, "'auto' to place everything, 'undo' to pick the last ship back up,")?;
    writeln!(out, "'reveal' to peek at the enemy fleet.")?;
    loop {
        let missing = missing_classes(session.player_board().fleet().iter().map(Ship::length));
        let next = missing.first().copied();
        let msg = match next {
            Some(class) => format!(
                "Place your {} (length {}), {} ship(s) to go: ",
                class.name(),
                class.length(),
                missing.len()
            ),
            None => match session.begin_battle() {
                Ok(()) => {
                    writeln!(out, "\nAll ships placed. Battle stations!")?;
                    return Ok(true);
                }
                Err(e) => {
                    writeln!(out, "✗ {}", e)?;
                    "Fix the fleet with 'undo' or 'auto': ".to_string()
                }
            },
        };
        write!(out, "\n{}", render_board(session.player_board(), true))?;
        let Some(line) = prompt(input, out, &msg)? else {
            return Ok(false);
        };
        match line.to_ascii_lowercase().as_str() {
            "quit" | "q" => return Ok(false),
            "auto" => {
                session.randomize_player_fleet(rng)?;
                writeln!(out, "✓ Fleet placed at random")?;
            }
            "undo" => {
                let last = session
                    .player_board()
                    .fleet()
                    .last()
                    .and_then(Ship::placement)
                    .and_then(|p| session.player_board().ship_id_at(p.row, p.col));
                match last {
                    Some(id) => {
                        let ship = session.remove_ship(id)?;
                        writeln!(out, "✓ Picked up a ship of length {}", ship.length())?;
                    }
                    None => writeln!(out, "✗ Nothing to pick up")?,
                }
            }
            "reveal" => {
                writeln!(out, "\nEnemy fleet:")?;
                write!(out, "{}", render_board(session.opponent_board(), true))?;
            }
            _ => {
                let Some(class) = next else {
                    writeln!(out, "✗ No ship left to place")?;
                    continue;
                };
                if line.is_empty() {
                    let placed = session
                        .player_board()
                        .random_placement(rng, class.length())
                        .map_err(SessionError::from)
                        .and_then(|spot| {
                            session.attempt_placement(class.build(), spot.row, spot.col, spot.orientation)?;
                            Ok(spot)
                        });
                    match placed {
                        Ok(spot) => writeln!(out, "✓ {} placed at {}", class.name(), coord_to_string(spot.row, spot.col))?,
                        Err(e) => writeln!(out, "✗ {} (try 'undo' or 'auto')", e)?,
                    }
                    continue;
                }
                match parse_placement(&line) {
                    Ok(((r, c), orientation)) => {
                        match session.attempt_placement(class.build(), r, c, orientation) {
                            Ok(_) => writeln!(out, "✓ {} placed at {}", class.name(), coord_to_string(r, c))?,
                            Err(e) => writeln!(out, "✗ {}", e)?,
                        }
                    }
                    Err(e) => writeln!(out, "✗ Error: {}", e)?,
                }
            }
        }
    }
}

// Returns false if the user quit.
fn battle<R, I, O>(session: &mut MatchSession, rng: &mut R, input: &mut I, out: &mut O) -> anyhow::Result<bool>
where
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    while session.phase() == Phase::Battle {
        print_views(session, out, false)?;
        let Some(line) = prompt(input, out, "\nFire at (e.g. B7, 'queue', 'quit'): ")? else {
            return Ok(false);
        };
        match line.to_ascii_lowercase().as_str() {
            "quit" | "q" => return Ok(false),
            "queue" => {
                let on = session.toggle_ai_queue_inspection();
                let pending: Vec<String> = session
                    .strategy()
                    .pending_targets()
                    .map(|(r, c)| coord_to_string(r, c))
                    .collect();
                writeln!(
                    out,
                    "AI queue inspection {}. Pending targets: [{}]",
                    if on { "on" } else { "off" },
                    pending.join(", ")
                )?;
            }
            _ => {
                let (r, c) = match parse_coord(&line) {
                    Ok(coord) => coord,
                    Err(e) => {
                        writeln!(out, "✗ Invalid coordinate: {}", e)?;
                        continue;
                    }
                };
                match session.player_shot(rng, r, c) {
                    Ok(report) => {
                        writeln!(out, "{}", describe_player_shot(r, c, report.result))?;
                        for shot in &report.machine_shots {
                            writeln!(out, "{}", describe_machine_shot(shot.row, shot.col, shot.result))?;
                        }
                    }
                    Err(SessionError::Board(BoardError::AlreadyShot)) => {
                        writeln!(out, "✗ You already fired at {}. Choose another target.", coord_to_string(r, c))?;
                    }
                    Err(e) => writeln!(out, "✗ {}", e)?,
                }
            }
        }
    }
    Ok(true)
}

fn describe_player_shot(r: usize, c: usize, result: ShotResult) -> String {
    match result {
        ShotResult::Miss => format!("Miss. Your shot at {} hit only water.", coord_to_string(r, c)),
        ShotResult::Hit => format!("HIT at {}! Fire again.", coord_to_string(r, c)),
        ShotResult::Sunk => format!("SUNK! Your shot at {} finished an enemy ship. Fire again.", coord_to_string(r, c)),
    }
}

fn describe_machine_shot(r: usize, c: usize, result: ShotResult) -> String {
    match result {
        ShotResult::Miss => format!("Enemy missed at {}.", coord_to_string(r, c)),
        ShotResult::Hit => format!("Enemy HIT your ship at {}!", coord_to_string(r, c)),
        ShotResult::Sunk => format!("Enemy SANK your ship at {}!", coord_to_string(r, c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corners() {
        assert_eq!(parse_coord("A1"), Ok((0, 0)));
        assert_eq!(parse_coord("j10"), Ok((9, 9)));
        assert_eq!(parse_coord(" C4 "), Ok((3, 2)));
    }

    #[test]
    fn rejects_bad_coords() {
        assert!(parse_coord("").is_err());
        assert!(parse_coord("K1").is_err());
        assert!(parse_coord("A0").is_err());
        assert!(parse_coord("A11").is_err());
        assert!(parse_coord("5A").is_err());
    }

    #[test]
    fn parses_placements() {
        assert_eq!(parse_placement("B3 v"), Ok(((2, 1), Orientation::Vertical)));
        assert_eq!(parse_placement("A5"), Ok(((4, 0), Orientation::Horizontal)));
        assert!(parse_placement("A5 X").is_err());
    }

    #[test]
    fn coord_strings_round_trip() {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                assert_eq!(parse_coord(&coord_to_string(r, c)), Ok((r, c)));
            }
        }
    }

    #[test]
    fn hidden_board_conceals_ships() {
        let mut board = Board::new();
        board.place(Ship::new(2), 0, 0, Orientation::Horizontal).unwrap();
        board.shoot(0, 0).unwrap();
        board.shoot(5, 5).unwrap();
        let hidden = render_board(&board, false);
        let grid: Vec<&str> = hidden.lines().take(BOARD_SIZE + 1).collect();
        assert!(grid.iter().all(|line| !line.contains('S')));
        assert!(grid[1].contains('X'));
        assert!(grid[6].contains('o'));

        let revealed = render_board(&board, true);
        assert!(revealed.lines().nth(1).unwrap().contains('S'));
    }
}
