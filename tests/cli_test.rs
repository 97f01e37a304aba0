#[cfg(feature = "std")]
#[cfg(test)]
mod cli_tests {
    use std::io::Cursor;

    use broadside::cli::{play, render_board};
    use broadside::{MatchSession, MemoryStore, Phase, Winner, BOARD_SIZE};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn run(session: &mut MatchSession, seed: u64, script: &str) -> String {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut out = Vec::new();
        play(session, &mut rng, Cursor::new(script.as_bytes()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_auto_placement_then_quit() {
        let store = MemoryStore::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut session =
            MatchSession::start_new_game("Ana", &mut rng).with_store(Box::new(store.clone()));
        let out = run(&mut session, 2, "auto\nquit\n");
        assert_eq!(session.phase(), Phase::Battle);
        assert!(session.player_board().is_fleet_complete());
        assert!(out.contains("Battle stations"));
        assert!(out.contains("Match saved"));
        assert_eq!(store.record().unwrap().phase, Phase::Battle);
    }

    #[test]
    fn test_manual_placement_and_undo() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        let out = run(&mut session, 4, "A1 H\nA1 H\nundo\nC3 V\nnonsense\n");
        // EOF suspends the match
        assert!(out.contains("Leaving the match"));
        assert!(out.contains("✗ Error"));
        assert_eq!(session.phase(), Phase::Placement);
        let fleet = session.player_board().fleet();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].length(), 4);
        assert_eq!(session.player_board().ship_id_at(2, 2).map(|id| id.index()), Some(0));
        assert!(session.player_board().ship_at(0, 0).is_none());
    }

    #[test]
    fn test_random_spots_fill_the_fleet() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        let script = "\n".repeat(10) + "q\n";
        run(&mut session, 6, &script);
        assert_eq!(session.phase(), Phase::Battle);
        assert_eq!(session.player_board().fleet().len(), 10);
    }

    #[test]
    fn test_scripted_battle_to_victory() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        session.randomize_player_fleet(&mut rng).unwrap();
        session.begin_battle().unwrap();

        let mut script = String::from("Z9\nqueue\n");
        for (r, c) in session.opponent_board().occupancy().iter() {
            script.push_str(&format!("{}{}\n", (b'A' + c as u8) as char, r + 1));
        }
        let out = run(&mut session, 8, &script);
        assert_eq!(session.phase(), Phase::Finished(Winner::Player));
        assert!(out.contains("Invalid coordinate"));
        assert!(out.contains("AI queue inspection on"));
        assert!(out.contains("VICTORY"));
    }

    #[test]
    fn test_reveal_shows_enemy_fleet_during_placement() {
        let mut rng = SmallRng::seed_from_u64(10);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        let out = run(&mut session, 11, "reveal\nquit\n");
        assert_eq!(session.phase(), Phase::Placement);

        let lines: Vec<_> = out.lines().collect();
        let heading = lines.iter().position(|l| *l == "Enemy fleet:").unwrap();
        let ships: usize = lines[heading + 2..heading + 2 + BOARD_SIZE]
            .iter()
            .map(|l| l.matches('S').count())
            .sum();
        assert_eq!(ships, 20);
        assert!(session.opponent_board().shots().is_empty());
    }

    #[test]
    fn test_reveal_is_not_a_battle_command() {
        let mut rng = SmallRng::seed_from_u64(12);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        let out = run(&mut session, 13, "auto\nreveal\nquit\n");
        assert_eq!(session.phase(), Phase::Battle);
        assert!(!out.contains("Enemy fleet:"));
        assert!(out.contains("Invalid coordinate"));
    }

    #[test]
    fn test_rendered_grid_shape() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut session = MatchSession::start_new_game("Ana", &mut rng);
        session.randomize_player_fleet(&mut rng).unwrap();
        let text = render_board(session.player_board(), true);
        let rows: Vec<_> = text.lines().skip(1).take(BOARD_SIZE).collect();
        assert_eq!(rows.len(), BOARD_SIZE);
        let ships: usize = rows.iter().map(|l| l.matches('S').count()).sum();
        assert_eq!(ships, 20);
    }
}
