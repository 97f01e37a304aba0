use broadside::{Board, BoardError, Orientation, Ship, ShotResult, BOARD_SIZE};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_fleet(seed: u64) -> (Board, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new();
    board.randomize_fleet(&mut rng);
    (board, rng)
}

fn orientation() -> impl Strategy<Value = Orientation> {
    any::<bool>().prop_map(Orientation::from_horizontal)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn can_place_agrees_with_place(
        seed in any::<u64>(),
        placed in 0usize..6,
        length in 0usize..7,
        row in 0..BOARD_SIZE,
        col in 0..BOARD_SIZE,
        orient in orientation(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new();
        for _ in 0..placed {
            let len = rng.random_range(1..5);
            if let Ok(p) = board.random_placement(&mut rng, len) {
                board.place(Ship::new(len), p.row, p.col, p.orientation).unwrap();
            }
        }
        let before = board.clone();
        let ship = Ship::new(length);
        let allowed = board.can_place(&ship, row, col, orient);
        match board.place(ship, row, col, orient) {
            Ok(id) => {
                prop_assert!(allowed);
                let placed = board.ship(id).unwrap();
                prop_assert_eq!(placed.cells().count(), length);
                for (r, c) in placed.cells() {
                    prop_assert_eq!(board.ship_id_at(r, c), Some(id));
                }
                prop_assert_eq!(board.occupied_cell_count(), before.occupied_cell_count() + length);
            }
            Err(_) => {
                prop_assert!(!allowed);
                prop_assert_eq!(&board, &before);
            }
        }
    }

    #[test]
    fn second_shot_is_refused(seed in any::<u64>(), row in 0..BOARD_SIZE, col in 0..BOARD_SIZE) {
        let (mut board, _) = random_fleet(seed);
        let before = board.clone();
        board.shoot(row, col).unwrap();
        let after = board.clone();
        prop_assert_ne!(&before, &after);
        prop_assert_eq!(board.shoot(row, col), Err(BoardError::AlreadyShot));
        prop_assert_eq!(&board, &after);
    }

    #[test]
    fn game_over_iff_every_ship_sunk(seed in any::<u64>(), shots in 0usize..=100) {
        let (mut board, mut rng) = random_fleet(seed);
        let mut hits = 0;
        for _ in 0..shots {
            let r = rng.random_range(0..BOARD_SIZE);
            let c = rng.random_range(0..BOARD_SIZE);
            if let Ok(result) = board.shoot(r, c) {
                if result != ShotResult::Miss {
                    hits += 1;
                }
            }
        }
        let all_sunk = board.fleet().iter().all(Ship::is_sunk);
        prop_assert_eq!(board.is_game_over(), all_sunk);
        prop_assert_eq!(board.is_game_over(), hits == board.occupied_cell_count());
        prop_assert_eq!(board.remaining_ship_count() + board.sunk_ship_count(), 10);
    }

    #[test]
    fn sinking_takes_exactly_length_hits(seed in any::<u64>()) {
        let (mut board, _) = random_fleet(seed);
        for idx in 0..board.fleet().len() {
            let ship = board.fleet()[idx];
            let cells: Vec<_> = ship.cells().collect();
            for (n, &(r, c)) in cells.iter().enumerate() {
                let result = board.shoot(r, c).unwrap();
                if n + 1 == cells.len() {
                    prop_assert_eq!(result, ShotResult::Sunk);
                } else {
                    prop_assert_eq!(result, ShotResult::Hit);
                }
            }
        }
        prop_assert!(board.is_game_over());
    }
}
