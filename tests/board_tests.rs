use broadside::{
    is_standard_fleet, missing_classes, Board, BoardError, Orientation, Ship, ShipClass,
    ShotResult, BOARD_SIZE, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_placement_bounds_scenario() {
    let mut board = Board::new();
    let carrier = Ship::new(4);
    board.place(carrier, 0, 0, Orientation::Horizontal).unwrap();

    let other = Ship::new(4);
    assert!(!board.can_place(&other, 0, 7, Orientation::Horizontal));
    assert!(board.can_place(&other, 0, 6, Orientation::Horizontal));
    // overlapping the first carrier
    assert!(!board.can_place(&other, 0, 3, Orientation::Horizontal));
    assert!(!board.can_place(&other, 7, 9, Orientation::Vertical));
    assert!(board.can_place(&other, 6, 9, Orientation::Vertical));
}

#[test]
fn test_place_rejects_without_side_effects() {
    let mut board = Board::new();
    board.place(Ship::new(3), 4, 4, Orientation::Vertical).unwrap();
    let before = board.clone();

    assert_eq!(
        board.place(Ship::new(2), 5, 3, Orientation::Horizontal),
        Err(BoardError::ShipOverlaps)
    );
    assert_eq!(
        board.place(Ship::new(2), 9, 9, Orientation::Horizontal),
        Err(BoardError::OutOfBounds)
    );
    assert_eq!(board, before);

    let mut placed = Ship::new(1);
    placed.place(0, 0, Orientation::Horizontal);
    assert_eq!(
        board.place(placed, 0, 0, Orientation::Horizontal),
        Err(BoardError::ShipAlreadyPlaced)
    );
}

#[test]
fn test_lengths_without_a_class_are_refused() {
    let mut board = Board::new();
    let mut rng = SmallRng::seed_from_u64(21);
    for length in [0, 5, BOARD_SIZE] {
        let ship = Ship::new(length);
        assert!(!board.can_place(&ship, 0, 0, Orientation::Horizontal));
        assert_eq!(
            board.place(ship, 0, 0, Orientation::Vertical),
            Err(BoardError::InvalidShipLength(length))
        );
        assert_eq!(
            board.random_placement(&mut rng, length),
            Err(BoardError::InvalidShipLength(length))
        );
    }
    assert!(board.fleet().is_empty());
    assert_eq!(board.occupied_cell_count(), 0);
}

#[test]
fn test_placed_cells_reference_ship() {
    let mut board = Board::new();
    let id = board.place(Ship::new(3), 2, 5, Orientation::Vertical).unwrap();
    for r in 2..5 {
        let cell = board.cell(r, 5).unwrap();
        assert!(cell.has_ship());
        assert_eq!(cell.ship_id(), Some(id));
    }
    assert!(board.ship_at(2, 5).unwrap().is_placed());
    assert!(board.cell(5, 5).map_or(false, |c| !c.has_ship()));
    assert!(board.cell(10, 0).is_none());
}

#[test]
fn test_single_cell_sink_ends_game() {
    let mut board = Board::new();
    board.place(Ship::new(1), 3, 3, Orientation::Horizontal).unwrap();
    assert!(!board.is_game_over());
    assert_eq!(board.shoot(3, 3), Ok(ShotResult::Sunk));
    assert!(board.is_game_over());
    assert_eq!(board.remaining_ship_count(), 0);
}

#[test]
fn test_shoot_miss_hit_sunk_and_repeat() {
    let mut board = Board::new();
    board.place(Ship::new(2), 0, 0, Orientation::Horizontal).unwrap();
    board.place(Ship::new(1), 5, 5, Orientation::Horizontal).unwrap();

    assert_eq!(board.shoot(9, 9), Ok(ShotResult::Miss));
    assert_eq!(board.shoot(0, 0), Ok(ShotResult::Hit));
    assert_eq!(board.shoot(0, 1), Ok(ShotResult::Sunk));
    assert!(!board.is_game_over());
    assert_eq!(board.sunk_ship_count(), 1);

    // repeated shots are refused and change nothing
    let before = board.clone();
    assert_eq!(board.shoot(0, 1), Err(BoardError::AlreadyShot));
    assert_eq!(board.shoot(9, 9), Err(BoardError::AlreadyShot));
    assert_eq!(board, before);

    assert_eq!(board.shoot(10, 0), Err(BoardError::OutOfBounds));
}

#[test]
fn test_empty_board_is_not_game_over() {
    let board = Board::new();
    assert!(!board.is_game_over());
    assert!(!board.is_fleet_complete());
    assert_eq!(board.remaining_ship_count(), 0);
}

#[test]
fn test_remove_ship_reindexes_cells() {
    let mut board = Board::new();
    let first = board.place(Ship::new(2), 0, 0, Orientation::Horizontal).unwrap();
    board.place(Ship::new(3), 2, 0, Orientation::Horizontal).unwrap();
    board.place(Ship::new(1), 9, 9, Orientation::Horizontal).unwrap();

    let lifted = board.remove_ship(first).unwrap();
    assert_eq!(lifted.length(), 2);
    assert!(!lifted.is_placed());
    assert_eq!(board.fleet().len(), 2);
    assert!(!board.cell(0, 0).unwrap().has_ship());
    assert!(!board.cell(0, 1).unwrap().has_ship());

    // surviving cells still point at the right ships
    assert_eq!(board.ship_at(2, 1).unwrap().length(), 3);
    assert_eq!(board.ship_at(9, 9).unwrap().length(), 1);

    // the lifted ship can go down again where it used to be
    assert!(board.can_place(&lifted, 0, 0, Orientation::Horizontal));
    board.place(lifted, 0, 0, Orientation::Vertical).unwrap();
    assert_eq!(board.occupied_cell_count(), 6);

    let gone = board.fleet().len();
    assert_eq!(
        board.remove_ship(board.ship_id_at(9, 9).unwrap()).map(|s| s.length()),
        Ok(1)
    );
    assert_eq!(board.fleet().len(), gone - 1);
    assert_eq!(board.remove_ship(board.ship_id_at(2, 0).unwrap()).unwrap().length(), 3);
    assert!(matches!(
        board.remove_ship(board.ship_id_at(0, 0).unwrap()),
        Ok(_)
    ));
    assert!(board.fleet().is_empty());
}

#[test]
fn test_remove_unknown_ship() {
    let mut board = Board::new();
    let id = board.place(Ship::new(1), 0, 0, Orientation::Horizontal).unwrap();
    board.remove_ship(id).unwrap();
    assert_eq!(board.remove_ship(id), Err(BoardError::UnknownShip));
}

#[test]
fn test_randomize_fleet_fills_standard_fleet() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut board = Board::new();
    board.randomize_fleet(&mut rng);
    assert!(board.is_fleet_complete());
    assert_eq!(board.fleet().len(), 10);
    assert_eq!(board.occupied_cell_count(), TOTAL_SHIP_CELLS);
    assert!(board.shots().is_empty());

    // randomizing again replaces the layout instead of adding to it
    board.randomize_fleet(&mut rng);
    assert_eq!(board.fleet().len(), 10);
    assert_eq!(board.occupied_cell_count(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_fleet_complete_requires_standard_multiset() {
    let mut board = Board::new();
    for r in 0..BOARD_SIZE {
        board.place(Ship::new(1), r, 0, Orientation::Horizontal).unwrap();
    }
    assert_eq!(board.fleet().len(), 10);
    assert!(!board.is_fleet_complete());

    assert!(is_standard_fleet([1, 1, 1, 1, 2, 2, 2, 3, 3, 4]));
    assert!(!is_standard_fleet([1, 1, 1, 1, 2, 2, 2, 3, 3]));
    assert!(!is_standard_fleet([1, 1, 1, 1, 2, 2, 2, 3, 3, 4, 1]));
    assert!(!is_standard_fleet([1, 1, 1, 1, 2, 2, 2, 3, 3, 7]));
}

#[test]
fn test_manual_fleet_completion() {
    let mut board = Board::new();
    let mut rng = SmallRng::seed_from_u64(99);
    while let Some(&class) = missing_classes(board.fleet().iter().map(Ship::length)).first() {
        let spot = board.random_placement(&mut rng, class.length()).unwrap();
        board
            .place(class.build(), spot.row, spot.col, spot.orientation)
            .unwrap();
    }
    assert!(board.is_fleet_complete());
    assert_eq!(
        missing_classes(board.fleet().iter().map(Ship::length)),
        Vec::<ShipClass>::new()
    );
}

#[test]
fn test_clear_resets_board() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut board = Board::new();
    board.randomize_fleet(&mut rng);
    board.shoot(0, 0).unwrap();
    board.clear();
    assert_eq!(board, Board::new());
}
