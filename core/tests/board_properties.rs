use sweeper_core::*;

fn random_board(size: Coord, difficulty: i32, seed: u64) -> Board {
    Board::generate(size, difficulty, RandomMinePlacer::new(seed)).unwrap()
}

fn brute_force_count(board: &Board, row: Coord, col: Coord) -> u8 {
    let mut count = 0;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if (dr, dc) == (0, 0) {
                continue;
            }
            if let Ok(cell) = board.cell(row + dr, col + dc) {
                count += u8::from(cell.is_mine());
            }
        }
    }
    count
}

#[test]
fn mine_count_matches_difficulty() {
    for (seed, (size, difficulty)) in [(1, 0), (3, 10), (5, 8), (7, 33), (9, 50), (16, 16), (4, 100)]
        .into_iter()
        .enumerate()
    {
        let board = random_board(size, difficulty, seed as u64);
        let expected = ((size * size * difficulty) as f64 / 100.0).ceil() as usize;
        assert_eq!(board.mine_count(), expected, "size {size}, difficulty {difficulty}");

        // the placer picks distinct cells, and exactly those end up mined
        let mut picked = RandomMinePlacer::new(seed as u64)
            .select((size, size), expected)
            .unwrap();
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), expected);

        let mined: Vec<usize> = board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(mined, picked);
    }
}

#[test]
fn neighbor_counts_match_brute_force() {
    for seed in 0..8 {
        let board = random_board(9, 30, seed);
        for cell in board.cells() {
            assert_eq!(
                cell.adjacent_mine_count(),
                brute_force_count(&board, cell.row(), cell.col()),
                "cell {:?}, seed {seed}",
                cell.coords()
            );
        }
    }
}

#[test]
fn empty_board_opens_in_one_reveal() {
    let mut board = random_board(5, 0, 11);
    assert_eq!(board.reveal(2, 3).unwrap(), RevealOutcome::Won);
    assert!(board.cells().iter().all(Cell::is_revealed));
    assert_eq!(board.cells().len(), 25);
    assert_eq!(board.outcome(), Outcome::Won);
}

#[test]
fn revealing_twice_changes_nothing() {
    let mut board = Board::generate(4, 6, FixedMinePlacer::new([(3, 3)])).unwrap();
    board.reveal(3, 2).unwrap();
    let before = board.clone();

    assert_eq!(board.reveal(3, 2).unwrap(), RevealOutcome::NoChange);
    assert_eq!(board, before);
}

#[test]
fn three_by_three_win_and_loss() {
    let mine = (1, 2);
    let safe_cells: Vec<Coord2> = (0..3)
        .flat_map(|row| (0..3).map(move |col| (row, col)))
        .filter(|&coords| coords != mine)
        .collect();

    let mut winning = Board::generate(3, 10, FixedMinePlacer::new([mine])).unwrap();
    for &(row, col) in &safe_cells {
        winning.reveal(row, col).unwrap();
    }
    assert_eq!(winning.outcome(), Outcome::Won);
    assert_eq!(winning.status_message(), Outcome::Won.message());

    let mut losing = Board::generate(3, 10, FixedMinePlacer::new([mine])).unwrap();
    assert_eq!(losing.reveal(mine.0, mine.1).unwrap(), RevealOutcome::HitMine);
    for &(row, col) in &safe_cells {
        losing.reveal(row, col).unwrap();
        assert_eq!(losing.outcome(), Outcome::Lost);
    }
}

#[test]
fn flagged_cell_is_protected_until_unflagged() {
    let mut board = Board::generate(3, 10, FixedMinePlacer::new([(0, 0)])).unwrap();

    board.toggle_flag(2, 2).unwrap();
    let before = board.clone();
    assert_eq!(board.reveal(2, 2).unwrap(), RevealOutcome::NoChange);
    assert_eq!(board, before);

    board.toggle_flag(2, 2).unwrap();
    assert_eq!(board.reveal(2, 2).unwrap(), RevealOutcome::Won);
    assert!(board.cell(2, 2).unwrap().is_revealed());
}

#[test]
fn blob_round_trip_preserves_everything() {
    let mut engine = GameEngine::new(EngineConfig {
        seed: Some(99),
        ..EngineConfig::default()
    });
    engine.reset(8, 12).unwrap();
    let snapshot = engine.snapshot().unwrap();
    let safe = snapshot
        .cells
        .iter()
        .find(|cell| !cell.is_mine())
        .map(Cell::coords)
        .unwrap();
    let mine = snapshot
        .cells
        .iter()
        .find(|cell| cell.is_mine())
        .map(Cell::coords)
        .unwrap();
    engine.reveal(safe.0, safe.1).unwrap();
    engine.toggle_flag(mine.0, mine.1).unwrap();

    let blob = engine.export_state().unwrap();
    let mut restored = GameEngine::default();
    let restored_snapshot = restored.import_state(&blob).unwrap();

    assert_eq!(restored_snapshot, engine.snapshot().unwrap());
    assert_eq!(restored.board(), engine.board());
}

#[test]
fn out_of_bounds_coordinates_fail() {
    let mut board = random_board(4, 10, 5);
    let before = board.clone();

    for (row, col) in [(-1, 0), (4, 0), (0, -1), (0, 4)] {
        assert_eq!(
            board.reveal(row, col),
            Err(GameError::OutOfBounds { row, col })
        );
        assert_eq!(
            board.toggle_flag(row, col),
            Err(GameError::OutOfBounds { row, col })
        );
        assert!(board.cell(row, col).is_err());
    }
    assert_eq!(board, before);
}
