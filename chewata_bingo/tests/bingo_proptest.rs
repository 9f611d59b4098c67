/// Property-based tests for card generation, drawing and line detection
///
/// These tests check the game invariants across many RNG seeds and
/// arbitrary mark grids.
use chewata_bingo::game::{
    CallOutcome, Caller, Card, Cell, Line, MarkGrid, MarkSet, column_range,
    constants::{CARD_SIZE, FREE_CELL},
    draw_without_replacement, has_bingo, winning_lines,
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeSet;

// Strategy for an arbitrary 5x5 mark grid
fn grid_strategy() -> impl Strategy<Value = MarkGrid> {
    prop::array::uniform5(prop::array::uniform5(any::<bool>()))
}

proptest! {
    #[test]
    fn test_draw_removes_exactly_the_drawn_value(
        pool in prop::collection::btree_set(0u32..10_000, 1..200),
        seed in any::<u64>(),
    ) {
        let pool: Vec<u32> = pool.into_iter().collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let (value, rest) = draw_without_replacement(&pool, &mut rng).unwrap();

        prop_assert!(pool.contains(&value));
        prop_assert_eq!(rest.len(), pool.len() - 1);
        prop_assert!(!rest.contains(&value));
        prop_assert!(rest.iter().all(|v| pool.contains(v)));
    }

    #[test]
    fn test_generated_card_columns_are_valid(seed in any::<u64>()) {
        let card = Card::generate(&mut StdRng::seed_from_u64(seed));

        for col in 0..CARD_SIZE {
            let cells = card.column(col).unwrap();
            let numbers: BTreeSet<u8> = cells
                .iter()
                .filter_map(|cell| match cell {
                    Cell::Number(n) => Some(*n),
                    Cell::Free => None,
                })
                .collect();

            let expected = if col == FREE_CELL.1 { 4 } else { 5 };
            prop_assert_eq!(numbers.len(), expected, "column {} has duplicates", col);
            let range = column_range(col).unwrap();
            prop_assert!(numbers.iter().all(|n| range.contains(n)));
        }

        prop_assert_eq!(card.cell(FREE_CELL.0, FREE_CELL.1), Some(Cell::Free));
        let grid = card.mark_grid(&MarkSet::new());
        prop_assert!(grid[FREE_CELL.0][FREE_CELL.1]);
        prop_assert!(!has_bingo(&grid), "free cell alone must not win");
    }

    #[test]
    fn test_has_bingo_matches_winning_lines(grid in grid_strategy()) {
        let lines = winning_lines(&grid);
        prop_assert_eq!(has_bingo(&grid), !lines.is_empty());

        for line in Line::all() {
            let complete = line.cells().iter().all(|&(r, c)| grid[r][c]);
            prop_assert_eq!(lines.contains(&line), complete);
        }
    }

    #[test]
    fn test_clearing_one_cell_per_line_never_wins(
        holes in Just((0..CARD_SIZE).collect::<Vec<_>>()).prop_shuffle()
    ) {
        // A permutation leaves one hole in every row and column; the
        // diagonals still need their own holes.
        let mut grid = [[true; CARD_SIZE]; CARD_SIZE];
        for (row, &col) in holes.iter().enumerate() {
            grid[row][col] = false;
        }
        grid[0][0] = false;
        grid[0][CARD_SIZE - 1] = false;

        let lines = winning_lines(&grid);
        prop_assert!(lines.is_empty(), "unexpected lines {:?}", lines);
    }

    #[test]
    fn test_caller_partitions_numbers(seed in any::<u64>(), calls in 0usize..=75) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut caller = Caller::new();
        for _ in 0..calls {
            prop_assert!(matches!(caller.call_next(&mut rng), CallOutcome::Called(_)));
        }

        let called = caller.called_set();
        prop_assert_eq!(called.len(), calls);
        prop_assert_eq!(caller.remaining(), 75 - calls);
        prop_assert!(called.iter().all(|n| (1..=75).contains(n)));
        prop_assert_eq!(caller.is_exhausted(), calls == 75);
    }
}

#[test]
fn test_all_true_grid_wins_every_line() {
    let grid = [[true; CARD_SIZE]; CARD_SIZE];
    assert_eq!(winning_lines(&grid).len(), 12);
}

#[test]
fn test_seventy_sixth_call_is_exhausted() {
    let mut rng = StdRng::seed_from_u64(76);
    let mut caller = Caller::new();
    for _ in 0..75 {
        assert!(matches!(caller.call_next(&mut rng), CallOutcome::Called(_)));
    }
    assert_eq!(caller.call_next(&mut rng), CallOutcome::Exhausted);
    assert_eq!(caller.called().len(), 75);
}
