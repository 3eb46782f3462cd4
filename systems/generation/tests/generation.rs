use mergeworks_core::{
    Board, CellCoord, GameConfig, GameError, Item, ItemId, ItemIdAllocator, ItemKind,
    ResourceColor, ResourceLedger, SecondOfMinute,
};
use mergeworks_system_generation::activate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GENERATOR_CELL: CellCoord = CellCoord::new(1, 1);

fn board_with_generator(level: u8, color: ResourceColor) -> Board {
    let mut board = Board::new(3, 3);
    board
        .place(
            GENERATOR_CELL,
            Item::generator(ItemId::new(1), level, color, SecondOfMinute::default()),
        )
        .expect("place generator");
    board
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0x5eed)
}

#[test]
fn insufficient_funds_leave_everything_untouched() {
    let board = board_with_generator(2, ResourceColor::Blue);
    let ledger = ResourceLedger::new(15, 100, 100);
    let mut ids = ItemIdAllocator::starting_at(10);

    let error = activate(
        &board,
        &ledger,
        GENERATOR_CELL,
        &GameConfig::default(),
        SecondOfMinute::default(),
        &mut ids,
        &mut rng(),
    )
    .expect_err("15 blue cannot pay for a level 2 generator");

    assert_eq!(
        error,
        GameError::InsufficientResource {
            color: ResourceColor::Blue,
            required: 20,
            available: 15,
        }
    );
    assert_eq!(ids.peek(), ItemId::new(10));
}

#[test]
fn activation_spends_and_spawns_next_to_generator() {
    let board = board_with_generator(2, ResourceColor::Blue);
    let ledger = ResourceLedger::new(25, 0, 0);
    let mut ids = ItemIdAllocator::starting_at(10);
    let now = SecondOfMinute::wrapping(17);

    let activation = activate(
        &board,
        &ledger,
        GENERATOR_CELL,
        &GameConfig::default(),
        now,
        &mut ids,
        &mut rng(),
    )
    .expect("25 blue pays for a level 2 generator");

    assert_eq!(activation.cost, 20);
    assert_eq!(activation.balance, 5);
    assert_eq!(activation.ledger.balance(ResourceColor::Blue), 5);
    assert_eq!(activation.generator, ItemId::new(1));
    assert_eq!(activation.cell, CellCoord::new(1, 0), "nearest cell in scan order");
    assert_eq!(activation.item.id(), ItemId::new(10));
    assert_eq!(activation.item.kind(), ItemKind::Element);
    assert_eq!(activation.item.color(), Some(ResourceColor::Blue));
    assert_eq!(activation.item.placed_at(), now);
    assert!(
        (1..=2).contains(&activation.item.level()),
        "level 2 generators yield level 1 or 2, got {}",
        activation.item.level()
    );
    assert_eq!(activation.board.item_count(), 2);
    assert_eq!(board.item_count(), 1, "input board is untouched");
}

#[test]
fn level_one_generators_always_yield_level_one() {
    let board = board_with_generator(1, ResourceColor::Red);
    let ledger = ResourceLedger::uniform(1_000);
    let mut ids = ItemIdAllocator::starting_at(2);
    let mut rng = rng();

    for _ in 0..8 {
        let activation = activate(
            &board,
            &ledger,
            GENERATOR_CELL,
            &GameConfig::default(),
            SecondOfMinute::default(),
            &mut ids,
            &mut rng,
        )
        .expect("activation");
        assert_eq!(activation.item.level(), 1);
        assert_eq!(activation.cost, 10);
    }
}

#[test]
fn full_board_rejects_activation_before_spending() {
    let mut board = Board::new(2, 1);
    board
        .place(
            CellCoord::new(0, 0),
            Item::generator(ItemId::new(1), 1, ResourceColor::Blue, SecondOfMinute::default()),
        )
        .expect("place generator");
    board
        .place(
            CellCoord::new(1, 0),
            Item::element(ItemId::new(2), 1, ResourceColor::Blue, SecondOfMinute::default()),
        )
        .expect("place element");
    let mut ids = ItemIdAllocator::starting_at(3);

    assert_eq!(
        activate(
            &board,
            &ResourceLedger::uniform(100),
            CellCoord::new(0, 0),
            &GameConfig::default(),
            SecondOfMinute::default(),
            &mut ids,
            &mut rng(),
        ),
        Err(GameError::BoardFull)
    );
}

#[test]
fn only_generators_can_be_activated() {
    let board = board_with_generator(1, ResourceColor::Blue);
    let mut board_with_element = board.clone();
    let element_cell = CellCoord::new(0, 0);
    board_with_element
        .place(
            element_cell,
            Item::element(ItemId::new(2), 1, ResourceColor::Blue, SecondOfMinute::default()),
        )
        .expect("place element");
    let ledger = ResourceLedger::uniform(100);
    let config = GameConfig::default();
    let mut ids = ItemIdAllocator::starting_at(3);
    let now = SecondOfMinute::default();

    assert_eq!(
        activate(&board_with_element, &ledger, element_cell, &config, now, &mut ids, &mut rng()),
        Err(GameError::NotAGenerator { cell: element_cell })
    );
    let empty = CellCoord::new(2, 2);
    assert_eq!(
        activate(&board, &ledger, empty, &config, now, &mut ids, &mut rng()),
        Err(GameError::EmptyCell { cell: empty })
    );
    let outside = CellCoord::new(3, 0);
    assert_eq!(
        activate(&board, &ledger, outside, &config, now, &mut ids, &mut rng()),
        Err(GameError::InvalidCoordinate { cell: outside })
    );
}

#[test]
fn same_seed_produces_same_elements() {
    let board = board_with_generator(3, ResourceColor::Blue);
    let ledger = ResourceLedger::uniform(1_000);
    let config = GameConfig::default();

    let levels = |seed: u64| -> Vec<u8> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ids = ItemIdAllocator::starting_at(2);
        (0..16)
            .map(|_| {
                activate(
                    &board,
                    &ledger,
                    GENERATOR_CELL,
                    &config,
                    SecondOfMinute::default(),
                    &mut ids,
                    &mut rng,
                )
                .expect("activation")
                .item
                .level()
            })
            .collect()
    };

    assert_eq!(levels(7), levels(7));
}
