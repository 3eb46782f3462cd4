use mergeworks_core::{
    AccrualConfig, Board, CellCoord, Item, ItemId, ResourceColor, ResourceLedger, SecondOfMinute,
};
use mergeworks_system_accrual::{tick, ResourceGain};

fn second(value: u32) -> SecondOfMinute {
    SecondOfMinute::wrapping(value)
}

#[test]
fn element_pays_out_ten_seconds_after_placement() {
    let mut board = Board::new(3, 3);
    board
        .place(
            CellCoord::new(2, 2),
            Item::element(ItemId::new(5), 4, ResourceColor::Blue, second(12)),
        )
        .expect("place");
    let ledger = ResourceLedger::new(100, 0, 0);

    let report = tick(&board, &ledger, second(22), &AccrualConfig::default());

    assert_eq!(
        report.gains,
        vec![ResourceGain {
            item: ItemId::new(5),
            color: ResourceColor::Blue,
            amount: 6,
            balance: 106,
        }]
    );
    assert_eq!(report.active_items, vec![ItemId::new(5)]);
    assert_eq!(report.ledger.balance(ResourceColor::Blue), 106);
}

#[test]
fn elapsed_time_wraps_through_the_minute() {
    let mut board = Board::new(2, 1);
    board
        .place(
            CellCoord::new(0, 0),
            Item::element(ItemId::new(1), 2, ResourceColor::Red, second(55)),
        )
        .expect("place");

    let report = tick(&board, &ResourceLedger::default(), second(5), &AccrualConfig::default());

    assert_eq!(report.active_items, vec![ItemId::new(1)]);
    assert_eq!(report.ledger.balance(ResourceColor::Red), 3);
}

#[test]
fn immature_elements_and_generators_pay_nothing() {
    let mut board = Board::new(3, 1);
    board
        .place(
            CellCoord::new(0, 0),
            Item::element(ItemId::new(1), 3, ResourceColor::Gray, second(0)),
        )
        .expect("place element");
    board
        .place(
            CellCoord::new(1, 0),
            Item::generator(ItemId::new(2), 1, ResourceColor::Gray, second(0)),
        )
        .expect("place generator");
    let ledger = ResourceLedger::uniform(7);

    let report = tick(&board, &ledger, second(15), &AccrualConfig::default());
    assert!(report.gains.is_empty());
    assert!(report.active_items.is_empty());
    assert_eq!(report.ledger, ledger);

    let report = tick(&board, &ledger, second(20), &AccrualConfig::default());
    assert_eq!(
        report.active_items,
        vec![ItemId::new(1)],
        "generators never accrue"
    );
}

#[test]
fn placement_second_itself_counts_as_a_full_minute() {
    let mut board = Board::new(1, 1);
    board
        .place(
            CellCoord::new(0, 0),
            Item::element(ItemId::new(1), 1, ResourceColor::Blue, second(30)),
        )
        .expect("place");

    let report = tick(&board, &ResourceLedger::default(), second(30), &AccrualConfig::default());
    assert_eq!(report.ledger.balance(ResourceColor::Blue), 1);
}

#[test]
fn gains_are_credited_sequentially_in_board_order() {
    let mut board = Board::new(2, 2);
    board
        .place(
            CellCoord::new(1, 1),
            Item::element(ItemId::new(1), 2, ResourceColor::Blue, second(0)),
        )
        .expect("place");
    board
        .place(
            CellCoord::new(0, 0),
            Item::element(ItemId::new(2), 4, ResourceColor::Blue, second(0)),
        )
        .expect("place");

    let report = tick(&board, &ResourceLedger::new(10, 0, 0), second(40), &AccrualConfig::default());

    let balances: Vec<(ItemId, u32)> = report
        .gains
        .iter()
        .map(|gain| (gain.item, gain.balance))
        .collect();
    assert_eq!(balances, vec![(ItemId::new(2), 16), (ItemId::new(1), 19)]);
    assert_eq!(report.active_items, vec![ItemId::new(2), ItemId::new(1)]);
}
