use mergeworks_core::{
    GameConfig, Item, ItemId, ItemKind, ItemSpec, Mission, MissionId, MissionState, ResourceColor,
    RewardBundle, RewardKind, RewardLedger, SecondOfMinute,
};
use mergeworks_system_missions::{deposit, GroupProgress, RewardCredit};

fn item(id: u32, kind: ItemKind, level: u8, color: ResourceColor) -> Item {
    Item::from_spec(
        ItemId::new(id),
        ItemSpec::new(kind, level, color),
        SecondOfMinute::default(),
    )
}

#[test]
fn ninth_mission_completes_once_and_advances() {
    let missions = GameConfig::default().missions;
    let mut state = MissionState::new(&missions);
    for _ in 0..8 {
        state.advance(&missions);
    }
    assert_eq!(state.active(&missions).map(|m| m.id), Some(MissionId::new(9)));
    let rewards = RewardLedger::default();

    let first = deposit(
        &state,
        &rewards,
        &missions,
        &item(1, ItemKind::Element, 1, ResourceColor::Blue),
    );
    assert!(first.matched);
    assert!(first.completion.is_none(), "red element still outstanding");
    assert_eq!(first.rewards, rewards);

    let second = deposit(
        &first.state,
        &first.rewards,
        &missions,
        &item(2, ItemKind::Element, 1, ResourceColor::Red),
    );
    let completion = second.completion.expect("mission 9 completes");
    assert_eq!(completion.mission, MissionId::new(9));
    assert_eq!(completion.next, Some(MissionId::new(10)));
    assert_eq!(
        completion.rewards,
        vec![RewardCredit {
            kind: RewardKind::BlackSquare,
            amount: 1,
            balance: 1,
        }]
    );
    assert_eq!(second.rewards.balance(RewardKind::BlackSquare), 1);
    assert_eq!(second.state.index(), state.index() + 1);
    assert_eq!(
        second.state.satisfied(&ItemSpec::new(ItemKind::Element, 1, ResourceColor::Blue)),
        0,
        "progress resets for the next mission"
    );

    let third = deposit(
        &second.state,
        &second.rewards,
        &missions,
        &item(3, ItemKind::Element, 1, ResourceColor::Red),
    );
    assert!(!third.matched, "mission 10 does not want red level 1");
    assert!(third.completion.is_none());
    assert_eq!(third.rewards.balance(RewardKind::BlackSquare), 1);
}

#[test]
fn surplus_items_of_a_group_do_not_match() {
    let blue_one = ItemSpec::new(ItemKind::Element, 1, ResourceColor::Blue);
    let red_one = ItemSpec::new(ItemKind::Element, 1, ResourceColor::Red);
    let missions = vec![Mission::new(1, vec![blue_one, red_one])];
    let state = MissionState::new(&missions);

    let first = deposit(
        &state,
        &RewardLedger::default(),
        &missions,
        &item(1, ItemKind::Element, 1, ResourceColor::Blue),
    );
    assert_eq!(
        first.progress,
        Some(GroupProgress {
            mission: MissionId::new(1),
            spec: blue_one,
            satisfied: 1,
            required: 1,
        })
    );

    let surplus = deposit(
        &first.state,
        &first.rewards,
        &missions,
        &item(2, ItemKind::Element, 1, ResourceColor::Blue),
    );
    assert!(!surplus.matched);
    assert_eq!(surplus.state, first.state);
}

#[test]
fn completing_the_last_mission_exhausts_the_tracker() {
    let spec = ItemSpec::new(ItemKind::Generator, 1, ResourceColor::Gray);
    let mut mission = Mission::new(5, vec![spec]);
    mission.rewards = RewardBundle {
        black_square: 2,
        orange_triangle: 3,
    };
    let missions = vec![mission];
    let state = MissionState::new(&missions);

    let outcome = deposit(
        &state,
        &RewardLedger::new(1, 1),
        &missions,
        &item(1, ItemKind::Generator, 1, ResourceColor::Gray),
    );
    let completion = outcome.completion.expect("single requirement completes");
    assert_eq!(completion.next, None);
    assert_eq!(completion.rewards.len(), 2);
    assert_eq!(outcome.rewards, RewardLedger::new(3, 4));
    assert!(outcome.state.is_exhausted());

    let after = deposit(
        &outcome.state,
        &outcome.rewards,
        &missions,
        &item(2, ItemKind::Generator, 1, ResourceColor::Gray),
    );
    assert!(!after.matched);
    assert!(after.progress.is_none());
    assert!(after.completion.is_none());
    assert_eq!(after.rewards, outcome.rewards);
}
