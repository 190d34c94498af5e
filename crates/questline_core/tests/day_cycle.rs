use chrono::NaiveDate;
use questline_core::{
    advance_day, scaled_xp_amount, DayTransition, Frequency, ProgressionState, QuestDraft,
    QuestKind, QuestStore,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn yesterday_state(xp: u64, streak: u32) -> ProgressionState {
    ProgressionState {
        xp,
        streak,
        combo: 4,
        last_completed_date: Some(date(9)),
        daily_main_quest_completed: true,
        last_active_date: Some(date(9)),
    }
}

#[test]
fn same_day_changes_nothing() {
    let mut quests = QuestStore::new();
    let id = quests
        .add(QuestDraft::new("Run", QuestKind::Main).with_frequency(Frequency::Daily))
        .unwrap();
    quests.toggle(id).unwrap();
    let mut progression = yesterday_state(120, 3);
    let before = progression.clone();

    let transition = advance_day(&mut quests, &mut progression, date(9));

    assert_eq!(transition, DayTransition::SameDay);
    assert_eq!(progression, before);
    assert!(quests.get(id).unwrap().done);
}

#[test]
fn completed_main_quest_extends_streak_and_resets_daily_quests() {
    let mut quests = QuestStore::new();
    let daily_main = quests
        .add(QuestDraft::new("Workout", QuestKind::Main).with_frequency(Frequency::Daily))
        .unwrap();
    let daily_side = quests
        .add(QuestDraft::new("Water", QuestKind::Side).with_frequency(Frequency::Daily))
        .unwrap();
    let normal = quests.add(QuestDraft::new("Tax return", QuestKind::Side)).unwrap();
    let weekly = quests
        .add(QuestDraft::new("Review week", QuestKind::Side).with_frequency(Frequency::Weekly))
        .unwrap();
    for id in [daily_main, daily_side, normal, weekly] {
        quests.toggle(id).unwrap();
    }
    let mut progression = yesterday_state(120, 3);

    let transition = advance_day(&mut quests, &mut progression, date(10));

    let DayTransition::NewDay(summary) = transition else {
        panic!("expected a rollover");
    };
    assert!(summary.streak_kept);
    assert_eq!(summary.xp_decayed, 0);
    assert_eq!(summary.daily_quests_reset, 2);
    assert_eq!(summary.previous_active_date, Some(date(9)));
    assert_eq!(progression.streak, 4);
    assert_eq!(progression.xp, 120);
    assert_eq!(progression.combo, 1);
    assert!(!progression.daily_main_quest_completed);
    assert_eq!(progression.last_active_date, Some(date(10)));
    assert_eq!(progression.last_completed_date, Some(date(9)));

    assert!(!quests.get(daily_main).unwrap().done);
    assert!(!quests.get(daily_side).unwrap().done);
    assert!(quests.get(normal).unwrap().done);
    assert!(quests.get(weekly).unwrap().done);
}

#[test]
fn missed_day_resets_streak_and_decays_xp() {
    let mut quests = QuestStore::new();
    let side = quests.add(QuestDraft::new("Journal", QuestKind::Side)).unwrap();
    quests.toggle(side).unwrap();
    let mut progression = yesterday_state(175, 6);
    let penalty = scaled_xp_amount(175, QuestKind::Main);

    let transition = advance_day(&mut quests, &mut progression, date(10));

    let DayTransition::NewDay(summary) = transition else {
        panic!("expected a rollover");
    };
    assert!(!summary.streak_kept);
    assert_eq!(penalty, 32);
    assert_eq!(summary.xp_decayed, penalty);
    assert_eq!(progression.xp, 175 - penalty);
    assert_eq!(progression.streak, 0);
    assert_eq!(progression.combo, 1);
}

#[test]
fn decay_is_floored_at_zero() {
    let mut quests = QuestStore::new();
    let mut progression = yesterday_state(5, 2);

    let transition = advance_day(&mut quests, &mut progression, date(10));

    let DayTransition::NewDay(summary) = transition else {
        panic!("expected a rollover");
    };
    assert_eq!(summary.xp_decayed, 5);
    assert_eq!(progression.xp, 0);
}

#[test]
fn first_run_without_last_active_date_is_a_new_day() {
    let mut quests = QuestStore::new();
    let mut progression = ProgressionState::default();

    let transition = advance_day(&mut quests, &mut progression, date(1));

    assert!(transition.is_new_day());
    assert_eq!(progression.xp, 0);
    assert_eq!(progression.streak, 0);
    assert_eq!(progression.last_active_date, Some(date(1)));
}

#[test]
fn running_twice_on_the_same_day_rolls_over_once() {
    let mut quests = QuestStore::new();
    let mut progression = yesterday_state(300, 1);

    assert!(advance_day(&mut quests, &mut progression, date(10)).is_new_day());
    let after_first = progression.clone();
    assert_eq!(
        advance_day(&mut quests, &mut progression, date(10)),
        DayTransition::SameDay
    );
    assert_eq!(progression, after_first);
}
