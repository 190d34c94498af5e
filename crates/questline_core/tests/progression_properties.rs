use proptest::prelude::*;
use questline_core::progression::calculator::max_total_levels;
use questline_core::{rank_info_for_xp, scaled_xp_amount, xp_for_total_levels, QuestKind, Rank};

#[test]
fn every_rank_costs_more_than_the_previous() {
    for pair in Rank::ALL.windows(2) {
        assert!(pair[1].xp_per_level() > pair[0].xp_per_level());
    }
}

#[test]
fn total_levels_never_decrease_across_the_whole_table() {
    let mut previous = 0;
    for xp in 0..=7_000 {
        let total = rank_info_for_xp(xp).total_levels;
        assert!(total >= previous, "total levels dropped at xp={xp}");
        previous = total;
    }
    assert_eq!(previous, max_total_levels());
}

#[test]
fn main_quest_on_fresh_state_is_worth_twenty() {
    assert_eq!(scaled_xp_amount(0, QuestKind::Main), 20);
}

proptest! {
    #[test]
    fn xp_stays_inside_computed_level_bounds(xp in 0u64..20_000) {
        let info = rank_info_for_xp(xp);
        let floor = xp_for_total_levels(info.total_levels);
        prop_assert!(floor <= xp);
        if !info.is_max() {
            prop_assert!(xp < xp_for_total_levels(info.total_levels + 1));
        }
        prop_assert!(info.level >= 1 && info.level <= 3);
        prop_assert!(info.xp_into_level <= info.xp_per_level);
    }

    #[test]
    fn total_levels_are_monotonic(a in 0u64..20_000, b in 0u64..20_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank_info_for_xp(low).total_levels <= rank_info_for_xp(high).total_levels);
    }

    #[test]
    fn scaled_amounts_respect_minimums(xp in any::<u64>()) {
        prop_assert!(scaled_xp_amount(xp, QuestKind::Main) >= 10);
        prop_assert!(scaled_xp_amount(xp, QuestKind::Side) >= 4);
    }

    #[test]
    fn side_quests_are_worth_less_than_main(xp in 0u64..20_000) {
        prop_assert!(scaled_xp_amount(xp, QuestKind::Side) < scaled_xp_amount(xp, QuestKind::Main));
    }
}
