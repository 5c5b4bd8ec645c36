//! Invariants that must hold for any seed and any input sequence.

use proptest::prelude::*;

use crate::buff::{BuffConfig, BuffKind, BuffSet};
use crate::config::{MatchConfig, Variant};
use crate::entity::EntityTag;
use crate::input::InputState;
use crate::phase::{Phase, PhaseTable};
use crate::weapon::{WeaponId, WeaponState};

use super::helpers::{remaining_at, running};

fn variant() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Arena),
        Just(Variant::Shooter),
        Just(Variant::Throw),
    ]
}

prop_compose! {
    fn input()(
        buttons in any::<u8>(),
        angle in 0.0f32..std::f32::consts::TAU,
        aim in -4.0f32..4.0,
    ) -> InputState {
        InputState {
            move_x: angle.cos(),
            move_y: angle.sin(),
            aim_x: aim.cos(),
            aim_y: aim.sin(),
            jump: buttons & 0x01 != 0,
            crouch: buttons & 0x02 != 0,
            block: buttons & 0x04 != 0,
            attack: buttons & 0x18 != 0,
            special: buttons & 0x20 != 0,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn match_invariants_hold_every_tick(
        variant in variant(),
        seed in any::<u64>(),
        start in 30.0f32..90.0,
        inputs in prop::collection::vec(input(), 1..40),
    ) {
        let mut sim = running(MatchConfig::preset(variant), seed);
        let phases = sim.config().phases;

        for tick in 0..600u64 {
            let remaining = remaining_at(start, tick);
            let held = &inputs[(tick / 15) as usize % inputs.len()];
            sim.step(remaining, held);

            let player = sim.player().unwrap();
            prop_assert!(player.health >= 0.0 && player.health <= player.max_health);
            prop_assert!(player.buffs.shield_health(sim.tick()) >= 0.0);

            let arena = sim.arena();
            let cap = phases.params_at(remaining).max_enemies;
            prop_assert!(arena.live_count(EntityTag::Enemy) <= cap);
            let bosses = arena
                .live_with_tag(EntityTag::Enemy)
                .filter_map(|e| e.as_enemy())
                .filter(|e| e.archetype.is_boss)
                .count();
            prop_assert!(bosses <= 1);
            for enemy in arena.live_with_tag(EntityTag::Enemy).filter_map(|e| e.as_enemy()) {
                prop_assert!(enemy.health > 0.0);
            }
            prop_assert!(sim.score() >= 0);
        }
    }

    #[test]
    fn phase_depends_only_on_remaining(remaining in -10.0f32..200.0) {
        let table = PhaseTable::default();
        let expected = if remaining > table.threshold_secs { Phase::Early } else { Phase::Late };
        prop_assert_eq!(table.phase_at(remaining), expected);
        prop_assert_eq!(table.phase_at(remaining), table.phase_at(remaining));
    }

    #[test]
    fn buff_is_active_exactly_before_expiry(
        applied in 0u64..10_000,
        probe in 0u64..20_000,
        reapply in prop::option::of(0u64..5_000),
    ) {
        let config = BuffConfig::default();
        let mut buffs = BuffSet::default();
        buffs.apply(BuffKind::Damage, applied, &config);
        let mut expiry = applied + config.duration_ticks(BuffKind::Damage);
        if let Some(offset) = reapply {
            buffs.apply(BuffKind::Damage, applied + offset, &config);
            expiry = applied + offset + config.duration_ticks(BuffKind::Damage);
        }
        prop_assert_eq!(buffs.expiry(BuffKind::Damage), Some(expiry));
        prop_assert_eq!(buffs.is_active(BuffKind::Damage, probe), probe < expiry);
    }

    #[test]
    fn limited_weapon_never_underflows(uses in 0u32..20, attempts in 0usize..60) {
        let mut weapon = WeaponState::limited(WeaponId::new("sword"), uses);
        let mut spent_reports = 0;
        for _ in 0..attempts {
            if weapon.consume() {
                spent_reports += 1;
            }
        }
        let expected = uses.saturating_sub(u32::try_from(attempts).unwrap());
        prop_assert_eq!(weapon.uses(), Some(expected));
        prop_assert!(spent_reports <= 1);
        prop_assert_eq!(weapon.is_spent(), expected == 0);
    }
}
