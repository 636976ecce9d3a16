//! The combat expression language.
//!
//! Skills, effects, and entity triggers are authored as small expression
//! trees in three closed families:
//! - [`Condition`] → `bool`
//! - [`Value`] → `f32`
//! - [`Extra`] → imperative side effects (recorded as action results)
//!
//! Evaluation is centralized in one exhaustive-match function per family,
//! parameterized by an [`ExecContext`]. Evaluating a well-formed tree never
//! fails: unresolved domain reads default to `0`/`false`.

mod condition;
mod context;
mod extra;
mod value;

pub use condition::Condition;
pub use context::{DamageScope, ExecContext};
pub use extra::Extra;
pub use value::{StatQuery, Value};

use serde::{Deserialize, Serialize};

/// Which participant of the execution context an expression leaf refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Who {
    User,
    Target,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionRef, ActionResult};
    use crate::rng::SequenceRng;
    use crate::test_support::{TestArchive, sample_roster};

    fn eval_value(value: &Value, draws: Vec<f32>) -> f32 {
        let mut roster = sample_roster();
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(draws);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );
        value.eval(&mut ctx)
    }

    #[test]
    fn arithmetic_composes() {
        // (2 + 3) × 4 / 10 = 2
        let value = Value::Div(
            Box::new(Value::Times(vec![
                Value::Sum(vec![Value::Const(2.0), Value::Const(3.0)]),
                Value::Const(4.0),
            ])),
            Box::new(Value::Const(10.0)),
        );
        assert_eq!(eval_value(&value, vec![0.5]), 2.0);
    }

    #[test]
    fn division_by_zero_defaults_to_zero() {
        let value = Value::Div(Box::new(Value::Const(5.0)), Box::new(Value::Const(0.0)));
        assert_eq!(eval_value(&value, vec![0.5]), 0.0);
    }

    #[test]
    fn shifts_operate_on_truncated_ints() {
        let shl = Value::Shl(Box::new(Value::Const(3.0)), Box::new(Value::Const(2.0)));
        assert_eq!(eval_value(&shl, vec![0.5]), 12.0);
        let shr = Value::Shr(Box::new(Value::Const(12.0)), Box::new(Value::Const(2.0)));
        assert_eq!(eval_value(&shr, vec![0.5]), 3.0);
    }

    #[test]
    fn coercions_bound_values() {
        let value = Value::CoerceIn(
            Box::new(Value::Const(150.0)),
            Box::new(Value::Const(0.0)),
            Box::new(Value::Const(100.0)),
        );
        assert_eq!(eval_value(&value, vec![0.5]), 100.0);
    }

    #[test]
    fn conditioned_branches_on_condition() {
        let value = Value::Conditioned {
            when: Box::new(Condition::Gt(Value::Const(2.0), Value::Const(1.0))),
            then: Box::new(Value::Const(10.0)),
            otherwise: Box::new(Value::Const(20.0)),
        };
        assert_eq!(eval_value(&value, vec![0.5]), 10.0);
    }

    #[test]
    fn random_leaves_draw_from_the_context_source() {
        assert_eq!(eval_value(&Value::RandomFloat, vec![0.25]), 0.25);
        let value = Value::RandomInt(Box::new(Value::Const(10.0)));
        assert_eq!(eval_value(&value, vec![0.55]), 5.0);
    }

    #[test]
    fn missing_action_value_reads_as_zero() {
        assert_eq!(eval_value(&Value::ActionValue("combo".into()), vec![0.5]), 0.0);
    }

    #[test]
    fn damage_dealt_is_zero_outside_attack_scope() {
        assert_eq!(eval_value(&Value::DamageDealt, vec![0.5]), 0.0);
    }

    #[test]
    fn chance_uses_bernoulli_draw() {
        let mut roster = sample_roster();
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(vec![0.3, 0.7]);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );
        let coin = Condition::Chance(Value::Const(0.5));
        assert!(coin.eval(&mut ctx));
        assert!(!coin.eval(&mut ctx));
    }

    #[test]
    fn swapped_block_merges_results_into_the_same_buffer() {
        let mut roster = sample_roster();
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(vec![0.5]);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );

        // "Target" inside the swapped block is the original user.
        let program = Extra::Swapped(Box::new(Extra::InstantSp {
            amount: Value::Const(-3.0),
            to: Who::Target,
        }));
        program.eval(&mut ctx);

        assert_eq!(ctx.user, 0);
        assert_eq!(ctx.target, 1);
        assert_eq!(
            ctx.results,
            vec![ActionResult::SpChange {
                from: 1,
                to: 0,
                amount: -3,
            }]
        );
        assert_eq!(ctx.roster.entities()[0].sp, ctx.roster.entities()[0].max_sp - 3);
    }

    #[test]
    fn for_user_collapses_target_onto_user() {
        let mut roster = sample_roster();
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(vec![0.5]);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );

        let program = Extra::ForUser(Box::new(Extra::InstantAp {
            amount: Value::Const(2.5),
            to: Who::Target,
        }));
        program.eval(&mut ctx);

        assert_eq!(ctx.target, 1);
        assert_eq!(ctx.roster.entities()[0].ap, 2.5);
        assert_eq!(ctx.roster.entities()[1].ap, 0.0);
    }

    #[test]
    fn action_scratch_round_trips() {
        let mut roster = sample_roster();
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(vec![0.5]);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );

        let program = Extra::SetActionValue {
            key: "combo".into(),
            value: Value::Sum(vec![Value::ActionValue("combo".into()), Value::Const(1.0)]),
        };
        program.eval(&mut ctx);
        program.eval(&mut ctx);

        assert_eq!(Value::ActionValue("combo".into()).eval(&mut ctx), 2.0);
    }

    #[test]
    fn domain_condition_leaves_read_entity_state() {
        let mut roster = sample_roster();
        roster.entities_mut()[1].hp = 10;
        let archive = TestArchive::default();
        let mut rng = SequenceRng::new(vec![0.5]);
        let mut ctx = ExecContext::new(
            &mut roster,
            &archive,
            &mut rng,
            ActionRef::Skill { owner: 0, slot: 0 },
            0,
            1,
        );

        assert!(Condition::IsCategory {
            who: Who::Target,
            category: crate::archive::Category::Memory,
        }
        .eval(&mut ctx));
        assert!(Condition::HpRateAtMost {
            who: Who::Target,
            rate: 0.1,
        }
        .eval(&mut ctx));
        assert!(!Condition::HasEffect {
            who: Who::Target,
            name: "optimized".into(),
        }
        .eval(&mut ctx));
    }
}
