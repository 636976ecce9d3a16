//! Boolean condition expressions.

use serde::{Deserialize, Serialize};

use super::context::ExecContext;
use super::value::Value;
use super::Who;
use crate::archive::Category;

/// Boolean expression evaluated against an execution context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Const(bool),

    // ===== combinators =====
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),

    // ===== comparators over values =====
    Gt(Value, Value),
    GtEq(Value, Value),
    Lt(Value, Value),
    LtEq(Value, Value),
    Eq(Value, Value),
    NotEq(Value, Value),

    /// Bernoulli draw with the evaluated probability.
    Chance(Value),

    // ===== domain leaves =====
    IsCategory { who: Who, category: Category },
    HasEffect { who: Who, name: String },
    HasShield { who: Who, key: String },
    /// `hp / max_hp ≤ rate`.
    HpRateAtMost { who: Who, rate: f32 },
    /// `sp / max_sp ≤ rate`.
    SpRateAtMost { who: Who, rate: f32 },
}

impl Condition {
    /// Evaluate to a boolean. Never fails; unresolved reads yield `false`.
    pub fn eval(&self, ctx: &mut ExecContext) -> bool {
        match self {
            Condition::Const(v) => *v,

            Condition::And(parts) => parts.iter().all(|c| c.eval(ctx)),
            Condition::Or(parts) => parts.iter().any(|c| c.eval(ctx)),
            Condition::Not(inner) => !inner.eval(ctx),

            Condition::Gt(lhs, rhs) => lhs.eval(ctx) > rhs.eval(ctx),
            Condition::GtEq(lhs, rhs) => lhs.eval(ctx) >= rhs.eval(ctx),
            Condition::Lt(lhs, rhs) => lhs.eval(ctx) < rhs.eval(ctx),
            Condition::LtEq(lhs, rhs) => lhs.eval(ctx) <= rhs.eval(ctx),
            Condition::Eq(lhs, rhs) => lhs.eval(ctx) == rhs.eval(ctx),
            Condition::NotEq(lhs, rhs) => lhs.eval(ctx) != rhs.eval(ctx),

            Condition::Chance(p) => {
                let p = p.eval(ctx);
                ctx.rng.chance(p)
            }

            Condition::IsCategory { who, category } => ctx.entity(*who).in_category(*category),
            Condition::HasEffect { who, name } => ctx.entity(*who).has_effect(name),
            Condition::HasShield { who, key } => ctx.entity(*who).has_shield(key),
            Condition::HpRateAtMost { who, rate } => ctx.entity(*who).hp_ratio() <= *rate,
            Condition::SpRateAtMost { who, rate } => ctx.entity(*who).sp_ratio() <= *rate,
        }
    }
}
