//! Numeric value expressions.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::context::ExecContext;
use super::Who;

/// Entity stat reads available to value expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatQuery {
    Hp,
    MaxHp,
    Sp,
    MaxSp,
    Ap,
    MaxAp,
    Atk,
    Def,
    Spd,
    Level,
    CritRate,
    CritDmg,
    TargetRate,
    HideRate,
    /// `hp / max_hp` in `[0, 1]`.
    HpRatio,
    /// `sp / max_sp` in `[0, 1]`.
    SpRatio,
}

/// Numeric expression evaluated against an execution context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Const(f32),

    // ===== arithmetic =====
    Sum(Vec<Value>),
    Times(Vec<Value>),
    Div(Box<Value>, Box<Value>),
    Neg(Box<Value>),
    /// Left shift on the truncated integer value.
    Shl(Box<Value>, Box<Value>),
    /// Right shift on the truncated integer value.
    Shr(Box<Value>, Box<Value>),

    // ===== coercion =====
    CoerceIn(Box<Value>, Box<Value>, Box<Value>),
    CoerceAtLeast(Box<Value>, Box<Value>),
    CoerceAtMost(Box<Value>, Box<Value>),
    MinOf(Vec<Value>),
    MaxOf(Vec<Value>),

    // ===== randomness =====
    /// Uniform integer in `[0, bound)`.
    RandomInt(Box<Value>),
    /// Uniform draw in `[0, 1)`.
    RandomFloat,

    /// Ternary on a condition.
    Conditioned {
        when: Box<Condition>,
        then: Box<Value>,
        otherwise: Box<Value>,
    },

    // ===== domain leaves =====
    /// Stat read on a context participant.
    StatOf { who: Who, stat: StatQuery },
    /// Scratch read on the acting action; missing keys read as `0`.
    ActionValue(String),
    /// How many times the acting action has been used this combat.
    TimesUsed,
    /// HP damage applied by the enclosing attack; `0` outside attack scope.
    DamageDealt,
    /// Living entity count on a participant's side.
    AliveCount(Who),
}

impl Value {
    /// Evaluate to a number. Never fails; unresolved reads yield `0`.
    pub fn eval(&self, ctx: &mut ExecContext) -> f32 {
        match self {
            Value::Const(v) => *v,

            Value::Sum(parts) => parts.iter().map(|v| v.eval(ctx)).sum(),
            Value::Times(parts) => parts.iter().map(|v| v.eval(ctx)).product(),
            Value::Div(num, den) => {
                let num = num.eval(ctx);
                let den = den.eval(ctx);
                if den == 0.0 { 0.0 } else { num / den }
            }
            Value::Neg(inner) => -inner.eval(ctx),
            Value::Shl(lhs, rhs) => {
                let lhs = lhs.eval(ctx) as i32;
                let rhs = rhs.eval(ctx) as u32;
                lhs.checked_shl(rhs).unwrap_or(0) as f32
            }
            Value::Shr(lhs, rhs) => {
                let lhs = lhs.eval(ctx) as i32;
                let rhs = rhs.eval(ctx) as u32;
                lhs.checked_shr(rhs).unwrap_or(0) as f32
            }

            Value::CoerceIn(inner, min, max) => {
                let inner = inner.eval(ctx);
                let min = min.eval(ctx);
                let max = max.eval(ctx);
                inner.clamp(min, max.max(min))
            }
            Value::CoerceAtLeast(inner, min) => inner.eval(ctx).max(min.eval(ctx)),
            Value::CoerceAtMost(inner, max) => inner.eval(ctx).min(max.eval(ctx)),
            Value::MinOf(parts) => parts
                .iter()
                .map(|v| v.eval(ctx))
                .fold(f32::INFINITY, f32::min),
            Value::MaxOf(parts) => parts
                .iter()
                .map(|v| v.eval(ctx))
                .fold(f32::NEG_INFINITY, f32::max),

            Value::RandomInt(bound) => {
                let bound = bound.eval(ctx) as i32;
                ctx.rng.next_below(bound) as f32
            }
            Value::RandomFloat => ctx.rng.next_f32(),

            Value::Conditioned {
                when,
                then,
                otherwise,
            } => {
                if when.eval(ctx) {
                    then.eval(ctx)
                } else {
                    otherwise.eval(ctx)
                }
            }

            Value::StatOf { who, stat } => {
                let entity = ctx.entity(*who);
                match stat {
                    StatQuery::Hp => entity.hp as f32,
                    StatQuery::MaxHp => entity.max_hp as f32,
                    StatQuery::Sp => entity.sp as f32,
                    StatQuery::MaxSp => entity.max_sp as f32,
                    StatQuery::Ap => entity.ap,
                    StatQuery::MaxAp => entity.max_ap as f32,
                    StatQuery::Atk => entity.atk as f32,
                    StatQuery::Def => entity.def as f32,
                    StatQuery::Spd => entity.spd as f32,
                    StatQuery::Level => entity.level as f32,
                    StatQuery::CritRate => entity.crit_rate,
                    StatQuery::CritDmg => entity.crit_dmg,
                    StatQuery::TargetRate => entity.target_rate,
                    StatQuery::HideRate => entity.hide_rate,
                    StatQuery::HpRatio => entity.hp_ratio(),
                    StatQuery::SpRatio => entity.sp_ratio(),
                }
            }
            Value::ActionValue(key) => ctx.action_value(key),
            Value::TimesUsed => ctx.action_times_used() as f32,
            Value::DamageDealt => ctx.attack_damage.map_or(0.0, |d| d.taken as f32),
            Value::AliveCount(who) => {
                let side = ctx.entity(*who).is_party;
                ctx.roster.living_on_side(side).len() as f32
            }
        }
    }
}
