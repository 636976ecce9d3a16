//! Imperative side-effecting expressions.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::context::ExecContext;
use super::value::Value;
use super::Who;
use crate::execute;

/// Side-effecting expression evaluated against an execution context.
///
/// Every mutation records an [`crate::action::ActionResult`] into the
/// context's buffer. The `Swapped`/`ForUser` wrappers rewrite the context's
/// participant indices, run their block, and restore — which is how
/// self-targeted and symmetric triggers reuse one program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Extra {
    /// Run each part in order.
    Sequence(Vec<Extra>),
    /// Run `then` only when the condition holds.
    When {
        condition: Condition,
        then: Box<Extra>,
    },

    // ===== effects and shields =====
    /// Attach the named archive effect. Unknown names resolve to `NoEffect`.
    AttachEffect {
        name: String,
        #[serde(default = "default_tier")]
        tier: u32,
        turns: i32,
        to: Who,
    },
    RemoveEffect {
        name: String,
        from: Who,
    },
    AttachShield {
        key: String,
        value: Value,
        #[serde(default)]
        turns: Option<i32>,
        to: Who,
    },
    RemoveShield {
        key: String,
        from: Who,
    },

    // ===== instant changes (bypass attack multipliers) =====
    InstantHp {
        amount: Value,
        #[serde(default)]
        ignores_shield: bool,
        to: Who,
    },
    InstantSp {
        amount: Value,
        to: Who,
    },
    InstantAp {
        amount: Value,
        to: Who,
    },

    /// Write a scratch value on the acting action.
    SetActionValue {
        key: String,
        value: Value,
    },

    // ===== derived-context wrappers =====
    /// Run the block with user and target swapped.
    Swapped(Box<Extra>),
    /// Run the block with the target collapsed onto the user.
    ForUser(Box<Extra>),
}

fn default_tier() -> u32 {
    1
}

impl Extra {
    /// Evaluate for side effects. Never fails for well-formed trees.
    pub fn eval(&self, ctx: &mut ExecContext) {
        match self {
            Extra::Sequence(parts) => {
                for part in parts {
                    part.eval(ctx);
                }
            }
            Extra::When { condition, then } => {
                if condition.eval(ctx) {
                    then.eval(ctx);
                }
            }

            Extra::AttachEffect {
                name,
                tier,
                turns,
                to,
            } => execute::attach_effect(ctx, name, *tier, *turns, *to),
            Extra::RemoveEffect { name, from } => execute::remove_effect(ctx, name, *from),
            Extra::AttachShield {
                key,
                value,
                turns,
                to,
            } => {
                let value = value.eval(ctx) as i32;
                execute::attach_shield(ctx, key, value, *turns, *to);
            }
            Extra::RemoveShield { key, from } => execute::remove_shield(ctx, key, *from),

            Extra::InstantHp {
                amount,
                ignores_shield,
                to,
            } => {
                let amount = amount.eval(ctx) as i32;
                execute::instant_hp_change(ctx, amount, *ignores_shield, *to);
            }
            Extra::InstantSp { amount, to } => {
                let amount = amount.eval(ctx) as i32;
                execute::instant_sp_change(ctx, amount, *to);
            }
            Extra::InstantAp { amount, to } => {
                let amount = amount.eval(ctx);
                execute::instant_ap_change(ctx, amount, *to);
            }

            Extra::SetActionValue { key, value } => {
                let value = value.eval(ctx);
                ctx.set_action_value(key, value);
            }

            Extra::Swapped(inner) => ctx.swapped(|ctx| inner.eval(ctx)),
            Extra::ForUser(inner) => ctx.for_user(|ctx| inner.eval(ctx)),
        }
    }
}
