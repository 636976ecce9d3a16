//! Damage-absorption shields.

use serde::{Deserialize, Serialize};

/// A damage-absorption buffer keyed on its owner.
///
/// `turns_left = None` means the shield holds until consumed. A shield is
/// cleaned up once `value ≤ 0` or `turns_left ≤ 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub value: i32,
    pub turns_left: Option<i32>,
}

impl Shield {
    pub fn new(value: i32, turns_left: Option<i32>) -> Self {
        Self { value, turns_left }
    }

    pub fn exhausted(&self) -> bool {
        self.value <= 0 || self.turns_left.is_some_and(|t| t <= 0)
    }
}
