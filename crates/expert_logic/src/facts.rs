//! Facts and the tri-state fact store.
//!
//! A fact is one of the 26 letters `A`..=`Z`. Its value is `True`, `False`
//! or `Unknown`; the store starts with every fact `False` (closed world) and
//! only changes through explicit assertion or a completed, non-contradictory
//! query resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct fact identifiers.
pub const FACT_COUNT: usize = 26;

/// Identifier of a fact, canonicalized to an upper-case ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct FactId(u8);

impl FactId {
    /// Every fact identifier, in alphabetical order.
    pub const ALL: [FactId; FACT_COUNT] = {
        let mut all = [FactId(0); FACT_COUNT];
        let mut i = 0;
        while i < FACT_COUNT {
            all[i] = FactId(i as u8);
            i += 1;
        }
        all
    };

    /// Parses a fact letter, accepting either case.
    pub fn parse(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(FactId(c.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    /// Returns the upper-case letter naming this fact.
    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl From<FactId> for char {
    fn from(id: FactId) -> char {
        id.letter()
    }
}

impl TryFrom<char> for FactId {
    type Error = String;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        FactId::parse(c).ok_or_else(|| format!("'{}' is not a fact letter", c))
    }
}

/// A three-valued truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TruthValue {
    True,
    #[default]
    False,
    /// Neither provable nor disprovable.
    Unknown,
}

impl TruthValue {
    /// Ternary conjunction: any `False` wins, then any `Unknown`.
    pub fn and(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::False, _) | (_, TruthValue::False) => TruthValue::False,
            (TruthValue::True, TruthValue::True) => TruthValue::True,
            _ => TruthValue::Unknown,
        }
    }

    /// Ternary disjunction: any `True` wins, then any `Unknown`.
    pub fn or(self, other: TruthValue) -> TruthValue {
        match (self, other) {
            (TruthValue::True, _) | (_, TruthValue::True) => TruthValue::True,
            (TruthValue::False, TruthValue::False) => TruthValue::False,
            _ => TruthValue::Unknown,
        }
    }

    /// Ternary exclusive or: unknown as soon as either side is.
    pub fn xor(self, other: TruthValue) -> TruthValue {
        match (self.as_bool(), other.as_bool()) {
            (Some(a), Some(b)) => TruthValue::from(a != b),
            _ => TruthValue::Unknown,
        }
    }

    /// Flips `True` and `False`; `Unknown` stays `Unknown`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> TruthValue {
        match self {
            TruthValue::True => TruthValue::False,
            TruthValue::False => TruthValue::True,
            TruthValue::Unknown => TruthValue::Unknown,
        }
    }

    /// Returns `true` for `True` and `False`.
    pub fn is_known(self) -> bool {
        self != TruthValue::Unknown
    }

    /// Converts to a classical boolean, if known.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TruthValue::True => Some(true),
            TruthValue::False => Some(false),
            TruthValue::Unknown => None,
        }
    }

    /// The user-facing rendering of a resolved query.
    pub fn verdict(self) -> &'static str {
        match self {
            TruthValue::True => "True",
            TruthValue::False => "False",
            TruthValue::Unknown => "Undetermined",
        }
    }
}

impl From<bool> for TruthValue {
    fn from(b: bool) -> Self {
        if b {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verdict())
    }
}

/// Where the current value of a fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FactOrigin {
    /// Never asserted; holds the closed-world default.
    #[default]
    Default,
    /// Declared by a `=` line.
    Asserted,
    /// Written back by a non-contradictory query resolution.
    Derived,
}

/// The tri-state mapping from every fact to its current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FactStore {
    values: [TruthValue; FACT_COUNT],
    origins: [FactOrigin; FACT_COUNT],
}

/// A frozen copy of a [`FactStore`], restorable later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSnapshot(FactStore);

impl FactStore {
    /// Creates a store with every fact `False`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a fact.
    pub fn get(&self, fact: FactId) -> TruthValue {
        self.values[fact.index()]
    }

    /// Origin of the current value of a fact.
    pub fn origin(&self, fact: FactId) -> FactOrigin {
        self.origins[fact.index()]
    }

    /// Returns the value if it was asserted or derived and is not `Unknown`.
    ///
    /// Closed-world defaults are not established values: they never
    /// conflict with a derivation.
    pub fn established(&self, fact: FactId) -> Option<TruthValue> {
        let value = self.get(fact);
        match self.origin(fact) {
            FactOrigin::Default => None,
            _ if value.is_known() => Some(value),
            _ => None,
        }
    }

    /// Declares a fact `True`.
    pub fn assert_true(&mut self, fact: FactId) {
        self.values[fact.index()] = TruthValue::True;
        self.origins[fact.index()] = FactOrigin::Asserted;
    }

    /// Records the resolved value of a query.
    pub fn set_derived(&mut self, fact: FactId, value: TruthValue) {
        self.values[fact.index()] = value;
        self.origins[fact.index()] = FactOrigin::Derived;
    }

    /// Returns every fact to its `False` default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Facts currently holding `True`.
    pub fn true_facts(&self) -> Vec<FactId> {
        self.iter()
            .filter(|(_, value)| *value == TruthValue::True)
            .map(|(fact, _)| fact)
            .collect()
    }

    /// Iterates over all 26 facts and their values.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, TruthValue)> + '_ {
        FactId::ALL.iter().map(move |&fact| (fact, self.get(fact)))
    }

    /// Takes a snapshot of the current state.
    pub fn snapshot(&self) -> FactSnapshot {
        FactSnapshot(self.clone())
    }

    /// Restores a previously taken snapshot.
    pub fn restore(&mut self, snapshot: &FactSnapshot) {
        *self = snapshot.0.clone();
    }
}
