//! Rule model: targets, methods, formulae and the formula set.
//!
//! Targets are validated newtypes; methods are a closed enumeration with a
//! fixed validator table. Values are validated separately via
//! [`Formula::validate`] so the serializer can re-check a set that was
//! built outside the parser.

use crate::validate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

// ────────────────────────────────────────────
// Target
// ────────────────────────────────────────────

/// A validated interface name of the form `eth<digits>`.
///
/// Ordered by numeric suffix, so `eth2` sorts before `eth10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// The prefix every target carries.
    pub const PREFIX: &'static str = "eth";

    /// Creates a new target name.
    ///
    /// # Errors
    ///
    /// Returns error unless the name is `eth` followed by at least one digit.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        let valid = name
            .strip_prefix(Self::PREFIX)
            .is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()));
        if !valid {
            return Err(ModelError::InvalidTarget {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits after `eth`, without leading zeros.
    fn significant_digits(&self) -> &str {
        let digits = &self.0[Self::PREFIX.len()..];
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant_digits(), other.significant_digits());
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────
// Method
// ────────────────────────────────────────────

/// How a formula identifies its physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// MAC address, e.g. `DE:AD:C0:DE:00:00`.
    Mac,
    /// PCI bus location, e.g. `0000:01:01.1`.
    Pci,
    /// Physical port name from the biosdevname policy, e.g. `p1p1`.
    Ppn,
    /// SMBIOS label.
    Label,
}

impl Method {
    /// All persisted methods.
    pub const ALL: [Method; 4] = [Method::Mac, Method::Pci, Method::Ppn, Method::Label];

    /// Order in which validators are tried when the method is guessed.
    pub const GUESS_ORDER: [Method; 3] = [Method::Mac, Method::Pci, Method::Ppn];

    /// Parses a method token. `guess` is not a method and returns `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "mac" => Some(Self::Mac),
            "pci" => Some(Self::Pci),
            "ppn" => Some(Self::Ppn),
            "label" => Some(Self::Label),
            _ => None,
        }
    }

    /// Returns the token used in the rules file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Pci => "pci",
            Self::Ppn => "ppn",
            Self::Label => "label",
        }
    }

    /// Returns the value validator, if this method has one.
    #[must_use]
    pub fn validator(self) -> Option<fn(&str) -> bool> {
        match self {
            Self::Mac => Some(validate::is_mac),
            Self::Pci => Some(validate::is_pci),
            Self::Ppn => Some(validate::is_ppn),
            Self::Label => None,
        }
    }

    /// Infers a method from a value: first matching validator in
    /// [`Method::GUESS_ORDER`], otherwise [`Method::Label`].
    #[must_use]
    pub fn guess(value: &str) -> Self {
        Self::GUESS_ORDER
            .into_iter()
            .find(|m| m.validator().is_some_and(|valid| valid(value)))
            .unwrap_or(Self::Label)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────
// Formula
// ────────────────────────────────────────────

/// A target's naming rule before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    method: Method,
    value: String,
}

impl Formula {
    /// Creates a formula without validating the value.
    #[must_use]
    pub fn new(method: Method, value: impl Into<String>) -> Self {
        Self {
            method,
            value: value.into(),
        }
    }

    /// Returns the identification method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the value to match against.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Checks the value against the method's validator.
    ///
    /// # Errors
    ///
    /// Returns error if the value is empty or fails validation.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.value.is_empty() {
            return Err(ModelError::EmptyValue {
                method: self.method,
            });
        }
        match self.method.validator() {
            Some(valid) if !valid(&self.value) => Err(ModelError::InvalidValue {
                method: self.method,
                value: self.value.clone(),
            }),
            _ => Ok(()),
        }
    }
}

// ────────────────────────────────────────────
// Formula set
// ────────────────────────────────────────────

/// Mapping from target to formula; at most one formula per target.
///
/// Iteration is in target order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaSet {
    formulae: BTreeMap<Target, Formula>,
}

impl FormulaSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a formula, returning the one it replaced, if any.
    pub fn insert_or_replace(&mut self, target: Target, formula: Formula) -> Option<Formula> {
        self.formulae.insert(target, formula)
    }

    /// Gets the formula for a target.
    #[must_use]
    pub fn get(&self, target: &Target) -> Option<&Formula> {
        self.formulae.get(target)
    }

    /// Number of formulae.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formulae.len()
    }

    /// Returns true if there are no formulae.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formulae.is_empty()
    }

    /// Iterates formulae in target order.
    pub fn iter(&self) -> btree_map::Iter<'_, Target, Formula> {
        self.formulae.iter()
    }
}

impl<'a> IntoIterator for &'a FormulaSet {
    type Item = (&'a Target, &'a Formula);
    type IntoIter = btree_map::Iter<'a, Target, Formula>;

    fn into_iter(self) -> Self::IntoIter {
        self.formulae.iter()
    }
}

impl FromIterator<(Target, Formula)> for FormulaSet {
    fn from_iter<I: IntoIterator<Item = (Target, Formula)>>(iter: I) -> Self {
        Self {
            formulae: iter.into_iter().collect(),
        }
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in rule model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Target name is not `eth<digits>`.
    #[error("invalid target name `{name}`: must be eth<digits>")]
    InvalidTarget {
        /// The invalid name.
        name: String,
    },

    /// Value is empty.
    #[error("empty {method} value")]
    EmptyValue {
        /// Method the value was given for.
        method: Method,
    },

    /// Value fails its method's validator.
    #[error("invalid {method} value '{value}'")]
    InvalidValue {
        /// Method the value was given for.
        method: Method,
        /// The invalid value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> Target {
        Target::new(name).unwrap()
    }

    // -- Target --

    #[test]
    fn target_valid() {
        assert!(Target::new("eth0").is_ok());
        assert!(Target::new("eth123").is_ok());
    }

    #[test]
    fn target_invalid_rejected() {
        for bad in ["", "eth", "eth-1", "ens3", "eth0a", " eth0", "Eth0"] {
            assert!(
                matches!(Target::new(bad), Err(ModelError::InvalidTarget { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn target_sorts_numerically() {
        let mut targets = vec![target("eth10"), target("eth2"), target("eth1")];
        targets.sort();
        let names: Vec<&str> = targets.iter().map(Target::as_str).collect();
        assert_eq!(names, ["eth1", "eth2", "eth10"]);
    }

    #[test]
    fn target_leading_zeros_are_distinct_but_adjacent() {
        let mut targets = vec![target("eth2"), target("eth01"), target("eth1")];
        targets.sort();
        let names: Vec<&str> = targets.iter().map(Target::as_str).collect();
        assert_eq!(names, ["eth01", "eth1", "eth2"]);
        assert_ne!(target("eth01"), target("eth1"));
    }

    #[test]
    fn target_huge_suffix_does_not_overflow() {
        let big = target("eth123456789012345678901234567890");
        assert!(target("eth9") < big);
    }

    // -- Method --

    #[test]
    fn method_tokens() {
        for m in Method::ALL {
            assert_eq!(Method::from_token(m.as_str()), Some(m));
        }
        assert_eq!(Method::from_token("guess"), None);
        assert_eq!(Method::from_token("MAC"), None);
    }

    #[test]
    fn method_guess() {
        assert_eq!(Method::guess("DE:AD:C0:DE:00:00"), Method::Mac);
        assert_eq!(Method::guess("0000:01:01.1"), Method::Pci);
        assert_eq!(Method::guess("p1p1"), Method::Ppn);
        assert_eq!(Method::guess("em2"), Method::Ppn);
        assert_eq!(Method::guess("Slot3 NIC"), Method::Label);
    }

    #[test]
    fn label_has_no_validator() {
        assert!(Method::Label.validator().is_none());
    }

    // -- Formula --

    #[test]
    fn formula_validate() {
        assert!(Formula::new(Method::Mac, "DE:AD:C0:DE:00:00").validate().is_ok());
        assert!(Formula::new(Method::Label, "anything at all").validate().is_ok());
        assert!(matches!(
            Formula::new(Method::Mac, "not-a-mac").validate(),
            Err(ModelError::InvalidValue { method: Method::Mac, .. })
        ));
        assert!(matches!(
            Formula::new(Method::Label, "").validate(),
            Err(ModelError::EmptyValue { .. })
        ));
    }

    // -- FormulaSet --

    #[test]
    fn insert_or_replace_returns_previous() {
        let mut set = FormulaSet::new();
        assert!(set
            .insert_or_replace(target("eth0"), Formula::new(Method::Ppn, "p1p1"))
            .is_none());
        let old = set.insert_or_replace(target("eth0"), Formula::new(Method::Label, "x"));
        assert_eq!(old, Some(Formula::new(Method::Ppn, "p1p1")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&target("eth0")).unwrap().method(), Method::Label);
    }

    #[test]
    fn iterates_in_target_order() {
        let set: FormulaSet = ["eth10", "eth2", "eth1"]
            .into_iter()
            .map(|t| (target(t), Formula::new(Method::Label, t)))
            .collect();
        let names: Vec<&str> = set.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, ["eth1", "eth2", "eth10"]);
    }
}
