//! The four Spanish-Yine perturbation rules and their shared lexicon.
//!
//! Each rule is a pure function from one positive record to at most one
//! candidate corruption. Absence of a match is a first-class outcome, not
//! an error: a rule whose linguistic precondition is missing simply returns
//! `None` and the engine moves on.

mod det_injection;
mod det_order_swap;
mod gender_flip;
mod lexicon;
mod pssd_omission;

pub use det_injection::DeterminerInjection;
pub use det_order_swap::DeterminerOrderSwap;
pub use gender_flip::GenderAgreementFlip;
pub use lexicon::{AgreementPair, Lexicon};
pub use pssd_omission::PossessiveSuffixOmission;

use crate::data::{PositiveRecord, RuleCandidate};

/// A deterministic text-perturbation rule with an applicability gate.
///
/// `apply` is a pure function of `(record, salt)`: the same inputs always
/// yield the same candidate. `salt` is the only randomness source for
/// choosing among multiple valid perturbation sites; the engine derives it
/// from the run seed and the record's pair id, so no rule ever reaches into
/// ambient RNG state.
pub trait RuleGenerator: Send + Sync {
    /// Produce a candidate corruption of `record.target_text`, or `None`
    /// when the rule's precondition is not met.
    fn apply(&self, record: &PositiveRecord, salt: u64) -> Option<RuleCandidate>;
}
