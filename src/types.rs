/// Stable opaque identifier for one positive pair (unique corpus-wide).
/// Example: `9c41f2a07be3d5f1`
pub type PairId = String;
/// Short code identifying one perturbation rule.
/// Examples: `R4`, `R8`
pub type RuleId = String;
/// Origin tag carried by a raw pair before freezing.
/// Examples: `biblical`, `fieldwork_2019`
pub type OriginTag = String;
