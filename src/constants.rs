/// Constants used by the rule generators and their metadata payloads.
pub mod rules {
    /// Rule code for possessive-state suffix omission.
    pub const RULE_PSSD_OMISSION: &str = "R4";
    /// Rule code for NP-internal determiner order swaps.
    pub const RULE_DET_ORDER_SWAP: &str = "R6";
    /// Rule code for gender-agreement suffix flips.
    pub const RULE_GENDER_FLIP: &str = "R7";
    /// Rule code for Spanish determiner injection.
    pub const RULE_DET_INJECTION: &str = "R8";

    /// Metadata key naming the mutation a rule applied.
    pub const META_MUTATION: &str = "mutation";
    /// Metadata key carrying the stripped possessive suffix.
    pub const META_REMOVED_SUFFIX: &str = "removed_suffix";
    /// Metadata key carrying the token a rule rewrote.
    pub const META_ORIGINAL_TOKEN: &str = "original_token";
    /// Metadata key carrying the word index a rule touched.
    pub const META_TOKEN_POSITION: &str = "token_position";
    /// Metadata key carrying the pre-swap determiner/noun order.
    pub const META_ORIGINAL_ORDER: &str = "original_order";
    /// Metadata key carrying the post-swap determiner/noun order.
    pub const META_SWAPPED_ORDER: &str = "swapped_order";
    /// Metadata key carrying the flipped adjective form.
    pub const META_FLIPPED_TOKEN: &str = "flipped_token";
    /// Metadata key carrying the agreement suffix that was replaced.
    pub const META_SUFFIX_CHANGED: &str = "suffix_changed";
    /// Metadata key carrying an injected determiner.
    pub const META_INSERTED_TOKEN: &str = "inserted_token";
    /// Metadata key carrying the noun an injection anchored on.
    pub const META_ANCHOR_TOKEN: &str = "anchor_token";

    /// Minimum stem length (in chars) left behind after stripping a suffix.
    pub const MIN_STEM_CHARS: usize = 3;
    /// Minimum length (in chars) accepted for the noun side of a swap.
    pub const MIN_NOUN_CHARS: usize = 3;
}

/// Constants used by the sampling engine.
pub mod engine {
    /// Default deterministic run seed.
    pub const DEFAULT_SEED: u64 = 42;
    /// Default global negative-to-positive ratio.
    pub const DEFAULT_RATIO: f64 = 0.25;
    /// Default lower bound of the per-item attempt quota.
    pub const DEFAULT_K_MIN: u32 = 1;
    /// Default upper bound of the per-item attempt quota.
    pub const DEFAULT_K_MAX: u32 = 3;
}

/// Constants used by stable content hashing.
pub mod hashing {
    /// FNV-1a 64-bit offset basis.
    pub const FNV1A64_OFFSET: u64 = 0xcbf29ce484222325;
    /// FNV-1a 64-bit prime.
    pub const FNV1A64_PRIME: u64 = 0x100000001b3;
}

/// Constants used by export collaborators.
pub mod export {
    /// Filename for the columnar negative rows.
    pub const NEGATIVES_PARQUET: &str = "negatives.parquet";
    /// Filename for line-delimited negative rows.
    pub const NEGATIVES_JSONL: &str = "negatives.jsonl";
    /// Filename for aggregate row counts.
    pub const STATS_JSON: &str = "stats.json";
    /// Filename for the run manifest.
    pub const MANIFEST_JSON: &str = "manifest.json";
}
