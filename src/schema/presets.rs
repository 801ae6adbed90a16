//! Named reaction parameter sets.
//!
//! Each preset lands in a different region of the feed/kill plane and so
//! produces a different family of patterns.

use super::ReactionParams;

/// The CPU solver's reference rates.
pub const REFERENCE: ReactionParams = ReactionParams::new(0.16, 0.08, 0.035, 0.06);

/// Faster diffusion tuned for the texture-based solver.
pub const SHADER_DEFAULT: ReactionParams = ReactionParams::new(0.2097, 0.105, 0.037, 0.06);

/// Self-replicating spots.
pub const MITOSIS: ReactionParams = SHADER_DEFAULT.with_rates(0.029, 0.057);

/// Slow, branching growth.
pub const CORAL: ReactionParams = SHADER_DEFAULT.with_rates(0.014, 0.045);

/// Long stripes that fill the domain.
pub const WORMS: ReactionParams = ReactionParams::new(0.16, 0.08, 0.060, 0.062);

/// Isolated spots that drift apart.
pub const SOLITONS: ReactionParams = SHADER_DEFAULT.with_rates(0.025, 0.06);

/// Travelling fronts.
pub const WAVES: ReactionParams = ReactionParams::new(0.1, 0.05, 0.055, 0.062);

const PRESETS: [(&str, ReactionParams); 7] = [
    ("reference", REFERENCE),
    ("shader-default", SHADER_DEFAULT),
    ("mitosis", MITOSIS),
    ("coral", CORAL),
    ("worms", WORMS),
    ("solitons", SOLITONS),
    ("waves", WAVES),
];

/// Look up a preset by name (case-insensitive).
pub fn preset(name: &str) -> Option<ReactionParams> {
    PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, params)| params)
}

/// All preset names, in declaration order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|&(name, _)| name)
}
