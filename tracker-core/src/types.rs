/// Identifier for an agent in a population.
///
/// This is an index into the population `Vec`, and is only meaningful
/// within the lifetime of the population that produced it.
pub type AgentId = usize;

/// Index into a colour palette (see [`crate::tunnel::TunnelOrb::color_index`]).
pub type ColorIndex = usize;
