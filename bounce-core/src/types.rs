/// Identifier for a body in a [`crate::simulation::Simulation`].
///
/// This is an index into the body collection, and is only meaningful
/// for the collection the index was built from.
pub type BodyId = usize;
