//! Shared update contract
//!
//! Every stateful component of the engine absorbs one record per update
//! cycle. Records are applied in frame order, exactly once each.

/// A component whose state advances by absorbing one record per cycle.
pub trait State {
    /// The slice of the frame this component consumes.
    type Record;
    /// What a successful update yields to the caller.
    type Output;
    type Error;

    fn update(&mut self, record: &Self::Record) -> Result<Self::Output, Self::Error>;
}
