//! Bye rotation and opponent pairing for multi-round card-room events.
//!
//! [`pairing`] holds the engine; [`event`] wires it to the roster, round
//! history and bye queue; [`records`] is the flat-file line format.

pub mod economy;
pub mod event;
pub mod model;
pub mod pairing;
pub mod records;
