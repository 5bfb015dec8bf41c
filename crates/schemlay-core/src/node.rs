//! Coordinate-node naming for the layout network.
//!
//! Every unknown the solver places is one scalar: the X or Y value of a pin
//! or of a located component. Unknowns are identified by string keys so the
//! diagram layer can refer to them before anything is solved:
//!
//! - `"{Owner}[{Pin}].x"` / `"{Owner}[{Pin}].y"` for pins,
//! - `"{Owner}.x"` / `"{Owner}.y"` for a component's own location.
//!
//! The literal names `"0"`, `"gnd"` and `"gnd!"` are aliases of the ground
//! node, which is pinned at value zero by construction.

use std::fmt;

/// The literal aliases of the ground node.
pub const GROUND_ALIASES: [&str; 3] = ["0", "gnd", "gnd!"];

/// Check whether a name is one of the literal ground aliases.
pub fn is_ground_alias(name: &str) -> bool {
    GROUND_ALIASES.contains(&name)
}

/// Which scalar of a 2D location a coordinate-node measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The key suffix for this axis.
    pub fn suffix(self) -> &'static str {
        match self {
            Axis::X => ".x",
            Axis::Y => ".y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Build the coordinate-node key for a pin of a named owner.
pub fn pin_node(owner: &str, pin: &str, axis: Axis) -> String {
    format!("{}[{}]{}", owner, pin, axis.suffix())
}

/// Build the coordinate-node key for a located owner itself.
pub fn owner_node(owner: &str, axis: Axis) -> String {
    format!("{}{}", owner, axis.suffix())
}
