use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines which couplings a ghosting relationship covers
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GhostingKind {
    Geometric,
    Algebraic,
    GeometricAndAlgebraic,
}

/// Describes a relationship manager ghosting element side neighbors
///
/// The descriptor tells the (external) distributed-mesh machinery how many
/// layers of neighboring elements to ghost across process boundaries, and for
/// whom. The exchange itself is performed by the mesh library.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GhostLayers {
    /// Name of this relationship manager
    pub name: String,

    /// Name of the host object requesting the ghosting
    pub for_whom: String,

    /// Number of element side neighbor layers to ghost
    pub layers: usize,

    /// Which couplings the ghosting covers
    pub kind: GhostingKind,

    /// Whether the relationship may be attached before the requesting objects exist
    pub attach_early: bool,
}

impl GhostLayers {
    /// Allocates a new instance
    pub fn new(name: &str, for_whom: &str, layers: usize) -> Result<Self, StrError> {
        if layers == 0 {
            return Err("number of ghost layers must be at least one");
        }
        Ok(GhostLayers {
            name: name.to_string(),
            for_whom: for_whom.to_string(),
            layers,
            kind: GhostingKind::GeometricAndAlgebraic,
            attach_early: true,
        })
    }

    /// Sets which couplings the ghosting covers
    pub fn set_kind(&mut self, kind: GhostingKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Sets whether the relationship may be attached early
    pub fn set_attach_early(&mut self, flag: bool) -> &mut Self {
        self.attach_early = flag;
        self
    }
}

impl fmt::Display for GhostLayers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (for {}): {} layer(s), {:?}, attach_early = {}",
            self.name, self.for_whom, self.layers, self.kind, self.attach_early
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{GhostLayers, GhostingKind};

    #[test]
    fn new_works() {
        let mut gl = GhostLayers::new("rm", "PeriodicBcs", 1).unwrap();
        assert_eq!(gl.layers, 1);
        assert_eq!(gl.kind, GhostingKind::GeometricAndAlgebraic);
        assert!(gl.attach_early);
        gl.set_kind(GhostingKind::Geometric).set_attach_early(false);
        assert_eq!(gl.kind, GhostingKind::Geometric);
        assert!(!gl.attach_early);
        assert_eq!(
            format!("{}", gl),
            "rm (for PeriodicBcs): 1 layer(s), Geometric, attach_early = false"
        );
    }

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            GhostLayers::new("rm", "PeriodicBcs", 0).err(),
            Some("number of ghost layers must be at least one")
        );
    }
}
