//! Support conditions decoded from the node fixity bitcode

use serde::{Deserialize, Serialize};

/// Fixity flags as (bit value, free token, restrained replacement),
/// largest bit first. Bits above 64 carry no translational or rotational
/// meaning and are consumed without changing the token string.
pub const FIXITY_FLAGS: [(i32, &str, &str); 11] = [
    (1024, "", ""),
    (512, "", ""),
    (256, "", ""),
    (128, "", ""),
    (64, "", "PxPyPzMxMyMz"),
    (32, "Mz", ""),
    (16, "My", ""),
    (8, "Mx", ""),
    (4, "Pz", ""),
    (2, "Py", ""),
    (1, "Px", ""),
];

/// Decode a fixity bitcode into its legacy token string.
///
/// Flags are consumed greedily from [`FIXITY_FLAGS`]; each consumed flag
/// rewrites the accumulator, which starts as a single space.
pub fn decode_fixity(bitcode: i32) -> String {
    let mut remaining = bitcode;
    let mut tokens = String::from(" ");
    for (bit, free, restrained) in FIXITY_FLAGS {
        if bit <= remaining {
            remaining -= bit;
            tokens = tokens.replace(free, restrained);
        }
    }
    tokens
}

/// Support conditions at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Support {
    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self::with_restraints(true, true, true, true, true, true)
    }

    /// Create a pinned support (translations restrained, rotations free)
    pub fn pinned() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Create a support with specific restraints
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Restraints from the low six bits of a fixity bitcode
    /// (1 = Px, 2 = Py, 4 = Pz, 8 = Mx, 16 = My, 32 = Mz)
    pub fn from_bitcode(bitcode: i32) -> Self {
        if bitcode <= 0 {
            return Self::default();
        }
        let bit = |value: i32| bitcode & value != 0;
        Self::with_restraints(bit(1), bit(2), bit(4), bit(8), bit(16), bit(32))
    }

    /// Get list of restrained DOF indices (0-5)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.flags()
            .iter()
            .enumerate()
            .filter_map(|(dof, &restrained)| restrained.then_some(dof))
            .collect()
    }

    /// Get list of free DOF indices (0-5)
    pub fn free_dofs(&self) -> Vec<usize> {
        self.flags()
            .iter()
            .enumerate()
            .filter_map(|(dof, &restrained)| (!restrained).then_some(dof))
            .collect()
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.flags().contains(&true)
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.flags().iter().filter(|&&restrained| restrained).count()
    }

    fn flags(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }
}
