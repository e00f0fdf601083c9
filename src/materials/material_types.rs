//! Material tags carried by particles

/// Selects a particle's constitutive behavior; fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialTag {
    Snow,
    Water,
    /// Soft core tissue of the folding scenario.
    TissueSoft,
    /// Stiff outer tissue of the folding scenario; the one that grows.
    TissueHard,
}

impl MaterialTag {
    pub const ALL: [MaterialTag; 4] = [
        Self::Snow,
        Self::Water,
        Self::TissueSoft,
        Self::TissueHard,
    ];

    pub fn is_fluid(&self) -> bool {
        matches!(self, Self::Water)
    }

    pub fn is_tissue(&self) -> bool {
        matches!(self, Self::TissueSoft | Self::TissueHard)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Snow => "snow",
            Self::Water => "water",
            Self::TissueSoft => "soft tissue",
            Self::TissueHard => "hard tissue",
        }
    }
}
