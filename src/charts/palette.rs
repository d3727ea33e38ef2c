//! Category colour palette.

/// Default slot colours for the doughnut and polar-area charts.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#FF9F40", "#4BC0C0", "#F56C42",
];

/// Fixed, cyclic list of category colours. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build from configured colours; an empty list falls back to the default.
    pub fn new(colors: &[String]) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self {
            colors: colors.to_vec(),
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Colour for a category slot, wrapping past the end of the list.
    pub fn color_of(&self, slot: usize) -> &str {
        &self.colors[slot % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}
