//! Technical green-on-black palette of the portfolio background

/// Palette constants shared by the presets
pub mod colors {
    use crate::core::surface::Rgba;

    // === Accent (spring green) ===
    pub const ACCENT: Rgba = Rgba::new(0, 255, 127, 1.0);                 // #00FF7F
    pub const GLOW: Rgba = Rgba::new(0, 255, 127, 0.9);

    // === Backdrop ===
    pub const VIGNETTE_CENTER: Rgba = Rgba::new(0, 0, 0, 0.0);            // transparent
    pub const VIGNETTE_EDGE: Rgba = Rgba::new(0, 0, 0, 0.45);
    pub const WASH_TOP: Rgba = Rgba::new(0, 255, 127, 0.04);
    pub const WASH_BOTTOM: Rgba = Rgba::new(0, 0, 0, 0.35);

    // === Lines ===
    pub const GRID_ALPHA: f64 = 0.03;
    pub const LINK_ALPHA: f64 = 0.12;                                     // at distance 0
}
