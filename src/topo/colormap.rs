use serde::{Deserialize, Serialize};

/// The colormap a view asks the host to display it with. Colormaps are referred to by name; the
/// host owns the actual color tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColormapSpec {
    Named(String),

    /// The colors of `base` in reverse order with the alpha of the final color set to zero, so
    /// the far end of the range is see-through.
    ReversedTransparentEnd { base: String, name: String },
}

impl ColormapSpec {
    pub fn named(name: &str) -> Self {
        ColormapSpec::Named(name.to_string())
    }

    /// The colormap used for positive relief.
    pub fn gist_earth() -> Self {
        Self::named("gist_earth")
    }

    /// The colormap used for negative relief: inferno reversed, fading out at its end.
    pub fn inferno_reversed() -> Self {
        ColormapSpec::ReversedTransparentEnd {
            base: "inferno".to_string(),
            name: "inferno_inv".to_string(),
        }
    }

    /// The name the host should register the resolved colormap under.
    pub fn name(&self) -> &str {
        match self {
            ColormapSpec::Named(name) => name,
            ColormapSpec::ReversedTransparentEnd { name, .. } => name,
        }
    }

    /// The name of the colormap whose colors `resolve` expects.
    pub fn base(&self) -> &str {
        match self {
            ColormapSpec::Named(name) => name,
            ColormapSpec::ReversedTransparentEnd { base, .. } => base,
        }
    }

    /// Produce the RGBA color table of this colormap from the table of its base colormap.
    pub fn resolve(&self, base_colors: &[[f32; 4]]) -> Vec<[f32; 4]> {
        match self {
            ColormapSpec::Named(_) => base_colors.to_vec(),
            ColormapSpec::ReversedTransparentEnd { .. } => {
                let mut colors = base_colors.iter().rev().copied().collect::<Vec<_>>();
                if let Some(last) = colors.last_mut() {
                    last[3] = 0.0;
                }
                colors
            }
        }
    }
}
