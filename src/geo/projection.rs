//! Map projections: geographic (longitude, latitude) to canvas x/y.
//!
//! Spherical raw forms with a fitted scale/translate pair, canvas y-down.
//! A projection starts unfitted (unit scale at the origin) and is sized to
//! the loaded topology with [`Projection::fit_extent`].

use serde::{Deserialize, Serialize};

use crate::geo::topology::Polygon;

/// Natural Earth polynomial coefficients, x series.
const NE_X: [f64; 5] = [0.8707, -0.131979, -0.013791, 0.003971, -0.001529];
/// Natural Earth polynomial coefficients, y series.
const NE_Y: [f64; 5] = [1.007226, 0.015085, -0.044475, 0.028874, -0.005916];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    #[default]
    Mercator,
    NaturalEarth,
}

/// A projection with fitted scale and translation.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: (f64, f64),
}

impl Projection {
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            scale: 1.0,
            translate: (0.0, 0.0),
        }
    }

    /// Raw spherical projection of (λ, φ) in radians, y-down.
    fn unit(kind: ProjectionKind, lambda: f64, phi: f64) -> (f64, f64) {
        match kind {
            ProjectionKind::Mercator => {
                (lambda, -(std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln())
            }
            ProjectionKind::NaturalEarth => {
                let p2 = phi * phi;
                let p4 = p2 * p2;
                (
                    lambda * (NE_X[0] + NE_X[1] * p2 + p4 * (NE_X[2] + p4 * (NE_X[3] * p2 + NE_X[4] * p4))),
                    -phi * (NE_Y[0] + p2 * (NE_Y[1] + p4 * (NE_Y[2] + NE_Y[3] * p2 + NE_Y[4] * p4))),
                )
            }
        }
    }

    /// Project (longitude, latitude) in degrees to canvas coordinates.
    pub fn project(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let (ux, uy) = Self::unit(self.kind, longitude.to_radians(), latitude.to_radians());
        (
            self.scale * ux + self.translate.0,
            self.scale * uy + self.translate.1,
        )
    }

    /// Fit scale and translation so the projected `polygons` fill the extent
    /// `[[x0, y0], [x1, y1]]`, preserving aspect ratio and centering the
    /// smaller axis.
    pub fn fit_extent(mut self, extent: [[f64; 2]; 2], polygons: &[Polygon]) -> Self {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for polygon in polygons {
            for ring in &polygon.rings {
                for p in ring {
                    let (ux, uy) = Self::unit(self.kind, p[0].to_radians(), p[1].to_radians());
                    min_x = min_x.min(ux);
                    min_y = min_y.min(uy);
                    max_x = max_x.max(ux);
                    max_y = max_y.max(uy);
                }
            }
        }
        let dx = max_x - min_x;
        let dy = max_y - min_y;
        if !(dx > 0.0) || !(dy > 0.0) {
            return self;
        }

        let [[x0, y0], [x1, y1]] = extent;
        let k = ((x1 - x0) / dx).min((y1 - y0) / dy);
        self.scale = k;
        self.translate = (
            x0 + (x1 - x0 - k * (min_x + max_x)) / 2.0,
            y0 + (y1 - y0 - k * (min_y + max_y)) / 2.0,
        );
        self
    }
}
