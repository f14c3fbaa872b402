//! Minimal TopoJSON decoder for the world boundary dataset.
//!
//! The dataset stores country shapes as indices into a shared pool of
//! delta-encoded arcs, so borders between neighbours exist once. Two
//! read paths: [`Topology::polygons`] reassembles full country rings
//! (the `feature` operation) and [`Topology::mesh`] yields each arc a
//! single time for boundary drawing (the `mesh` operation).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A sequence of (x, y) coordinate pairs.
pub type Ring = Vec<[f64; 2]>;

/// One country polygon: exterior ring first, any holes after.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("arc index {0} out of range")]
    BadArcIndex(i32),
}

/// A parsed TopoJSON document. Arcs stay delta-encoded until read.
#[derive(Deserialize)]
pub struct Topology {
    #[serde(default)]
    transform: Option<TopoTransform>,
    objects: HashMap<String, TopoGeometry>,
    arcs: Vec<Vec<[f64; 2]>>,
}

/// Quantization transform: position = delta_sum * scale + translate.
#[derive(Deserialize)]
struct TopoTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection { geometries: Vec<TopoGeometry> },
    Polygon { arcs: Vec<Vec<i32>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i32>>> },
    #[serde(other)]
    Unsupported,
}

/// A negative arc index means "arc `!index`, traversed backwards".
fn arc_id(index: i32) -> usize {
    if index >= 0 {
        index as usize
    } else {
        (!index) as usize
    }
}

impl Topology {
    /// Decode the shared arc pool: running-sum the deltas and apply the
    /// quantization transform when present.
    fn decoded_arcs(&self) -> Vec<Ring> {
        self.arcs
            .iter()
            .map(|arc| match &self.transform {
                Some(t) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                        })
                        .collect()
                }
                None => arc.clone(),
            })
            .collect()
    }

    fn object(&self, name: &str) -> Result<&TopoGeometry, TopologyError> {
        self.objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))
    }

    /// All polygons of the named object with arc indices resolved to
    /// coordinates.
    pub fn polygons(&self, name: &str) -> Result<Vec<Polygon>, TopologyError> {
        let decoded = self.decoded_arcs();
        let mut out = Vec::new();
        collect_polygons(self.object(name)?, &decoded, &mut out)?;
        Ok(out)
    }

    /// Every arc of the named object exactly once; a border shared by two
    /// countries is returned a single time.
    pub fn mesh(&self, name: &str) -> Result<Vec<Ring>, TopologyError> {
        let decoded = self.decoded_arcs();
        let mut seen = HashSet::new();
        let mut used = Vec::new();
        collect_arc_indices(self.object(name)?, &mut seen, &mut used);
        used.into_iter()
            .map(|id| {
                decoded
                    .get(id)
                    .cloned()
                    .ok_or(TopologyError::BadArcIndex(id as i32))
            })
            .collect()
    }
}

fn collect_arc_indices(geometry: &TopoGeometry, seen: &mut HashSet<usize>, out: &mut Vec<usize>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_arc_indices(g, seen, out);
            }
        }
        TopoGeometry::Polygon { arcs } => {
            for ring in arcs {
                for &index in ring {
                    let id = arc_id(index);
                    if seen.insert(id) {
                        out.push(id);
                    }
                }
            }
        }
        TopoGeometry::MultiPolygon { arcs } => {
            for polygon in arcs {
                for ring in polygon {
                    for &index in ring {
                        let id = arc_id(index);
                        if seen.insert(id) {
                            out.push(id);
                        }
                    }
                }
            }
        }
        TopoGeometry::Unsupported => {}
    }
}

/// Concatenate arcs into one ring, reversing negative indices and dropping
/// each join point shared with the previous arc.
fn stitch_ring(indices: &[i32], decoded: &[Ring]) -> Result<Ring, TopologyError> {
    let mut out: Ring = Vec::new();
    for &index in indices {
        let arc = decoded
            .get(arc_id(index))
            .ok_or(TopologyError::BadArcIndex(index))?;
        let mut points: Ring = if index >= 0 {
            arc.clone()
        } else {
            arc.iter().rev().cloned().collect()
        };
        if !out.is_empty() && !points.is_empty() {
            points.remove(0);
        }
        out.extend(points);
    }
    Ok(out)
}

fn collect_polygons(
    geometry: &TopoGeometry,
    decoded: &[Ring],
    out: &mut Vec<Polygon>,
) -> Result<(), TopologyError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_polygons(g, decoded, out)?;
            }
        }
        TopoGeometry::Polygon { arcs } => {
            let rings = arcs
                .iter()
                .map(|ring| stitch_ring(ring, decoded))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Polygon { rings });
        }
        TopoGeometry::MultiPolygon { arcs } => {
            for polygon in arcs {
                let rings = polygon
                    .iter()
                    .map(|ring| stitch_ring(ring, decoded))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(Polygon { rings });
            }
        }
        TopoGeometry::Unsupported => {}
    }
    Ok(())
}
