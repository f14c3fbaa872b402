//! World map layers: filled country meshes and boundary outlines.

use bevy::asset::RenderAssetUsages;
use bevy::color::Alpha;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use earcutr::earcut;

use crate::core::components::MapBody;
use crate::core::resources::Canvas;
use crate::geo::projection::Projection;
use crate::geo::topology::Polygon;
use crate::render::transition::MapFade;

/// Country border color; opacity comes from the outline fade channel.
const OUTLINE_COLOR: Color = Color::WHITE;

/// Boundary polylines in world coordinates, redrawn as gizmos each frame.
#[derive(Resource, Default)]
pub struct MapOutline(pub Vec<Vec<Vec2>>);

/// Project a country polygon and triangulate it, holes included.
/// Returns vertex positions and triangle indices, or None for degenerate
/// rings the tessellator rejects.
pub fn tessellate(
    canvas: &Canvas,
    projection: &Projection,
    polygon: &Polygon,
) -> Option<(Vec<[f32; 3]>, Vec<u32>)> {
    let mut coords_2d: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();
    let mut vertices: Vec<[f32; 3]> = Vec::new();

    for (ring_i, ring) in polygon.rings.iter().enumerate() {
        let mut points = ring.clone();
        // Drop a closing duplicate point if present
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            continue;
        }
        if ring_i > 0 {
            hole_indices.push(vertices.len());
        }
        for p in points {
            let (x, y) = projection.project(p[0], p[1]);
            let w = canvas.canvas_to_world(Vec2::new(x as f32, y as f32));
            coords_2d.push(w.x as f64);
            coords_2d.push(w.y as f64);
            vertices.push([w.x, w.y, 0.0]);
        }
    }
    if vertices.len() < 3 {
        return None;
    }

    let indices = earcut(&coords_2d, &hole_indices, 2).ok()?;
    if indices.is_empty() {
        return None;
    }
    Some((vertices, indices.into_iter().map(|i| i as u32).collect()))
}

/// Spawn one filled mesh per country, behind the graph, fully transparent.
/// The body fade channel drives their opacity afterwards.
pub fn spawn_map_body(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    canvas: &Canvas,
    projection: &Projection,
    polygons: &[Polygon],
    color: Color,
) {
    for polygon in polygons {
        let Some((vertices, indices)) = tessellate(canvas, projection, polygon) else {
            continue;
        };
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vertices)
            .with_inserted_indices(Indices::U32(indices));
        commands.spawn((
            Mesh2d(meshes.add(mesh)),
            MeshMaterial2d(materials.add(ColorMaterial::from(color.with_alpha(0.0)))),
            Transform::from_xyz(0.0, 0.0, -1.0),
            MapBody,
        ));
    }
}

/// Push the body fade value into every country material.
pub fn apply_map_fade_system(
    fade: Res<MapFade>,
    bodies: Query<&MeshMaterial2d<ColorMaterial>, With<MapBody>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let alpha = fade.body.value();
    for handle in &bodies {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.color.set_alpha(alpha);
        }
    }
}

/// Draw country boundaries as polylines with the outline fade alpha.
pub fn draw_map_outline_system(
    fade: Res<MapFade>,
    outline: Res<MapOutline>,
    mut gizmos: Gizmos,
) {
    let alpha = fade.outline.value();
    if alpha <= f32::EPSILON {
        return;
    }
    let color = OUTLINE_COLOR.with_alpha(alpha);
    for line in &outline.0 {
        if line.len() < 2 {
            continue;
        }
        gizmos.linestrip_2d(line.iter().copied(), color);
    }
}
