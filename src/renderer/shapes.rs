//! Shape generation for 2D primitives
//!
//! Outlines are given in local sprite space (y-down, nose toward -y) and
//! rotated by the sprite rotation, so they line up with `heading_from_rotation`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Rotate a local-space point by a sprite rotation and move it to `center`
#[inline]
pub fn transform(local: Vec2, center: Vec2, rotation: f32) -> Vec2 {
    center + Vec2::from_angle(rotation).rotate(local)
}

/// Generate vertices for a convex polygon (triangle fan from the first point)
pub fn convex_polygon(
    outline: &[Vec2],
    center: Vec2,
    rotation: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    if outline.len() < 3 {
        return Vec::new();
    }

    let points: Vec<Vec2> = outline
        .iter()
        .map(|p| transform(*p, center, rotation))
        .collect();

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        vertices.push(Vertex::new(points[0].x, points[0].y, color));
        vertices.push(Vertex::new(points[i].x, points[i].y, color));
        vertices.push(Vertex::new(points[i + 1].x, points[i + 1].y, color));
    }
    vertices
}

/// Generate vertices for a rotated rectangle
pub fn quad(
    center: Vec2,
    half_width: f32,
    half_height: f32,
    rotation: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    convex_polygon(
        &[
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ],
        center,
        rotation,
        color,
    )
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Player ship: swept-wing triangle with cockpit and a flickering engine
pub fn ship(center: Vec2, rotation: f32, engine_flicker: f32, colors: ShipColors) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);

    let flame = 10.0 + 6.0 * engine_flicker;
    vertices.extend(convex_polygon(
        &[
            Vec2::new(-6.0, 14.0),
            Vec2::new(6.0, 14.0),
            Vec2::new(0.0, 14.0 + flame),
        ],
        center,
        rotation,
        colors.engine,
    ));

    // Concave hull split into two convex halves around the spine
    vertices.extend(convex_polygon(
        &[
            Vec2::new(0.0, -24.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(-18.0, 18.0),
        ],
        center,
        rotation,
        colors.hull,
    ));
    vertices.extend(convex_polygon(
        &[
            Vec2::new(0.0, -24.0),
            Vec2::new(18.0, 18.0),
            Vec2::new(0.0, 10.0),
        ],
        center,
        rotation,
        colors.hull,
    ));

    vertices.extend(convex_polygon(
        &[
            Vec2::new(0.0, -12.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(-4.0, 0.0),
        ],
        center,
        rotation,
        colors.cockpit,
    ));

    vertices
}

/// Enemy: arrowhead pointing along its rotation with a glowing core
pub fn enemy(center: Vec2, rotation: f32, pulse: f32, hull: [f32; 4], core: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = convex_polygon(
        &[
            Vec2::new(0.0, -16.0),
            Vec2::new(14.0, 12.0),
            Vec2::new(0.0, 6.0),
        ],
        center,
        rotation,
        hull,
    );
    vertices.extend(convex_polygon(
        &[
            Vec2::new(0.0, -16.0),
            Vec2::new(0.0, 6.0),
            Vec2::new(-14.0, 12.0),
        ],
        center,
        rotation,
        hull,
    ));
    vertices.extend(circle(center, 3.0 + pulse, core, 8));
    vertices
}

/// Color set for the player ship
#[derive(Debug, Clone, Copy)]
pub struct ShipColors {
    pub hull: [f32; 4],
    pub cockpit: [f32; 4],
    pub engine: [f32; 4],
}
