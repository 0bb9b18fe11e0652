//! Shape generation for 2D primitives

use super::surface::{Color, DrawList};
use super::vertex::Vertex;
use crate::sim::Aabb;

/// Two triangles covering `rect`
pub fn quad(rect: &Aabb, color: Color) -> [Vertex; 6] {
    let (min, max) = (rect.min, rect.max);
    [
        Vertex::colored(min.x, min.y, color),
        Vertex::colored(max.x, min.y, color),
        Vertex::colored(min.x, max.y, color),
        Vertex::colored(min.x, max.y, color),
        Vertex::colored(max.x, min.y, color),
        Vertex::colored(max.x, max.y, color),
    ]
}

/// Triangle list for every rectangle in a recorded frame, in draw order.
/// Text commands are skipped; the frontend renders labels separately.
pub fn draw_list_vertices(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(list.commands().len() * 6);
    for (rect, color) in list.rects() {
        vertices.extend_from_slice(&quad(rect, *color));
    }
    vertices
}
