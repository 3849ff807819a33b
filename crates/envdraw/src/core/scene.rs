//! Retained scene of tagged shapes
//!
//! The scene is the in-memory drawing surface: shapes are kept in draw order
//! with their owner tag so a node or connector can be cleared, moved or
//! excluded from occupancy queries as a unit.

use serde::Serialize;

use super::{OccupancyIndex, Rect, Shape, ShapeTag, Surface};

/// A single drawn shape and its owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneItem {
    pub tag: ShapeTag,
    #[serde(flatten)]
    pub shape: Shape,
}

/// In-memory surface and occupancy index
#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: Vec<SceneItem>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes in draw order
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    /// Shapes owned by `tag`, in draw order
    pub fn shapes_for(&self, tag: ShapeTag) -> impl Iterator<Item = &Shape> + '_ {
        self.items
            .iter()
            .filter(move |item| item.tag == tag)
            .map(|item| &item.shape)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounding box of everything drawn, or `None` for an empty scene
    pub fn bounds(&self) -> Option<Rect> {
        self.items
            .iter()
            .map(|item| item.shape.bounds())
            .reduce(Rect::union)
    }

    /// Occupancy view that ignores the shapes owned by `tag`
    pub fn without(&self, tag: ShapeTag) -> SceneView<'_> {
        SceneView {
            scene: self,
            excluded: Some(tag),
        }
    }

    fn count_where(&self, area: &Rect, excluded: Option<ShapeTag>) -> usize {
        self.items
            .iter()
            .filter(|item| Some(item.tag) != excluded)
            .filter(|item| item.shape.overlaps(area))
            .count()
    }
}

impl Surface for Scene {
    fn draw(&mut self, tag: ShapeTag, shape: Shape) {
        self.items.push(SceneItem { tag, shape });
    }

    fn clear(&mut self, tag: ShapeTag) {
        self.items.retain(|item| item.tag != tag);
    }

    fn translate(&mut self, tag: ShapeTag, dx: i32, dy: i32) {
        for item in self.items.iter_mut().filter(|item| item.tag == tag) {
            item.shape.translate(dx, dy);
        }
    }
}

impl OccupancyIndex for Scene {
    fn count_overlapping(&self, area: &Rect) -> usize {
        self.count_where(area, None)
    }

    fn shape_count(&self) -> usize {
        self.items.len()
    }
}

/// Borrowed scene with one owner's shapes hidden
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    scene: &'a Scene,
    excluded: Option<ShapeTag>,
}

impl OccupancyIndex for SceneView<'_> {
    fn count_overlapping(&self, area: &Rect) -> usize {
        self.scene.count_where(area, self.excluded)
    }

    fn shape_count(&self) -> usize {
        self.scene
            .items
            .iter()
            .filter(|item| Some(item.tag) != self.excluded)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;
    use crate::diagram::{ConnectorId, NodeId};

    fn frame_box(scene: &mut Scene, id: usize, origin: Point) {
        scene.draw(
            ShapeTag::Node(NodeId::new(id)),
            Shape::Rect {
                bounds: Rect::from_origin(origin, 150, 40),
            },
        );
    }

    #[test]
    fn test_draw_and_count() {
        let mut scene = Scene::new();
        assert!(OccupancyIndex::is_empty(&scene));
        frame_box(&mut scene, 0, Point::new(50, 50));
        frame_box(&mut scene, 1, Point::new(300, 50));

        assert_eq!(scene.count_overlapping(&Rect::new(0, 0, 800, 600)), 2);
        assert_eq!(scene.count_overlapping(&Rect::around(Point::new(60, 60), 2)), 1);
        assert_eq!(scene.count_overlapping(&Rect::around(Point::new(250, 60), 2)), 0);
    }

    #[test]
    fn test_clear_removes_only_owner() {
        let mut scene = Scene::new();
        frame_box(&mut scene, 0, Point::new(50, 50));
        frame_box(&mut scene, 1, Point::new(300, 50));
        scene.clear(ShapeTag::Node(NodeId::new(0)));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.shapes_for(ShapeTag::Node(NodeId::new(1))).count(), 1);
    }

    #[test]
    fn test_translate_moves_owner() {
        let mut scene = Scene::new();
        frame_box(&mut scene, 0, Point::new(50, 50));
        scene.translate(ShapeTag::Node(NodeId::new(0)), 100, 10);
        assert_eq!(scene.bounds(), Some(Rect::new(150, 60, 300, 100)));
    }

    #[test]
    fn test_view_excludes_connector() {
        let mut scene = Scene::new();
        let tag = ShapeTag::Connector(ConnectorId::new(0));
        scene.draw(
            tag,
            Shape::Polyline {
                points: vec![Point::new(0, 100), Point::new(200, 100)],
            },
        );
        let probe = Rect::around(Point::new(100, 100), 2);
        assert_eq!(scene.count_overlapping(&probe), 1);
        assert_eq!(scene.without(tag).count_overlapping(&probe), 0);
        assert_eq!(scene.without(tag).shape_count(), 0);
    }
}
