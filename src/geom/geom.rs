use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree};

use crate::geom::BoundingBox;

/// Geometries represents a collection of zone MultiPolygons behind an R-tree
/// of bounding boxes for point-location queries.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons
    pub(crate) fn new(polygons: &[MultiPolygon<f64>]) -> Self {
        Self {
            rtree: RTree::bulk_load(
                polygons.iter().enumerate()
                    .filter_map(|(i, polygon)| polygon.bounding_rect()
                        .map(|bbox| BoundingBox::new(i, bbox)))
                    .collect()
            ),
            shapes: polygons.to_vec(),
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub(crate) fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Query the R-tree for bounding boxes intersecting the given envelope.
    #[inline]
    fn query(&self, envelope: &AABB<[f64; 2]>) -> impl Iterator<Item = &BoundingBox> {
        self.rtree.locate_in_envelope_intersecting(envelope)
    }

    /// Find the MultiPolygon containing the given point, if any.
    ///
    /// Ties between overlapping polygons resolve to the lowest record index,
    /// keeping point location deterministic.
    pub(crate) fn locate(&self, x: f64, y: f64) -> Option<usize> {
        let point = Point::new(x, y);
        self.query(&AABB::from_point([x, y]))
            .filter(|bbox| self.shapes[bbox.idx()].intersects(&point))
            .map(|bbox| bbox.idx())
            .min()
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    #[inline]
    pub(crate) fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|polygon| polygon.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }
}
