use crate::Point;
use ndarray as nd;

/// Packs point coordinates into an `(N, 2)` array of `(x, y)` rows.
pub fn points_to_array(points: &[Point]) -> nd::Array2<f64> {
    let mut arr = nd::Array2::from_elem((points.len(), 2), 0.);

    for (i, p) in points.iter().enumerate() {
        arr[[i, 0]] = p.x;
        arr[[i, 1]] = p.y;
    }

    arr
}

/// Unpacks an `(N, 2)` array into points without temperature.
pub fn array_to_points(arr: nd::ArrayView2<f64>) -> Vec<Point> {
    arr.outer_iter()
        .map(|row| Point::new(row[0], row[1]))
        .collect()
}
