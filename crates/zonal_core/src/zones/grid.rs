use geo::{Coord, LineString, Polygon, Rect};

use super::ZoneId;
use crate::error::ZonalError;

/// Upper limit on the number of cells in one grid.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Square cells of edge `cell_size` covering `bounds` snapped outward to the
/// cell lattice.
///
/// A bounding box whose upper edge already lies on the lattice gets no extra
/// column or row, so a single node sitting exactly on a lattice point yields
/// no cells at all. Fails with [`ZonalError::GridTooLarge`] when the grid would
/// exceed [`MAX_GRID_CELLS`].
pub(super) fn square_cells(
    bounds: Rect<f64>,
    cell_size: f64,
) -> Result<Vec<(ZoneId, Polygon<f64>)>, ZonalError> {
    let (min, max) = (bounds.min(), bounds.max());
    let min_x = (min.x / cell_size).floor() * cell_size;
    let min_y = (min.y / cell_size).floor() * cell_size;
    let max_x = (max.x / cell_size).ceil() * cell_size;
    let max_y = (max.y / cell_size).ceil() * cell_size;

    // Float to int casts saturate, so a huge span ends up rejected below.
    let columns = ((max_x - min_x) / cell_size).round() as usize;
    let rows = ((max_y - min_y) / cell_size).round() as usize;
    let count = columns
        .checked_mul(rows)
        .filter(|count| *count <= MAX_GRID_CELLS)
        .ok_or(ZonalError::GridTooLarge { columns, rows })?;

    let mut cells = Vec::with_capacity(count);
    for column in 0..columns {
        let left = min_x + column as f64 * cell_size;
        for row in 0..rows {
            let bottom = min_y + row as f64 * cell_size;
            let id = ZoneId::from((cells.len() + 1).to_string());
            cells.push((id, square(left, bottom, cell_size)));
        }
    }
    Ok(cells)
}

fn square(left: f64, bottom: f64, size: f64) -> Polygon<f64> {
    let ring = LineString::from(vec![
        Coord { x: left, y: bottom },
        Coord { x: left + size, y: bottom },
        Coord { x: left + size, y: bottom + size },
        Coord { x: left, y: bottom + size },
        Coord { x: left, y: bottom },
    ]);
    Polygon::new(ring, Vec::new())
}
