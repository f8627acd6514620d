//! Raw pixel grid generators.
//!
//! Values are raw MODIS integers (AOD = raw × 0.001), row 0 at the top.

/// Creates a grid where every cell is `f(row, col)`.
pub fn raw_grid(width: usize, height: usize, f: impl Fn(usize, usize) -> i32) -> Vec<Vec<i32>> {
    (0..height)
        .map(|row| (0..width).map(|col| f(row, col)).collect())
        .collect()
}

/// Creates a grid with predictable values: `100 + col * 10 + row`.
///
/// ```
/// use test_utils::gradient_grid;
///
/// let grid = gradient_grid(4, 3);
/// assert_eq!(grid[0][0], 100);
/// assert_eq!(grid[0][1], 110);
/// assert_eq!(grid[2][0], 102);
/// ```
pub fn gradient_grid(width: usize, height: usize) -> Vec<Vec<i32>> {
    raw_grid(width, height, |row, col| 100 + (col * 10 + row) as i32)
}

/// Creates a grid filled with `nodata` except for the listed `(row, col, raw)` cells.
pub fn sparse_grid(
    width: usize,
    height: usize,
    nodata: i32,
    cells: &[(usize, usize, i32)],
) -> Vec<Vec<i32>> {
    let mut grid = vec![vec![nodata; width]; height];
    for &(row, col, raw) in cells {
        grid[row][col] = raw;
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_grid_dimensions() {
        let grid = gradient_grid(10, 5);
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|r| r.len() == 10));
        assert_eq!(grid[4][9], 100 + 90 + 4);
    }

    #[test]
    fn test_sparse_grid() {
        let grid = sparse_grid(3, 2, -1, &[(1, 2, 500)]);
        assert_eq!(grid, vec![vec![-1, -1, -1], vec![-1, -1, 500]]);
    }
}
