use crate::foundation::error::{GenieError, GenieResult};

/// Subdivided unit quad: `(cols + 1) * (rows + 1)` vertices, two triangles per cell.
///
/// Positions and UVs are identical (`(col / cols, row / rows)`); the vertex stage derives pixel
/// positions from them.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMesh {
    pub cols: u32,
    pub rows: u32,
    pub positions: Vec<[f32; 2]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Build a grid; zero counts are raised to one.
    ///
    /// Fails with [`GenieError::Usage`] when the vertex count does not fit a `u32` index.
    pub fn new(cols: u32, rows: u32) -> GenieResult<Self> {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let too_large = || GenieError::usage(format!("mesh {cols}x{rows} exceeds u32 indices"));
        let column_count = cols.checked_add(1).ok_or_else(too_large)?;
        let row_count = rows.checked_add(1).ok_or_else(too_large)?;
        column_count.checked_mul(row_count).ok_or_else(too_large)?;
        let index_count = usize::try_from(u64::from(cols) * u64::from(rows) * 6)
            .map_err(|_| too_large())?;

        let vertex_count = column_count as usize * row_count as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        for row in 0..row_count {
            let v = row as f32 / rows as f32;
            for col in 0..column_count {
                let u = col as f32 / cols as f32;
                positions.push([u, v]);
            }
        }
        let uvs = positions.clone();

        let mut indices = Vec::with_capacity(index_count);
        for row in 0..rows {
            for col in 0..cols {
                let top_left = row * column_count + col;
                let top_right = top_left + 1;
                let bottom_left = top_left + column_count;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Ok(Self {
            cols,
            rows,
            positions,
            uvs,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mesh.rs"]
mod tests;
