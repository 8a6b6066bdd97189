//! Neighborhoods on an N-dimensional grid

/// Which cells count as adjacent during a flood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Cells sharing a face: 2·N neighbors (4-way in 2D)
    #[default]
    Face,
    /// Every cell of the surrounding 3^N block: 3^N - 1 neighbors (8-way in 2D)
    Full,
}

impl Connectivity {
    /// Neighbor offsets for an `ndim`-dimensional grid
    ///
    /// The order is fixed: face offsets go axis by axis, `-1` before `+1`;
    /// full offsets are lexicographic over `{-1, 0, 1}^N` with the zero
    /// offset left out.
    pub fn offsets(self, ndim: usize) -> Vec<Vec<isize>> {
        match self {
            Connectivity::Face => {
                let mut out = Vec::with_capacity(2 * ndim);
                for axis in 0..ndim {
                    for step in [-1isize, 1] {
                        let mut offset = vec![0isize; ndim];
                        offset[axis] = step;
                        out.push(offset);
                    }
                }
                out
            }
            Connectivity::Full => {
                if ndim == 0 {
                    return Vec::new();
                }
                let mut out = Vec::new();
                let mut offset = vec![-1isize; ndim];
                loop {
                    if offset.iter().any(|&o| o != 0) {
                        out.push(offset.clone());
                    }
                    // Odometer increment, last axis fastest.
                    let mut axis = ndim;
                    loop {
                        if axis == 0 {
                            return out;
                        }
                        axis -= 1;
                        if offset[axis] < 1 {
                            offset[axis] += 1;
                            break;
                        }
                        offset[axis] = -1;
                    }
                }
            }
        }
    }
}
