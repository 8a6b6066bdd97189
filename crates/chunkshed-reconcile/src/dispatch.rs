//! Per-chunk work dispatch
//!
//! Every pass runs one pure function per chunk. [`Execution`] decides how
//! those calls are scheduled; the results always come back indexed by
//! chunk, so the schedule never shows in the output.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

/// How per-chunk work is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// One chunk after another, in chunk order
    Sequential,
    /// On the rayon thread pool
    #[default]
    Parallel,
    /// One chunk after another, in an order shuffled from `seed`
    Shuffled {
        /// Seed of the shuffle
        seed: u64,
    },
}

impl Execution {
    /// Run `f` on every chunk index in `0..count`
    ///
    /// Element `i` of the result is `f(i)`, whatever order the calls ran in.
    pub fn map_chunks<R, F>(&self, count: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Send + Sync,
    {
        match *self {
            Execution::Sequential => (0..count).map(f).collect(),
            Execution::Parallel => (0..count).into_par_iter().map(f).collect(),
            Execution::Shuffled { seed } => {
                let mut order: Vec<usize> = (0..count).collect();
                let mut rng = StdRng::seed_from_u64(seed);
                order.shuffle(&mut rng);
                log::trace!("shuffled chunk order: {:?}", order);

                let mut results: Vec<(usize, R)> =
                    order.into_iter().map(|chunk| (chunk, f(chunk))).collect();
                results.sort_unstable_by_key(|&(chunk, _)| chunk);
                results.into_iter().map(|(_, r)| r).collect()
            }
        }
    }

    /// Like [`Execution::map_chunks`] for fallible work, stopping at the
    /// first error in chunk order
    pub fn try_map_chunks<T, E, F>(&self, count: usize, f: F) -> Result<Vec<T>, E>
    where
        T: Send,
        E: Send,
        F: Fn(usize) -> Result<T, E> + Send + Sync,
    {
        self.map_chunks(count, f).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn all_modes() -> Vec<Execution> {
        vec![
            Execution::Sequential,
            Execution::Parallel,
            Execution::Shuffled { seed: 1 },
            Execution::Shuffled { seed: 99 },
        ]
    }

    #[test]
    fn test_results_in_chunk_order() {
        for mode in all_modes() {
            let out = mode.map_chunks(17, |i| i * i);
            let expected: Vec<usize> = (0..17).map(|i| i * i).collect();
            assert_eq!(out, expected, "{:?}", mode);
        }
    }

    #[test]
    fn test_shuffled_visits_out_of_order() {
        let visited = Mutex::new(Vec::new());
        Execution::Shuffled { seed: 5 }.map_chunks(32, |i| {
            visited.lock().unwrap().push(i);
        });
        let visited = visited.into_inner().unwrap();
        let mut sorted = visited.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
        assert_ne!(visited, sorted);
    }

    #[test]
    fn test_try_map_chunks() {
        let ok: Result<Vec<usize>, String> = Execution::Parallel.try_map_chunks(4, Ok);
        assert_eq!(ok.unwrap(), vec![0, 1, 2, 3]);

        let err: Result<Vec<usize>, String> = Execution::Sequential.try_map_chunks(4, |i| {
            if i >= 2 { Err(format!("chunk {}", i)) } else { Ok(i) }
        });
        assert_eq!(err.unwrap_err(), "chunk 2");
    }

    #[test]
    fn test_empty() {
        for mode in all_modes() {
            assert!(mode.map_chunks(0, |i| i).is_empty());
        }
    }
}
