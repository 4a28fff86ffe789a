//! Helpers for splitting rows across cooperating workers.
//!
//! Rows are striped round-robin: worker `rank` of `size` holds global rows
//! `rank, rank + size, rank + 2 * size, ...`. Each shard is an ordinary
//! [`RaggedArray`]; nothing in the container knows it is a shard.
use crate::array::RaggedArray;
use crate::error::{RaggedError, Result};

fn check_rank(rank: usize, size: usize) -> Result<()> {
    if size == 0 {
        return Err(RaggedError::config("worker count must be at least 1"));
    }
    if rank >= size {
        return Err(RaggedError::config(format!(
            "rank {} is out of range for {} workers",
            rank, size
        )));
    }
    Ok(())
}

/// Number of rows worker `rank` holds when `total` rows are striped.
pub fn shard_len(total: usize, rank: usize, size: usize) -> usize {
    if rank >= total {
        0
    } else {
        (total - rank + size - 1) / size
    }
}

/// The rows of `array` that worker `rank` of `size` holds.
pub fn stripe<T: Clone>(array: &RaggedArray<T>, rank: usize, size: usize) -> Result<RaggedArray<T>> {
    check_rank(rank, size)?;
    let rows: Vec<usize> = (rank..array.len()).step_by(size).collect();
    Ok(array.select_rows(&rows))
}

/// Reassemble striped shards, indexed by rank, into the original array.
pub fn assemble_striped<T: Clone>(shards: &[RaggedArray<T>]) -> Result<RaggedArray<T>> {
    let size = shards.len();
    if size == 0 {
        return Ok(RaggedArray::new());
    }
    let total: usize = shards.iter().map(RaggedArray::len).sum();
    for (rank, shard) in shards.iter().enumerate() {
        let expected = shard_len(total, rank, size);
        if shard.len() != expected {
            return Err(RaggedError::invalid(format!(
                "shard {} holds {} rows; a round-robin stripe of {} rows over {} workers gives it {}",
                rank,
                shard.len(),
                total,
                size,
                expected
            )));
        }
    }
    let width = shards[0].width();
    if let Some(other) = shards.iter().find(|s| s.width() != width) {
        return Err(RaggedError::invalid(format!(
            "shards mix trailing widths {:?} and {:?}",
            width,
            other.width()
        )));
    }

    let mut flat = Vec::new();
    let mut lengths = Vec::with_capacity(total);
    for global in 0..total {
        let shard = &shards[global % size];
        let local = global / size;
        flat.extend_from_slice(shard.row(local as isize)?);
        lengths.push(shard.lengths()[local]);
    }
    match width {
        Some(width) => RaggedArray::from_parts_with_width(flat, width, lengths),
        None => RaggedArray::from_parts(flat, lengths),
    }
}

/// Map `(rank, local row)` pairs to global row indices, given how many rows
/// each worker holds.
pub fn convert_local_indices(pairs: &[(usize, usize)], shard_lengths: &[usize]) -> Result<Vec<usize>> {
    let size = shard_lengths.len();
    pairs
        .iter()
        .map(|&(rank, local)| {
            check_rank(rank, size)?;
            if local >= shard_lengths[rank] {
                return Err(RaggedError::RowOutOfBounds {
                    index: local as isize,
                    rows: shard_lengths[rank],
                });
            }
            Ok(local * size + rank)
        })
        .collect()
}

/// Collective communication between workers.
pub trait RowTransport {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Send `row` from `root` to every worker. Only `root` supplies a row;
    /// every worker receives it.
    fn broadcast<T: Clone>(&self, row: Option<Vec<T>>, root: usize) -> Result<Vec<T>>;
}

/// A transport with a single worker.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleProcess;

impl RowTransport for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast<T: Clone>(&self, row: Option<Vec<T>>, root: usize) -> Result<Vec<T>> {
        check_rank(root, 1)?;
        row.ok_or_else(|| RaggedError::config("root worker supplied no row to broadcast"))
    }
}

/// Give every worker a copy of row `row` of `owner`'s local array.
pub fn distribute_row<T, R>(transport: &R, array: &RaggedArray<T>, row: isize, owner: usize) -> Result<Vec<T>>
where
    T: Clone,
    R: RowTransport,
{
    check_rank(owner, transport.size())?;
    let local = if transport.rank() == owner {
        Some(array.row(row)?.to_vec())
    } else {
        None
    };
    log::trace!("distributing row {} from worker {}", row, owner);
    transport.broadcast(local, owner)
}
