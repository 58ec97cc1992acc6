//! Runs kernels over whole frames, serially or on a worker.
//!
//! Row kernels get one target row at a time, or the whole plane in one call
//! when neither side is padded and nothing needs reordering. Multi-row kernels
//! get one row group at a time together with the matching rows of every
//! target plane. Flipping is resolved through the source row index; mirroring
//! is a post-pass over finished target rows.

use common::parallel::{chunk_rows, ParRowChunksMut};
use rayon::prelude::*;

use crate::conversion::config::DispatchConfig;
use crate::conversion::flag::ConversionFlag;
use crate::conversion::kernels::{
    KernelParams, MultiRowKernelFn, RowGroup, RowKernelFn, RowReverseFn, SourcePlane, TargetRows,
};
use crate::conversion::worker::Worker;

/// Where conversions run and how eagerly they are split.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Executor<'a> {
    pub worker: Option<&'a Worker>,
    pub config: &'a DispatchConfig,
}

impl<'a> Executor<'a> {
    /// The worker, if `units` work units are enough to use it.
    fn parallel_worker(&self, units: usize) -> Option<&'a Worker> {
        self.worker
            .filter(|_| self.config.should_parallelize(units))
    }

    fn units_per_chunk(&self, units: usize) -> usize {
        chunk_rows(units, self.config.min_rows_per_chunk, self.config.max_chunks)
    }
}

/// One writable plane of the target frame.
#[derive(Debug)]
pub(crate) struct TargetPlane<'a> {
    /// Exactly `stride * rows` bytes.
    pub data: &'a mut [u8],
    pub stride: usize,
    pub row_bytes: usize,
    /// Pixels per row.
    pub width: usize,
    /// Reverses a row in place; required for mirrored conversions.
    pub reverse: Option<RowReverseFn>,
}

/// Row geometry and reversal of one target plane, shared by every group.
#[derive(Debug, Clone, Copy)]
struct Mirror {
    reverse: Option<RowReverseFn>,
    width: usize,
}

impl Mirror {
    #[inline]
    fn apply(&self, row: &mut [u8]) {
        if let Some(reverse) = self.reverse {
            reverse(row, self.width);
        }
    }
}

// ===============================================================================================
// Row kernels
// ===============================================================================================

/// Single-plane conversion with a row kernel.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_rows(
    kernel: RowKernelFn,
    source: SourcePlane<'_>,
    target: TargetPlane<'_>,
    width: usize,
    height: usize,
    flag: ConversionFlag,
    params: &KernelParams,
    executor: Executor<'_>,
) {
    let TargetPlane {
        data,
        stride,
        row_bytes,
        width: target_width,
        reverse,
    } = target;
    let mirror = flag.mirrored().then_some(Mirror {
        reverse,
        width: target_width,
    });

    let convert_row = |row: usize, dst: &mut [u8]| {
        let src = source.row(flag.source_row(row, height));
        let dst = &mut dst[..row_bytes];
        kernel(src, dst, width, params);
        if let Some(mirror) = &mirror {
            mirror.apply(dst);
        }
    };

    if let Some(worker) = executor.parallel_worker(height) {
        worker.execute(|| {
            let rows_per_chunk = executor.units_per_chunk(height);
            tracing::trace!(height, rows_per_chunk, "parallel row dispatch");
            data.par_row_chunks_mut(stride, rows_per_chunk)
                .for_each(|(first_row, chunk)| {
                    for (offset, dst) in chunk.chunks_mut(stride).enumerate() {
                        convert_row(first_row + offset, dst);
                    }
                });
        });
        return;
    }

    let continuous = source.stride == source.row_bytes && stride == row_bytes;
    if flag == ConversionFlag::Normal && continuous {
        kernel(&source.data[..source.row_bytes * height], data, width * height, params);
        return;
    }

    for (row, dst) in data.chunks_mut(stride).enumerate() {
        convert_row(row, dst);
    }
}

// ===============================================================================================
// Multi-row kernels
// ===============================================================================================

/// Multi-plane (or multi-row) conversion, one kernel call per row group.
///
/// Each target plane contributes `rows_per_iteration / vertical_subsampling`
/// rows to a group, given per plane in `group_rows`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_multi_row<'t>(
    kernel: MultiRowKernelFn,
    rows_per_iteration: usize,
    sources: &[SourcePlane<'_>],
    targets: Vec<TargetPlane<'t>>,
    group_rows: &[usize],
    width: usize,
    height: usize,
    flag: ConversionFlag,
    params: &KernelParams,
    executor: Executor<'_>,
) {
    debug_assert_eq!(targets.len(), group_rows.len());
    debug_assert_eq!(height % rows_per_iteration, 0);

    let iterations = height / rows_per_iteration;
    let mirrors: Option<Vec<Mirror>> = flag.mirrored().then(|| {
        targets
            .iter()
            .map(|target| Mirror {
                reverse: target.reverse,
                width: target.width,
            })
            .collect()
    });

    let mut groups: Vec<Vec<TargetRows<'t>>> = (0..iterations)
        .map(|_| Vec::with_capacity(targets.len()))
        .collect();
    for (target, &rows) in targets.into_iter().zip(group_rows) {
        let TargetPlane {
            data,
            stride,
            row_bytes,
            ..
        } = target;
        for (group, chunk) in groups.iter_mut().zip(data.chunks_mut(stride * rows)) {
            group.push(TargetRows {
                data: chunk,
                stride,
                row_bytes,
            });
        }
    }

    let flipped = flag.flipped();
    let convert_group = |(index, mut rows): (usize, Vec<TargetRows<'t>>)| {
        let group = RowGroup {
            index,
            rows_per_iteration,
            width,
            height,
            flipped,
        };
        kernel(sources, &mut rows, &group, params);

        if let Some(mirrors) = &mirrors {
            for (plane, mirror) in rows.iter_mut().zip(mirrors) {
                let plane_rows = plane.data.len().div_ceil(plane.stride);
                for local in 0..plane_rows {
                    mirror.apply(plane.row_mut(local));
                }
            }
        }
    };

    match executor.parallel_worker(iterations) {
        Some(worker) => worker.execute(|| {
            let min_len = executor.units_per_chunk(iterations);
            tracing::trace!(iterations, min_len, "parallel multi-row dispatch");
            groups
                .into_par_iter()
                .with_min_len(min_len)
                .enumerate()
                .for_each(convert_group);
        }),
        None => groups.into_iter().enumerate().for_each(convert_group),
    }
}
