//! Serial and row-band parallel schedulings of one LIC pass.
//!
//! Both executors run the exact same per-pixel computation from
//! [`LicEngine`], so their outputs are bit-identical. The parallel executor
//! splits the output into contiguous row bands, one rayon task per band, each
//! with its own trajectory scratch buffer. Bands write disjoint slices of the
//! output; the vector field and texture are shared read-only. Input shapes
//! are checked before any row is scheduled.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use lic_core::{Backend, Executor, LicConfig, LicError, ScalarField, VectorField};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::engine::LicEngine;
use crate::integrator::Trajectory;

/// A pass whose rows can be rendered independently, each worker holding its
/// own trajectory scratch buffer.
trait RowRenderer: Sync {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn scratch(&self) -> Trajectory;
    fn render_row(
        &self,
        row: usize,
        out: &mut [f64],
        scratch: &mut Trajectory,
    ) -> Result<(), LicError>;
}

impl RowRenderer for LicEngine<'_> {
    fn rows(&self) -> usize {
        LicEngine::rows(self)
    }

    fn cols(&self) -> usize {
        LicEngine::cols(self)
    }

    fn scratch(&self) -> Trajectory {
        LicEngine::scratch(self)
    }

    fn render_row(
        &self,
        row: usize,
        out: &mut [f64],
        scratch: &mut Trajectory,
    ) -> Result<(), LicError> {
        LicEngine::render_row(self, row, out, scratch)
    }
}

/// Renders every row in order on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn run(
        &self,
        vfield: &VectorField,
        texture: &ScalarField,
        config: &LicConfig,
    ) -> Result<ScalarField, LicError> {
        let engine = LicEngine::new(vfield, texture, config)?;
        render_rows(&engine)
    }
}

/// Renders contiguous row bands concurrently on the rayon pool.
///
/// The band count is `workers` if set, else the config's `num_workers`, else
/// the rayon thread count, capped at the number of rows. With a single band
/// the work runs serially.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelExecutor {
    workers: Option<usize>,
}

impl ParallelExecutor {
    pub fn new(workers: Option<usize>) -> Self {
        Self { workers }
    }

    fn band_count(&self, config: &LicConfig) -> usize {
        self.workers
            .or(config.num_workers())
            .unwrap_or_else(rayon::current_num_threads)
            .clamp(1, config.rows().max(1))
    }
}

impl Executor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn run(
        &self,
        vfield: &VectorField,
        texture: &ScalarField,
        config: &LicConfig,
    ) -> Result<ScalarField, LicError> {
        let engine = LicEngine::new(vfield, texture, config)?;
        let bands = band_ranges(engine.rows(), self.band_count(config));
        if bands.len() <= 1 {
            info!("single worker available, running parallel backend serially");
            return render_rows(&engine);
        }
        debug!(bands = bands.len(), rows = engine.rows(), "parallel band layout");
        render_bands(&engine, &bands)
    }
}

/// Row-major render on the calling thread; stops at the first failing row.
fn render_rows(renderer: &impl RowRenderer) -> Result<ScalarField, LicError> {
    let cols = renderer.cols();
    let mut out = ScalarField::new(renderer.rows(), cols)?;
    let mut scratch = renderer.scratch();
    for (row, cells) in out.data_mut().chunks_mut(cols).enumerate() {
        renderer.render_row(row, cells, &mut scratch)?;
    }
    Ok(out)
}

/// One rayon task per band. The first failure raises the abort flag so the
/// other bands stop at their next row; only that failure is returned. A
/// panicking band becomes `LicError::Worker`.
fn render_bands(
    renderer: &impl RowRenderer,
    bands: &[Range<usize>],
) -> Result<ScalarField, LicError> {
    let cols = renderer.cols();
    let mut out = ScalarField::new(renderer.rows(), cols)?;

    let abort = AtomicBool::new(false);
    let failure: Mutex<Option<LicError>> = Mutex::new(None);

    let joined = panic::catch_unwind(AssertUnwindSafe(|| {
        split_bands(out.data_mut(), bands, cols)
            .into_par_iter()
            .for_each(|(rows, cells)| {
                let mut scratch = renderer.scratch();
                for (row, row_cells) in rows.zip(cells.chunks_mut(cols)) {
                    if abort.load(Ordering::Relaxed) {
                        return;
                    }
                    if let Err(e) = renderer.render_row(row, row_cells, &mut scratch) {
                        abort.store(true, Ordering::Relaxed);
                        record_failure(&failure, e);
                        return;
                    }
                }
            });
    }));

    if let Err(payload) = joined {
        return Err(LicError::Worker(panic_message(payload.as_ref())));
    }
    let failure = failure
        .into_inner()
        .map_err(|_| LicError::Worker("failure slot poisoned".into()))?;
    match failure {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

/// The executor implementing `backend`.
pub fn executor_for(backend: Backend) -> Box<dyn Executor + Send + Sync> {
    match backend {
        Backend::Serial => Box::new(SerialExecutor),
        Backend::Parallel => Box::new(ParallelExecutor::default()),
    }
}

/// Splits `0..rows` into `bands` contiguous ranges whose sizes differ by at most one.
///
/// Earlier bands take the extra rows. Empty bands are never produced.
pub fn band_ranges(rows: usize, bands: usize) -> Vec<Range<usize>> {
    let bands = bands.clamp(1, rows.max(1));
    let base = rows / bands;
    let extra = rows % bands;
    let mut start = 0;
    (0..bands)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .filter(|r| !r.is_empty())
        .collect()
}

/// Cuts the row-major `data` into one mutable slice per band.
fn split_bands<'d>(
    mut data: &'d mut [f64],
    bands: &[Range<usize>],
    cols: usize,
) -> Vec<(Range<usize>, &'d mut [f64])> {
    let mut out = Vec::with_capacity(bands.len());
    for band in bands {
        let (head, tail) = std::mem::take(&mut data).split_at_mut(band.len() * cols);
        out.push((band.clone(), head));
        data = tail;
    }
    out
}

/// Keeps the first error reported by any band.
fn record_failure(slot: &Mutex<Option<LicError>>, err: LicError) {
    if let Ok(mut guard) = slot.lock() {
        guard.get_or_insert(err);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}
