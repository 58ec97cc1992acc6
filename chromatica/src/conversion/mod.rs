//! Frame conversion: options, registry lookup and dispatch.
//!
//! [`FrameConverter`] is the entry point. It validates the request, looks the
//! kernel up in the process-wide [`registry`] and runs it over the frame,
//! serially or on the converter's [`Worker`].

#[cfg(feature = "bench")]
pub mod bench;
mod config;
mod dispatch;
mod flag;
pub(crate) mod kernels;
mod options;
mod registry;
pub(crate) mod simd;
mod worker;


pub use config::{DispatchConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use flag::ConversionFlag;
pub use options::{
    Options, OptionsKind, OptionsVariant, DEFAULT_ALPHA, MAX_BLACK_LEVEL, MAX_WHITE_BALANCE,
};
pub use registry::{
    registry, ConversionKey, ConversionRegistry, KernelArity, KernelEntry, Precision,
};
pub use worker::Worker;

use crate::common::{Error, PixelFormat, Result};
use crate::frame::{Frame, FrameType, PixelOrigin};
use dispatch::{Executor, TargetPlane};
use kernels::reverse::reverse_kernel_for;
use kernels::{KernelParams, SourcePlane};
use registry::KernelRef;

/// Converts frames between pixel formats and origins.
///
/// Without a worker every conversion runs on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct FrameConverter {
    worker: Option<Worker>,
    config: DispatchConfig,
}

impl FrameConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter running large frames on `worker`.
    pub fn with_worker(worker: Worker) -> Self {
        Self {
            worker: Some(worker),
            config: DispatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    #[inline]
    pub fn worker(&self) -> Option<&Worker> {
        self.worker.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Whether a kernel converts frames of `source` to `target_format` under
    /// `options`, that is whether [`convert_and_copy`](Self::convert_and_copy)
    /// into a target of the same origin can succeed.
    pub fn is_supported(
        &self,
        source: &FrameType,
        target_format: PixelFormat,
        options: &Options,
    ) -> bool {
        options.validate().is_ok()
            && registry()
                .lookup(source.format(), target_format, options)
                .is_some()
    }

    /// Converts `source` into a new frame.
    ///
    /// When format and origin already match, the result references `source`
    /// (or is an owned copy with `force_copy`).
    pub fn convert<'s>(
        &self,
        source: &'s Frame<'_>,
        target_format: PixelFormat,
        target_origin: PixelOrigin,
        force_copy: bool,
        options: &Options,
    ) -> Result<Frame<'s>> {
        self.convert_with_flag(
            source,
            target_format,
            target_origin,
            ConversionFlag::Normal,
            force_copy,
            options,
        )
    }

    /// [`convert`](Self::convert) with an additional geometric remapping.
    pub fn convert_with_flag<'s>(
        &self,
        source: &'s Frame<'_>,
        target_format: PixelFormat,
        target_origin: PixelOrigin,
        flag: ConversionFlag,
        force_copy: bool,
        options: &Options,
    ) -> Result<Frame<'s>> {
        options.validate()?;
        source.validate()?;

        let flag = origin_flag(source.origin(), target_origin).combine(flag);
        if source.format() == target_format && flag == ConversionFlag::Normal {
            let mut result = if force_copy {
                source.copy_compact()
            } else {
                source.view()
            };
            if target_origin != source.origin() {
                // flip cancelled by the explicit flag; only the tag changes
                result = result.with_origin(target_origin);
            }
            return Ok(result);
        }

        let entry = lookup(source.format(), target_format, options)?;
        let target_type = FrameType::new(
            source.width(),
            source.height(),
            target_format,
            target_origin,
        )?;
        let mut target = Frame::new(target_type);
        self.execute(entry, source, &mut target, flag, options)?;
        target.set_timestamp(source.timestamp());
        Ok(target)
    }

    /// Converts `source` into the caller-owned `target`, using the target's
    /// format and origin. `target` is not touched when the call fails.
    pub fn convert_and_copy(
        &self,
        source: &Frame<'_>,
        target: &mut Frame<'_>,
        options: &Options,
    ) -> Result<()> {
        self.convert_and_copy_with_flag(source, target, ConversionFlag::Normal, options)
    }

    /// [`convert_and_copy`](Self::convert_and_copy) with an additional
    /// geometric remapping.
    pub fn convert_and_copy_with_flag(
        &self,
        source: &Frame<'_>,
        target: &mut Frame<'_>,
        flag: ConversionFlag,
        options: &Options,
    ) -> Result<()> {
        options.validate()?;
        source.validate()?;
        target.validate()?;
        if target.is_read_only() {
            return Err(Error::ReadOnlyFrame);
        }
        if source.width() != target.width() || source.height() != target.height() {
            return Err(Error::InvalidBufferGeometry(format!(
                "source is {}x{}, target is {}x{}",
                source.width(),
                source.height(),
                target.width(),
                target.height()
            )));
        }

        let flag = origin_flag(source.origin(), target.origin()).combine(flag);
        let entry = lookup(source.format(), target.format(), options)?;
        self.execute(entry, source, target, flag, options)?;
        target.set_timestamp(source.timestamp());
        Ok(())
    }

    /// Replaces `frame` with its conversion.
    ///
    /// The converted frame always owns its pixels, so a frame wrapping
    /// borrowed memory ends up owning the converted data. Identity requests
    /// leave the frame untouched.
    pub fn change(
        &self,
        frame: &mut Frame<'_>,
        target_format: PixelFormat,
        target_origin: PixelOrigin,
        force_copy: bool,
        options: &Options,
    ) -> Result<()> {
        options.validate()?;
        if frame.format() == target_format && frame.origin() == target_origin {
            return Ok(());
        }

        let converted = self
            .convert(frame, target_format, target_origin, force_copy, options)?
            .into_owned();
        *frame = converted;
        Ok(())
    }

    /// Runs `entry` from `source` into `target`; every check that can fail
    /// happens before the first byte is written.
    fn execute(
        &self,
        entry: &KernelEntry,
        source: &Frame<'_>,
        target: &mut Frame<'_>,
        flag: ConversionFlag,
        options: &Options,
    ) -> Result<()> {
        let width = source.width() as usize;
        let height = source.height() as usize;
        let target_type = *target.frame_type();
        let unsupported = || Error::UnsupportedConversion {
            from: source.format(),
            to: target_type.format(),
            options: options.kind(),
        };
        if flag.flipped() && !entry.supports_flip() {
            return Err(unsupported());
        }

        // packed rows hold 4 pixels in 5 bytes and cannot be mirrored bytewise
        let packed_target = target_type.format().is_packed();
        let geometry: Vec<_> = target
            .planes()
            .iter()
            .map(|plane| {
                let layout = plane.layout();
                let reverse = if packed_target {
                    None
                } else {
                    reverse_kernel_for(layout.pixel_bytes())
                };
                (
                    plane.stride_bytes(),
                    plane.row_bytes(),
                    layout.width as usize,
                    layout.height as usize,
                    reverse,
                )
            })
            .collect();
        if flag.mirrored() && geometry.iter().any(|plane| plane.4.is_none()) {
            return Err(unsupported());
        }

        let sources: Vec<SourcePlane<'_>> = source
            .planes()
            .iter()
            .map(|plane| SourcePlane {
                data: plane.bytes(),
                stride: plane.stride_bytes(),
                row_bytes: plane.row_bytes(),
            })
            .collect();
        let params = KernelParams::from_options(options);
        let executor = Executor {
            worker: self.worker.as_ref(),
            config: &self.config,
        };

        let bytes = target.all_plane_bytes_mut().ok_or(Error::ReadOnlyFrame)?;
        let mut targets: Vec<TargetPlane<'_>> = bytes
            .into_iter()
            .zip(&geometry)
            .map(
                |(data, &(stride, row_bytes, plane_width, plane_height, reverse))| TargetPlane {
                    data: &mut data[..stride * plane_height],
                    stride,
                    row_bytes,
                    width: plane_width,
                    reverse,
                },
            )
            .collect();

        tracing::debug!(
            kernel = entry.name(),
            from = %source.format(),
            to = %target_type.format(),
            %flag,
            width,
            height,
            "converting frame"
        );

        match entry.kernel() {
            KernelRef::Row(kernel) => {
                let (Some(source_plane), Some(target_plane)) = (sources.first(), targets.pop())
                else {
                    return Err(Error::InvalidBufferGeometry(
                        "row kernels need one source and one target plane".to_string(),
                    ));
                };
                dispatch::run_rows(
                    kernel,
                    *source_plane,
                    target_plane,
                    width,
                    height,
                    flag,
                    &params,
                    executor,
                );
            }
            KernelRef::MultiRow {
                kernel,
                rows_per_iteration,
            } => {
                let group_rows: Vec<usize> = geometry
                    .iter()
                    .map(|&(_, _, _, plane_height, _)| rows_per_iteration * plane_height / height)
                    .collect();
                dispatch::run_multi_row(
                    kernel,
                    rows_per_iteration,
                    &sources,
                    targets,
                    &group_rows,
                    width,
                    height,
                    flag,
                    &params,
                    executor,
                );
            }
        }
        Ok(())
    }
}

/// Flip needed to go from `source` to `target` origin.
fn origin_flag(source: PixelOrigin, target: PixelOrigin) -> ConversionFlag {
    ConversionFlag::new(source != target, false)
}

fn lookup(
    source: PixelFormat,
    target: PixelFormat,
    options: &Options,
) -> Result<&'static KernelEntry> {
    registry()
        .lookup(source, target, options)
        .ok_or(Error::UnsupportedConversion {
            from: source,
            to: target,
            options: options.kind(),
        })
}
