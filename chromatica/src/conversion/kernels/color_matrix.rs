//! Fixed-point 3x3 color transforms.
//!
//! A transform with precision `P` computes, per output channel,
//! `clamp((sum(c_ij * s_j) + bias_i + 2^(P-1)) >> P, 0, 255)` where the bias
//! is already scaled by `2^P` and the shift is arithmetic.

use super::KernelParams;

/// Integer color transform; coefficients and bias are scaled by `2^precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FixedMatrix {
    pub precision: u32,
    pub coefficients: [[i32; 3]; 3],
    pub bias: [i32; 3],
}

impl FixedMatrix {
    #[inline(always)]
    pub const fn apply(&self, input: [i32; 3]) -> [u8; 3] {
        let round = 1 << (self.precision - 1);
        let mut output = [0u8; 3];
        let mut i = 0;
        while i < 3 {
            let row = self.coefficients[i];
            let sum = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
            let value = (sum + self.bias[i] + round) >> self.precision;
            output[i] = if value < 0 {
                0
            } else if value > 255 {
                255
            } else {
                value as u8
            };
            i += 1;
        }
        output
    }
}

/// Floating point reference of a transform.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExactMatrix {
    pub coefficients: [[f64; 3]; 3],
    pub bias: [f64; 3],
}

impl ExactMatrix {
    pub fn apply(&self, input: [f64; 3]) -> [f64; 3] {
        std::array::from_fn(|i| {
            let row = self.coefficients[i];
            (row[0] * input[0] + row[1] * input[1] + row[2] * input[2] + self.bias[i]).clamp(0.0, 255.0)
        })
    }
}

/// A named fixed-point transform, used as a kernel type parameter.
pub(crate) trait ColorTransform {
    const MATRIX: FixedMatrix;
}

macro_rules! color_transform {
    ($(#[$meta:meta])* $name:ident, $precision:expr, $coefficients:expr, $bias:expr) => {
        $(#[$meta])*
        pub(crate) struct $name;

        impl ColorTransform for $name {
            const MATRIX: FixedMatrix = FixedMatrix {
                precision: $precision,
                coefficients: $coefficients,
                bias: $bias,
            };
        }
    };
}

// =============================================================================
// RGB to YUV, inputs (R, G, B), outputs (Y, U, V)
// =============================================================================

color_transform!(
    /// BT.601 full range.
    RgbToYuvFull7,
    7,
    [[38, 75, 15], [-22, -42, 64], [64, -54, -10]],
    [0, 128 << 7, 128 << 7]
);

color_transform!(
    /// BT.601 limited range, luma in [16, 235].
    RgbToYuvLimited7,
    7,
    [[33, 64, 13], [-19, -37, 56], [56, -47, -9]],
    [16 << 7, 128 << 7, 128 << 7]
);

// =============================================================================
// YUV to RGB, inputs (Y, U, V), outputs (R, G, B)
// =============================================================================

color_transform!(
    /// BT.601 full range.
    YuvFullToRgb6,
    6,
    [[64, 0, 90], [64, -22, -46], [64, 113, 0]],
    [-90 * 128, (22 + 46) * 128, -113 * 128]
);

color_transform!(
    /// Full range with the factors Android uses for NV21 camera frames.
    YuvAndroidToRgb6,
    6,
    [[64, 0, 88], [64, -22, -45], [64, 111, 0]],
    [-88 * 128, (22 + 45) * 128, -111 * 128]
);

color_transform!(
    YuvFullToRgb10,
    10,
    [[1024, 0, 1436], [1024, -352, -731], [1024, 1815, 0]],
    [-1436 * 128, (352 + 731) * 128, -1815 * 128]
);

color_transform!(
    /// BT.601 limited range.
    YuvLimitedToRgb6,
    6,
    [[75, 0, 102], [75, -25, -52], [75, 128, 0]],
    [
        -75 * 16 - 102 * 128,
        -75 * 16 + (25 + 52) * 128,
        -75 * 16 - 128 * 128
    ]
);

color_transform!(
    YuvLimitedToRgb8,
    8,
    [[298, 0, 409], [298, -100, -208], [298, 516, 0]],
    [
        -298 * 16 - 409 * 128,
        -298 * 16 + (100 + 208) * 128,
        -298 * 16 - 516 * 128
    ]
);

color_transform!(
    YuvLimitedToRgb10,
    10,
    [[1192, 0, 1634], [1192, -400, -833], [1192, 2066, 0]],
    [-223 << 10, 135 << 10, -277 << 10]
);

color_transform!(
    YuvLimitedToRgb13,
    13,
    [[9535, 0, 13074], [9535, -3203, -6660], [9535, 16531, 0]],
    [-1_826_032, 1_109_904, -2_268_528]
);

// =============================================================================
// Float references
// =============================================================================

pub(crate) const RGB_TO_YUV_FULL: ExactMatrix = ExactMatrix {
    coefficients: [
        [0.299, 0.587, 0.114],
        [-0.168736, -0.331264, 0.5],
        [0.5, -0.418688, -0.081312],
    ],
    bias: [0.0, 128.0, 128.0],
};

pub(crate) const RGB_TO_YUV_LIMITED: ExactMatrix = ExactMatrix {
    coefficients: [
        [0.256788, 0.504129, 0.097906],
        [-0.148223, -0.290993, 0.439216],
        [0.439216, -0.367788, -0.071427],
    ],
    bias: [16.0, 128.0, 128.0],
};

pub(crate) const YUV_FULL_TO_RGB: ExactMatrix = ExactMatrix {
    coefficients: [
        [1.0, 0.0, 1.402],
        [1.0, -0.344136, -0.714136],
        [1.0, 1.772, 0.0],
    ],
    bias: [
        -1.402 * 128.0,
        (0.344136 + 0.714136) * 128.0,
        -1.772 * 128.0,
    ],
};

pub(crate) const YUV_ANDROID_TO_RGB: ExactMatrix = ExactMatrix {
    coefficients: [
        [1.0, 0.0, 1.370705],
        [1.0, -0.337633, -0.698001],
        [1.0, 1.732446, 0.0],
    ],
    bias: [
        -1.370705 * 128.0,
        (0.337633 + 0.698001) * 128.0,
        -1.732446 * 128.0,
    ],
};

pub(crate) const YUV_LIMITED_TO_RGB: ExactMatrix = ExactMatrix {
    coefficients: [
        [1.1639404296875, 0.0, 1.595947265625],
        [1.1639404296875, -0.3909912109375, -0.81298828125],
        [1.1639404296875, 2.0179443359375, 0.0],
    ],
    bias: [-222.904296875, 135.486328125, -276.919921875],
};

// =============================================================================
// Single-plane row kernel
// =============================================================================

/// Applies `M` to 3-channel pixels.
///
/// Matrix inputs are read from source indices `I0..I2` and outputs written to
/// target indices `O0..O2`, so one transform serves every channel order.
pub(crate) fn matrix_row<
    M: ColorTransform,
    const I0: usize,
    const I1: usize,
    const I2: usize,
    const O0: usize,
    const O1: usize,
    const O2: usize,
>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    _params: &KernelParams,
) {
    let src = &src[..width * 3];
    let dst = &mut dst[..width * 3];
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        let out = M::MATRIX.apply([s[I0] as i32, s[I1] as i32, s[I2] as i32]);
        d[O0] = out[0];
        d[O1] = out[1];
        d[O2] = out[2];
    }
}

/// [`matrix_row`] into 4-channel pixels, writing `params.alpha` to channel 3.
pub(crate) fn matrix_alpha_row<
    M: ColorTransform,
    const I0: usize,
    const I1: usize,
    const I2: usize,
    const O0: usize,
    const O1: usize,
    const O2: usize,
>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    params: &KernelParams,
) {
    let src = &src[..width * 3];
    let dst = &mut dst[..width * 4];
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        let out = M::MATRIX.apply([s[I0] as i32, s[I1] as i32, s[I2] as i32]);
        d[O0] = out[0];
        d[O1] = out[1];
        d[O2] = out[2];
        d[3] = params.alpha;
    }
}
