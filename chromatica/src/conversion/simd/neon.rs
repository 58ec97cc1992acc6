// NEON implementations for row conversion

#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::aarch64::*;

use super::unpack_10bit_tail;

/// Sixteen pixels per structured load; the rest are copied in the tail.
pub(super) unsafe fn rgba_to_rgb_row_neon(src: &[u8], dst: &mut [u8], width: usize) {
    let blocks = width / 16;
    for (s, d) in src
        .chunks_exact(64)
        .zip(dst.chunks_exact_mut(48))
        .take(blocks)
    {
        let planes = vld4q_u8(s.as_ptr());
        vst3q_u8(d.as_mut_ptr(), uint8x16x3_t(planes.0, planes.1, planes.2));
    }

    let done = blocks * 16;
    for (s, d) in src[done * 4..width * 4]
        .chunks_exact(4)
        .zip(dst[done * 3..width * 3].chunks_exact_mut(3))
    {
        d.copy_from_slice(&s[..3]);
    }
}

pub(super) unsafe fn rgb_to_rgba_row_neon(src: &[u8], dst: &mut [u8], width: usize, alpha: u8) {
    let blocks = width / 16;
    let alpha_plane = vdupq_n_u8(alpha);
    for (s, d) in src
        .chunks_exact(48)
        .zip(dst.chunks_exact_mut(64))
        .take(blocks)
    {
        let planes = vld3q_u8(s.as_ptr());
        vst4q_u8(
            d.as_mut_ptr(),
            uint8x16x4_t(planes.0, planes.1, planes.2, alpha_plane),
        );
    }

    let done = blocks * 16;
    for (s, d) in src[done * 3..width * 3]
        .chunks_exact(3)
        .zip(dst[done * 4..width * 4].chunks_exact_mut(4))
    {
        d[..3].copy_from_slice(s);
        d[3] = alpha;
    }
}

pub(super) unsafe fn unpack_10bit_row_neon(src: &[u8], dst: &mut [u16]) {
    const HIGH: [u8; 16] = [0, 255, 1, 255, 2, 255, 3, 255, 5, 255, 6, 255, 7, 255, 8, 255];
    const LOW: [u8; 16] = [4, 255, 4, 255, 4, 255, 4, 255, 9, 255, 9, 255, 9, 255, 9, 255];
    const SHIFTS: [i16; 8] = [0, -2, -4, -6, 0, -2, -4, -6];

    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();

    let high = vld1q_u8(HIGH.as_ptr());
    let low = vld1q_u8(LOW.as_ptr());
    let shifts = vld1q_s16(SHIFTS.as_ptr());
    let mask = vdupq_n_u16(0b11);

    let mut in_offset = 0;
    let mut out_offset = 0;
    while in_offset + 16 <= src.len() {
        let packed = vld1q_u8(src_ptr.add(in_offset));

        let upper = vshlq_n_u16::<2>(vreinterpretq_u16_u8(vqtbl1q_u8(packed, high)));
        let lower = vreinterpretq_u16_u8(vqtbl1q_u8(packed, low));
        let lower = vandq_u16(vshlq_u16(lower, shifts), mask);

        vst1q_u16(dst_ptr.add(out_offset), vorrq_u16(upper, lower));

        in_offset += 10;
        out_offset += 8;
    }

    unpack_10bit_tail(src, dst, out_offset);
}
