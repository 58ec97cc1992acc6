// SSSE3 implementations for row conversion

#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::x86_64::*;

use super::unpack_10bit_tail;

/// Drops alpha from four pixels per step. Each 16 byte store overlaps the next
/// step by 4 bytes and must fit inside `dst`.
#[target_feature(enable = "ssse3")]
pub(super) unsafe fn rgba_to_rgb_row_ssse3(src: &[u8], dst: &mut [u8], width: usize) {
    let compact = _mm_setr_epi8(0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, -1, -1, -1, -1);

    let mut pixel = 0;
    while pixel + 4 <= width && pixel * 3 + 16 <= dst.len() {
        let quad = _mm_loadu_si128(src.as_ptr().add(pixel * 4) as *const __m128i);
        _mm_storeu_si128(
            dst.as_mut_ptr().add(pixel * 3) as *mut __m128i,
            _mm_shuffle_epi8(quad, compact),
        );
        pixel += 4;
    }

    for (s, d) in src[pixel * 4..width * 4]
        .chunks_exact(4)
        .zip(dst[pixel * 3..width * 3].chunks_exact_mut(3))
    {
        d.copy_from_slice(&s[..3]);
    }
}

/// Expands four pixels per step; each load reads 16 bytes of which 12 are used.
#[target_feature(enable = "ssse3")]
pub(super) unsafe fn rgb_to_rgba_row_ssse3(src: &[u8], dst: &mut [u8], width: usize, alpha: u8) {
    let spread = _mm_setr_epi8(0, 1, 2, -1, 3, 4, 5, -1, 6, 7, 8, -1, 9, 10, 11, -1);
    let alpha_lanes = _mm_set1_epi32(i32::from_le_bytes([0, 0, 0, alpha]));

    let mut pixel = 0;
    while pixel + 4 <= width && pixel * 3 + 16 <= src.len() {
        let triples = _mm_loadu_si128(src.as_ptr().add(pixel * 3) as *const __m128i);
        _mm_storeu_si128(
            dst.as_mut_ptr().add(pixel * 4) as *mut __m128i,
            _mm_or_si128(_mm_shuffle_epi8(triples, spread), alpha_lanes),
        );
        pixel += 4;
    }

    for (s, d) in src[pixel * 3..width * 3]
        .chunks_exact(3)
        .zip(dst[pixel * 4..width * 4].chunks_exact_mut(4))
    {
        d[..3].copy_from_slice(s);
        d[3] = alpha;
    }
}

/// Unpacks 8 pixels (10 bytes) per step; each step loads 16 bytes, so the last
/// blocks go through the scalar tail.
#[target_feature(enable = "ssse3")]
pub(super) unsafe fn unpack_10bit_row_ssse3(src: &[u8], dst: &mut [u16]) {
    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();

    // upper eight bits of each sample into the low byte of a u16 lane
    let high = _mm_setr_epi8(0, -1, 1, -1, 2, -1, 3, -1, 5, -1, 6, -1, 7, -1, 8, -1);
    // the byte holding the low two bits, repeated for its four samples
    let low = _mm_setr_epi8(4, -1, 4, -1, 4, -1, 4, -1, 9, -1, 9, -1, 9, -1, 9, -1);
    // shifts bits 2i..2i+2 up to bits 6..8
    let scale = _mm_setr_epi16(64, 16, 4, 1, 64, 16, 4, 1);
    let mask = _mm_set1_epi16(0b11);

    let mut in_offset = 0;
    let mut out_offset = 0;
    while in_offset + 16 <= src.len() {
        let packed = _mm_loadu_si128(src_ptr.add(in_offset) as *const __m128i);

        let upper = _mm_slli_epi16(_mm_shuffle_epi8(packed, high), 2);
        let lower = _mm_mullo_epi16(_mm_shuffle_epi8(packed, low), scale);
        let lower = _mm_and_si128(_mm_srli_epi16(lower, 6), mask);

        _mm_storeu_si128(
            dst_ptr.add(out_offset) as *mut __m128i,
            _mm_or_si128(upper, lower),
        );

        in_offset += 10;
        out_offset += 8;
    }

    unpack_10bit_tail(src, dst, out_offset);
}
