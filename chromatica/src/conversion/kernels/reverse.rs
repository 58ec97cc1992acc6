//! In-place pixel order reversal used for mirrored conversions.

use super::RowReverseFn;

/// Reverses the first `width` pixels of `N` bytes each.
pub(crate) fn reverse_pixels<const N: usize>(row: &mut [u8], width: usize) {
    let row = &mut row[..width * N];
    let (mut left, mut right) = (0, width);
    while left + 1 < right {
        right -= 1;
        let (head, tail) = row.split_at_mut(right * N);
        head[left * N..left * N + N].swap_with_slice(&mut tail[..N]);
        left += 1;
    }
}

/// Reversal kernel for pixels of `pixel_bytes` bytes, if one exists.
pub(crate) fn reverse_kernel_for(pixel_bytes: usize) -> Option<RowReverseFn> {
    let kernel: RowReverseFn = match pixel_bytes {
        1 => reverse_pixels::<1>,
        2 => reverse_pixels::<2>,
        3 => reverse_pixels::<3>,
        4 => reverse_pixels::<4>,
        6 => reverse_pixels::<6>,
        8 => reverse_pixels::<8>,
        _ => return None,
    };
    Some(kernel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_three_byte_pixels() {
        let mut row = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 99];
        reverse_pixels::<3>(&mut row, 3);
        assert_eq!(row, vec![7, 8, 9, 4, 5, 6, 1, 2, 3, 99]);
    }

    #[test]
    fn even_width_and_single_pixel() {
        let mut row = vec![1, 2, 3, 4];
        reverse_pixels::<1>(&mut row, 4);
        assert_eq!(row, vec![4, 3, 2, 1]);

        let mut row = vec![1, 2];
        reverse_pixels::<2>(&mut row, 1);
        assert_eq!(row, vec![1, 2]);
    }

    #[test]
    fn twice_is_identity() {
        let original: Vec<u8> = (0..48).collect();
        for pixel_bytes in [1, 2, 3, 4, 6, 8] {
            let kernel = reverse_kernel_for(pixel_bytes).unwrap();
            let width = original.len() / pixel_bytes;
            let mut row = original.clone();
            kernel(&mut row, width);
            assert_ne!(row, original);
            kernel(&mut row, width);
            assert_eq!(row, original);
        }
    }

    #[test]
    fn unknown_pixel_size() {
        assert!(reverse_kernel_for(5).is_none());
    }
}
