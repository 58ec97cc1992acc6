//! 8-byte aligned plane storage.

/// A byte buffer with guaranteed 8-byte alignment.
///
/// Owned planes live here so kernels can reinterpret rows as `u16` or `f32`
/// with `bytemuck::cast_slice` regardless of where the row starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlignedBytes {
    /// Storage as u64 to guarantee 8-byte alignment.
    storage: Vec<u64>,
    /// Actual byte length (may be less than storage.len() * 8).
    len: usize,
}

impl AlignedBytes {
    /// Create a new aligned byte buffer with the given length, initialized to zero.
    pub fn new_zeroed(len: usize) -> Self {
        Self {
            storage: vec![0u64; len.div_ceil(8)],
            len,
        }
    }

    /// Create from an existing byte slice (copies data).
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut result = Self::new_zeroed(bytes.len());
        result.as_mut_slice().copy_from_slice(bytes);
        result
    }

    /// Create from a `Vec<u8>`. The bytes are copied into aligned storage.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::from_slice(&bytes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.storage)[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut(&mut self.storage)[..len]
    }

    /// Copies the bytes out into a plain vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

impl From<Vec<u8>> for AlignedBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for AlignedBytes {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let ab = AlignedBytes::new_zeroed(100);
        assert_eq!(ab.len(), 100);
        assert!(ab.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_vec_keeps_bytes() {
        let data: Vec<u8> = (0..13).collect();
        let ab = AlignedBytes::from_vec(data.clone());
        assert_eq!(ab.as_slice(), &data[..]);
        assert_eq!(ab.to_vec(), data);
    }

    #[test]
    fn test_alignment_allows_u16_and_f32_views() {
        let mut ab = AlignedBytes::from_slice(&[0u8; 12]);
        assert_eq!(ab.as_slice().as_ptr() as usize % 8, 0);

        let floats: &mut [f32] = bytemuck::cast_slice_mut(ab.as_mut_slice());
        floats[2] = 0.5;
        let halves: &[u16] = bytemuck::cast_slice(ab.as_slice());
        assert_eq!(halves.len(), 6);
        let read_back: &[f32] = bytemuck::cast_slice(ab.as_slice());
        assert_eq!(read_back, &[0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_empty() {
        let ab = AlignedBytes::new_zeroed(0);
        assert!(ab.is_empty());
        assert!(ab.as_slice().is_empty());
    }
}
