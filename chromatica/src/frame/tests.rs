use super::*;

fn rgb_type(width: u32, height: u32) -> FrameType {
    FrameType::new(width, height, PixelFormat::RGB24, PixelOrigin::UpperLeft).unwrap()
}

#[test]
fn frame_type_rejects_invalid_dimensions() {
    assert!(FrameType::new(0, 4, PixelFormat::Y8, PixelOrigin::UpperLeft).is_err());
    assert!(FrameType::new(5, 4, PixelFormat::Y_UV12, PixelOrigin::UpperLeft).is_err());
    assert!(FrameType::new(6, 4, PixelFormat::Y_UV12, PixelOrigin::LowerLeft).is_ok());
}

#[test]
fn new_frame_is_owned_and_zeroed() {
    let frame = Frame::new(rgb_type(7, 3));
    assert!(frame.is_owned());
    assert_eq!(frame.planes().len(), 1);
    let plane = frame.plane(0);
    assert_eq!(plane.stride_bytes(), 21);
    assert!(plane.bytes().iter().all(|&b| b == 0));
}

#[test]
fn padding_extends_stride() {
    let frame_type = FrameType::new(8, 4, PixelFormat::Y16, PixelOrigin::UpperLeft).unwrap();
    let frame = Frame::with_padding(frame_type, &[3]).unwrap();
    let plane = frame.plane(0);
    assert_eq!(plane.stride_elements(), 11);
    assert_eq!(plane.stride_bytes(), 22);
    assert_eq!(plane.row_bytes(), 16);
    assert_eq!(plane.bytes().len(), 22 * 4);
    assert!(!plane.is_continuous());
}

#[test]
fn nv12_frame_has_subsampled_chroma_plane() {
    let frame_type = FrameType::new(6, 4, PixelFormat::Y_UV12, PixelOrigin::UpperLeft).unwrap();
    let frame = Frame::new(frame_type);
    assert_eq!(frame.plane(0).bytes().len(), 24);
    assert_eq!(frame.plane(1).layout().width, 3);
    assert_eq!(frame.plane(1).layout().height, 2);
    assert_eq!(frame.plane(1).bytes().len(), 12);
}

#[test]
fn borrowed_frame_is_read_only() {
    let bytes = vec![5u8; 4 * 3 * 2];
    let frame = Frame::from_borrowed(rgb_type(4, 2), &[bytes.as_slice()], &[0]).unwrap();
    assert!(frame.is_read_only());
    assert_eq!(frame.plane(0).row(1), &bytes[12..24]);

    let mut frame = frame;
    assert!(frame.plane_bytes_mut(0).is_none());
}

#[test]
fn borrowed_frame_rejects_short_memory() {
    let bytes = vec![0u8; 4 * 3 * 2 - 1];
    let result = Frame::from_borrowed(rgb_type(4, 2), &[bytes.as_slice()], &[0]);
    assert!(matches!(result, Err(Error::InvalidBufferGeometry(_))));
}

#[test]
fn plane_count_mismatch_is_rejected() {
    let frame_type = FrameType::new(4, 4, PixelFormat::Y_U_V12, PixelOrigin::UpperLeft).unwrap();
    let luma = vec![0u8; 16];
    assert!(Frame::from_borrowed(frame_type, &[luma.as_slice()], &[0]).is_err());
    assert!(Frame::with_padding(frame_type, &[0, 0]).is_err());
}

#[test]
fn into_owned_copies_borrowed_planes() {
    let bytes: Vec<u8> = (0..24).collect();
    let borrowed = Frame::from_borrowed(rgb_type(4, 2), &[bytes.as_slice()], &[0]).unwrap();
    let owned = borrowed.into_owned();
    assert!(owned.is_owned());
    assert_eq!(owned.plane(0).bytes(), &bytes[..]);
}

#[test]
fn copy_compact_drops_padding() {
    let frame_type = FrameType::new(2, 2, PixelFormat::Y8, PixelOrigin::UpperLeft).unwrap();
    let padded = Frame::from_planes(frame_type, vec![vec![1, 2, 99, 3, 4, 99]], &[1]).unwrap();
    let compact = padded.copy_compact();
    assert_eq!(compact.plane(0).bytes(), &[1, 2, 3, 4]);
    assert!(compact.pixels_equal(&padded));
}

#[test]
fn view_shares_memory() {
    let frame = Frame::from_planes(rgb_type(1, 1), vec![vec![1, 2, 3]], &[0]).unwrap();
    let view = frame.view();
    assert!(view.is_read_only());
    assert_eq!(view.plane(0).bytes().as_ptr(), frame.plane(0).bytes().as_ptr());
}

#[test]
fn timestamp_is_carried() {
    let mut frame = Frame::new(rgb_type(1, 1));
    assert!(!frame.timestamp().is_valid());
    frame.set_timestamp(Timestamp::new(1.5));
    assert_eq!(frame.copy_compact().timestamp().seconds(), Some(1.5));
}

#[test]
fn validate_accepts_constructed_frames() {
    let frame_type = FrameType::new(8, 2, PixelFormat::RGGB10_PACKED, PixelOrigin::UpperLeft).unwrap();
    let frame = Frame::with_padding(frame_type, &[2]).unwrap();
    assert_eq!(frame.plane(0).row_bytes(), 10);
    frame.validate().unwrap();
}
