use loadgen_core::facet::{FacetKind, ResultShape};

#[test]
fn maps_last_path_segment_to_a_kind() {
    assert_eq!(FacetKind::from_last_segment("/api/test/fib"), FacetKind::Fib);
    assert_eq!(FacetKind::from_last_segment("fib"), FacetKind::Fib);
    assert_eq!(
        FacetKind::from_last_segment("/api/test/remote-fib"),
        FacetKind::RemoteFib
    );
    assert_eq!(FacetKind::from_last_segment("/nope"), FacetKind::Unknown);
    assert_eq!(FacetKind::from_last_segment(""), FacetKind::Unknown);
}

#[test]
fn kinds_map_to_their_decode_shape() {
    assert_eq!(FacetKind::Sleep.result_shape(), ResultShape::Text);
    assert_eq!(FacetKind::Return.result_shape(), ResultShape::Text);
    assert_eq!(FacetKind::Fib.result_shape(), ResultShape::Number);
    assert_eq!(FacetKind::RemoteFib.result_shape(), ResultShape::Number);
    assert_eq!(FacetKind::Receive.result_shape(), ResultShape::Number);
    assert_eq!(FacetKind::Memory.result_shape(), ResultShape::Number);
    assert_eq!(FacetKind::Remote.result_shape(), ResultShape::Status);
    assert_eq!(FacetKind::Unknown.result_shape(), ResultShape::Opaque);
}
