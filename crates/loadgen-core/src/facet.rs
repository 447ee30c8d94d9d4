//! Closed mapping from a target URL's last path segment to the result shape
//! expected when decoding a proxied response.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Sleep,
    Fib,
    RemoteFib,
    Remote,
    Return,
    Receive,
    Memory,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Text,
    Number,
    Status,
    Opaque,
}

impl FacetKind {
    /// Exact match on the last path segment only; anything unmapped is
    /// `Unknown` and callers must decide what to do with it.
    pub fn from_last_segment(path: &str) -> FacetKind {
        match path.rsplit('/').next().unwrap_or(path) {
            "sleep" => FacetKind::Sleep,
            "fib" => FacetKind::Fib,
            "remote-fib" => FacetKind::RemoteFib,
            "remote" => FacetKind::Remote,
            "return" => FacetKind::Return,
            "receive" => FacetKind::Receive,
            "memory" => FacetKind::Memory,
            _ => FacetKind::Unknown,
        }
    }

    pub fn result_shape(self) -> ResultShape {
        match self {
            FacetKind::Sleep | FacetKind::Return => ResultShape::Text,
            FacetKind::Fib | FacetKind::RemoteFib | FacetKind::Receive | FacetKind::Memory => {
                ResultShape::Number
            }
            FacetKind::Remote => ResultShape::Status,
            FacetKind::Unknown => ResultShape::Opaque,
        }
    }
}
