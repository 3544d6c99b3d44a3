use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0} requires at least one input point")]
    EmptyInput(&'static str),

    #[error("plane normal {0:?} has no direction")]
    DegenerateProjection([f64; 3]),

    #[error("cell {cell} references node {node} but the mesh has {len} nodes")]
    DanglingNode { cell: usize, node: u32, len: usize },

    #[error("a cell requires at least 3 nodes, found {0}")]
    DegenerateCell(usize),

    #[error("cells with {0} nodes are not supported")]
    UnsupportedCell(usize),

    #[error("a polyline requires at least 2 points, found {0}")]
    ShortPolyline(usize),

    #[error("geometry references point {id} but only {len} points exist")]
    DanglingPoint { id: u32, len: usize },

    #[error("array '{name}' has {found} values, expected {expected}")]
    ArrayLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("array '{0}' already exists")]
    ArrayExists(String),

    #[error("array '{0}' is missing or invalid")]
    MissingArray(String),

    #[error("{what} lengths differ: {a} != {b}")]
    LengthMismatch { what: &'static str, a: usize, b: usize },

    #[error("non-finite {0}")]
    NonFinite(&'static str),
}
