use crate::Size;
use crate::render_api::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("render backend failure: {0}")]
    Backend(#[from] BackendError),

    /// Drawn with a target that does not match the node's size; the node was
    /// resized (or created) without an update in between.
    #[error("render target is {allocated:?} but the view is {expected:?}; update before drawing")]
    StaleTarget {
        expected: Size,
        allocated: Option<Size>,
    },

    /// A positioned control was updated before its owner pushed a parent size.
    #[error("parent size was not pushed into the control before update")]
    MissingParentSize,
}

pub type Result<T, E = ViewError> = std::result::Result<T, E>;
