pub mod resolver;

pub use resolver::{
    detect_fallback_columns, ensure_recognizable, normalize_header, resolve_columns,
};
