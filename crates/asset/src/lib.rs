//! Asset loading/parsers.
//! OBJ mesh loader producing flattened, renderer-ready buffers.

pub mod mesh;
pub mod obj;
pub mod options;
pub mod resource;

pub use corelib::{Attribute, LoadError, LoadResult};
pub use mesh::{MeshBuffer, MeshVertex};
pub use obj::{load_model, load_model_with, load_obj_from_str, parse_model};
pub use options::{CancelToken, LoadOptions, MissingAttribute};
pub use resource::{DirResolver, MemoryResolver, ResourceResolver};
