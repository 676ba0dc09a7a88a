pub mod trash_operation;

pub use trash_operation::{SystemTrash, TrashBackend, TrashOperation};
