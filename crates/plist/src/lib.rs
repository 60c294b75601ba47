mod node;
mod reader;
mod view;

pub use node::{NodeKind, TreeNode};
pub use reader::{parse_bytes, parse_document, PlistError};
pub use view::{PlistView, StructureError};
