mod members;
mod table;

pub use members::{ClassMembers, SubKind};
pub use table::{Dispatch, Entry, Kind, SymbolTable};
