use crate::catalog::TypeCatalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;

/// The occurrence type catalog, optionally narrowed to one type.
pub fn run(catalog: &TypeCatalog, key: Option<&str>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match key {
        None => result.types = catalog.iter().cloned().collect(),
        Some(key) => match catalog.find(key) {
            Some(t) => result.types.push(t.clone()),
            None => result.add_message(CmdMessage::error(format!("Unknown occurrence type: {}", key))),
        },
    }
    Ok(result)
}
