use crate::error::InventoryError;
use log::debug;

/// Fails on the first tool that cannot be resolved on `PATH`.
pub fn check_required_tools(tools: &[String]) -> Result<(), InventoryError> {
    for tool in tools {
        match which::which(tool) {
            Ok(path) => debug!("found {} at {}", tool, path.display()),
            Err(error) => {
                debug!("lookup of {} failed: {}", tool, error);
                return Err(InventoryError::MissingTool(tool.clone()));
            }
        }
    }
    Ok(())
}
