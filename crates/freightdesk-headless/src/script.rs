// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Headless - Action scripts
//
// A script is a JSON array of form actions, replayed in order.

use freightdesk_core::{AppError, FormAction};
use std::fs;
use std::path::Path;

pub fn load_script(path: &Path) -> Result<Vec<FormAction>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::FileIo(format!("Failed to read script {:?}: {}", path, e)))?;
    parse_script(&content)
}

pub fn parse_script(content: &str) -> Result<Vec<FormAction>, AppError> {
    serde_json::from_str(content)
        .map_err(|e| AppError::Serialization(format!("Invalid action script: {}", e)))
}
