//! Transcript validation.

use std::path::Path;

use anyhow::Result;
use sift_core::Role;
use sift_core::transcript;

pub fn run(file: &Path) -> Result<()> {
    let messages = transcript::load(file)?;
    let users = messages.iter().filter(|m| m.role == Role::User).count();
    let assistants = messages.len() - users;
    let keyed = messages.iter().filter(|m| m.key.is_some()).count();

    println!(
        "{}: {} messages ({users} user, {assistants} assistant)",
        file.display(),
        messages.len()
    );
    if keyed > 0 && keyed < messages.len() {
        println!(
            "note: {keyed} of {} messages carry a key; unkeyed messages are matched by position",
            messages.len()
        );
    }
    tracing::debug!(path = %file.display(), count = messages.len(), "transcript checked");
    Ok(())
}
