//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm fitting the classifier
pub fn confirm_training(trees: usize, train_rows: usize) -> Result<bool> {
    let message = format!(
        "Train a {}-tree forest on {} rows? (the slow part)",
        trees, train_rows
    );
    confirm_step(&message)
}
