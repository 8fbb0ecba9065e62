//! Wire layout inspection.

use anyhow::Result;

use crate::output;

pub fn execute(json: bool) -> Result<()> {
    output::print_layout(json);
    Ok(())
}
