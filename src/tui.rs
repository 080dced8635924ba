use anyhow::Result;

/// Interactive settings form. Needs a TTY and a configured console.
pub fn run() -> Result<()> {
    crate::tui_form::run()
}
