use std::process::Command;

/// Opens a file path or URL (e.g. a PubChem structure image) with the system default viewer.
pub fn open_in_viewer(target: &str) -> Result<(), Box<dyn std::error::Error>> {
    if target.trim().is_empty() {
        return Err("nothing to open".into());
    }
    open_with_default_viewer(target)
}

fn open_with_default_viewer(target: &str) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(target).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(target).spawn()?;
    }

    Ok(())
}
