//! Packaging a compiled script as a `javascript:` bookmarklet URI.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

pub const DEFAULT_INPUT: &str = "dist/bookmarklet.js";
pub const DEFAULT_OUTPUT: &str = "dist/bookmarklet.wrapped.js";

/// Wrap `js` in a self-invoking arrow function behind `javascript:`.
/// Newlines are removed so the result fits in an address bar.
pub fn wrap_script(js: &str) -> String {
    format!("javascript:(()=>{{{}}})();", js.replace('\n', ""))
}

pub fn wrap_file(input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        bail!("{} not found. Build the script first.", input.display());
    }

    let js = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {:?}", input))?;
    let wrapped = wrap_script(&js);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    std::fs::write(output, &wrapped).with_context(|| format!("Failed to write {:?}", output))?;

    info!("Bookmarklet created at {} ({} bytes)", output.display(), wrapped.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_strips_newlines() {
        let js = "const a = 1\nconsole.log(a)\n";
        assert_eq!(wrap_script(js), "javascript:(()=>{const a = 1console.log(a)})();");
    }

    #[test]
    fn test_wrap_keeps_carriage_returns() {
        assert_eq!(wrap_script("a\r\nb"), "javascript:(()=>{a\rb})();");
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = std::env::temp_dir().join(format!("ws_tx_export-wrap-missing-{}", std::process::id()));
        let err = wrap_file(&dir.join("bookmarklet.js"), &dir.join("out.js")).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!dir.join("out.js").exists());
    }

    #[test]
    fn test_wrap_file_writes_output() {
        let dir = std::env::temp_dir().join(format!("ws_tx_export-wrap-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("bookmarklet.js");
        std::fs::write(&input, "run()\n").unwrap();

        let output = dir.join("dist").join("bookmarklet.wrapped.js");
        wrap_file(&input, &output).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "javascript:(()=>{run()})();");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
