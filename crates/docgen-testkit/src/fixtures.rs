//! Sample artifacts and a scriptable stand-in for the external compiler
//!
//! The fake compiler is a POSIX shell script invoked exactly like pdflatex:
//! `compiler [args...] document.tex`, run inside the workspace. It writes
//! `document.pdf` next to the source, so tests can exercise the whole
//! generation pipeline without a TeX installation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Hello-world template using `#!` / `!#` delimiters
pub const HELLO_TEMPLATE: &str = "\\documentclass{article}\n\\begin{document}\nHello #!.name!#!\n\\end{document}\n";

/// Registered name of [`HELLO_TEMPLATE`]
pub const HELLO_TEMPLATE_NAME: &str = "hello-world.tex";

/// Registered name of [`alice_details`]
pub const ALICE_DETAILS_NAME: &str = "hello-world_alice.json";

/// Left and right delimiters used by [`HELLO_TEMPLATE`]
pub const HASH_DELIMITERS: (&str, &str) = ("#!", "!#");

/// Header the fake compiler writes before the rendered source
pub const FAKE_PDF_HEADER: &str = "%PDF-FAKE\n";

/// Details that fill every placeholder of [`HELLO_TEMPLATE`]
pub fn alice_details() -> Value {
    json!({ "name": "alice" })
}

/// [`HELLO_TEMPLATE`] rendered against [`alice_details`]
pub fn hello_alice_rendered() -> String {
    HELLO_TEMPLATE.replace("#!.name!#", "alice")
}

/// Bytes the fake compiler produces for a successful run on `rendered`
pub fn fake_pdf_for(rendered: &str) -> Vec<u8> {
    format!("{}{}", FAKE_PDF_HEADER, rendered).into_bytes()
}

/// Base64 helper for inline request payloads
pub fn b64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Behavior of the fake compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeCompiler {
    /// Copy the source into the output behind [`FAKE_PDF_HEADER`]
    Succeed,
    /// Print a LaTeX style error and exit 1 without output
    Fail,
    /// Exit 0 without producing any output file
    NoOutput,
    /// Sleep far longer than any test timeout
    Hang,
    /// Ask for another pass on the first run, then succeed
    RerunOnce,
}

impl FakeCompiler {
    fn script(self) -> &'static str {
        match self {
            FakeCompiler::Succeed => {
                r#"#!/bin/sh
for src; do :; done
out="${src%.*}.pdf"
printf '%%PDF-FAKE\n' > "$out"
cat "$src" >> "$out"
echo "Output written on $out."
"#
            }
            FakeCompiler::Fail => {
                r#"#!/bin/sh
echo "! Undefined control sequence."
echo "l.3 \\badmacro"
echo "fatal error" >&2
exit 1
"#
            }
            FakeCompiler::NoOutput => {
                r#"#!/bin/sh
echo "No pages of output."
"#
            }
            FakeCompiler::Hang => {
                r#"#!/bin/sh
exec sleep 30
"#
            }
            FakeCompiler::RerunOnce => {
                r#"#!/bin/sh
for src; do :; done
out="${src%.*}.pdf"
count=$(cat passes 2>/dev/null || echo 0)
count=$((count + 1))
echo "$count" > passes
printf '%%PDF-FAKE\n' > "$out"
cat "$src" >> "$out"
if [ "$count" -lt 2 ]; then
  echo "LaTeX Warning: Label(s) may have changed. Rerun to get cross-references right."
fi
"#
            }
        }
    }

    /// Write the script into `dir` and make it executable
    pub fn install(self, dir: &Path) -> std::io::Result<PathBuf> {
        let name = match self {
            FakeCompiler::Succeed => "fake-latex",
            FakeCompiler::Fail => "fake-latex-fail",
            FakeCompiler::NoOutput => "fake-latex-empty",
            FakeCompiler::Hang => "fake-latex-hang",
            FakeCompiler::RerunOnce => "fake-latex-rerun",
        };
        let path = dir.join(name);
        std::fs::write(&path, self.script())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

/// Register the hello-world template and alice details under `root` the way
/// the disk tier expects them
pub fn register_hello_world_on_disk(root: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;
    let (left, right) = HASH_DELIMITERS;
    std::fs::write(
        root.join(format!("{}{}{}", HELLO_TEMPLATE_NAME, left, right)),
        HELLO_TEMPLATE,
    )?;
    std::fs::write(root.join(ALICE_DETAILS_NAME), alice_details().to_string())?;
    Ok(())
}
