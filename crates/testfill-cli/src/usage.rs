//! Usage text printed for missing or unrecognised commands.

use crate::report::PROGRAM;

/// The usage message, without the `== testfill:` lead-in.
pub fn usage_text() -> String {
    [
        String::new(),
        format!("    usage: {PROGRAM} [list|format|validate] [<TEST_FILE_PREFIX>*]"),
        "    where:".to_string(),
        "            list:               print the matching test files.".to_string(),
        "            format:             rewrite the matching files as sorted, indented JSON.".to_string(),
        "            validate:           check the matching files against their JSON schema (all files by default).".to_string(),
        "            <TEST_FILE_PREFIX>: path prefix selecting tests.".to_string(),
        "                                e.g. './src/VMTestsFiller' './VMTests' for all VM tests and their fillers.".to_string(),
        "    options:".to_string(),
        "            -v, --verbose       more diagnostics on stderr (repeatable).".to_string(),
        "            --root <DIR>        directory to search (default: .).".to_string(),
        "            --schema-dir <DIR>  schema directory, relative to the root (default: JSONSchema).".to_string(),
    ]
    .join("\n")
}
