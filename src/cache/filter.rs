// ABOUTME: Path filter for discovered executables.
// ABOUTME: Drops system binaries, libraries, and known noise files.

const EXCLUDED_SUFFIXES: &[&str] = &[
    "post-link.sh",
    ".debug",
    "pre-link.sh",
    ".so",
    ".dll",
    ".gz",
    ".dna",
    ".dox",
    ".db",
    ".db3",
    ".config",
    ".defaults",
    ".dat",
    ".dn",
    ".d",
    ".md",
];

/// Whether a discovered path should be offered as an alias.
///
/// Any single rule is enough to exclude; the checks are independent and
/// order does not matter.
pub fn include_path(path: &str) -> bool {
    if EXCLUDED_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)) {
        return false;
    }
    let basename = path.rsplit('/').next().unwrap_or(path);
    if basename.starts_with('_') || basename.starts_with('.') {
        return false;
    }
    if path.contains('[') || path.contains(']') || path.contains("README") {
        return false;
    }
    !path.contains("sbin") && !path.contains("/usr/bin") && !path.starts_with("/bin")
}
