use super::renumbering::Renumbering;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches one step reference, e.g. `step_12.` inside `${step_12.response.id}`.
/// The trailing dot and the word boundary keep `step_1.` from matching inside `step_12.`
/// or `substep_1.`.
static STEP_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstep_(\d+)\.").expect("step reference pattern is valid"));

// Private-use code points; they never occur in references typed by users.
const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E000}(\d+)\x{E001}").expect("placeholder pattern is valid")
});

/// Rewrites every step reference in `source` according to `renumbering`.
///
/// The rewrite runs in two phases. First each reference whose number changes is replaced
/// by a placeholder token carrying the new number; then every token is resolved to its
/// final `step_<n>` text. A number written in the first phase is therefore never matched
/// again, which keeps swaps and longer cycles (`2→3, 3→2`, `1→2, 2→3, 3→1`) intact.
/// References whose numbers are absent from `renumbering` pass through unchanged.
pub fn rewrite_source(source: &str, renumbering: &Renumbering) -> String {
    if renumbering.is_empty() || !source.contains("step_") {
        return source.to_string();
    }

    let tokenized = STEP_REF.replace_all(source, |caps: &Captures| {
        match caps[1].parse::<u32>().ok().and_then(|old| renumbering.get(old)) {
            Some(new) => format!("{TOKEN_OPEN}{new}{TOKEN_CLOSE}."),
            None => caps[0].to_string(),
        }
    });

    TOKEN.replace_all(&tokenized, "step_${1}").into_owned()
}

/// Returns the step numbers referenced by `source`, in order of appearance.
pub fn referenced_steps(source: &str) -> Vec<u32> {
    STEP_REF
        .captures_iter(source)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// True if `source` references the step with the given number.
pub fn references_step(source: &str, step_number: u32) -> bool {
    referenced_steps(source).contains(&step_number)
}

/// Builds a mapping source pointing at `path` inside the response of `step_number`.
///
/// `path` is appended verbatim after `.response`, so it should start with `.` when
/// non-empty: `source_for(2, ".data.email")` gives `${step_2.response.data.email}`.
pub fn source_for(step_number: u32, path: &str) -> String {
    format!("${{step_{step_number}.response{path}}}")
}
