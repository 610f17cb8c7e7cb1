use crate::query::Query;

/// Sentinel returned when no mutable field differs between the snapshots.
pub const NO_CHANGE: &str = "no change";

/// Builds the `query update` invocation that would re-apply the observed
/// change to `original.id`. Only the mutable fields (`sql`, `data_source`)
/// are compared; a flag is emitted only when its field actually changed,
/// with the value taken from `modified`. Swap the arguments to get the
/// undo direction.
pub fn recovery_command(original: &Query, modified: &Query) -> String {
    let mut parts = vec![format!("query update {}", original.id)];

    if modified.sql != original.sql {
        parts.push(format!("--query \"{}\"", shell_escape(&modified.sql)));
    }
    if modified.data_source != original.data_source {
        parts.push(format!("--data-source {}", modified.data_source));
    }

    if parts.len() == 1 {
        return NO_CHANGE.to_string();
    }
    parts.join(" ")
}

/// Escapes a string for inclusion inside a double-quoted shell argument.
/// Backslashes first, then double quotes, then `$` — reordering would
/// double-escape the backslashes introduced by the later passes.
pub fn shell_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}
