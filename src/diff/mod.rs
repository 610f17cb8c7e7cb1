use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Context,
    Removed,
    Added,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffLine {
    pub tag: DiffTag,
    pub text: String,
}

/// All diff lines for one changed field, bounded in the rendered output by
/// a `--- <field>` / `+++ <field>` marker pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    pub field: &'static str,
    pub lines: Vec<DiffLine>,
}

/// Compares two query snapshots field by field, in a fixed order, and
/// returns one group per changed field. Unchanged fields produce nothing,
/// so `diff_queries(a, a)` is always empty. The output depends only on the
/// two inputs.
pub fn diff_queries(original: &Query, modified: &Query) -> Vec<FieldDiff> {
    let mut groups = Vec::new();

    let string_fields: [(&'static str, &str, &str); 6] = [
        ("id", &original.id, &modified.id),
        ("name", &original.name, &modified.name),
        ("description", &original.description, &modified.description),
        ("sql", &original.sql, &modified.sql),
        ("data_source", &original.data_source, &modified.data_source),
        ("created_by", &original.created_by, &modified.created_by),
    ];
    for (field, a, b) in string_fields {
        if a != b {
            groups.push(FieldDiff {
                field,
                lines: diff_lines(a, b),
            });
        }
    }

    let timestamp_fields = [
        ("created_at", &original.created_at, &modified.created_at),
        ("updated_at", &original.updated_at, &modified.updated_at),
    ];
    for (field, a, b) in timestamp_fields {
        if a != b {
            groups.push(FieldDiff {
                field,
                lines: vec![
                    removed(timestamp_repr(a)),
                    added(timestamp_repr(b)),
                ],
            });
        }
    }

    groups
}

/// Positional line comparison: lines are matched up by index, iterating to
/// the longer of the two sides. Equal lines emit context, original-only
/// lines removed, modified-only added, and a differing pair emits the
/// removed line followed by the added one.
fn diff_lines(original: &str, modified: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = original.lines().collect();
    let b: Vec<&str> = modified.lines().collect();
    let mut lines = Vec::new();

    for i in 0..a.len().max(b.len()) {
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) if x == y => lines.push(DiffLine {
                tag: DiffTag::Context,
                text: (*x).to_string(),
            }),
            (Some(x), Some(y)) => {
                lines.push(removed((*x).to_string()));
                lines.push(added((*y).to_string()));
            }
            (Some(x), None) => lines.push(removed((*x).to_string())),
            (None, Some(y)) => lines.push(added((*y).to_string())),
            (None, None) => unreachable!(),
        }
    }

    lines
}

fn removed(text: String) -> DiffLine {
    DiffLine {
        tag: DiffTag::Removed,
        text,
    }
}

fn added(text: String) -> DiffLine {
    DiffLine {
        tag: DiffTag::Added,
        text,
    }
}

fn timestamp_repr(ts: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Plain-text rendering: marker pair, tagged lines, one empty separator
/// line after each field group. Callers that want color apply it per line.
pub fn format_diff(groups: &[FieldDiff]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("--- {}\n", group.field));
        out.push_str(&format!("+++ {}\n", group.field));
        for line in &group.lines {
            let prefix = match line.tag {
                DiffTag::Context => ' ',
                DiffTag::Removed => '-',
                DiffTag::Added => '+',
            };
            out.push(prefix);
            out.push_str(&line.text);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
