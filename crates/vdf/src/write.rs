use crate::value::{Object, Value};

/// Serializes a block in the layout Steam writes: tab indentation, two tabs
/// between key and value, braces on their own lines.
pub fn to_string(root: &Object) -> String {
    let mut out = String::new();
    write_object(&mut out, root, 0);
    out
}

fn write_object(out: &mut String, obj: &Object, depth: usize) {
    for (key, value) in obj.iter() {
        indent(out, depth);
        write_quoted(out, key);
        match value {
            Value::String(s) => {
                out.push_str("\t\t");
                write_quoted(out, s);
                out.push('\n');
            }
            Value::Object(child) => {
                out.push('\n');
                indent(out, depth);
                out.push_str("{\n");
                write_object(out, child, depth + 1);
                indent(out, depth);
                out.push_str("}\n");
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
