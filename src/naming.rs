//! Identifier casing and qualified-name helpers.
//!
//! All functions here are pure. The casing rules determine every generated
//! identifier, so they must stay byte-for-byte stable across releases.

/// Extensions stripped from a schema file name before the output suffix is added.
const SCHEMA_EXTENSIONS: &[&str] = &[".proto", ".protodevel"];

/// Suffix of every generated file.
pub const OUTPUT_EXTENSION: &str = ".pb.js";

/// JavaScript reserved words that cannot be used as parameter names,
/// including those reserved only in strict mode.
const JS_KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Convert a schema identifier to CamelCase.
///
/// An interior underscore followed by a lowercase letter is dropped and the
/// letter upper-cased. A leading underscore becomes `X`. Digits are words of
/// their own, so the letter following a digit starts a new word.
///
/// - `"my_field_name"` → `"MyFieldName"`
/// - `"_my_field_name_2"` → `"XMyFieldName_2"`
/// - `"Foo_Bar"` → `"Foo_Bar"`
pub fn camel_case(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 1);
    let mut i = 0;

    if bytes.first() == Some(&b'_') {
        out.push(b'X');
        i = 1;
    }

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'_' && bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c);
            i += 1;
            continue;
        }
        // Start of a word: must be upper case, then swallow the lowercase run.
        out.push(c.to_ascii_uppercase());
        i += 1;
        while let Some(&next) = bytes.get(i) {
            if !next.is_ascii_lowercase() {
                break;
            }
            out.push(next);
            i += 1;
        }
    }

    // Only ASCII bytes were rewritten, so multi-byte sequences pass through intact.
    String::from_utf8_lossy(&out).into_owned()
}

/// CamelCase a type-name path joined with `_`: `["Foo", "bar_baz"]` → `"FooBarBaz"`.
pub fn camel_case_slice<S: AsRef<str>>(parts: &[S]) -> String {
    camel_case(&join(parts, "_"))
}

/// Join a type-name path with `.`.
pub fn dotted_slice<S: AsRef<str>>(parts: &[S]) -> String {
    join(parts, ".")
}

fn join<S: AsRef<str>>(parts: &[S], sep: &str) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Replace every character that cannot appear in an identifier with `_`.
///
/// - `"foo.bar-baz"` → `"foo_bar_baz"`
pub fn sanitize_identifier(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The last path element of a file name with its last extension removed.
///
/// - `"google/protobuf/empty.proto"` → `"empty"`
pub fn base_name(name: &str) -> &str {
    let last = name.rsplit('/').next().unwrap_or(name);
    match last.rfind('.') {
        Some(i) => &last[..i],
        None => last,
    }
}

/// The generated artifact name for a schema file.
///
/// - `"foo/bar.proto"` → `"foo/bar.pb.js"`
/// - `"foo/bar.txt"` → `"foo/bar.txt.pb.js"`
pub fn output_file_name(name: &str) -> String {
    let stem = SCHEMA_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);
    format!("{stem}{OUTPUT_EXTENSION}")
}

/// A parameter name safe to use in generated code: keywords get a trailing `_`.
pub fn js_param_name(name: &str) -> String {
    if JS_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Join a namespace path with `.`, skipping empty segments.
///
/// - `("", "pkg", "Foo")` → `"pkg.Foo"`
/// - `("com.acme", "pkg", "Foo")` → `"com.acme.pkg.Foo"`
pub fn qualify(prefix: &str, namespace: &str, name: &str) -> String {
    [prefix, namespace, name]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}
