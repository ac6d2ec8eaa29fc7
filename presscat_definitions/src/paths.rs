/// Join slash separated path elements and clean the result
///
/// Empty elements are ignored, repeated slashes collapse, `.` is dropped and
/// `..` pops the previous element. A leading slash on the first non-empty
/// element is kept; trailing slashes are not.
///
/// ```
/// use presscat_definitions::paths::join;
/// assert_eq!(join(&["example.com", "/blog/"]), "example.com/blog");
/// assert_eq!(join(&["bucket", ""]), "bucket");
/// assert_eq!(join(&["/", "wp"]), "/wp");
/// ```
pub fn join<S: AsRef<str>>(elems: &[S]) -> String {
    let elems: Vec<&str> = elems.iter().map(AsRef::as_ref).filter(|e| !e.is_empty()).collect();
    if elems.is_empty() {
        return String::new();
    }
    clean(&elems.join("/"))
}

/// Lexically clean a slash separated path
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = vec![];
    for p in path.split('/') {
        match p {
            "" | "." => {}
            ".." => {
                if parts.last().map(|l| *l != "..").unwrap_or(false) {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(p),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".into(),
        (false, false) => joined,
    }
}
