/// Joins a base URL and a check path with exactly one separating slash.
///
/// The path is cleaned first: empty and `.` segments are dropped and `..`
/// pops the previous segment, so `""`, `"/"` and `"a/.."` all resolve to
/// `base + "/"`.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("{}/{}", base.trim_end_matches('/'), segments.join("/"))
}
