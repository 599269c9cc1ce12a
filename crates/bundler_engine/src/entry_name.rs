/// Archive entry name for a source URL: the raw substring after the last `/`.
///
/// No percent-decoding and no collision handling; two URLs that share a final
/// segment produce two entries with the same name, and a URL ending in `/`
/// produces an empty name. Query strings are kept as part of the name.
pub fn derived_entry_name(url: &str) -> String {
    match url.rsplit('/').next() {
        Some(segment) => segment.to_string(),
        None => url.to_string(),
    }
}
