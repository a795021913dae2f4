use once_cell::sync::Lazy;
use regex_lite::Regex;

/// `<title> (<4-digit-year>)`, greedy on the title so the last parenthetical wins.
static TITLE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)\s+\((\d{4})\)$").expect("title/year pattern is valid")
});

/// Split a media folder name into title and optional year.
///
/// Returns `None` when no title remains.
pub fn parse_folder_name(folder_name: &str) -> Option<(String, Option<u16>)> {
    let folder_name = folder_name.trim();

    if let Some(caps) = TITLE_YEAR.captures(folder_name) {
        let title = caps[1].trim();
        let year = caps[2].parse().ok();
        if !title.is_empty() {
            return Some((title.to_string(), year));
        }
        return None;
    }

    if folder_name.is_empty() {
        None
    } else {
        Some((folder_name.to_string(), None))
    }
}
