//! Fuzzy file name matching
//!
//! Scores are edit-distance similarities on a 0-100 scale. Thresholds come
//! from [`MatchSettings`].

use xtool_core::MatchSettings;

/// Similarity of two names, 0 (nothing in common) to 100 (identical)
pub fn similarity(a: &str, b: &str) -> u8 {
    let score = strsim::normalized_levenshtein(a, b) * 100.0;
    score.round().clamp(0.0, 100.0) as u8
}

/// Name without its last extension (`trid.exe` -> `trid`, `.profile` stays)
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Whether a listed name could be launched: no extension at all, or an
/// allow-listed one. Directory entries never qualify.
pub fn is_potentially_executable(name: &str, settings: &MatchSettings) -> bool {
    if name.ends_with('/') {
        return false;
    }
    !name.contains('.') || settings.is_executable_name(name)
}

/// Best fuzzy match for `name` among `files`
///
/// The closest candidate wins (first one on ties) and is accepted only when
/// its score is above the accept threshold and it carries an executable
/// suffix.
pub fn fuzzy_find(name: &str, files: &[String], settings: &MatchSettings) -> Option<String> {
    let needle = name.to_lowercase();
    let mut best: Option<(&String, u8)> = None;

    for file in files {
        let score = similarity(&needle, &file.to_lowercase());
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((file, score));
        }
    }

    let (file, score) = best?;
    if score > settings.accept_score && settings.is_executable_name(file) {
        Some(file.clone())
    } else {
        None
    }
}

/// Most likely executable of a package
///
/// Every potentially executable file whose extension-less name scores at
/// least the accept threshold against `package_name` is a candidate; the
/// highest score wins and the scan stops at the early-exit score.
pub fn resolve_executable(
    package_name: &str,
    files: &[String],
    settings: &MatchSettings,
) -> Option<String> {
    let mut best: Option<(&String, u8)> = None;

    for file in files {
        if !is_potentially_executable(file, settings) {
            continue;
        }
        let score = similarity(strip_extension(file), package_name);
        if score < settings.accept_score {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((file, score));
        }
        if score >= settings.early_exit_score {
            break;
        }
    }

    best.map(|(file, _)| file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("trid", "trid"), 100);
        assert_eq!(similarity("abc", "xyz"), 0);
        assert!(similarity("trid", "trid2") >= 80);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("trid.exe"), "trid");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("trid"), "trid");
        assert_eq!(strip_extension(".profile"), ".profile");
    }

    #[test]
    fn test_fuzzy_find_requires_executable_suffix() {
        let settings = MatchSettings::default();
        let listed = files(&["readme.txt", "tridnet.exe", "trid.txt"]);

        assert_eq!(
            fuzzy_find("tridnet.ex", &listed, &settings),
            Some("tridnet.exe".to_string())
        );
        assert_eq!(fuzzy_find("trid.tx", &listed, &settings), None);
        assert_eq!(fuzzy_find("zzzz", &listed, &settings), None);
        assert_eq!(fuzzy_find("trid.exe", &[], &settings), None);
    }

    #[test]
    fn test_resolve_prefers_higher_score() {
        let settings = MatchSettings::default();
        let listed = files(&["tridx.exe", "trid.exe", "trid.txt"]);

        assert_eq!(
            resolve_executable("trid", &listed, &settings),
            Some("trid.exe".to_string())
        );
    }

    #[test]
    fn test_resolve_skips_non_executables_and_directories() {
        let settings = MatchSettings::default();
        let listed = files(&["trid/", "trid.txt", "trid.dll"]);
        assert_eq!(resolve_executable("trid", &listed, &settings), None);

        let listed = files(&["trid/", "trid"]);
        assert_eq!(
            resolve_executable("trid", &listed, &settings),
            Some("trid".to_string())
        );
    }

    #[test]
    fn test_resolve_below_threshold() {
        let settings = MatchSettings::default();
        let listed = files(&["setup.exe", "uninstall.exe"]);
        assert_eq!(resolve_executable("trid", &listed, &settings), None);
    }
}
