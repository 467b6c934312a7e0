use std::env;
use std::path::PathBuf;

use crate::constants::ENV_DICTIONARY_PATH;

pub(crate) fn default_library_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["libmecab.dll", "mecab.dll"]
    }
    #[cfg(target_os = "macos")]
    {
        &[
            "libmecab.dylib",
            "libmecab.2.dylib",
            "/usr/local/lib/libmecab.dylib",
            "/opt/homebrew/lib/libmecab.dylib",
            "@rpath/libmecab.dylib",
        ]
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        &[
            "libmecab.so",
            "libmecab.so.2",
            "/usr/local/lib/libmecab.so",
            "/usr/local/lib/libmecab.so.2",
            "/usr/lib/libmecab.so.2",
            "/usr/lib/x86_64-linux-gnu/libmecab.so.2",
            "/usr/lib/aarch64-linux-gnu/libmecab.so.2",
        ]
    }
}

pub(crate) fn discover_default_library_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let well_known = [
            PathBuf::from("C:\\mecab\\libmecab.dll"),
            PathBuf::from("C:\\Program Files\\MeCab\\bin\\libmecab.dll"),
        ];
        for path in well_known {
            if path.exists() {
                return Some(path);
            }
        }
    }

    #[cfg(target_os = "macos")]
    let file_name = "libmecab.dylib";
    #[cfg(all(unix, not(target_os = "macos")))]
    let file_name = "libmecab.so";

    #[cfg(unix)]
    {
        if let Some(home) = env::var_os("HOME") {
            let path = PathBuf::from(home)
                .join(".local")
                .join("lib")
                .join(file_name);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Resolves the mecab-ko-dic system dictionary directory.
///
/// `MECAB_DIC_PATH` wins unconditionally; otherwise the first existing
/// well-known install location is used.
pub(crate) fn discover_default_dictionary_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(ENV_DICTIONARY_PATH) {
        return Some(PathBuf::from(path));
    }

    #[cfg(target_os = "windows")]
    let candidates: &[&str] = &[
        "C:\\mecab\\mecab-ko-dic",
        "C:\\Program Files\\MeCab\\dic\\mecab-ko-dic",
    ];

    #[cfg(not(target_os = "windows"))]
    let candidates: &[&str] = &[
        "~/.local/lib/mecab/dic/mecab-ko-dic",
        "/usr/local/lib/mecab/dic/mecab-ko-dic",
        "/opt/homebrew/lib/mecab/dic/mecab-ko-dic",
        "/usr/lib/mecab/dic/mecab-ko-dic",
        "/usr/share/mecab/dic/mecab-ko-dic",
    ];

    for candidate in candidates {
        let path = if let Some(stripped) = candidate.strip_prefix("~/") {
            match env::var_os("HOME") {
                Some(home) => PathBuf::from(home).join(stripped),
                None => continue,
            }
        } else {
            PathBuf::from(candidate)
        };
        if path.is_dir() {
            return Some(path);
        }
    }

    None
}
