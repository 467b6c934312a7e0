use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PARSE_CACHE_CAPACITY, ENV_LIBRARY_PATH, ENV_RC_PATH};
use crate::discovery::discover_default_dictionary_path;

/// Runtime configuration used by [`crate::Mecab::from_config`].
///
/// `Default` reads `MECAB_LIBRARY_PATH`, `MECAB_DIC_PATH` (or a discovered
/// `mecab-ko-dic` install) and `MECABRC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MecabConfig {
    /// Explicit `libmecab` path; `None` falls back to platform discovery.
    pub library_path: Option<PathBuf>,
    /// System dictionary directory (`-d`).
    pub dictionary_path: Option<PathBuf>,
    /// Compiled user dictionary (`-u`).
    pub user_dictionary_path: Option<PathBuf>,
    /// Resource file (`-r`).
    pub rc_path: Option<PathBuf>,
    /// Arguments appended verbatim after the generated ones.
    pub extra_args: Vec<String>,
    /// Number of sentences memoized by the tagger; `0` disables caching.
    pub parse_cache_capacity: usize,
}

impl Default for MecabConfig {
    fn default() -> Self {
        Self {
            library_path: env::var_os(ENV_LIBRARY_PATH).map(PathBuf::from),
            dictionary_path: discover_default_dictionary_path(),
            user_dictionary_path: None,
            rc_path: env::var_os(ENV_RC_PATH).map(PathBuf::from),
            extra_args: Vec::new(),
            parse_cache_capacity: DEFAULT_PARSE_CACHE_CAPACITY,
        }
    }
}

impl MecabConfig {
    /// Uses `libmecab` from an explicit path.
    pub fn with_library_path(mut self, library_path: impl AsRef<Path>) -> Self {
        self.library_path = Some(library_path.as_ref().to_path_buf());
        self
    }

    /// Uses an explicit system dictionary directory.
    pub fn with_dictionary_path(mut self, dictionary_path: impl AsRef<Path>) -> Self {
        self.dictionary_path = Some(dictionary_path.as_ref().to_path_buf());
        self
    }

    /// Loads a compiled user dictionary on top of the system one.
    pub fn with_user_dictionary_path(mut self, user_dictionary_path: impl AsRef<Path>) -> Self {
        self.user_dictionary_path = Some(user_dictionary_path.as_ref().to_path_buf());
        self
    }

    /// Uses an explicit `mecabrc`.
    pub fn with_rc_path(mut self, rc_path: impl AsRef<Path>) -> Self {
        self.rc_path = Some(rc_path.as_ref().to_path_buf());
        self
    }

    /// Appends one raw engine argument.
    pub fn add_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Sets the parse cache capacity.
    pub fn with_parse_cache_capacity(mut self, capacity: usize) -> Self {
        self.parse_cache_capacity = capacity;
        self
    }

    /// Argument vector handed to the engine, program name first.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["mecab".to_string()];
        let flags = [
            ("-d", self.dictionary_path.as_ref()),
            ("-u", self.user_dictionary_path.as_ref()),
            ("-r", self.rc_path.as_ref()),
        ];
        for (flag, path) in flags {
            if let Some(path) = path {
                args.push(flag.to_string());
                args.push(path.to_string_lossy().to_string());
            }
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[cfg(test)]
mod config_tests {
    use super::MecabConfig;
    use crate::constants::{
        DEFAULT_PARSE_CACHE_CAPACITY, ENV_DICTIONARY_PATH, ENV_LIBRARY_PATH, ENV_RC_PATH,
    };
    use crate::test_support::{with_env_var, with_env_vars};
    use std::path::PathBuf;

    #[test]
    fn default_reads_environment() {
        with_env_vars(
            &[
                (ENV_LIBRARY_PATH, Some("/opt/mecab/lib/libmecab.so")),
                (ENV_DICTIONARY_PATH, Some("/opt/mecab/dic/mecab-ko-dic")),
                (ENV_RC_PATH, Some("/opt/mecab/etc/mecabrc")),
            ],
            || {
                let config = MecabConfig::default();
                assert_eq!(
                    config.library_path,
                    Some(PathBuf::from("/opt/mecab/lib/libmecab.so"))
                );
                assert_eq!(
                    config.dictionary_path,
                    Some(PathBuf::from("/opt/mecab/dic/mecab-ko-dic"))
                );
                assert_eq!(
                    config.rc_path,
                    Some(PathBuf::from("/opt/mecab/etc/mecabrc"))
                );
                assert_eq!(config.user_dictionary_path, None);
                assert_eq!(config.parse_cache_capacity, DEFAULT_PARSE_CACHE_CAPACITY);
            },
        );
    }

    #[test]
    fn args_follow_flag_order() {
        let config = with_env_var(ENV_DICTIONARY_PATH, "/dic/system", || {
            MecabConfig::default()
                .with_user_dictionary_path("/dic/user.dic")
                .with_rc_path("/etc/mecabrc")
                .add_arg("--node-format=%m")
        });
        assert_eq!(
            config.to_args(),
            vec![
                "mecab",
                "-d",
                "/dic/system",
                "-u",
                "/dic/user.dic",
                "-r",
                "/etc/mecabrc",
                "--node-format=%m"
            ]
        );
    }

    #[test]
    fn args_skip_unset_paths() {
        let config = MecabConfig {
            library_path: None,
            dictionary_path: None,
            user_dictionary_path: None,
            rc_path: None,
            extra_args: Vec::new(),
            parse_cache_capacity: 0,
        };
        assert_eq!(config.to_args(), vec!["mecab"]);

        let config = config.with_dictionary_path("/dic");
        assert_eq!(config.to_args(), vec!["mecab", "-d", "/dic"]);
    }
}
