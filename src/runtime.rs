use std::env;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::MecabConfig;
use crate::constants::{
    ENV_LIBRARY_PATH, MECAB_ALLOCATE_SENTENCE, MECAB_BOS_NODE, MECAB_EOS_NODE, MECAB_ONE_BEST,
};
use crate::discovery::{default_library_candidates, discover_default_library_path};
use crate::error::{MecabError, Result};
use crate::model::{DictionaryInfo, DictionaryKind};
use crate::native::{
    api_error, bytes_to_string, cstr_to_string, read_lattice_error, DynamicLibrary, LoadedLibrary,
    MecabApi, MecabLatticeHandle, MecabModelHandle, MecabTaggerHandle,
};
use crate::tagger::Analyzer;

/// Handle to a loaded `libmecab` plus its resolved function table.
#[derive(Clone)]
pub struct MecabLibrary {
    inner: Arc<LoadedLibrary>,
}

impl MecabLibrary {
    /// Loads `libmecab` from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let library = DynamicLibrary::open(path)?;
        Self::from_library(library)
    }

    /// Loads `libmecab` from common platform-specific locations and caches it.
    pub fn load_default() -> Result<Self> {
        static DEFAULT_LIBRARY: Mutex<Option<Arc<LoadedLibrary>>> = Mutex::new(None);

        let mut guard = DEFAULT_LIBRARY.lock().map_err(|_| {
            MecabError::LibraryLoad("failed to lock default library cache".to_string())
        })?;

        if let Some(inner) = guard.as_ref() {
            return Ok(Self {
                inner: inner.clone(),
            });
        }

        let inner = Self::load_default_internal()?.inner;
        *guard = Some(inner.clone());
        Ok(Self { inner })
    }

    fn load_default_internal() -> Result<Self> {
        let mut errors = Vec::new();

        if let Some(path) = discover_default_library_path() {
            match Self::load(&path) {
                Ok(loaded) => {
                    log::info!("loaded libmecab from {}", path.display());
                    return Ok(loaded);
                }
                Err(error) => errors.push(format!("{}: {}", path.display(), error)),
            }
        }

        for candidate in default_library_candidates() {
            let library = match DynamicLibrary::open(candidate) {
                Ok(library) => library,
                Err(error) => {
                    errors.push(format!("{candidate}: {error}"));
                    continue;
                }
            };

            match Self::from_library(library) {
                Ok(loaded) => {
                    log::info!("loaded libmecab from {candidate}");
                    return Ok(loaded);
                }
                Err(error) => errors.push(format!("{candidate}: {error}")),
            }
        }

        Err(MecabError::LibraryLoad(format!(
            "set {ENV_LIBRARY_PATH} to the libmecab path. tried: {}",
            errors.join(" | ")
        )))
    }

    /// Loads from `MECAB_LIBRARY_PATH` if set, otherwise falls back to
    /// [`Self::load_default`].
    pub fn load_from_env_or_default() -> Result<Self> {
        if let Some(path) = env::var_os(ENV_LIBRARY_PATH) {
            return Self::load(PathBuf::from(path));
        }
        Self::load_default()
    }

    /// Returns the loaded MeCab version string.
    pub fn version(&self) -> Result<String> {
        let pointer = unsafe { (self.inner.api.mecab_version)() };
        if pointer.is_null() {
            return Err(api_error(
                &self.inner.api,
                "mecab_version returned a null pointer",
            ));
        }
        Ok(unsafe { CStr::from_ptr(pointer) }
            .to_string_lossy()
            .to_string())
    }

    /// Creates a model and tagger from engine arguments (`argv[0]` included).
    pub fn tagger(&self, args: &[String]) -> Result<NativeTagger> {
        NativeTagger::with_library(self.clone(), args)
    }

    fn api(&self) -> &MecabApi {
        &self.inner.api
    }

    fn from_library(library: DynamicLibrary) -> Result<Self> {
        let api = unsafe { MecabApi::load(&library)? };
        Ok(Self {
            inner: Arc::new(LoadedLibrary {
                _library: library,
                api,
            }),
        })
    }
}

/// [`Analyzer`] backed by a loaded MeCab model.
///
/// Every call allocates its own lattice, so one instance may be shared
/// between threads.
pub struct NativeTagger {
    library: MecabLibrary,
    model: MecabModelHandle,
    tagger: MecabTaggerHandle,
}

impl NativeTagger {
    /// Creates a tagger using [`MecabConfig::default`].
    pub fn new() -> Result<Self> {
        Self::from_config(&MecabConfig::default())
    }

    /// Loads the library named by `config` (or the default one) and builds
    /// a model from its dictionary settings.
    pub fn from_config(config: &MecabConfig) -> Result<Self> {
        let library = match config.library_path.as_ref() {
            Some(path) => MecabLibrary::load(path)?,
            None => MecabLibrary::load_default()?,
        };
        Self::with_library(library, &config.to_args())
    }

    fn with_library(library: MecabLibrary, args: &[String]) -> Result<Self> {
        let args_c = args
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut argv: Vec<*mut c_char> = args_c
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .collect();

        let api = library.api();
        let model = unsafe { (api.mecab_model_new)(argv.len() as c_int, argv.as_mut_ptr()) };
        if model.is_null() {
            return Err(api_error(api, "mecab_model_new returned a null handle"));
        }

        let tagger = unsafe { (api.mecab_model_new_tagger)(model) };
        if tagger.is_null() {
            unsafe { (api.mecab_model_destroy)(model) };
            return Err(api_error(
                api,
                "mecab_model_new_tagger returned a null handle",
            ));
        }

        log::info!("mecab model ready ({})", args.join(" "));
        Ok(Self {
            library,
            model,
            tagger,
        })
    }

    /// Library this tagger was created from.
    pub fn library(&self) -> &MecabLibrary {
        &self.library
    }

    /// Dictionaries loaded by the model, system dictionary first.
    pub fn dictionary_info(&self) -> Result<Vec<DictionaryInfo>> {
        let dictionary_info = require_optional_api(
            self.library.api().mecab_model_dictionary_info,
            "mecab_model_dictionary_info",
        )?;

        let mut infos = Vec::new();
        let mut current = unsafe { dictionary_info(self.model) };
        while !current.is_null() {
            let raw = unsafe { &*current };
            infos.push(DictionaryInfo::from_raw(raw));
            current = raw.next;
        }
        Ok(infos)
    }

    pub(crate) fn system_dictionary(&self) -> Result<Option<DictionaryInfo>> {
        Ok(self
            .dictionary_info()?
            .into_iter()
            .find(|info| info.kind == DictionaryKind::System))
    }
}

impl Analyzer for NativeTagger {
    fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
        let sentence_c = CString::new(sentence)?;
        let api = self.library.api();
        let lattice = Lattice::new(api, self.model)?;

        unsafe {
            (api.mecab_lattice_add_request_type)(
                lattice.handle,
                MECAB_ONE_BEST | MECAB_ALLOCATE_SENTENCE,
            );
            (api.mecab_lattice_set_sentence2)(
                lattice.handle,
                sentence_c.as_ptr(),
                sentence.len(),
            );
        }

        if unsafe { (api.mecab_parse_lattice)(self.tagger, lattice.handle) } == 0 {
            let message = read_lattice_error(api, lattice.handle)
                .unwrap_or_else(|| "mecab_parse_lattice failed".to_string());
            log::warn!("analysis failed: {message}");
            return Err(MecabError::Analysis(message));
        }

        let mut pairs = Vec::new();
        let mut node = unsafe { (api.mecab_lattice_get_bos_node)(lattice.handle) };
        while !node.is_null() {
            let raw = unsafe { &*node };
            if raw.stat != MECAB_BOS_NODE && raw.stat != MECAB_EOS_NODE {
                pairs.push((
                    bytes_to_string(raw.surface, raw.length as usize),
                    cstr_to_string(raw.feature),
                ));
            }
            node = raw.next;
        }
        Ok(pairs)
    }
}

impl Drop for NativeTagger {
    fn drop(&mut self) {
        let api = self.library.api();
        unsafe {
            if !self.tagger.is_null() {
                (api.mecab_destroy)(self.tagger);
            }
            if !self.model.is_null() {
                (api.mecab_model_destroy)(self.model);
            }
        }
    }
}

// Model and tagger are immutable after creation; per-call state lives in
// the lattice.
unsafe impl Send for NativeTagger {}
unsafe impl Sync for NativeTagger {}

struct Lattice<'a> {
    api: &'a MecabApi,
    handle: MecabLatticeHandle,
}

impl<'a> Lattice<'a> {
    fn new(api: &'a MecabApi, model: MecabModelHandle) -> Result<Self> {
        let handle = unsafe { (api.mecab_model_new_lattice)(model) };
        if handle.is_null() {
            return Err(api_error(
                api,
                "mecab_model_new_lattice returned a null handle",
            ));
        }
        Ok(Self { api, handle })
    }
}

impl Drop for Lattice<'_> {
    fn drop(&mut self) {
        unsafe { (self.api.mecab_lattice_destroy)(self.handle) };
    }
}

fn require_optional_api<T: Copy>(function: Option<T>, name: &'static str) -> Result<T> {
    function.ok_or_else(|| {
        MecabError::Api(format!(
            "{name} is unavailable in the loaded libmecab version"
        ))
    })
}
