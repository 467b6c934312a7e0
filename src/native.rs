use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_float, c_int, c_long, c_short, c_uchar, c_uint, c_ushort, c_void};
use std::path::Path;
use std::ptr;

use crate::error::{MecabError, Result};

pub(crate) type MecabModelHandle = *mut c_void;
pub(crate) type MecabTaggerHandle = *mut c_void;
pub(crate) type MecabLatticeHandle = *mut c_void;

/// Mirror of `mecab_node_t`.
#[allow(dead_code)]
#[repr(C)]
pub(crate) struct MecabNodeRaw {
    pub(crate) prev: *mut MecabNodeRaw,
    pub(crate) next: *mut MecabNodeRaw,
    pub(crate) enext: *mut MecabNodeRaw,
    pub(crate) bnext: *mut MecabNodeRaw,
    pub(crate) rpath: *mut c_void,
    pub(crate) lpath: *mut c_void,
    pub(crate) surface: *const c_char,
    pub(crate) feature: *const c_char,
    pub(crate) id: c_uint,
    pub(crate) length: c_ushort,
    pub(crate) rlength: c_ushort,
    pub(crate) rc_attr: c_ushort,
    pub(crate) lc_attr: c_ushort,
    pub(crate) posid: c_ushort,
    pub(crate) char_type: c_uchar,
    pub(crate) stat: c_uchar,
    pub(crate) isbest: c_uchar,
    pub(crate) alpha: c_float,
    pub(crate) beta: c_float,
    pub(crate) prob: c_float,
    pub(crate) wcost: c_short,
    pub(crate) cost: c_long,
}

/// Mirror of `mecab_dictionary_info_t`.
#[repr(C)]
pub(crate) struct MecabDictionaryInfoRaw {
    pub(crate) filename: *const c_char,
    pub(crate) charset: *const c_char,
    pub(crate) size: c_uint,
    pub(crate) kind: c_int,
    pub(crate) lsize: c_uint,
    pub(crate) rsize: c_uint,
    pub(crate) version: c_ushort,
    pub(crate) next: *const MecabDictionaryInfoRaw,
}

type FnMecabVersion = unsafe extern "C" fn() -> *const c_char;
type FnMecabStrerror = unsafe extern "C" fn(MecabTaggerHandle) -> *const c_char;
type FnMecabDestroy = unsafe extern "C" fn(MecabTaggerHandle);
type FnMecabModelNew = unsafe extern "C" fn(c_int, *mut *mut c_char) -> MecabModelHandle;
type FnMecabModelDestroy = unsafe extern "C" fn(MecabModelHandle);
type FnMecabModelNewTagger = unsafe extern "C" fn(MecabModelHandle) -> MecabTaggerHandle;
type FnMecabModelNewLattice = unsafe extern "C" fn(MecabModelHandle) -> MecabLatticeHandle;
type FnMecabModelDictionaryInfo =
    unsafe extern "C" fn(MecabModelHandle) -> *const MecabDictionaryInfoRaw;
type FnMecabParseLattice = unsafe extern "C" fn(MecabTaggerHandle, MecabLatticeHandle) -> c_int;
type FnMecabLatticeSetSentence2 = unsafe extern "C" fn(MecabLatticeHandle, *const c_char, usize);
type FnMecabLatticeAddRequestType = unsafe extern "C" fn(MecabLatticeHandle, c_int);
type FnMecabLatticeGetBosNode = unsafe extern "C" fn(MecabLatticeHandle) -> *const MecabNodeRaw;
type FnMecabLatticeStrerror = unsafe extern "C" fn(MecabLatticeHandle) -> *const c_char;
type FnMecabLatticeDestroy = unsafe extern "C" fn(MecabLatticeHandle);

/// Resolved libmecab function table.
pub(crate) struct MecabApi {
    pub(crate) mecab_version: FnMecabVersion,
    pub(crate) mecab_strerror: FnMecabStrerror,
    pub(crate) mecab_destroy: FnMecabDestroy,
    pub(crate) mecab_model_new: FnMecabModelNew,
    pub(crate) mecab_model_destroy: FnMecabModelDestroy,
    pub(crate) mecab_model_new_tagger: FnMecabModelNewTagger,
    pub(crate) mecab_model_new_lattice: FnMecabModelNewLattice,
    pub(crate) mecab_model_dictionary_info: Option<FnMecabModelDictionaryInfo>,
    pub(crate) mecab_parse_lattice: FnMecabParseLattice,
    pub(crate) mecab_lattice_set_sentence2: FnMecabLatticeSetSentence2,
    pub(crate) mecab_lattice_add_request_type: FnMecabLatticeAddRequestType,
    pub(crate) mecab_lattice_get_bos_node: FnMecabLatticeGetBosNode,
    pub(crate) mecab_lattice_strerror: FnMecabLatticeStrerror,
    pub(crate) mecab_lattice_destroy: FnMecabLatticeDestroy,
}

impl MecabApi {
    pub(crate) unsafe fn load(library: &DynamicLibrary) -> Result<Self> {
        Ok(Self {
            mecab_version: library.load_symbol("mecab_version")?,
            mecab_strerror: library.load_symbol("mecab_strerror")?,
            mecab_destroy: library.load_symbol("mecab_destroy")?,
            mecab_model_new: library.load_symbol("mecab_model_new")?,
            mecab_model_destroy: library.load_symbol("mecab_model_destroy")?,
            mecab_model_new_tagger: library.load_symbol("mecab_model_new_tagger")?,
            mecab_model_new_lattice: library.load_symbol("mecab_model_new_lattice")?,
            mecab_model_dictionary_info: library
                .load_symbol_optional("mecab_model_dictionary_info")?,
            mecab_parse_lattice: library.load_symbol("mecab_parse_lattice")?,
            mecab_lattice_set_sentence2: library.load_symbol("mecab_lattice_set_sentence2")?,
            mecab_lattice_add_request_type: library
                .load_symbol("mecab_lattice_add_request_type")?,
            mecab_lattice_get_bos_node: library.load_symbol("mecab_lattice_get_bos_node")?,
            mecab_lattice_strerror: library.load_symbol("mecab_lattice_strerror")?,
            mecab_lattice_destroy: library.load_symbol("mecab_lattice_destroy")?,
        })
    }
}

pub(crate) struct LoadedLibrary {
    pub(crate) _library: DynamicLibrary,
    pub(crate) api: MecabApi,
}

#[derive(Debug)]
pub(crate) struct DynamicLibrary {
    handle: *mut c_void,
}

impl DynamicLibrary {
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_string = path.as_ref().to_string_lossy().to_string();
        let path_c = CString::new(path_string.clone())?;
        let handle = unsafe { platform_open(path_c.as_ptr()) };
        if handle.is_null() {
            return Err(MecabError::LibraryLoad(format!(
                "{} ({})",
                path_string,
                platform_last_error()
            )));
        }
        Ok(Self { handle })
    }

    pub(crate) unsafe fn load_symbol<T: Copy>(&self, symbol_name: &str) -> Result<T> {
        let symbol_c = CString::new(symbol_name)?;
        let symbol_ptr = platform_symbol(self.handle, symbol_c.as_ptr());
        if symbol_ptr.is_null() {
            return Err(MecabError::SymbolLoad(format!(
                "{} ({})",
                symbol_name,
                platform_last_error()
            )));
        }
        Ok(std::mem::transmute_copy::<*mut c_void, T>(&symbol_ptr))
    }

    pub(crate) unsafe fn load_symbol_optional<T: Copy>(
        &self,
        symbol_name: &str,
    ) -> Result<Option<T>> {
        let symbol_c = CString::new(symbol_name)?;
        let symbol_ptr = platform_symbol(self.handle, symbol_c.as_ptr());
        if symbol_ptr.is_null() {
            return Ok(None);
        }
        Ok(Some(std::mem::transmute_copy::<*mut c_void, T>(
            &symbol_ptr,
        )))
    }
}

impl Drop for DynamicLibrary {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        unsafe {
            platform_close(self.handle);
        }
        self.handle = ptr::null_mut();
    }
}

// The handle is only used for symbol lookup and close, both thread-safe in
// the platform loaders.
unsafe impl Send for DynamicLibrary {}
unsafe impl Sync for DynamicLibrary {}

/// Global error message (`mecab_strerror(NULL)`), set when model creation fails.
pub(crate) fn read_global_error(api: &MecabApi) -> Option<String> {
    non_empty_message(unsafe { (api.mecab_strerror)(ptr::null_mut()) })
}

pub(crate) fn read_lattice_error(api: &MecabApi, lattice: MecabLatticeHandle) -> Option<String> {
    non_empty_message(unsafe { (api.mecab_lattice_strerror)(lattice) })
}

pub(crate) fn api_error(api: &MecabApi, fallback: &str) -> MecabError {
    match read_global_error(api) {
        Some(message) => MecabError::Api(message),
        None => MecabError::Api(fallback.to_string()),
    }
}

fn non_empty_message(pointer: *const c_char) -> Option<String> {
    if pointer.is_null() {
        return None;
    }
    let message = unsafe { CStr::from_ptr(pointer) }
        .to_string_lossy()
        .trim()
        .to_string();
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

pub(crate) fn cstr_to_string(pointer: *const c_char) -> String {
    if pointer.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(pointer) }
        .to_string_lossy()
        .to_string()
}

/// Copies `length` bytes starting at `pointer`; node surfaces are not
/// NUL-terminated.
pub(crate) fn bytes_to_string(pointer: *const c_char, length: usize) -> String {
    if pointer.is_null() || length == 0 {
        return String::new();
    }
    let bytes = unsafe { std::slice::from_raw_parts(pointer.cast::<u8>(), length) };
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(target_os = "windows")]
#[link(name = "kernel32")]
extern "system" {
    fn LoadLibraryA(lp_lib_file_name: *const c_char) -> *mut c_void;
    fn GetProcAddress(h_module: *mut c_void, lp_proc_name: *const c_char) -> *mut c_void;
    fn FreeLibrary(h_lib_module: *mut c_void) -> i32;
    fn GetLastError() -> u32;
}

#[cfg(target_os = "windows")]
unsafe fn platform_open(path: *const c_char) -> *mut c_void {
    LoadLibraryA(path)
}

#[cfg(target_os = "windows")]
unsafe fn platform_symbol(handle: *mut c_void, symbol: *const c_char) -> *mut c_void {
    GetProcAddress(handle, symbol)
}

#[cfg(target_os = "windows")]
unsafe fn platform_close(handle: *mut c_void) {
    let _ = FreeLibrary(handle);
}

#[cfg(target_os = "windows")]
fn platform_last_error() -> String {
    format!("GetLastError={}", unsafe { GetLastError() })
}

#[cfg(target_os = "linux")]
#[link(name = "dl")]
extern "C" {
    fn dlopen(filename: *const c_char, flags: c_int) -> *mut c_void;
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
    fn dlclose(handle: *mut c_void) -> c_int;
    fn dlerror() -> *const c_char;
}

#[cfg(all(unix, not(target_os = "linux")))]
extern "C" {
    fn dlopen(filename: *const c_char, flags: c_int) -> *mut c_void;
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
    fn dlclose(handle: *mut c_void) -> c_int;
    fn dlerror() -> *const c_char;
}

#[cfg(unix)]
unsafe fn platform_open(path: *const c_char) -> *mut c_void {
    const RTLD_NOW: c_int = 2;
    const RTLD_LOCAL: c_int = 0;
    dlopen(path, RTLD_NOW | RTLD_LOCAL)
}

#[cfg(unix)]
unsafe fn platform_symbol(handle: *mut c_void, symbol: *const c_char) -> *mut c_void {
    dlsym(handle, symbol)
}

#[cfg(unix)]
unsafe fn platform_close(handle: *mut c_void) {
    let _ = dlclose(handle);
}

#[cfg(unix)]
fn platform_last_error() -> String {
    let pointer = unsafe { dlerror() };
    if pointer.is_null() {
        "unknown error".to_string()
    } else {
        let full = unsafe { CStr::from_ptr(pointer) }
            .to_string_lossy()
            .to_string();
        full.split(": tried:").next().unwrap_or(&full).to_string()
    }
}
