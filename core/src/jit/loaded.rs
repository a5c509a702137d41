//! jit/loaded.rs
//! A compressor living inside a dynamically loaded artifact.
//!
//! Design notes:
//! - `LoadedLibrary` owns the `libloading::Library` and, for uncached compiles,
//!   the temporary directory holding the artifact; the library is unloaded
//!   before the directory is removed.
//! - Every `LoadedCompressor` holds an `Arc<LoadedLibrary>` so code stays mapped
//!   while any instance (including clones) is alive.
//! - All unsafe code of the crate is in this file.
#![allow(unsafe_code)]

use std::os::raw::c_void;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use tempfile::TempDir;

use crate::data::{decode_frame, encode_request, PressioData};
use crate::jit::abi::{
    PluginEntry, PluginOp, PluginVTable, OP_UNSUPPORTED, PLUGIN_ABI_VERSION, PLUGIN_ENTRY_SYMBOL,
};
use crate::options::Options;
use crate::plugin::{CompressorPlugin, Configurable, Versionable};
use crate::types::{JitError, JitResult};

pub struct LoadedLibrary {
    // Field order matters: the library is dropped before the directory.
    library: Library,
    path: PathBuf,
    _workdir: Option<TempDir>,
}

impl LoadedLibrary {
    /// Map the artifact at `path` into the process.
    pub fn open(path: &Path, workdir: Option<TempDir>) -> JitResult<Arc<Self>> {
        // SAFETY: loading runs the artifact's initializers. The artifact was
        // produced from source the caller chose to compile; no sandboxing is
        // applied.
        let library = unsafe { Library::new(path) }
            .map_err(|e| JitError::Load(format!("{}: {}", path.display(), e)))?;
        Ok(Arc::new(Self { library, path: path.to_path_buf(), _workdir: workdir }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn vtable(&self) -> JitResult<PluginVTable> {
        // SAFETY: the symbol type matches the documented ABI; the returned
        // pointer refers to a static inside the library, which outlives this call.
        unsafe {
            let entry: Symbol<PluginEntry> = self
                .library
                .get(PLUGIN_ENTRY_SYMBOL)
                .map_err(|e| JitError::Load(format!("missing plugin entry point: {}", e)))?;
            let vtable = entry();
            if vtable.is_null() {
                return Err(JitError::Load("plugin entry point returned null".into()));
            }
            let abi_version = (*vtable).abi_version;
            if abi_version != PLUGIN_ABI_VERSION {
                return Err(JitError::Load(format!(
                    "plugin ABI mismatch: expected {} got {}",
                    PLUGIN_ABI_VERSION, abi_version
                )));
            }
            Ok(*vtable)
        }
    }
}

unsafe extern "C" fn collect_sink(ctx: *mut c_void, data: *const u8, len: usize) {
    if ctx.is_null() || data.is_null() || len == 0 {
        return;
    }
    // SAFETY: `ctx` is the `Vec<u8>` passed by `LoadedCompressor::call`, alive
    // for the duration of that call; `data` is valid for `len` bytes per the ABI.
    let buf = &mut *(ctx as *mut Vec<u8>);
    buf.extend_from_slice(std::slice::from_raw_parts(data, len));
}

/// Compressor implementation backed by a loaded artifact.
pub struct LoadedCompressor {
    instance: *mut c_void,
    vtable: PluginVTable,
    name: String,
    prefix: String,
    version: String,
    library: Arc<LoadedLibrary>,
}

// SAFETY: the instance pointer is owned exclusively by this value and only
// used through `&self`/`&mut self`; moving it to another thread is fine,
// sharing it is not (no `Sync`).
unsafe impl Send for LoadedCompressor {}

impl LoadedCompressor {
    /// Create a fresh instance from a loaded artifact.
    pub fn load(library: Arc<LoadedLibrary>) -> JitResult<Self> {
        let vtable = library.vtable()?;
        // SAFETY: `create` comes from a validated vtable.
        let instance = unsafe { (vtable.create)() };
        if instance.is_null() {
            return Err(JitError::Load("plugin create returned null".into()));
        }
        let mut loaded = Self {
            instance,
            vtable,
            name: String::new(),
            prefix: String::new(),
            version: String::new(),
            library,
        };
        loaded.prefix = loaded.query_string(PluginOp::Prefix).unwrap_or_else(|| "jit".to_string());
        loaded.version = loaded.query_string(PluginOp::Version).unwrap_or_else(|| "0.0.0".to_string());
        tracing::debug!(
            prefix = %loaded.prefix,
            version = %loaded.version,
            path = %loaded.library_path().display(),
            "loaded compiled compressor"
        );
        Ok(loaded)
    }

    pub fn library_path(&self) -> &Path {
        self.library.path()
    }

    fn call(&self, op: PluginOp, input: &[u8]) -> (i32, Vec<u8>) {
        let mut out: Vec<u8> = Vec::new();
        // SAFETY: instance is live until `Drop`; `out` outlives the call and is
        // only touched through `collect_sink`.
        let rc = unsafe {
            (self.vtable.call)(
                self.instance,
                op as u32,
                input.as_ptr(),
                input.len(),
                collect_sink,
                &mut out as *mut Vec<u8> as *mut c_void,
            )
        };
        (rc, out)
    }

    fn query_string(&self, op: PluginOp) -> Option<String> {
        match self.call(op, &[]) {
            (0, out) if !out.is_empty() => Some(String::from_utf8_lossy(&out).into_owned()),
            _ => None,
        }
    }

    fn query_options(&self, op: PluginOp) -> Options {
        match self.call(op, &[]) {
            (0, out) => {
                let json = String::from_utf8_lossy(&out);
                Options::from_json(&json).unwrap_or_else(|e| {
                    tracing::warn!(op = ?op, error = %e, "compiled compressor returned malformed options");
                    Options::new()
                })
            }
            _ => Options::new(),
        }
    }

    fn plugin_error(rc: i32, out: &[u8], op: PluginOp) -> JitError {
        let msg = String::from_utf8_lossy(out).into_owned();
        let msg = if msg.is_empty() { format!("{:?} failed with code {}", op, rc) } else { msg };
        JitError::Plugin { code: rc, msg }
    }

    fn transform(&mut self, op: PluginOp, input: &PressioData, output: &mut PressioData) -> JitResult<()> {
        let request = encode_request(input, output);
        let (rc, out) = self.call(op, &request);
        if rc != 0 {
            return Err(Self::plugin_error(rc, &out, op));
        }
        *output = decode_frame(&out)?;
        Ok(())
    }
}

impl Drop for LoadedCompressor {
    fn drop(&mut self) {
        if !self.instance.is_null() {
            // SAFETY: created by this vtable's `create`/`clone`, destroyed once.
            unsafe { (self.vtable.destroy)(self.instance) };
            self.instance = std::ptr::null_mut();
        }
    }
}

impl Versionable for LoadedCompressor {
    fn major_version(&self) -> u32 {
        version_part(&self.version, 0)
    }
    fn minor_version(&self) -> u32 {
        version_part(&self.version, 1)
    }
    fn patch_version(&self) -> u32 {
        version_part(&self.version, 2)
    }
    fn version(&self) -> String {
        self.version.clone()
    }
}

fn version_part(version: &str, idx: usize) -> u32 {
    version
        .split('.')
        .nth(idx)
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0)
}

impl Configurable for LoadedCompressor {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_options(&mut self, options: &Options) -> JitResult<()> {
        let json = options.to_json()?;
        match self.call(PluginOp::SetOptions, json.as_bytes()) {
            (0, _) | (OP_UNSUPPORTED, _) => Ok(()),
            (rc, out) => Err(Self::plugin_error(rc, &out, PluginOp::SetOptions)),
        }
    }

    fn get_options(&self) -> Options {
        self.query_options(PluginOp::GetOptions)
    }

    fn get_documentation(&self) -> Options {
        self.query_options(PluginOp::GetDocumentation)
    }

    fn get_configuration(&self) -> Options {
        self.query_options(PluginOp::GetConfiguration)
    }
}

impl CompressorPlugin for LoadedCompressor {
    fn compress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()> {
        self.transform(PluginOp::Compress, input, output)
    }

    fn decompress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()> {
        self.transform(PluginOp::Decompress, input, output)
    }

    fn get_metrics_results(&self) -> Options {
        self.query_options(PluginOp::GetMetrics)
    }

    /// Duplicates the instance through the artifact's `clone`; the library is shared.
    fn clone_box(&self) -> JitResult<Box<dyn CompressorPlugin>> {
        // SAFETY: instance is live; `clone` comes from the same validated vtable.
        let instance = unsafe { (self.vtable.clone)(self.instance as *const c_void) };
        if instance.is_null() {
            return Err(JitError::Load("plugin clone returned null".into()));
        }
        Ok(Box::new(Self {
            instance,
            vtable: self.vtable,
            name: self.name.clone(),
            prefix: self.prefix.clone(),
            version: self.version.clone(),
            library: Arc::clone(&self.library),
        }))
    }
}
