// End-to-end: real rustc, real dynamic loading.

// * generated identity compressor round-trips a 10x10 float grid
// * decompression sees the caller's output dtype and dims
// * compile diagnostics surface verbatim and keep the previous implementation
// * clones and metrics go through the loaded artifact
//
// Skipped (with a note on stderr) when no `rustc` is on PATH.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jit_core::compressors::PoorJitCompressor;
    use jit_core::constants::{poorjit_keys, template_keys};
    use jit_core::data::{DType, PressioData};
    use jit_core::flags::PkgConfigResolver;
    use jit_core::jit::{JitConfig, JitManager, RustcJitManager, PLUGIN_ABI_SOURCE};
    use jit_core::options::{OptionValue, Options};
    use jit_core::plugin::{CompressorPlugin, Configurable};
    use jit_core::types::JitError;
    use tempfile::tempdir;
    use tracing_subscriber::EnvFilter;

    const PLUGIN_TEMPLATE: &str = r##"
@ABI@

use std::os::raw::c_void;
use pressio_jit_abi::*;

#[derive(Clone, Default)]
struct State {
    calls: u64,
}

@TRANSFORM@

unsafe extern "C" fn create() -> *mut c_void {
    Box::into_raw(Box::new(State::default())) as *mut c_void
}

unsafe extern "C" fn clone(instance: *const c_void) -> *mut c_void {
    let state = &*(instance as *const State);
    Box::into_raw(Box::new(state.clone())) as *mut c_void
}

unsafe extern "C" fn destroy(instance: *mut c_void) {
    drop(Box::from_raw(instance as *mut State));
}

unsafe extern "C" fn call(
    instance: *mut c_void,
    op: u32,
    ptr: *const u8,
    len: usize,
    sink: Sink,
    ctx: *mut c_void,
) -> i32 {
    let state = &mut *(instance as *mut State);
    match op {
        OP_PREFIX => {
            emit(sink, ctx, b"@PREFIX@");
            0
        }
        OP_VERSION => {
            emit(sink, ctx, b"1.2.3");
            0
        }
        OP_COMPRESS | OP_DECOMPRESS => {
            state.calls += 1;
            match transform(op, input(ptr, len)) {
                Some(out) => {
                    emit(sink, ctx, &out);
                    0
                }
                None => {
                    emit(sink, ctx, b"malformed request");
                    2
                }
            }
        }
        OP_GET_METRICS => {
            let json = format!("{{\"@PREFIX@:calls\":{{\"u64\":{}}}}}", state.calls);
            emit(sink, ctx, json.as_bytes());
            0
        }
        _ => OP_UNSUPPORTED,
    }
}

static VTABLE: PluginVTable = PluginVTable {
    abi_version: ABI_VERSION,
    create,
    clone,
    destroy,
    call,
};

#[no_mangle]
pub extern "C" fn pressio_jit_plugin_v1() -> *const PluginVTable {
    &VTABLE
}
"##;

    /// Echoes the input frame in both directions.
    const IDENTITY_TRANSFORM: &str = r##"
fn transform(_op: u32, request: &[u8]) -> Option<Vec<u8>> {
    let (_, used) = parse_frame(request)?;
    Some(request[..used].to_vec())
}
"##;

    /// Compresses to a flat byte frame; decompression rebuilds the caller's
    /// requested dtype and dims around the same payload.
    const BYTES_TRANSFORM: &str = r##"
fn transform(op: u32, request: &[u8]) -> Option<Vec<u8>> {
    let (input, output) = parse_request(request)?;
    if op == OP_COMPRESS {
        Some(write_frame(DTYPE_BYTE, &[input.payload.len() as u64], input.payload))
    } else {
        Some(write_frame(output.dtype, &output.dims, input.payload))
    }
}
"##;

    fn rustc_available() -> bool {
        match which::which("rustc") {
            Ok(_) => true,
            Err(_) => {
                eprintln!("rustc not found on PATH; skipping JIT end-to-end test");
                false
            }
        }
    }

    fn plugin_options(prefix: &str, transform: &str) -> Options {
        Options::new()
            .with(template_keys::SOURCE, PLUGIN_TEMPLATE)
            .with(template_keys::KEYS, vec!["@ABI@", "@PREFIX@", "@TRANSFORM@"])
            .with(template_keys::VALUES, vec![PLUGIN_ABI_SOURCE, prefix, transform])
            .with(poorjit_keys::EXTRA_ARGS, vec!["-C", "opt-level=1"])
    }

    fn identity_options() -> Options {
        plugin_options("identity", IDENTITY_TRANSFORM)
    }

    fn orchestrator(config: JitConfig) -> PoorJitCompressor {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        jit_core::register_all();
        PoorJitCompressor::with_collaborators(
            Arc::new(RustcJitManager::new(config)) as Arc<dyn JitManager>,
            Arc::new(PkgConfigResolver::new()),
        )
        .unwrap()
    }

    fn grid() -> PressioData {
        let mut values = vec![0f32; 100];
        for i in 0..10 {
            for j in 0..10 {
                values[j * 10 + i] = (i * j) as f32;
            }
        }
        PressioData::from_f32s(&[10, 10], &values).unwrap()
    }

    #[test]
    fn identity_plugin_round_trips() {
        if !rustc_available() {
            return;
        }
        let mut c = orchestrator(JitConfig::default());
        c.set_options(&identity_options()).unwrap();
        assert!(c.is_compiled());

        let compiled = c.compiled().unwrap();
        assert_eq!(compiled.prefix(), "identity");
        assert_eq!(compiled.version(), "1.2.3");

        let input = grid();
        let mut compressed = PressioData::empty(DType::Byte, &[]);
        c.compress(&input, &mut compressed).unwrap();

        let mut output = PressioData::owning(DType::Float, &[10, 10]).unwrap();
        assert_ne!(output, input);
        c.decompress(&compressed, &mut output).unwrap();
        assert_eq!(output, input);

        assert_eq!(
            c.get_metrics_results().get("identity:calls"),
            Some(&OptionValue::U64(2))
        );
    }

    #[test]
    fn decompress_uses_requested_output_shape() {
        if !rustc_available() {
            return;
        }
        let mut c = orchestrator(JitConfig::default());
        c.set_options(&plugin_options("bytes", BYTES_TRANSFORM)).unwrap();
        assert_eq!(c.compiled().unwrap().prefix(), "bytes");

        let input = grid();
        let mut compressed = PressioData::empty(DType::Float, &[10, 10]);
        c.compress(&input, &mut compressed).unwrap();
        assert_eq!(compressed.dtype(), DType::Byte);
        assert_eq!(compressed.dims(), &[400]);

        let mut output = PressioData::owning(DType::Float, &[10, 10]).unwrap();
        assert_ne!(output, input);
        c.decompress(&compressed, &mut output).unwrap();
        assert_eq!(output.dtype(), DType::Float);
        assert_eq!(output.dims(), &[10, 10]);
        assert_eq!(output, input);
    }

    #[test]
    fn compile_error_keeps_loaded_implementation() {
        if !rustc_available() {
            return;
        }
        let mut c = orchestrator(JitConfig::default());
        c.set_options(&identity_options()).unwrap();

        let broken = Options::new()
            .with(template_keys::SOURCE, "this is not rust")
            .with(template_keys::KEYS, Vec::<String>::new())
            .with(template_keys::VALUES, Vec::<String>::new());
        let err = c.set_options(&broken).unwrap_err();
        assert!(matches!(err, JitError::Compile(_)));
        assert!(!c.error_msg().is_empty());
        assert_eq!(c.error_code(), 4);

        let input = grid();
        let mut out = PressioData::empty(DType::Byte, &[]);
        c.compress(&input, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn clone_uses_same_artifact_with_independent_state() {
        if !rustc_available() {
            return;
        }
        let mut c = orchestrator(JitConfig::default());
        c.set_options(&identity_options()).unwrap();

        let input = grid();
        let mut out = PressioData::empty(DType::Byte, &[]);
        c.compress(&input, &mut out).unwrap();

        let mut copy = c.clone_box().unwrap();
        copy.compress(&input, &mut out).unwrap();
        copy.compress(&input, &mut out).unwrap();
        drop(c);

        assert_eq!(copy.get_metrics_results().get("identity:calls"), Some(&OptionValue::U64(3)));
        assert_eq!(out, input);
    }

    #[test]
    fn cache_dir_reuses_artifacts() {
        if !rustc_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let config = JitConfig::default().with_cache_dir(dir.path());

        let mut first = orchestrator(config.clone());
        first.set_options(&identity_options()).unwrap();
        let mut second = orchestrator(config);
        second.set_options(&identity_options()).unwrap();

        let artifacts = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().map(|x| x != "rs").unwrap_or(false))
            .count();
        assert_eq!(artifacts, 1);

        let input = grid();
        let mut out = PressioData::empty(DType::Byte, &[]);
        second.compress(&input, &mut out).unwrap();
        assert_eq!(out, input);
    }
}
