//! plugin/mod.rs
//! Capability traits shared by generators and compressors.
//!
//! Design notes:
//! - `Configurable` is the options surface every plugin exposes (set/get/doc/config).
//! - `Versionable` derives the version string from three integers unless overridden.
//! - `CompressorPlugin` is the calling contract the orchestrator both implements
//!   and delegates to; `Send` lets instances move across threads, no `Sync`
//!   because one instance must not be driven concurrently.
//! - Cloning is explicit (`clone_box`); owned trait objects are never implicitly copied.

use crate::data::PressioData;
use crate::options::Options;
use crate::types::{JitError, JitResult};

pub trait Versionable {
    fn major_version(&self) -> u32 {
        0
    }
    fn minor_version(&self) -> u32 {
        0
    }
    fn patch_version(&self) -> u32 {
        0
    }
    fn version(&self) -> String {
        format!(
            "{}.{}.{}",
            self.major_version(),
            self.minor_version(),
            self.patch_version()
        )
    }
}

pub trait Configurable {
    /// Stable identifier used as the option-key namespace.
    fn prefix(&self) -> &str;

    /// Hierarchical instance name (`""` until a host names it).
    fn name(&self) -> &str;
    fn set_name(&mut self, name: &str);

    /// Names of owned sub-components.
    fn children(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply the keys this plugin understands; unknown keys are ignored.
    fn set_options(&mut self, options: &Options) -> JitResult<()>;
    fn get_options(&self) -> Options;
    fn get_documentation(&self) -> Options;
    fn get_configuration(&self) -> Options;
}

pub trait CompressorPlugin: Configurable + Versionable + Send {
    /// Compress a single buffer into `output`.
    fn compress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()>;
    /// Decompress a single buffer into `output`.
    fn decompress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()>;

    /// Batched compression; pairs `inputs[i]` with `outputs[i]`.
    fn compress_many(&mut self, inputs: &[&PressioData], outputs: &mut [PressioData]) -> JitResult<()> {
        check_batch(inputs.len(), outputs.len())?;
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            self.compress(input, output)?;
        }
        Ok(())
    }

    /// Batched decompression; pairs `inputs[i]` with `outputs[i]`.
    fn decompress_many(&mut self, inputs: &[&PressioData], outputs: &mut [PressioData]) -> JitResult<()> {
        check_batch(inputs.len(), outputs.len())?;
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            self.decompress(input, output)?;
        }
        Ok(())
    }

    fn get_metrics_results(&self) -> Options {
        Options::new()
    }

    fn clone_box(&self) -> JitResult<Box<dyn CompressorPlugin>>;
}

fn check_batch(inputs: usize, outputs: usize) -> JitResult<()> {
    if inputs != outputs {
        return Err(JitError::Validation(format!(
            "batch has {} inputs but {} outputs",
            inputs, outputs
        )));
    }
    Ok(())
}
