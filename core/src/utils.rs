use std::fmt;
use num_enum::TryFromPrimitive;

/// Number of hex characters kept from the artifact digest.
pub const ARTIFACT_ID_LEN: usize = 16;

/// Content-addressed id for a compile request.
///
/// Source text and every flag are hashed with explicit length prefixes so
/// `["-a", "b"]` and `["-ab"]` never collide.
pub fn artifact_id(source: &str, flags: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(source.len() as u64).to_le_bytes());
    hasher.update(source.as_bytes());
    for flag in flags {
        hasher.update(&(flag.len() as u64).to_le_bytes());
        hasher.update(flag.as_bytes());
    }
    let digest = hasher.finalize();
    let mut id = hex::encode(digest.as_bytes());
    id.truncate(ARTIFACT_ID_LEN);
    id
}

/// Crate name rustc will accept for an artifact id (must start with a letter).
pub fn crate_name_for(id: &str) -> String {
    format!("pressio_jit_{}", id)
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Platform file name of a dynamic library built from `crate_name`.
pub fn dylib_file_name(crate_name: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        crate_name,
        std::env::consts::DLL_SUFFIX
    )
}
