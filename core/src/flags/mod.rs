//! flags/mod.rs
//! Build-flag resolution.
//!
//! Design notes:
//! - A `FlagResolver` turns one package id into compiler + linker tokens.
//! - `PkgConfigResolver` shells out to `pkg-config --cflags --libs <pkg>` and
//!   keeps only the first stdout line, split on whitespace runs.
//! - Calls are synchronous and block the caller; no timeout, no cancellation.
//! - Final flag list = extra flags (in order) ++ resolved tokens per package (in order).

pub mod pkgconfig;

pub use pkgconfig::*;

use crate::types::JitResult;

pub trait FlagResolver: Send + Sync {
    fn resolve(&self, package_id: &str) -> JitResult<Vec<String>>;
}

/// Concatenate explicit flags and per-package resolved tokens.
///
/// One resolver call per package, in configured order; the first failure aborts.
pub fn build_flags(
    extra_flags: &[String],
    package_ids: &[String],
    resolver: &dyn FlagResolver,
) -> JitResult<Vec<String>> {
    let mut flags = extra_flags.to_vec();
    for pkg in package_ids {
        let tokens = resolver.resolve(pkg)?;
        tracing::debug!(package = %pkg, tokens = tokens.len(), "resolved package flags");
        flags.extend(tokens);
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JitError;

    struct Fixed;

    impl FlagResolver for Fixed {
        fn resolve(&self, package_id: &str) -> JitResult<Vec<String>> {
            match package_id {
                "pkgA" => Ok(vec!["-Ipath".into(), "-lfoo".into()]),
                "pkgB" => Ok(vec!["-lbar".into()]),
                "empty" => Ok(vec![]),
                other => Err(JitError::Resolution {
                    tool: "fixed".into(),
                    msg: format!("no package {}", other),
                }),
            }
        }
    }

    #[test]
    fn extra_flags_come_first_then_packages_in_order() {
        let flags = build_flags(
            &["-O2".to_string()],
            &["pkgA".to_string(), "empty".to_string(), "pkgB".to_string()],
            &Fixed,
        )
        .unwrap();
        assert_eq!(flags, vec!["-O2", "-Ipath", "-lfoo", "-lbar"]);
    }

    #[test]
    fn resolver_failure_aborts() {
        let err = build_flags(&[], &["pkgA".to_string(), "missing".to_string()], &Fixed)
            .unwrap_err();
        assert_eq!(err.code(), 3);
    }
}
