// This suite validates the template generator:

// * regex substitution over the whole source
// * paired keys/values updates and their length check
// * introspection (options, configuration, version)
// * clone independence

#[cfg(test)]
mod tests {
    use jit_core::constants::{pressio_keys, template_keys};
    use jit_core::generators::{Generator, TemplateGenerator};
    use jit_core::options::{OptionValue, Options};
    use jit_core::plugin::{Configurable, Versionable};
    use jit_core::types::JitError;
    use proptest::prelude::*;

    fn set_vars(g: &mut TemplateGenerator, keys: &[&str], values: &[&str]) -> Result<(), JitError> {
        g.set_options(
            &Options::new()
                .with(template_keys::KEYS, keys.to_vec())
                .with(template_keys::VALUES, values.to_vec()),
        )
    }

    fn with_source(source: &str) -> TemplateGenerator {
        let mut g = TemplateGenerator::new();
        g.set_options(&Options::new().with(template_keys::SOURCE, source)).unwrap();
        g
    }

    // ## 1. Substitution

    #[test]
    fn every_occurrence_is_replaced() {
        let mut g = with_source("let a = VALUE; let b = VALUE + VALUE;");
        set_vars(&mut g, &["VALUE"], &["42"]).unwrap();
        assert_eq!(g.generate().unwrap(), "let a = 42; let b = 42 + 42;");
    }

    #[test]
    fn keys_are_regular_expressions() {
        let mut g = with_source("x1 x22 x333");
        set_vars(&mut g, &[r"x\d+"], &["y"]).unwrap();
        assert_eq!(g.generate().unwrap(), "y y y");
    }

    #[test]
    fn no_variables_returns_source_verbatim() {
        let g = with_source("fn f() {}");
        assert_eq!(g.generate().unwrap(), "fn f() {}");
    }

    #[test]
    fn empty_generator_produces_empty_source() {
        assert_eq!(TemplateGenerator::new().generate().unwrap(), "");
    }

    #[test]
    fn substitution_is_idempotent_when_replacement_lacks_pattern() {
        let mut g = with_source("P-P");
        set_vars(&mut g, &["P"], &["X"]).unwrap();
        let once = g.generate().unwrap();

        let mut again = with_source(&once);
        set_vars(&mut again, &["P"], &["X"]).unwrap();
        assert_eq!(again.generate().unwrap(), once);
    }

    #[test]
    fn substitution_is_not_idempotent_when_replacement_contains_pattern() {
        let mut g = with_source("P");
        set_vars(&mut g, &["P"], &["PP"]).unwrap();
        let once = g.generate().unwrap();
        assert_eq!(once, "PP");

        let mut again = with_source(&once);
        set_vars(&mut again, &["P"], &["PP"]).unwrap();
        assert_eq!(again.generate().unwrap(), "PPPP");
    }

    proptest! {
        #[test]
        fn prop_literal_token_fully_replaced(
            parts in prop::collection::vec("[a-z ]{0,8}", 1..6),
            replacement in "[A-Z0-9]{0,6}",
        ) {
            let token = "@TOKEN@";
            let source = parts.join(token);
            let mut g = with_source(&source);
            set_vars(&mut g, &[token], &[replacement.as_str()]).unwrap();
            let out = g.generate().unwrap();
            prop_assert!(!out.contains(token));
            prop_assert_eq!(out, parts.join(&replacement));
        }
    }

    // ## 2. keys/values updates

    #[test]
    fn length_mismatch_is_rejected_and_mapping_kept() {
        let mut g = with_source("A B");
        set_vars(&mut g, &["A", "B"], &["1", "2"]).unwrap();
        let before = g.get_options();

        let err = set_vars(&mut g, &["A", "B", "C"], &["x"]).unwrap_err();
        assert!(matches!(err, JitError::Validation(_)));
        assert_ne!(err.code(), 0);
        assert!(!err.to_string().is_empty());

        assert_eq!(g.get_options(), before);
        assert_eq!(g.generate().unwrap(), "1 2");
    }

    #[test]
    fn matching_lengths_replace_the_whole_mapping() {
        let mut g = with_source("A B");
        set_vars(&mut g, &["A", "B"], &["1", "2"]).unwrap();
        set_vars(&mut g, &["B"], &["3"]).unwrap();
        assert_eq!(g.generate().unwrap(), "A 3");
    }

    #[test]
    fn empty_pair_clears_the_mapping() {
        let mut g = with_source("A");
        set_vars(&mut g, &["A"], &["1"]).unwrap();
        set_vars(&mut g, &[], &[]).unwrap();
        assert_eq!(g.generate().unwrap(), "A");
    }

    // ## 3. Introspection

    #[test]
    fn options_report_source_and_pairwise_keys_values() {
        let mut g = with_source("src");
        set_vars(&mut g, &["b", "a"], &["2", "1"]).unwrap();
        let opts = g.get_options();

        assert_eq!(opts.get(template_keys::SOURCE), Some(&OptionValue::Str("src".into())));
        let keys = opts.get_strings(template_keys::KEYS).into_option().unwrap().to_vec();
        let values = opts.get_strings(template_keys::VALUES).into_option().unwrap().to_vec();
        assert_eq!(keys.len(), values.len());
        for (k, v) in keys.iter().zip(&values) {
            let expected = if k == "a" { "1" } else { "2" };
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn configuration_and_version() {
        let g = TemplateGenerator::new();
        let cfg = g.get_configuration();
        assert!(cfg.contains(pressio_keys::THREAD_SAFE));
        assert_eq!(cfg.get_str(pressio_keys::STABILITY).into_option(), Some("experimental"));
        assert_eq!(g.version(), "0.0.1");
        assert_eq!(g.prefix(), "template");
        assert_eq!(g.plugin_type(), "generator");
        assert!(g.get_documentation().contains(pressio_keys::DESCRIPTION));
    }

    // ## 4. Clone

    #[test]
    fn clone_is_independent() {
        let mut g = with_source("A");
        set_vars(&mut g, &["A"], &["1"]).unwrap();
        let copy = g.clone_box();

        set_vars(&mut g, &["A"], &["2"]).unwrap();
        assert_eq!(g.generate().unwrap(), "2");
        assert_eq!(copy.generate().unwrap(), "1");
    }
}
