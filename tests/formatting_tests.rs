//! Formatting tests for swiftflight
//!
//! End-to-end tests: source in, reflowed source out.

use pretty_assertions::assert_eq;
use swiftflight::{format, format_with_config, FormatConfig};

fn config(width: usize) -> FormatConfig {
    FormatConfig {
        max_line_length: width,
        ..FormatConfig::default()
    }
}

/// Format with the default configuration and compare, ignoring the final
/// newline.
fn assert_formats_to(input: &str, expected: &str) {
    let result = format(input).expect("format should succeed");
    assert_eq!(result.trim_end(), expected.trim_end());
}

/// Format at a given width and compare.
fn assert_formats_at(width: usize, input: &str, expected: &str) {
    let result = format_with_config(input, &config(width)).expect("format should succeed");
    assert_eq!(result.trim_end(), expected.trim_end());
}

/// Formatting twice must be a fixed point.
fn assert_idempotent_at(width: usize, input: &str) {
    let cfg = config(width);
    let once = format_with_config(input, &cfg).expect("first format should succeed");
    let twice = format_with_config(&once, &cfg).expect("second format should succeed");
    assert_eq!(once, twice, "formatting should be idempotent");
}

// =============================================================================
// BASICS
// =============================================================================

mod basics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spacing_is_normalized() {
        assert_formats_to("let a=1", "let a = 1");
    }

    #[test]
    fn empty_type_collapses() {
        assert_formats_to("struct Empty {}", "struct Empty { }");
    }

    #[test]
    fn short_body_stays_on_one_line() {
        assert_formats_to("struct U { var x = 1 }", "struct U { var x = 1 }");
    }

    #[test]
    fn signature_pieces_keep_single_spaces() {
        assert_formats_to(
            "func  f<T>( x : T ) -> T where T: Equatable { return  x }",
            "func f<T>(x: T) -> T where T: Equatable { return x }",
        );
    }

    #[test]
    fn wrapped_call_that_fits_is_rejoined() {
        assert_formats_to("foo(\n  a,\n  b\n)", "foo(a, b)");
    }

    #[test]
    fn output_ends_with_one_newline() {
        let result = format("let a = 1").expect("format should succeed");
        assert!(result.ends_with("let a = 1\n"));
        assert!(!result.ends_with("\n\n"));
    }
}

// =============================================================================
// WIDTH-DRIVEN WRAPPING
// =============================================================================

mod wrapping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accessor_block_breaks_only_when_too_wide() {
        assert_formats_at(
            30,
            "protocol P { var a: Int { get set }; var vvvvvvvvvvvvvvv: Int { get set } }",
            "protocol P {
  var a: Int { get set }
  var vvvvvvvvvvvvvvv: Int {
    get set
  }
}",
        );
    }

    #[test]
    fn parameters_wrap_one_per_line() {
        assert_formats_at(
            30,
            "struct S { init(a: Int, b: Int, c: Int) { } }",
            "struct S {
  init(
    a: Int,
    b: Int,
    c: Int
  ) { }
}",
        );
    }

    #[test]
    fn inheritance_wraps_consistently() {
        assert_formats_at(
            20,
            "protocol P: A, B, C { }",
            "protocol P:
  A,
  B,
  C
{ }",
        );
    }

    #[test]
    fn inheritance_stays_inline_when_it_fits() {
        assert_formats_at(25, "protocol P: A, B, C { }", "protocol P: A, B, C { }");
    }

    #[test]
    fn call_arguments_fill() {
        assert_formats_at(
            15,
            "foo(aaaa, bbbb, cccc)",
            "foo(aaaa, bbbb,
  cccc)",
        );
    }

    #[test]
    fn long_operator_chains_hang() {
        assert_formats_at(
            20,
            "let result = aaaa + bbbb + cccc",
            "let result = aaaa
    + bbbb + cccc",
        );
    }

    #[test]
    fn no_line_exceeds_the_limit() {
        let input = "foo(aaaaaaaaaa, bbbbbbbbbb, cccccccccc, dddddddddd)";
        let result = format_with_config(input, &config(30)).expect("format should succeed");
        for line in result.lines() {
            assert!(
                line.chars().count() <= 30,
                "line exceeds 30 columns: {:?}",
                line
            );
        }
    }
}

// =============================================================================
// CONDITIONAL COMPILATION
// =============================================================================

mod conditional_compilation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn directives_at_column_zero_body_indented() {
        let result = format("#if X\n let a = 1\n#endif\n").expect("format should succeed");
        assert_eq!(result, "#if X\n  let a = 1\n#endif\n");
    }

    #[test]
    fn nesting_adds_two_spaces_per_level() {
        assert_formats_to(
            "#if A\n#if B\nlet x = 1\n#endif\n#endif",
            "#if A
  #if B
    let x = 1
  #endif
#endif",
        );
    }

    #[test]
    fn else_clause_keeps_its_items() {
        assert_formats_to(
            "#if DEBUG\nlet level = 1\n#else\nlet level = 0\n#endif",
            "#if DEBUG
  let level = 1
#else
  let level = 0
#endif",
        );
    }
}

// =============================================================================
// VERBATIM REGIONS
// =============================================================================

mod verbatim {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_indentation_is_preserved() {
        assert_formats_to(
            "func f() {\n  ~one\n     ~two\n ~zero\n}",
            "func f() {
  ~one
     ~two
  ~zero
}",
        );
    }

    #[test]
    fn trailing_closures_pass_through() {
        assert_formats_to("items.forEach { x in x }", "items.forEach { x in x }");
    }

    #[test]
    fn multiline_closures_pass_through() {
        assert_formats_to(
            "items.forEach {\n  x\n}",
            "items.forEach {
  x
}",
        );
    }
}

// =============================================================================
// BLANK LINES
// =============================================================================

mod blank_lines {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_blank_line_is_preserved() {
        assert_formats_to("let a = 1\n\nlet b = 2", "let a = 1\n\nlet b = 2");
    }

    #[test]
    fn runs_of_blank_lines_cap_at_one() {
        assert_formats_to("let a = 1\n\n\n\nlet b = 2", "let a = 1\n\nlet b = 2");
    }

    #[test]
    fn ignore_existing_line_breaks_drops_blanks() {
        let cfg = FormatConfig {
            respects_existing_line_breaks: false,
            ..FormatConfig::default()
        };
        let result =
            format_with_config("let a = 1\n\n\nlet b = 2", &cfg).expect("format should succeed");
        assert_eq!(result, "let a = 1\nlet b = 2\n");
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

mod comments {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leading_comment_preserved() {
        assert_formats_to("// header\nlet a = 1", "// header\nlet a = 1");
    }

    #[test]
    fn trailing_comment_stays_on_its_line() {
        assert_formats_to("let a = 1 // note", "let a = 1 // note");
    }

    #[test]
    fn inline_block_comment_preserved() {
        assert_formats_to("let a = /* why */ 1", "let a = /* why */ 1");
    }

    #[test]
    fn block_comment_before_code_keeps_a_space() {
        assert_formats_to("/* note */ let b = 2", "/* note */ let b = 2");
    }

    #[test]
    fn doc_comment_preserved() {
        assert_formats_to(
            "/// Greets.\n/// Politely.\nfunc hello() { }",
            "/// Greets.\n/// Politely.\nfunc hello() { }",
        );
    }

    #[test]
    fn comment_between_declarations_keeps_its_line() {
        assert_formats_to(
            "let a = 1\n// middle\nlet b = 2",
            "let a = 1\n// middle\nlet b = 2",
        );
    }

    #[test]
    fn comment_spacing_rule_inserts_a_space() {
        assert_formats_to("//bad\nlet a = 1", "// bad\nlet a = 1");
    }

    #[test]
    fn every_comment_appears_exactly_once() {
        let input = "// one\nlet a = 1 // two\n/* three */\nlet b = 2\n";
        let result = format(input).expect("format should succeed");
        for needle in ["// one", "// two", "/* three */"] {
            assert_eq!(result.matches(needle).count(), 1, "missing {}", needle);
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    const IF_ELSE: &str = "if c {\n  aaa()\n} else {\n  bbb()\n}";

    #[test]
    fn else_joins_the_closing_brace_by_default() {
        assert_formats_at(
            12,
            IF_ELSE,
            "if c {
  aaa()
} else {
  bbb()
}",
        );
    }

    #[test]
    fn line_break_before_control_flow_keywords() {
        let cfg = FormatConfig {
            max_line_length: 12,
            line_break_before_control_flow_keywords: true,
            ..FormatConfig::default()
        };
        let result = format_with_config(IF_ELSE, &cfg).expect("format should succeed");
        assert_eq!(
            result.trim_end(),
            "if c {
  aaa()
}
else {
  bbb()
}"
        );
    }

    #[test]
    fn line_break_before_each_argument() {
        let cfg = FormatConfig {
            max_line_length: 15,
            line_break_before_each_argument: true,
            ..FormatConfig::default()
        };
        let result =
            format_with_config("foo(aaaa, bbbb, cccc)", &cfg).expect("format should succeed");
        assert_eq!(
            result.trim_end(),
            "foo(
  aaaa,
  bbbb,
  cccc
)"
        );
    }
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

mod idempotence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formatting_is_a_fixed_point() {
        let inputs = [
            "let a = 1",
            "struct S { init(a: Int, b: Int, c: Int) { } }",
            "protocol P: A, B, C { }",
            "protocol P { var a: Int { get set }; var vvvvvvvvvvvvvvv: Int { get set } }",
            "#if X\nlet a = 1\n#endif",
            "foo(aaaa, bbbb, cccc)",
            "let result = aaaa + bbbb + cccc",
            "if c {\n  aaa()\n} else {\n  bbb()\n}",
            "func f<T>(x: T) -> T where T: Equatable { return x }",
            "let a = 1\n\nlet b = 2",
            "items.forEach {\n  x\n}",
        ];
        for input in inputs {
            for width in [20, 30, 100] {
                assert_idempotent_at(width, input);
            }
        }
    }
}
