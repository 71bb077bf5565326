//! Engine tests for swiftflight
//!
//! Drive the scan/print phases directly with hand-built token streams.

use swiftflight::formatter::render;
use swiftflight::formatter::token::{BreakStyle, CommentKind, Token};
use swiftflight::FormatConfig;

fn config(width: usize) -> FormatConfig {
    FormatConfig {
        max_line_length: width,
        ..FormatConfig::default()
    }
}

fn print(width: usize, tokens: Vec<Token>) -> String {
    render(&tokens, &config(width)).expect("render should succeed")
}

mod basics {
    use super::*;

    #[test]
    fn syntax_passthrough() {
        assert_eq!(print(80, vec![Token::syntax("hello")]), "hello");
    }

    #[test]
    fn space_is_never_a_breakpoint() {
        let out = print(
            3,
            vec![Token::syntax("aa"), Token::Space(1), Token::syntax("bb")],
        );
        assert_eq!(out, "aa bb");
    }

    #[test]
    fn break_renders_as_spaces_when_content_fits() {
        let out = print(
            20,
            vec![Token::syntax("a"), Token::brk(1, 0), Token::syntax("b")],
        );
        assert_eq!(out, "a b");
    }

    #[test]
    fn break_fires_when_content_does_not_fit() {
        let out = print(
            3,
            vec![Token::syntax("aaa"), Token::brk(1, 0), Token::syntax("bbb")],
        );
        assert_eq!(out, "aaa\nbbb");
    }

    #[test]
    fn forced_newlines_emit_blank_lines() {
        let out = print(
            80,
            vec![
                Token::syntax("a"),
                Token::Newline { count: 2, offset: 0 },
                Token::syntax("b"),
            ],
        );
        assert_eq!(out, "a\n\nb");
    }
}

mod groups {
    use super::*;

    fn abc_group(style: BreakStyle) -> Vec<Token> {
        vec![
            Token::open(style, 2),
            Token::syntax("aa"),
            Token::brk(1, 0),
            Token::syntax("bb"),
            Token::brk(1, 0),
            Token::syntax("cc"),
            Token::Close,
        ]
    }

    #[test]
    fn consistent_group_at_exact_width_does_not_break() {
        // Strict inequality: a group that exactly fits stays on one line.
        assert_eq!(print(8, abc_group(BreakStyle::Consistent)), "aa bb cc");
    }

    #[test]
    fn consistent_group_fires_every_break() {
        assert_eq!(print(7, abc_group(BreakStyle::Consistent)), "aa\n  bb\n  cc");
    }

    #[test]
    fn inconsistent_group_fills() {
        assert_eq!(print(7, abc_group(BreakStyle::Inconsistent)), "aa bb\n  cc");
    }

    #[test]
    fn negative_offsets_unindent() {
        let out = print(
            4,
            vec![
                Token::syntax("fn"),
                Token::open(BreakStyle::Consistent, 2),
                Token::brk(0, 0),
                Token::syntax("xxxx"),
                Token::brk(0, -2),
                Token::syntax("y"),
                Token::Close,
            ],
        );
        assert_eq!(out, "fn\n  xxxx\ny");
    }

    #[test]
    fn break_extent_covers_a_following_group() {
        // An unfired break's measured length runs to the next break at its
        // own level, so it fires before an over-wide group rather than
        // leaving a dangling space.
        let tokens = |_| {
            vec![
                Token::syntax("abc"),
                Token::brk(1, 0),
                Token::open(BreakStyle::Consistent, 2),
                Token::syntax("ab"),
                Token::brk(1, 0),
                Token::syntax("cdef"),
                Token::Close,
            ]
        };
        assert_eq!(print(11, tokens(())), "abc ab cdef");
        assert_eq!(print(9, tokens(())), "abc\nab cdef");
    }

    #[test]
    fn indentation_can_use_tabs() {
        let cfg = FormatConfig {
            max_line_length: 8,
            indent: swiftflight::formatter::indent::Indent {
                kind: swiftflight::formatter::indent::IndentKind::Tabs,
                count: 1,
            },
            tab_width: 4,
            ..FormatConfig::default()
        };
        let tokens = vec![
            Token::syntax("aaaa"),
            Token::open(BreakStyle::Consistent, 4),
            Token::brk(0, 0),
            Token::syntax("bbbbbbbb"),
            Token::Close,
        ];
        let out = render(&tokens, &cfg).expect("render should succeed");
        assert_eq!(out, "aaaa\n\tbbbbbbbb");
    }
}

mod reset {
    use super::*;

    #[test]
    fn reset_discards_a_pending_break_without_whitespace() {
        let out = print(
            20,
            vec![
                Token::syntax("ab"),
                Token::brk(1, 0),
                Token::Reset,
                Token::syntax("cd"),
            ],
        );
        assert_eq!(out, "abcd");
    }
}

mod comments {
    use super::*;

    #[test]
    fn line_comment_at_end_of_line() {
        let out = print(
            80,
            vec![
                Token::syntax("x"),
                Token::Space(1),
                Token::Comment {
                    kind: CommentKind::Line,
                    text: "// hi".to_string(),
                },
                Token::Newline { count: 1, offset: 0 },
                Token::syntax("y"),
            ],
        );
        assert_eq!(out, "x // hi\ny");
    }

    #[test]
    fn nothing_shares_a_line_with_a_line_comment() {
        let out = print(
            80,
            vec![
                Token::syntax("x"),
                Token::Space(1),
                Token::Comment {
                    kind: CommentKind::Line,
                    text: "// hi".to_string(),
                },
                Token::syntax("y"),
            ],
        );
        assert_eq!(out, "x // hi\ny");
    }

    #[test]
    fn doc_lines_keep_internal_newlines() {
        let out = print(
            80,
            vec![
                Token::syntax("a"),
                Token::Newline { count: 1, offset: 0 },
                Token::Comment {
                    kind: CommentKind::DocLine,
                    text: "/// x\n/// y".to_string(),
                },
                Token::Newline { count: 1, offset: 0 },
                Token::syntax("b"),
            ],
        );
        assert_eq!(out, "a\n/// x\n/// y\nb");
    }

    #[test]
    fn block_comment_lines_are_verbatim() {
        let out = print(
            80,
            vec![
                Token::Comment {
                    kind: CommentKind::Block,
                    text: "/* a\n   b */".to_string(),
                },
                Token::Newline { count: 1, offset: 0 },
                Token::syntax("x"),
            ],
        );
        assert_eq!(out, "/* a\n   b */\nx");
    }
}

mod verbatim {
    use super::*;

    #[test]
    fn relative_indentation_is_preserved_and_raised() {
        let out = print(
            30,
            vec![
                Token::syntax("head"),
                Token::open(BreakStyle::Consistent, 2),
                Token::Newline { count: 1, offset: 0 },
                Token::Verbatim("  one\n     two\n zero".to_string()),
                Token::Newline { count: 1, offset: -2 },
                Token::Close,
                Token::syntax("tail"),
            ],
        );
        assert_eq!(out, "head\n  one\n     two\n  zero\ntail");
    }
}

mod malformed {
    use super::*;

    #[test]
    fn unclosed_group_is_rejected() {
        let tokens = vec![Token::open(BreakStyle::Consistent, 0), Token::syntax("x")];
        let err = render(&tokens, &config(80)).unwrap_err();
        assert!(matches!(
            err,
            swiftflight::Error::MalformedTokenStream { .. }
        ));
    }

    #[test]
    fn close_without_open_is_rejected() {
        let err = render(&[Token::Close], &config(80)).unwrap_err();
        assert!(matches!(
            err,
            swiftflight::Error::MalformedTokenStream { .. }
        ));
    }
}
