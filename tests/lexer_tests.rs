//! Lexer tests for swiftflight
//!
//! Tests for tokenization and trivia attachment.

use swiftflight::ast::{LeafKind, TriviaPiece};
use swiftflight::parser::lexer::tokenize;

mod tokens {
    use super::*;

    #[test]
    fn words_operators_and_punctuation() {
        let leaves = tokenize("let x = 1").expect("should tokenize");
        let kinds: Vec<_> = leaves.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LeafKind::Word,
                LeafKind::Word,
                LeafKind::Op,
                LeafKind::Number,
                LeafKind::Eof,
            ]
        );
        let texts: Vec<_> = leaves.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["let", "x", "=", "1", ""]);
    }

    #[test]
    fn multi_char_operators_are_single_leaves() {
        let leaves = tokenize("a -> b == c ... d").expect("should tokenize");
        let ops: Vec<_> = leaves
            .iter()
            .filter(|l| l.kind == LeafKind::Op)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(ops, vec!["->", "==", "..."]);
    }

    #[test]
    fn compound_assignment() {
        let leaves = tokenize("a+=1").expect("should tokenize");
        assert_eq!(leaves[1].text, "+=");
        assert_eq!(leaves[1].kind, LeafKind::Op);
    }

    #[test]
    fn punctuation() {
        let leaves = tokenize("(a, b): [c].d").expect("should tokenize");
        let puncts: Vec<_> = leaves
            .iter()
            .filter(|l| l.kind == LeafKind::Punct)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(puncts, vec!["(", ",", ")", ":", "[", "]", "."]);
    }

    #[test]
    fn string_with_escapes() {
        let leaves = tokenize(r#"let s = "a \" b""#).expect("should tokenize");
        let string = leaves.iter().find(|l| l.kind == LeafKind::Str).unwrap();
        assert_eq!(string.text, r#""a \" b""#);
    }

    #[test]
    fn numbers_keep_their_spelling() {
        let leaves = tokenize("a = 0xFF + 1_000 + 1.5").expect("should tokenize");
        let numbers: Vec<_> = leaves
            .iter()
            .filter(|l| l.kind == LeafKind::Number)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["0xFF", "1_000", "1.5"]);
    }

    #[test]
    fn member_access_on_literal_is_not_a_float() {
        let leaves = tokenize("1.description").expect("should tokenize");
        assert_eq!(leaves[0].text, "1");
        assert!(leaves[1].is_punct('.'));
        assert_eq!(leaves[2].text, "description");
    }

    #[test]
    fn backtick_identifier() {
        let leaves = tokenize("let `default` = 1").expect("should tokenize");
        assert_eq!(leaves[1].text, "`default`");
        assert_eq!(leaves[1].kind, LeafKind::Word);
    }

    #[test]
    fn conditional_compilation_directives() {
        let leaves = tokenize("#if os(macOS)\n#endif").expect("should tokenize");
        assert_eq!(leaves[0].text, "#if");
        assert_eq!(leaves[0].kind, LeafKind::Directive);
        let endif = leaves.iter().find(|l| l.text == "#endif").unwrap();
        assert_eq!(endif.kind, LeafKind::Directive);
    }

    #[test]
    fn positions_are_one_based() {
        let leaves = tokenize("let x\n  let y").expect("should tokenize");
        assert_eq!((leaves[0].pos.line, leaves[0].pos.column), (1, 1));
        assert_eq!((leaves[1].pos.line, leaves[1].pos.column), (1, 5));
        assert_eq!((leaves[2].pos.line, leaves[2].pos.column), (2, 3));
    }
}

mod trivia {
    use super::*;

    #[test]
    fn newline_runs_collect_on_the_next_leaf() {
        let leaves = tokenize("a\n\n\nb").expect("should tokenize");
        assert_eq!(leaves[1].leading, vec![TriviaPiece::Newlines(3)]);
    }

    #[test]
    fn own_line_comment_leads_the_next_leaf() {
        let leaves = tokenize("// a\nlet x = 1").expect("should tokenize");
        assert_eq!(
            leaves[0].leading,
            vec![
                TriviaPiece::Line("// a".to_string()),
                TriviaPiece::Newlines(1),
            ]
        );
    }

    #[test]
    fn same_line_comment_trails_the_previous_leaf() {
        let leaves = tokenize("let x = 1 // c\nlet y = 2").expect("should tokenize");
        let one = leaves.iter().find(|l| l.text == "1").unwrap();
        assert_eq!(one.trailing, vec![TriviaPiece::Line("// c".to_string())]);
        let second_let = &leaves[4];
        assert_eq!(second_let.leading, vec![TriviaPiece::Newlines(1)]);
    }

    #[test]
    fn doc_lines_join_into_one_piece() {
        let leaves = tokenize("/// a\n/// b\nfunc f() { }").expect("should tokenize");
        assert_eq!(
            leaves[0].leading[0],
            TriviaPiece::DocLine("/// a\n/// b".to_string())
        );
    }

    #[test]
    fn blank_line_splits_doc_comments() {
        let leaves = tokenize("/// a\n\n/// b\nlet x = 1").expect("should tokenize");
        assert_eq!(
            leaves[0].leading,
            vec![
                TriviaPiece::DocLine("/// a".to_string()),
                TriviaPiece::Newlines(2),
                TriviaPiece::DocLine("/// b".to_string()),
                TriviaPiece::Newlines(1),
            ]
        );
    }

    #[test]
    fn nested_block_comment() {
        let leaves = tokenize("/* a /* b */ c */ x").expect("should tokenize");
        assert_eq!(
            leaves[0].leading,
            vec![TriviaPiece::Block("/* a /* b */ c */".to_string())]
        );
    }

    #[test]
    fn doc_block_comment() {
        let leaves = tokenize("/** doc */ x").expect("should tokenize");
        assert_eq!(
            leaves[0].leading,
            vec![TriviaPiece::DocBlock("/** doc */".to_string())]
        );
    }

    #[test]
    fn eof_leaf_carries_trailing_trivia() {
        let leaves = tokenize("let a = 1\n// done\n").expect("should tokenize");
        let eof = leaves.last().unwrap();
        assert_eq!(eof.kind, LeafKind::Eof);
        assert_eq!(
            eof.leading,
            vec![
                TriviaPiece::Newlines(1),
                TriviaPiece::Line("// done".to_string()),
                TriviaPiece::Newlines(1),
            ]
        );
    }
}

mod lex_errors {
    use super::*;

    #[test]
    fn unterminated_block_comment() {
        assert!(tokenize("/* never closed").is_err());
    }

    #[test]
    fn unterminated_string() {
        assert!(tokenize("let s = \"abc").is_err());
    }

    #[test]
    fn unknown_character() {
        assert!(tokenize("let a = 1 \u{1}").is_err());
    }
}
